//! Analysis endpoints
//!
//! - POST /analyze: validate, analyse, store, return the record
//! - GET /analyses: the caller's analyses, paged and sorted
//! - GET /analyses/:id, DELETE /analyses/:id: owner only

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::api::auth::CurrentUser;
use crate::db::analyses::{self, AnalysisRecord, ListQuery, SortField, SortOrder};
use crate::{ApiError, ApiResult, AppState};

/// Largest page a listing returns
pub const MAX_PAGE_SIZE: i64 = 100;

/// POST /analyze request body
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

/// GET /analyses query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListParams {
    fn into_query(self) -> ApiResult<ListQuery> {
        let defaults = ListQuery::default();

        let sort_by = match self.sort_by.as_deref() {
            Some(field) => field.parse::<SortField>().map_err(ApiError::BadRequest)?,
            None => defaults.sort_by,
        };
        let sort_order = match self.sort_order.as_deref() {
            Some(order) => order.parse::<SortOrder>().map_err(ApiError::BadRequest)?,
            None => defaults.sort_order,
        };

        Ok(ListQuery {
            skip: self.skip.unwrap_or(defaults.skip).max(0),
            limit: self.limit.unwrap_or(defaults.limit).clamp(1, MAX_PAGE_SIZE),
            sort_by,
            sort_order,
        })
    }
}

/// Reject input the pipeline should never see
fn validate(input: &AnalyzeRequest, max_content_length: usize) -> ApiResult<()> {
    if input.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Text cannot be empty".to_string()));
    }
    if input.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title cannot be empty".to_string()));
    }
    if input.text.chars().count() > max_content_length {
        return Err(ApiError::BadRequest(format!(
            "Text exceeds maximum length of {} characters",
            max_content_length
        )));
    }
    Ok(())
}

/// POST /analyze
///
/// Every submission creates a new record, even for text the user has
/// analysed before.
pub async fn analyze_text(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisRecord>> {
    let Json(input) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    validate(&input, state.config.max_content_length)?;

    let toolkit = state.toolkit()?;

    info!("Starting text analysis for user: {}", user.username);
    let analysis = toolkit.analyze(&input.text, &state.analysis_options())?;

    let mut record = AnalysisRecord::new(
        user.id,
        input.title.trim().to_string(),
        input.text,
        Utc::now(),
        analysis,
    );

    match analyses::insert_analysis(&state.db, &record).await {
        Ok(id) => {
            record.id = Some(id);
            record.saved = true;
            info!("Analysis saved to database with ID: {}", id);
        }
        Err(e) if state.config.return_unsaved_on_failure => {
            warn!("Analysis not saved, returning unsaved result: {}", e);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Json(record))
}

/// GET /analyses
pub async fn list_analyses(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<AnalysisRecord>>> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let query = params.into_query()?;

    let records = analyses::list_analyses(&state.db, user.id, &query).await?;
    info!(
        "Retrieved {} analyses for user: {}",
        records.len(),
        user.username
    );

    Ok(Json(records))
}

fn analysis_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    let Path(id) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(id)
}

/// GET /analyses/:id
pub async fn get_analysis(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<AnalysisRecord>> {
    let id = analysis_id(path)?;
    analyses::get_analysis(&state.db, user.id, id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(
                "Analysis not found or you don't have permission to access it".to_string(),
            )
        })
}

/// DELETE /analyses/:id
pub async fn delete_analysis(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let id = analysis_id(path)?;
    if !analyses::delete_analysis(&state.db, user.id, id).await? {
        return Err(ApiError::NotFound(
            "Analysis not found or you don't have permission to delete it".to_string(),
        ));
    }

    info!("Analysis {} deleted by user: {}", id, user.username);
    Ok(Json(json!({ "message": "Analysis deleted successfully" })))
}
