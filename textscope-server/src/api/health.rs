//! Health check endpoint
//!
//! Reports the database and NLP toolkit status. A degraded service answers
//! 200 in development and 503 in production.

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::{AppState, NlpStatus};

const HEALTHY: &str = "healthy";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub environment: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub services: BTreeMap<String, String>,
}

/// GET /health
///
/// Does NOT require authentication.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut services = BTreeMap::new();

    let database = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => HEALTHY.to_string(),
        Err(e) => {
            warn!("Database health check failed: {}", e);
            format!("error: {}", e)
        }
    };
    services.insert("database".to_string(), database);

    let nlp = match &state.nlp {
        NlpStatus::Ready(toolkit) => match toolkit.self_test() {
            Ok(()) => HEALTHY.to_string(),
            Err(e) => format!("error: {}", e),
        },
        NlpStatus::Unavailable(reason) => format!("error: {}", reason),
    };
    services.insert("nlp".to_string(), nlp);

    let degraded = services.values().any(|status| status != HEALTHY);
    let status_code = if degraded && state.config.environment.is_production() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    let response = HealthResponse {
        status: if degraded { "degraded" } else { HEALTHY }.to_string(),
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        uptime_seconds: state.startup_time.elapsed().as_secs(),
        services,
    };

    (status_code, Json(response))
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
