//! textscope-server library - text analysis web service
//!
//! Authenticated users submit a title and text, receive the full analysis
//! record, and can list, fetch and delete their stored analyses.

use std::sync::Arc;
use std::time::Instant;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use sqlx::SqlitePool;
use textscope_common::config::ServiceConfig;
use textscope_nlp::{AnalysisOptions, NlpError, Toolkit};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod api;
pub mod db;
pub mod error;

pub use error::{ApiError, ApiResult};

/// Load state of the NLP toolkit
#[derive(Debug, Clone)]
pub enum NlpStatus {
    Ready(Arc<Toolkit>),
    Unavailable(String),
}

impl From<Result<Toolkit, NlpError>> for NlpStatus {
    fn from(result: Result<Toolkit, NlpError>) -> Self {
        match result {
            Ok(toolkit) => NlpStatus::Ready(Arc::new(toolkit)),
            Err(e) => NlpStatus::Unavailable(e.to_string()),
        }
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    pub nlp: NlpStatus,
    pub config: Arc<ServiceConfig>,
    pub startup_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, nlp: NlpStatus, config: ServiceConfig) -> Self {
        Self {
            db,
            nlp,
            config: Arc::new(config),
            startup_time: Instant::now(),
        }
    }

    /// The loaded toolkit, or 503 when resources are missing
    pub fn toolkit(&self) -> ApiResult<&Toolkit> {
        match &self.nlp {
            NlpStatus::Ready(toolkit) => Ok(toolkit.as_ref()),
            NlpStatus::Unavailable(reason) => Err(ApiError::ServiceUnavailable(format!(
                "NLP resources unavailable: {}",
                reason
            ))),
        }
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            key_phrase_count: self.config.key_phrase_count,
            summary_sentences: self.config.summary_sentences,
        }
    }
}

/// Build application router
///
/// Health, the UI and static assets are public; everything else requires a
/// bearer token.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let protected = Router::new()
        .route("/analyze", post(api::analyze_text))
        .route("/analyses", get(api::list_analyses))
        .route(
            "/analyses/:id",
            get(api::get_analysis).delete(api::delete_analysis),
        )
        .route("/users/me", get(api::current_user))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let mut public = Router::new()
        .route("/", get(api::serve_index))
        .merge(api::health_routes());

    public = match &state.config.static_dir {
        Some(dir) => public.nest_service("/static", ServeDir::new(dir)),
        None => public.route("/static/app.js", get(api::serve_app_js)),
    };

    let config = Arc::clone(&state.config);

    let mut router = Router::new()
        .merge(protected)
        .merge(public)
        .with_state(state)
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http());

    if config.environment.is_production() {
        router = with_security_headers(router);
    }

    router
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(methods)
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

fn with_security_headers(router: Router) -> Router {
    const HEADERS: [(HeaderName, &str); 5] = [
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::X_FRAME_OPTIONS, "DENY"),
        (header::X_XSS_PROTECTION, "1; mode=block"),
        (
            header::STRICT_TRANSPORT_SECURITY,
            "max-age=31536000; includeSubDomains",
        ),
        (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
    ];

    HEADERS.into_iter().fold(router, |router, (name, value)| {
        router.layer(SetResponseHeaderLayer::overriding(
            name,
            HeaderValue::from_static(value),
        ))
    })
}
