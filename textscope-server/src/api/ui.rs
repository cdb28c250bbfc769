//! UI serving routes
//!
//! The single-page UI is compiled into the binary; `server.static_dir`
//! replaces `/static` with files from disk.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../../ui/index.html");
const APP_JS: &str = include_str!("../../ui/app.js");

/// GET /
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}
