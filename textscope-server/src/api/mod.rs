//! HTTP API handlers for textscope-server

pub mod analysis;
pub mod auth;
pub mod health;
pub mod ui;

pub use analysis::{analyze_text, delete_analysis, get_analysis, list_analyses};
pub use auth::{auth_middleware, current_user, CurrentUser};
pub use health::health_routes;
pub use ui::{serve_app_js, serve_index};
