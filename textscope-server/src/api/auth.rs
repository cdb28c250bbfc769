//! Bearer token authentication
//!
//! Protected routes require `Authorization: Bearer <token>`. The token's
//! SHA-256 digest is looked up in `users.token_hash`; the matching user is
//! attached to the request as [`CurrentUser`].

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use textscope_common::api::auth::{hash_token, parse_bearer};
use textscope_common::db::User;
use tracing::debug;

use crate::db::users;
use crate::{ApiError, ApiResult, AppState};

/// The authenticated user of the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Authentication middleware
///
/// 401 for a missing, malformed or unknown token; 403 for an inactive user.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token_hash = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer)
        .map(hash_token)
        .ok_or_else(|| ApiError::Unauthorized("Could not validate credentials".to_string()))?;

    let user = users::find_by_token_hash(&state.db, &token_hash)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Could not validate credentials".to_string()))?;

    if !user.is_active {
        return Err(ApiError::Forbidden("Inactive user".to_string()));
    }

    debug!(user = %user.username, "Authenticated request");
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// GET /users/me
pub async fn current_user(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}
