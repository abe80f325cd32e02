//! User registration and status endpoints

use axum::{extract::State, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::{RegisterUserRequest, RegisterUserResponse, UserStatusResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::services::tokens::{generate_token, hash_token};
use crate::AppState;

/// POST /api/users/register
/// Creates a new user and returns its bearer token. The token is not
/// retrievable afterwards. The body is optional.
pub async fn register(
    State(state): State<AppState>,
    payload: Option<Json<RegisterUserRequest>>,
) -> Result<Json<RegisterUserResponse>> {
    let name = payload
        .and_then(|Json(p)| p.name)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let token = generate_token();
    let user = state.db.create_user(&hash_token(&token), name.as_deref()).await?;

    tracing::info!("Registered new user: {}", user.id);

    Ok(Json(RegisterUserResponse {
        user_id: user.id,
        token,
    }))
}

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<UserStatusResponse>> {
    let user = state
        .db
        .get_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserStatusResponse {
        user_id: user.id,
        name: user.name,
        last_seen_at: user.last_seen_at,
    }))
}
