// src/api/http/users.rs

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult, IntoApiError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
}

/// Create (or look up) a user by name so chat and journal rows have an owner.
pub async fn register_user(
    State(app_state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(ApiError::bad_request("Username is required."));
    }

    let id = app_state
        .store
        .ensure_user(username)
        .await
        .into_api_error("Failed to register user")?;

    info!(user_id = id, "User registered");
    Ok(Json(RegisterResponse {
        id,
        username: username.to_string(),
    }))
}
