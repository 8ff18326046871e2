use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use yatra_core::user::{validate_password, Actor, User};

use crate::error::ApiError;
use crate::middleware::auth::issue_token;
use crate::response::{created, ok, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub nic: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthData {
    pub token: String,
    pub user: User,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthData>>), ApiError> {
    validate_password(&req.password)?;

    if state
        .users
        .find_by_email(&req.email)
        .await
        .map_err(ApiError::internal)?
        .is_some()
    {
        return Err(ApiError::BadRequest("Email already registered".into()));
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::InternalServerError(format!("Password hashing failed: {}", e)))?;

    let user = User::new(
        req.first_name,
        req.last_name,
        req.email,
        password_hash,
        req.phone,
        req.nic,
    )?;
    state
        .users
        .create(&user)
        .await
        .map_err(ApiError::internal)?;

    tracing::info!(user_id = %user.id, "user registered");

    let token = issue_token(&user, &state.auth)?;
    Ok(created(AuthData { token, user }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthData>>, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid credentials".into());

    let user = state
        .users
        .find_by_email(&req.email)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(invalid)?;

    let matches = bcrypt::verify(&req.password, &user.password_hash)
        .map_err(|e| ApiError::InternalServerError(format!("Password check failed: {}", e)))?;
    if !matches {
        return Err(invalid());
    }

    let token = issue_token(&user, &state.auth)?;
    Ok(ok(AuthData { token, user }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .users
        .get(actor.user_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(ok(user))
}
