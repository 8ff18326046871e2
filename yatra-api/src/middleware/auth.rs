use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use yatra_core::user::{Actor, Role, User};

use crate::error::ApiError;
use crate::state::{AppState, AuthConfig};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

pub fn issue_token(user: &User, auth: &AuthConfig) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role.as_str().to_string(),
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(|e| ApiError::InternalServerError(format!("Token encoding failed: {}", e)))
}

fn actor_from_request(state: &AppState, req: &Request) -> Result<Actor, ApiError> {
    let unauthorized = || ApiError::Unauthorized("Not authorized to access this route".into());

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(unauthorized)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| unauthorized())?;

    let user_id = Uuid::parse_str(&token_data.claims.sub).map_err(|_| unauthorized())?;
    let role = Role::parse(&token_data.claims.role).map_err(|_| unauthorized())?;

    Ok(Actor { user_id, role })
}

/// Requires a valid bearer token and injects the caller as an `Actor`
/// request extension.
pub async fn protect(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let actor = actor_from_request(&state, &req)?;
    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}

/// Like `protect`, but additionally requires the admin role.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let actor = actor_from_request(&state, &req)?;
    if !actor.is_admin() {
        return Err(ApiError::Unauthorized(
            "Not authorized to access this route".into(),
        ));
    }
    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}
