/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    middleware::CurrentUser,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use faultline_core::{types::User, validation};
use faultline_storage::users;
use serde::{Deserialize, Serialize};

use super::response::Envelope;

/// One message for both unknown email and wrong password, so responses carry
/// no account enumeration signal.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user: User,
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServerError::Validation(format!("{field} is required"))),
    }
}

/// Passwords are taken verbatim: trimming would silently alter a password
/// with intentional leading or trailing spaces.
fn required_verbatim<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServerError::Validation(format!("{field} is required"))),
    }
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let email = required(req.email.as_deref(), "email")?;
    validation::validate_email(email)?;
    let password = required_verbatim(req.password.as_deref(), "password")?;
    validation::validate_password(password)?;
    let name = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty());

    let password_hash = state.auth.hash_password(password)?;
    // A duplicate email surfaces as a unique violation and maps to 409
    let user = users::create(state.db.pool(), email, &password_hash, name).await?;
    let token = state.auth.issue_token(user.id, &user.email)?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            AuthPayload { user, token },
            "User registered successfully",
        )),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Envelope<AuthPayload>>> {
    let email = required(req.email.as_deref(), "email")?;
    let password = required_verbatim(req.password.as_deref(), "password")?;

    let credentials = users::find_by_email(state.db.pool(), email)
        .await?
        .ok_or_else(|| ServerError::Auth(INVALID_CREDENTIALS.to_string()))?;

    if !state
        .auth
        .verify_password(password, &credentials.password_hash)?
    {
        return Err(ServerError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    let user = credentials.user;
    let token = state.auth.issue_token(user.id, &user.email)?;

    Ok(Json(Envelope::data(AuthPayload { user, token })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Envelope<UserPayload>>> {
    // The row can be gone even when the token is still valid
    let user = users::find_by_id(state.db.pool(), current.id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(Json(Envelope::data(UserPayload { user })))
}
