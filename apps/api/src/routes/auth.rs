//! Registration, login and the current-user endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use moto_core::validation;
use moto_core::{Role, User};
use moto_db::NewUser;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Same message for unknown email and wrong password.
const BAD_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validation::validate_person_name(&req.name)?;
    let email = validation::validate_email(&req.email)?;
    validation::validate_password(&req.password)?;
    let phone = validation::validate_phone(&req.phone)?;

    let password_hash = hash_password(&req.password)?;

    let user = state
        .db
        .users()
        .create(NewUser {
            name: req.name.trim().to_string(),
            email,
            password_hash,
            phone: Some(phone),
            role: Role::User,
        })
        .await?;

    info!(user_id = %user.id, "User registered");

    let token = state.jwt.issue(&user)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = validation::normalize_email(&req.email);

    let Some(mut user) = state.db.users().get_by_email(&email).await? else {
        warn!("Login for unknown email");
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    };

    if !verify_password(&req.password, &user.password_hash) {
        warn!(user_id = %user.id, "Login with wrong password");
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    let role = state.admins.resolve_role(&user.email, user.role);
    if role != user.role {
        user = state.db.users().set_role(&user.id, role).await?;
        info!(user_id = %user.id, "Promoted to admin by allow-list");
    }

    let token = state.jwt.issue(&user)?;
    Ok(Json(AuthResponse { token, user }))
}

pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
