//! `/api/users` and `/api/login` handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use store::{NewUser, Session, UserInfo};
use tracing::{info, warn};

use crate::{
    auth::{hash_password, verify_password, MIN_CREDENTIAL_LEN},
    error::{ApiError, ApiJson},
    state::BloglistState,
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("invalid username or password".to_string())
}

pub async fn list_users(
    State(state): State<BloglistState>,
) -> Result<Json<Vec<UserInfo>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users.iter().map(|u| u.to_info()).collect()))
}

pub async fn create_user(
    State(state): State<BloglistState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserInfo>), ApiError> {
    let username = request.username.trim().to_string();
    if username.chars().count() < MIN_CREDENTIAL_LEN {
        return Err(ApiError::Validation(format!(
            "username must be at least {MIN_CREDENTIAL_LEN} characters long"
        )));
    }
    if request.password.chars().count() < MIN_CREDENTIAL_LEN {
        return Err(ApiError::Validation(format!(
            "password must be at least {MIN_CREDENTIAL_LEN} characters long"
        )));
    }

    let password_hash = hash_password(&request.password).map_err(ApiError::Internal)?;
    let user = state
        .users
        .insert(NewUser {
            username,
            name: request.name.trim().to_string(),
            password_hash,
        })
        .await?;

    info!("Registered user {}", user.username);
    Ok((StatusCode::CREATED, Json(user.to_info())))
}

pub async fn login(
    State(state): State<BloglistState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<Session>, ApiError> {
    let Some(user) = state.users.find_by_username(request.username.trim()).await? else {
        warn!("Login attempt for unknown user");
        return Err(invalid_credentials());
    };

    let valid = verify_password(&request.password, &user.password_hash).map_err(ApiError::Internal)?;
    if !valid {
        warn!("Login attempt with wrong password for {}", user.username);
        return Err(invalid_credentials());
    }

    let token = state.keys.issue(&user)?;
    info!("{} logged in", user.username);

    Ok(Json(Session {
        token,
        username: user.username,
        name: user.name,
    }))
}
