use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};

use crate::common::{non_empty, AppError};
use crate::domains::auth::actions::{login, register};
use crate::domains::auth::totp;
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    /// `otpauth://` provisioning URI to load into an authenticator app
    pub totp_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    /// Current TOTP code
    #[serde(alias = "totpCode")]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// POST /auth/register (authenticated staff only)
pub async fn register_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let registration = register(body.email, body.password, &state.deps).await?;

    Ok(Json(RegisterResponse {
        message: format!("User {} registered", registration.email),
        totp_secret: registration.provisioning_uri,
    }))
}

/// POST /auth/login (rate limited per client IP)
pub async fn login_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (Some(email), Some(password), Some(code)) = (
        non_empty(body.email),
        body.password.filter(|p| !p.is_empty()),
        non_empty(body.token),
    ) else {
        return Err(AppError::Validation(
            "Missing required fields: email, password, token".into(),
        ));
    };

    let token = login(&email, &password, &code, totp::now_unix(), &state.deps).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}
