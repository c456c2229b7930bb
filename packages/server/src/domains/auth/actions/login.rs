//! Login action

use tracing::{info, warn};

use crate::common::AppError;
use crate::domains::auth::models::User;
use crate::domains::auth::totp;
use crate::kernel::ServerDeps;

/// Verify password and TOTP code, then issue a bearer token.
///
/// The TOTP code is checked at `unix_time` (the current time for requests).
pub async fn login(
    email: &str,
    password: &str,
    code: &str,
    unix_time: u64,
    deps: &ServerDeps,
) -> Result<String, AppError> {
    let user = User::find_by_email(email, deps.store.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !deps
        .password_hasher
        .verify(password, &user.password_hash)
        .await?
    {
        warn!(email = %email, "Login rejected: incorrect password");
        return Err(AppError::Unauthorized("Incorrect password".into()));
    }

    if !totp::verify_code(&user.totp_secret, code, unix_time)? {
        warn!(email = %email, "Login rejected: invalid TOTP code");
        return Err(AppError::Unauthorized("Invalid TOTP code".into()));
    }

    let token = deps.jwt_service.create_token(&user.email)?;

    info!(email = %email, "Login successful");

    Ok(token)
}
