//! Register action

use tracing::{info, warn};

use crate::common::{non_empty, AppError};
use crate::domains::auth::models::User;
use crate::domains::auth::totp;
use crate::kernel::ServerDeps;

/// Result of registering a user
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    /// `otpauth://` URI for the authenticator app
    pub provisioning_uri: String,
}

/// `local@domain`, with no whitespace and no `:` (the separator in the
/// authenticator label)
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
        && !email.contains(|c: char| c.is_whitespace() || c == ':')
}

/// Register a new staff account.
///
/// Hashes the password, generates a TOTP secret and stores both.
/// Fails with `Conflict` if the email is already registered.
pub async fn register(
    email: Option<String>,
    password: Option<String>,
    deps: &ServerDeps,
) -> Result<Registration, AppError> {
    let email = non_empty(email)
        .ok_or_else(|| AppError::Validation("Missing required fields: email, password".into()))?;
    let password = password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("Missing required fields: email, password".into()))?;

    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email address".into()));
    }

    if User::find_by_email(&email, deps.store.as_ref())
        .await?
        .is_some()
    {
        warn!(email = %email, "Registration rejected: email already registered");
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let password_hash = deps.password_hasher.hash(&password).await?;
    let totp_secret = totp::generate_secret();
    let provisioning_uri = totp::provisioning_uri(&totp_secret, &deps.totp_issuer, &email)?;

    let user = User {
        email: email.clone(),
        password_hash,
        totp_secret,
    };

    // A concurrent registration may have claimed the email since the check
    if !user.insert(deps.store.as_ref()).await? {
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    info!(email = %email, "User registered");

    Ok(Registration {
        email,
        provisioning_uri,
    })
}
