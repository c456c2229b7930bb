//! Time-based one-time passwords (RFC 6238) for the login second factor.
//!
//! SHA1, 6 digits, 30 second step, one step of drift tolerated either way.
//! Secrets are 20 random bytes stored base32-encoded.

use anyhow::{anyhow, Result};
use totp_rs::{Algorithm, Secret, TOTP};

const DIGITS: usize = 6;
const SKEW: u8 = 1;
const STEP_SECONDS: u64 = 30;

/// Generate a fresh base32-encoded secret (160 bits of entropy)
pub fn generate_secret() -> String {
    Secret::generate_secret().to_encoded().to_string()
}

fn build(secret: &str, issuer: &str, account: &str) -> Result<TOTP> {
    let bytes = Secret::Encoded(secret.to_string())
        .to_bytes()
        .map_err(|e| anyhow!("Invalid TOTP secret: {e:?}"))?;

    TOTP::new(
        Algorithm::SHA1,
        DIGITS,
        SKEW,
        STEP_SECONDS,
        bytes,
        Some(issuer.to_string()),
        account.to_string(),
    )
    .map_err(|e| anyhow!("Invalid TOTP parameters: {e:?}"))
}

/// `otpauth://` URI for enrolling the secret in an authenticator app
pub fn provisioning_uri(secret: &str, issuer: &str, account: &str) -> Result<String> {
    Ok(build(secret, issuer, account)?.get_url())
}

/// Check a code against the secret at `unix_time`, allowing ±1 step of drift
pub fn verify_code(secret: &str, code: &str, unix_time: u64) -> Result<bool> {
    let totp = build(secret, "verify", "verify")?;
    Ok(totp.check(code.trim(), unix_time))
}

/// The code an authenticator app would show at `unix_time`
pub fn code_at(secret: &str, unix_time: u64) -> Result<String> {
    Ok(build(secret, "verify", "verify")?.generate(unix_time))
}

pub fn now_unix() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
