use crate::common::AppError;
use crate::domains::auth::JwtService;
use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// Authenticated staff member from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
}

/// JWT authentication middleware for protected routes
///
/// Missing token → 401, invalid or expired token → 403. On success the
/// `AuthUser` is added to request extensions.
pub async fn require_auth(
    jwt_service: Arc<JwtService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(request.headers(), &jwt_service)?;

    debug!("Authenticated user: {}", user.email);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Extract and verify the token from the Authorization header
fn authenticate(headers: &HeaderMap, jwt_service: &JwtService) -> Result<AuthUser, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthenticated)?;

    let claims = jwt_service.verify_token(token).map_err(|e| {
        debug!("Token rejected: {}", e);
        AppError::InvalidToken
    })?;

    Ok(AuthUser {
        email: claims.email,
    })
}

/// Token from `Bearer <token>` or a raw token value
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
    (!token.is_empty()).then_some(token)
}
