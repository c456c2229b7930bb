// Login rate limiting using governor
//
// Configuration:
// - Login: LOGIN_RATE_LIMIT_MAX attempts per LOGIN_RATE_LIMIT_WINDOW_SECS per IP
//   (default 3 per 15 minutes). Each spent attempt takes a full window to come
//   back, so no window ever admits more than the maximum.
// - Counts every attempt, successful or not
// - Fully replenished clients are pruned once per window
//
// Applied in app.rs as a route layer on /auth/login

use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::common::AppError;
use crate::config::RateLimitConfig;
use crate::server::middleware::ClientIp;

/// Per-IP limiter for login attempts
#[derive(Clone)]
pub struct LoginRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl LoginRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Result<Self> {
        let burst = NonZeroU32::new(config.max_attempts)
            .context("Login rate limit must allow at least one attempt")?;
        let quota = Quota::with_period(config.window)
            .context("Login rate limit window must be positive")?
            .allow_burst(burst);

        Ok(Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
        })
    }

    /// Record an attempt; `false` once the client is over its quota
    pub fn check(&self, ip: IpAddr) -> bool {
        self.limiter.check_key(&ip).is_ok()
    }

    /// Forget clients whose quota has fully replenished
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Prune every `period` until all clones of this limiter are dropped
    pub fn spawn_pruning(&self, period: Duration) -> JoinHandle<()> {
        let limiter = Arc::downgrade(&self.limiter);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // Skip first immediate tick

            loop {
                interval.tick().await;
                let Some(limiter) = limiter.upgrade() else {
                    break;
                };
                let limiter = LoginRateLimiter { limiter };
                limiter.prune();
                debug!(clients = limiter.tracked_clients(), "Login rate limiter pruned");
            }
        })
    }
}

/// Rejects the request with 429 when the client IP is over quota
pub async fn limit_login_attempts(
    limiter: LoginRateLimiter,
    request: Request,
    next: Next,
) -> Response {
    // Requests without a resolvable address share one bucket
    let ip = request
        .extensions()
        .get::<ClientIp>()
        .map(|ClientIp(ip)| *ip)
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if !limiter.check(ip) {
        warn!(ip = %ip, "Login rate limit exceeded");
        return AppError::RateLimited.into_response();
    }

    next.run(request).await
}
