//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain actions.
//! The document store sits behind a trait so tests run against the in-memory store.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::config::Config;
use crate::domains::auth::{JwtService, PasswordHasher};
use crate::kernel::{
    BaseDocumentStore, KeyedLocks, MemoryDocumentStore, Notifier, PostgresDocumentStore,
};

/// Server dependencies accessible to actions
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseDocumentStore>,
    /// Broadcast of mutations to real-time listeners
    pub notifier: Notifier,
    /// Advisory locks for check-then-write sequences
    pub locks: KeyedLocks,
    /// JWT service for token creation and verification
    pub jwt_service: Arc<JwtService>,
    pub password_hasher: PasswordHasher,
    /// Issuer shown by authenticator apps
    pub totp_issuer: String,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        store: Arc<dyn BaseDocumentStore>,
        notifier: Notifier,
        jwt_service: Arc<JwtService>,
        password_hasher: PasswordHasher,
        totp_issuer: String,
    ) -> Self {
        Self {
            store,
            notifier,
            locks: KeyedLocks::new(),
            jwt_service,
            password_hasher,
            totp_issuer,
        }
    }

    /// Production dependencies for the given store and configuration
    pub fn from_config(store: Arc<dyn BaseDocumentStore>, config: &Config) -> Self {
        Self::new(
            store,
            Notifier::new(),
            Arc::new(JwtService::new(
                &config.jwt_secret,
                config.jwt_issuer.clone(),
                config.jwt_ttl,
            )),
            PasswordHasher::new(config.bcrypt_cost),
            config.totp_issuer.clone(),
        )
    }
}

/// Open the document store: Postgres when `DATABASE_URL` is set, in-memory otherwise
pub async fn connect_store(config: &Config) -> Result<Arc<dyn BaseDocumentStore>> {
    let Some(database_url) = &config.database_url else {
        warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
        return Ok(Arc::new(MemoryDocumentStore::new()));
    };

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected");

    info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations complete");

    Ok(Arc::new(PostgresDocumentStore::new(pool)))
}
