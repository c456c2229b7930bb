//! CLI for creating staff accounts
//!
//! Registering through the API requires an existing bearer token, so the
//! first account is created here, directly against the configured store.

use anyhow::{bail, Context, Result};
use clap::Parser;
use directory_core::domains::auth::actions::register;
use directory_core::kernel::{connect_store, ServerDeps};
use directory_core::Config;

#[derive(Parser)]
#[command(name = "create_user")]
#[command(about = "Create a staff account and print its TOTP provisioning URI")]
struct Cli {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "CREATE_USER_PASSWORD")]
    password: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    if config.database_url.is_none() {
        bail!("DATABASE_URL must be set: accounts in the in-memory store do not survive this process");
    }

    let store = connect_store(&config).await?;
    let deps = ServerDeps::from_config(store, &config);

    let registration = register(Some(cli.email), Some(cli.password), &deps)
        .await
        .context("Failed to create user")?;

    println!("Created {}", registration.email);
    println!("Add this URI to an authenticator app:");
    println!("{}", registration.provisioning_uri);

    Ok(())
}
