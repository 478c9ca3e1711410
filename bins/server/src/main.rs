//! Wallet API Server
//!
//! Main entry point for the wallet ledger service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallet_api::{AppState, create_router};
use wallet_core::limits::LimitPolicy;
use wallet_db::{connect_with, run_migrations};
use wallet_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect_with(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    if config.database.run_migrations {
        run_migrations(&db).await?;
        info!("Database migrations applied");
    }

    // Create JWT service
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_secs: i64::try_from(config.jwt.access_token_expiry_secs)
            .context("jwt.access_token_expiry_secs is out of range")?,
    });

    // Daily limits
    let limits = LimitPolicy::from_settings(&config.limits)?;
    info!(
        deposit_daily = %config.limits.deposit_daily,
        withdraw_daily = %config.limits.withdraw_daily,
        timezone = %limits.timezone(),
        "Daily limits configured"
    );

    // Create router
    let app = create_router(AppState::new(db, jwt_service, limits));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
