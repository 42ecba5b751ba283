use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use api::{router, AppState};
use auth::{AuthService, JwtMaker, TokenConfig};
use cart::CartService;
use chrono::Duration;
use orderin_core::{migrations, AppConfig, Database, PaymentConfig};
use payment::{MidtransClient, MidtransConfig, PaymentGateway};
use storage::{SqliteSessionStore, SqliteUserStore};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let (config, overrides) = AppConfig::load_with_env().context("failed to load configuration")?;
    for key in &overrides {
        info!(key = %key, "configuration overridden from environment");
    }

    let db = orderin_core::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    migrations::run(&db).await.context("failed to run migrations")?;

    let state = build_state(&config, db)?;
    let app = router::router(Arc::new(state));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn token_duration(key: &str, seconds: i64) -> Result<Duration> {
    Duration::try_seconds(seconds).with_context(|| format!("{key} is out of range: {seconds}"))
}

fn build_state(config: &AppConfig, db: Database) -> Result<AppState> {
    let tokens = TokenConfig {
        access_secret: config.auth.access_token_secret.clone(),
        refresh_secret: config.auth.refresh_token_secret.clone(),
        access_duration: token_duration(
            "auth.access_token_duration_seconds",
            config.auth.access_token_duration_seconds,
        )?,
        refresh_duration: token_duration(
            "auth.refresh_token_duration_seconds",
            config.auth.refresh_token_duration_seconds,
        )?,
    };

    let auth_service = AuthService::new(
        Arc::new(SqliteUserStore::new(db.clone())),
        Arc::new(SqliteSessionStore::new(db.clone())),
        Arc::new(JwtMaker::new()),
        tokens,
    );

    Ok(AppState::new(
        auth_service,
        CartService::new(db),
        PaymentGateway::Midtrans(midtrans_client(&config.payment)),
    ))
}

fn midtrans_client(config: &PaymentConfig) -> MidtransClient {
    if config.midtrans_server_key.is_empty() {
        tracing::warn!("payment.midtrans_server_key is empty; charges will be rejected");
    }

    MidtransClient::new(MidtransConfig {
        server_key: config.midtrans_server_key.clone(),
        is_production: config.is_production,
        gopay_callback_url: config.gopay_callback_url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_duration_out_of_range() {
        assert_eq!(
            token_duration("auth.access_token_duration_seconds", 900).unwrap(),
            Duration::minutes(15)
        );
        assert!(token_duration("auth.refresh_token_duration_seconds", i64::MAX).is_err());
    }
}
