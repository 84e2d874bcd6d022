//! Payment Facade probe
//!
//! Checks the Payment Facade health endpoint with the same authentication
//! setup the portal uses. Intended for deployment smoke tests.
//!
//! ## Token Providers
//!
//! - **Client credentials**: when `PAYMENT_FACADE_TOKEN_URL` is set
//! - **Static token**: `PAYMENT_FACADE_TOKEN`, otherwise an empty token

use epr_payment_client::{
    auth::{ClientCredentialsConfig, ClientCredentialsTokenProvider, StaticTokenProvider},
    feature_flags::EnvFeatureFlags,
    types::{env_vars, ClientConfig},
    PaymentFacadeService, TokenAcquisition,
};
use std::env;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn token_provider() -> epr_payment_client::Result<Arc<dyn TokenAcquisition>> {
    if let Some(config) = ClientCredentialsConfig::from_env()? {
        tracing::info!("Using client-credentials token provider ({})", config.token_url);
        return Ok(Arc::new(ClientCredentialsTokenProvider::new(config)?));
    }

    let token = env::var(env_vars::STATIC_TOKEN).unwrap_or_default();
    if token.is_empty() {
        tracing::info!("No token configured; authenticated calls will fail");
    }
    Ok(Arc::new(StaticTokenProvider::new(token)))
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ClientConfig::from_env()?;
    let service = PaymentFacadeService::from_config(
        &config,
        token_provider()?,
        Arc::new(EnvFeatureFlags::new()),
    )?;

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted; cancelling health check");
            ctrl_c_cancel.cancel();
        }
    });

    tracing::info!("Probing {}", service.client().base_url());

    match service.health_check(&cancel).await {
        Ok(true) => {
            tracing::info!("Payment facade is healthy");
            Ok(())
        }
        Ok(false) => {
            tracing::error!("Payment facade reported unhealthy");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            std::process::exit(1);
        }
    }
}
