//! # EPR Payment Facade Client
//!
//! An **authenticated, type-safe** HTTP client for the EPR Payment Facade API.
//!
//! ## Features
//!
//! - **Feature-flagged authentication**: Bearer tokens are attached only while
//!   `EnableAuthenticationFeature` is on, checked on every call
//! - **Per-request credentials**: Each call carries its own token, so concurrent
//!   calls never share authentication state
//! - **Typed responses**: JSON bodies deserialize into any `Default` type; plain
//!   text bodies convert to strings, booleans and numbers
//! - **Cancellation**: Every call accepts a `CancellationToken`
//! - **Pluggable collaborators**: Transport, token acquisition and feature flags
//!   are traits with ready-made implementations
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use epr_payment_client::{
//!     auth::{ClientCredentialsConfig, ClientCredentialsTokenProvider},
//!     feature_flags::EnvFeatureFlags,
//!     types::{ClientConfig, CompletePaymentRequest},
//!     PaymentFacadeService,
//! };
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new(
//!         "https://payment-facade.example.com",
//!         "api",
//!         "api://payment-facade/.default",
//!     )
//!     .with_timeout(std::time::Duration::from_secs(30));
//!
//!     let tokens = ClientCredentialsTokenProvider::new(ClientCredentialsConfig::new(
//!         "https://login.example.com/oauth2/v2.0/token",
//!         "portal-client-id",
//!         "portal-client-secret",
//!     ))?;
//!
//!     let service = PaymentFacadeService::from_config(
//!         &config,
//!         Arc::new(tokens),
//!         Arc::new(EnvFeatureFlags::new()),
//!     )?;
//!
//!     let response = service
//!         .complete_payment(
//!             Uuid::new_v4(),
//!             &CompletePaymentRequest {
//!                 user_id: Uuid::new_v4(),
//!                 organisation_id: Uuid::new_v4(),
//!             },
//!             &CancellationToken::new(),
//!         )
//!         .await?;
//!
//!     println!("Payment status: {:?}", response.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`client`**: The authenticated HTTP client and its verb methods
//! - **`facade`**: Payment Facade operations built on the client
//! - **`auth`**: Token acquisition trait and providers
//! - **`feature_flags`**: Feature flag trait and providers
//! - **`transport`**: Factory for the shared `reqwest` transport
//! - **`types`**: Configuration, constants and payment DTOs
//! - **`error`**: Error type shared by every module

pub mod auth;
pub mod client;
pub mod error;
pub mod facade;
pub mod feature_flags;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use auth::{StaticTokenProvider, TokenAcquisition};
pub use client::AuthenticatedHttpClient;
pub use error::{PaymentClientError, Result};
pub use facade::PaymentFacadeService;
pub use feature_flags::FeatureFlags;
pub use transport::{ReqwestTransportFactory, TransportFactory};
pub use types::*;

/// Current version of the client library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_authentication_flag_name() {
        assert_eq!(ENABLE_AUTHENTICATION_FEATURE, "EnableAuthenticationFeature");
    }

    #[test]
    fn test_routes() {
        let id = uuid::Uuid::nil();
        assert_eq!(routes::PAYMENTS, "payments");
        assert_eq!(
            routes::complete_payment(&id),
            "payments/00000000-0000-0000-0000-000000000000/complete"
        );
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<AuthenticatedHttpClient>();
        assert_send_sync::<PaymentFacadeService>();
    }
}
