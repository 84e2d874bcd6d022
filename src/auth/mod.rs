//! Bearer token acquisition
//!
//! The authenticated client requests a token for its downstream scope through a
//! [`TokenAcquisition`] implementation on every call made while authentication
//! is enabled. Implementations decide whether to cache.
//!
//! - [`StaticTokenProvider`] - returns one fixed token
//! - [`ClientCredentialsTokenProvider`] - OAuth2 client-credentials grant with
//!   per-scope caching
//!
//! # Examples
//!
//! ```no_run
//! use epr_payment_client::auth::{ClientCredentialsConfig, ClientCredentialsTokenProvider, TokenAcquisition};
//!
//! # async fn example() -> epr_payment_client::Result<()> {
//! let provider = ClientCredentialsTokenProvider::new(ClientCredentialsConfig::new(
//!     "https://login.example.com/oauth2/v2.0/token",
//!     "portal-client-id",
//!     "portal-client-secret",
//! ))?;
//!
//! let token = provider
//!     .acquire_token(&["api://payment-facade/.default".to_string()])
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::Result;
use async_trait::async_trait;

pub mod client_credentials;

pub use client_credentials::{ClientCredentialsConfig, ClientCredentialsTokenProvider};

/// Trait for obtaining bearer tokens for a set of scopes
#[async_trait]
pub trait TokenAcquisition: Send + Sync {
    /// Get an access token valid for `scopes`
    async fn acquire_token(&self, scopes: &[String]) -> Result<String>;
}

/// Token provider that always returns the same token
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl StaticTokenProvider {
    /// Create a provider for a fixed token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenAcquisition for StaticTokenProvider {
    async fn acquire_token(&self, _scopes: &[String]) -> Result<String> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token_provider() {
        let provider = StaticTokenProvider::new("test-token");
        let token = provider
            .acquire_token(&["scope".to_string()])
            .await
            .unwrap();
        assert_eq!(token, "test-token");
        assert!(!format!("{:?}", provider).contains("test-token"));
    }
}
