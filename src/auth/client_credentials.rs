//! OAuth2 client-credentials token provider

use super::TokenAcquisition;
use crate::types::constants::{env_vars, DEFAULT_TOKEN_TIMEOUT_SECS, TOKEN_EXPIRY_SKEW_SECS};
use crate::{PaymentClientError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Settings for the client-credentials grant
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentialsConfig {
    /// Token endpoint of the identity provider
    pub token_url: String,
    /// Confidential client id
    pub client_id: String,
    /// Confidential client secret
    pub client_secret: String,
    /// Timeout for token requests, 30 seconds when unset
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ClientCredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentialsConfig")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientCredentialsConfig {
    /// Create a new client-credentials config
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout: None,
        }
    }

    /// Set the token request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Timeout applied to token requests
    pub fn effective_timeout(&self) -> Duration {
        self.timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TOKEN_TIMEOUT_SECS))
    }

    /// Validate the config
    pub fn validate(&self) -> Result<()> {
        if self.token_url.trim().is_empty() {
            return Err(PaymentClientError::missing("token_url"));
        }
        if self.client_id.trim().is_empty() {
            return Err(PaymentClientError::missing("client_id"));
        }
        if self.client_secret.is_empty() {
            return Err(PaymentClientError::missing("client_secret"));
        }
        url::Url::parse(&self.token_url).map_err(|e| {
            PaymentClientError::config(format!("token_url is not a valid URL: {}", e))
        })?;
        Ok(())
    }

    /// Load from `PAYMENT_FACADE_TOKEN_URL`, `_CLIENT_ID` and `_CLIENT_SECRET`
    ///
    /// Returns `Ok(None)` when no token URL is configured.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(token_url) = lookup(env_vars::TOKEN_URL).filter(|v| !v.trim().is_empty()) else {
            return Ok(None);
        };

        let config = Self::new(
            token_url,
            lookup(env_vars::CLIENT_ID).unwrap_or_default(),
            lookup(env_vars::CLIENT_SECRET).unwrap_or_default(),
        );
        config.validate()?;
        Ok(Some(config))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + Duration::from_secs(TOKEN_EXPIRY_SKEW_SECS) < self.expires_at
    }
}

/// Token provider using the OAuth2 client-credentials grant
///
/// Tokens are cached per scope set until shortly before they expire. Tokens
/// returned without `expires_in` are not cached. Every token request is bounded
/// by [`ClientCredentialsConfig::effective_timeout`]; concurrent callers wait
/// on the cache lock while a fetch is in flight.
#[derive(Clone)]
pub struct ClientCredentialsTokenProvider {
    config: ClientCredentialsConfig,
    client: Client,
    cache: Arc<Mutex<HashMap<String, CachedToken>>>,
}

impl std::fmt::Debug for ClientCredentialsTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentialsTokenProvider")
            .field("config", &self.config)
            .finish()
    }
}

impl ClientCredentialsTokenProvider {
    /// Create a new provider
    pub fn new(config: ClientCredentialsConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.effective_timeout())
            .build()
            .map_err(|e| PaymentClientError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            cache: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    async fn request_token(&self, scope: &str) -> Result<TokenResponse> {
        tracing::debug!("Requesting client-credentials token for scope '{}'", scope);

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("scope", scope),
            ])
            .send()
            .await
            .map_err(|e| PaymentClientError::token_acquisition(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            tracing::warn!("Token endpoint returned status {}: {}", status, body);
            return Err(PaymentClientError::token_acquisition(format!(
                "token endpoint returned status {}: {}",
                status, body
            )));
        }

        response.json::<TokenResponse>().await.map_err(|e| {
            PaymentClientError::token_acquisition(format!("invalid token response: {}", e))
        })
    }
}

#[async_trait]
impl TokenAcquisition for ClientCredentialsTokenProvider {
    async fn acquire_token(&self, scopes: &[String]) -> Result<String> {
        let scope = scopes.join(" ");

        // Held across the request so concurrent callers share one token fetch.
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.get(&scope) {
            if cached.is_fresh() {
                return Ok(cached.access_token.clone());
            }
        }

        let token = self.request_token(&scope).await?;
        match token.expires_in {
            Some(expires_in) => {
                cache.insert(
                    scope,
                    CachedToken {
                        access_token: token.access_token.clone(),
                        expires_at: Instant::now() + Duration::from_secs(expires_in),
                    },
                );
            }
            None => {
                cache.remove(&scope);
            }
        }

        Ok(token.access_token)
    }
}
