//! Client configuration

use crate::types::constants::{env_vars, DEFAULT_ENDPOINT_SEGMENT};
use crate::{PaymentClientError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one logical downstream service
///
/// `base_url` and `endpoint_segment` are combined once into the effective base
/// URL every request is composed against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Root URL of the service, e.g. `https://payments.example.com`
    pub base_url: String,
    /// Path segment appended to the base URL, e.g. `api`
    pub endpoint_segment: String,
    /// Scope requested when authentication is enabled
    #[serde(default)]
    pub downstream_scope: String,
    /// Transport timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// User agent sent by the transport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a new client config
    pub fn new(
        base_url: impl Into<String>,
        endpoint_segment: impl Into<String>,
        downstream_scope: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            endpoint_segment: endpoint_segment.into(),
            downstream_scope: downstream_scope.into(),
            timeout_secs: None,
            user_agent: None,
        }
    }

    /// Set the transport timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Transport timeout, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(PaymentClientError::missing("base_url"));
        }

        if self.endpoint_segment.trim().trim_matches('/').is_empty() {
            return Err(PaymentClientError::missing("endpoint_segment"));
        }

        let parsed = url::Url::parse(self.base_url.trim()).map_err(|e| {
            PaymentClientError::config(format!("base_url '{}' is not a valid URL: {}", self.base_url, e))
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(PaymentClientError::config(
                "base_url must start with http:// or https://",
            ));
        }

        Ok(())
    }

    /// Base URL with the endpoint segment appended and no trailing slash
    pub fn effective_base_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            self.endpoint_segment.trim().trim_matches('/')
        )
    }

    /// Load the configuration from `PAYMENT_FACADE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(env_vars::BASE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| PaymentClientError::missing(env_vars::BASE_URL))?;

        let endpoint_segment = lookup(env_vars::ENDPOINT)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT_SEGMENT.to_string());

        let downstream_scope = lookup(env_vars::DOWNSTREAM_SCOPE).unwrap_or_default();

        let timeout_secs = match lookup(env_vars::TIMEOUT_SECS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                PaymentClientError::config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    env_vars::TIMEOUT_SECS,
                    raw
                ))
            })?),
            None => None,
        };

        let config = Self {
            base_url,
            endpoint_segment,
            downstream_scope,
            timeout_secs,
            user_agent: lookup(env_vars::USER_AGENT),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_effective_base_url_without_trailing_slash() {
        let config = ClientConfig::new("http://example.com", "api", "scope");
        assert_eq!(config.effective_base_url(), "http://example.com/api");
    }

    #[test]
    fn test_effective_base_url_never_doubles_slash() {
        for base in ["http://example.com", "http://example.com/", "http://example.com//"] {
            let config = ClientConfig::new(base, "api", "");
            let url = config.effective_base_url();
            assert_eq!(url, "http://example.com/api");
            assert!(!url.trim_start_matches("http://").contains("//"));
        }
    }

    #[test]
    fn test_validate_requires_base_url() {
        let config = ClientConfig::new("  ", "api", "");
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            PaymentClientError::MissingConfiguration { field: "base_url" }
        ));
    }

    #[test]
    fn test_validate_requires_endpoint_segment() {
        for endpoint in ["", "   ", "/"] {
            let config = ClientConfig::new("http://example.com", endpoint, "");
            let err = config.validate().unwrap_err();
            assert!(matches!(
                err,
                PaymentClientError::MissingConfiguration {
                    field: "endpoint_segment"
                }
            ));
        }
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = ClientConfig::new("ftp://example.com", "api", "");
        assert!(matches!(
            config.validate(),
            Err(PaymentClientError::Config { .. })
        ));

        let config = ClientConfig::new("not a url", "api", "");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_options() {
        let config = ClientConfig::new("https://example.com", "api", "api://facade/.default")
            .with_timeout(Duration::from_secs(15))
            .with_user_agent("epr-portal");

        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.user_agent.as_deref(), Some("epr-portal"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_with_defaults() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[(env_vars::BASE_URL, "https://facade.test")]))
                .unwrap();

        assert_eq!(config.endpoint_segment, DEFAULT_ENDPOINT_SEGMENT);
        assert_eq!(config.downstream_scope, "");
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_from_lookup_reads_all_values() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (env_vars::BASE_URL, "https://facade.test/"),
            (env_vars::ENDPOINT, "v2"),
            (env_vars::DOWNSTREAM_SCOPE, "api://facade/.default"),
            (env_vars::TIMEOUT_SECS, "20"),
        ]))
        .unwrap();

        assert_eq!(config.effective_base_url(), "https://facade.test/v2");
        assert_eq!(config.downstream_scope, "api://facade/.default");
        assert_eq!(config.timeout(), Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_from_lookup_missing_base_url() {
        let err = ClientConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains(env_vars::BASE_URL));
    }

    #[test]
    fn test_from_lookup_invalid_timeout() {
        let err = ClientConfig::from_lookup(lookup_from(&[
            (env_vars::BASE_URL, "https://facade.test"),
            (env_vars::TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, PaymentClientError::Config { .. }));
    }

    #[test]
    fn test_deserialize_camel_case() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"baseUrl":"https://facade.test","endpointSegment":"api","downstreamScope":"s"}"#,
        )
        .unwrap();
        assert_eq!(config, ClientConfig::new("https://facade.test", "api", "s"));
    }
}
