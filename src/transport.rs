//! Transport construction
//!
//! The authenticated client asks a [`TransportFactory`] for exactly one
//! `reqwest::Client` when it is built and reuses it for every call. Connection
//! pooling and timeouts belong to that transport.

use crate::{PaymentClientError, Result};
use http::HeaderMap;
use reqwest::Client;
use std::time::Duration;

/// Produces the HTTP transport used by one client instance
pub trait TransportFactory: Send + Sync {
    /// Build a transport that sends `default_headers` on every request
    fn create_transport(&self, default_headers: HeaderMap) -> Result<Client>;
}

/// Factory that builds `reqwest` clients
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransportFactory {
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ReqwestTransportFactory {
    /// Create a factory with reqwest defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl TransportFactory for ReqwestTransportFactory {
    fn create_transport(&self, default_headers: HeaderMap) -> Result<Client> {
        let mut client_builder = Client::builder().default_headers(default_headers);

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(user_agent) = &self.user_agent {
            client_builder = client_builder.user_agent(user_agent.as_str());
        }

        client_builder
            .build()
            .map_err(|e| PaymentClientError::config(format!("Failed to create HTTP client: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{HeaderValue, ACCEPT};

    #[test]
    fn test_factory_builds_client() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let factory = ReqwestTransportFactory::new()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("epr-payment-client-tests");

        assert_eq!(factory.timeout, Some(Duration::from_secs(5)));
        assert!(factory.create_transport(headers).is_ok());
    }

    #[tokio::test]
    async fn test_default_headers_are_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("accept", "application/json")
            .with_status(200)
            .create_async()
            .await;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = ReqwestTransportFactory::new()
            .create_transport(headers)
            .unwrap();

        let response = client
            .get(format!("{}/ping", server.url()))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        mock.assert_async().await;
    }
}
