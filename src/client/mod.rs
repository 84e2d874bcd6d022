//! Authenticated JSON client for one downstream service
//!
//! [`AuthenticatedHttpClient`] owns a single transport and exposes verb-scoped
//! methods that compose URLs against a fixed base, attach a bearer token when the
//! `EnableAuthenticationFeature` flag is on, and translate responses into typed
//! values or [`PaymentClientError`]s.
//!
//! # Call sequence
//!
//! Every verb method runs the same steps:
//!
//! 1. Mutating verbs reject an empty path before anything else happens
//! 2. The feature flag is checked and, if enabled, a token is acquired
//! 3. The URL is composed as `{base}/{path}/` (GET may omit the trailing slash)
//! 4. The request is sent and the response interpreted
//!
//! Typed verbs (`get`, `post`, `put`, `delete`) turn a non-success status into
//! [`PaymentClientError::ResponseCode`] carrying the status and body. The
//! fire-and-forget verbs (`post_unit`, `put_unit`, `delete_unit`) discard the
//! body and fail with [`PaymentClientError::ApiCall`].
//!
//! # Examples
//!
//! ```no_run
//! use epr_payment_client::auth::StaticTokenProvider;
//! use epr_payment_client::client::AuthenticatedHttpClient;
//! use epr_payment_client::feature_flags::InMemoryFeatureFlags;
//! use epr_payment_client::types::{ClientConfig, ENABLE_AUTHENTICATION_FEATURE};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> epr_payment_client::Result<()> {
//! let config = ClientConfig::new("https://payments.example.com", "api", "api://facade/.default");
//! let flags = InMemoryFeatureFlags::with_flags([(ENABLE_AUTHENTICATION_FEATURE, true)]);
//!
//! let client = AuthenticatedHttpClient::from_config(
//!     &config,
//!     Arc::new(StaticTokenProvider::new("token")),
//!     Arc::new(flags),
//! )?;
//!
//! let cancel = CancellationToken::new();
//! let healthy: bool = client.get_with_options("health", &cancel, false).await?;
//! client
//!     .post_unit("payments/audit", Some(&serde_json::json!({ "event": "viewed" })), &cancel)
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::auth::TokenAcquisition;
use crate::feature_flags::FeatureFlags;
use crate::transport::{ReqwestTransportFactory, TransportFactory};
use crate::types::constants::JSON_MEDIA_TYPE;
use crate::types::{ClientConfig, ENABLE_AUTHENTICATION_FEATURE};
use crate::{PaymentClientError, Result};
use http::header::{HeaderMap, HeaderValue, ACCEPT};
use http::Method;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub mod request;
pub mod response;


pub use request::OutboundRequest;
pub use response::status_name;

use request::compose_url;
use response::{api_call_message, parse_body, read_body};

/// HTTP client with optional bearer-token authentication
///
/// Clones share the transport and the collaborators.
#[derive(Clone)]
pub struct AuthenticatedHttpClient {
    /// Base URL with the endpoint segment appended
    base_url: String,
    /// Scopes requested from the token provider
    scopes: Arc<[String]>,
    /// Shared transport
    client: Client,
    token_acquisition: Arc<dyn TokenAcquisition>,
    feature_flags: Arc<dyn FeatureFlags>,
}

impl std::fmt::Debug for AuthenticatedHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedHttpClient")
            .field("base_url", &self.base_url)
            .field("scopes", &self.scopes)
            .field("token_acquisition", &"<dyn TokenAcquisition>")
            .field("feature_flags", &"<dyn FeatureFlags>")
            .finish()
    }
}

impl AuthenticatedHttpClient {
    /// Create a new client
    ///
    /// Fails if `base_url` or `endpoint_segment` is missing, if the base URL is
    /// not an http(s) URL, or if the transport cannot be built.
    pub fn new(
        transport_factory: &dyn TransportFactory,
        config: &ClientConfig,
        token_acquisition: Arc<dyn TokenAcquisition>,
        feature_flags: Arc<dyn FeatureFlags>,
    ) -> Result<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        let client = transport_factory.create_transport(default_headers)?;

        Ok(Self {
            base_url: config.effective_base_url(),
            scopes: Arc::from(vec![config.downstream_scope.clone()]),
            client,
            token_acquisition,
            feature_flags,
        })
    }

    /// Create a client whose transport honours the config's timeout and user agent
    pub fn from_config(
        config: &ClientConfig,
        token_acquisition: Arc<dyn TokenAcquisition>,
        feature_flags: Arc<dyn FeatureFlags>,
    ) -> Result<Self> {
        let mut factory = ReqwestTransportFactory::new();
        if let Some(timeout) = config.timeout() {
            factory = factory.with_timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            factory = factory.with_user_agent(user_agent.clone());
        }
        Self::new(&factory, config, token_acquisition, feature_flags)
    }

    /// Effective base URL every path is joined onto
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base}/{path}/` and deserialize the response
    pub async fn get<T>(&self, path: &str, cancel: &CancellationToken) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        self.get_with_options(path, cancel, true).await
    }

    /// GET with control over the trailing slash
    ///
    /// Unlike the mutating verbs an empty path is allowed and targets the base URL.
    pub async fn get_with_options<T>(
        &self,
        path: &str,
        cancel: &CancellationToken,
        include_trailing_slash: bool,
    ) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let token = self.prepare_authentication().await?;
        let request = OutboundRequest::new(
            Method::GET,
            compose_url(&self.base_url, path, include_trailing_slash),
        )
        .with_bearer_token(token);

        self.send_typed(request, cancel).await
    }

    /// POST a JSON payload and deserialize the response
    pub async fn post<T, P>(
        &self,
        path: &str,
        payload: Option<&P>,
        cancel: &CancellationToken,
    ) -> Result<T>
    where
        T: DeserializeOwned + Default,
        P: Serialize + ?Sized,
    {
        let request = self.prepare_request(Method::POST, path, payload).await?;
        self.send_typed(request, cancel).await
    }

    /// POST a JSON payload, ignoring the response body
    pub async fn post_unit<P>(
        &self,
        path: &str,
        payload: Option<&P>,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        P: Serialize + ?Sized,
    {
        let request = self.prepare_request(Method::POST, path, payload).await?;
        self.send_unit(request, cancel).await
    }

    /// PUT a JSON payload and deserialize the response
    pub async fn put<T, P>(
        &self,
        path: &str,
        payload: Option<&P>,
        cancel: &CancellationToken,
    ) -> Result<T>
    where
        T: DeserializeOwned + Default,
        P: Serialize + ?Sized,
    {
        let request = self.prepare_request(Method::PUT, path, payload).await?;
        self.send_typed(request, cancel).await
    }

    /// PUT a JSON payload, ignoring the response body
    pub async fn put_unit<P>(
        &self,
        path: &str,
        payload: Option<&P>,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        P: Serialize + ?Sized,
    {
        let request = self.prepare_request(Method::PUT, path, payload).await?;
        self.send_unit(request, cancel).await
    }

    /// DELETE with an optional JSON payload and deserialize the response
    pub async fn delete<T, P>(
        &self,
        path: &str,
        payload: Option<&P>,
        cancel: &CancellationToken,
    ) -> Result<T>
    where
        T: DeserializeOwned + Default,
        P: Serialize + ?Sized,
    {
        let request = self.prepare_request(Method::DELETE, path, payload).await?;
        self.send_typed(request, cancel).await
    }

    /// DELETE with an optional JSON payload, ignoring the response body
    pub async fn delete_unit<P>(
        &self,
        path: &str,
        payload: Option<&P>,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        P: Serialize + ?Sized,
    {
        let request = self.prepare_request(Method::DELETE, path, payload).await?;
        self.send_unit(request, cancel).await
    }

    /// Decide whether this call carries a bearer token
    ///
    /// A failing flag check is returned as-is. Token failures and empty tokens
    /// become [`PaymentClientError::AuthenticationPreparation`].
    async fn prepare_authentication(&self) -> Result<Option<String>> {
        if !self
            .feature_flags
            .is_enabled(ENABLE_AUTHENTICATION_FEATURE)
            .await?
        {
            return Ok(None);
        }

        let token = self
            .token_acquisition
            .acquire_token(&self.scopes)
            .await
            .map_err(|e| {
                tracing::error!("Token acquisition failed: {}", e);
                PaymentClientError::authentication("token acquisition failed", Some(e))
            })?;

        if token.trim().is_empty() {
            return Err(PaymentClientError::authentication(
                "token acquisition returned an empty token",
                None,
            ));
        }

        Ok(Some(token))
    }

    /// Validate the path, authenticate and build a mutating request
    async fn prepare_request<P>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&P>,
    ) -> Result<OutboundRequest>
    where
        P: Serialize + ?Sized,
    {
        if path.trim().is_empty() {
            return Err(PaymentClientError::invalid_path(format!(
                "{} requires a non-empty path",
                method
            )));
        }

        let token = self.prepare_authentication().await?;

        OutboundRequest::new(method, compose_url(&self.base_url, path, true))
            .with_json_body(payload)
            .map(|request| request.with_bearer_token(token))
    }

    /// Send the request, racing it against cancellation
    async fn dispatch(
        &self,
        request: OutboundRequest,
        cancel: &CancellationToken,
    ) -> Result<Response> {
        tracing::debug!(
            "Sending {} request to: {} (authenticated: {})",
            request.method(),
            request.url(),
            request.is_authenticated()
        );

        let builder = request.into_request_builder(&self.client);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PaymentClientError::Cancelled),
            result = builder.send() => result.map_err(|e| {
                tracing::error!("Request failed before a response was received: {}", e);
                PaymentClientError::Transport(e)
            }),
        }
    }

    async fn send_typed<T>(&self, request: OutboundRequest, cancel: &CancellationToken) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let url = request.url().to_string();
        let response = self.dispatch(request, cancel).await?;
        let status = response.status();

        if !status.is_success() {
            let body = match read_body(response, cancel).await {
                Ok(body) => body,
                Err(PaymentClientError::Cancelled) => return Err(PaymentClientError::Cancelled),
                Err(_) => String::new(),
            };
            tracing::warn!("{} returned status {}: {}", url, status, body);
            return Err(PaymentClientError::response_code(status, body));
        }

        let body = read_body(response, cancel).await?;
        parse_body(&body)
    }

    async fn send_unit(&self, request: OutboundRequest, cancel: &CancellationToken) -> Result<()> {
        let url = request.url().to_string();
        let response = self.dispatch(request, cancel).await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!("{} returned status {}", url, status);
            return Err(PaymentClientError::ApiCall(api_call_message(status)));
        }

        Ok(())
    }
}
