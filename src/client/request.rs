//! Per-call request values

use crate::Result;
use http::Method;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;

/// One outbound call, built fresh for every verb invocation
///
/// The bearer token lives here rather than on the shared transport, so two
/// in-flight calls never see each other's credentials.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: Method,
    url: String,
    body: Option<serde_json::Value>,
    bearer_token: Option<String>,
}

impl OutboundRequest {
    /// Create a request without body or credentials
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            bearer_token: None,
        }
    }

    /// Attach a JSON body when a payload is present
    pub fn with_json_body<P>(mut self, payload: Option<&P>) -> Result<Self>
    where
        P: Serialize + ?Sized,
    {
        self.body = payload.map(serde_json::to_value).transpose()?;
        Ok(self)
    }

    /// Attach a bearer token when one was prepared
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    /// HTTP method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Fully composed URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether a bearer token will be sent
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }

    /// Turn the value into a `reqwest` builder on the shared transport
    pub(crate) fn into_request_builder(self, client: &Client) -> RequestBuilder {
        let mut builder = client.request(self.method, &self.url);

        if let Some(token) = self.bearer_token {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = self.body {
            builder = builder.json(&body);
        }

        builder
    }
}

/// Join a relative path onto the effective base URL
///
/// Leading and trailing slashes on `path` are ignored. A query string stays
/// after the trailing slash.
pub(crate) fn compose_url(base_url: &str, path: &str, include_trailing_slash: bool) -> String {
    let (path, query) = match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    };
    let path = path.trim_matches('/');

    let mut url = String::with_capacity(base_url.len() + path.len() + 2);
    url.push_str(base_url);
    if !path.is_empty() {
        url.push('/');
        url.push_str(path);
    }
    if include_trailing_slash {
        url.push('/');
    }
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    url
}
