//! Common constants for flags, headers and environment variables

/// Feature flag that gates bearer-token authentication
pub const ENABLE_AUTHENTICATION_FEATURE: &str = "EnableAuthenticationFeature";

/// Endpoint segment used when none is configured
pub const DEFAULT_ENDPOINT_SEGMENT: &str = "api";

/// Media type sent in the default `Accept` header
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Token request timeout used when none is configured
pub const DEFAULT_TOKEN_TIMEOUT_SECS: u64 = 30;

/// Seconds before expiry at which a cached token is considered stale
pub const TOKEN_EXPIRY_SKEW_SECS: u64 = 60;

/// Payment facade routes, relative to the effective base URL
pub mod routes {
    /// Payment initiation
    pub const PAYMENTS: &str = "payments";
    /// Health probe
    pub const HEALTH: &str = "health";

    /// Completion route for a payment
    pub fn complete_payment(external_payment_id: &uuid::Uuid) -> String {
        format!("{}/{}/complete", PAYMENTS, external_payment_id)
    }
}

/// Environment variables read by the configuration loaders
pub mod env_vars {
    /// Facade base URL
    pub const BASE_URL: &str = "PAYMENT_FACADE_BASE_URL";
    /// Facade endpoint segment
    pub const ENDPOINT: &str = "PAYMENT_FACADE_ENDPOINT";
    /// Downstream scope for token requests
    pub const DOWNSTREAM_SCOPE: &str = "PAYMENT_FACADE_DOWNSTREAM_SCOPE";
    /// Transport timeout in seconds
    pub const TIMEOUT_SECS: &str = "PAYMENT_FACADE_TIMEOUT_SECS";
    /// Transport user agent
    pub const USER_AGENT: &str = "PAYMENT_FACADE_USER_AGENT";
    /// OAuth2 token endpoint
    pub const TOKEN_URL: &str = "PAYMENT_FACADE_TOKEN_URL";
    /// OAuth2 client id
    pub const CLIENT_ID: &str = "PAYMENT_FACADE_CLIENT_ID";
    /// OAuth2 client secret
    pub const CLIENT_SECRET: &str = "PAYMENT_FACADE_CLIENT_SECRET";
    /// Static bearer token
    pub const STATIC_TOKEN: &str = "PAYMENT_FACADE_TOKEN";
    /// Prefix for feature flag variables
    pub const FEATURE_PREFIX: &str = "FEATURE_";
}
