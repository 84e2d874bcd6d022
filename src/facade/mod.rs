//! Payment Facade service
//!
//! [`PaymentFacadeService`] is the portal-side view of the Payment Facade API.
//! It owns one [`AuthenticatedHttpClient`] and maps each facade operation onto
//! a relative path under the configured endpoint segment.
//!
//! # Examples
//!
//! ```no_run
//! use epr_payment_client::auth::StaticTokenProvider;
//! use epr_payment_client::facade::PaymentFacadeService;
//! use epr_payment_client::feature_flags::EnvFeatureFlags;
//! use epr_payment_client::types::{ClientConfig, PaymentRequest};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use uuid::Uuid;
//!
//! # async fn example() -> epr_payment_client::Result<()> {
//! let service = PaymentFacadeService::from_config(
//!     &ClientConfig::from_env()?,
//!     Arc::new(StaticTokenProvider::new("token")),
//!     Arc::new(EnvFeatureFlags::new()),
//! )?;
//!
//! let request = PaymentRequest::new(
//!     Uuid::new_v4(),
//!     Uuid::new_v4(),
//!     "REF-2024-001",
//!     "GB-ENG",
//!     2500,
//!     "https://portal.example.com/payments/return",
//! );
//!
//! let redirect = service
//!     .initiate_payment(&request, &CancellationToken::new())
//!     .await?;
//! println!("Redirecting to gateway: {}", redirect);
//! # Ok(())
//! # }
//! ```

use crate::auth::TokenAcquisition;
use crate::client::AuthenticatedHttpClient;
use crate::feature_flags::FeatureFlags;
use crate::types::{
    routes, ClientConfig, CompletePaymentRequest, CompletePaymentResponse, PaymentRequest,
};
use crate::{PaymentClientError, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;


/// Client for the Payment Facade API
#[derive(Debug, Clone)]
pub struct PaymentFacadeService {
    client: AuthenticatedHttpClient,
}

impl PaymentFacadeService {
    /// Wrap an existing authenticated client
    pub fn new(client: AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    /// Build the underlying client from configuration
    pub fn from_config(
        config: &ClientConfig,
        token_acquisition: Arc<dyn TokenAcquisition>,
        feature_flags: Arc<dyn FeatureFlags>,
    ) -> Result<Self> {
        AuthenticatedHttpClient::from_config(config, token_acquisition, feature_flags).map(Self::new)
    }

    /// Underlying client
    pub fn client(&self) -> &AuthenticatedHttpClient {
        &self.client
    }

    /// Start a payment and return the facade's response content
    ///
    /// The content is the gateway redirect the portal forwards the user to.
    pub async fn initiate_payment(
        &self,
        request: &PaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<String> {
        request.validate()?;

        tracing::info!(
            "Initiating payment {} for organisation {}",
            request.reference,
            request.organisation_id
        );

        self.client
            .post::<String, _>(routes::PAYMENTS, Some(request), cancel)
            .await
    }

    /// Finalise a payment after the gateway redirects back
    pub async fn complete_payment(
        &self,
        external_payment_id: Uuid,
        request: &CompletePaymentRequest,
        cancel: &CancellationToken,
    ) -> Result<CompletePaymentResponse> {
        let response: CompletePaymentResponse = self
            .client
            .post(&routes::complete_payment(&external_payment_id), Some(request), cancel)
            .await?;

        tracing::info!(
            "Payment {} completed with status {:?}",
            external_payment_id,
            response.status
        );

        Ok(response)
    }

    /// Check whether the facade answers its health endpoint
    ///
    /// A non-success status is reported as `Ok(false)`. Any other failure is
    /// returned as an error.
    pub async fn health_check(&self, cancel: &CancellationToken) -> Result<bool> {
        match self
            .client
            .get_with_options::<serde_json::Value>(routes::HEALTH, cancel, false)
            .await
        {
            Ok(_) => Ok(true),
            Err(PaymentClientError::ResponseCode { status, message }) => {
                tracing::warn!("Payment facade unhealthy ({}): {}", status, message);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
