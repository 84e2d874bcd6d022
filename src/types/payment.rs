//! Payment facade request and response types

use crate::{PaymentClientError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to start a payment with the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// User making the payment
    pub user_id: Uuid,
    /// Organisation the payment is made for
    pub organisation_id: Uuid,
    /// Caller's payment reference
    pub reference: String,
    /// Regulator the fee is owed to
    pub regulator: String,
    /// Amount in pence
    pub amount: i64,
    /// Where the gateway sends the user afterwards
    pub return_url: String,
    /// Free-text description shown on the gateway page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Kind of party requesting the payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requestor_type: Option<String>,
}

impl PaymentRequest {
    /// Create a new payment request
    pub fn new(
        user_id: Uuid,
        organisation_id: Uuid,
        reference: impl Into<String>,
        regulator: impl Into<String>,
        amount: i64,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            organisation_id,
            reference: reference.into(),
            regulator: regulator.into(),
            amount,
            return_url: return_url.into(),
            description: None,
            requestor_type: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the requestor type
    pub fn with_requestor_type(mut self, requestor_type: impl Into<String>) -> Self {
        self.requestor_type = Some(requestor_type.into());
        self
    }

    /// Reject requests the facade would refuse anyway
    pub fn validate(&self) -> Result<()> {
        if self.reference.trim().is_empty() {
            return Err(PaymentClientError::validation("reference cannot be empty"));
        }
        if self.regulator.trim().is_empty() {
            return Err(PaymentClientError::validation("regulator cannot be empty"));
        }
        if self.amount <= 0 {
            return Err(PaymentClientError::validation(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        if self.return_url.trim().is_empty() {
            return Err(PaymentClientError::validation("return_url cannot be empty"));
        }
        Ok(())
    }
}

/// Request to finalise a payment after the gateway callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePaymentRequest {
    pub user_id: Uuid,
    pub organisation_id: Uuid,
}

/// Outcome of a payment as reported by the facade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum PaymentStatus {
    Initiated,
    InProgress,
    Success,
    Failed,
    #[default]
    Error,
    Cancelled,
}

impl PaymentStatus {
    /// Whether the payment reached a final state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Initiated | Self::InProgress)
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "initiated" => Self::Initiated,
            "inprogress" => Self::InProgress,
            "success" => Self::Success,
            "failed" => Self::Failed,
            "cancelled" => Self::Cancelled,
            _ => Self::Error,
        }
    }
}

/// Result of completing a payment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePaymentResponse {
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulator: Option<String>,
    /// Amount in pounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn sample_request() -> PaymentRequest {
        PaymentRequest::new(
            Uuid::nil(),
            Uuid::nil(),
            "REF-001",
            "GB-ENG",
            2500,
            "https://portal.example.com/callback",
        )
    }

    #[test]
    fn test_payment_request_serializes_camel_case() {
        let request = sample_request().with_description("Registration fee");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["organisationId"], json!(Uuid::nil()));
        assert_eq!(value["returnUrl"], "https://portal.example.com/callback");
        assert_eq!(value["description"], "Registration fee");
        assert!(value.get("requestorType").is_none());
    }

    #[test]
    fn test_payment_request_validation() {
        assert!(sample_request().validate().is_ok());

        let mut request = sample_request();
        request.amount = 0;
        assert!(matches!(
            request.validate(),
            Err(PaymentClientError::Validation { .. })
        ));

        let mut request = sample_request();
        request.reference = " ".to_string();
        assert!(request.validate().is_err());

        let mut request = sample_request();
        request.return_url.clear();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_payment_status_parsing() {
        let status: PaymentStatus = serde_json::from_str("\"Success\"").unwrap();
        assert_eq!(status, PaymentStatus::Success);

        let status: PaymentStatus = serde_json::from_str("\"inProgress\"").unwrap();
        assert_eq!(status, PaymentStatus::InProgress);
        assert!(!status.is_terminal());

        let status: PaymentStatus = serde_json::from_str("\"Refunded\"").unwrap();
        assert_eq!(status, PaymentStatus::Error);
        assert!(status.is_terminal());
    }

    #[test]
    fn test_complete_payment_response_parsing() {
        let response: CompletePaymentResponse = serde_json::from_value(json!({
            "status": "Success",
            "reference": "REF-001",
            "amount": 25.5,
            "email": "payer@example.com"
        }))
        .unwrap();

        assert_eq!(response.status, PaymentStatus::Success);
        assert_eq!(response.reference.as_deref(), Some("REF-001"));
        assert_eq!(response.amount, Some(Decimal::from_str("25.5").unwrap()));
        assert!(response.message.is_none());
    }
}
