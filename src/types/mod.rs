//! Core types for the payment facade client
//!
//! # Architecture
//!
//! - [`config`] - Client configuration and environment loading
//! - [`payment`] - Payment facade request and response bodies
//! - [`constants`] - Flag names, routes and environment variable names
//!
//! # Examples
//!
//! ```
//! use epr_payment_client::types::ClientConfig;
//! use std::time::Duration;
//!
//! # fn example() -> epr_payment_client::Result<()> {
//! let config = ClientConfig::new("https://payments.example.com", "api", "api://facade/.default")
//!     .with_timeout(Duration::from_secs(30));
//!
//! config.validate()?;
//! assert_eq!(config.effective_base_url(), "https://payments.example.com/api");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod payment;

pub use config::ClientConfig;
pub use constants::{env_vars, routes, ENABLE_AUTHENTICATION_FEATURE};
pub use payment::{
    CompletePaymentRequest, CompletePaymentResponse, PaymentRequest, PaymentStatus,
};
