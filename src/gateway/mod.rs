//! Payment gateway abstraction
//!
//! The form never talks HTTP directly: it hands a validated [`PaymentRequest`] to a
//! [`PaymentGateway`] and maps the typed outcome to a user-facing message. This keeps the
//! controller testable with an in-process gateway and lets other transports plug in.

pub mod http;

use crate::core::error::GatewayError;
use crate::core::payment::{PaymentAck, PaymentRequest};
use async_trait::async_trait;

pub use http::HttpPaymentGateway;

/// Remote service able to start a payment
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Ask the service to initiate a payment
    ///
    /// Exactly one request is made per call; implementations must not retry.
    async fn initiate_payment(&self, request: &PaymentRequest)
    -> Result<PaymentAck, GatewayError>;
}
