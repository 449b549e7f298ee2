//! # mpesa-form
//!
//! A headless M-Pesa payment form: it validates a Kenyan phone number and an amount, then
//! asks a backend to initiate the payment with one `POST {BACKEND_URL}/initiate-payment`.
//!
//! ## Features
//!
//! - **Validators**: pure functions for the phone (`2547XXXXXXXX`) and amount (`> 0`) fields
//! - **Submission controller**: per-field error slots, in-flight guard, result line
//! - **Typed outcomes**: success, application error with payload, or no response at all
//! - **Pluggable gateway**: `reqwest` over HTTP by default, any [`PaymentGateway`] in tests
//! - **Change events**: a broadcast channel renderers can redraw from
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mpesa_form::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = BackendConfig::from_env()?;
//! let form = PaymentForm::new(Arc::new(HttpPaymentGateway::new(&config)?));
//!
//! form.set_phone("254712345678");
//! form.set_amount("100");
//!
//! match form.submit().await {
//!     SubmitOutcome::Succeeded | SubmitOutcome::Failed(_) => {
//!         println!("{}", form.state().result_message.unwrap_or_default());
//!     }
//!     other => println!("not submitted: {:?}", other),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`PaymentGateway`]: gateway::PaymentGateway

pub mod config;
pub mod core;
pub mod form;
pub mod gateway;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Validation ===
    pub use crate::core::validation::{
        AMOUNT_ERROR_MESSAGE, AmountInput, PHONE_ERROR_MESSAGE, ValidationResult,
        validate_amount, validate_phone,
    };

    // === Wire types ===
    pub use crate::core::payment::{ErrorBody, PaymentAck, PaymentRequest};

    // === Errors ===
    pub use crate::core::error::{
        ConfigError, FieldValidationError, FormError, GatewayError, ValidationError,
    };

    // === Gateway ===
    pub use crate::gateway::{HttpPaymentGateway, PaymentGateway};

    // === Form ===
    pub use crate::form::{
        BlockReason, Field, FormEvent, FormEventEnvelope, FormPhase, FormState, FormView,
        PaymentForm, StatusTone, SubmitOutcome, FAILURE_MARKER, FAILURE_PREFIX, SUCCESS_MARKER,
        SUCCESS_MESSAGE, UNREACHABLE_DETAIL,
    };

    // === Config ===
    pub use crate::config::BackendConfig;

    // === External dependencies ===
    pub use async_trait::async_trait;
}
