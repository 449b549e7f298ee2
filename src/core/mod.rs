//! Core types: errors, field validation and the payment wire format

pub mod error;
pub mod payment;
pub mod validation;

pub use error::{ConfigError, FieldValidationError, FormError, GatewayError, ValidationError};
pub use payment::{ErrorBody, INITIATE_PAYMENT_PATH, PaymentAck, PaymentRequest, mask_phone};
pub use validation::{
    AMOUNT_ERROR_MESSAGE, AmountInput, PHONE_ERROR_MESSAGE, ValidationResult, parse_amount,
    validate_amount, validate_phone,
};
