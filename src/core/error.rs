//! Typed error handling for the payment form
//!
//! # Error Categories
//!
//! - [`ConfigError`]: backend configuration could not be loaded or is invalid
//! - [`ValidationError`]: field input was rejected before any network call
//! - [`GatewayError`]: the payment-initiation round trip failed
//!
//! [`FormError`] wraps all three so callers that do not care about the category can
//! propagate with `?`, while callers that do can match on the inner enum:
//!
//! ```rust,ignore
//! match gateway.initiate_payment(&request).await {
//!     Ok(_) => println!("initiated"),
//!     Err(GatewayError::Rejected { body: Some(body), .. }) => println!("{}", body.error),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use crate::core::payment::ErrorBody;
use serde::Serialize;
use thiserror::Error;

/// The main error type for the crate
#[derive(Debug, Error)]
pub enum FormError {
    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Field validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Remote payment service errors
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl FormError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            FormError::Config(_) => "CONFIG_ERROR",
            FormError::Validation(_) => "VALIDATION_ERROR",
            FormError::Gateway(e) => e.error_code(),
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors related to backend configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A required setting was not provided
    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// A setting was provided but is unusable
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// IO error while reading configuration
    #[error("IO error reading config: {message}")]
    IoError { message: String },

    /// The HTTP client could not be constructed from the configuration
    #[error("Failed to build HTTP client: {message}")]
    HttpClient { message: String },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised when form input does not pass validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// One entry per rejected field
    #[error("Validation failed: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

fn rejection_suffix(body: &Option<ErrorBody>) -> String {
    body.as_ref()
        .map(|b| format!(": {}", b.error))
        .unwrap_or_default()
}

/// A single field's validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    /// Flatten into per-field errors
    pub fn field_errors(&self) -> Vec<FieldValidationError> {
        let ValidationError::FieldErrors(errors) = self;
        errors.clone()
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldValidationError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

// =============================================================================
// Gateway Errors
// =============================================================================

/// Failure of the payment-initiation round trip
///
/// The two variants are the only failure shapes the remote service can produce: either a
/// response came back with a non-success status (optionally carrying an [`ErrorBody`]), or
/// no response came back at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// The service answered with a non-2xx status
    #[error("Payment service rejected the request (status {status}){}", rejection_suffix(.body))]
    Rejected {
        status: u16,
        body: Option<ErrorBody>,
    },

    /// No response was received (connect failure, timeout, broken body)
    #[error("Payment service unreachable: {0}")]
    Transport(String),
}

impl GatewayError {
    /// The application-level error string carried by the response, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            GatewayError::Rejected {
                body: Some(body), ..
            } => Some(body.error.as_str()),
            _ => None,
        }
    }

    /// HTTP status of the response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Rejected { status, .. } => Some(*status),
            GatewayError::Transport(_) => None,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Rejected { .. } => "PAYMENT_REJECTED",
            GatewayError::Transport(_) => "SERVICE_UNREACHABLE",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_detail_present() {
        let err = GatewayError::Rejected {
            status: 400,
            body: Some(ErrorBody {
                error: "Insufficient funds".to_string(),
            }),
        };
        assert_eq!(err.detail(), Some("Insufficient funds"));
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("Insufficient funds"));
    }

    #[test]
    fn test_rejected_without_body_has_no_detail() {
        let err = GatewayError::Rejected {
            status: 502,
            body: None,
        };
        assert_eq!(err.detail(), None);
        assert_eq!(err.error_code(), "PAYMENT_REJECTED");
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_transport_has_no_status() {
        let err = GatewayError::Transport("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.detail(), None);
        assert_eq!(err.error_code(), "SERVICE_UNREACHABLE");
    }

    #[test]
    fn test_form_error_codes() {
        let err: FormError = ConfigError::MissingField {
            field: "BACKEND_URL".to_string(),
            context: "environment".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("BACKEND_URL"));

        let err: FormError = GatewayError::Transport("timeout".to_string()).into();
        assert_eq!(err.error_code(), "SERVICE_UNREACHABLE");
    }

    #[test]
    fn test_config_parse_error_with_and_without_file() {
        let err = ConfigError::ParseError {
            file: Some("backend.yaml".to_string()),
            message: "bad indent".to_string(),
        };
        assert!(err.to_string().contains("backend.yaml"));

        let err = ConfigError::ParseError {
            file: None,
            message: "bad indent".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to parse config: bad indent");
    }

    #[test]
    fn test_field_errors_display() {
        let err = ValidationError::FieldErrors(vec![
            FieldValidationError {
                field: "amount".to_string(),
                message: "must be positive".to_string(),
            },
            FieldValidationError {
                field: "phone".to_string(),
                message: "invalid format".to_string(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("amount: must be positive"));
        assert!(msg.contains("phone: invalid format"));
        assert_eq!(err.field_errors().len(), 2);
    }
}
