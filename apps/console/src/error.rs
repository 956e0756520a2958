//! # Console Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kasir                                  │
//! │                                                                         │
//! │  POS page                    Rust session                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  submit_sale()                                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ConsoleError>                                         │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Field invalid? ──── ValidationError ───────────┐               │  │
//! │  │         │                                        │               │  │
//! │  │         ▼                                        ▼               │  │
//! │  │  Rule broken? ────── CoreError ─────────── ConsoleError ───────►│  │
//! │  │         │                                        ▲               │  │
//! │  │         ▼                                        │               │  │
//! │  │  Backend failed? ─── ApiClientError ─────────────┘               │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "CREDIT_REJECTED",                                           │
//! │    "message": "Credit limit exceeded. Available credit: Rp 20.000" }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is fatal: every error leaves the session usable.

use serde::Serialize;
use tracing::error;

use kasir_api::ApiClientError;
use kasir_core::{CoreError, ValidationError};

use crate::state::ConfigError;

/// Error returned from console commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "terms_days must be between 0 and 365",
///   "field": "terms_days",
///   "retryable": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Offending form field, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Whether trying the same action again may succeed
    pub retryable: bool,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced item does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Cart operation failed
    CartError,

    /// Payment form is incomplete or inconsistent
    PaymentError,

    /// Credit or partial credit without a customer
    CustomerRequired,

    /// Credit evaluator blocked the sale
    CreditRejected,

    /// A sale is already being submitted
    SubmissionInProgress,

    /// No open cash session on this register
    CashSessionClosed,

    /// Backend could not be reached or failed
    BackendUnavailable,

    /// Backend refused the request
    BackendRejected,

    /// Backend refused the API token
    Unauthorized,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error
    Internal,
}

impl ConsoleError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ConsoleError {
            code,
            message: message.into(),
            field: None,
            retryable: false,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ConsoleError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error bound to a field.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ConsoleError {
            field: Some(field.to_string()),
            ..ConsoleError::new(ErrorCode::ValidationError, message)
        }
    }

    pub fn submission_in_progress() -> Self {
        ConsoleError::new(
            ErrorCode::SubmissionInProgress,
            "A sale is already being submitted",
        )
    }

    pub fn cash_session_closed() -> Self {
        ConsoleError::new(
            ErrorCode::CashSessionClosed,
            "No open cash session. Open the register before selling.",
        )
    }

    fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl From<ValidationError> for ConsoleError {
    fn from(err: ValidationError) -> Self {
        ConsoleError::validation(err.field(), err.to_string())
    }
}

/// Converts core errors to console errors.
impl From<CoreError> for ConsoleError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotInCart(id) => ConsoleError::not_found("Cart line for product", id),
            CoreError::CartTooLarge { .. } | CoreError::EmptyCart | CoreError::MixedWarehouses { .. } => {
                ConsoleError::new(ErrorCode::CartError, err.to_string())
            }
            CoreError::QuantityTooLarge { .. } => {
                ConsoleError::validation("quantity", err.to_string())
            }
            CoreError::CustomerRequired { .. } => {
                ConsoleError::new(ErrorCode::CustomerRequired, err.to_string())
            }
            CoreError::CreditRejected { message } => {
                ConsoleError::new(ErrorCode::CreditRejected, message)
            }
            CoreError::InvalidPaymentAmount { .. } => ConsoleError {
                field: Some("amount".to_string()),
                ..ConsoleError::new(ErrorCode::PaymentError, err.to_string())
            },
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Converts backend errors to console errors.
impl From<ApiClientError> for ConsoleError {
    fn from(err: ApiClientError) -> Self {
        let transient = err.is_transient();
        let converted = match &err {
            ApiClientError::Unauthorized { .. } => {
                ConsoleError::new(ErrorCode::Unauthorized, err.to_string())
            }
            ApiClientError::Rejected { message } => {
                ConsoleError::new(ErrorCode::BackendRejected, message.clone())
            }
            ApiClientError::Status { status, message } if *status < 500 => {
                ConsoleError::new(ErrorCode::BackendRejected, message.clone())
            }
            ApiClientError::Decode(detail) => {
                error!(%detail, "Backend response could not be decoded");
                ConsoleError::new(ErrorCode::Internal, "Unexpected response from backend")
            }
            ApiClientError::InvalidConfig(_) => {
                ConsoleError::new(ErrorCode::ConfigError, err.to_string())
            }
            _ => ConsoleError::new(ErrorCode::BackendUnavailable, err.to_string()),
        };

        if transient {
            converted.retryable()
        } else {
            converted
        }
    }
}

impl From<ConfigError> for ConsoleError {
    fn from(err: ConfigError) -> Self {
        ConsoleError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ConsoleError {}

/// Result type alias for console commands.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
