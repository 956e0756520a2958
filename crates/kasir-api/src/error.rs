//! # API Client Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  reqwest::Error / HTTP status / envelope { success: false }            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiClientError (this module) ← categorized, user-readable             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ConsoleError (kasir-console) ← serialized for the POS page            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Toast on the POS page; cart left untouched                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Failures talking to the admin backend.
///
/// None of these are retried automatically; the cashier retries by hand.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// Could not open a connection.
    #[error("Cannot reach the backend at {url}")]
    Unreachable { url: String },

    /// Request did not complete in time.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Token missing, invalid or expired.
    #[error("Not authorized: {message}")]
    Unauthorized { message: String },

    /// Non-success HTTP status.
    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// HTTP success, but the envelope said `success: false`.
    #[error("Backend rejected the request: {message}")]
    Rejected { message: String },

    /// Response body did not match the expected shape.
    #[error("Unexpected response from backend: {0}")]
    Decode(String),

    /// Client could not be built from configuration.
    #[error("Invalid backend configuration: {0}")]
    InvalidConfig(String),

    /// Any other transport failure.
    #[error("Network error: {0}")]
    Network(String),
}

impl ApiClientError {
    /// Whether the cashier can expect a manual retry to help.
    ///
    /// Transport failures and server errors are worth retrying; rejections
    /// and client errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiClientError::Unreachable { .. }
            | ApiClientError::Timeout { .. }
            | ApiClientError::Network(_) => true,
            ApiClientError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for backend calls.
pub type ApiResult<T> = Result<T, ApiClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ApiClientError::Status {
            status: 422,
            message: "stock insufficient".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Backend returned HTTP 422: stock insufficient"
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(ApiClientError::Timeout {
            url: "http://x".to_string()
        }
        .is_transient());
        assert!(ApiClientError::Status {
            status: 503,
            message: String::new()
        }
        .is_transient());
        assert!(!ApiClientError::Status {
            status: 422,
            message: String::new()
        }
        .is_transient());
        assert!(!ApiClientError::Rejected {
            message: String::new()
        }
        .is_transient());
    }
}
