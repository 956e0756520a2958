//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  ├── CoreError        - Cart and checkout rule violations              │
//! │  └── ValidationError  - Per-field input failures                       │
//! │                                                                         │
//! │  kasir-api errors (separate crate)                                     │
//! │  └── ApiClientError   - Network / backend failures                     │
//! │                                                                         │
//! │  kasir-console errors                                                  │
//! │  └── ConsoleError     - What the POS page sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ConsoleError → POS page           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::{ProductId, WarehouseId};

// =============================================================================
// Core Error
// =============================================================================

/// Checkout rule violations.
///
/// Every variant is recoverable by the cashier: edit the cart, pick another
/// payment type, or select a customer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Quantity update for a product that has no line in the cart.
    #[error("Product {0} is not in the cart")]
    ProductNotInCart(ProductId),

    /// Cart has reached its line limit.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds the allowed maximum.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Sale submitted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart lines come from more than one warehouse.
    ///
    /// A sale request carries a single warehouse, so a mixed cart cannot be
    /// attributed correctly.
    #[error("Cart mixes items from warehouses {warehouses:?}; a sale ships from one warehouse")]
    MixedWarehouses { warehouses: Vec<WarehouseId> },

    /// Credit or partial credit chosen without a customer.
    #[error("A customer must be selected for {payment_type} sales")]
    CustomerRequired { payment_type: String },

    /// Credit evaluator rejected the sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Payment type: credit, total Rp 30.000
    ///      │
    ///      ▼
    /// evaluate_credit() → invalid
    ///      │
    ///      ▼
    /// CreditRejected { message: "Credit limit exceeded. Available credit: Rp 20.000" }
    ///      │
    ///      ▼
    /// Pay button disabled, message shown under the payment type selector
    /// ```
    #[error("{message}")]
    CreditRejected { message: String },

    /// Payment amount is invalid for the chosen payment type.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Per-field input validation errors.
///
/// Reported inline next to the offending field.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the field the error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 10_000,
            max: 9_999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 10000 exceeds maximum allowed (9999)"
        );

        let err = CoreError::CreditRejected {
            message: "Credit limit exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "Credit limit exceeded");
    }

    #[test]
    fn test_validation_error_field() {
        let err = ValidationError::TooShort {
            field: "query".to_string(),
            min: 2,
        };
        assert_eq!(err.field(), "query");
        assert_eq!(err.to_string(), "query must be at least 2 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "payment_method_id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
