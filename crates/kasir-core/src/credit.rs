//! # Credit Evaluation
//!
//! Decides whether a sale may go on the customer's account.
//!
//! ## Decision
//! ```text
//! payment_type == cash ───────────────────────────────► valid
//!        │
//!        ▼
//! customer / outstanding data missing ────────────────► valid (nothing to check)
//!        │
//!        ▼
//! credit_limit == 0 ──────────────────────────────────► invalid "no credit limit"
//!        │
//!        ▼
//! current_balance + total > credit_limit ─────────────► invalid "available: Rp X"
//!        │
//!        ▼
//!      valid
//! ```
//!
//! The result is recomputed on every change to customer, outstanding data,
//! payment type or cart total and never stored.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CurrencyFormat, CustomerCredit, PaymentType};

/// Message shown when the customer has no credit facility at all.
pub const NO_CREDIT_LIMIT_MESSAGE: &str =
    "Customer has no credit limit set. Contact finance to set one.";

/// Outcome of the credit check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreditValidationResult {
    pub is_valid: bool,
    /// Empty when valid.
    pub message: String,
}

impl CreditValidationResult {
    pub fn valid() -> Self {
        CreditValidationResult {
            is_valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        CreditValidationResult {
            is_valid: false,
            message: message.into(),
        }
    }

    /// Whether this result must disable the pay action.
    ///
    /// Only non-cash sales are ever blocked.
    pub fn blocks_submission(&self, payment_type: PaymentType) -> bool {
        !self.is_valid && payment_type.uses_credit()
    }
}

/// Evaluates whether a sale of `total` may proceed under `payment_type`.
///
/// `credit` is `None` while no customer is selected or their outstanding
/// data has not loaded yet; the sale is not blocked in that case.
///
/// ```rust
/// use kasir_core::credit::evaluate_credit;
/// use kasir_core::money::Money;
/// use kasir_core::types::{CurrencyFormat, CustomerCredit, PaymentType};
///
/// let credit = CustomerCredit::new(Money::from_minor(100_000), Money::from_minor(80_000));
/// let result = evaluate_credit(
///     PaymentType::Credit,
///     Some(&credit),
///     Money::from_minor(30_000),
///     &CurrencyFormat::default(),
/// );
/// assert!(!result.is_valid);
/// assert!(result.message.contains("Rp 20.000"));
/// ```
pub fn evaluate_credit(
    payment_type: PaymentType,
    credit: Option<&CustomerCredit>,
    total: Money,
    currency: &CurrencyFormat,
) -> CreditValidationResult {
    if !payment_type.uses_credit() {
        return CreditValidationResult::valid();
    }

    let Some(credit) = credit else {
        return CreditValidationResult::valid();
    };

    if credit.credit_limit.is_zero() {
        return CreditValidationResult::invalid(NO_CREDIT_LIMIT_MESSAGE);
    }

    let new_balance = credit.current_balance + total;
    if new_balance > credit.credit_limit {
        return CreditValidationResult::invalid(format!(
            "Credit limit exceeded. Available credit: {}",
            currency.format(credit.available_credit())
        ));
    }

    CreditValidationResult::valid()
}

// =============================================================================
// Unit Tests
// =============================================================================
