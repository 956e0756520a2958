//! # Payment
//!
//! The payment dialog's draft (`PaymentForm`) and the validated choice it
//! turns into (`PaymentSelection`).
//!
//! ## Form → Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PaymentForm (what the cashier is editing)                              │
//! │    payment_type, method, amount, reference, terms, notes, cash given    │
//! │                        │                                                │
//! │                        │ to_selection(total)                            │
//! │                        ▼                                                │
//! │  PaymentSelection (only valid combinations exist)                       │
//! │    Cash          { method, amount, reference, notes }                   │
//! │    Credit        { terms_days, notes }                                  │
//! │    PartialCredit { method, amount, reference, terms_days, notes }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::sale::PaymentEntry;
use crate::types::{PaymentMethodId, PaymentType};
use crate::validation::{
    validate_notes, validate_payment_amount, validate_reference, validate_terms_days,
};

/// Credit terms applied when the cashier does not pick any.
pub const DEFAULT_TERMS_DAYS: u32 = 30;

// =============================================================================
// Payment Form
// =============================================================================

/// Editable payment state behind the payment dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentForm {
    pub payment_type: PaymentType,
    pub payment_method_id: Option<PaymentMethodId>,
    /// Amount collected now.
    pub amount: Money,
    /// Set once the cashier types an amount; stops the amount following the
    /// cart total.
    pub amount_edited: bool,
    pub reference: Option<String>,
    pub terms_days: u32,
    pub notes: Option<String>,
    /// Cash handed over by the customer, for the change display.
    pub cash_tendered: Option<Money>,
}

impl Default for PaymentForm {
    fn default() -> Self {
        PaymentForm {
            payment_type: PaymentType::Cash,
            payment_method_id: None,
            amount: Money::zero(),
            amount_edited: false,
            reference: None,
            terms_days: DEFAULT_TERMS_DAYS,
            notes: None,
            cash_tendered: None,
        }
    }
}

impl PaymentForm {
    /// A fresh cash form collecting `total`.
    pub fn for_total(total: Money) -> Self {
        PaymentForm {
            amount: total,
            ..PaymentForm::default()
        }
    }

    /// Switches payment type, applying the type's amount default.
    ///
    /// - Cash: amount resets to `total`
    /// - Credit: amount resets to zero
    /// - Partial credit: amount is left for manual entry
    pub fn switch_type(&mut self, payment_type: PaymentType, total: Money) {
        self.payment_type = payment_type;
        match payment_type {
            PaymentType::Cash => {
                self.amount = total;
                self.amount_edited = false;
            }
            PaymentType::Credit => {
                self.amount = Money::zero();
                self.amount_edited = false;
            }
            PaymentType::PartialCredit => {}
        }
    }

    /// Cashier typed an amount.
    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
        self.amount_edited = true;
    }

    /// Keeps an untouched cash amount equal to the cart total after the cart
    /// changes.
    pub fn sync_total(&mut self, total: Money) {
        if self.payment_type == PaymentType::Cash && !self.amount_edited {
            self.amount = total;
        }
    }

    /// Validates the draft against the sale total.
    ///
    /// ## Rules
    /// - Cash: payment method required, amount positive
    /// - Credit: terms within range; nothing is collected now
    /// - Partial credit: payment method required, `0 < amount < total`.
    ///   Collecting the whole total leaves nothing on account, so the
    ///   cashier is told to switch to cash.
    pub fn to_selection(&self, total: Money) -> CoreResult<PaymentSelection> {
        let reference = trimmed(self.reference.as_deref());
        let notes = trimmed(self.notes.as_deref());
        validate_reference(reference.as_deref())?;
        validate_notes(notes.as_deref())?;

        match self.payment_type {
            PaymentType::Cash => {
                let payment_method_id = self.require_method()?;
                validate_payment_amount(self.amount)?;
                Ok(PaymentSelection::Cash {
                    payment_method_id,
                    amount: self.amount,
                    reference,
                    notes,
                })
            }
            PaymentType::Credit => {
                validate_terms_days(self.terms_days)?;
                Ok(PaymentSelection::Credit {
                    terms_days: self.terms_days,
                    notes,
                })
            }
            PaymentType::PartialCredit => {
                let payment_method_id = self.require_method()?;
                validate_payment_amount(self.amount)?;
                validate_terms_days(self.terms_days)?;
                if self.amount >= total {
                    return Err(CoreError::InvalidPaymentAmount {
                        reason: format!(
                            "partial credit must leave part of the total on account \
                             (collected {} of {}); use cash to collect it all",
                            self.amount, total
                        ),
                    });
                }
                Ok(PaymentSelection::PartialCredit {
                    payment_method_id,
                    amount: self.amount,
                    reference,
                    terms_days: self.terms_days,
                    notes,
                })
            }
        }
    }

    fn require_method(&self) -> CoreResult<PaymentMethodId> {
        self.payment_method_id.ok_or_else(|| {
            ValidationError::Required {
                field: "payment_method_id".to_string(),
            }
            .into()
        })
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Payment Selection
// =============================================================================

/// A validated payment choice.
///
/// Each variant carries exactly the fields its payment type needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "payment_type", rename_all = "snake_case")]
pub enum PaymentSelection {
    Cash {
        payment_method_id: PaymentMethodId,
        amount: Money,
        reference: Option<String>,
        notes: Option<String>,
    },
    Credit {
        terms_days: u32,
        notes: Option<String>,
    },
    PartialCredit {
        payment_method_id: PaymentMethodId,
        amount: Money,
        reference: Option<String>,
        terms_days: u32,
        notes: Option<String>,
    },
}

impl PaymentSelection {
    pub fn payment_type(&self) -> PaymentType {
        match self {
            PaymentSelection::Cash { .. } => PaymentType::Cash,
            PaymentSelection::Credit { .. } => PaymentType::Credit,
            PaymentSelection::PartialCredit { .. } => PaymentType::PartialCredit,
        }
    }

    /// The payment collected now; `None` for pure credit.
    pub fn payment_entry(&self) -> Option<PaymentEntry> {
        match self {
            PaymentSelection::Cash {
                payment_method_id,
                amount,
                reference,
                ..
            }
            | PaymentSelection::PartialCredit {
                payment_method_id,
                amount,
                reference,
                ..
            } => Some(PaymentEntry {
                payment_method_id: *payment_method_id,
                amount: *amount,
                reference: reference.clone(),
            }),
            PaymentSelection::Credit { .. } => None,
        }
    }

    /// Credit terms; `None` for cash.
    pub fn terms_days(&self) -> Option<u32> {
        match self {
            PaymentSelection::Cash { .. } => None,
            PaymentSelection::Credit { terms_days, .. }
            | PaymentSelection::PartialCredit { terms_days, .. } => Some(*terms_days),
        }
    }

    pub fn notes(&self) -> Option<&str> {
        match self {
            PaymentSelection::Cash { notes, .. }
            | PaymentSelection::Credit { notes, .. }
            | PaymentSelection::PartialCredit { notes, .. } => notes.as_deref(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
