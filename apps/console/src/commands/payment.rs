//! # Payment Commands
//!
//! The payment dialog: payment type, method, amounts and the credit check
//! that gates the pay button.
//!
//! ## Payment Type Switching
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  set_payment_type(cash) ───────────► amount = total                     │
//! │  set_payment_type(credit) ─────────► amount = 0, needs a customer       │
//! │  set_payment_type(partial_credit) ─► amount kept for manual entry,      │
//! │                                      needs a customer                   │
//! │                                                                         │
//! │  Every response carries `credit` and `can_submit`, recomputed from the  │
//! │  current customer, payment type and total.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use kasir_api::{PaymentMethodOption, PosBackend};
use kasir_core::types::{PaymentMethodId, PaymentType};
use kasir_core::validation::{validate_notes, validate_reference, validate_terms_days};
use kasir_core::{CartTotals, CreditValidationResult, Money, PaymentForm};

use crate::error::{ConsoleError, ConsoleResult};
use crate::state::{PosSession, SelectedCustomer, SessionState};

/// Everything the payment dialog renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutView {
    pub customer: Option<SelectedCustomer>,
    pub payment: PaymentForm,
    pub dialog_open: bool,
    pub totals: CartTotals,
    pub credit: CreditValidationResult,
    /// Whether the credit and partial credit options are selectable.
    pub credit_options_enabled: bool,
    /// Available credit of the selected customer, formatted.
    pub available_credit: Option<String>,
    pub cash_session_open: bool,
    pub submitting: bool,
    /// Whether the pay button is enabled.
    pub can_submit: bool,
}

impl From<&PosSession> for CheckoutView {
    fn from(session: &PosSession) -> Self {
        let customer = session.customer().cloned();
        let available_credit = customer
            .as_ref()
            .and_then(|c| c.credit)
            .map(|credit| session.currency().format(credit.available_credit()));
        CheckoutView {
            customer,
            payment: session.payment_form().clone(),
            dialog_open: session.payment_dialog_open(),
            totals: session.totals(),
            credit: session.credit_status(),
            credit_options_enabled: session.credit_options_enabled(),
            available_credit,
            cash_session_open: session.cash_session_open(),
            submitting: session.is_submitting(),
            can_submit: session.can_submit(),
        }
    }
}

/// Partial edit of the payment form. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFormUpdate {
    #[serde(default)]
    pub payment_method_id: Option<PaymentMethodId>,
    /// Amount collected now; marks the amount as typed by the cashier.
    #[serde(default)]
    pub amount: Option<Money>,
    /// Empty string clears the reference.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub terms_days: Option<u32>,
    /// Empty string clears the notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl PaymentFormUpdate {
    fn apply(self, form: &mut PaymentForm) -> ConsoleResult<()> {
        if let Some(id) = self.payment_method_id {
            form.payment_method_id = Some(id);
        }

        if let Some(amount) = self.amount {
            if amount.is_negative() {
                return Err(ConsoleError::validation("amount", "amount must not be negative"));
            }
            form.set_amount(amount);
        }

        if let Some(reference) = self.reference {
            let reference = non_blank(reference);
            validate_reference(reference.as_deref())?;
            form.reference = reference;
        }

        if let Some(days) = self.terms_days {
            validate_terms_days(days)?;
            form.terms_days = days;
        }

        if let Some(notes) = self.notes {
            let notes = non_blank(notes);
            validate_notes(notes.as_deref())?;
            form.notes = notes;
        }

        Ok(())
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Lists the payment methods the cashier can pick.
pub async fn list_payment_methods(
    backend: &dyn PosBackend,
) -> ConsoleResult<Vec<PaymentMethodOption>> {
    debug!("list_payment_methods command");
    Ok(backend.payment_methods().await?)
}

/// Opens the payment dialog. Refused for an empty cart.
pub fn open_payment_dialog(session: &SessionState) -> ConsoleResult<CheckoutView> {
    debug!("open_payment_dialog command");

    session.with_session_mut(|s| {
        s.open_payment_dialog()?;
        Ok(CheckoutView::from(&*s))
    })
}

/// Closes the payment dialog, keeping what was entered.
pub fn close_payment_dialog(session: &SessionState) -> CheckoutView {
    debug!("close_payment_dialog command");

    session.with_session_mut(|s| {
        s.close_payment_dialog();
        CheckoutView::from(&*s)
    })
}

/// Switches between cash, credit and partial credit.
pub fn set_payment_type(
    session: &SessionState,
    payment_type: PaymentType,
) -> ConsoleResult<CheckoutView> {
    debug!(payment_type = %payment_type, "set_payment_type command");

    session.with_session_mut(|s| {
        s.set_payment_type(payment_type)?;
        Ok(CheckoutView::from(&*s))
    })
}

/// Applies field edits from the payment dialog.
///
/// All fields are validated before any is stored.
pub fn update_payment_form(
    session: &SessionState,
    update: PaymentFormUpdate,
) -> ConsoleResult<CheckoutView> {
    debug!(update = ?update, "update_payment_form command");

    session.with_session_mut(|s| {
        s.edit_payment_form(|form| update.apply(form))?;
        Ok(CheckoutView::from(&*s))
    })
}

/// Current credit check result.
pub fn credit_status(session: &SessionState) -> CreditValidationResult {
    debug!("credit_status command");
    session.with_session(|s| s.credit_status())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use kasir_core::types::{CurrencyFormat, CustomerSummary, ProductSummary, TaxRate};

    fn state() -> SessionState {
        let mut session = PosSession::new(TaxRate::from_bps(1100), CurrencyFormat::default());
        session
            .add_product(&ProductSummary::new(1, "Kopi", Money::from_minor(100_000), 1))
            .unwrap();
        SessionState::new(session)
    }

    #[test]
    fn test_switching_types_resets_amount() {
        let state = state();
        state
            .with_session_mut(|s| {
                s.select_customer(CustomerSummary {
                    id: 9,
                    name: "Toko Maju".to_string(),
                    code: None,
                    phone: None,
                })
            })
            .unwrap();
        let view = open_payment_dialog(&state).unwrap();
        assert!(view.credit_options_enabled);
        assert!(view.dialog_open);
        assert_eq!(view.payment.amount, Money::from_minor(111_000));

        let view = set_payment_type(&state, PaymentType::Credit).unwrap();
        assert_eq!(view.payment.amount, Money::zero());

        let view = set_payment_type(&state, PaymentType::Cash).unwrap();
        assert_eq!(view.payment.amount, Money::from_minor(111_000));
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let state = state();
        let err = update_payment_form(
            &state,
            PaymentFormUpdate {
                payment_method_id: Some(3),
                terms_days: Some(1_000),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("terms_days"));

        let view = state.with_session(|s| CheckoutView::from(s));
        assert_eq!(view.payment.payment_method_id, None);
    }

    #[test]
    fn test_update_fields() {
        let state = state();
        let view = update_payment_form(
            &state,
            PaymentFormUpdate {
                payment_method_id: Some(2),
                amount: Some(Money::from_minor(50_000)),
                reference: Some("  TRX-001 ".to_string()),
                notes: Some("   ".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(view.payment.payment_method_id, Some(2));
        assert_eq!(view.payment.amount, Money::from_minor(50_000));
        assert!(view.payment.amount_edited);
        assert_eq!(view.payment.reference.as_deref(), Some("TRX-001"));
        assert_eq!(view.payment.notes, None);
    }

    #[test]
    fn test_empty_cart_cannot_open_dialog() {
        let state = SessionState::new(PosSession::new(
            TaxRate::from_bps(1100),
            CurrencyFormat::default(),
        ));
        let err = open_payment_dialog(&state).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[test]
    fn test_credit_options_disabled_without_customer() {
        let state = state();
        let view = open_payment_dialog(&state).unwrap();
        assert!(!view.credit_options_enabled);

        let err = set_payment_type(&state, PaymentType::Credit).unwrap_err();
        assert_eq!(err.code, ErrorCode::CustomerRequired);
    }

    #[test]
    fn test_cash_is_always_valid() {
        let state = state();
        assert!(credit_status(&state).is_valid);
    }
}
