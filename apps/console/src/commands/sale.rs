//! # Sale Commands
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    submit_sale                                          │
//! │                                                                         │
//! │  lock ─► begin_submission() ─► SaleRequest, in-flight = true ─► unlock  │
//! │             │                                                           │
//! │             └─ in flight / register closed / invalid form /             │
//! │                empty cart / no customer / credit rejected ─► Err        │
//! │                                                                         │
//! │  POST /api/sales  (await, no lock held, no retry)                       │
//! │             │                                                           │
//! │        ┌────┴─────┐                                                     │
//! │        ▼          ▼                                                     │
//! │     success     failure                                                 │
//! │  complete_sale  cart, customer and form untouched                       │
//! │        │          │                                                     │
//! │        └────┬─────┘                                                     │
//! │             ▼                                                           │
//! │  in-flight = false (also when the future is dropped)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use kasir_api::PosBackend;
use kasir_core::types::PaymentType;
use kasir_core::Money;

use crate::error::{ConsoleError, ConsoleResult};
use crate::state::SessionState;

/// Result of a submitted sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleReceipt {
    pub sale_id: i64,
    pub invoice_number: Option<String>,
    pub payment_type: PaymentType,
    pub total: Money,
    pub formatted_total: String,
    /// Change for the cash handed over, if cash was entered.
    pub change: Option<Money>,
}

/// Clears the in-flight flag when dropped.
struct InFlight<'a> {
    session: &'a SessionState,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.session.with_session_mut(|s| s.end_submission());
    }
}

/// Submits the current sale to the backend.
///
/// The cart is cleared only after the backend confirms the sale. On any
/// failure the cart, customer and payment form stay as they were so the
/// cashier can retry.
pub async fn submit_sale(
    session: &SessionState,
    backend: &dyn PosBackend,
) -> ConsoleResult<SaleReceipt> {
    debug!("submit_sale command");

    let (request, change, formatted_total) = session.with_session_mut(|s| {
        let request = s.begin_submission()?;
        let formatted = s.currency().format(request.total);
        Ok::<_, ConsoleError>((request, s.change(), formatted))
    })?;
    let _in_flight = InFlight { session };

    debug!(
        client_reference = %request.client_reference,
        payment_type = %request.payment_type,
        lines = request.items.len(),
        total = %request.total,
        "Submitting sale"
    );

    let created = backend.create_sale(&request).await.map_err(|e| {
        warn!(
            client_reference = %request.client_reference,
            error = %e,
            "Sale submission failed, cart kept"
        );
        e
    })?;

    session.with_session_mut(|s| s.complete_sale());

    info!(
        sale_id = %created.id,
        invoice = ?created.invoice_number,
        client_reference = %request.client_reference,
        payment_type = %request.payment_type,
        total = %request.total,
        items = request.items.len(),
        "Sale created"
    );

    Ok(SaleReceipt {
        sale_id: created.id,
        invoice_number: created.invoice_number,
        payment_type: request.payment_type,
        total: request.total,
        formatted_total,
        change,
    })
}
