//! # Customer Commands
//!
//! Picking, creating and dropping the customer attached to the sale.
//!
//! ```text
//! select_customer(c)
//!      │
//!      ├──► session: customer = c, credit = None      (lock released)
//!      │
//!      ├──► GET /api/customers/{id}/outstanding       (await)
//!      │
//!      └──► session: credit = outstanding, only if c is still selected
//! ```
//! Until credit data arrives the evaluator treats a credit sale as valid;
//! the backend enforces the limit again when the sale is created.

use tracing::{debug, info, warn};

use kasir_api::{NewCustomer, PosBackend};
use kasir_core::types::CustomerSummary;

use crate::commands::payment::CheckoutView;
use crate::error::ConsoleResult;
use crate::state::SessionState;

/// Lists customers, optionally filtered by name or code.
pub async fn list_customers(
    backend: &dyn PosBackend,
    search: Option<String>,
) -> ConsoleResult<Vec<CustomerSummary>> {
    debug!(search = ?search, "list_customers command");

    let search = search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    Ok(backend.list_customers(search).await?)
}

/// Attaches a customer to the sale and loads their outstanding data.
///
/// A failed outstanding lookup leaves the customer selected without
/// credit data.
pub async fn select_customer(
    session: &SessionState,
    backend: &dyn PosBackend,
    customer: CustomerSummary,
) -> ConsoleResult<CheckoutView> {
    debug!(customer_id = %customer.id, "select_customer command");

    let customer_id = customer.id;
    session.with_session_mut(|s| s.select_customer(customer))?;

    match backend.customer_outstanding(customer_id).await {
        Ok(outstanding) => {
            let credit = outstanding.customer_credit();
            let applied = session.with_session_mut(|s| s.set_customer_credit(customer_id, credit));
            if applied {
                debug!(
                    customer_id = %customer_id,
                    credit_limit = %credit.credit_limit,
                    balance = %credit.current_balance,
                    "Customer credit loaded"
                );
            } else {
                debug!(customer_id = %customer_id, "Customer changed before credit arrived");
            }
        }
        Err(e) => {
            warn!(customer_id = %customer_id, error = %e, "Failed to load customer outstanding");
        }
    }

    Ok(session.with_session(|s| CheckoutView::from(s)))
}

/// Creates a customer on the backend and selects it.
pub async fn create_and_select_customer(
    session: &SessionState,
    backend: &dyn PosBackend,
    new_customer: NewCustomer,
) -> ConsoleResult<CheckoutView> {
    debug!(name = %new_customer.name, "create_and_select_customer command");

    let new_customer = NewCustomer {
        name: new_customer.name.trim().to_string(),
        phone: new_customer
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
        email: new_customer
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty()),
    };
    new_customer.validate()?;

    let created = backend.create_customer(&new_customer).await?;
    info!(customer_id = %created.id, name = %created.name, "Customer created");

    select_customer(session, backend, created).await
}

/// Drops the customer from the sale.
pub fn clear_customer(session: &SessionState) -> ConsoleResult<CheckoutView> {
    debug!("clear_customer command");

    session.with_session_mut(|s| {
        s.clear_customer()?;
        Ok(CheckoutView::from(&*s))
    })
}
