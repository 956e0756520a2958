//! # Cart Commands
//!
//! Cart manipulation from the POS page.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Payment  │────►│ Submitted│       │
//! │  │  Cart    │     │          │     │  Dialog  │     │   Sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       ▲                │                 │                │             │
//! │       │           add_to_cart       submit_sale           │             │
//! │       │           update_cart_item  (sale.rs)             │             │
//! │       │           remove_from_cart                        │             │
//! │       │                │                                  │             │
//! │       │                ▼                                  │             │
//! │       └──────────  clear_cart  ◄──────────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use kasir_core::types::ProductId;
use kasir_core::{CartLine, CartTotals, Money};

use crate::error::ConsoleResult;
use crate::state::{PosSession, SessionState};

/// Amounts formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedTotals {
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub change: Option<String>,
}

/// Cart response including lines and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    pub cash_tendered: Option<Money>,
    /// `cash_tendered - total`; negative when short, never blocking.
    pub change: Option<Money>,
    pub formatted: FormattedTotals,
    pub search_query: String,
}

impl From<&PosSession> for CartResponse {
    fn from(session: &PosSession) -> Self {
        let totals = session.totals();
        let change = session.change();
        let currency = session.currency();
        CartResponse {
            lines: session.cart().lines().to_vec(),
            totals,
            cash_tendered: session.payment_form().cash_tendered,
            change,
            formatted: FormattedTotals {
                subtotal: currency.format(totals.subtotal),
                tax: currency.format(totals.tax),
                total: currency.format(totals.total),
                change: change.map(|c| currency.format(c)),
            },
            search_query: session.search_query().to_string(),
        }
    }
}

/// Gets the current cart contents.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart panel (always visible on the POS page)                            │
/// │                                                                         │
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  Kopi Bubuk 200g        x2              Rp 100.000            │    │
/// │  │  Gula Pasir 1kg         x1              Rp 30.000             │    │
/// │  ├────────────────────────────────────────────────────────────────┤    │
/// │  │  Subtotal                               Rp 130.000            │    │
/// │  │  PPN (11%)                              Rp 14.300             │    │
/// │  │  ──────────────────────────────────────────────────           │    │
/// │  │  TOTAL                                  Rp 144.300            │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn get_cart(session: &SessionState) -> CartResponse {
    debug!("get_cart command");
    session.with_session(|s| CartResponse::from(s))
}

/// Adds a product from the current search results.
///
/// ## Behavior
/// - Product already in cart: quantity goes up by one
/// - Otherwise: new line at the product's selling price
/// - The search box is cleared either way
pub fn add_to_cart(session: &SessionState, product_id: ProductId) -> ConsoleResult<CartResponse> {
    debug!(product_id = %product_id, "add_to_cart command");

    session.with_session_mut(|s| {
        s.add_search_result(product_id)?;
        Ok(CartResponse::from(&*s))
    })
}

/// Sets the quantity of a line. Zero or less removes the line.
pub fn update_cart_item(
    session: &SessionState,
    product_id: ProductId,
    quantity: i64,
) -> ConsoleResult<CartResponse> {
    debug!(product_id = %product_id, quantity = %quantity, "update_cart_item command");

    session.with_session_mut(|s| {
        s.update_quantity(product_id, quantity)?;
        Ok(CartResponse::from(&*s))
    })
}

/// Removes a line. Removing an absent product is not an error.
pub fn remove_from_cart(
    session: &SessionState,
    product_id: ProductId,
) -> ConsoleResult<CartResponse> {
    debug!(product_id = %product_id, "remove_from_cart command");

    session.with_session_mut(|s| {
        s.remove_item(product_id)?;
        Ok(CartResponse::from(&*s))
    })
}

/// Clears the cart, the selected customer and the payment form.
///
/// ## When Used
/// - Cashier cancels the sale
pub fn clear_cart(session: &SessionState) -> ConsoleResult<CartResponse> {
    debug!("clear_cart command");

    session.with_session_mut(|s| {
        s.clear()?;
        Ok(CartResponse::from(&*s))
    })
}

/// Records the cash handed over, for the change display.
pub fn set_cash_tendered(
    session: &SessionState,
    amount: Option<Money>,
) -> ConsoleResult<CartResponse> {
    debug!(amount = ?amount, "set_cash_tendered command");

    session.with_session_mut(|s| {
        s.set_cash_tendered(amount)?;
        Ok(CartResponse::from(&*s))
    })
}
