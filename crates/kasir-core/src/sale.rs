//! # Sale Request Assembly
//!
//! Turns the cart, the selected customer and the payment selection into the
//! single request sent to the backend's sale-creation endpoint.
//!
//! ## Preconditions
//! ```text
//! cart empty ─────────────────────────────► EmptyCart
//! lines from several warehouses ──────────► MixedWarehouses
//! credit / partial credit, no customer ───► CustomerRequired
//! credit check fails ─────────────────────► CreditRejected
//! otherwise ──────────────────────────────► SaleRequest
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartLine};
use crate::credit::evaluate_credit;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::payment::PaymentSelection;
use crate::types::{
    CurrencyFormat, CustomerCredit, CustomerId, CustomerSummary, PaymentMethodId, PaymentType,
    ProductId, TaxRate, WarehouseId,
};

/// One line of the sale as the backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleItemRequest {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Money,
}

impl From<&CartLine> for SaleItemRequest {
    fn from(line: &CartLine) -> Self {
        SaleItemRequest {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

/// A payment collected at the counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentEntry {
    pub payment_method_id: PaymentMethodId,
    pub amount: Money,
    pub reference: Option<String>,
}

/// Body of the sale-creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRequest {
    /// Stable per cart; lets the backend spot a resubmitted sale.
    #[ts(as = "String")]
    pub client_reference: Uuid,
    pub warehouse_id: WarehouseId,
    pub customer_id: Option<CustomerId>,
    pub payment_type: PaymentType,
    pub items: Vec<SaleItemRequest>,
    /// Empty for pure credit, exactly one entry otherwise.
    pub payments: Vec<PaymentEntry>,
    pub terms_days: Option<u32>,
    pub notes: Option<String>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl SaleRequest {
    /// Builds the request, enforcing the submission preconditions.
    ///
    /// `credit` is the selected customer's outstanding data, if loaded. The
    /// credit check runs here against the same total that is sent, so a
    /// request can never be built for a sale the evaluator would reject.
    pub fn assemble(
        cart: &Cart,
        tax_rate: TaxRate,
        customer: Option<&CustomerSummary>,
        credit: Option<&CustomerCredit>,
        selection: &PaymentSelection,
        currency: &CurrencyFormat,
    ) -> CoreResult<SaleRequest> {
        let first = cart.lines().first().ok_or(CoreError::EmptyCart)?;

        let warehouses = cart.warehouse_ids();
        if warehouses.len() > 1 {
            return Err(CoreError::MixedWarehouses { warehouses });
        }

        let payment_type = selection.payment_type();
        if payment_type.requires_customer() && customer.is_none() {
            return Err(CoreError::CustomerRequired {
                payment_type: payment_type.to_string(),
            });
        }

        let totals = cart.totals(tax_rate);
        let check = evaluate_credit(payment_type, credit, totals.total, currency);
        if check.blocks_submission(payment_type) {
            return Err(CoreError::CreditRejected {
                message: check.message,
            });
        }

        Ok(SaleRequest {
            client_reference: cart.client_reference(),
            warehouse_id: first.warehouse_id,
            customer_id: customer.map(|c| c.id),
            payment_type,
            items: cart.lines().iter().map(SaleItemRequest::from).collect(),
            payments: selection.payment_entry().into_iter().collect(),
            terms_days: selection.terms_days(),
            notes: selection.notes().map(str::to_string),
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
