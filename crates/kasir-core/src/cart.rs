//! # Cart
//!
//! The in-progress sale: lines, quantities and totals.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action           Method                  Effect                │
//! │  ──────────────           ──────                  ──────                │
//! │                                                                         │
//! │  Pick search result ─────► add_item() ──────────► qty + 1 or new line  │
//! │                                                                         │
//! │  Press + / − ────────────► update_quantity() ───► qty = n (≤ 0 drops)  │
//! │                                                                         │
//! │  Press trash ────────────► remove_item() ───────► line dropped          │
//! │                                                                         │
//! │  Cancel sale / paid ─────► clear() ─────────────► empty, new reference  │
//! │                                                                         │
//! │  Every render ───────────► totals(rate) ────────► subtotal/tax/total    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{ProductId, ProductSummary, TaxRate, WarehouseId};
use crate::validation::{validate_price, validate_quantity};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// One product entry in the cart.
///
/// The unit price is frozen when the line is created; a later price change
/// on the backend does not move an open cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub sku: String,
    pub unit_price: Money,
    /// Always ≥ 1 while the line exists.
    pub quantity: i64,
    pub warehouse_id: WarehouseId,
}

impl CartLine {
    /// Creates a line with quantity 1 at the product's selling price.
    pub fn from_product(product: &ProductSummary) -> Self {
        CartLine {
            product_id: product.id,
            product_name: product.name.clone(),
            sku: product.sku.clone(),
            unit_price: product.selling_price,
            quantity: 1,
            warehouse_id: product.warehouse_id,
        }
    }

    /// `unit_price × quantity`.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product bumps quantity)
/// - Every line has quantity ≥ 1 (setting ≤ 0 removes the line)
/// - At most [`MAX_CART_LINES`] lines, each at most [`MAX_LINE_QUANTITY`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,

    /// Identifies this cart's sale across submission retries.
    /// Regenerated whenever the cart is cleared.
    client_reference: Uuid,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            client_reference: Uuid::new_v4(),
        }
    }

    /// Adds one unit of a product.
    ///
    /// - Product already in cart: its quantity goes up by one
    /// - Otherwise: a new line with quantity 1 at the current selling price
    pub fn add_item(&mut self, product: &ProductSummary) -> CoreResult<()> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let new_qty = line.quantity + 1;
            check_quantity(new_qty)?;
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        validate_price(product.selling_price)?;
        self.lines.push(CartLine::from_product(product));
        Ok(())
    }

    /// Sets a line's quantity.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: the line is removed (no error if it was absent)
    /// - Otherwise the quantity is set exactly
    /// - Positive quantity for a product not in the cart is an error
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        check_quantity(quantity)?;

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or(CoreError::ProductNotInCart(product_id))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Removes a product's line. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Empties the cart and starts a new sale reference.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.client_reference = Uuid::new_v4();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn client_reference(&self) -> Uuid {
        self.client_reference
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// `Σ(unit_price × quantity)`.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Subtotal, tax on the subtotal, and total.
    pub fn totals(&self, tax_rate: TaxRate) -> CartTotals {
        let subtotal = self.subtotal();
        let tax = subtotal.calculate_tax(tax_rate);
        CartTotals {
            line_count: self.line_count(),
            total_quantity: self.total_quantity(),
            tax_rate_bps: tax_rate.bps(),
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    /// Distinct warehouses in line order.
    pub fn warehouse_ids(&self) -> Vec<WarehouseId> {
        let mut ids: Vec<WarehouseId> = Vec::new();
        for line in &self.lines {
            if !ids.contains(&line.warehouse_id) {
                ids.push(line.warehouse_id);
            }
        }
        ids
    }
}

fn check_quantity(quantity: i64) -> CoreResult<()> {
    validate_quantity(quantity).map_err(|e| match e {
        ValidationError::OutOfRange { .. } => CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_LINE_QUANTITY,
        },
        other => other.into(),
    })
}

/// Totals summary shown under the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub tax_rate_bps: u32,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl CartTotals {
    /// Change to hand back: `cash_given - total`.
    ///
    /// Negative when the cash is short. Shown to the cashier, never enforced.
    pub fn change(&self, cash_given: Money) -> Money {
        cash_given - self.total
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
