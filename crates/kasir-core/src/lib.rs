//! # kasir-core: Pure Point-of-Sale Logic
//!
//! This crate holds the checkout logic of the Kasir console as pure
//! functions and plain data. It never touches the network; the console app
//! feeds it data fetched by `kasir-api` and acts on its decisions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser Console (POS page)                   │   │
//! │  │    Search ──► Cart ──► Customer ──► Payment Dialog ──► Submit   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                kasir-console (session + commands)               │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────┐  ┌────────────▼────────────────────┐  │
//! │  │  ★ kasir-core (THIS CRATE)  │  │  kasir-api (REST backend)       │  │
//! │  │  money · cart · credit      │  │  products, customers, sales     │  │
//! │  │  payment · sale · validation│  │                                 │  │
//! │  └─────────────────────────────┘  └─────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Shared domain types (TaxRate, PaymentType, products, customers)
//! - [`cart`] - Cart lines and totals
//! - [`credit`] - Credit limit decision for non-cash sales
//! - [`payment`] - Payment form draft and the validated payment selection
//! - [`sale`] - Assembly of the sale-creation request
//! - [`validation`] - Field validators
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::cart::Cart;
//! use kasir_core::money::Money;
//! use kasir_core::types::{ProductSummary, TaxRate};
//!
//! let mut cart = Cart::new();
//! let product = ProductSummary::new(1, "Kopi Susu", Money::from_minor(50_000), 10);
//! cart.add_item(&product).unwrap();
//! cart.add_item(&product).unwrap();
//!
//! let totals = cart.totals(TaxRate::from_bps(1100));
//! assert_eq!(totals.subtotal.minor(), 100_000);
//! assert_eq!(totals.tax.minor(), 11_000);
//! assert_eq!(totals.total.minor(), 111_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod credit;
pub mod error;
pub mod money;
pub mod payment;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartTotals};
pub use credit::{evaluate_credit, CreditValidationResult};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use payment::{PaymentForm, PaymentSelection};
pub use sale::{PaymentEntry, SaleItemRequest, SaleRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Regional sales tax applied to every sale, in basis points (11%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1100;

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against a mistyped quantity (10000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 9_999;

/// Highest unit price the cart accepts, in minor units.
///
/// `MAX_UNIT_PRICE × MAX_LINE_QUANTITY × MAX_CART_LINES`, doubled for a
/// 100% tax rate, stays inside `i64`.
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000_000;

/// Product search only hits the backend from this many characters on.
pub const MIN_SEARCH_CHARS: usize = 2;
