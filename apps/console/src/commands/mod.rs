//! # Console Commands
//!
//! One function per POS page action.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── cart.rs      ◄─── get/add/update/remove/clear, cash tendered
//! ├── product.rs   ◄─── Product search
//! ├── customer.rs  ◄─── List, select, create, clear customer
//! ├── payment.rs   ◄─── Payment dialog, payment type, credit status
//! ├── session.rs   ◄─── Cash session refresh
//! └── sale.rs      ◄─── Sale submission
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  POS page action                                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  fn add_to_cart(                                                        │
//! │      session: &SessionState,   ◄── shared session                      │
//! │      product_id: ProductId,    ◄── from the page                       │
//! │  ) -> ConsoleResult<CartResponse>                                       │
//! │                                                                         │
//! │  async fn select_customer(                                              │
//! │      session: &SessionState,                                            │
//! │      backend: &dyn PosBackend, ◄── only commands that call out         │
//! │      customer: CustomerSummary,                                         │
//! │  ) -> ConsoleResult<CheckoutView>                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Serializable response or ConsoleError { code, message }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands that do not talk to the backend are synchronous.

pub mod cart;
pub mod customer;
pub mod payment;
pub mod product;
pub mod sale;
pub mod session;

pub use cart::CartResponse;
pub use payment::{CheckoutView, PaymentFormUpdate};
pub use sale::SaleReceipt;
