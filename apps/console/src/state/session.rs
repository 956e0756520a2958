//! # Session State
//!
//! Everything the POS page holds between cashier actions: the cart, the
//! search box, the selected customer, the payment dialog and the register.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>`. Commands take the lock for
//! the synchronous part of their work and release it before any backend
//! call, so a slow network never blocks the cart.
//!
//! ## Session Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State Operations                             │
//! │                                                                         │
//! │  Cashier Action           Method                  State Change          │
//! │  ──────────────           ──────                  ────────────          │
//! │                                                                         │
//! │  Type in search ─────────► set_search_results() ► query + results       │
//! │                                                                         │
//! │  Pick result ────────────► add_product() ───────► line + clear query    │
//! │                                                                         │
//! │  Pick customer ──────────► select_customer() ───► customer (no credit)  │
//! │                            set_customer_credit() ► credit loaded        │
//! │                                                                         │
//! │  Payment type ───────────► set_payment_type() ──► form amount default   │
//! │                                                                         │
//! │  Pay ────────────────────► begin_submission() ──► in-flight, request    │
//! │                            complete_sale() ─────► everything reset      │
//! │                            end_submission() ────► in-flight cleared     │
//! │                                                                         │
//! │  Cancel ─────────────────► clear() ─────────────► cart/customer/form    │
//! │                                                                         │
//! │  NOTE: cart and payment edits are refused while a sale is in flight.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use serde::Serialize;

use kasir_api::CashSessionState;
use kasir_core::types::{
    CurrencyFormat, CustomerCredit, CustomerId, CustomerSummary, PaymentType, ProductId,
    ProductSummary, TaxRate,
};
use kasir_core::{
    evaluate_credit, Cart, CartTotals, CoreError, CreditValidationResult, Money, PaymentForm,
    SaleRequest,
};

use crate::error::{ConsoleError, ConsoleResult};

/// The customer attached to the current sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedCustomer {
    pub customer: CustomerSummary,
    /// `None` until the outstanding lookup returns (or if it failed).
    pub credit: Option<CustomerCredit>,
}

/// One cashier's POS session.
///
/// ## Invariants
/// - `submitting` is true only between `begin_submission` and
///   `end_submission`
/// - The payment form's cash amount follows the cart total until the
///   cashier types an amount
#[derive(Debug)]
pub struct PosSession {
    cart: Cart,
    search_query: String,
    search_results: Vec<ProductSummary>,
    customer: Option<SelectedCustomer>,
    payment_form: PaymentForm,
    payment_dialog_open: bool,
    cash_session: Option<CashSessionState>,
    submitting: bool,
    tax_rate: TaxRate,
    currency: CurrencyFormat,
}

impl PosSession {
    pub fn new(tax_rate: TaxRate, currency: CurrencyFormat) -> Self {
        PosSession {
            cart: Cart::new(),
            search_query: String::new(),
            search_results: Vec::new(),
            customer: None,
            payment_form: PaymentForm::default(),
            payment_dialog_open: false,
            cash_session: None,
            submitting: false,
            tax_rate,
            currency,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals(self.tax_rate)
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_results(&self) -> &[ProductSummary] {
        &self.search_results
    }

    pub fn customer(&self) -> Option<&SelectedCustomer> {
        self.customer.as_ref()
    }

    pub fn payment_form(&self) -> &PaymentForm {
        &self.payment_form
    }

    pub fn payment_dialog_open(&self) -> bool {
        self.payment_dialog_open
    }

    pub fn cash_session(&self) -> Option<&CashSessionState> {
        self.cash_session.as_ref()
    }

    /// True only when the last known register state is open.
    pub fn cash_session_open(&self) -> bool {
        self.cash_session.as_ref().is_some_and(|s| s.is_open)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.currency
    }

    /// `cash_tendered - total`, when cash has been entered.
    pub fn change(&self) -> Option<Money> {
        self.payment_form
            .cash_tendered
            .map(|cash| self.totals().change(cash))
    }

    /// Credit check for the current payment type, customer and total.
    ///
    /// Recomputed on every call; never stored.
    pub fn credit_status(&self) -> CreditValidationResult {
        evaluate_credit(
            self.payment_form.payment_type,
            self.customer.as_ref().and_then(|c| c.credit.as_ref()),
            self.totals().total,
            &self.currency,
        )
    }

    /// Whether credit and partial credit can be picked.
    pub fn credit_options_enabled(&self) -> bool {
        self.customer.is_some()
    }

    /// Whether the pay button is enabled.
    pub fn can_submit(&self) -> bool {
        let payment_type = self.payment_form.payment_type;
        !self.cart.is_empty()
            && !self.submitting
            && self.cash_session_open()
            && (!payment_type.requires_customer() || self.customer.is_some())
            && !self.credit_status().blocks_submission(payment_type)
    }

    // =========================================================================
    // Product Search
    // =========================================================================

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Stores results for `query`, unless the cashier has typed something
    /// else since the search was sent.
    pub fn set_search_results(&mut self, query: &str, results: Vec<ProductSummary>) -> bool {
        if self.search_query != query {
            return false;
        }
        self.search_results = results;
        true
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.search_results.clear();
    }

    fn find_search_result(&self, product_id: ProductId) -> Option<&ProductSummary> {
        self.search_results.iter().find(|p| p.id == product_id)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds one unit of a product and clears the search box.
    pub fn add_product(&mut self, product: &ProductSummary) -> ConsoleResult<()> {
        self.ensure_idle()?;
        self.cart.add_item(product)?;
        self.clear_search();
        self.after_cart_change();
        Ok(())
    }

    /// Adds a product picked from the current search results.
    pub fn add_search_result(&mut self, product_id: ProductId) -> ConsoleResult<()> {
        let product = self
            .find_search_result(product_id)
            .cloned()
            .ok_or_else(|| ConsoleError::not_found("Product", product_id))?;
        self.add_product(&product)
    }

    /// Sets a line's quantity; zero or less removes it.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> ConsoleResult<()> {
        self.ensure_idle()?;
        self.cart.update_quantity(product_id, quantity)?;
        self.after_cart_change();
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: ProductId) -> ConsoleResult<bool> {
        self.ensure_idle()?;
        let removed = self.cart.remove_item(product_id);
        self.after_cart_change();
        Ok(removed)
    }

    /// Starts over: empty cart, no customer, fresh cash payment form.
    pub fn clear(&mut self) -> ConsoleResult<()> {
        self.ensure_idle()?;
        self.reset();
        Ok(())
    }

    pub fn set_cash_tendered(&mut self, cash: Option<Money>) -> ConsoleResult<()> {
        if let Some(amount) = cash {
            if amount.is_negative() {
                return Err(ConsoleError::validation(
                    "cash_tendered",
                    "cash_tendered must not be negative",
                ));
            }
        }
        self.payment_form.cash_tendered = cash;
        Ok(())
    }

    fn after_cart_change(&mut self) {
        let total = self.totals().total;
        self.payment_form.sync_total(total);
        if self.cart.is_empty() {
            self.payment_dialog_open = false;
        }
    }

    fn reset(&mut self) {
        self.cart.clear();
        self.customer = None;
        self.payment_form = PaymentForm::default();
        self.payment_dialog_open = false;
    }

    // =========================================================================
    // Customer
    // =========================================================================

    /// Attaches a customer. Credit data arrives separately.
    pub fn select_customer(&mut self, customer: CustomerSummary) -> ConsoleResult<()> {
        self.ensure_idle()?;
        self.customer = Some(SelectedCustomer {
            customer,
            credit: None,
        });
        Ok(())
    }

    /// Stores outstanding data, if `customer_id` is still the selected
    /// customer.
    pub fn set_customer_credit(&mut self, customer_id: CustomerId, credit: CustomerCredit) -> bool {
        match self.customer.as_mut() {
            Some(selected) if selected.customer.id == customer_id => {
                selected.credit = Some(credit);
                true
            }
            _ => false,
        }
    }

    /// Drops the customer. A credit payment type falls back to cash.
    pub fn clear_customer(&mut self) -> ConsoleResult<()> {
        self.ensure_idle()?;
        self.customer = None;
        if self.payment_form.payment_type.requires_customer() {
            let total = self.totals().total;
            self.payment_form.switch_type(PaymentType::Cash, total);
        }
        Ok(())
    }

    // =========================================================================
    // Payment
    // =========================================================================

    pub fn open_payment_dialog(&mut self) -> ConsoleResult<()> {
        self.ensure_idle()?;
        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        let total = self.totals().total;
        self.payment_form.sync_total(total);
        self.payment_dialog_open = true;
        Ok(())
    }

    pub fn close_payment_dialog(&mut self) {
        self.payment_dialog_open = false;
    }

    /// Credit and partial credit are refused until a customer is selected.
    pub fn set_payment_type(&mut self, payment_type: PaymentType) -> ConsoleResult<()> {
        self.ensure_idle()?;
        if payment_type.requires_customer() && self.customer.is_none() {
            return Err(CoreError::CustomerRequired {
                payment_type: payment_type.to_string(),
            }
            .into());
        }
        let total = self.totals().total;
        self.payment_form.switch_type(payment_type, total);
        Ok(())
    }

    /// Edits the payment form in place.
    pub fn edit_payment_form<F>(&mut self, edit: F) -> ConsoleResult<()>
    where
        F: FnOnce(&mut PaymentForm) -> ConsoleResult<()>,
    {
        self.ensure_idle()?;
        let mut draft = self.payment_form.clone();
        edit(&mut draft)?;
        self.payment_form = draft;
        Ok(())
    }

    // =========================================================================
    // Cash Session
    // =========================================================================

    pub fn set_cash_session(&mut self, state: CashSessionState) {
        self.cash_session = Some(state);
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Checks every precondition, marks the sale in flight and returns the
    /// request to send.
    ///
    /// ## Order of checks
    /// 1. No other submission in flight
    /// 2. Cash session open
    /// 3. Payment form valid for the total
    /// 4. Cart, customer and credit rules (`SaleRequest::assemble`)
    pub fn begin_submission(&mut self) -> ConsoleResult<SaleRequest> {
        if self.submitting {
            return Err(ConsoleError::submission_in_progress());
        }
        if !self.cash_session_open() {
            return Err(ConsoleError::cash_session_closed());
        }

        let total = self.totals().total;
        let selection = self.payment_form.to_selection(total)?;
        let selected = self.customer.as_ref();
        let request = SaleRequest::assemble(
            &self.cart,
            self.tax_rate,
            selected.map(|c| &c.customer),
            selected.and_then(|c| c.credit.as_ref()),
            &selection,
            &self.currency,
        )?;

        self.submitting = true;
        Ok(request)
    }

    /// Backend accepted the sale: start a new one.
    pub fn complete_sale(&mut self) {
        self.reset();
        self.clear_search();
    }

    /// Clears the in-flight flag. Safe to call more than once.
    pub fn end_submission(&mut self) {
        self.submitting = false;
    }

    fn ensure_idle(&self) -> ConsoleResult<()> {
        if self.submitting {
            return Err(ConsoleError::submission_in_progress());
        }
        Ok(())
    }
}

/// Shared handle to the session.
///
/// Clones share the same session.
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<PosSession>>,
}

impl SessionState {
    pub fn new(session: PosSession) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = state.with_session(|s| s.totals());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&PosSession) -> R,
    {
        let session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        f(&session)
    }

    /// Executes a function with write access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.with_session_mut(|s| s.update_quantity(product_id, 3))?;
    /// ```
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PosSession) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut session)
    }
}
