//! Checkout flows against an in-memory backend.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use kasir_api::{
    ApiClientError, ApiResult, CashSessionState, CreditLimitInfo, CustomerRecord, NewCustomer,
    OutstandingResponse, OutstandingSummary, PaymentMethodOption, PosBackend, SaleCreated,
};
use kasir_console::commands::{cart, customer, payment, product, sale, session};
use kasir_console::commands::PaymentFormUpdate;
use kasir_console::error::ErrorCode;
use kasir_console::state::ConsoleConfig;
use kasir_console::Console;
use kasir_core::types::{CustomerId, CustomerSummary, PaymentType, ProductSummary};
use kasir_core::{Money, SaleRequest};

// =============================================================================
// Stub Backend
// =============================================================================

#[derive(Default)]
struct StubBackend {
    products: Vec<ProductSummary>,
    /// (credit_limit, total_outstanding) returned for every customer
    credit: Option<(i64, i64)>,
    cash_open: bool,
    fail_sales: AtomicBool,
    search_calls: AtomicUsize,
    sales: Mutex<Vec<SaleRequest>>,
    /// When set, create_sale waits for a notification before answering.
    hold_sale: Option<Arc<Notify>>,
}

impl StubBackend {
    fn new() -> Self {
        StubBackend {
            products: vec![
                ProductSummary::new(1, "Kopi Bubuk 200g", Money::from_minor(50_000), 1),
                ProductSummary::new(2, "Gula Pasir 1kg", Money::from_minor(30_000), 1),
                ProductSummary::new(3, "Teh Celup", Money::from_minor(15_000), 1),
            ],
            cash_open: true,
            ..Default::default()
        }
    }

    fn sales(&self) -> Vec<SaleRequest> {
        self.sales.lock().unwrap().clone()
    }
}

#[async_trait]
impl PosBackend for StubBackend {
    async fn search_products(&self, query: &str) -> ApiResult<Vec<ProductSummary>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let query = query.to_lowercase();
        Ok(self
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn list_customers(&self, _search: Option<&str>) -> ApiResult<Vec<CustomerSummary>> {
        Ok(vec![toko_maju()])
    }

    async fn create_customer(&self, customer: &NewCustomer) -> ApiResult<CustomerSummary> {
        Ok(CustomerSummary {
            id: 77,
            name: customer.name.clone(),
            code: Some("C-077".to_string()),
            phone: customer.phone.clone(),
        })
    }

    async fn customer_outstanding(&self, id: CustomerId) -> ApiResult<OutstandingResponse> {
        let (limit, balance) = self.credit.ok_or(ApiClientError::Status {
            status: 404,
            message: "customer not found".to_string(),
        })?;
        Ok(OutstandingResponse {
            customer: CustomerRecord {
                id,
                name: "Toko Maju".to_string(),
                code: None,
                phone: None,
                email: None,
                is_active: Some(true),
            },
            credit_limit: CreditLimitInfo {
                credit_limit: Money::from_minor(limit),
                available_credit: Money::from_minor(limit - balance),
            },
            summary: OutstandingSummary {
                total_outstanding: Money::from_minor(balance),
                overdue_amount: Money::zero(),
                open_invoices: 0,
            },
        })
    }

    async fn payment_methods(&self) -> ApiResult<Vec<PaymentMethodOption>> {
        Ok(vec![PaymentMethodOption {
            id: 1,
            name: "Tunai".to_string(),
            is_active: true,
        }])
    }

    async fn create_sale(&self, sale: &SaleRequest) -> ApiResult<SaleCreated> {
        if let Some(gate) = &self.hold_sale {
            gate.notified().await;
        }
        if self.fail_sales.load(Ordering::SeqCst) {
            return Err(ApiClientError::Timeout {
                url: "http://stub/api/sales".to_string(),
            });
        }
        let mut sales = self.sales.lock().unwrap();
        sales.push(sale.clone());
        Ok(SaleCreated {
            id: sales.len() as i64,
            invoice_number: Some(format!("INV-{:04}", sales.len())),
            total: Some(sale.total),
        })
    }

    async fn cash_session(&self) -> ApiResult<CashSessionState> {
        Ok(if self.cash_open {
            CashSessionState {
                status: "open".to_string(),
                is_open: true,
                opened_at: None,
            }
        } else {
            CashSessionState::closed()
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn toko_maju() -> CustomerSummary {
    CustomerSummary {
        id: 9,
        name: "Toko Maju".to_string(),
        code: Some("C-009".to_string()),
        phone: None,
    }
}

async fn console_with(stub: &Arc<StubBackend>, tax_rate_bps: u32) -> Console {
    let mut config = ConsoleConfig::default();
    config.tax_rate_bps = tax_rate_bps;
    let console = Console::new(config, stub.clone());
    session::refresh_cash_session(&console.session, console.backend.as_ref())
        .await
        .unwrap();
    console
}

async fn add(console: &Console, query: &str, product_id: i64) {
    product::search_products(&console.session, console.backend.as_ref(), query.to_string())
        .await
        .unwrap();
    cart::add_to_cart(&console.session, product_id).unwrap();
}

/// Kopi x2 + Gula x1 at 11%: 130.000 + 14.300 = 144.300
async fn fill_reference_cart(console: &Console) {
    add(console, "kopi", 1).await;
    add(console, "kopi", 1).await;
    add(console, "gula", 2).await;
}

fn pick_method(console: &Console) {
    payment::update_payment_form(
        &console.session,
        PaymentFormUpdate {
            payment_method_id: Some(1),
            ..Default::default()
        },
    )
    .unwrap();
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn cash_sale_sends_one_payment_equal_to_total() {
    let stub = Arc::new(StubBackend::new());
    let console = console_with(&stub, 1100).await;
    fill_reference_cart(&console).await;

    let view = payment::open_payment_dialog(&console.session).unwrap();
    assert_eq!(view.totals.total, Money::from_minor(144_300));
    assert_eq!(view.payment.amount, Money::from_minor(144_300));
    pick_method(&console);
    cart::set_cash_tendered(&console.session, Some(Money::from_minor(150_000))).unwrap();

    let receipt = sale::submit_sale(&console.session, console.backend.as_ref())
        .await
        .unwrap();
    assert_eq!(receipt.total, Money::from_minor(144_300));
    assert_eq!(receipt.formatted_total, "Rp 144.300");
    assert_eq!(receipt.change, Some(Money::from_minor(5_700)));

    let sales = stub.sales();
    assert_eq!(sales.len(), 1);
    let sent = &sales[0];
    assert_eq!(sent.payment_type, PaymentType::Cash);
    assert_eq!(sent.warehouse_id, 1);
    assert_eq!(sent.payments.len(), 1);
    assert_eq!(sent.payments[0].amount, Money::from_minor(144_300));
    assert_eq!(sent.payments[0].payment_method_id, 1);
    assert_eq!(sent.subtotal, Money::from_minor(130_000));
    assert_eq!(sent.tax, Money::from_minor(14_300));

    // success resets the session for the next customer
    let cart = cart::get_cart(&console.session);
    assert!(cart.lines.is_empty());
    let view = console.session.with_session(|s| payment::CheckoutView::from(s));
    assert!(!view.dialog_open);
    assert!(!view.submitting);
    assert_eq!(view.payment.payment_type, PaymentType::Cash);
    assert_eq!(view.payment.payment_method_id, None);
}

#[tokio::test]
async fn credit_sale_sends_empty_payments() {
    let stub = Arc::new(StubBackend {
        credit: Some((1_000_000, 0)),
        ..StubBackend::new()
    });
    let console = console_with(&stub, 1100).await;
    fill_reference_cart(&console).await;

    let view = customer::select_customer(&console.session, console.backend.as_ref(), toko_maju())
        .await
        .unwrap();
    assert_eq!(view.available_credit.as_deref(), Some("Rp 1.000.000"));

    let view = payment::set_payment_type(&console.session, PaymentType::Credit).unwrap();
    assert!(view.credit.is_valid);
    assert!(view.can_submit);

    sale::submit_sale(&console.session, console.backend.as_ref())
        .await
        .unwrap();

    let sent = &stub.sales()[0];
    assert_eq!(sent.payment_type, PaymentType::Credit);
    assert!(sent.payments.is_empty());
    assert_eq!(sent.customer_id, Some(9));
    assert_eq!(sent.terms_days, Some(30));

    // customer is cleared with the cart
    assert!(console.session.with_session(|s| s.customer().is_none()));
}

#[tokio::test]
async fn partial_credit_collects_entered_amount() {
    let stub = Arc::new(StubBackend {
        credit: Some((1_000_000, 0)),
        ..StubBackend::new()
    });
    let console = console_with(&stub, 1100).await;
    fill_reference_cart(&console).await;
    customer::select_customer(&console.session, console.backend.as_ref(), toko_maju())
        .await
        .unwrap();

    payment::set_payment_type(&console.session, PaymentType::PartialCredit).unwrap();
    payment::update_payment_form(
        &console.session,
        PaymentFormUpdate {
            payment_method_id: Some(1),
            amount: Some(Money::from_minor(44_300)),
            ..Default::default()
        },
    )
    .unwrap();

    sale::submit_sale(&console.session, console.backend.as_ref())
        .await
        .unwrap();

    let sent = &stub.sales()[0];
    assert_eq!(sent.payment_type, PaymentType::PartialCredit);
    assert_eq!(sent.payments.len(), 1);
    assert_eq!(sent.payments[0].amount, Money::from_minor(44_300));
    assert_eq!(sent.total, Money::from_minor(144_300));
}

#[tokio::test]
async fn failed_submission_leaves_cart_unchanged() {
    let stub = Arc::new(StubBackend::new());
    stub.fail_sales.store(true, Ordering::SeqCst);
    let console = console_with(&stub, 1100).await;
    fill_reference_cart(&console).await;
    pick_method(&console);

    let before = cart::get_cart(&console.session);
    let reference = console
        .session
        .with_session(|s| s.cart().client_reference());

    let err = sale::submit_sale(&console.session, console.backend.as_ref())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::BackendUnavailable);
    assert!(err.retryable);

    let after = cart::get_cart(&console.session);
    assert_eq!(after.lines.len(), before.lines.len());
    assert_eq!(after.totals, before.totals);
    assert!(!console.session.with_session(|s| s.is_submitting()));

    // a manual retry sends the same client reference
    stub.fail_sales.store(false, Ordering::SeqCst);
    sale::submit_sale(&console.session, console.backend.as_ref())
        .await
        .unwrap();
    assert_eq!(stub.sales()[0].client_reference, reference);
}

#[tokio::test]
async fn second_submission_rejected_while_pending() {
    let gate = Arc::new(Notify::new());
    let stub = Arc::new(StubBackend {
        hold_sale: Some(gate.clone()),
        ..StubBackend::new()
    });
    let console = console_with(&stub, 1100).await;
    fill_reference_cart(&console).await;
    pick_method(&console);

    let (first, second) = tokio::join!(
        sale::submit_sale(&console.session, console.backend.as_ref()),
        async {
            let second = sale::submit_sale(&console.session, console.backend.as_ref()).await;
            gate.notify_one();
            second
        }
    );

    assert!(first.is_ok());
    assert_eq!(second.unwrap_err().code, ErrorCode::SubmissionInProgress);
    assert_eq!(stub.sales().len(), 1);
}

#[tokio::test]
async fn closed_cash_session_blocks_submission() {
    let stub = Arc::new(StubBackend {
        cash_open: false,
        ..StubBackend::new()
    });
    let console = console_with(&stub, 1100).await;
    fill_reference_cart(&console).await;
    pick_method(&console);

    let view = console.session.with_session(|s| payment::CheckoutView::from(s));
    assert!(!view.cash_session_open);
    assert!(!view.can_submit);

    let err = sale::submit_sale(&console.session, console.backend.as_ref())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CashSessionClosed);
    assert!(stub.sales().is_empty());
    assert_eq!(cart::get_cart(&console.session).lines.len(), 2);
}

#[tokio::test]
async fn credit_limit_blocks_submission() {
    // no tax so the totals match the credit figures directly
    let stub = Arc::new(StubBackend {
        credit: Some((100_000, 80_000)),
        ..StubBackend::new()
    });
    let console = console_with(&stub, 0).await;
    add(&console, "teh", 3).await;
    cart::update_cart_item(&console.session, 3, 2).unwrap();

    customer::select_customer(&console.session, console.backend.as_ref(), toko_maju())
        .await
        .unwrap();
    let view = payment::set_payment_type(&console.session, PaymentType::Credit).unwrap();
    assert_eq!(view.totals.total, Money::from_minor(30_000));
    assert!(!view.credit.is_valid);
    assert!(view.credit.message.contains("Rp 20.000"));
    assert!(!view.can_submit);

    let err = sale::submit_sale(&console.session, console.backend.as_ref())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CreditRejected);
    assert!(stub.sales().is_empty());

    // 15.000 fits the remaining 20.000
    cart::update_cart_item(&console.session, 3, 1).unwrap();
    assert!(payment::credit_status(&console.session).is_valid);
    sale::submit_sale(&console.session, console.backend.as_ref())
        .await
        .unwrap();
    assert_eq!(stub.sales().len(), 1);
}

#[tokio::test]
async fn credit_needs_a_customer() {
    let stub = Arc::new(StubBackend {
        credit: Some((1_000_000, 0)),
        ..StubBackend::new()
    });
    let console = console_with(&stub, 1100).await;
    fill_reference_cart(&console).await;

    let err = payment::set_payment_type(&console.session, PaymentType::Credit).unwrap_err();
    assert_eq!(err.code, ErrorCode::CustomerRequired);

    let view = customer::select_customer(&console.session, console.backend.as_ref(), toko_maju())
        .await
        .unwrap();
    assert!(view.credit_options_enabled);
    payment::set_payment_type(&console.session, PaymentType::Credit).unwrap();

    // dropping the customer takes the credit sale with it
    let view = customer::clear_customer(&console.session).unwrap();
    assert!(!view.credit_options_enabled);
    assert_eq!(view.payment.payment_type, PaymentType::Cash);
    assert_eq!(view.payment.amount, Money::from_minor(144_300));
}

#[tokio::test]
async fn short_search_skips_backend() {
    let stub = Arc::new(StubBackend::new());
    let console = console_with(&stub, 1100).await;

    let results =
        product::search_products(&console.session, console.backend.as_ref(), "k".to_string())
            .await
            .unwrap();
    assert!(results.is_empty());
    assert_eq!(stub.search_calls.load(Ordering::SeqCst), 0);

    let results =
        product::search_products(&console.session, console.backend.as_ref(), "ko".to_string())
            .await
            .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(stub.search_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn adding_item_clears_search_query() {
    let stub = Arc::new(StubBackend::new());
    let console = console_with(&stub, 1100).await;

    product::search_products(&console.session, console.backend.as_ref(), "kopi".to_string())
        .await
        .unwrap();
    let cart = cart::add_to_cart(&console.session, 1).unwrap();
    assert_eq!(cart.search_query, "");

    // picking again needs a new search
    let err = cart::add_to_cart(&console.session, 1).unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn created_customer_is_selected() {
    let stub = Arc::new(StubBackend::new());
    let console = console_with(&stub, 1100).await;

    let view = customer::create_and_select_customer(
        &console.session,
        console.backend.as_ref(),
        NewCustomer {
            name: "  Warung Bu Sri ".to_string(),
            phone: Some("".to_string()),
            email: None,
        },
    )
    .await
    .unwrap();

    let selected = view.customer.unwrap();
    assert_eq!(selected.customer.id, 77);
    assert_eq!(selected.customer.name, "Warung Bu Sri");
    assert_eq!(selected.customer.phone, None);
    // the stub has no credit data; the customer stays selected without it
    assert_eq!(selected.credit, None);

    let err = customer::create_and_select_customer(
        &console.session,
        console.backend.as_ref(),
        NewCustomer {
            name: " ".to_string(),
            phone: None,
            email: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn clear_cart_resets_customer_and_payment() {
    let stub = Arc::new(StubBackend {
        credit: Some((1_000_000, 0)),
        ..StubBackend::new()
    });
    let console = console_with(&stub, 1100).await;
    fill_reference_cart(&console).await;
    customer::select_customer(&console.session, console.backend.as_ref(), toko_maju())
        .await
        .unwrap();
    payment::set_payment_type(&console.session, PaymentType::Credit).unwrap();
    cart::set_cash_tendered(&console.session, Some(Money::from_minor(200_000))).unwrap();

    let cart = cart::clear_cart(&console.session).unwrap();
    assert!(cart.lines.is_empty());
    assert_eq!(cart.cash_tendered, None);

    let view = console.session.with_session(|s| payment::CheckoutView::from(s));
    assert!(view.customer.is_none());
    assert_eq!(view.payment.payment_type, PaymentType::Cash);
}
