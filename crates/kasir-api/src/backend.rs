//! # Backend Seam
//!
//! Every call the POS page makes to the admin backend goes through
//! [`PosBackend`]. The console holds it as `Arc<dyn PosBackend>`; production
//! uses [`crate::HttpBackend`], tests plug in an in-memory stub.

use async_trait::async_trait;

use kasir_core::types::{CustomerId, CustomerSummary, ProductSummary};
use kasir_core::SaleRequest;

use crate::dto::{CashSessionState, NewCustomer, OutstandingResponse, PaymentMethodOption, SaleCreated};
use crate::error::ApiResult;

/// Typed operations against the admin backend.
#[async_trait]
pub trait PosBackend: Send + Sync {
    /// Free-text product search. Callers enforce the minimum query length.
    async fn search_products(&self, query: &str) -> ApiResult<Vec<ProductSummary>>;

    /// Customer listing, optionally filtered by name or code.
    async fn list_customers(&self, search: Option<&str>) -> ApiResult<Vec<CustomerSummary>>;

    /// Quick customer creation from the POS page.
    async fn create_customer(&self, customer: &NewCustomer) -> ApiResult<CustomerSummary>;

    /// Credit limit and receivables of one customer.
    async fn customer_outstanding(&self, id: CustomerId) -> ApiResult<OutstandingResponse>;

    /// Active payment methods.
    async fn payment_methods(&self) -> ApiResult<Vec<PaymentMethodOption>>;

    /// Creates the sale. Not retried.
    async fn create_sale(&self, sale: &SaleRequest) -> ApiResult<SaleCreated>;

    /// Current register session.
    async fn cash_session(&self) -> ApiResult<CashSessionState>;
}
