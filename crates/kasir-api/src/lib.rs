//! # kasir-api: Admin Backend Client
//!
//! Typed access to the REST backend that owns products, customers, credit
//! limits, payment methods, cash sessions and sales.
//!
//! ## Module Organization
//! ```text
//! kasir_api
//! ├── backend  - PosBackend trait (the seam the console depends on)
//! ├── dto      - Envelope and wire types
//! ├── error    - ApiClientError
//! └── http     - HttpBackend (reqwest)
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use kasir_api::{HttpBackend, HttpBackendConfig, PosBackend};
//!
//! # async fn demo() -> kasir_api::ApiResult<()> {
//! let backend = HttpBackend::new(&HttpBackendConfig::new("http://localhost:8000"))?;
//! let session = backend.cash_session().await?;
//! println!("register open: {}", session.is_open);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod dto;
pub mod error;
pub mod http;

pub use backend::PosBackend;
pub use dto::{
    ApiEnvelope, CashSessionState, CreditLimitInfo, CustomerRecord, NewCustomer,
    OutstandingResponse, OutstandingSummary, PaymentMethodOption, SaleCreated,
};
pub use error::{ApiClientError, ApiResult};
pub use http::{normalize_base_url, HttpBackend, HttpBackendConfig, DEFAULT_TIMEOUT};
