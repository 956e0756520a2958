//! # Product Commands
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Search Flow                                  │
//! │                                                                         │
//! │  Cashier types "ko"                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  search_products("ko") ── query stored in session                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  Shorter than 2 characters?               │──► YES: [] (no call)    │
//! │  └───────────────────────────────────────────┘                         │
//! │       │ NO                                                              │
//! │       ▼                                                                 │
//! │  GET /api/pos/products/search?q=ko                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results stored unless the query changed meanwhile                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use tracing::{debug, warn};

use kasir_api::PosBackend;
use kasir_core::types::ProductSummary;
use kasir_core::validation::validate_search_query;

use crate::error::ConsoleResult;
use crate::state::SessionState;

/// Searches products by name, SKU or barcode.
///
/// ## Arguments
/// * `query` - Raw text from the search box
///
/// ## Returns
/// Matching products, or an empty list for short queries.
pub async fn search_products(
    session: &SessionState,
    backend: &dyn PosBackend,
    query: String,
) -> ConsoleResult<Vec<ProductSummary>> {
    debug!(query = %query, "search_products command");

    session.with_session_mut(|s| s.set_search_query(query.clone()));

    let Some(term) = validate_search_query(&query)? else {
        session.with_session_mut(|s| s.set_search_results(&query, Vec::new()));
        return Ok(Vec::new());
    };

    let start = Instant::now();
    let products = backend.search_products(&term).await.map_err(|e| {
        warn!(query = %term, error = %e, "Product search failed");
        e
    })?;

    debug!(
        query = %term,
        results = products.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Product search completed"
    );

    session.with_session_mut(|s| s.set_search_results(&query, products.clone()));
    Ok(products)
}
