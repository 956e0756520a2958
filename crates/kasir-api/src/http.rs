//! # HTTP Backend
//!
//! [`PosBackend`] over the admin backend's REST API.
//!
//! ## Endpoints
//! ```text
//! GET  /api/pos/products/search?q=…       → Vec<ProductSummary>
//! GET  /api/customers?search=…            → Vec<CustomerRecord>
//! POST /api/customers                     → CustomerRecord
//! GET  /api/customers/{id}/outstanding    → OutstandingResponse
//! GET  /api/payment-methods?active=1      → Vec<PaymentMethodOption>
//! POST /api/sales                         → SaleCreated
//! GET  /api/cash-sessions/current         → CashSessionState | null
//! ```
//!
//! Every body is wrapped in [`ApiEnvelope`]. Nothing here retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use kasir_core::types::{CustomerId, CustomerSummary, ProductSummary};
use kasir_core::SaleRequest;

use crate::backend::PosBackend;
use crate::dto::{
    ApiEnvelope, CashSessionState, CustomerRecord, ErrorBody, NewCustomer, OutstandingResponse,
    PaymentMethodOption, SaleCreated,
};
use crate::error::{ApiClientError, ApiResult};

/// Default timeout for backend requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// URL normalisation
// ---------------------------------------------------------------------------

/// Normalise the backend URL:
/// - strip trailing slashes
/// - strip a trailing `/api` segment (paths below already carry it)
/// - ensure a scheme is present (https, or http for localhost)
pub fn normalize_base_url(url: &str) -> String {
    let mut url = url.trim().to_string();

    if !url.starts_with("http://") && !url.starts_with("https://") {
        if url.starts_with("localhost") || url.starts_with("127.0.0.1") {
            url = format!("http://{url}");
        } else {
            url = format!("https://{url}");
        }
    }

    while url.ends_with('/') {
        url.pop();
    }

    if url.ends_with("/api") {
        url.truncate(url.len() - 4);
    }

    while url.ends_with('/') {
        url.pop();
    }

    url
}

/// Whether a normalised URL has anything after its scheme.
fn has_host(url: &str) -> bool {
    url.split_once("://")
        .map(|(_, rest)| !rest.trim_matches('/').is_empty())
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn transport_error(url: &str, err: &reqwest::Error) -> ApiClientError {
    if err.is_connect() {
        return ApiClientError::Unreachable {
            url: url.to_string(),
        };
    }
    if err.is_timeout() {
        return ApiClientError::Timeout {
            url: url.to_string(),
        };
    }
    if err.is_builder() {
        return ApiClientError::InvalidConfig(format!("invalid backend URL: {url}"));
    }
    ApiClientError::Network(format!("{url}: {err}"))
}

fn status_error(status: StatusCode, body: ErrorBody) -> ApiClientError {
    let message = body.into_message();
    match status.as_u16() {
        401 => ApiClientError::Unauthorized {
            message: message.unwrap_or_else(|| "API token is invalid or expired".to_string()),
        },
        403 => ApiClientError::Unauthorized {
            message: message.unwrap_or_else(|| "this register is not authorized".to_string()),
        },
        404 => ApiClientError::Status {
            status: 404,
            message: message.unwrap_or_else(|| "endpoint not found".to_string()),
        },
        s if s >= 500 => ApiClientError::Status {
            status: s,
            message: message.unwrap_or_else(|| "server error".to_string()),
        },
        s => ApiClientError::Status {
            status: s,
            message: message.unwrap_or_else(|| "unexpected response".to_string()),
        },
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Connection settings for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    pub base_url: String,
    /// Sent as `Authorization: Bearer …` when present.
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl HttpBackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpBackendConfig {
            base_url: base_url.into(),
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// reqwest-backed [`PosBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &HttpBackendConfig) -> ApiResult<Self> {
        let base_url = normalize_base_url(&config.base_url);
        if !has_host(&base_url) {
            return Err(ApiClientError::InvalidConfig(
                "backend URL is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiClientError::InvalidConfig(format!("failed to create HTTP client: {e}")))?;

        Ok(HttpBackend {
            client,
            base_url,
            api_token: config
                .api_token
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<ApiEnvelope<T>> {
        let url = self.url(path);
        debug!(%url, "GET");
        let request = self.authorize(self.client.get(&url).query(query));
        self.send(&url, request).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<ApiEnvelope<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");
        let request = self.authorize(self.client.post(&url).json(body));
        self.send(&url, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        url: &str,
        request: RequestBuilder,
    ) -> ApiResult<ApiEnvelope<T>> {
        let resp = request.send().await.map_err(|e| {
            let err = transport_error(url, &e);
            warn!(%url, error = %err, "backend request failed");
            err
        })?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| transport_error(url, &e))?;

        if !status.is_success() {
            let body = serde_json::from_slice::<ErrorBody>(&bytes).unwrap_or_default();
            let err = status_error(status, body);
            warn!(%url, status = status.as_u16(), error = %err, "backend returned an error");
            return Err(err);
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiClientError::Decode(format!("{url}: {e}")))
    }
}

#[async_trait]
impl PosBackend for HttpBackend {
    async fn search_products(&self, query: &str) -> ApiResult<Vec<ProductSummary>> {
        self.get("/api/pos/products/search", &[("q", query)])
            .await?
            .into_result()
    }

    async fn list_customers(&self, search: Option<&str>) -> ApiResult<Vec<CustomerSummary>> {
        let query: Vec<(&str, &str)> = search.map(|s| ("search", s)).into_iter().collect();
        let records: Vec<CustomerRecord> = self.get("/api/customers", &query).await?.into_result()?;
        Ok(records
            .into_iter()
            .filter(|r| r.is_active != Some(false))
            .map(CustomerSummary::from)
            .collect())
    }

    async fn create_customer(&self, customer: &NewCustomer) -> ApiResult<CustomerSummary> {
        let record: CustomerRecord = self.post("/api/customers", customer).await?.into_result()?;
        Ok(record.into())
    }

    async fn customer_outstanding(&self, id: CustomerId) -> ApiResult<OutstandingResponse> {
        self.get(&format!("/api/customers/{id}/outstanding"), &[])
            .await?
            .into_result()
    }

    async fn payment_methods(&self) -> ApiResult<Vec<PaymentMethodOption>> {
        let methods: Vec<PaymentMethodOption> = self
            .get("/api/payment-methods", &[("active", "1")])
            .await?
            .into_result()?;
        Ok(methods.into_iter().filter(|m| m.is_active).collect())
    }

    async fn create_sale(&self, sale: &SaleRequest) -> ApiResult<SaleCreated> {
        self.post("/api/sales", sale).await?.into_result()
    }

    async fn cash_session(&self) -> ApiResult<CashSessionState> {
        match self
            .get::<CashSessionState>("/api/cash-sessions/current", &[])
            .await
        {
            Ok(envelope) => Ok(envelope
                .into_optional()?
                .unwrap_or_else(CashSessionState::closed)),
            Err(ApiClientError::Status { status: 404, .. }) => Ok(CashSessionState::closed()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("admin.toko.id/api/"),
            "https://admin.toko.id"
        );
        assert_eq!(
            normalize_base_url("localhost:8000"),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url(" http://10.0.0.5:8000/ "),
            "http://10.0.0.5:8000"
        );
    }

    #[test]
    fn test_status_error_mapping() {
        let err = status_error(StatusCode::UNAUTHORIZED, ErrorBody::default());
        assert!(matches!(err, ApiClientError::Unauthorized { .. }));

        let body = ErrorBody {
            message: Some("Insufficient stock".to_string()),
            error: None,
        };
        match status_error(StatusCode::UNPROCESSABLE_ENTITY, body) {
            ApiClientError::Status { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Insufficient stock");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_url_rejected() {
        for url in ["", "  ", "/", "https://", "http:///"] {
            let err = HttpBackend::new(&HttpBackendConfig::new(url)).unwrap_err();
            assert!(
                matches!(err, ApiClientError::InvalidConfig(_)),
                "{url:?} was accepted"
            );
        }
    }

    #[test]
    fn test_has_host() {
        assert!(has_host("https://pos.example.id"));
        assert!(!has_host("https:"));
        assert!(!has_host("https://"));
    }

    #[test]
    fn test_blank_token_dropped() {
        let mut config = HttpBackendConfig::new("localhost:8000");
        config.api_token = Some("  ".to_string());
        let backend = HttpBackend::new(&config).unwrap();
        assert!(backend.api_token.is_none());
        assert_eq!(backend.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let mut config = HttpBackendConfig::new("http://127.0.0.1:9");
        config.timeout = Duration::from_secs(2);
        let backend = HttpBackend::new(&config).unwrap();

        let err = backend.payment_methods().await.unwrap_err();
        assert!(err.is_transient(), "unexpected error: {err:?}");
    }
}
