//! # Wire Types
//!
//! Request and response bodies of the admin backend.
//!
//! Every response is wrapped in the backend's envelope:
//! ```json
//! { "success": true, "data": { ... }, "message": null }
//! ```
//! Amounts are integer minor units, matching `kasir_core::Money`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kasir_core::types::{CustomerCredit, CustomerId, CustomerSummary, PaymentMethodId};
use kasir_core::validation::{validate_customer_name, validate_phone, ValidationResult};
use kasir_core::Money;

use crate::error::{ApiClientError, ApiResult};

// =============================================================================
// Envelope
// =============================================================================

/// Standard response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_true")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_true() -> bool {
    true
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload, turning `success: false` into a rejection.
    pub fn into_result(self) -> ApiResult<T> {
        self.into_optional()?
            .ok_or_else(|| ApiClientError::Decode("response has no data".to_string()))
    }

    /// Like [`ApiEnvelope::into_result`], but `data: null` is a valid answer.
    pub fn into_optional(self) -> ApiResult<Option<T>> {
        if !self.success {
            return Err(ApiClientError::Rejected {
                message: self
                    .message
                    .unwrap_or_else(|| "request was not accepted".to_string()),
            });
        }
        Ok(self.data)
    }
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}

// =============================================================================
// Customers
// =============================================================================

/// Customer record as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<CustomerRecord> for CustomerSummary {
    fn from(record: CustomerRecord) -> Self {
        CustomerSummary {
            id: record.id,
            name: record.name,
            code: record.code,
            phone: record.phone,
        }
    }
}

/// Body for quick customer creation from the POS page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl NewCustomer {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_customer_name(&self.name)?;
        validate_phone(self.phone.as_deref())?;
        Ok(())
    }
}

/// Credit facility part of the outstanding lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLimitInfo {
    pub credit_limit: Money,
    #[serde(default)]
    pub available_credit: Money,
}

/// Receivables summary part of the outstanding lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingSummary {
    /// Current accounts-receivable balance.
    pub total_outstanding: Money,
    #[serde(default)]
    pub overdue_amount: Money,
    #[serde(default)]
    pub open_invoices: i64,
}

/// Response of the customer outstanding-balance lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingResponse {
    pub customer: CustomerRecord,
    pub credit_limit: CreditLimitInfo,
    pub summary: OutstandingSummary,
}

impl OutstandingResponse {
    /// The figures the credit evaluator needs.
    pub fn customer_credit(&self) -> CustomerCredit {
        CustomerCredit::new(
            self.credit_limit.credit_limit,
            self.summary.total_outstanding,
        )
    }
}

// =============================================================================
// Payment Methods
// =============================================================================

/// A payment method the cashier can pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodOption {
    pub id: PaymentMethodId,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

// =============================================================================
// Cash Session
// =============================================================================

/// Register state. Sales can only be submitted while a session is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashSessionState {
    pub status: String,
    pub is_open: bool,
    #[serde(default)]
    pub opened_at: Option<DateTime<Utc>>,
}

impl CashSessionState {
    /// State reported when the backend has no session for this register.
    pub fn closed() -> Self {
        CashSessionState {
            status: "closed".to_string(),
            is_open: false,
            opened_at: None,
        }
    }
}

// =============================================================================
// Sales
// =============================================================================

/// Acknowledgement of a created sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCreated {
    pub id: i64,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub total: Option<Money>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_success() {
        let env: ApiEnvelope<Vec<PaymentMethodOption>> = serde_json::from_value(json!({
            "success": true,
            "data": [{ "id": 1, "name": "Tunai" }]
        }))
        .unwrap();
        let methods = env.into_result().unwrap();
        assert_eq!(methods.len(), 1);
        assert!(methods[0].is_active);
    }

    #[test]
    fn test_envelope_rejected() {
        let env: ApiEnvelope<SaleCreated> = serde_json::from_value(json!({
            "success": false,
            "message": "Cash session is closed"
        }))
        .unwrap();
        match env.into_result().unwrap_err() {
            ApiClientError::Rejected { message } => assert_eq!(message, "Cash session is closed"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_missing_data() {
        let env: ApiEnvelope<SaleCreated> = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            env.into_result(),
            Err(ApiClientError::Decode(_))
        ));
    }

    #[test]
    fn test_outstanding_to_customer_credit() {
        let resp: OutstandingResponse = serde_json::from_value(json!({
            "customer": { "id": 9, "name": "Toko Maju", "code": "C-009" },
            "credit_limit": { "credit_limit": 100000, "available_credit": 20000 },
            "summary": { "total_outstanding": 80000 }
        }))
        .unwrap();

        let credit = resp.customer_credit();
        assert_eq!(credit.credit_limit, Money::from_minor(100_000));
        assert_eq!(credit.current_balance, Money::from_minor(80_000));
        assert_eq!(credit.available_credit(), resp.credit_limit.available_credit);

        let summary: CustomerSummary = resp.customer.into();
        assert_eq!(summary.code.as_deref(), Some("C-009"));
    }

    #[test]
    fn test_new_customer_validation() {
        let ok = NewCustomer {
            name: "Budi".to_string(),
            phone: Some("0812 3456 7890".to_string()),
            email: None,
        };
        assert!(ok.validate().is_ok());

        let bad = NewCustomer {
            name: " ".to_string(),
            phone: None,
            email: None,
        };
        assert!(bad.validate().is_err());

        let json = serde_json::to_value(&ok).unwrap();
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = serde_json::from_value(json!({ "error": "forbidden" })).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("forbidden"));
        assert_eq!(ErrorBody::default().into_message(), None);
    }
}
