//! # Domain Types
//!
//! Shared types used throughout the Kasir POS core.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ProductSummary  │   │ CustomerSummary │   │ CustomerCredit  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  credit_limit   │       │
//! │  │  selling_price  │   │  name, code     │   │  current_balance│       │
//! │  │  warehouse_id   │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  PaymentType    │   │ CurrencyFormat  │       │
//! │  │  bps (u32)      │   │  Cash           │   │  "Rp", 0 dec    │       │
//! │  │  1100 = 11%     │   │  Credit         │   │  "." groups     │       │
//! │  │                 │   │  PartialCredit  │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are the backend's numeric primary keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

/// Backend product id.
pub type ProductId = i64;
/// Backend warehouse id.
pub type WarehouseId = i64;
/// Backend customer id.
pub type CustomerId = i64;
/// Backend payment method id.
pub type PaymentMethodId = i64;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1100 bps = 11% (regional VAT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage such as `11.0`.
    ///
    /// Only used when reading human-entered configuration.
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Payment Type
// =============================================================================

/// How the customer settles the sale.
///
/// ```text
///            ┌──────────── customer selected ────────────┐
///            │                                           ▼
///        ┌──────┐  ◄──────────────────────────────  ┌─────────┐
///        │ Cash │                                   │ Credit  │
///        └──────┘  ──────────────────────────────►  └─────────┘
///            ▲ │                                       ▲  │
///            │ ▼                                       │  ▼
///        ┌──────────────────────────────────────────────────┐
///        │                  PartialCredit                   │
///        └──────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Paid in full now.
    #[default]
    Cash,
    /// Whole total goes on the customer's account.
    Credit,
    /// Part paid now, the rest on account. The amount paid now must be
    /// below the total.
    PartialCredit,
}

impl PaymentType {
    /// Credit and partial credit put an amount on the customer's account.
    pub fn uses_credit(&self) -> bool {
        !matches!(self, PaymentType::Cash)
    }

    /// Credit and partial credit need a selected customer.
    pub fn requires_customer(&self) -> bool {
        self.uses_credit()
    }

    /// Wire name, as sent to the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "cash",
            PaymentType::Credit => "credit",
            PaymentType::PartialCredit => "partial_credit",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Currency Format
// =============================================================================

/// How amounts are rendered for the cashier.
///
/// Defaults to Indonesian Rupiah: `Rp 1.250.000`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurrencyFormat {
    /// Currency symbol placed before the number.
    pub symbol: String,
    /// Put a space between symbol and number.
    pub space_after_symbol: bool,
    /// Number of minor digits in one major unit.
    pub decimals: u8,
    /// Thousands separator.
    pub group_separator: char,
    /// Separator between major and minor digits.
    pub decimal_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: "Rp".to_string(),
            space_after_symbol: true,
            decimals: 0,
            group_separator: '.',
            decimal_separator: ',',
        }
    }
}

impl CurrencyFormat {
    /// Formats an amount for display.
    ///
    /// ```rust
    /// use kasir_core::money::Money;
    /// use kasir_core::types::CurrencyFormat;
    ///
    /// let idr = CurrencyFormat::default();
    /// assert_eq!(idr.format(Money::from_minor(20_000)), "Rp 20.000");
    /// assert_eq!(idr.format(Money::from_minor(-1_500)), "-Rp 1.500");
    /// ```
    pub fn format(&self, amount: Money) -> String {
        let minor = amount.minor();
        let divisor = 10_u64.pow(self.decimals as u32);
        let magnitude = minor.unsigned_abs();
        let whole = magnitude / divisor;
        let frac = magnitude % divisor;

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.group_separator);
            }
            grouped.push(ch);
        }

        let mut out = String::new();
        if minor < 0 {
            out.push('-');
        }
        out.push_str(&self.symbol);
        if self.space_after_symbol {
            out.push(' ');
        }
        out.push_str(&grouped);
        if self.decimals > 0 {
            out.push(self.decimal_separator);
            out.push_str(&format!("{:0width$}", frac, width = self.decimals as usize));
        }
        out
    }
}

// =============================================================================
// Product
// =============================================================================

/// A sellable product as returned by product search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub sku: String,
    /// Current selling price; captured into the cart line when added.
    pub selling_price: Money,
    /// Stock available in `warehouse_id`.
    #[serde(default)]
    pub available_stock: i64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub warehouse_id: WarehouseId,
}

impl ProductSummary {
    /// Builds a product with only the fields the cart needs.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        selling_price: Money,
        warehouse_id: WarehouseId,
    ) -> Self {
        ProductSummary {
            id,
            name: name.into(),
            sku: String::new(),
            selling_price,
            available_stock: 0,
            unit: None,
            category: None,
            warehouse_id,
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// The customer attached to the sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Outstanding data the credit evaluator works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerCredit {
    /// Maximum outstanding balance allowed. Zero means "no credit".
    pub credit_limit: Money,
    /// What the customer owes right now.
    pub current_balance: Money,
}

impl CustomerCredit {
    pub fn new(credit_limit: Money, current_balance: Money) -> Self {
        CustomerCredit {
            credit_limit,
            current_balance,
        }
    }

    /// `credit_limit - current_balance`; negative when already over limit.
    pub fn available_credit(&self) -> Money {
        self.credit_limit - self.current_balance
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate() {
        let rate = TaxRate::from_bps(1100);
        assert_eq!(rate.bps(), 1100);
        assert!((rate.percentage() - 11.0).abs() < 0.001);
        assert_eq!(TaxRate::from_percentage(11.0), rate);
    }

    #[test]
    fn test_payment_type_wire_name() {
        let json = serde_json::to_string(&PaymentType::PartialCredit).unwrap();
        assert_eq!(json, "\"partial_credit\"");
        assert_eq!(PaymentType::default(), PaymentType::Cash);
        assert!(!PaymentType::Cash.requires_customer());
        assert!(PaymentType::Credit.requires_customer());
    }

    #[test]
    fn test_format_idr() {
        let idr = CurrencyFormat::default();
        assert_eq!(idr.format(Money::zero()), "Rp 0");
        assert_eq!(idr.format(Money::from_minor(999)), "Rp 999");
        assert_eq!(idr.format(Money::from_minor(1_000)), "Rp 1.000");
        assert_eq!(idr.format(Money::from_minor(144_300)), "Rp 144.300");
        assert_eq!(idr.format(Money::from_minor(1_250_000)), "Rp 1.250.000");
    }

    #[test]
    fn test_format_with_decimals() {
        let usd = CurrencyFormat {
            symbol: "$".to_string(),
            space_after_symbol: false,
            decimals: 2,
            group_separator: ',',
            decimal_separator: '.',
        };
        assert_eq!(usd.format(Money::from_minor(123_456)), "$1,234.56");
        assert_eq!(usd.format(Money::from_minor(-5)), "-$0.05");
    }

    #[test]
    fn test_available_credit() {
        let credit = CustomerCredit::new(Money::from_minor(100_000), Money::from_minor(80_000));
        assert_eq!(credit.available_credit(), Money::from_minor(20_000));
    }
}
