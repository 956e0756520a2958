//! # Validation Module
//!
//! Field validators for the checkout forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: POS page                                                     │
//! │  └── Immediate feedback (disabled buttons, inline hints)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: kasir-core (THIS MODULE)                                     │
//! │  └── Per-field rules, reported as ValidationError { field, .. }        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Admin backend                                                │
//! │  └── Authoritative checks (stock, permissions, ledger)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_LINE_QUANTITY, MAX_UNIT_PRICE, MIN_SEARCH_CHARS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest search query sent to the backend.
pub const MAX_SEARCH_CHARS: usize = 100;

/// Longest payment reference (transfer number, card slip).
pub const MAX_REFERENCE_CHARS: usize = 100;

/// Longest free-text note on a sale.
pub const MAX_NOTES_CHARS: usize = 500;

/// Longest credit term a cashier may grant.
pub const MAX_TERMS_DAYS: u32 = 365;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product search query.
///
/// ## Returns
/// - `Ok(Some(query))` trimmed, when long enough to search
/// - `Ok(None)` when shorter than [`MIN_SEARCH_CHARS`]; nothing is searched
/// - `Err` when longer than [`MAX_SEARCH_CHARS`]
///
/// ```rust
/// use kasir_core::validation::validate_search_query;
///
/// assert_eq!(validate_search_query(" ko ").unwrap(), Some("ko".to_string()));
/// assert_eq!(validate_search_query("k").unwrap(), None);
/// ```
pub fn validate_search_query(query: &str) -> ValidationResult<Option<String>> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_CHARS {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_CHARS,
        });
    }

    if query.chars().count() < MIN_SEARCH_CHARS {
        return Ok(None);
    }

    Ok(Some(query.to_string()))
}

/// Validates a customer name for quick customer creation.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an optional phone number: digits, spaces, `+` and `-` only.
pub fn validate_phone(phone: Option<&str>) -> ValidationResult<()> {
    let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(());
    };

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, '+' and '-'".to_string(),
        });
    }

    if phone.chars().filter(|c| c.is_ascii_digit()).count() < 6 {
        return Err(ValidationError::TooShort {
            field: "phone".to_string(),
            min: 6,
        });
    }

    Ok(())
}

/// Validates an optional payment reference.
pub fn validate_reference(reference: Option<&str>) -> ValidationResult<()> {
    if let Some(reference) = reference {
        if reference.trim().chars().count() > MAX_REFERENCE_CHARS {
            return Err(ValidationError::TooLong {
                field: "reference".to_string(),
                max: MAX_REFERENCE_CHARS,
            });
        }
    }
    Ok(())
}

/// Validates optional sale notes.
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<()> {
    if let Some(notes) = notes {
        if notes.trim().chars().count() > MAX_NOTES_CHARS {
            return Err(ValidationError::TooLong {
                field: "notes".to_string(),
                max: MAX_NOTES_CHARS,
            });
        }
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity that will be stored in the cart.
///
/// Zero and negative quantities never reach here; the cart removes the line
/// instead.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.minor() > MAX_UNIT_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

/// Validates the amount collected now. Must be positive.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates credit terms in days.
pub fn validate_terms_days(days: u32) -> ValidationResult<()> {
    if days > MAX_TERMS_DAYS {
        return Err(ValidationError::OutOfRange {
            field: "terms_days".to_string(),
            min: 0,
            max: MAX_TERMS_DAYS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
