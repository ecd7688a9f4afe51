//! # Validation Module
//!
//! Field rules enforced at every mutation boundary, and the parsers that
//! turn raw prompt text into typed values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Prompt / form (renderer side)                                │
//! │  └── parse_* turns "12" / "2.50" / "2024-06-01" into typed values      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: InventoryEngine (stockroom-sync)                             │
//! │  └── validate_* rejects negative quantity/price, empty names           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store (SQLite)                                               │
//! │  └── CHECK (quantity >= 0), CHECK (price_cents >= 0)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{parse_price, validate_quantity};
//!
//! assert_eq!(parse_price("2.50").unwrap().cents(), 250);
//! assert!(validate_quantity(-1).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an item name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - No length limit
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_item_name;
///
/// assert_eq!(validate_item_name("  Milk ").unwrap(), "Milk");
/// assert!(validate_item_name("   ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    Ok(name.to_string())
}

/// Validates a stock quantity. Zero is allowed (sold out).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a restock target.
///
/// Restocking to zero or below is meaningless, so the target must be a
/// positive integer.
pub fn validate_restock_target(target: i64) -> ValidationResult<()> {
    if target <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "restock target".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Prompt Parsers
// =============================================================================

/// Parses a quantity typed into a prompt.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::parse_quantity;
///
/// assert_eq!(parse_quantity(" 12 ").unwrap(), 12);
/// assert!(parse_quantity("twelve").is_err());
/// assert!(parse_quantity("-3").is_err());
/// ```
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let qty = parse_integer("quantity", input)?;
    validate_quantity(qty)?;
    Ok(qty)
}

/// Parses a restock target typed into a prompt.
pub fn parse_restock_target(input: &str) -> ValidationResult<i64> {
    let target = parse_integer("restock target", input)?;
    validate_restock_target(target)?;
    Ok(target)
}

/// Parses a decimal price ("3", "2.5", "2.50") into [`Money`].
///
/// ## Rules
/// - Plain decimal digits with an optional `.` and at most two fractional digits
/// - No sign, exponent, thousands separator or currency symbol
/// - "NaN", "inf" and friends are rejected as non-numeric
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::parse_price;
///
/// assert_eq!(parse_price("3").unwrap().cents(), 300);
/// assert_eq!(parse_price("2.5").unwrap().cents(), 250);
/// assert!(parse_price("-1").is_err());
/// assert!(parse_price("1.999").is_err());
/// assert!(parse_price("NaN").is_err());
/// ```
pub fn parse_price(input: &str) -> ValidationResult<Money> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "price".to_string(),
        });
    }

    if input.starts_with('-') {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    let (major, minor) = match input.split_once('.') {
        Some((major, minor)) => (major, minor),
        None => (input, ""),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (major.is_empty() && minor.is_empty()) || !all_digits(major) || !all_digits(minor) {
        return Err(ValidationError::invalid_format("price", "not a number"));
    }

    if minor.len() > 2 {
        return Err(ValidationError::invalid_format(
            "price",
            "at most two decimal places",
        ));
    }

    let major: i64 = if major.is_empty() {
        0
    } else {
        major
            .parse()
            .map_err(|_| ValidationError::invalid_format("price", "too large"))?
    };

    let minor: i64 = match minor.len() {
        0 => 0,
        1 => minor.parse::<i64>().unwrap_or(0) * 10,
        _ => minor.parse::<i64>().unwrap_or(0),
    };

    let cents = major
        .checked_mul(100)
        .and_then(|c| c.checked_add(minor))
        .ok_or_else(|| ValidationError::invalid_format("price", "too large"))?;

    Ok(Money::from_cents(cents))
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_expiration_date(input: &str) -> ValidationResult<NaiveDate> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "expiration date".to_string(),
        });
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| ValidationError::invalid_format("expiration date", e.to_string()))
}

fn parse_integer(field: &str, input: &str) -> ValidationResult<i64> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    input
        .parse::<i64>()
        .map_err(|_| ValidationError::invalid_format(field, "not a whole number"))
}

// =============================================================================
// Unit Tests
// =============================================================================
