//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌───────────────────────────┐         │
//! │  │    InventoryItem     │  many  │      SummaryRecord        │         │
//! │  │  ──────────────────  │ ─────► │  ───────────────────────  │         │
//! │  │  id (UUID, PK)       │        │  total_quantity           │         │
//! │  │  name (not unique)   │        │  total_value (Money)      │         │
//! │  │  quantity (>= 0)     │        │  spoilage_count           │         │
//! │  │  price (Money >= 0)  │        │  restock_signal           │         │
//! │  │  expiration_date     │        │  unique_name_count        │         │
//! │  └──────────────────────┘        └───────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `id` is assigned once by the engine at creation and never changes.
//! `name` is a display label: two items may share it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Inventory Item
// =============================================================================

/// One stocked product line.
///
/// The field names map onto the `inventory_items` table; `price` is stored
/// as `price_cents` and `expiration_date` as `expiration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Unique identifier (UUID v4), the store's primary key.
    pub id: String,

    /// Display label shown in the table.
    pub name: String,

    /// Units on hand. Never negative.
    pub quantity: i64,

    /// Unit price. Never negative.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    pub price: Money,

    /// Last day the item may be sold.
    #[ts(as = "String")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "expiration"))]
    pub expiration_date: NaiveDate,
}

impl InventoryItem {
    /// An item is spoiled once its expiration date is today or earlier.
    #[inline]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date <= today
    }

    /// Value of the stock on hand (`quantity × price`).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn milk(expiration_date: NaiveDate) -> InventoryItem {
        InventoryItem {
            id: "a".to_string(),
            name: "Milk".to_string(),
            quantity: 10,
            price: Money::from_cents(250),
            expiration_date,
        }
    }

    #[test]
    fn test_expiry_is_inclusive_of_today() {
        let today = date(2024, 6, 1);
        assert!(milk(date(2024, 5, 31)).is_expired(today));
        assert!(milk(today).is_expired(today));
        assert!(!milk(date(2024, 6, 2)).is_expired(today));
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(milk(date(2024, 6, 1)).stock_value(), Money::from_cents(2500));
    }

    #[test]
    fn test_json_shape_uses_camel_case() {
        let json = serde_json::to_value(milk(date(2024, 6, 1))).unwrap();
        assert_eq!(json["expirationDate"], "2024-06-01");
        assert_eq!(json["price"], 250);
        assert_eq!(json["quantity"], 10);
    }
}
