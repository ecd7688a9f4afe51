//! # Summary Aggregation
//!
//! Derives the live statistics shown under the inventory table.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  snapshot ──► summarize(items, today, mode) ──► SummaryRecord          │
//! │                                                                         │
//! │  total_quantity     Σ quantity                                          │
//! │  total_value        Σ quantity × price                                  │
//! │  unique_name_count  |{ name }|                                          │
//! │  spoilage_count ┐                                                       │
//! │  restock_signal ┘   depend on SignalMode (see below)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Signal Modes
//! The legacy table overwrote its spoilage and restock flags for every row,
//! so only the last row decided them. [`SignalMode::LastItem`] keeps that
//! behaviour and is the default. [`SignalMode::Accumulate`] counts across
//! the whole collection and must be chosen explicitly in configuration.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::InventoryItem;

// =============================================================================
// Signal Mode
// =============================================================================

/// How `spoilage_count` and `restock_signal` are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalMode {
    /// Each item overwrites the flags; the last item processed wins.
    #[default]
    LastItem,

    /// Flags are counted across every item.
    Accumulate,
}

impl fmt::Display for SignalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalMode::LastItem => write!(f, "last_item"),
            SignalMode::Accumulate => write!(f, "accumulate"),
        }
    }
}

impl FromStr for SignalMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last_item" | "last-item" | "legacy" => Ok(SignalMode::LastItem),
            "accumulate" | "count" => Ok(SignalMode::Accumulate),
            other => Err(ValidationError::InvalidFormat {
                field: "signal_mode".to_string(),
                reason: format!("unknown mode '{}', expected last_item or accumulate", other),
            }),
        }
    }
}

// =============================================================================
// Summary Record
// =============================================================================

/// Aggregate statistics for one snapshot of the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    pub total_quantity: i64,
    pub total_value: Money,
    pub spoilage_count: u64,
    pub restock_signal: u64,
    pub unique_name_count: usize,
}

/// Computes the summary for `items` as of `today`.
///
/// Pure: the same input always yields the same record, and the items are
/// only read.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use stockroom_core::{summarize, SignalMode, SummaryRecord};
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// assert_eq!(summarize(&[], today, SignalMode::LastItem), SummaryRecord::default());
/// ```
pub fn summarize(items: &[InventoryItem], today: NaiveDate, mode: SignalMode) -> SummaryRecord {
    let mut summary = SummaryRecord::default();
    let mut names: HashSet<&str> = HashSet::with_capacity(items.len());

    for item in items {
        summary.total_quantity = summary.total_quantity.saturating_add(item.quantity);
        summary.total_value += item.stock_value();
        names.insert(item.name.as_str());

        let spoiled = u64::from(item.is_expired(today));
        let needs_restock = u64::from(item.quantity <= 0);

        match mode {
            SignalMode::LastItem => {
                summary.spoilage_count = spoiled;
                summary.restock_signal = needs_restock;
            }
            SignalMode::Accumulate => {
                summary.spoilage_count += spoiled;
                summary.restock_signal += needs_restock;
            }
        }
    }

    summary.unique_name_count = names.len();
    summary
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

    fn item(id: &str, name: &str, quantity: i64, cents: i64, exp: NaiveDate) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            name: name.to_string(),
            quantity,
            price: Money::from_cents(cents),
            expiration_date: exp,
        }
    }

    #[test]
    fn test_empty_collection() {
        let summary = summarize(&[], date(2024, 6, 1), SignalMode::LastItem);
        assert_eq!(summary.total_quantity, 0);
        assert_eq!(summary.total_value, Money::zero());
        assert_eq!(summary.spoilage_count, 0);
        assert_eq!(summary.restock_signal, 0);
        assert_eq!(summary.unique_name_count, 0);
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let today = date(2024, 6, 1);
        let items = vec![
            item("a", "Milk", 10, 250, date(2024, 5, 31)),
            item("b", "Milk", 5, 300, date(2025, 6, 1)),
        ];

        let summary = summarize(&items, today, SignalMode::LastItem);
        assert_eq!(summary.unique_name_count, 1);
        assert_eq!(summary.total_quantity, 15);
        assert_eq!(summary.total_value, Money::from_cents(4000));
    }

    #[test]
    fn test_last_item_overwrites_signals() {
        let today = date(2024, 6, 1);
        let items = vec![
            item("a", "Milk", 0, 250, date(2024, 5, 31)),
            item("b", "Bread", 0, 300, date(2024, 1, 1)),
            item("c", "Eggs", 12, 400, date(2025, 1, 1)),
        ];

        // Two spoiled and two sold-out items, but the last row is fine.
        let summary = summarize(&items, today, SignalMode::LastItem);
        assert_eq!(summary.spoilage_count, 0);
        assert_eq!(summary.restock_signal, 0);

        let reversed: Vec<_> = items.iter().rev().cloned().collect();
        let summary = summarize(&reversed, today, SignalMode::LastItem);
        assert_eq!(summary.spoilage_count, 1);
        assert_eq!(summary.restock_signal, 1);
    }

    #[test]
    fn test_accumulate_counts_every_item() {
        let today = date(2024, 6, 1);
        let items = vec![
            item("a", "Milk", 0, 250, date(2024, 5, 31)),
            item("b", "Bread", 0, 300, today),
            item("c", "Eggs", 12, 400, date(2025, 1, 1)),
        ];

        let summary = summarize(&items, today, SignalMode::Accumulate);
        assert_eq!(summary.spoilage_count, 2);
        assert_eq!(summary.restock_signal, 2);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let today = date(2024, 6, 1);
        let items = vec![
            item("a", "Milk", 3, 199, date(2024, 5, 1)),
            item("b", "Tea", 7, 450, date(2026, 5, 1)),
        ];

        let first = summarize(&items, today, SignalMode::LastItem);
        let second = summarize(&items, today, SignalMode::LastItem);
        assert_eq!(first, second);
    }

    #[test]
    fn test_total_value_saturates_at_i64_max() {
        let today = date(2024, 6, 1);
        let items = vec![
            item("a", "Flour", 100_000_000_000_000_000, 1000, date(2025, 1, 1)),
            item("b", "Sugar", 1, 1, date(2025, 1, 1)),
        ];

        let summary = summarize(&items, today, SignalMode::LastItem);
        assert_eq!(summary.total_value, Money::from_cents(i64::MAX));
        assert_eq!(summary.total_quantity, 100_000_000_000_000_001);
    }

    #[test]
    fn test_signal_mode_parsing() {
        assert_eq!("last_item".parse::<SignalMode>().unwrap(), SignalMode::LastItem);
        assert_eq!("ACCUMULATE".parse::<SignalMode>().unwrap(), SignalMode::Accumulate);
        assert!("sometimes".parse::<SignalMode>().is_err());
        assert_eq!(SignalMode::default(), SignalMode::LastItem);
    }
}
