//! # Expiration Selection
//!
//! Picks the items the expiration sweeper should remove. Removal itself
//! goes through the engine in `stockroom-sync`; this module only reads.

use chrono::NaiveDate;

use crate::types::InventoryItem;

/// Returns the ids of every item whose expiration date is on or before
/// `today`, in collection order.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use stockroom_core::{expired_ids, InventoryItem, Money};
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let items = vec![InventoryItem {
///     id: "a".into(),
///     name: "Milk".into(),
///     quantity: 1,
///     price: Money::from_cents(100),
///     expiration_date: today,
/// }];
/// assert_eq!(expired_ids(&items, today), vec!["a".to_string()]);
/// ```
pub fn expired_ids(items: &[InventoryItem], today: NaiveDate) -> Vec<String> {
    items
        .iter()
        .filter(|item| item.is_expired(today))
        .map(|item| item.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn item(id: &str, exp: NaiveDate) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            name: "Milk".to_string(),
            quantity: 1,
            price: Money::from_cents(100),
            expiration_date: exp,
        }
    }

    #[test]
    fn test_selects_past_and_today_only() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let items = vec![
            item("a", today.pred_opt().unwrap()),
            item("b", today.succ_opt().unwrap()),
            item("c", today),
        ];

        assert_eq!(expired_ids(&items, today), vec!["a", "c"]);
    }

    #[test]
    fn test_nothing_expired() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(expired_ids(&[item("a", today.succ_opt().unwrap())], today).is_empty());
        assert!(expired_ids(&[], today).is_empty());
    }
}
