//! # stockroom-core: Pure Inventory Logic for Stockroom
//!
//! This crate holds the inventory domain as pure functions with zero I/O
//! dependencies. The store adapter (`stockroom-db`) and the synchronization
//! engine (`stockroom-sync`) build on top of it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Renderer (table + summary)                     │   │
//! │  │      reads Snapshot + SummaryRecord, sends InventoryCommand     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              stockroom-sync (InventoryEngine)                   │   │
//! │  │        ItemCache ◄── mutations ──► persistence worker           │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────────┐  ┌────────▼────────────────────┐  │
//! │  │  ★ stockroom-core (THIS CRATE) ★ │  │  stockroom-db (ItemStore)   │  │
//! │  │  types • money • validation      │  │  SQLite / in-memory store   │  │
//! │  │  summary • sweep                 │  └─────────────────────────────┘  │
//! │  │  NO I/O • PURE FUNCTIONS         │                                   │
//! │  └──────────────────────────────────┘                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (`InventoryItem`)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Validation error types
//! - [`validation`] - Field rules and prompt-text parsers
//! - [`summary`] - The aggregation engine (`summarize`)
//! - [`sweep`] - Expired-item selection
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use stockroom_core::{summarize, InventoryItem, Money, SignalMode};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let items = vec![InventoryItem {
//!     id: "a".to_string(),
//!     name: "Milk".to_string(),
//!     quantity: 10,
//!     price: Money::from_cents(250),
//!     expiration_date: NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(),
//! }];
//!
//! let summary = summarize(&items, today, SignalMode::LastItem);
//! assert_eq!(summary.total_quantity, 10);
//! assert_eq!(summary.total_value, Money::from_cents(2500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod summary;
pub mod sweep;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use summary::{summarize, SignalMode, SummaryRecord};
pub use sweep::expired_ids;
pub use types::InventoryItem;
