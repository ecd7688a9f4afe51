//! # stockroom-sync: Cache/Store Synchronization for Stockroom
//!
//! This crate keeps the in-memory item cache and the durable store in step.
//! The cache is always updated first and is what callers and the renderer
//! see; the store follows through a background persistence worker.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Inventory Engine Architecture                       │
//! │                                                                         │
//! │   Renderer ── InventoryCommand ──► InventoryEngine                     │
//! │      ▲                                  │                               │
//! │      │                                  ├── validate (stockroom-core)  │
//! │      │                                  ├── mutate ItemCache           │
//! │      │                                  ├── queue write ──┐            │
//! │      │                                  │                 ▼            │
//! │      │                                  │     ┌──────────────────────┐ │
//! │      │                                  │     │ Persistence worker   │ │
//! │      │                                  │     │ FIFO, logs failures  │ │
//! │      │                                  │     └──────────┬───────────┘ │
//! │      │                                  │                ▼             │
//! │      │                                  │     ItemStore (stockroom-db) │
//! │      │                                  ▼                               │
//! │      └──── (Snapshot, SummaryRecord) ◄── summarize                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`engine`] - `InventoryEngine`, `Mutation`, `EngineOptions`
//! - [`cache`] - `ItemCache` and frozen `Snapshot`s
//! - [`persist`] - Background store writes and `PersistHandle`
//! - [`sweeper`] - Expired-item removal
//! - [`view`] - Rendering collaborator trait
//! - [`command`] - Renderer callbacks as data
//! - [`clock`] - Source of "today"
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Engine and persistence errors
//! - [`telemetry`] - Tracing subscriber setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockroom_db::Database;
//! use stockroom_sync::{InventoryConfig, InventoryEngine, NoOpView};
//!
//! let config = InventoryConfig::load_or_default(None);
//! let db = Database::open(config.db_config()?).await?;
//!
//! let mut engine = InventoryEngine::load(
//!     Arc::new(db.items()),
//!     Arc::new(NoOpView),
//!     config.engine_options(),
//! )
//! .await?;
//!
//! let milk = engine.create("Milk", 10, Money::from_cents(250), expires)?;
//! println!("{}", engine.summary().total_quantity);
//! milk.persist.wait().await?; // optional
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod persist;
pub mod sweeper;
pub mod telemetry;
pub mod view;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::{ItemCache, Snapshot};
pub use clock::{Clock, FixedClock, SystemClock};
pub use command::{CommandOutcome, InventoryCommand};
pub use config::InventoryConfig;
pub use engine::{EngineOptions, InventoryEngine, Mutation};
pub use error::{EngineError, EngineResult, PersistError, StoreOp};
pub use persist::{PersistHandle, PersistStats};
pub use telemetry::init_tracing;
pub use view::{Frame, FrameBuffer, InventoryView, NoOpView};
