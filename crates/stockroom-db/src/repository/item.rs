//! # Item Repository
//!
//! SQLite persistence for inventory items.
//!
//! ## Whole-Record Upsert
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How an edit reaches the store                        │
//! │                                                                         │
//! │  Cache: Milk qty 10 → 12                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  put(full item)                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT INTO inventory_items (...) VALUES (...)                        │
//! │  ON CONFLICT(id) DO UPDATE SET name, quantity, price_cents, ...        │
//! │                                                                         │
//! │  One statement, keyed by id. The row keeps its rowid, so               │
//! │  get_all() still returns items in creation order.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::store::ItemStore;
use stockroom_core::InventoryItem;

/// Repository for inventory item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.items();
/// repo.put(&item).await?;
/// let everything = repo.get_all().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Counts stored items (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

impl ItemStore for ItemRepository {
    async fn get_all(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, name, quantity, price_cents, expiration
            FROM inventory_items
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Loaded inventory items");
        Ok(items)
    }

    async fn get(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, name, quantity, price_cents, expiration
            FROM inventory_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn put(&self, item: &InventoryItem) -> DbResult<()> {
        debug!(id = %item.id, "Upserting inventory item");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, name, quantity, price_cents, expiration, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?6
            )
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                quantity = excluded.quantity,
                price_cents = excluded.price_cents,
                expiration = excluded.expiration,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.price.cents())
        .bind(item.expiration_date)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting inventory item");

        let result = sqlx::query("DELETE FROM inventory_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, name, quantity, price_cents, expiration
            FROM inventory_items
            WHERE name = ?1
            ORDER BY rowid
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
