//! Inventory repository
//!
//! Rows are created and incremented only by the checkout transaction; this
//! repository only reads the ledger back.

use sqlx::{PgPool, Row};

use crate::error::ApiError;
use crate::models::InventoryEntry;
use crate::repositories::item::item_from_row;

/// Inventory repository
#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    /// Create a new inventory repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the user's owned items joined with the catalog
    pub async fn list(&self, user_id: i64) -> Result<Vec<InventoryEntry>, ApiError> {
        let rows = sqlx::query(
            r#"
            SELECT inv.id AS inventory_id, inv.quantity AS inventory_quantity,
                   i.id, i.name, i.price, i.description, i.rarity, i.stat_int,
                   i.stat_str, i.stat_dex, i.stat_lck, i.cs_tag, i.stock_quantity,
                   i.is_active, i.category_id, i.created_at, i.updated_at
            FROM inventories inv
            JOIN items i ON i.id = inv.item_id
            WHERE inv.user_id = $1
            ORDER BY inv.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .iter()
            .map(|row| InventoryEntry {
                id: row.get("inventory_id"),
                quantity: row.get("inventory_quantity"),
                item: item_from_row(row),
            })
            .collect();

        Ok(entries)
    }
}
