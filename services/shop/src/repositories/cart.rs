//! Cart repository
//!
//! A cart row is unique per (user, item). Re-adding an item goes through an
//! atomic insert-or-add upsert so concurrent adds for the same pair cannot
//! lose updates.

use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use crate::error::ApiError;
use crate::models::{CartItem, CartLine};
use crate::repositories::item::item_from_row;

fn cart_item_from_row(row: &PgRow) -> CartItem {
    CartItem {
        id: row.get("id"),
        user_id: row.get("user_id"),
        item_id: row.get("item_id"),
        quantity: row.get("quantity"),
    }
}

/// Cart repository
#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    /// Create a new cart repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add an item to the cart; an existing (user, item) row gains the
    /// quantity instead of duplicating
    pub async fn add(
        &self,
        user_id: i64,
        item_id: i64,
        quantity: i32,
    ) -> Result<CartItem, ApiError> {
        info!("Adding item {} x{} to cart of user {}", item_id, quantity, user_id);

        let row = sqlx::query(
            r#"
            INSERT INTO cart_items (user_id, item_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, item_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            RETURNING id, user_id, item_id, quantity
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(cart_item_from_row(&row))
    }

    /// List the user's cart joined with the catalog items
    pub async fn list(&self, user_id: i64) -> Result<Vec<CartLine>, ApiError> {
        let rows = sqlx::query(
            r#"
            SELECT ci.id AS cart_id, ci.quantity AS cart_quantity,
                   i.id, i.name, i.price, i.description, i.rarity, i.stat_int,
                   i.stat_str, i.stat_dex, i.stat_lck, i.cs_tag, i.stock_quantity,
                   i.is_active, i.category_id, i.created_at, i.updated_at
            FROM cart_items ci
            JOIN items i ON i.id = ci.item_id
            WHERE ci.user_id = $1
            ORDER BY ci.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let lines = rows
            .iter()
            .map(|row| CartLine {
                id: row.get("cart_id"),
                quantity: row.get("cart_quantity"),
                item: item_from_row(row),
            })
            .collect();

        Ok(lines)
    }

    /// Set the quantity of one cart row; ownership is enforced by the
    /// user id in the predicate. `None` when the row is not the user's.
    pub async fn update_quantity(
        &self,
        cart_item_id: i64,
        user_id: i64,
        quantity: i32,
    ) -> Result<Option<CartItem>, ApiError> {
        let row = sqlx::query(
            r#"
            UPDATE cart_items
            SET quantity = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, item_id, quantity
            "#,
        )
        .bind(cart_item_id)
        .bind(user_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(cart_item_from_row))
    }

    /// Remove one cart row; `None` when the row is not the user's
    pub async fn remove(
        &self,
        cart_item_id: i64,
        user_id: i64,
    ) -> Result<Option<CartItem>, ApiError> {
        let row = sqlx::query(
            r#"
            DELETE FROM cart_items
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, item_id, quantity
            "#,
        )
        .bind(cart_item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(cart_item_from_row))
    }

    /// Remove every cart row of the user; returns the number removed
    pub async fn clear(&self, user_id: i64) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
