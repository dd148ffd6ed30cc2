//! Order repository: the checkout transaction, order queries, and the
//! admin sales statistics
//!
//! Checkout converts the cart into an order, grants the purchased items to
//! the user's inventory, and empties the cart as one transaction. The
//! store's isolation level governs visibility to concurrent requests; no
//! explicit row locking is layered on top.

use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use crate::error::{ApiError, ErrorCode};
use crate::models::{
    AdminOrder, Order, OrderLine, OrderSummary, OrderWithItems, PopularItem, PublicUser, Role,
    TopUser,
};

fn order_from_row(row: &PgRow) -> Order {
    Order {
        id: row.get("id"),
        user_id: row.get("user_id"),
        status: row.get("status"),
        total_price: row.get("total_price"),
        created_at: row.get("created_at"),
    }
}

fn order_line_from_row(row: &PgRow) -> OrderLine {
    OrderLine {
        id: row.get("id"),
        item_id: row.get("item_id"),
        item_name: row.get("item_name"),
        quantity: row.get("quantity"),
        price: row.get("price"),
    }
}

/// A cart row with the catalog price observed at checkout time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub item_id: i64,
    pub quantity: i32,
    pub price: i64,
}

/// Total order value: Σ quantity × unit price at the moment of checkout
pub fn order_total(lines: &[CheckoutLine]) -> i64 {
    lines
        .iter()
        .map(|line| i64::from(line.quantity) * line.price)
        .sum()
}

/// Order repository
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into an order, all or nothing
    ///
    /// Inside one transaction: create the order (status PAID; payment is
    /// assumed successful), copy each cart line into an order line with the
    /// price frozen at this moment, grant the items to the inventory via an
    /// atomic insert-or-add upsert, and clear the cart. Any failure rolls
    /// the whole set back; an empty cart fails with EMPTY_CART before any
    /// write happens.
    pub async fn checkout(&self, user_id: i64) -> Result<OrderWithItems, ApiError> {
        let mut tx = self.pool.begin().await?;

        let cart_rows = sqlx::query(
            r#"
            SELECT ci.item_id, ci.quantity, i.price
            FROM cart_items ci
            JOIN items i ON i.id = ci.item_id
            WHERE ci.user_id = $1
            ORDER BY ci.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        if cart_rows.is_empty() {
            return Err(ApiError::new(ErrorCode::EmptyCart));
        }

        let lines: Vec<CheckoutLine> = cart_rows
            .iter()
            .map(|row| CheckoutLine {
                item_id: row.get("item_id"),
                quantity: row.get("quantity"),
                price: row.get("price"),
            })
            .collect();

        let total_price = order_total(&lines);

        let order_row = sqlx::query(
            r#"
            INSERT INTO orders (user_id, status, total_price)
            VALUES ($1, 'PAID', $2)
            RETURNING id, user_id, status, total_price, created_at
            "#,
        )
        .bind(user_id)
        .bind(total_price)
        .fetch_one(&mut *tx)
        .await?;

        let order = order_from_row(&order_row);

        for line in &lines {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, item_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(order.id)
            .bind(line.item_id)
            .bind(line.quantity)
            .bind(line.price)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO inventories (user_id, item_id, quantity)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, item_id)
                DO UPDATE SET quantity = inventories.quantity + EXCLUDED.quantity
                "#,
            )
            .bind(user_id)
            .bind(line.item_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let line_rows = sqlx::query(
            r#"
            SELECT oi.id, oi.item_id, oi.quantity, oi.price, i.name AS item_name
            FROM order_items oi
            JOIN items i ON i.id = oi.item_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            "#,
        )
        .bind(order.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            "Checkout for user {}: order {} with {} lines, total {}",
            user_id,
            order.id,
            line_rows.len(),
            total_price
        );

        Ok(OrderWithItems {
            order,
            order_items: line_rows.iter().map(order_line_from_row).collect(),
        })
    }

    /// Fetch the order lines for a set of orders, grouped by order id
    async fn lines_for_orders(
        &self,
        order_ids: &[i64],
    ) -> Result<std::collections::HashMap<i64, Vec<OrderLine>>, ApiError> {
        let rows = sqlx::query(
            r#"
            SELECT oi.id, oi.order_id, oi.item_id, oi.quantity, oi.price,
                   i.name AS item_name
            FROM order_items oi
            JOIN items i ON i.id = oi.item_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.id
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: std::collections::HashMap<i64, Vec<OrderLine>> =
            std::collections::HashMap::new();
        for row in &rows {
            let order_id: i64 = row.get("order_id");
            grouped
                .entry(order_id)
                .or_default()
                .push(order_line_from_row(row));
        }

        Ok(grouped)
    }

    /// The user's orders, newest first, each with its lines
    pub async fn my_orders(&self, user_id: i64) -> Result<Vec<OrderWithItems>, ApiError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, status, total_price, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let orders: Vec<Order> = rows.iter().map(order_from_row).collect();
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let mut lines = self.lines_for_orders(&ids).await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let order_items = lines.remove(&order.id).unwrap_or_default();
                OrderWithItems { order, order_items }
            })
            .collect())
    }

    /// One of the user's orders with its lines; `None` when the order does
    /// not exist or belongs to someone else
    pub async fn my_order(
        &self,
        user_id: i64,
        order_id: i64,
    ) -> Result<Option<OrderWithItems>, ApiError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, status, total_price, created_at
            FROM orders
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let order = order_from_row(&row);
        let mut lines = self.lines_for_orders(&[order.id]).await?;
        let order_items = lines.remove(&order.id).unwrap_or_default();

        Ok(Some(OrderWithItems { order, order_items }))
    }

    /// Every order with buyer details, newest first (admin)
    pub async fn all_orders(&self) -> Result<Vec<AdminOrder>, ApiError> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, o.user_id, o.status, o.total_price, o.created_at,
                   u.email, u.nickname, u.role
            FROM orders o
            JOIN users u ON u.id = o.user_id
            ORDER BY o.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let orders: Vec<(Order, PublicUser)> = rows
            .iter()
            .map(|row| {
                let order = order_from_row(row);
                let user = PublicUser {
                    id: order.user_id,
                    email: row.get("email"),
                    nickname: row.get("nickname"),
                    role: row.get::<Role, _>("role"),
                };
                (order, user)
            })
            .collect();

        let ids: Vec<i64> = orders.iter().map(|(o, _)| o.id).collect();
        let mut lines = self.lines_for_orders(&ids).await?;

        Ok(orders
            .into_iter()
            .map(|(order, user)| {
                let order_items = lines.remove(&order.id).unwrap_or_default();
                AdminOrder {
                    order,
                    user,
                    order_items,
                }
            })
            .collect())
    }

    /// Items ranked by total quantity sold (admin statistic)
    pub async fn popular_items(&self, limit: i64) -> Result<Vec<PopularItem>, ApiError> {
        let rows = sqlx::query(
            r#"
            SELECT oi.item_id, i.name, i.price,
                   SUM(oi.quantity)::BIGINT AS total_sold
            FROM order_items oi
            JOIN items i ON i.id = oi.item_id
            GROUP BY oi.item_id, i.name, i.price
            ORDER BY total_sold DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| PopularItem {
                item_id: row.get("item_id"),
                name: row.get("name"),
                price: row.get("price"),
                total_sold: row.get("total_sold"),
            })
            .collect())
    }

    /// Users ranked by total spend (admin statistic)
    pub async fn top_users(&self, limit: i64) -> Result<Vec<TopUser>, ApiError> {
        let rows = sqlx::query(
            r#"
            SELECT o.user_id, u.email, u.nickname,
                   SUM(o.total_price)::BIGINT AS total_spent
            FROM orders o
            JOIN users u ON u.id = o.user_id
            GROUP BY o.user_id, u.email, u.nickname
            ORDER BY total_spent DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| TopUser {
                user_id: row.get("user_id"),
                email: row.get("email"),
                nickname: row.get("nickname"),
                total_spent: row.get("total_spent"),
            })
            .collect())
    }

    /// Orders within an inclusive date range, newest first (admin statistic)
    pub async fn orders_summary(
        &self,
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<OrderSummary>, ApiError> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, o.user_id, o.status, o.total_price, o.created_at,
                   u.email, u.nickname
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE o.created_at >= $1 AND o.created_at <= $2
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| OrderSummary {
                id: row.get("id"),
                user_id: row.get("user_id"),
                status: row.get("status"),
                total_price: row.get("total_price"),
                created_at: row.get("created_at"),
                email: row.get("email"),
                nickname: row.get("nickname"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_total() {
        // (item A, price 1000, qty 2) + (item B, price 500, qty 1) = 2500
        let lines = vec![
            CheckoutLine {
                item_id: 1,
                quantity: 2,
                price: 1000,
            },
            CheckoutLine {
                item_id: 2,
                quantity: 1,
                price: 500,
            },
        ];
        assert_eq!(order_total(&lines), 2500);
    }

    #[test]
    fn test_order_total_empty() {
        assert_eq!(order_total(&[]), 0);
    }

    #[test]
    fn test_order_total_large_quantities_do_not_overflow_i32() {
        let lines = vec![CheckoutLine {
            item_id: 1,
            quantity: 1_000_000,
            price: 1_000_000,
        }];
        assert_eq!(order_total(&lines), 1_000_000_000_000);
    }
}
