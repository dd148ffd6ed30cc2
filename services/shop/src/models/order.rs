//! Order, order line, and inventory models
//!
//! Orders and their lines are an immutable snapshot of a checkout: the line
//! price is the catalog price observed at purchase time and never changes
//! afterwards, whatever happens to the item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{Item, PublicUser};

/// Order status, mirrored by the `order_status` Postgres enum
///
/// Payment is out of scope; every order this service creates is PAID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status")]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Paid,
}

/// Order header
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

/// Order line with the purchased item's name resolved
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: i64,
    pub item_id: i64,
    pub item_name: String,
    pub quantity: i32,
    pub price: i64,
}

/// An order together with its lines
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub order_items: Vec<OrderLine>,
}

/// An order with buyer details, for the admin listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrder {
    #[serde(flatten)]
    pub order: Order,
    pub user: PublicUser,
    pub order_items: Vec<OrderLine>,
}

/// Per-user owned-item ledger entry joined with its item
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub id: i64,
    pub quantity: i32,
    pub item: Item,
}

/// Sales ranking entry: an item by total quantity sold
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularItem {
    pub item_id: i64,
    pub name: String,
    pub price: i64,
    pub total_sold: i64,
}

/// Spend ranking entry: a user by total order value
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUser {
    pub user_id: i64,
    pub email: String,
    pub nickname: String,
    pub total_spent: i64,
}

/// One order in the date-ranged admin summary
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
    pub email: String,
    pub nickname: String,
}
