//! Cart models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::Item;

/// A row of the cart: (user, item) with a quantity, unique per pair
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub item_id: i64,
    pub quantity: i32,
}

/// A cart row joined with its catalog item, as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: i64,
    pub quantity: i32,
    pub item: Item,
}

/// Add-to-cart request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub item_id: i64,
    pub quantity: i32,
}

/// Cart quantity update request body
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: i32,
}
