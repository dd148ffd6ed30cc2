//! Catalog item and category models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Item rarity, mirrored by the `item_rarity` Postgres enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_rarity")]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Parse a rarity string case-insensitively, the way query/body input
    /// arrives from clients
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "COMMON" => Some(Rarity::Common),
            "RARE" => Some(Rarity::Rare),
            "EPIC" => Some(Rarity::Epic),
            "LEGENDARY" => Some(Rarity::Legendary),
            _ => None,
        }
    }
}

/// Catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
    pub rarity: Option<Rarity>,
    pub stat_int: Option<i32>,
    pub stat_str: Option<i32>,
    pub stat_dex: Option<i32>,
    pub stat_lck: Option<i32>,
    pub cs_tag: Option<String>,
    pub stock_quantity: Option<i32>,
    pub is_active: bool,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category, hierarchical through `parent_id`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
}

/// Admin item creation payload (request bodies use snake_case fields)
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
    pub rarity: Option<String>,
    pub stat_int: Option<i32>,
    pub stat_str: Option<i32>,
    pub stat_dex: Option<i32>,
    pub stat_lck: Option<i32>,
    pub cs_tag: Option<String>,
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
    pub category_id: Option<i64>,
}

/// Admin partial item update payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub rarity: Option<String>,
    pub stat_int: Option<i32>,
    pub stat_str: Option<i32>,
    pub stat_dex: Option<i32>,
    pub stat_lck: Option<i32>,
    pub cs_tag: Option<String>,
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
    pub category_id: Option<i64>,
}

/// Raw query parameters for the public catalog listing
///
/// Everything arrives as a string so out-of-range values map to
/// INVALID_QUERY_PARAM instead of a bare framework rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
    pub keyword: Option<String>,
    pub rarity: Option<String>,
    #[serde(rename = "csTag")]
    pub cs_tag: Option<String>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
    #[serde(rename = "minInt")]
    pub min_int: Option<String>,
    #[serde(rename = "maxInt")]
    pub max_int: Option<String>,
    #[serde(rename = "minStr")]
    pub min_str: Option<String>,
    #[serde(rename = "maxStr")]
    pub max_str: Option<String>,
    #[serde(rename = "minDex")]
    pub min_dex: Option<String>,
    #[serde(rename = "maxDex")]
    pub max_dex: Option<String>,
    #[serde(rename = "minLck")]
    pub min_lck: Option<String>,
    #[serde(rename = "maxLck")]
    pub max_lck: Option<String>,
}

/// Paginated catalog listing response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    pub content: Vec<Item>,
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: i64,
    pub sort: String,
}
