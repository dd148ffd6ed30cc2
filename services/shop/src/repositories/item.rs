//! Catalog repository: public browsing and admin management

use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use tracing::info;

use crate::error::ApiError;
use crate::models::{Item, NewItem, Rarity, UpdateItem};
use crate::query::{Pagination, SortSpec};

pub(crate) fn item_from_row(row: &PgRow) -> Item {
    Item {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        description: row.get("description"),
        rarity: row.get("rarity"),
        stat_int: row.get("stat_int"),
        stat_str: row.get("stat_str"),
        stat_dex: row.get("stat_dex"),
        stat_lck: row.get("stat_lck"),
        cs_tag: row.get("cs_tag"),
        stock_quantity: row.get("stock_quantity"),
        is_active: row.get("is_active"),
        category_id: row.get("category_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const ITEM_COLUMNS: &str = "id, name, price, description, rarity, stat_int, stat_str, \
     stat_dex, stat_lck, cs_tag, stock_quantity, is_active, category_id, created_at, updated_at";

/// Parsed catalog filters, applied identically to the page and count queries
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub keyword: Option<String>,
    pub category_id: Option<i64>,
    pub rarity: Option<Rarity>,
    pub cs_tag: Option<String>,
    pub price: (Option<i64>, Option<i64>),
    pub stat_int: (Option<i64>, Option<i64>),
    pub stat_str: (Option<i64>, Option<i64>),
    pub stat_dex: (Option<i64>, Option<i64>),
    pub stat_lck: (Option<i64>, Option<i64>),
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ItemFilter) {
    qb.push(" WHERE is_active = TRUE");

    if let Some(keyword) = &filter.keyword {
        let pattern = format!("%{}%", keyword);
        qb.push(" AND (name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR description ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    if let Some(category_id) = filter.category_id {
        qb.push(" AND category_id = ");
        qb.push_bind(category_id);
    }

    if let Some(rarity) = filter.rarity {
        qb.push(" AND rarity = ");
        qb.push_bind(rarity);
    }

    if let Some(cs_tag) = &filter.cs_tag {
        qb.push(" AND cs_tag ILIKE ");
        qb.push_bind(format!("%{}%", cs_tag));
    }

    let ranges = [
        ("price", filter.price),
        ("stat_int", filter.stat_int),
        ("stat_str", filter.stat_str),
        ("stat_dex", filter.stat_dex),
        ("stat_lck", filter.stat_lck),
    ];

    for (column, (min, max)) in ranges {
        if let Some(min) = min {
            qb.push(format!(" AND {} >= ", column));
            qb.push_bind(min);
        }
        if let Some(max) = max {
            qb.push(format!(" AND {} <= ", column));
            qb.push_bind(max);
        }
    }
}

/// Item repository
#[derive(Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    /// Create a new item repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Public catalog page: active items matching the filter, sorted and
    /// paginated, with the total match count
    pub async fn public_page(
        &self,
        filter: &ItemFilter,
        pagination: Pagination,
        sort: &SortSpec,
    ) -> Result<(Vec<Item>, i64), ApiError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM items");
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb.build().fetch_one(&self.pool).await?.get(0);

        let mut qb = QueryBuilder::new(format!("SELECT {} FROM items", ITEM_COLUMNS));
        push_filters(&mut qb, filter);
        // column/direction come from the sort allow-list, never client input
        qb.push(format!(" ORDER BY {} {}", sort.column, sort.direction_sql()));
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(pagination.size));
        qb.push(" OFFSET ");
        qb.push_bind(pagination.offset());

        let rows = qb.build().fetch_all(&self.pool).await?;
        let items = rows.iter().map(item_from_row).collect();

        Ok((items, total))
    }

    /// Public item detail: active items only
    pub async fn public_get(&self, id: i64) -> Result<Option<Item>, ApiError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM items WHERE id = $1 AND is_active = TRUE",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(item_from_row))
    }

    /// Admin listing: every item, newest first
    pub async fn list_all(&self) -> Result<Vec<Item>, ApiError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM items ORDER BY created_at DESC",
            ITEM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(item_from_row).collect())
    }

    /// Create a catalog item (admin)
    pub async fn create(&self, new_item: &NewItem) -> Result<Item, ApiError> {
        info!("Creating item: {}", new_item.name);

        let rarity = new_item.rarity.as_deref().and_then(Rarity::parse);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO items
                (name, price, description, rarity, stat_int, stat_str, stat_dex,
                 stat_lck, cs_tag, stock_quantity, is_active, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, TRUE), $12)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(new_item.name.trim())
        .bind(new_item.price)
        .bind(&new_item.description)
        .bind(rarity)
        .bind(new_item.stat_int)
        .bind(new_item.stat_str)
        .bind(new_item.stat_dex)
        .bind(new_item.stat_lck)
        .bind(&new_item.cs_tag)
        .bind(new_item.stock_quantity)
        .bind(new_item.is_active)
        .bind(new_item.category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(item_from_row(&row))
    }

    /// Partially update an item (admin); `None` when the id is unknown
    pub async fn update(&self, id: i64, update: &UpdateItem) -> Result<Option<Item>, ApiError> {
        let mut qb = QueryBuilder::new("UPDATE items SET updated_at = now()");

        if let Some(name) = &update.name {
            qb.push(", name = ");
            qb.push_bind(name.trim().to_string());
        }
        if let Some(price) = update.price {
            qb.push(", price = ");
            qb.push_bind(price);
        }
        if let Some(description) = &update.description {
            qb.push(", description = ");
            qb.push_bind(description.clone());
        }
        if let Some(rarity) = update.rarity.as_deref().and_then(Rarity::parse) {
            qb.push(", rarity = ");
            qb.push_bind(rarity);
        }
        if let Some(stat_int) = update.stat_int {
            qb.push(", stat_int = ");
            qb.push_bind(stat_int);
        }
        if let Some(stat_str) = update.stat_str {
            qb.push(", stat_str = ");
            qb.push_bind(stat_str);
        }
        if let Some(stat_dex) = update.stat_dex {
            qb.push(", stat_dex = ");
            qb.push_bind(stat_dex);
        }
        if let Some(stat_lck) = update.stat_lck {
            qb.push(", stat_lck = ");
            qb.push_bind(stat_lck);
        }
        if let Some(cs_tag) = &update.cs_tag {
            qb.push(", cs_tag = ");
            qb.push_bind(cs_tag.clone());
        }
        if let Some(stock_quantity) = update.stock_quantity {
            qb.push(", stock_quantity = ");
            qb.push_bind(stock_quantity);
        }
        if let Some(is_active) = update.is_active {
            qb.push(", is_active = ");
            qb.push_bind(is_active);
        }
        if let Some(category_id) = update.category_id {
            qb.push(", category_id = ");
            qb.push_bind(category_id);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {}", ITEM_COLUMNS));

        let row = qb.build().fetch_optional(&self.pool).await?;

        Ok(row.as_ref().map(item_from_row))
    }

    /// Delete an item (admin); `None` when the id is unknown
    pub async fn delete(&self, id: i64) -> Result<Option<Item>, ApiError> {
        info!("Deleting item {}", id);

        let row = sqlx::query(&format!(
            "DELETE FROM items WHERE id = $1 RETURNING {}",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(item_from_row))
    }
}
