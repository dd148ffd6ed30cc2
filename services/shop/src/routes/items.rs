//! Public catalog routes

use axum::{
    extract::{Path, Query, State},
    response::Response,
};

use crate::AppState;
use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::models::{ItemPage, ItemQuery, Rarity};
use crate::query::{parse_pagination, parse_positive_id, parse_range, parse_sort};
use crate::repositories::item::ItemFilter;
use crate::response::ok;

/// (api field, sql column) pairs clients may sort the catalog by
const SORTABLE_FIELDS: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("price", "price"),
    ("name", "name"),
    ("rarity", "rarity"),
    ("statInt", "stat_int"),
    ("statStr", "stat_str"),
    ("statDex", "stat_dex"),
    ("statLck", "stat_lck"),
];

/// Parse the raw catalog query into a validated filter
pub fn parse_item_filter(query: &ItemQuery) -> ApiResult<ItemFilter> {
    let rarity = query
        .rarity
        .as_deref()
        .map(|raw| {
            Rarity::parse(raw).ok_or_else(|| {
                ApiError::with_details(
                    ErrorCode::InvalidQueryParam,
                    serde_json::json!({ "rarity": raw }),
                )
            })
        })
        .transpose()?;

    let category_id = query
        .category_id
        .as_deref()
        .map(|raw| parse_positive_id(raw, "categoryId"))
        .transpose()?;

    Ok(ItemFilter {
        keyword: query.keyword.clone(),
        category_id,
        rarity,
        cs_tag: query.cs_tag.clone(),
        price: parse_range(query.min_price.as_deref(), query.max_price.as_deref(), "price")?,
        stat_int: parse_range(query.min_int.as_deref(), query.max_int.as_deref(), "statInt")?,
        stat_str: parse_range(query.min_str.as_deref(), query.max_str.as_deref(), "statStr")?,
        stat_dex: parse_range(query.min_dex.as_deref(), query.max_dex.as_deref(), "statDex")?,
        stat_lck: parse_range(query.min_lck.as_deref(), query.max_lck.as_deref(), "statLck")?,
    })
}

/// GET /api/items: public catalog with pagination, sorting, and filters
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemQuery>,
) -> ApiResult<Response> {
    let pagination = parse_pagination(query.page.as_deref(), query.size.as_deref(), 20, 50)?;
    let sort = parse_sort(query.sort.as_deref(), SORTABLE_FIELDS, "createdAt")?;
    let filter = parse_item_filter(&query)?;

    let (items, total_elements) = state
        .item_repository
        .public_page(&filter, pagination, &sort)
        .await?;

    let total_pages = if total_elements == 0 {
        0
    } else {
        (total_elements + i64::from(pagination.size) - 1) / i64::from(pagination.size)
    };

    Ok(ok(ItemPage {
        content: items,
        page: pagination.page,
        size: pagination.size,
        total_elements,
        total_pages,
        sort: sort.sort_string,
    }))
}

/// GET /api/items/:id: active item detail
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_item_id(&id)?;

    let item = state
        .item_repository
        .public_get(id)
        .await?
        .ok_or(ErrorCode::ItemNotFound)?;

    Ok(ok(item))
}

/// Parse an item id path segment; anything non-positive is ITEM_ID_INVALID
pub fn parse_item_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id >= 1)
        .ok_or_else(|| ErrorCode::ItemIdInvalid.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_id() {
        assert_eq!(parse_item_id("12").unwrap(), 12);
        assert!(parse_item_id("0").is_err());
        assert!(parse_item_id("-4").is_err());
        assert!(parse_item_id("sword").is_err());
    }

    #[test]
    fn test_parse_item_filter_rarity() {
        let query = ItemQuery {
            rarity: Some("epic".to_string()),
            ..Default::default()
        };
        let filter = parse_item_filter(&query).unwrap();
        assert_eq!(filter.rarity, Some(Rarity::Epic));

        let bad = ItemQuery {
            rarity: Some("mythic".to_string()),
            ..Default::default()
        };
        assert!(parse_item_filter(&bad).is_err());
    }

    #[test]
    fn test_parse_item_filter_ranges() {
        let query = ItemQuery {
            min_price: Some("100".to_string()),
            max_price: Some("1000".to_string()),
            min_int: Some("5".to_string()),
            ..Default::default()
        };
        let filter = parse_item_filter(&query).unwrap();
        assert_eq!(filter.price, (Some(100), Some(1000)));
        assert_eq!(filter.stat_int, (Some(5), None));

        let inverted = ItemQuery {
            min_price: Some("1000".to_string()),
            max_price: Some("100".to_string()),
            ..Default::default()
        };
        assert!(parse_item_filter(&inverted).is_err());
    }
}
