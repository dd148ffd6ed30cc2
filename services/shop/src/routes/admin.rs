//! Admin routes: catalog management, order listing, sales statistics
//!
//! Everything here sits behind the auth guard plus the admin role check.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;

use crate::AppState;
use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::models::{NewItem, UpdateItem};
use crate::query::{parse_date_range, parse_limit};
use crate::response::{created, ok};
use crate::routes::items::parse_item_id;
use crate::validation::{validate_new_item, validate_update_item};

/// GET /api/admin/items: every item, newest first
pub async fn list_items(State(state): State<AppState>) -> ApiResult<Response> {
    let items = state.item_repository.list_all().await?;
    Ok(ok(items))
}

/// POST /api/admin/items: create a catalog item
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<NewItem>,
) -> ApiResult<Response> {
    validate_new_item(&payload)?;

    let item = state.item_repository.create(&payload).await?;
    Ok(created(item))
}

/// PATCH /api/admin/items/:id: partial update
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateItem>,
) -> ApiResult<Response> {
    let id = parse_item_id(&id)?;
    validate_update_item(&payload)?;

    let item = state
        .item_repository
        .update(id, &payload)
        .await?
        .ok_or(ErrorCode::ItemNotFound)?;

    Ok(ok(item))
}

/// DELETE /api/admin/items/:id
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_item_id(&id)?;

    let item = state
        .item_repository
        .delete(id)
        .await?
        .ok_or(ErrorCode::ItemNotFound)?;

    Ok(ok(item))
}

/// GET /api/admin/orders: all orders with buyer details
pub async fn all_orders(State(state): State<AppState>) -> ApiResult<Response> {
    let orders = state.order_repository.all_orders().await?;
    Ok(ok(orders))
}

/// Query parameters for the ranking statistics
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

/// GET /api/admin/stats/popular-items: ranked by quantity sold
pub async fn popular_items(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Response> {
    let limit = parse_limit(query.limit.as_deref(), 10, 100)?;
    let ranking = state.order_repository.popular_items(limit).await?;
    Ok(ok(ranking))
}

/// GET /api/admin/stats/top-users: ranked by total spend
pub async fn top_users(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Response> {
    let limit = parse_limit(query.limit.as_deref(), 10, 100)?;
    let ranking = state.order_repository.top_users(limit).await?;
    Ok(ok(ranking))
}

/// Query parameters for the date-ranged summary
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// GET /api/admin/stats/orders-summary?from=YYYY-MM-DD&to=YYYY-MM-DD
pub async fn orders_summary(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<Response> {
    let (Some(from), Some(to)) = (query.from.as_deref(), query.to.as_deref()) else {
        return Err(ApiError::with_details(
            ErrorCode::InvalidQueryParam,
            serde_json::json!({ "message": "from and to are required" }),
        ));
    };

    let (from, to) = parse_date_range(from, to)?;
    let summary = state.order_repository.orders_summary(from, to).await?;
    Ok(ok(summary))
}
