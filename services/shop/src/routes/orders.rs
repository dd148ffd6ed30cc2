//! Order routes (login required)

use axum::{
    Extension,
    extract::{Path, State},
    response::Response,
};

use crate::AppState;
use crate::error::{ApiResult, ErrorCode};
use crate::models::User;
use crate::response::{created, ok};

/// POST /api/orders: checkout the cart into a paid order
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Response> {
    let order = state.order_repository.checkout(user.id).await?;
    Ok(created(order))
}

/// GET /api/orders: the user's orders, newest first
pub async fn get_my_orders(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Response> {
    let orders = state.order_repository.my_orders(user.id).await?;
    Ok(ok(orders))
}

/// GET /api/orders/:id: one of the user's orders
pub async fn get_my_order(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let order = state
        .order_repository
        .my_order(user.id, id)
        .await?
        .ok_or(ErrorCode::OrderNotFound)?;

    Ok(ok(order))
}
