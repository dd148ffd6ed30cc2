//! Cart routes (login required)

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::AppState;
use crate::error::{ApiResult, ErrorCode};
use crate::models::{AddToCartRequest, UpdateCartRequest, User};
use crate::response::{created, ok};
use crate::validation::validate_quantity;

/// POST /api/cart: add an item; re-adding merges quantities
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<AddToCartRequest>,
) -> ApiResult<Response> {
    validate_quantity(payload.quantity)?;

    // only active catalog items can enter a cart
    state
        .item_repository
        .public_get(payload.item_id)
        .await?
        .ok_or(ErrorCode::ItemNotFound)?;

    let cart_item = state
        .cart_repository
        .add(user.id, payload.item_id, payload.quantity)
        .await?;

    Ok(created(cart_item))
}

/// GET /api/cart: the user's cart joined with item details
pub async fn get_my_cart(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Response> {
    let lines = state.cart_repository.list(user.id).await?;
    Ok(ok(lines))
}

/// PATCH /api/cart/:id: set the quantity of one cart row
pub async fn update_cart(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCartRequest>,
) -> ApiResult<Response> {
    validate_quantity(payload.quantity)?;

    let updated = state
        .cart_repository
        .update_quantity(id, user.id, payload.quantity)
        .await?
        .ok_or(ErrorCode::ResourceNotFound)?;

    Ok(ok(updated))
}

/// DELETE /api/cart/:id: remove one cart row
pub async fn delete_cart(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    state
        .cart_repository
        .remove(id, user.id)
        .await?
        .ok_or(ErrorCode::ResourceNotFound)?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// DELETE /api/cart: clear the whole cart
pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Response> {
    state.cart_repository.clear(user.id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
