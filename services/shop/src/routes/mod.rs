//! HTTP routing for the shop service

pub mod admin;
pub mod auth;
pub mod cart;
pub mod inventory;
pub mod items;
pub mod orders;

use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde_json::json;

use crate::AppState;
use crate::middleware::{auth_guard, require_admin};

/// Create the router for the shop service
pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/kakao", post(auth::kakao_login))
        .route("/firebase", post(auth::firebase_login))
        .merge(
            Router::new()
                .route("/logout", post(auth::logout))
                .route("/me", get(auth::me))
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard)),
        );

    let item_routes = Router::new()
        .route("/", get(items::list_items))
        .route("/:id", get(items::get_item));

    let cart_routes = Router::new()
        .route("/", post(cart::add_to_cart).get(cart::get_my_cart).delete(cart::clear_cart))
        .route("/:id", patch(cart::update_cart).delete(cart::delete_cart))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    let order_routes = Router::new()
        .route("/", post(orders::create_order).get(orders::get_my_orders))
        .route("/:id", get(orders::get_my_order))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    let inventory_routes = Router::new()
        .route("/", get(inventory::get_my_inventory))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    let admin_routes = Router::new()
        .route("/items", get(admin::list_items).post(admin::create_item))
        .route(
            "/items/:id",
            patch(admin::update_item).delete(admin::delete_item),
        )
        .route("/orders", get(admin::all_orders))
        .route("/stats/popular-items", get(admin::popular_items))
        .route("/stats/top-users", get(admin::top_users))
        .route("/stats/orders-summary", get(admin::orders_summary))
        // auth runs first (outermost), then the role check
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/items", item_routes)
        .nest("/api/cart", cart_routes)
        .nest("/api/orders", order_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/admin", admin_routes)
        .with_state(state)
}

/// Health check endpoint, reporting component reachability
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);
    let redis = state.redis_pool.health_check().await.unwrap_or(false);

    Json(json!({
        "status": if database && redis { "ok" } else { "degraded" },
        "service": "shop",
        "database": database,
        "redis": redis,
    }))
}
