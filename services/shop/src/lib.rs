//! CS Fantasy Shop backend
//!
//! A small e-commerce service: local and social login with JWT token pairs,
//! a public item catalog, per-user carts, atomic checkout into orders and
//! inventory grants, and an admin panel with basic sales statistics.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod oauth;
pub mod query;
pub mod rate_limiter;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod tokens;
pub mod validation;

use common::cache::RedisPool;
use sqlx::PgPool;

use crate::oauth::{FirebaseClient, KakaoClient};
use crate::rate_limiter::RateLimiter;
use crate::repositories::{
    CartRepository, InventoryRepository, ItemRepository, OrderRepository, UserRepository,
};
use crate::tokens::TokenService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub redis_pool: RedisPool,
    pub token_service: TokenService,
    pub user_repository: UserRepository,
    pub item_repository: ItemRepository,
    pub cart_repository: CartRepository,
    pub order_repository: OrderRepository,
    pub inventory_repository: InventoryRepository,
    pub rate_limiter: RateLimiter,
    /// None when Kakao login is not configured
    pub kakao_client: Option<KakaoClient>,
    /// None when Firebase login is not configured
    pub firebase_client: Option<FirebaseClient>,
}
