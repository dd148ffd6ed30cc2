use anyhow::Result;
use std::net::SocketAddr;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use common::cache::{RedisConfig, RedisPool};
use common::database::{self, DatabaseConfig};

use shop::AppState;
use shop::jwt::{JwtConfig, JwtService};
use shop::oauth::{FirebaseClient, FirebaseConfig, KakaoClient, KakaoConfig};
use shop::rate_limiter::{RateLimiter, RateLimiterConfig};
use shop::repositories::{
    CartRepository, InventoryRepository, ItemRepository, OrderRepository, UserRepository,
};
use shop::routes;
use shop::tokens::TokenService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting shop service");

    // Initialize database connection pool and apply migrations
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize the Redis side-store for refresh-token validity
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    // Token services
    let jwt_service = JwtService::new(JwtConfig::from_env());
    let token_service = TokenService::new(jwt_service, redis_pool.clone());

    // Social identity providers are optional; a missing configuration
    // disables the corresponding login route
    let kakao_client = match KakaoConfig::from_env() {
        Ok(config) => Some(KakaoClient::new(config)?),
        Err(e) => {
            warn!("Kakao login disabled: {}", e);
            None
        }
    };

    let firebase_client = match FirebaseConfig::from_env() {
        Ok(config) => Some(FirebaseClient::new(config)),
        Err(e) => {
            warn!("Firebase login disabled: {}", e);
            None
        }
    };

    let app_state = AppState {
        db_pool: pool.clone(),
        redis_pool,
        token_service,
        user_repository: UserRepository::new(pool.clone()),
        item_repository: ItemRepository::new(pool.clone()),
        cart_repository: CartRepository::new(pool.clone()),
        order_repository: OrderRepository::new(pool.clone()),
        inventory_repository: InventoryRepository::new(pool),
        rate_limiter: RateLimiter::new(RateLimiterConfig::default()),
        kakao_client,
        firebase_client,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Shop service listening on 0.0.0.0:{}", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
