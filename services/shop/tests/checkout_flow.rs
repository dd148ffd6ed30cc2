//! Checkout flow tests against a live PostgreSQL instance
//!
//! Run with `cargo test -- --ignored` with DATABASE_URL pointing at a local
//! database. Each test provisions its own user so reruns do not collide.

use sqlx::PgPool;

use common::database::{DatabaseConfig, init_pool};
use shop::error::ErrorCode;
use shop::models::{NewItem, User};
use shop::repositories::{
    CartRepository, InventoryRepository, ItemRepository, OrderRepository, UserRepository,
};

async fn test_pool() -> PgPool {
    let config = DatabaseConfig::from_env().expect("database config");
    let pool = init_pool(&config).await.expect("database pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

async fn test_user(pool: &PgPool, tag: &str) -> User {
    let suffix: u32 = rand::random();
    UserRepository::new(pool.clone())
        .create_local(
            &format!("{tag}_{suffix}@example.com"),
            "secret-password",
            &format!("{tag}_{suffix}"),
        )
        .await
        .expect("create user")
}

fn new_item(name: &str, price: i64) -> NewItem {
    NewItem {
        name: name.to_string(),
        price,
        description: None,
        rarity: None,
        stat_int: None,
        stat_str: None,
        stat_dex: None,
        stat_lck: None,
        cs_tag: None,
        stock_quantity: None,
        is_active: None,
        category_id: None,
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_cart_merge() {
    let pool = test_pool().await;
    let user = test_user(&pool, "cart_merge").await;
    let items = ItemRepository::new(pool.clone());
    let cart = CartRepository::new(pool.clone());

    let item = items.create(&new_item("Queue Blade", 700)).await.unwrap();

    cart.add(user.id, item.id, 2).await.unwrap();
    cart.add(user.id, item.id, 3).await.unwrap();

    let lines = cart.list(user.id).await.unwrap();
    assert_eq!(lines.len(), 1, "re-adding must merge, not duplicate");
    assert_eq!(lines[0].quantity, 5);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_checkout_totals_and_price_freeze() {
    let pool = test_pool().await;
    let user = test_user(&pool, "totals").await;
    let items = ItemRepository::new(pool.clone());
    let cart = CartRepository::new(pool.clone());
    let orders = OrderRepository::new(pool.clone());

    let item_a = items.create(&new_item("Stack Sword", 1000)).await.unwrap();
    let item_b = items.create(&new_item("Greedy Potion", 500)).await.unwrap();

    cart.add(user.id, item_a.id, 2).await.unwrap();
    cart.add(user.id, item_b.id, 1).await.unwrap();

    let order = orders.checkout(user.id).await.unwrap();
    assert_eq!(order.order.total_price, 2500);
    assert_eq!(order.order_items.len(), 2);

    // the cart is gone
    assert!(cart.list(user.id).await.unwrap().is_empty());

    // a later catalog price change must not alter the historical order
    items
        .update(
            item_a.id,
            &shop::models::UpdateItem {
                price: Some(2000),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let reread = orders.my_order(user.id, order.order.id).await.unwrap().unwrap();
    let line_a = reread
        .order_items
        .iter()
        .find(|line| line.item_id == item_a.id)
        .unwrap();
    assert_eq!(line_a.price, 1000, "order line price is frozen at purchase");
    assert_eq!(reread.order.total_price, 2500);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_empty_cart_is_rejected() {
    let pool = test_pool().await;
    let user = test_user(&pool, "empty_cart").await;
    let orders = OrderRepository::new(pool.clone());

    let err = orders.checkout(user.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptyCart);

    assert!(orders.my_orders(user.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_inventory_accumulates_across_orders() {
    let pool = test_pool().await;
    let user = test_user(&pool, "inventory").await;
    let items = ItemRepository::new(pool.clone());
    let cart = CartRepository::new(pool.clone());
    let orders = OrderRepository::new(pool.clone());
    let inventory = InventoryRepository::new(pool.clone());

    let item = items.create(&new_item("Cache Amulet", 300)).await.unwrap();

    cart.add(user.id, item.id, 1).await.unwrap();
    orders.checkout(user.id).await.unwrap();

    cart.add(user.id, item.id, 1).await.unwrap();
    orders.checkout(user.id).await.unwrap();

    let entries = inventory.list(user.id).await.unwrap();
    assert_eq!(entries.len(), 1, "one ledger row per (user, item)");
    assert_eq!(entries[0].quantity, 2);

    assert_eq!(orders.my_orders(user.id).await.unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_checkout_rolls_back_as_a_unit() {
    let pool = test_pool().await;
    let user = test_user(&pool, "atomicity").await;
    let items = ItemRepository::new(pool.clone());
    let cart = CartRepository::new(pool.clone());
    let orders = OrderRepository::new(pool.clone());

    let item_a = items.create(&new_item("Packet Dagger", 100)).await.unwrap();
    let item_b = items.create(&new_item("Router Shield", 200)).await.unwrap();

    // force the inventory upsert for item_b to fail mid-transaction:
    // incrementing i32::MAX overflows the integer column
    sqlx::query("INSERT INTO inventories (user_id, item_id, quantity) VALUES ($1, $2, $3)")
        .bind(user.id)
        .bind(item_b.id)
        .bind(i32::MAX)
        .execute(&pool)
        .await
        .unwrap();

    cart.add(user.id, item_a.id, 1).await.unwrap();
    cart.add(user.id, item_b.id, 1).await.unwrap();

    let err = orders.checkout(user.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);

    // nothing happened: no order, cart intact, inventory untouched
    assert!(orders.my_orders(user.id).await.unwrap().is_empty());
    assert_eq!(cart.list(user.id).await.unwrap().len(), 2);

    let remaining: i32 =
        sqlx::query_scalar("SELECT quantity FROM inventories WHERE user_id = $1 AND item_id = $2")
            .bind(user.id)
            .bind(item_b.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(remaining, i32::MAX);
}
