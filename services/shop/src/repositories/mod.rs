//! Database repositories

pub mod cart;
pub mod inventory;
pub mod item;
pub mod order;
pub mod user;

pub use cart::CartRepository;
pub use inventory::InventoryRepository;
pub use item::ItemRepository;
pub use order::OrderRepository;
pub use user::UserRepository;
