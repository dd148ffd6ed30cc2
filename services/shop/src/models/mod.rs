//! Shop service models

pub mod cart;
pub mod item;
pub mod order;
pub mod user;

// Re-export for convenience
pub use cart::{AddToCartRequest, CartItem, CartLine, UpdateCartRequest};
pub use item::{Category, Item, ItemPage, ItemQuery, NewItem, Rarity, UpdateItem};
pub use order::{
    AdminOrder, InventoryEntry, Order, OrderLine, OrderStatus, OrderSummary, OrderWithItems,
    PopularItem, TopUser,
};
pub use user::{Provider, PublicUser, Role, User};
