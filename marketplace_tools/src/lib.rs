mod api;
mod config;
mod error;

pub mod data_objects;
pub mod helpers;

pub use api::MarketplaceApi;
pub use config::{MarketplaceConfig, DEFAULT_BASE_URL};
pub use data_objects::{Branch, InventoryItem, Order, OrderItem, OrderNumber, SendMessageRequest};
pub use error::MarketplaceApiError;
