//! The seams between the engine and the order backend.
//!
//! [`MarketplaceApi`] implements all of them. Tests and alternative backends can supply their own.
use async_trait::async_trait;
use marketplace_tools::{InventoryItem, MarketplaceApi, MarketplaceApiError, Order, SendMessageRequest};
use serde_json::Value;

use crate::errors::FetchError;

#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Performs exactly one fetch of the full order list. No retries, no partial results.
    async fn fetch_orders(&self) -> Result<Vec<Order>, FetchError>;
}

#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn inventory_check(&self, sku: &str, model_sku: &str) -> Result<Vec<InventoryItem>, MarketplaceApiError>;
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, request: &SendMessageRequest) -> Result<Value, MarketplaceApiError>;
}

#[async_trait]
impl OrderSource for MarketplaceApi {
    async fn fetch_orders(&self) -> Result<Vec<Order>, FetchError> {
        self.get_all_orders().await.map_err(FetchError::from)
    }
}

#[async_trait]
impl InventorySource for MarketplaceApi {
    async fn inventory_check(&self, sku: &str, model_sku: &str) -> Result<Vec<InventoryItem>, MarketplaceApiError> {
        MarketplaceApi::inventory_check(self, sku, model_sku).await
    }
}

#[async_trait]
impl MessageSender for MarketplaceApi {
    async fn send_message(&self, request: &SendMessageRequest) -> Result<Value, MarketplaceApiError> {
        MarketplaceApi::send_message(self, request).await
    }
}
