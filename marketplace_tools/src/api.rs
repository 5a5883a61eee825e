use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    config::MarketplaceConfig,
    data_objects::{InventoryResponse, OrdersResponse},
    InventoryItem,
    MarketplaceApiError,
    Order,
    SendMessageRequest,
};

#[derive(Clone)]
pub struct MarketplaceApi {
    config: MarketplaceConfig,
    client: Arc<Client>,
}

impl MarketplaceApi {
    pub fn new(config: MarketplaceConfig) -> Result<Self, MarketplaceApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent("OrderDesk")
            .default_headers(headers)
            .build()
            .map_err(|e| MarketplaceApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &MarketplaceConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Sends a single request to the backend. There are no retries; transport, status and decoding failures are
    /// reported as distinct error variants.
    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, MarketplaceApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| MarketplaceApiError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            trace!("REST query successful. {status}");
            let bytes = response.bytes().await.map_err(|e| MarketplaceApiError::Transport(e.to_string()))?;
            serde_json::from_slice::<T>(&bytes).map_err(|e| MarketplaceApiError::JsonError(e.to_string()))
        } else {
            let message = response.text().await.map_err(|e| MarketplaceApiError::Transport(e.to_string()))?;
            Err(MarketplaceApiError::QueryError { status: status.as_u16(), message })
        }
    }

    /// Fetches every order the backend currently knows about, in whatever order the backend chooses.
    pub async fn get_all_orders(&self) -> Result<Vec<Order>, MarketplaceApiError> {
        debug!("Fetching all orders");
        let result =
            self.rest_query::<OrdersResponse, ()>(Method::GET, "/marketplace/get_all_orders", &[], None).await?;
        debug!("Fetched {} orders", result.orders.len());
        Ok(result.orders)
    }

    pub async fn inventory_check(&self, sku: &str, model_sku: &str) -> Result<Vec<InventoryItem>, MarketplaceApiError> {
        debug!("Checking inventory for {sku} ({model_sku})");
        let params = [("sku", sku), ("model_sku", model_sku)];
        let result =
            self.rest_query::<InventoryResponse, ()>(Method::GET, "/storehub/inventory_check", &params, None).await?;
        info!("Inventory check for {sku} returned {} items", result.inventory.len());
        Ok(result.inventory)
    }

    pub async fn send_message(&self, request: &SendMessageRequest) -> Result<Value, MarketplaceApiError> {
        debug!("Sending message to {}: {}", request.user_id, request.message);
        let result =
            self.rest_query::<Value, &SendMessageRequest>(Method::POST, "/line/send_message", &[], Some(request)).await?;
        info!("Message sent successfully: {result}");
        Ok(result)
    }
}
