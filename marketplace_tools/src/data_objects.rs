use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::helpers::{epoch_seconds, null_as_default, optional_text, string_or_number};

//--------------------------------------     OrderNumber      ---------------------------------------------------------
/// Marketplaces disagree on what an order number is. Some send integers, others send strings such as "SO-1001".
///
/// Equality is strict: `Number(1001)` and `Text("1001")` are different order numbers.
///
/// Decoding never fails. Integers that do not fit an `i64` are kept as text, whole floats become numbers, and null or
/// any other JSON value is `Missing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum OrderNumber {
    Number(i64),
    Text(String),
    #[default]
    Missing,
}

impl From<Value> for OrderNumber {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Self::Number(i),
                #[allow(clippy::cast_possible_truncation)]
                (None, Some(f)) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Self::Number(f as i64)
                },
                _ => Self::Text(n.to_string()),
            },
            _ => Self::Missing,
        }
    }
}

impl<'de> Deserialize<'de> for OrderNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de> {
        Ok(Option::<Value>::deserialize(deserializer)?.map(Self::from).unwrap_or_default())
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Missing => Ok(()),
        }
    }
}

impl From<i64> for OrderNumber {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for OrderNumber {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

//--------------------------------------        Order         ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, deserialize_with = "string_or_number")]
    pub marketplace: String,
    #[serde(default)]
    pub order_number: OrderNumber,
    #[serde(default, deserialize_with = "string_or_number")]
    pub total_price: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub payment_method: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub items_count: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub status: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub customer_name: String,
    /// ISO-like creation date. Only consulted when `create_time` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "optional_text")]
    pub created_at: Option<String>,
    /// Creation time in epoch seconds. Takes precedence over `created_at`.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "epoch_seconds")]
    pub create_time: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, deserialize_with = "string_or_number")]
    pub product_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub sku: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub model_sku: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub product_main_image: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub paid_price: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub item_price: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub fulfillment_sla: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OrdersResponse {
    pub orders: Vec<Order>,
}

//--------------------------------------      Inventory       ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub model_sku: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub warning_stock_level: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub track_stock_level: String,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default)]
    pub branch_name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub has_stock: bool,
}

impl InventoryItem {
    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.branch_name == name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct InventoryResponse {
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
}

//--------------------------------------      Messaging       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub user_id: String,
    pub message: String,
    pub image_url: String,
}
