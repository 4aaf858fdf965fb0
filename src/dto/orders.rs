use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Order;

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckoutItem {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub price: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub shipping_address: Value,
    pub payment_method: Option<String>,
    pub shipping_method: Option<String>,
    #[serde(default)]
    pub shipping_cost: i64,
    #[serde(default)]
    pub discount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
