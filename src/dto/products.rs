use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::Product;

fn default_category() -> String {
    "general".to_string()
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    pub original_price: Option<i64>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub main_image: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub brand: String,
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<Value>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub original_price: Option<i64>,
    pub category: Option<String>,
    pub subcategories: Option<Vec<String>>,
    pub image_urls: Option<Vec<String>>,
    pub main_image: Option<String>,
    pub stock: Option<i32>,
    pub sku: Option<String>,
    pub brand: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<Value>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}
