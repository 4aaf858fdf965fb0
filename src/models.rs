use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::{DeriveActiveEnum, EnumIter, StringLen};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{order_items, orders, products, users};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

/// Public view of a user. The password hash has no field here on purpose.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub address: Option<Address>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for UserProfile {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            role: model.role,
            address: model
                .address
                .and_then(|value| serde_json::from_value(value).ok()),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartEntry {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Full user record as seen by administrators.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDocument {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub cart: Vec<CartEntry>,
    pub wishlist: Vec<Uuid>,
    pub purchase_history: Vec<OrderSummary>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub original_price: Option<i64>,
    pub category: String,
    pub subcategories: Vec<String>,
    pub image_urls: Vec<String>,
    pub main_image: String,
    pub stock: i32,
    pub sku: String,
    pub brand: String,
    #[schema(value_type = Object)]
    pub attributes: Value,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            price: model.price,
            original_price: model.original_price,
            category: model.category,
            subcategories: serde_json::from_value(model.subcategories).unwrap_or_default(),
            image_urls: serde_json::from_value(model.image_urls).unwrap_or_default(),
            main_image: model.main_image,
            stock: model.stock,
            sku: model.sku,
            brand: model.brand,
            attributes: model.attributes,
            is_featured: model.is_featured,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price: i64,
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        Self {
            product_id: model.product_id,
            name: model.name,
            quantity: model.quantity,
            price: model.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<OrderItem>,
    #[schema(value_type = Object)]
    pub shipping_address: Value,
    pub payment_method: String,
    pub shipping_method: String,
    pub subtotal: i64,
    pub shipping_cost: i64,
    pub discount: i64,
    pub total: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn from_parts(model: orders::Model, items: Vec<order_items::Model>) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            items: items.into_iter().map(OrderItem::from).collect(),
            shipping_address: model.shipping_address,
            payment_method: model.payment_method,
            shipping_method: model.shipping_method,
            subtotal: model.subtotal,
            shipping_cost: model.shipping_cost,
            discount: model.discount,
            total: model.total,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderSummary {
    pub id: Uuid,
    pub total: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<orders::Model> for OrderSummary {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            total: model.total,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
