use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddWishlistRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistProducts {
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistCheck {
    pub product_id: Uuid,
    pub is_in_wishlist: bool,
}
