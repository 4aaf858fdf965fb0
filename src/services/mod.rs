pub mod admin_service;
pub mod auth_service;
pub mod cart_service;
pub mod order_service;
pub mod password_service;
pub mod product_service;
pub mod token_service;
pub mod user_store;
pub mod wishlist_service;
