pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod users;
pub mod wishlist;
