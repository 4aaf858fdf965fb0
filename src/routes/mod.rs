use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{response::ErrorResponse, state::AppState};

pub mod admin;
pub mod auth;
pub mod cart;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod wishlist;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(auth::dashboard_router())
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/wishlist", wishlist::router())
        .nest("/orders", orders::router())
        .nest("/admin", admin::router())
}

/// Full application without the transport layers, ready to serve or to be
/// driven directly in tests.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    let body = ErrorResponse::new(format!("No route for {}", uri.path()), StatusCode::NOT_FOUND);
    (StatusCode::NOT_FOUND, Json(body))
}
