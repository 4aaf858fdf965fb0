use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};

use crate::{
    dto::wishlist::{AddWishlistRequest, WishlistCheck, WishlistProducts},
    error::AppResult,
    middleware::{auth::AuthUser, json::AppJson},
    response::{ApiResponse, ErrorResponse},
    routes::params::parse_id,
    services::wishlist_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_wishlist))
        .route("/add", post(add_to_wishlist))
        .route("/remove/{product_id}", delete(remove_from_wishlist))
        .route("/check/{product_id}", get(check_wishlist))
}

#[utoipa::path(
    get,
    path = "/wishlist",
    responses(
        (status = 200, description = "Wishlisted products", body = ApiResponse<WishlistProducts>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn list_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<WishlistProducts>>> {
    let resp = wishlist_service::list_wishlist(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/wishlist/add",
    request_body = AddWishlistRequest,
    responses(
        (status = 200, description = "Product is in the wishlist", body = ApiResponse<WishlistCheck>),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<AddWishlistRequest>,
) -> AppResult<Json<ApiResponse<WishlistCheck>>> {
    let resp = wishlist_service::add_to_wishlist(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/wishlist/remove/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product is not in the wishlist", body = ApiResponse<WishlistCheck>),
        (status = 400, description = "Invalid product id", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<WishlistCheck>>> {
    let product_id = parse_id(&product_id, "product")?;
    let resp = wishlist_service::remove_from_wishlist(&state, &user, product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/wishlist/check/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Membership check", body = ApiResponse<WishlistCheck>),
        (status = 400, description = "Invalid product id", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn check_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<WishlistCheck>>> {
    let product_id = parse_id(&product_id, "product")?;
    let resp = wishlist_service::check_wishlist(&state, &user, product_id).await?;
    Ok(Json(resp))
}
