use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};

use crate::{
    dto::cart::{AddToCartRequest, CartList, UpdateCartRequest},
    error::AppResult,
    middleware::{auth::AuthUser, json::AppJson},
    response::{ApiResponse, ErrorResponse},
    routes::params::parse_id,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list))
        .route("/add", post(add_to_cart))
        .route("/update", put(update_cart))
        .route("/remove/{product_id}", delete(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Cart of the current user", body = ApiResponse<CartList>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let resp = cart_service::list_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/cart/add",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add or increment a cart entry", body = ApiResponse<CartList>),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let resp = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/cart/update",
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Apply a signed quantity change", body = ApiResponse<CartList>),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_cart(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<UpdateCartRequest>,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let resp = cart_service::update_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/cart/remove/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Entry removed, or nothing to remove", body = ApiResponse<CartList>),
        (status = 400, description = "Invalid product id", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let product_id = parse_id(&product_id, "product")?;
    let resp = cart_service::remove_from_cart(&state, &user, product_id).await?;
    Ok(Json(resp))
}
