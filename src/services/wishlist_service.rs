use chrono::Utc;
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    dto::wishlist::{AddWishlistRequest, WishlistCheck, WishlistProducts},
    entity::{
        products::Entity as Products,
        wishlist_items::{ActiveModel as WishlistActive, Column as WishCol, Entity as WishlistItems},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Product,
    response::ApiResponse,
    services::{product_service, user_store},
    state::AppState,
};

pub async fn list_wishlist(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<WishlistProducts>> {
    user_store::require_by_id(&state.orm, user.user_id).await?;

    let items: Vec<Product> = WishlistItems::find()
        .find_also_related(Products)
        .filter(WishCol::UserId.eq(user.user_id))
        .order_by_asc(WishCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .filter_map(|(_, product)| product.filter(|p| p.is_active).map(Product::from))
        .collect();

    Ok(ApiResponse::success("OK", WishlistProducts { items }, None))
}

pub async fn add_to_wishlist(
    state: &AppState,
    user: &AuthUser,
    payload: AddWishlistRequest,
) -> AppResult<ApiResponse<WishlistCheck>> {
    user_store::require_by_id(&state.orm, user.user_id).await?;
    product_service::require_active(&state.orm, payload.product_id).await?;

    let entry = WishlistActive {
        user_id: Set(user.user_id),
        product_id: Set(payload.product_id),
        created_at: Set(Utc::now().into()),
    };
    let inserted = WishlistItems::insert(entry)
        .on_conflict(
            OnConflict::columns([WishCol::UserId, WishCol::ProductId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&state.orm)
        .await?;

    if inserted > 0 {
        tracing::info!(user_id = %user.user_id, product_id = %payload.product_id, "wishlist item added");
    }

    Ok(ApiResponse::success(
        "Added to wishlist",
        WishlistCheck {
            product_id: payload.product_id,
            is_in_wishlist: true,
        },
        None,
    ))
}

pub async fn remove_from_wishlist(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<WishlistCheck>> {
    user_store::require_by_id(&state.orm, user.user_id).await?;

    let result = WishlistItems::delete_many()
        .filter(WishCol::UserId.eq(user.user_id))
        .filter(WishCol::ProductId.eq(product_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(user_id = %user.user_id, product_id = %product_id, "wishlist item removed");
    }

    Ok(ApiResponse::success(
        "Removed from wishlist",
        WishlistCheck {
            product_id,
            is_in_wishlist: false,
        },
        None,
    ))
}

pub async fn check_wishlist(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<WishlistCheck>> {
    user_store::require_by_id(&state.orm, user.user_id).await?;

    let entry = WishlistItems::find_by_id((user.user_id, product_id))
        .one(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "OK",
        WishlistCheck {
            product_id,
            is_in_wishlist: entry.is_some(),
        },
        None,
    ))
}
