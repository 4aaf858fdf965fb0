use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartList, UpdateCartRequest},
    entity::{
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartLine,
    response::ApiResponse,
    services::{product_service, user_store},
    state::AppState,
};

/// Upper bound on the quantity of a single cart line.
pub const MAX_CART_QUANTITY: i32 = 999;

/// Cart entries joined with their products. Entries whose product is gone
/// or inactive are left out.
pub async fn resolve_cart<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<Vec<CartLine>> {
    let rows = CartItems::find()
        .find_also_related(Products)
        .filter(CartCol::UserId.eq(user_id))
        .order_by_asc(CartCol::CreatedAt)
        .all(db)
        .await?;

    let lines = rows
        .into_iter()
        .filter_map(|(entry, product)| {
            product
                .filter(|p| p.is_active)
                .map(|p| CartLine {
                    product: p.into(),
                    quantity: entry.quantity,
                })
        })
        .collect();
    Ok(lines)
}

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    user_store::require_by_id(&state.orm, user.user_id).await?;
    let items = resolve_cart(&state.orm, user.user_id).await?;
    Ok(ApiResponse::success("OK", CartList { items }, None))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartList>> {
    if payload.quantity < 1 {
        return Err(AppError::Validation(
            "quantity must be greater than 0".into(),
        ));
    }
    if payload.quantity > MAX_CART_QUANTITY {
        return Err(quantity_cap_error());
    }
    user_store::require_by_id(&state.orm, user.user_id).await?;
    product_service::require_active(&state.orm, payload.product_id).await?;

    apply_delta(state, user.user_id, payload.product_id, payload.quantity).await?;

    tracing::info!(
        user_id = %user.user_id,
        product_id = %payload.product_id,
        quantity = payload.quantity,
        "cart item added"
    );

    let items = resolve_cart(&state.orm, user.user_id).await?;
    Ok(ApiResponse::success("Added to cart", CartList { items }, None))
}

/// Apply a signed change to an entry. Growing an entry needs an active
/// product; shrinking one below 1 removes it.
pub async fn update_cart(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateCartRequest,
) -> AppResult<ApiResponse<CartList>> {
    user_store::require_by_id(&state.orm, user.user_id).await?;

    if payload.quantity > 0 {
        product_service::require_active(&state.orm, payload.product_id).await?;
    }
    if payload.quantity != 0 {
        apply_delta(state, user.user_id, payload.product_id, payload.quantity).await?;
        tracing::info!(
            user_id = %user.user_id,
            product_id = %payload.product_id,
            delta = payload.quantity,
            "cart item updated"
        );
    }

    let items = resolve_cart(&state.orm, user.user_id).await?;
    Ok(ApiResponse::success("Cart updated", CartList { items }, None))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<CartList>> {
    user_store::require_by_id(&state.orm, user.user_id).await?;

    let result = CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::ProductId.eq(product_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(user_id = %user.user_id, product_id = %product_id, "cart item removed");
    }

    let items = resolve_cart(&state.orm, user.user_id).await?;
    Ok(ApiResponse::success("Removed from cart", CartList { items }, None))
}

/// Row-level read-modify-write in one transaction: positive deltas upsert,
/// negative deltas decrement and drop entries that reach zero.
async fn apply_delta(state: &AppState, user_id: Uuid, product_id: Uuid, delta: i32) -> AppResult<()> {
    let txn = state.orm.begin().await?;

    if delta > 0 {
        let current = CartItems::find_by_id((user_id, product_id))
            .one(&txn)
            .await?
            .map(|entry| entry.quantity)
            .unwrap_or(0);
        match current.checked_add(delta) {
            Some(next) if next <= MAX_CART_QUANTITY => {}
            _ => return Err(quantity_cap_error()),
        }

        let entry = CartActive {
            user_id: Set(user_id),
            product_id: Set(product_id),
            quantity: Set(delta),
            created_at: Set(Utc::now().into()),
        };
        CartItems::insert(entry)
            .on_conflict(
                OnConflict::columns([CartCol::UserId, CartCol::ProductId])
                    .value(
                        CartCol::Quantity,
                        Expr::col((CartItems, CartCol::Quantity)).add(delta),
                    )
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
    } else {
        CartItems::update_many()
            .col_expr(CartCol::Quantity, Expr::col(CartCol::Quantity).add(delta))
            .filter(CartCol::UserId.eq(user_id))
            .filter(CartCol::ProductId.eq(product_id))
            .exec(&txn)
            .await?;
        CartItems::delete_many()
            .filter(CartCol::UserId.eq(user_id))
            .filter(CartCol::ProductId.eq(product_id))
            .filter(CartCol::Quantity.lte(0))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(())
}

fn quantity_cap_error() -> AppError {
    AppError::Validation(format!(
        "quantity per item cannot exceed {MAX_CART_QUANTITY}"
    ))
}
