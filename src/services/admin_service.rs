use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::{
        orders::OrderList,
        users::{CreateUserRequest, UpdateUserRequest, UserList},
    },
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        orders::Entity as Orders,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
        wishlist_items::{Column as WishCol, Entity as WishlistItems},
    },
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::{CartEntry, Order, UserDocument, UserProfile},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{auth_service, order_service, user_store},
    state::AppState,
};

pub async fn list_users(
    state: &AppState,
    _admin: &AdminUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Users::find().order_by_desc(UserCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(UserProfile::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn get_user(
    state: &AppState,
    _admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<UserDocument>> {
    let user = user_store::require_by_id(&state.orm, id).await?;

    let cart = CartItems::find()
        .filter(CartCol::UserId.eq(id))
        .order_by_asc(CartCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|entry| CartEntry {
            product_id: entry.product_id,
            quantity: entry.quantity,
        })
        .collect();

    let wishlist = WishlistItems::find()
        .filter(WishCol::UserId.eq(id))
        .order_by_asc(WishCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|entry| entry.product_id)
        .collect();

    let purchase_history = order_service::purchase_history(&state.orm, id).await?;

    let document = UserDocument {
        profile: user.into(),
        cart,
        wishlist,
        purchase_history,
    };
    Ok(ApiResponse::success("User", document, None))
}

pub async fn create_user(
    state: &AppState,
    admin: &AdminUser,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<UserProfile>> {
    let CreateUserRequest {
        username,
        email,
        password,
        role,
    } = payload;
    let user = auth_service::create_account(state, &username, &email, &password, role).await?;

    tracing::info!(admin_id = %admin.user_id, user_id = %user.id, role = role.as_str(), "user created by admin");

    Ok(ApiResponse::success("User created", user, None))
}

pub async fn update_user(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<UserProfile>> {
    let existing = user_store::require_by_id(&state.orm, id).await?;

    let username = payload
        .username
        .as_deref()
        .map(auth_service::validate_username)
        .transpose()?;
    let email = payload
        .email
        .as_deref()
        .map(auth_service::normalize_email)
        .map(|email| auth_service::validate_email(&email).map(|_| email))
        .transpose()?;
    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            auth_service::validate_password(password)?;
            Some(state.passwords.hash(password)?)
        }
        None => None,
    };

    if username.is_none()
        && email.is_none()
        && password_hash.is_none()
        && payload.role.is_none()
        && payload.address.is_none()
    {
        return Err(AppError::Validation("No fields to update".into()));
    }

    if user_store::identity_taken(&state.orm, email.as_deref(), username.as_deref(), Some(id)).await? {
        return Err(AppError::Conflict(
            "Username or email already registered".into(),
        ));
    }

    let mut active: UserActive = existing.into();
    if let Some(username) = username {
        active.username = Set(username);
    }
    if let Some(email) = email {
        active.email = Set(email);
    }
    if let Some(password_hash) = password_hash {
        active.password_hash = Set(password_hash);
    }
    if let Some(role) = payload.role {
        active.role = Set(role);
    }
    if let Some(address) = payload.address {
        let address = serde_json::to_value(address).map_err(anyhow::Error::from)?;
        active.address = Set(Some(address));
    }

    let user = active.update(&state.orm).await?;

    tracing::info!(admin_id = %admin.user_id, user_id = %user.id, "user updated by admin");

    Ok(ApiResponse::success("User updated", user.into(), None))
}

/// Hard delete. Cart and wishlist rows go with the account; orders stay.
pub async fn delete_user(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(id))
        .exec(&txn)
        .await?;
    WishlistItems::delete_many()
        .filter(WishCol::UserId.eq(id))
        .exec(&txn)
        .await?;
    let result = Users::delete_by_id(id).exec(&txn).await?;

    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(AppError::NotFound("User"));
    }
    txn.commit().await?;

    tracing::info!(admin_id = %admin.user_id, user_id = %id, "user deleted by admin");

    Ok(ApiResponse::success(
        "User deleted",
        serde_json::json!({ "id": id }),
        None,
    ))
}

/// Orders of any account, including one that has since been deleted.
pub async fn user_orders(
    state: &AppState,
    _admin: &AdminUser,
    id: Uuid,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    let (data, meta) = order_service::list_orders_for_user(&state.orm, id, &pagination).await?;
    Ok(ApiResponse::success("Orders", data, Some(meta)))
}

pub async fn list_all_orders(
    state: &AppState,
    _admin: &AdminUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    let (data, meta) = order_service::paginate_orders(&state.orm, Orders::find(), &pagination).await?;
    Ok(ApiResponse::success("Orders", data, Some(meta)))
}

pub async fn get_any_order(
    state: &AppState,
    _admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    let order = order_service::load_order(&state.orm, order).await?;
    Ok(ApiResponse::success("Order found", order, None))
}
