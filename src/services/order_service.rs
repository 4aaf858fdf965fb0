use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, LoaderTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutItem, CheckoutRequest, OrderList},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderSummary},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::user_store,
    state::AppState,
};

pub const DEFAULT_PAYMENT_METHOD: &str = "credit_card";
pub const DEFAULT_SHIPPING_METHOD: &str = "standard";
pub const INITIAL_STATUS: &str = "pending";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: i64,
    pub total: i64,
}

/// Check a checkout request and work out its amounts. Prices come from the
/// request as-is; the catalog is not consulted.
pub fn compute_totals(payload: &CheckoutRequest) -> AppResult<Totals> {
    if payload.items.is_empty() {
        return Err(AppError::Validation("items are required".into()));
    }
    if payload.shipping_cost < 0 {
        return Err(AppError::Validation("shipping_cost must not be negative".into()));
    }
    if payload.discount < 0 {
        return Err(AppError::Validation("discount must not be negative".into()));
    }

    let mut subtotal: i64 = 0;
    for item in &payload.items {
        if item.quantity < 1 {
            return Err(AppError::Validation("quantity must be greater than 0".into()));
        }
        if item.price < 0 {
            return Err(AppError::Validation("price must not be negative".into()));
        }
        subtotal = item
            .price
            .checked_mul(item.quantity as i64)
            .and_then(|line| subtotal.checked_add(line))
            .ok_or_else(|| AppError::Validation("order amount is too large".into()))?;
    }

    let gross = subtotal
        .checked_add(payload.shipping_cost)
        .ok_or_else(|| AppError::Validation("order amount is too large".into()))?;
    if payload.discount > gross {
        return Err(AppError::Validation(
            "discount must not exceed subtotal plus shipping".into(),
        ));
    }

    Ok(Totals {
        subtotal,
        total: gross - payload.discount,
    })
}

fn shipping_address(value: Value) -> AppResult<Value> {
    match value {
        Value::Null => Ok(serde_json::json!({})),
        Value::Object(_) => Ok(value),
        _ => Err(AppError::Validation(
            "shipping_address must be an object".into(),
        )),
    }
}

fn method_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<Order>> {
    let totals = compute_totals(&payload)?;
    user_store::require_by_id(&state.orm, user.user_id).await?;

    let CheckoutRequest {
        items,
        shipping_address: address,
        payment_method,
        shipping_method,
        shipping_cost,
        discount,
    } = payload;
    let address = shipping_address(address)?;

    let txn = state.orm.begin().await?;

    let now = Utc::now();
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        shipping_address: Set(address),
        payment_method: Set(method_or(payment_method, DEFAULT_PAYMENT_METHOD)),
        shipping_method: Set(method_or(shipping_method, DEFAULT_SHIPPING_METHOD)),
        subtotal: Set(totals.subtotal),
        shipping_cost: Set(shipping_cost),
        discount: Set(discount),
        total: Set(totals.total),
        status: Set(INITIAL_STATUS.to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut lines = Vec::with_capacity(items.len());
    for CheckoutItem {
        product_id,
        quantity,
        price,
        name,
    } in items
    {
        let line = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(product_id),
            name: Set(name),
            quantity: Set(quantity),
            price: Set(price),
        }
        .insert(&txn)
        .await?;
        lines.push(line);
    }

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        user_id = %user.user_id,
        order_id = %order.id,
        total = order.total,
        items = lines.len(),
        "order placed"
    );

    Ok(ApiResponse::success(
        "Order created",
        Order::from_parts(order, lines),
        None,
    ))
}

/// Attach line items to an order row.
pub async fn load_order<C: ConnectionTrait>(db: &C, order: OrderModel) -> AppResult<Order> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::Id)
        .all(db)
        .await?;
    Ok(Order::from_parts(order, items))
}

/// Newest-first page of orders, items included.
pub async fn paginate_orders<C: ConnectionTrait>(
    db: &C,
    finder: Select<Orders>,
    pagination: &Pagination,
) -> AppResult<(OrderList, Meta)> {
    let (page, limit, offset) = pagination.normalize();
    let finder = finder.order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(db).await? as i64;
    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(db)
        .await?;
    let lines = orders.load_many(OrderItems, db).await?;

    let items = orders
        .into_iter()
        .zip(lines)
        .map(|(order, lines)| Order::from_parts(order, lines))
        .collect();

    Ok((OrderList { items }, Meta::new(page, limit, total)))
}

pub async fn list_orders_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    pagination: &Pagination,
) -> AppResult<(OrderList, Meta)> {
    paginate_orders(db, Orders::find().filter(OrderCol::UserId.eq(user_id)), pagination).await
}

/// Summaries of every order a user placed, newest first.
pub async fn purchase_history<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<Vec<OrderSummary>> {
    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(db)
        .await?;
    Ok(orders.into_iter().map(OrderSummary::from).collect())
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    user_store::require_by_id(&state.orm, user.user_id).await?;
    let (data, meta) = list_orders_for_user(&state.orm, user.user_id, &pagination).await?;
    Ok(ApiResponse::success("Orders", data, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find_by_id(id)
        .filter(OrderCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    let order = load_order(&state.orm, order).await?;
    Ok(ApiResponse::success("Order found", order, None))
}
