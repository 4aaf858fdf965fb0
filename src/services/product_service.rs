use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Load a product that is visible to shoppers.
pub async fn require_active<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<ProductModel> {
    Products::find_by_id(id)
        .filter(Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or(AppError::NotFound("Product"))
}

async fn paginate(
    state: &AppState,
    finder: Select<Products>,
    pagination: &Pagination,
) -> AppResult<(ProductList, Meta)> {
    let (page, limit, offset) = pagination.normalize();
    let finder = finder.order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok((ProductList { items }, Meta::new(page, limit, total)))
}

pub async fn list_products(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<ProductList>> {
    let finder = Products::find().filter(Column::IsActive.eq(true));
    let (data, meta) = paginate(state, finder, &pagination).await?;
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = require_active(&state.orm, id).await?;
    Ok(ApiResponse::success("Product", product.into(), None))
}

pub async fn list_all_products(
    state: &AppState,
    _admin: &AdminUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<ProductList>> {
    let (data, meta) = paginate(state, Products::find(), &pagination).await?;
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

fn validate_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".into()));
    }
    Ok(title.to_string())
}

fn validate_price(field: &str, value: i64) -> AppResult<i64> {
    if value < 0 {
        return Err(AppError::Validation(format!("{field} must not be negative")));
    }
    Ok(value)
}

fn validate_stock(stock: i32) -> AppResult<i32> {
    if stock < 0 {
        return Err(AppError::Validation("stock must not be negative".into()));
    }
    Ok(stock)
}

fn validate_attributes(attributes: serde_json::Value) -> AppResult<serde_json::Value> {
    if !attributes.is_object() {
        return Err(AppError::Validation("attributes must be an object".into()));
    }
    Ok(attributes)
}

pub async fn create_product(
    state: &AppState,
    admin: &AdminUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let title = validate_title(&payload.title)?;
    let price = validate_price("price", payload.price)?;
    let original_price = validate_price("original_price", payload.original_price.unwrap_or(price))?;
    let stock = validate_stock(payload.stock)?;
    let attributes = validate_attributes(
        payload
            .attributes
            .unwrap_or_else(|| serde_json::json!({})),
    )?;
    let main_image = payload
        .main_image
        .filter(|url| !url.trim().is_empty())
        .or_else(|| payload.image_urls.first().cloned())
        .unwrap_or_default();

    let now = Utc::now();
    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title),
        description: Set(payload.description),
        price: Set(price),
        original_price: Set(Some(original_price)),
        category: Set(payload.category),
        subcategories: Set(serde_json::json!(payload.subcategories)),
        image_urls: Set(serde_json::json!(payload.image_urls)),
        main_image: Set(main_image),
        stock: Set(stock),
        sku: Set(payload.sku),
        brand: Set(payload.brand),
        attributes: Set(attributes),
        is_featured: Set(payload.is_featured),
        is_active: Set(payload.is_active),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(admin_id = %admin.user_id, product_id = %product.id, "product created");

    Ok(ApiResponse::success("Product created", product.into(), None))
}

pub async fn update_product(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Product"))?;

    let mut active: ActiveModel = existing.into();
    let mut changed = false;

    if let Some(title) = payload.title {
        active.title = Set(validate_title(&title)?);
        changed = true;
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
        changed = true;
    }
    if let Some(price) = payload.price {
        active.price = Set(validate_price("price", price)?);
        changed = true;
    }
    if let Some(original_price) = payload.original_price {
        active.original_price = Set(Some(validate_price("original_price", original_price)?));
        changed = true;
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
        changed = true;
    }
    if let Some(subcategories) = payload.subcategories {
        active.subcategories = Set(serde_json::json!(subcategories));
        changed = true;
    }
    if let Some(image_urls) = payload.image_urls {
        active.image_urls = Set(serde_json::json!(image_urls));
        changed = true;
    }
    if let Some(main_image) = payload.main_image {
        active.main_image = Set(main_image);
        changed = true;
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(validate_stock(stock)?);
        changed = true;
    }
    if let Some(sku) = payload.sku {
        active.sku = Set(sku);
        changed = true;
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(brand);
        changed = true;
    }
    if let Some(attributes) = payload.attributes {
        active.attributes = Set(validate_attributes(attributes)?);
        changed = true;
    }
    if let Some(is_featured) = payload.is_featured {
        active.is_featured = Set(is_featured);
        changed = true;
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
        changed = true;
    }

    if !changed {
        return Err(AppError::Validation("No fields to update".into()));
    }

    active.updated_at = Set(Utc::now().into());
    let product = active.update(&state.orm).await?;

    tracing::info!(admin_id = %admin.user_id, product_id = %product.id, "product updated");

    Ok(ApiResponse::success("Updated", product.into(), None))
}

/// Soft delete: the row stays for order history and admin reads.
pub async fn deactivate_product(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Product"))?;

    let mut active: ActiveModel = existing.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now().into());
    let product = active.update(&state.orm).await?;

    tracing::info!(admin_id = %admin.user_id, product_id = %product.id, "product deactivated");

    Ok(ApiResponse::success("Deleted", product.into(), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed_and_required() {
        assert_eq!(validate_title("  Mug ").unwrap(), "Mug");
        assert!(matches!(validate_title("   "), Err(AppError::Validation(_))));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(validate_price("price", -1).is_err());
        assert_eq!(validate_price("price", 0).unwrap(), 0);
        assert!(validate_stock(-3).is_err());
    }

    #[test]
    fn attributes_must_be_an_object() {
        assert!(validate_attributes(serde_json::json!([1, 2])).is_err());
        assert!(validate_attributes(serde_json::json!({"color": "red"})).is_ok());
    }
}
