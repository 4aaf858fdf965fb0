#![allow(dead_code)]

use argon2::Params;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema, Set,
};
use storefront_api::{
    entity::{
        CartItems, OrderItems, Orders, Products, Users, WishlistItems,
        products::{ActiveModel as ProductActive, Model as ProductModel},
    },
    middleware::auth::{AdminUser, AuthUser},
    models::Role,
    services::{
        password_service::PasswordService,
        token_service::TokenService,
        user_store::{self, NewUser},
    },
    state::AppState,
};
use uuid::Uuid;

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "correct-horse";

pub fn token_service() -> TokenService {
    TokenService::new(
        SECRET,
        Duration::minutes(30),
        Duration::days(7),
        Duration::minutes(15),
    )
}

/// Fresh in-memory store with the schema generated from the entities.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let orm = Database::connect(options).await?;
    create_schema(&orm).await?;

    let params = Params::new(1024, 1, 1, None).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(AppState {
        orm,
        tokens: token_service(),
        passwords: PasswordService::new(params)?,
    })
}

async fn create_schema(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let backend = orm.get_database_backend();
    let schema = Schema::new(backend);
    let statements = [
        schema.create_table_from_entity(Users),
        schema.create_table_from_entity(Products),
        schema.create_table_from_entity(Orders),
        schema.create_table_from_entity(OrderItems),
        schema.create_table_from_entity(CartItems),
        schema.create_table_from_entity(WishlistItems),
    ];
    for statement in statements {
        orm.execute(backend.build(&statement)).await?;
    }
    Ok(())
}

pub async fn create_user(state: &AppState, username: &str, role: Role) -> anyhow::Result<Uuid> {
    let user = user_store::insert(
        &state.orm,
        NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: state.passwords.hash(PASSWORD)?,
            role,
        },
    )
    .await?;
    Ok(user.id)
}

pub async fn shopper(state: &AppState, username: &str) -> anyhow::Result<AuthUser> {
    let user_id = create_user(state, username, Role::User).await?;
    Ok(AuthUser { user_id })
}

pub async fn admin(state: &AppState) -> anyhow::Result<AdminUser> {
    let user_id = create_user(state, "root", Role::Admin).await?;
    Ok(AdminUser { user_id })
}

pub async fn create_product(state: &AppState, title: &str, price: i64) -> anyhow::Result<ProductModel> {
    let now = Utc::now();
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        title: Set(title.to_string()),
        description: Set(String::new()),
        price: Set(price),
        original_price: Set(Some(price)),
        category: Set("general".to_string()),
        subcategories: Set(serde_json::json!([])),
        image_urls: Set(serde_json::json!([])),
        main_image: Set(String::new()),
        stock: Set(10),
        sku: Set(String::new()),
        brand: Set(String::new()),
        attributes: Set(serde_json::json!({})),
        is_featured: Set(false),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(product)
}
