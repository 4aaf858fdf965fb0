use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use storefront_api::{
    config::AppConfig,
    db,
    entity::products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
    models::Role,
    services::{
        password_service::PasswordService,
        user_store::{self, NewUser},
    },
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = db::create_pool(&config.database_url, 2).await?;
    db::run_migrations(&pool).await?;
    let orm = db::orm_from_pool(pool);
    let passwords = PasswordService::with_default_params()?;

    let admin_id = ensure_user(&orm, &passwords, "admin", "admin@example.com", "admin123", Role::Admin).await?;
    let user_id = ensure_user(&orm, &passwords, "shopper", "user@example.com", "user123", Role::User).await?;
    seed_products(&orm).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    db::close(orm).await;
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    passwords: &PasswordService,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = user_store::find_by_email(orm, email).await? {
        println!("User {email} already present");
        return Ok(existing.id);
    }

    let user = user_store::insert(
        orm,
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: passwords.hash(password)?,
            role,
        },
    )
    .await?;

    println!("Created user {email} (role={})", role.as_str());
    Ok(user.id)
}

async fn seed_products(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let products = [
        ("FERRIS-HOODIE", "Ferris Hoodie", "Warm hoodie for Rustaceans", "apparel", 5500, 50),
        ("FERRIS-MUG", "Ferris Mug", "Coffee tastes better with Ferris", "kitchen", 1200, 100),
        ("STICKER-PACK", "Sticker Pack", "Decorate your laptop", "accessories", 500, 200),
        ("ASYNC-EBOOK", "E-book: Async Rust", "Learn async Rust patterns", "books", 2500, 75),
    ];

    for (sku, title, description, category, price, stock) in products {
        let exists = Products::find()
            .filter(ProdCol::Sku.eq(sku))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let now = Utc::now();
        ProductActive {
            id: Set(Uuid::new_v4()),
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            price: Set(price),
            original_price: Set(Some(price)),
            category: Set(category.to_string()),
            subcategories: Set(serde_json::json!([])),
            image_urls: Set(serde_json::json!([])),
            main_image: Set(String::new()),
            stock: Set(stock),
            sku: Set(sku.to_string()),
            brand: Set("Ferris & Co".to_string()),
            attributes: Set(serde_json::json!({})),
            is_featured: Set(false),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
