use storefront_api::{config::AppConfig, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let pool = db::create_pool(&config.database_url, 1).await?;
    db::run_migrations(&pool).await?;
    pool.close().await;
    println!("Migrations applied");
    Ok(())
}
