//! Database migration command.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string for the dashboard store
//!
//! Migration files live in `crates/dashboard/migrations/`.

use shipdesk_dashboard::config::DashboardConfig;
use shipdesk_dashboard::db;

/// Run dashboard database migrations.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = DashboardConfig::from_env()?;

    tracing::info!("Connecting to dashboard database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running dashboard migrations...");
    sqlx::migrate!("../dashboard/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
