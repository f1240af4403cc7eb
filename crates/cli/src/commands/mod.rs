//! CLI subcommand implementations.

pub mod migrate;
pub mod orders;
pub mod sync;
pub mod track;

use shipdesk_dashboard::config::DashboardConfig;
use shipdesk_dashboard::db::{self, OrderRepository};
use shipdesk_dashboard::reconcile::OrderReconciler;
use shipdesk_dashboard::shiprocket::ShiprocketClient;
use shipdesk_dashboard::source::{DatabaseAdapter, ShiprocketAdapter};

/// Wire a reconciler over both production adapters from the environment.
pub(crate) async fn build_reconciler()
-> Result<OrderReconciler<DatabaseAdapter, ShiprocketAdapter>, Box<dyn std::error::Error>> {
    let config = DashboardConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    let database = DatabaseAdapter::new(OrderRepository::new(pool));
    let api = ShiprocketAdapter::new(ShiprocketClient::new(&config.shiprocket));
    Ok(OrderReconciler::new(database, api))
}
