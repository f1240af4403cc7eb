//! Channel sync command.

use shipdesk_dashboard::cache::ListingCache;
use shipdesk_dashboard::config::DashboardConfig;
use shipdesk_dashboard::db::{self, OrderRepository};
use shipdesk_dashboard::shiprocket::ShiprocketClient;
use shipdesk_dashboard::source::ShiprocketAdapter;
use shipdesk_dashboard::sync::{SyncCoordinator, SyncScope};

/// Pull channel orders into the database.
pub async fn run(recent: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = DashboardConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;

    let coordinator = SyncCoordinator::new(
        ShiprocketAdapter::new(ShiprocketClient::new(&config.shiprocket)),
        OrderRepository::new(pool),
        ListingCache::new(config.listing_cache_ttl),
    );

    let scope = if recent {
        SyncScope::Recent
    } else {
        SyncScope::Full
    };
    let outcome = coordinator.trigger_sync(scope).await;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", outcome.message);
    }

    if outcome.success {
        Ok(())
    } else {
        Err(outcome.message.into())
    }
}
