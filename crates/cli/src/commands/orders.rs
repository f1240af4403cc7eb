//! Reconciled order listing command.

use shipdesk_core::ShipmentStatus;
use shipdesk_dashboard::reconcile::OrderFilters;

use super::build_reconciler;

/// List orders merged across both sources, filtered and paginated.
pub async fn run(
    search: Option<String>,
    status: Option<String>,
    courier: Option<String>,
    payment_mode: Option<String>,
    page: u32,
    page_size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let reconciler = build_reconciler().await?;

    let filters = OrderFilters {
        search,
        status: status.map(ShipmentStatus::from),
        date_from: None,
        date_to: None,
        courier,
        payment_mode,
    };

    let listing = reconciler.list_orders(&filters, page, page_size).await?;

    #[allow(clippy::print_stdout)]
    {
        println!(
            "{} orders (page {}/{}, database: {}, api: {})",
            listing.total_count,
            listing.page,
            listing.total_pages.max(1),
            listing.provenance.database,
            listing.provenance.api,
        );
        for order in &listing.orders {
            println!(
                "{:<12} {:<22} {:<16} {:<12} {:>10}  [{}]",
                order.display_order_id(),
                order.customer.display_name(),
                order.awb.as_deref().unwrap_or("-"),
                order.status.label(),
                order.display_amount(),
                order.source,
            );
        }
    }

    Ok(())
}
