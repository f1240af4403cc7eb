//! AWB tracking lookup command.

use shipdesk_core::EventOrder;
use shipdesk_dashboard::error::AppError;

use super::build_reconciler;

/// Show the tracking timeline for a waybill.
pub async fn run(awb: &str) -> Result<(), Box<dyn std::error::Error>> {
    let reconciler = build_reconciler().await?;

    let snapshot = match reconciler.fetch_tracking(awb).await {
        Ok(snapshot) => snapshot,
        Err(AppError::NotFound(_)) => {
            #[allow(clippy::print_stdout)]
            {
                println!("No shipment found for AWB {awb}");
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let direction = match snapshot.event_order {
        EventOrder::NewestFirst => "newest first",
        EventOrder::OldestFirst => "oldest first",
    };

    #[allow(clippy::print_stdout)]
    {
        println!(
            "AWB {awb} - {} via {}",
            snapshot.current_status.as_deref().unwrap_or("Unknown"),
            snapshot.courier.as_deref().unwrap_or("Unknown"),
        );
        if let Some(order_id) = &snapshot.order_id {
            println!("Order: {order_id}");
        }
        if let Some(etd) = &snapshot.etd {
            println!("Estimated delivery: {etd}");
        }
        println!("Events ({direction}):");
        for event in &snapshot.tracking_history {
            println!(
                "  {:<22} {:<24} {}",
                event.timestamp.as_deref().unwrap_or("-"),
                event.display_location(),
                event
                    .status
                    .as_deref()
                    .or(event.activity.as_deref())
                    .unwrap_or("-"),
            );
        }
    }

    Ok(())
}
