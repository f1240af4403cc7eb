//! Shipdesk CLI - migrations, channel sync, and reconciled lookups.
//!
//! # Usage
//!
//! ```bash
//! # Run dashboard database migrations
//! shipdesk migrate
//!
//! # Pull channel orders into the database
//! shipdesk sync
//! shipdesk sync --recent
//!
//! # List reconciled orders
//! shipdesk orders --search priya --status "In Transit" --page 2
//!
//! # Show the tracking timeline for a waybill
//! shipdesk track AWB100
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `sync` - Pull channel orders into the database
//! - `orders` - List reconciled orders across both sources
//! - `track` - Tracking timeline lookup by AWB

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shipdesk")]
#[command(author, version, about = "Shipdesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Pull channel orders into the database
    Sync {
        /// Only sync the most recent page instead of the full order book
        #[arg(long)]
        recent: bool,
    },
    /// List reconciled orders across both sources
    Orders {
        /// Free-text search across order id, customer, and AWB
        #[arg(short, long)]
        search: Option<String>,

        /// Status filter (e.g. "Delivered", "In Transit", "RTO")
        #[arg(long)]
        status: Option<String>,

        /// Courier filter
        #[arg(long)]
        courier: Option<String>,

        /// Payment mode filter
        #[arg(long)]
        payment_mode: Option<String>,

        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Page size
        #[arg(long, default_value_t = 25)]
        page_size: u32,
    },
    /// Show the tracking timeline for a waybill
    Track {
        /// Waybill number
        awb: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Sync { recent } => commands::sync::run(recent).await?,
        Commands::Orders {
            search,
            status,
            courier,
            payment_mode,
            page,
            page_size,
        } => {
            commands::orders::run(search, status, courier, payment_mode, page, page_size).await?;
        }
        Commands::Track { awb } => commands::track::run(&awb).await?,
    }
    Ok(())
}
