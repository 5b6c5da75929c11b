//! Sentra Tamansari CLI - browse the neighborhood catalog from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Search products, shops and activities at once
//! sentra search "ayam goreng"
//!
//! # What the navigation-bar dropdown would show for a query
//! sentra suggest ayam
//!
//! # Products of one shop, or recommendations for a category
//! sentra products by-shop 3f2a
//! sentra products recommended --category 2 --limit 4
//!
//! # A block with its shops
//! sentra blocks get 1
//!
//! # Upcoming activities
//! sentra activities upcoming
//! ```
//!
//! # Environment Variables
//!
//! - `SENTRA_API_URL` - REST API base URL
//! - `SENTRA_MEDIA_HOST` - Host serving uploaded photos
//! - `SENTRA_SEARCH_DEBOUNCE_MS` - Quiet period before a live search fires
//! - `RUST_LOG` - Log filter (default: `info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use catalog_core::{Api, ClientConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod transport;

use commands::Session;
use transport::UreqTransport;

#[derive(Parser)]
#[command(name = "sentra")]
#[command(author, version, about = "Sentra Tamansari catalog browser")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search products, shops and activities
    Search {
        /// Search text
        query: String,
    },
    /// Show what the live search dropdown shows for a query
    Suggest {
        /// Text typed into the search box
        query: String,
    },
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Browse shops
    Shops {
        #[command(subcommand)]
        action: ShopAction,
    },
    /// List product categories
    Categories,
    /// Browse housing blocks
    Blocks {
        #[command(subcommand)]
        action: BlockAction,
    },
    /// List house numbers
    HouseNumbers {
        /// Only house numbers in this block
        #[arg(short, long)]
        block: Option<u64>,
    },
    /// Browse community activities
    Activities {
        #[command(subcommand)]
        action: ActivityAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products
    List {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<u64>,
    },
    /// Show one product
    Get { id: String },
    /// Products sold by one shop
    ByShop { shop_id: String },
    /// Shuffled picks, optionally from one category
    Recommended {
        #[arg(short, long)]
        category: Option<u64>,

        /// Maximum number of products to show
        #[arg(short, long, default_value_t = 8)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum ShopAction {
    /// List all shops
    List,
    /// Show one shop and its products
    Get { id: String },
}

#[derive(Subcommand)]
enum BlockAction {
    /// List all blocks
    List,
    /// Show one block with its shops
    Get { id: u64 },
}

#[derive(Subcommand)]
enum ActivityAction {
    /// Activities after now, soonest first
    Upcoming,
    /// Activities before now, most recent first
    Past,
    /// Activities between two dates (inclusive)
    Range {
        /// Start date or datetime, e.g. 2024-08-01
        #[arg(long)]
        from: String,

        /// End date or datetime, e.g. 2024-08-31T23:59:59Z
        #[arg(long)]
        to: String,
    },
    /// Show one activity
    Get { id: u64 },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(base_url = %config.base_url, "using catalog API");
    let session = Session {
        api: Arc::new(Api::from_config(&config, UreqTransport::new())),
        config,
    };

    match cli.command {
        Commands::Search { query } => commands::search::page(&session, &query).await?,
        Commands::Suggest { query } => commands::search::suggest(&session, &query).await?,
        Commands::Products { action } => match action {
            ProductAction::List { category } => commands::products::list(&session, category).await?,
            ProductAction::Get { id } => commands::products::show(&session, &id).await?,
            ProductAction::ByShop { shop_id } => {
                commands::products::by_shop(&session, &shop_id).await?;
            }
            ProductAction::Recommended { category, limit } => {
                commands::products::recommended(&session, category, limit).await?;
            }
        },
        Commands::Shops { action } => match action {
            ShopAction::List => commands::shops::list(&session).await?,
            ShopAction::Get { id } => commands::shops::show(&session, &id).await?,
        },
        Commands::Categories => commands::neighborhood::categories(&session).await?,
        Commands::Blocks { action } => match action {
            BlockAction::List => commands::neighborhood::blocks(&session).await?,
            BlockAction::Get { id } => commands::neighborhood::block(&session, id).await?,
        },
        Commands::HouseNumbers { block } => {
            commands::neighborhood::house_numbers(&session, block).await?;
        }
        Commands::Activities { action } => match action {
            ActivityAction::Upcoming => commands::activities::upcoming(&session).await?,
            ActivityAction::Past => commands::activities::past(&session).await?,
            ActivityAction::Range { from, to } => {
                commands::activities::range(&session, &from, &to).await?;
            }
            ActivityAction::Get { id } => commands::activities::show(&session, id).await?,
        },
    }
    Ok(())
}
