//! Aura CLI - terminal shopper for the Aura storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! aura products --category bolsas --sort price-asc
//! aura product 1
//!
//! # Build a cart and keep favorites
//! aura cart add 1 -q 2
//! aura favorites toggle 4
//!
//! # Hand off to hosted checkout, then confirm
//! aura checkout
//! aura success --session-id cs_test_123
//! ```
//!
//! # Commands
//!
//! - `products` / `product` - Browse the catalog
//! - `cart` - Show and edit the cart
//! - `favorites` - Show and edit favorites
//! - `checkout` - Open a hosted checkout session (cart untouched)
//! - `success` / `cancel` - Return from hosted checkout

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;

use clap::{Parser, Subcommand};

use aura_cli::commands::products::ProductFilter;
use aura_cli::commands::{cart, checkout, favorites, products};
use aura_cli::{CheckoutClient, CliConfig, CliError, ConfigArgs, FileStorage, Redirects};
use aura_core::catalog::SortOrder;
use aura_core::{Catalog, Category, ProductId, Store};

#[derive(Parser)]
#[command(name = "aura")]
#[command(author, version, about = "Aura storefront in your terminal")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Only this category (bolsas, carteiras, oculos-de-sol)
        #[arg(short, long)]
        category: Option<Category>,

        /// Search name, description and category
        #[arg(short, long)]
        search: Option<String>,

        /// featured, newest, price-asc (price-low) or price-desc (price-high)
        #[arg(long, default_value = "featured")]
        sort: SortOrder,

        /// Only new arrivals
        #[arg(long)]
        new: bool,

        /// Only best sellers
        #[arg(long)]
        best_sellers: bool,

        /// Only marked-down products
        #[arg(long)]
        on_sale: bool,
    },
    /// Show one product
    Product {
        /// Product ID
        id: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Open a hosted checkout session for the cart
    Checkout {
        /// Override the success redirect
        #[arg(long)]
        success_url: Option<String>,

        /// Override the cancel redirect
        #[arg(long)]
        cancel_url: Option<String>,
    },
    /// Confirm a completed payment and clear the cart
    Success {
        /// Session ID from the success redirect
        #[arg(long)]
        session_id: Option<String>,
    },
    /// Return from an abandoned checkout (cart is kept)
    Cancel,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product's line
    Remove {
        /// Product ID
        id: String,
    },
    /// Set a line's quantity (0 removes it)
    Update {
        /// Product ID
        id: String,

        /// New quantity
        quantity: u32,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites
    List,
    /// Favorite a product
    Add {
        /// Product ID
        id: String,
    },
    /// Remove a favorite by entry ID (see `list`)
    Remove {
        /// Favorite entry ID
        entry_id: String,
    },
    /// Favorite or unfavorite a product
    Toggle {
        /// Product ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before parsing so environment fallbacks see it
    let _ = dotenvy::dotenv();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "aura_cli=warn,aura_core=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::debug!(error = ?e, "Command failed");
        let _ = writeln!(std::io::stderr(), "error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = CliConfig::try_from(cli.config)?;
    let catalog = Catalog::fixture();
    let mut store = Store::open(FileStorage::open(&config.data_dir)?);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Products {
            category,
            search,
            sort,
            new,
            best_sellers,
            on_sale,
        } => {
            let filter = ProductFilter {
                category,
                search,
                sort,
                new_only: new,
                best_sellers_only: best_sellers,
                on_sale_only: on_sale,
            };
            products::list(&catalog, &filter, &mut out)?;
        }
        Commands::Product { id } => products::show(&catalog, &ProductId::new(id), &mut out)?,
        Commands::Cart { action } => match action {
            CartAction::Show => cart::show(store.cart(), &mut out)?,
            CartAction::Add { id, quantity } => {
                cart::add(&mut store, &catalog, &ProductId::new(id), quantity, &mut out)?;
            }
            CartAction::Remove { id } => cart::remove(&mut store, &ProductId::new(id), &mut out)?,
            CartAction::Update { id, quantity } => {
                cart::update(&mut store, &ProductId::new(id), quantity, &mut out)?;
            }
            CartAction::Clear => cart::clear(&mut store, &mut out)?,
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::List => favorites::list(store.favorites(), &mut out)?,
            FavoritesAction::Add { id } => {
                favorites::add(&mut store, &catalog, &ProductId::new(id), &mut out)?;
            }
            FavoritesAction::Remove { entry_id } => {
                favorites::remove(&mut store, &entry_id, &mut out)?;
            }
            FavoritesAction::Toggle { id } => {
                favorites::toggle(&mut store, &catalog, &ProductId::new(id), &mut out)?;
            }
        },
        Commands::Checkout {
            success_url,
            cancel_url,
        } => {
            let client = CheckoutClient::new(&config)?;
            let redirects = Redirects {
                success_url,
                cancel_url,
            };
            checkout::start(&store, &client, &redirects, &mut out).await?;
        }
        Commands::Success { session_id } => {
            checkout::success(&mut store, session_id.as_deref(), &mut out)?;
        }
        Commands::Cancel => checkout::cancel(&store, &mut out)?,
    }

    Ok(())
}
