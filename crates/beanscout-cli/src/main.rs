mod browse;
mod catalog;
mod output;
mod selection;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::browse::BrowseArgs;
use crate::selection::WishlistCommands;

#[derive(Debug, Parser)]
#[command(name = "beanscout")]
#[command(about = "Browse, compare and bookmark coffee deals")]
struct Cli {
    /// Catalog slug to use instead of `BEANSCOUT_CATALOG` or the first configured catalog
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the catalog, then print the scored, filtered, sorted grid
    Browse(BrowseArgs),
    /// Manage the persisted wishlist
    Wishlist {
        #[command(subcommand)]
        command: WishlistCommands,
    },
    /// Print a side-by-side summary of up to three products
    Compare {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Print the share payload for a product
    Share { id: String },
    /// List configured catalogs
    Catalogs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = beanscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = cli.catalog.as_deref().or(config.catalog.as_deref());

    match cli.command {
        Some(Commands::Browse(args)) => browse::run_browse(&config, catalog, &args).await?,
        Some(Commands::Wishlist { command }) => {
            selection::run_wishlist(&config, catalog, command).await?;
        }
        Some(Commands::Compare { ids }) => selection::run_compare(&config, catalog, &ids).await?,
        Some(Commands::Share { id }) => selection::run_share(&config, catalog, &id).await?,
        Some(Commands::Catalogs) => catalog::run_catalogs(&config, catalog)?,
        None => println!("beanscout: run `beanscout --help` for commands"),
    }

    Ok(())
}
