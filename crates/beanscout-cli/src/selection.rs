//! Wishlist, comparison and share commands.

use anyhow::bail;
use beanscout_core::{AppConfig, FileStorage, FilterState, Intent, Session};
use clap::Subcommand;

use crate::{catalog, output};

/// Sub-commands available under `wishlist`.
#[derive(Debug, Subcommand)]
pub enum WishlistCommands {
    /// Add the product to the wishlist, or remove it if already there
    Toggle { id: String },
    /// Show wishlisted products from the current catalog
    List,
}

fn start_session(config: &AppConfig) -> Session<FileStorage> {
    Session::start(
        FileStorage::new(&config.wishlist_path),
        FilterState::default(),
    )
}

/// # Errors
///
/// Returns an error if the catalog for `list` cannot be resolved.
pub(crate) async fn run_wishlist(
    config: &AppConfig,
    catalog_slug: Option<&str>,
    command: WishlistCommands,
) -> anyhow::Result<()> {
    let mut session = start_session(config);

    match command {
        WishlistCommands::Toggle { id } => {
            let state = session.dispatch(Intent::ToggleWishlist(id.clone()));
            if state.selection.is_wishlisted(&id) {
                println!("added {id} to wishlist");
            } else {
                println!("removed {id} from wishlist");
            }
        }
        WishlistCommands::List => {
            let source = catalog::open_source(config, catalog_slug)?;
            catalog::fetch_into(&mut session, &source).await;
            let state = session.state();

            let Some(snapshot) = &state.catalog else {
                // Without a catalog only the raw ids can be shown.
                if let Some(notice) = &state.notice {
                    eprintln!("error: {notice}");
                }
                for id in &state.selection.wishlist {
                    println!("{id}");
                }
                return Ok(());
            };

            let scored = snapshot.scored();
            let wishlisted = state.selection.wishlisted(&scored);
            if wishlisted.is_empty() {
                println!("Wishlist is empty");
                return Ok(());
            }
            println!("{}", output::header_row());
            for product in wishlisted {
                println!("{}", output::product_row(product, true));
            }
        }
    }
    Ok(())
}

/// Toggles each id into the comparison set, in order, and prints the result.
///
/// # Errors
///
/// Returns an error if the catalog cannot be resolved.
pub(crate) async fn run_compare(
    config: &AppConfig,
    catalog_slug: Option<&str>,
    ids: &[String],
) -> anyhow::Result<()> {
    let source = catalog::open_source(config, catalog_slug)?;
    let mut session = start_session(config);
    catalog::fetch_into(&mut session, &source).await;

    for id in ids {
        session.dispatch(Intent::ToggleComparison(id.clone()));
    }

    let state = session.state();
    if let Some(notice) = &state.notice {
        eprintln!("{notice}");
    }

    let scored = state.catalog.as_ref().map(|c| c.scored()).unwrap_or_default();
    let compared = state.selection.compared(&scored);
    for id in state.selection.comparison() {
        if !compared.iter().any(|p| &p.id == id) {
            tracing::warn!(id = %id, "not in the current catalog; skipped");
        }
    }
    if compared.is_empty() {
        println!("Nothing to compare");
        return Ok(());
    }
    for line in output::compare_lines(&compared) {
        println!("{line}");
    }
    Ok(())
}

/// Prints the share payload as JSON. A terminal has no share sheet, so the
/// payload itself (with the link) is the fallback.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched or has no product `id`.
pub(crate) async fn run_share(
    config: &AppConfig,
    catalog_slug: Option<&str>,
    id: &str,
) -> anyhow::Result<()> {
    let source = catalog::open_source(config, catalog_slug)?;
    let snapshot = source.fetch_catalog().await?;

    let Some(product) = snapshot.scored().into_iter().find(|p| p.id == id) else {
        bail!("product '{id}' not found in the current catalog");
    };
    println!("{}", serde_json::to_string_pretty(&product.share_payload())?);
    Ok(())
}
