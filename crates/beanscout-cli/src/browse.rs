use beanscout_core::{
    AppConfig, FileStorage, FilterState, Intent, PriceRange, QuickFilter, Session, SortKey,
};
use clap::Args;

use crate::{catalog, output};

#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Case-insensitive search over name, roaster and origin
    #[arg(long)]
    pub search: Option<String>,

    /// Keep only these roast levels (repeatable)
    #[arg(long = "roast")]
    pub roasts: Vec<String>,

    /// Keep only these origins (repeatable)
    #[arg(long = "origin")]
    pub origins: Vec<String>,

    /// Keep only these flavor notes (repeatable)
    #[arg(long = "flavor")]
    pub flavors: Vec<String>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    /// score, price or name
    #[arg(long, default_value = "score")]
    pub sort: SortKey,

    /// all, deals, budget or premium
    #[arg(long, default_value = "all")]
    pub quick: QuickFilter,
}

impl BrowseArgs {
    /// Intents equivalent to the flags, in the order a user would click them.
    ///
    /// A bound not given defaults to `catalog_range`, stretched to meet the
    /// given bound when that one lies outside the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if both bounds are given and inverted.
    pub(crate) fn intents(&self, catalog_range: PriceRange) -> anyhow::Result<Vec<Intent>> {
        let mut intents = Vec::new();
        let bounds = match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => Some((min, max)),
            (Some(min), None) => Some((min, catalog_range.max().max(min))),
            (None, Some(max)) => Some((catalog_range.min().min(max), max)),
            (None, None) => None,
        };
        if let Some((min, max)) = bounds {
            intents.push(Intent::SetPriceRange(PriceRange::new(min, max)?));
        }
        intents.extend(self.roasts.iter().cloned().map(Intent::ToggleRoast));
        intents.extend(self.origins.iter().cloned().map(Intent::ToggleOrigin));
        intents.extend(self.flavors.iter().cloned().map(Intent::ToggleFlavor));
        if let Some(search) = &self.search {
            intents.push(Intent::SetSearch(search.clone()));
        }
        intents.push(Intent::SetSort(self.sort));
        intents.push(Intent::SetQuickFilter(self.quick));
        Ok(intents)
    }
}

/// Fetches the catalog, applies the flags and prints the grid.
///
/// A fetch failure prints the error and an empty grid; it does not fail the command.
///
/// # Errors
///
/// Returns an error if the catalog cannot be resolved or the price bounds are inverted.
pub(crate) async fn run_browse(
    config: &AppConfig,
    catalog_slug: Option<&str>,
    args: &BrowseArgs,
) -> anyhow::Result<()> {
    let source = catalog::open_source(config, catalog_slug)?;
    let mut session = Session::start(
        FileStorage::new(&config.wishlist_path),
        FilterState::default(),
    );
    catalog::fetch_into(&mut session, &source).await;

    let catalog_range = session
        .state()
        .catalog
        .as_ref()
        .map_or_else(PriceRange::unbounded, |c| PriceRange::covering(&c.products));
    for intent in args.intents(catalog_range)? {
        session.dispatch(intent);
    }

    let state = session.state();
    if let Some(notice) = &state.notice {
        eprintln!("error: {notice}");
    }

    let products = state.view();
    if products.is_empty() {
        println!("No coffee found");
        return Ok(());
    }

    println!("{}", output::header_row());
    for product in &products {
        println!("{}", output::product_row(product, state.selection.is_wishlisted(&product.id)));
    }
    if let Some(catalog) = &state.catalog {
        println!(
            "\n{} of {} coffees, updated {}",
            products.len(),
            catalog.products.len(),
            catalog.fetched_at.format("%Y-%m-%d %H:%M UTC")
        );
    }
    Ok(())
}
