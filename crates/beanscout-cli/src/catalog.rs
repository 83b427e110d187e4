//! Catalog selection and fetching shared by the CLI commands.

use anyhow::Context;
use beanscout_catalog::CatalogSource;
use beanscout_core::{load_catalogs, AppConfig, Intent, Session, WishlistStorage};

use crate::output;

/// Resolves the catalog named by `slug` (or the first configured one) into a source.
///
/// # Errors
///
/// Returns an error if the catalogs file cannot be loaded, the slug is
/// unknown, or the feed client cannot be built.
pub(crate) fn open_source(config: &AppConfig, slug: Option<&str>) -> anyhow::Result<CatalogSource> {
    let catalogs = load_catalogs(&config.catalogs_path).with_context(|| {
        format!(
            "loading catalogs from {}",
            config.catalogs_path.display()
        )
    })?;
    let definition = catalogs.select(slug)?;
    tracing::debug!(catalog = %definition.name, kind = definition.source.kind(), "catalog selected");
    Ok(CatalogSource::from_definition(definition, config)?)
}

/// Runs one fetch cycle through the session.
///
/// A failed fetch is not an error here: the session keeps its previous
/// catalog (none, on a cold start) and carries a notice instead.
pub(crate) async fn fetch_into<S: WishlistStorage>(session: &mut Session<S>, source: &CatalogSource) {
    session.dispatch(Intent::BeginFetch);
    let Some(seq) = session.state().pending_fetch() else {
        return;
    };

    match source.fetch_catalog().await {
        Ok(catalog) => {
            session.dispatch(Intent::FetchSucceeded { seq, catalog });
        }
        Err(e) => {
            tracing::error!(error = %e, "catalog fetch failed");
            session.dispatch(Intent::FetchFailed {
                seq,
                message: e.to_string(),
            });
        }
    }
}

/// Prints every configured catalog; the active one is marked with `*`.
///
/// # Errors
///
/// Returns an error if the catalogs file cannot be loaded.
pub(crate) fn run_catalogs(config: &AppConfig, active: Option<&str>) -> anyhow::Result<()> {
    let catalogs = load_catalogs(&config.catalogs_path)?;
    let active_slug = catalogs.select(active).map(beanscout_core::CatalogDefinition::slug).ok();

    for definition in &catalogs.catalogs {
        let slug = definition.slug();
        let marker = active_slug.as_deref() == Some(slug.as_str());
        println!("{}", output::catalog_line(definition, marker));
    }
    Ok(())
}
