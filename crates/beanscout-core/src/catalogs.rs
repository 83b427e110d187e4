use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::products::Product;
use crate::score::ScoreBaseline;
use crate::ConfigError;

/// Default number of feed items kept from a remote catalog.
pub const DEFAULT_FEED_LIMIT: usize = 20;

fn default_feed_limit() -> usize {
    DEFAULT_FEED_LIMIT
}

/// Where a catalog's products come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceDefinition {
    /// Fixed in-memory product list with stable ids.
    Static { products: Vec<Product> },
    /// Third-party JSON feed, normalized at fetch time.
    Remote {
        url: String,
        #[serde(default = "default_feed_limit")]
        limit: usize,
        /// Seed for the synthesized price and rating draws. The same seed and
        /// feed always produce the same catalog.
        #[serde(default)]
        pricing_seed: u64,
    },
}

impl SourceDefinition {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SourceDefinition::Static { .. } => "static",
            SourceDefinition::Remote { .. } => "remote",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDefinition {
    pub name: String,
    pub baseline_price_per_oz: f64,
    pub source: SourceDefinition,
}

impl CatalogDefinition {
    /// Generate a URL-safe slug from the catalog name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the configured baseline is not positive.
    pub fn baseline(&self) -> Result<ScoreBaseline, ConfigError> {
        ScoreBaseline::new(self.baseline_price_per_oz).map_err(|e| {
            ConfigError::Validation(format!("catalog '{}': {e}", self.name))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogsFile {
    pub catalogs: Vec<CatalogDefinition>,
}

impl CatalogsFile {
    /// Picks the catalog with `slug`, or the first one when `slug` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if no catalog matches.
    pub fn select(&self, slug: Option<&str>) -> Result<&CatalogDefinition, ConfigError> {
        match slug {
            Some(slug) => self
                .catalogs
                .iter()
                .find(|c| c.slug() == slug)
                .ok_or_else(|| ConfigError::Validation(format!("unknown catalog '{slug}'"))),
            None => self
                .catalogs
                .first()
                .ok_or_else(|| ConfigError::Validation("no catalogs configured".to_string())),
        }
    }
}

/// Load and validate catalog definitions from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalogs(path: &Path) -> Result<CatalogsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_catalogs(&content)
}

/// Parse and validate catalog definitions from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text cannot be parsed or fails validation.
pub fn parse_catalogs(content: &str) -> Result<CatalogsFile, ConfigError> {
    let file: CatalogsFile =
        serde_yaml::from_str(content).map_err(ConfigError::CatalogsFileParse)?;
    validate_catalogs(&file)?;
    Ok(file)
}

fn validate_catalogs(file: &CatalogsFile) -> Result<(), ConfigError> {
    if file.catalogs.is_empty() {
        return Err(ConfigError::Validation(
            "at least one catalog must be configured".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for catalog in &file.catalogs {
        if catalog.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "catalog name must be non-empty".to_string(),
            ));
        }
        if !seen_names.insert(catalog.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate catalog name: '{}'",
                catalog.name
            )));
        }
        let slug = catalog.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate catalog slug: '{}' (from catalog '{}')",
                slug, catalog.name
            )));
        }

        catalog.baseline()?;

        match &catalog.source {
            SourceDefinition::Static { products } => validate_products(&catalog.name, products)?,
            SourceDefinition::Remote { url, limit, .. } => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::Validation(format!(
                        "catalog '{}' has invalid feed url '{url}'",
                        catalog.name
                    )));
                }
                if *limit == 0 {
                    return Err(ConfigError::Validation(format!(
                        "catalog '{}' feed limit must be greater than zero",
                        catalog.name
                    )));
                }
            }
        }
    }

    Ok(())
}

fn validate_products(catalog: &str, products: &[Product]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for product in products {
        let fail = |reason: &str| {
            ConfigError::Validation(format!(
                "catalog '{catalog}' product '{}': {reason}",
                product.id
            ))
        };

        if product.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "catalog '{catalog}' has a product with an empty id"
            )));
        }
        if !seen_ids.insert(product.id.as_str()) {
            return Err(fail("duplicate id"));
        }
        if product.name.trim().is_empty() || product.roaster.trim().is_empty() {
            return Err(fail("name and roaster must be non-empty"));
        }
        if !(product.price.is_finite() && product.price > 0.0) {
            return Err(fail("price must be positive"));
        }
        if !(product.price_per_oz.is_finite() && product.price_per_oz > 0.0) {
            return Err(fail("pricePerOz must be positive"));
        }
        if let Some(rating) = product.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(fail("rating must be between 0 and 5"));
            }
        }
    }

    Ok(())
}
