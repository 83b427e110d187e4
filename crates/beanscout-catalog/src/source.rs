use beanscout_core::{AppConfig, CatalogDefinition, CatalogSnapshot, Product, ScoreBaseline, SourceDefinition};

use crate::client::FeedClient;
use crate::error::CatalogError;
use crate::normalize::normalize_feed;

/// Produces a fresh [`CatalogSnapshot`] on demand.
///
/// Every call is a full refresh; nothing is merged with earlier snapshots.
pub enum CatalogSource {
    Static {
        products: Vec<Product>,
        baseline: ScoreBaseline,
    },
    Remote {
        client: FeedClient,
        url: String,
        limit: usize,
        pricing_seed: u64,
        baseline: ScoreBaseline,
    },
}

impl CatalogSource {
    /// Builds the source described by `definition`, using `config` for the
    /// feed client's timeout, user agent and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Definition`] if the baseline is invalid and
    /// [`CatalogError::Http`] if the feed client cannot be constructed.
    pub fn from_definition(
        definition: &CatalogDefinition,
        config: &AppConfig,
    ) -> Result<Self, CatalogError> {
        let baseline = ScoreBaseline::new(definition.baseline_price_per_oz)?;

        match &definition.source {
            SourceDefinition::Static { products } => Ok(Self::Static {
                products: products.clone(),
                baseline,
            }),
            SourceDefinition::Remote {
                url,
                limit,
                pricing_seed,
            } => {
                let client = FeedClient::new(
                    config.feed_request_timeout_secs,
                    &config.feed_user_agent,
                    config.feed_max_retries,
                    config.feed_retry_backoff_base_secs,
                )?;
                Ok(Self::Remote {
                    client,
                    url: url.clone(),
                    limit: *limit,
                    pricing_seed: *pricing_seed,
                    baseline,
                })
            }
        }
    }

    #[must_use]
    pub fn baseline(&self) -> ScoreBaseline {
        match self {
            Self::Static { baseline, .. } | Self::Remote { baseline, .. } => *baseline,
        }
    }

    /// Fetches the full product list.
    ///
    /// # Errors
    ///
    /// Static sources never fail. Remote sources propagate [`FeedClient::fetch_items`]
    /// errors.
    pub async fn fetch_catalog(&self) -> Result<CatalogSnapshot, CatalogError> {
        match self {
            Self::Static { products, baseline } => {
                tracing::debug!(count = products.len(), "serving static catalog");
                Ok(CatalogSnapshot::new(products.clone(), *baseline))
            }
            Self::Remote {
                client,
                url,
                limit,
                pricing_seed,
                baseline,
            } => {
                let raw = client.fetch_items(url).await?;
                let fetched = raw.len();
                let products = normalize_feed(raw, *limit, *pricing_seed);
                tracing::info!(url = %url, fetched, kept = products.len(), "fetched remote catalog");
                Ok(CatalogSnapshot::new(products, *baseline))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Coffee {id}"),
            roaster: "House".to_string(),
            price,
            weight: "12oz".to_string(),
            price_per_oz: price / 12.0,
            description: String::new(),
            origin: None,
            roast_level: None,
            flavor_notes: None,
            link: format!("https://example.com/{id}"),
            image_url: None,
            rating: None,
        }
    }

    #[tokio::test]
    async fn static_source_returns_products_verbatim() {
        let products = vec![product("a", 16.0), product("b", 20.0)];
        let source = CatalogSource::Static {
            products: products.clone(),
            baseline: ScoreBaseline::new(1.7).unwrap(),
        };
        let first = source.fetch_catalog().await.unwrap();
        let second = source.fetch_catalog().await.unwrap();
        assert_eq!(first.products, products);
        assert_eq!(second.products, products);
        assert_eq!(first.baseline.value(), 1.7);
    }

    #[test]
    fn from_definition_builds_static_source() {
        let definition = CatalogDefinition {
            name: "House".to_string(),
            baseline_price_per_oz: 1.7,
            source: SourceDefinition::Static {
                products: vec![product("a", 16.0)],
            },
        };
        let source = CatalogSource::from_definition(&definition, &AppConfig::default()).unwrap();
        assert!(matches!(source, CatalogSource::Static { ref products, .. } if products.len() == 1));
        assert_eq!(source.baseline().value(), 1.7);
    }
}
