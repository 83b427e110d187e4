//! Normalization from raw feed items to [`beanscout_core::Product`].
//!
//! Coffee feeds carry names and descriptions but no retail data, so price and
//! rating are synthesized and the remaining catalog fields fall back to
//! index-cycled defaults. The synthesized draws come from an RNG seeded with
//! the catalog's `pricing_seed` and the item index: the same feed always
//! normalizes to the same catalog.

use beanscout_core::Product;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::CatalogError;
use crate::types::FeedItem;

const DEFAULT_NAME: &str = "Specialty Coffee";
const DEFAULT_DESCRIPTION: &str = "Premium specialty coffee with unique flavor profile";
const WEIGHT: &str = "12oz";
const WEIGHT_OZ: f64 = 12.0;

const ORIGINS: [&str; 5] = ["Ethiopia", "Colombia", "Brazil", "Guatemala", "Kenya"];
const ROAST_LEVELS: [&str; 4] = ["Light", "Medium", "Medium-Dark", "Dark"];
const FLAVOR_NOTES: [&str; 5] = ["Chocolate", "Nutty", "Fruity", "Caramel", "Citrus"];

const PRICE_FLOOR: f64 = 15.0;
const PRICE_SPREAD: f64 = 15.0;
const RATING_FLOOR: f64 = 3.5;
const RATING_SPREAD: f64 = 1.5;

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

/// An absolute http(s) URL, re-serialized so quotes and spaces come out
/// percent-encoded. Other schemes and unparseable values are dropped.
fn web_url(value: Option<&String>) -> Option<String> {
    let parsed = reqwest::Url::parse(non_empty(value)?.trim()).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| parsed.into())
}

/// RNG for the item at `index`; independent of every other item.
fn item_rng(pricing_seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(pricing_seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Normalizes the feed item at `index` into a [`Product`].
#[must_use]
pub fn normalize_item(index: usize, item: &FeedItem, pricing_seed: u64) -> Product {
    let mut rng = item_rng(pricing_seed, index);
    let price_draw: f64 = rng.random();
    let rating_draw: f64 = rng.random();

    let price = PRICE_FLOOR + price_draw * PRICE_SPREAD;

    let roaster = non_empty(item.roaster.as_ref()).map_or_else(
        || {
            #[allow(clippy::cast_possible_truncation)]
            let letter = char::from(b'A' + (index % 26) as u8);
            format!("Roaster {letter}")
        },
        str::to_owned,
    );

    let flavor_notes = match &item.ingredients {
        Some(notes) if !notes.is_empty() => notes.clone(),
        _ => FLAVOR_NOTES[..2 + index % 2]
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
    };

    Product {
        id: item
            .id_string()
            .unwrap_or_else(|| format!("coffee-{index}")),
        name: non_empty(item.title.as_ref())
            .or_else(|| non_empty(item.name.as_ref()))
            .unwrap_or(DEFAULT_NAME)
            .to_owned(),
        roaster,
        price: round_to(price, 2),
        weight: WEIGHT.to_owned(),
        price_per_oz: round_to(price / WEIGHT_OZ, 2),
        description: non_empty(item.description.as_ref())
            .unwrap_or(DEFAULT_DESCRIPTION)
            .to_owned(),
        origin: Some(
            non_empty(item.origin.as_ref())
                .unwrap_or(ORIGINS[index % ORIGINS.len()])
                .to_owned(),
        ),
        roast_level: Some(ROAST_LEVELS[index % ROAST_LEVELS.len()].to_owned()),
        flavor_notes: Some(flavor_notes),
        link: web_url(item.url.as_ref())
            .unwrap_or_else(|| format!("https://example.com/coffee/{index}")),
        image_url: web_url(item.image.as_ref()),
        rating: Some(round_to(RATING_FLOOR + rating_draw * RATING_SPREAD, 1)),
    }
}

/// Decodes one raw feed record.
///
/// # Errors
///
/// Returns [`CatalogError::Normalization`] if the record is not an object of
/// the expected shape.
pub fn decode_item(index: usize, raw: serde_json::Value) -> Result<FeedItem, CatalogError> {
    serde_json::from_value(raw).map_err(|e| CatalogError::Normalization {
        index,
        reason: e.to_string(),
    })
}

/// Keeps the first `limit` feed records and normalizes each one.
///
/// Records that fail to decode are skipped with a warning. Duplicate feed ids
/// are suffixed with their index so ids stay unique within the catalog.
#[must_use]
pub fn normalize_feed(raw: Vec<serde_json::Value>, limit: usize, pricing_seed: u64) -> Vec<Product> {
    let mut seen = std::collections::HashSet::new();
    let mut products = Vec::with_capacity(limit.min(raw.len()));

    for (index, value) in raw.into_iter().take(limit).enumerate() {
        let item = match decode_item(index, value) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed feed item");
                continue;
            }
        };

        let mut product = normalize_item(index, &item, pricing_seed);
        if !seen.insert(product.id.clone()) {
            product.id = format!("{}-{index}", product.id);
            seen.insert(product.id.clone());
        }
        products.push(product);
    }

    products
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
