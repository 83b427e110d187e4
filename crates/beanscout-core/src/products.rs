use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::score::{Recommendation, ScoreBaseline};

/// One purchasable coffee, normalized from whichever catalog source produced it.
///
/// Field names serialize in camelCase because this shape is the wire contract
/// of `GET /api/coffee`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable for static catalogs; synthesized from the feed index for remote ones.
    pub id: String,
    pub name: String,
    pub roaster: String,
    pub price: f64,
    /// Display string such as `"12oz"`, not a machine unit.
    pub weight: String,
    /// Stored as delivered by the source, never recomputed from `price`.
    pub price_per_oz: f64,
    #[serde(default)]
    pub description: String,
    /// May hold several origins as a comma-separated list (`"Ethiopia, Kenya"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roast_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_notes: Option<Vec<String>>,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Product {
    /// Individual origin tokens split from the comma-separated `origin` field.
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.origin
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Flavor notes, or an empty slice when the source supplied none.
    #[must_use]
    pub fn flavor_notes(&self) -> &[String] {
        self.flavor_notes.as_deref().unwrap_or_default()
    }
}

/// A [`Product`] plus the fields derived by the score engine.
///
/// Derived fields are recomputed on every pass and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    pub ai_score: u8,
    pub recommendation: Recommendation,
}

impl std::ops::Deref for ScoredProduct {
    type Target = Product;

    fn deref(&self) -> &Self::Target {
        &self.product
    }
}

/// What a share action hands to the platform share mechanism, or prints as a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ScoredProduct {
    #[must_use]
    pub fn share_payload(&self) -> SharePayload {
        SharePayload {
            title: self.name.clone(),
            text: format!(
                "{} by {}: ${:.2} ({}, score {})",
                self.name,
                self.roaster,
                self.price,
                self.recommendation.label(),
                self.ai_score
            ),
            url: self.link.clone(),
        }
    }
}

/// The working set produced by one catalog fetch.
///
/// A refresh replaces the whole snapshot; nothing is merged with prior state.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub fetched_at: DateTime<Utc>,
    pub baseline: ScoreBaseline,
}

impl CatalogSnapshot {
    #[must_use]
    pub fn new(products: Vec<Product>, baseline: ScoreBaseline) -> Self {
        Self {
            products,
            fetched_at: Utc::now(),
            baseline,
        }
    }

    /// Scores every product against this snapshot's baseline, preserving order.
    #[must_use]
    pub fn scored(&self) -> Vec<ScoredProduct> {
        self.products
            .iter()
            .map(|p| crate::score::score_product(p.clone(), self.baseline))
            .collect()
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::product;
    use super::*;

    #[test]
    fn origins_splits_comma_separated_list() {
        let mut p = product("a", 18.0, 1.5);
        p.origin = Some("Ethiopia, Kenya, Uganda".to_string());
        assert_eq!(p.origins().collect::<Vec<_>>(), ["Ethiopia", "Kenya", "Uganda"]);
    }

    #[test]
    fn origins_empty_when_absent() {
        let p = product("a", 18.0, 1.5);
        assert_eq!(p.origins().count(), 0);
    }

    #[test]
    fn flavor_notes_empty_when_absent() {
        let p = product("a", 18.0, 1.5);
        assert!(p.flavor_notes().is_empty());
    }

    #[test]
    fn product_deserializes_camel_case_with_optional_fields_missing() {
        let json = r#"{
            "id": "house-1",
            "name": "Sunrise Blend",
            "roaster": "House",
            "price": 16.0,
            "weight": "12oz",
            "pricePerOz": 1.33,
            "link": "https://example.com/sunrise"
        }"#;
        let p: Product = serde_json::from_str(json).expect("deserialize");
        assert_eq!(p.price_per_oz, 1.33);
        assert!(p.origin.is_none());
        assert!(p.rating.is_none());
        assert_eq!(p.description, "");
    }

    #[test]
    fn scored_product_serializes_flat_with_derived_fields() {
        let scored = ScoredProduct {
            product: product("a", 16.0, 1.33),
            ai_score: 80,
            recommendation: Recommendation::ExcellentDeal,
        };
        let value = serde_json::to_value(&scored).expect("serialize");
        assert_eq!(value["id"], "a");
        assert_eq!(value["pricePerOz"], 1.33);
        assert_eq!(value["aiScore"], 80);
        assert_eq!(value["recommendation"], "Excellent Deal");
        assert!(value.get("imageUrl").is_none());
    }

    #[test]
    fn share_payload_links_to_the_product() {
        let scored = ScoredProduct {
            product: product("a", 16.0, 1.33),
            ai_score: 80,
            recommendation: Recommendation::ExcellentDeal,
        };
        let share = scored.share_payload();
        assert_eq!(share.title, "Coffee a");
        assert_eq!(share.url, "https://example.com/coffee/a");
        assert_eq!(share.text, "Coffee a by Test Roaster: $16.00 (Excellent Deal, score 80)");
    }

    #[test]
    fn snapshot_find_by_id() {
        let snapshot = CatalogSnapshot::new(
            vec![product("a", 16.0, 1.33), product("b", 20.0, 1.67)],
            ScoreBaseline::new(1.70).unwrap(),
        );
        assert_eq!(snapshot.find("b").map(|p| p.price), Some(20.0));
        assert!(snapshot.find("zzz").is_none());
    }
}
