//! Wishlist and comparison sets keyed by product id.
//!
//! Ids are opaque: an id that is not in the current catalog is still legal to
//! hold, it is simply filtered out when the sets are displayed.

use std::collections::BTreeSet;

use crate::products::ScoredProduct;

/// Maximum number of products in the comparison set.
pub const COMPARISON_CAPACITY: usize = 3;

/// Outcome of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
    /// Comparison set already full; nothing changed.
    Rejected,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Persisted across sessions.
    pub wishlist: BTreeSet<String>,
    /// Ephemeral, insertion-ordered, never longer than [`COMPARISON_CAPACITY`].
    comparison: Vec<String>,
}

impl SelectionState {
    #[must_use]
    pub fn with_wishlist(wishlist: BTreeSet<String>) -> Self {
        Self {
            wishlist,
            comparison: Vec::new(),
        }
    }

    pub fn toggle_wishlist(&mut self, id: &str) -> Toggle {
        if self.wishlist.remove(id) {
            Toggle::Removed
        } else {
            self.wishlist.insert(id.to_string());
            Toggle::Added
        }
    }

    /// Removal always succeeds; adding to a full set is rejected rather than
    /// evicting the oldest member.
    pub fn toggle_comparison(&mut self, id: &str) -> Toggle {
        if let Some(pos) = self.comparison.iter().position(|c| c == id) {
            self.comparison.remove(pos);
            return Toggle::Removed;
        }
        if self.comparison.len() >= COMPARISON_CAPACITY {
            return Toggle::Rejected;
        }
        self.comparison.push(id.to_string());
        Toggle::Added
    }

    #[must_use]
    pub fn comparison(&self) -> &[String] {
        &self.comparison
    }

    #[must_use]
    pub fn is_wishlisted(&self, id: &str) -> bool {
        self.wishlist.contains(id)
    }

    #[must_use]
    pub fn is_compared(&self, id: &str) -> bool {
        self.comparison.iter().any(|c| c == id)
    }

    /// Wishlisted products present in `products`, in `products` order.
    #[must_use]
    pub fn wishlisted<'a>(&self, products: &'a [ScoredProduct]) -> Vec<&'a ScoredProduct> {
        products
            .iter()
            .filter(|p| self.wishlist.contains(&p.id))
            .collect()
    }

    /// Compared products present in `products`, in the order they were added.
    #[must_use]
    pub fn compared<'a>(&self, products: &'a [ScoredProduct]) -> Vec<&'a ScoredProduct> {
        self.comparison
            .iter()
            .filter_map(|id| products.iter().find(|p| &p.id == id))
            .collect()
    }
}

/// JSON array of ids, the durable wishlist representation.
///
/// # Errors
///
/// Returns a `serde_json` error only if serialization itself fails.
pub fn encode_wishlist(wishlist: &BTreeSet<String>) -> Result<String, serde_json::Error> {
    serde_json::to_string(wishlist)
}

/// Parses stored wishlist content; `None` when it is not a JSON string array.
#[must_use]
pub fn decode_wishlist(raw: &str) -> Option<BTreeSet<String>> {
    serde_json::from_str::<Vec<String>>(raw)
        .ok()
        .map(|ids| ids.into_iter().collect())
}
