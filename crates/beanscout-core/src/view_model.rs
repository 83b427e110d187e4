//! Filter, search, and sort composition over scored products.
//!
//! Every predicate is independent and the result is their conjunction. Set
//! predicates pass when their set is empty or the product lacks the field;
//! the price range always applies. Sorting happens after filtering and is
//! stable, so equal keys keep catalog order.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::products::{Product, ScoredProduct};
use crate::score::{score_product, ScoreBaseline};
use crate::CoreError;

/// Score above which the "deals" quick filter keeps a product.
pub const DEAL_SCORE_THRESHOLD: u8 = 75;
/// Highest price the "budget" quick filter keeps.
pub const BUDGET_MAX_PRICE: f64 = 20.0;
/// Price the "premium" quick filter must exceed.
pub const PREMIUM_MIN_PRICE: f64 = 25.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Descending score.
    #[default]
    Score,
    /// Ascending price.
    Price,
    /// Ascending name.
    Name,
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score" => Ok(Self::Score),
            "price" => Ok(Self::Price),
            "name" => Ok(Self::Name),
            other => Err(CoreError::UnknownSortKey(other.to_string())),
        }
    }
}

/// Category chips shown above the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickFilter {
    #[default]
    All,
    Deals,
    Budget,
    Premium,
}

impl QuickFilter {
    pub const ALL: [QuickFilter; 4] = [Self::All, Self::Deals, Self::Budget, Self::Premium];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Deals => "Best Deals",
            Self::Budget => "Budget",
            Self::Premium => "Premium",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Deals => "deals",
            Self::Budget => "budget",
            Self::Premium => "premium",
        }
    }

    fn accepts(self, product: &ScoredProduct) -> bool {
        match self {
            Self::All => true,
            Self::Deals => product.ai_score > DEAL_SCORE_THRESHOLD,
            Self::Budget => product.price <= BUDGET_MAX_PRICE,
            Self::Premium => product.price > PREMIUM_MIN_PRICE,
        }
    }
}

impl FromStr for QuickFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "deals" => Ok(Self::Deals),
            "budget" => Ok(Self::Budget),
            "premium" => Ok(Self::Premium),
            other => Err(CoreError::UnknownQuickFilter(other.to_string())),
        }
    }
}

/// Inclusive price interval. Always concrete; there is no "unset" range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPriceRange`] if `min > max` or either bound is NaN.
    pub fn new(min: f64, max: f64) -> Result<Self, CoreError> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(CoreError::InvalidPriceRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// `[0, +inf]`, accepting every non-negative price.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }

    /// The tightest range containing every product's price.
    ///
    /// Falls back to [`PriceRange::unbounded`] for an empty catalog.
    #[must_use]
    pub fn covering(products: &[Product]) -> Self {
        let mut prices = products.iter().map(|p| p.price).filter(|p| !p.is_nan());
        let Some(first) = prices.next() else {
            return Self::unbounded();
        };
        let (min, max) = prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Self { min, max }
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Ephemeral browse filters for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub price_range: PriceRange,
    pub roast_levels: BTreeSet<String>,
    pub origins: BTreeSet<String>,
    pub flavor_profiles: BTreeSet<String>,
    pub search: String,
    pub sort: SortKey,
    pub quick: QuickFilter,
}

impl FilterState {
    /// Returns `true` if `product` passes every active predicate.
    #[must_use]
    pub fn accepts(&self, product: &ScoredProduct) -> bool {
        self.price_range.contains(product.price)
            && self.accepts_roast(product)
            && self.accepts_origin(product)
            && self.accepts_flavor(product)
            && self.accepts_search(product)
            && self.quick.accepts(product)
    }

    fn accepts_roast(&self, product: &Product) -> bool {
        if self.roast_levels.is_empty() {
            return true;
        }
        product
            .roast_level
            .as_ref()
            .is_none_or(|roast| self.roast_levels.contains(roast))
    }

    fn accepts_origin(&self, product: &Product) -> bool {
        if self.origins.is_empty() || product.origin.is_none() {
            return true;
        }
        product.origins().any(|o| self.origins.contains(o))
    }

    fn accepts_flavor(&self, product: &Product) -> bool {
        match &product.flavor_notes {
            Some(notes) if !self.flavor_profiles.is_empty() => {
                notes.iter().any(|n| self.flavor_profiles.contains(n))
            }
            _ => true,
        }
    }

    fn accepts_search(&self, product: &Product) -> bool {
        let term = self.search.trim();
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        product.name.to_lowercase().contains(&term)
            || product.roaster.to_lowercase().contains(&term)
            || product
                .origin
                .as_ref()
                .is_some_and(|o| o.to_lowercase().contains(&term))
    }

    /// Flips membership of `value` in `set`.
    pub fn toggle(set: &mut BTreeSet<String>, value: &str) {
        if !set.remove(value) {
            set.insert(value.to_string());
        }
    }
}

/// Filters and orders already-scored products.
#[must_use]
pub fn filter_and_sort(products: &[ScoredProduct], filters: &FilterState) -> Vec<ScoredProduct> {
    let mut view: Vec<ScoredProduct> = products
        .iter()
        .filter(|p| filters.accepts(p))
        .cloned()
        .collect();

    // `sort_by` is stable: ties keep input order across rebuilds.
    match filters.sort {
        SortKey::Score => view.sort_by(|a, b| b.ai_score.cmp(&a.ai_score)),
        SortKey::Price => view.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::Name => view.sort_by(|a, b| a.name.cmp(&b.name)),
    }
    view
}

/// Scores `products` against `baseline`, then filters and sorts them.
#[must_use]
pub fn build_view(
    products: &[Product],
    baseline: ScoreBaseline,
    filters: &FilterState,
) -> Vec<ScoredProduct> {
    let scored: Vec<ScoredProduct> = products
        .iter()
        .map(|p| score_product(p.clone(), baseline))
        .collect();
    filter_and_sort(&scored, filters)
}

/// Distinct values available for each filter control, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetOptions {
    pub roast_levels: Vec<String>,
    pub origins: Vec<String>,
    pub flavor_notes: Vec<String>,
    pub price_range: PriceRange,
}

impl FacetOptions {
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let mut roast_levels = Vec::new();
        let mut origins = Vec::new();
        let mut flavor_notes = Vec::new();

        for product in products {
            if let Some(roast) = &product.roast_level {
                push_unique(&mut roast_levels, roast);
            }
            for origin in product.origins() {
                push_unique(&mut origins, origin);
            }
            for note in product.flavor_notes() {
                push_unique(&mut flavor_notes, note);
            }
        }

        Self {
            roast_levels,
            origins,
            flavor_notes,
            price_range: PriceRange::covering(products),
        }
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

#[cfg(test)]
#[path = "view_model_test.rs"]
mod tests;
