//! Deterministic "AI score" heuristic.
//!
//! The score is a fixed linear formula over price efficiency and rating, not a
//! learned model:
//!
//! 1. `price_score = max(0, 100 - ((price_per_oz - baseline) / baseline) * 50)`
//! 2. `score = price_score * 0.5`
//! 3. plus `(rating / 5) * 50` when rated, otherwise a neutral `25`
//! 4. rounded, then clamped to `0..=100`
//!
//! Step 1 has no upper clamp, so a very cheap product can carry a price term
//! above 50 before the final clamp applies.

use serde::{Deserialize, Serialize};

use crate::products::{Product, ScoredProduct};
use crate::CoreError;

/// Rating credit awarded to unrated products.
pub const NEUTRAL_RATING_CREDIT: f64 = 25.0;

const PRICE_WEIGHT: f64 = 0.5;
const RATING_WEIGHT: f64 = 50.0;
const MAX_RATING: f64 = 5.0;

/// Reference price-per-ounce a catalog's products are compared against.
///
/// Calibrated per catalog to that catalog's price distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ScoreBaseline(f64);

impl ScoreBaseline {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBaseline`] unless `value` is finite and positive.
    pub fn new(value: f64) -> Result<Self, CoreError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidBaseline(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ScoreBaseline {
    type Error = CoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ScoreBaseline> for f64 {
    fn from(baseline: ScoreBaseline) -> Self {
        baseline.0
    }
}

/// Price-efficiency term: 100 at the baseline, higher when cheaper, floored at 0.
#[must_use]
pub fn price_score(price_per_oz: f64, baseline: ScoreBaseline) -> f64 {
    let b = baseline.value();
    (100.0 - ((price_per_oz - b) / b) * 50.0).max(0.0)
}

/// Rating term: `(rating / 5) * 50`, or [`NEUTRAL_RATING_CREDIT`] when unrated.
#[must_use]
pub fn rating_credit(rating: Option<f64>) -> f64 {
    match rating {
        Some(r) => (r / MAX_RATING) * RATING_WEIGHT,
        None => NEUTRAL_RATING_CREDIT,
    }
}

/// Computes the 0–100 score for `product` against `baseline`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn ai_score(product: &Product, baseline: ScoreBaseline) -> u8 {
    let raw = price_score(product.price_per_oz, baseline) * PRICE_WEIGHT
        + rating_credit(product.rating);
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Attaches the score and its label to `product`.
#[must_use]
pub fn score_product(product: Product, baseline: ScoreBaseline) -> ScoredProduct {
    let ai_score = ai_score(&product, baseline);
    ScoredProduct {
        product,
        ai_score,
        recommendation: Recommendation::from_score(ai_score),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Excellent Deal")]
    ExcellentDeal,
    #[serde(rename = "Good Value")]
    GoodValue,
    #[serde(rename = "Premium Choice")]
    PremiumChoice,
}

impl Recommendation {
    /// `> 75` is an excellent deal, `61..=75` good value, anything else premium.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            76.. => Self::ExcellentDeal,
            61..=75 => Self::GoodValue,
            _ => Self::PremiumChoice,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ExcellentDeal => "Excellent Deal",
            Self::GoodValue => "Good Value",
            Self::PremiumChoice => "Premium Choice",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Colour tier of the score badge drawn on product cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBadge {
    High,
    Mid,
    Low,
}

impl ScoreBadge {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::High,
            75..=89 => Self::Mid,
            _ => Self::Low,
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::High => "badge-high",
            Self::Mid => "badge-mid",
            Self::Low => "badge-low",
        }
    }
}
