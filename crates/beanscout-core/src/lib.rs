pub mod app_config;
pub mod catalogs;
pub mod config;
pub mod products;
pub mod score;
pub mod selection;
pub mod session;
pub mod storage;
pub mod view_model;

pub use app_config::{AppConfig, Environment};
pub use catalogs::{load_catalogs, CatalogDefinition, CatalogsFile, SourceDefinition};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{CatalogSnapshot, Product, ScoredProduct, SharePayload};
pub use score::{ai_score, score_product, Recommendation, ScoreBadge, ScoreBaseline};
pub use selection::{SelectionState, Toggle, COMPARISON_CAPACITY};
pub use session::{BrowseSession, Effect, Intent, Notice, Session};
pub use storage::{FileStorage, MemoryStorage, StorageError, WishlistStorage};
pub use view_model::{build_view, FacetOptions, FilterState, PriceRange, QuickFilter, SortKey};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalogs file {path}: {source}")]
    CatalogsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalogs file: {0}")]
    CatalogsFileParse(#[source] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid score baseline {0}: must be finite and greater than zero")]
    InvalidBaseline(f64),

    #[error("invalid price range [{min}, {max}]")]
    InvalidPriceRange { min: f64, max: f64 },

    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("unknown quick filter: {0}")]
    UnknownQuickFilter(String),
}
