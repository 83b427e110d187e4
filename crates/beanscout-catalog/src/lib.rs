pub mod client;
pub mod error;
pub mod normalize;
mod retry;
pub mod source;
pub mod types;

pub use client::FeedClient;
pub use error::CatalogError;
pub use normalize::{normalize_feed, normalize_item};
pub use source::CatalogSource;
pub use types::FeedItem;
