//! Raw item shape of third-party coffee feeds.
//!
//! Feeds such as `api.sampleapis.com/coffee/hot` return a bare JSON array of
//! drink records. Every field is optional here: the feed is not under our
//! control and normalization fills anything missing. `id` is numeric in the
//! observed feed but strings are accepted too.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedItem {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roaster: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    /// Used as flavor notes when present.
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl FeedItem {
    /// The feed id as a string, if it is a non-empty string or a number.
    #[must_use]
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
