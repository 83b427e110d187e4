use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub catalogs_path: PathBuf,
    /// Slug of the catalog to serve. `None` selects the first catalog in the file.
    pub catalog: Option<String>,
    pub catalog_ttl_secs: u64,
    pub wishlist_path: PathBuf,
    pub feed_request_timeout_secs: u64,
    pub feed_user_agent: String,
    pub feed_max_retries: u32,
    pub feed_retry_backoff_base_secs: u64,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("catalogs_path", &self.catalogs_path)
            .field("catalog", &self.catalog)
            .field("catalog_ttl_secs", &self.catalog_ttl_secs)
            .field("wishlist_path", &self.wishlist_path)
            .field(
                "feed_request_timeout_secs",
                &self.feed_request_timeout_secs,
            )
            .field("feed_user_agent", &self.feed_user_agent)
            .field("feed_max_retries", &self.feed_max_retries)
            .field(
                "feed_retry_backoff_base_secs",
                &self.feed_retry_backoff_base_secs,
            )
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}

impl Default for AppConfig {
    /// The configuration produced when no `BEANSCOUT_*` variable is set.
    fn default() -> Self {
        Self {
            env: Environment::Development,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: "info".to_string(),
            catalogs_path: PathBuf::from("./config/catalogs.yaml"),
            catalog: None,
            catalog_ttl_secs: 3600,
            wishlist_path: PathBuf::from("./.beanscout/wishlist.json"),
            feed_request_timeout_secs: 30,
            feed_user_agent: "beanscout/0.1 (catalog-browser)".to_string(),
            feed_max_retries: 3,
            feed_retry_backoff_base_secs: 2,
            rate_limit_per_minute: 120,
        }
    }
}
