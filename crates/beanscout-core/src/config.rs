use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("BEANSCOUT_ENV", "development"))?;

    let bind_addr = parse_addr("BEANSCOUT_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("BEANSCOUT_LOG_LEVEL", "info");
    let catalogs_path = PathBuf::from(or_default(
        "BEANSCOUT_CATALOGS_PATH",
        "./config/catalogs.yaml",
    ));
    let catalog = lookup("BEANSCOUT_CATALOG")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let catalog_ttl_secs = parse_u64("BEANSCOUT_CATALOG_TTL_SECS", "3600")?;
    let wishlist_path = PathBuf::from(or_default(
        "BEANSCOUT_WISHLIST_PATH",
        "./.beanscout/wishlist.json",
    ));

    let feed_request_timeout_secs = parse_u64("BEANSCOUT_FEED_REQUEST_TIMEOUT_SECS", "30")?;
    let feed_user_agent = or_default(
        "BEANSCOUT_FEED_USER_AGENT",
        "beanscout/0.1 (catalog-browser)",
    );
    let feed_max_retries = parse_u32("BEANSCOUT_FEED_MAX_RETRIES", "3")?;
    let feed_retry_backoff_base_secs = parse_u64("BEANSCOUT_FEED_RETRY_BACKOFF_BASE_SECS", "2")?;

    let rate_limit_per_minute = parse_usize("BEANSCOUT_RATE_LIMIT_PER_MINUTE", "120")?;
    if rate_limit_per_minute == 0 {
        return Err(invalid(
            "BEANSCOUT_RATE_LIMIT_PER_MINUTE",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalogs_path,
        catalog,
        catalog_ttl_secs,
        wishlist_path,
        feed_request_timeout_secs,
        feed_user_agent,
        feed_max_retries,
        feed_retry_backoff_base_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::Validation(format!(
            "unknown BEANSCOUT_ENV '{other}'; expected development, test, or production"
        ))),
    }
}
