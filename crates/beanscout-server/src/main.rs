mod api;
mod catalog_cache;
mod middleware;
mod query;
mod scheduler;
mod templates;

use std::sync::Arc;
use std::time::Duration;

use beanscout_catalog::CatalogSource;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    catalog_cache::CatalogCache,
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = beanscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let catalogs = beanscout_core::load_catalogs(&config.catalogs_path)?;
    let definition = catalogs.select(config.catalog.as_deref())?;
    let source = CatalogSource::from_definition(definition, &config)?;
    tracing::info!(
        catalog = %definition.name,
        kind = definition.source.kind(),
        "catalog selected"
    );

    let cache = Arc::new(CatalogCache::new(
        source,
        Duration::from_secs(config.catalog_ttl_secs),
    ));
    // A cold start still serves pages; the fetch error surfaces as a notice.
    if let Err(e) = cache.refresh().await {
        tracing::warn!(error = %e, "initial catalog fetch failed");
    }

    let _scheduler = scheduler::build_scheduler(Arc::clone(&cache)).await?;

    let state = AppState {
        cache,
        catalog_name: definition.name.clone(),
    };
    let app = build_app(state, RateLimitState::per_minute(config.rate_limit_per_minute));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "beanscout-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
