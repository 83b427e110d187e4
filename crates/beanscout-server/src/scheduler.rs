//! Background job scheduler.
//!
//! Keeps the catalog cache warm so page loads rarely wait on the feed.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::catalog_cache::CatalogCache;

/// Top of every hour. Override with `CATALOG_REFRESH_CRON`.
const DEFAULT_REFRESH_CRON: &str = "0 0 * * * *";

/// Builds and starts the background job scheduler.
///
/// The returned handle must be kept alive for the lifetime of the process;
/// dropping it shuts down all scheduled jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, the
/// refresh job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(cache: Arc<CatalogCache>) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_refresh_job(&scheduler, cache).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_refresh_job(
    scheduler: &JobScheduler,
    cache: Arc<CatalogCache>,
) -> Result<(), JobSchedulerError> {
    let cron = std::env::var("CATALOG_REFRESH_CRON")
        .unwrap_or_else(|_| DEFAULT_REFRESH_CRON.to_string());

    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let cache = Arc::clone(&cache);
        Box::pin(async move {
            match cache.refresh().await {
                Ok(snapshot) => tracing::info!(
                    products = snapshot.products.len(),
                    "scheduler: catalog refreshed"
                ),
                Err(e) => tracing::error!(error = %e, "scheduler: catalog refresh failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = %cron, "scheduler: registered catalog refresh job");
    Ok(())
}
