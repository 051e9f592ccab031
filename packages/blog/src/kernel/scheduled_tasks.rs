//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (PUBLISH_SCHEDULE, every minute by default)
//!     │
//!     └─► run_scheduled_publication()
//!             └─► find due posts → publish each → PublicationReport
//! ```
//!
//! A tick that fires while the previous one is still running is skipped.
//! This only covers one process; running several workers against the same
//! database relies on the idempotent publish.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::blogs::activities::run_scheduled_publication;
use crate::kernel::BlogDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(deps: BlogDeps, schedule: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let running = Arc::new(Mutex::new(()));
    let publish_job = Job::new_async(schedule, move |_uuid, _lock| {
        let deps = deps.clone();
        let running = running.clone();
        Box::pin(async move {
            let Ok(_guard) = running.try_lock() else {
                tracing::warn!("Previous scheduled publication still running, skipping tick");
                return;
            };

            let report = run_scheduled_publication(&deps).await;
            if let Some(e) = &report.scan_error {
                tracing::error!("Scheduled publication task failed: {}", e);
            } else if !report.failures.is_empty() {
                tracing::warn!(
                    failed = report.failures.len(),
                    "Scheduled publication finished with failures"
                );
            }
        })
    })?;

    scheduler.add(publish_job).await?;
    scheduler.start().await?;

    tracing::info!(schedule, "Scheduled tasks started (scheduled post publication)");
    Ok(scheduler)
}
