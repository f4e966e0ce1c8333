use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

pub type WatchCallback = Arc<dyn Fn() + Send + Sync>;

/// Registers one watch-cycle job per cron spec and starts the scheduler.
/// Overlapping runs are not coordinated; each cycle owns its own state.
pub async fn configure_watch_jobs(
    cron_specs: &[String],
    callback: WatchCallback,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;
    for spec in cron_specs {
        let label = spec.clone();
        let cb = callback.clone();
        let job = Job::new_async(spec.as_str(), move |_id, _lock| {
            let cb = cb.clone();
            let cron = label.clone();
            Box::pin(async move {
                tracing::info!(target: "scheduler", %cron, "watch cycle triggered");
                cb();
            })
        })?;
        scheduler.add(job).await?;
    }
    scheduler.start().await?;
    tracing::info!(target: "scheduler", jobs = cron_specs.len(), "watch schedule started");
    Ok(scheduler)
}
