//! Background job scheduler.
//!
//! Registers the recurring pipeline run at server startup.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::state::AppState;

/// Builds and starts the scheduler with one pipeline job on `schedule`.
///
/// The returned [`JobScheduler`] must be kept alive for the lifetime of the
/// process. Dropping it stops the job.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if `schedule` is not a valid cron
/// expression or the scheduler cannot be started.
pub async fn build_scheduler(
    schedule: &str,
    state: AppState,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_pipeline_job(&scheduler, schedule, state).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_pipeline_job(
    scheduler: &JobScheduler,
    schedule: &str,
    state: AppState,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            tracing::info!("scheduler: starting pipeline run");
            let outcome = state.run_once("schedule").await;
            tracing::info!(
                status = %outcome.status,
                match_count = outcome.match_count,
                "scheduler: pipeline run complete"
            );
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(schedule, "scheduler: registered pipeline job");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::test_state;

    #[tokio::test]
    async fn rejects_invalid_cron_expression() {
        let result = build_scheduler("every hour please", test_state(Arc::default())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn accepts_hourly_schedule() {
        let mut scheduler = build_scheduler("0 0 * * * *", test_state(Arc::default()))
            .await
            .expect("scheduler");
        scheduler.shutdown().await.expect("shutdown");
    }
}
