//! Pipeline orchestration.

use std::sync::Arc;

use showwatch_core::{match_shows, AliasTable, MatchResult, ReportFormatter};
use showwatch_notify::NotificationChannel;
use tracing::Instrument;
use uuid::Uuid;

use crate::outcome::RunOutcome;
use crate::seen::{match_key, NotifiedStore};
use crate::source::ShowSource;

/// One configured match-and-report pipeline.
///
/// Holds no state between runs other than what an optional
/// [`NotifiedStore`] persists. Concurrent calls to [`Pipeline::run`] are not
/// coordinated and may each send a report for the same matches.
pub struct Pipeline {
    source: Arc<dyn ShowSource>,
    channel: Arc<dyn NotificationChannel>,
    aliases: AliasTable,
    formatter: ReportFormatter,
    seen: Option<Arc<dyn NotifiedStore>>,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        source: Arc<dyn ShowSource>,
        channel: Arc<dyn NotificationChannel>,
        aliases: AliasTable,
        formatter: ReportFormatter,
    ) -> Self {
        Self {
            source,
            channel,
            aliases,
            formatter,
            seen: None,
        }
    }

    /// Only report matches not already recorded in `store`.
    #[must_use]
    pub fn with_seen_store(mut self, store: Arc<dyn NotifiedStore>) -> Self {
        self.seen = Some(store);
        self
    }

    #[must_use]
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Run the pipeline once.
    ///
    /// 1. Fetch the listing. A fetch error ends the run as `Failure`.
    /// 2. Match shows against the alias table.
    /// 3. Drop already-notified matches when a seen-store is configured.
    /// 4. No matches: end as `NoMatches` without touching the channel.
    /// 5. Format the report. A format error ends the run as `Failure`.
    /// 6. Send and map the receipt to `Success` or `Failure`.
    ///
    /// Never fails: every error is reported through the returned outcome.
    pub async fn run(&self) -> RunOutcome {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline_run", %run_id);
        let outcome = self.execute(run_id).instrument(span.clone()).await;

        span.in_scope(|| {
            if outcome.is_failure() {
                tracing::error!(
                    status = %outcome.status,
                    match_count = outcome.match_count,
                    error = outcome.error_detail.as_deref().unwrap_or_default(),
                    "run finished"
                );
            } else {
                tracing::info!(
                    status = %outcome.status,
                    match_count = outcome.match_count,
                    "run finished"
                );
            }
        });

        outcome
    }

    async fn execute(&self, run_id: Uuid) -> RunOutcome {
        tracing::info!("fetching show listing");
        let shows = match self.source.fetch_shows().await {
            Ok(shows) => shows,
            Err(e) => {
                tracing::error!(error = %e, "show listing fetch failed");
                return RunOutcome::failure(run_id, 0, format!("fetch failed: {e}"));
            }
        };

        tracing::info!(show_count = shows.len(), "matching artists");
        let matches = match_shows(&shows, &self.aliases);

        let matched = matches.len();
        let matches = match self.filter_already_notified(matches).await {
            Ok(m) => m,
            Err(detail) => return RunOutcome::failure(run_id, matched, detail),
        };

        if matches.is_empty() {
            tracing::info!("no shows matched the tracked artists");
            return RunOutcome::no_matches(run_id);
        }

        let match_count = matches.len();
        for m in &matches {
            tracing::debug!(artist = %m.artist, show = m.show.display_name(), "matched show");
        }

        let report = match self.formatter.format(&matches) {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "report formatting failed");
                return RunOutcome::failure(run_id, match_count, format!("format failed: {e}"));
            }
        };

        tracing::info!(match_count, channel = self.channel.kind(), "sending report");
        let receipt = self.channel.send(&report.subject, &report.body).await;

        if !receipt.ok {
            let detail = receipt
                .error
                .unwrap_or_else(|| "delivery failed without detail".to_string());
            return RunOutcome::failure(run_id, match_count, detail);
        }

        self.record_notified(&matches).await;
        RunOutcome::success(run_id, match_count, receipt.id)
    }

    /// Returns the matches not yet notified, or the error detail if the
    /// store cannot be read.
    async fn filter_already_notified(
        &self,
        matches: Vec<MatchResult>,
    ) -> Result<Vec<MatchResult>, String> {
        let Some(store) = &self.seen else {
            return Ok(matches);
        };

        let store = Arc::clone(store);
        let seen = tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(|e| format!("seen-store load task failed: {e}"))
            .and_then(|loaded| loaded.map_err(|e| format!("seen-store load failed: {e}")))
            .map_err(|detail| {
                tracing::error!(error = %detail, "seen-store load failed");
                detail
            })?;

        let total = matches.len();
        let fresh: Vec<MatchResult> = matches
            .into_iter()
            .filter(|m| !seen.contains(&match_key(m)))
            .collect();

        if fresh.len() < total {
            tracing::info!(
                skipped = total - fresh.len(),
                "skipping matches that were already notified"
            );
        }
        Ok(fresh)
    }

    /// Record delivered matches. Store failures are logged, not returned.
    async fn record_notified(&self, matches: &[MatchResult]) {
        let Some(store) = &self.seen else {
            return;
        };
        let store = Arc::clone(store);
        let keys: Vec<String> = matches.iter().map(match_key).collect();
        match tokio::task::spawn_blocking(move || store.record(&keys)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "failed to record notified matches"),
            Err(e) => tracing::warn!(error = %e, "seen-store record task failed"),
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
