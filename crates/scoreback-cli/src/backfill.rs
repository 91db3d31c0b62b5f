//! Driving loop: fetch → map → write for each listed commit.

use scoreback_api::ScorecardSource;
use scoreback_core::{BackfillConfig, CommitRecord, PersistedRow};
use scoreback_store::Warehouse;
use tracing::{info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackfillSummary {
    pub attempted: usize,
    pub written: usize,
    pub fetch_failed: usize,
    pub write_failed: usize,
}

/// Process commits one at a time. A failed fetch or write is logged and the
/// commit skipped; the run never aborts on a per-commit failure.
pub async fn run_backfill(
    config: &BackfillConfig,
    commits: &[CommitRecord],
    source: &dyn ScorecardSource,
    warehouse: &mut dyn Warehouse,
) -> BackfillSummary {
    let mut summary = BackfillSummary::default();

    for commit in commits {
        summary.attempted += 1;

        let doc = match source.fetch(&config.project, &config.repo, &commit.hash).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!(commit = %commit.hash, error = %e, "failed to fetch scorecard, skipping");
                summary.fetch_failed += 1;
                continue;
            }
        };

        let row = PersistedRow::from_scorecard(commit, doc, &config.project, &config.repo);

        if let Err(e) = warehouse.insert_row(&row).await {
            warn!(commit = %commit.hash, error = %e, "failed to save row, skipping");
            summary.write_failed += 1;
            continue;
        }

        summary.written += 1;
        info!(commit = %commit.hash, score = row.score, "saved scorecard row");
    }

    summary
}
