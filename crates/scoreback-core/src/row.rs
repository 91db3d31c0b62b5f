//! Warehouse row shape and the mapping into it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::CommitRecord;
use crate::scorecard::{CheckResult, ScorecardDocument};

/// One scorecard result for one commit, as written to the warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRow {
    /// Commit timestamp, not the evaluation date.
    pub date: DateTime<Utc>,
    pub repo: RepoRef,
    pub scorecard: ScorecardVersion,
    pub score: f64,
    pub checks: Vec<CheckResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub name: String,
    pub commit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardVersion {
    pub version: String,
    pub commit: String,
}

/// Canonical repository name, e.g. `github.com/ossf/scorecard`.
pub fn repo_name(project: &str, repo: &str) -> String {
    format!("github.com/{project}/{repo}")
}

impl PersistedRow {
    /// Combine a listed commit with the scorecard fetched for it.
    pub fn from_scorecard(
        commit: &CommitRecord,
        doc: ScorecardDocument,
        project: &str,
        repo: &str,
    ) -> Self {
        Self {
            date: commit.timestamp,
            repo: RepoRef {
                name: repo_name(project, repo),
                commit: commit.hash.clone(),
            },
            scorecard: ScorecardVersion {
                version: doc.scorecard.version,
                commit: doc.scorecard.commit,
            },
            score: doc.score,
            checks: doc.checks,
        }
    }
}
