//! Run configuration, resolved once at startup and passed down explicitly.

use std::path::PathBuf;

/// Trailing window, in days, when no `DAYS_BACK` argument is given.
pub const DEFAULT_DAYS_BACK: u32 = 20;

/// Public OpenSSF scorecard API.
pub const DEFAULT_API_BASE: &str = "https://api.securityscorecards.dev";

/// Inputs that drive one backfill run.
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    /// Local checkout whose history is walked.
    pub repo_dir: PathBuf,
    /// GitHub organisation or user owning the repository.
    pub project: String,
    /// GitHub repository name.
    pub repo: String,
    pub days_back: u32,
    pub api_base: String,
}

impl BackfillConfig {
    pub fn new(repo_dir: impl Into<PathBuf>, project: &str, repo: &str) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            project: project.to_string(),
            repo: repo.to_string(),
            days_back: DEFAULT_DAYS_BACK,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Fixed project/dataset/table destination for persisted rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseTarget {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl Default for WarehouseTarget {
    fn default() -> Self {
        Self {
            project: "openssf".into(),
            dataset: "phren".into(),
            table: "scorecard".into(),
        }
    }
}

impl std::fmt::Display for WarehouseTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_window_and_api() {
        let config = BackfillConfig::new("/tmp/repo", "ossf", "scorecard");
        assert_eq!(config.days_back, 20);
        assert_eq!(config.api_base, "https://api.securityscorecards.dev");
        assert_eq!(config.project, "ossf");
        assert_eq!(config.repo, "scorecard");
    }

    #[test]
    fn default_target_is_openssf_phren_scorecard() {
        let target = WarehouseTarget::default();
        assert_eq!(target.to_string(), "openssf.phren.scorecard");
    }
}
