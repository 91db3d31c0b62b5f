//! Commit listing from local git history.

use std::path::Path;
use std::process::Command;

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use thiserror::Error;
use tracing::{debug, info};

/// Upper bound on commits returned by a single listing.
pub const MAX_COMMITS: usize = 100;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("git exited with {code:?}: {stderr}")]
    Exit { code: Option<i32>, stderr: String },
    #[error("git output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("{days_back} days back is outside the supported date range")]
    WindowOutOfRange { days_back: u32 },
}

/// A commit hash paired with its commit timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub timestamp: DateTime<Utc>,
}

/// Calendar date `days_back` days before `now`, in `now`'s time zone.
///
/// `git log --since` reads a bare date in local time, so callers pass
/// `Local::now()`.
pub fn since_date<Tz: TimeZone>(
    now: DateTime<Tz>,
    days_back: u32,
) -> Result<NaiveDate, HistoryError> {
    now.checked_sub_signed(TimeDelta::days(i64::from(days_back)))
        .map(|start| start.date_naive())
        .ok_or(HistoryError::WindowOutOfRange { days_back })
}

/// List commits made on or after `since` in the repository at `repo_dir`,
/// most recent first, capped at [`MAX_COMMITS`].
pub fn list_commits(repo_dir: &Path, since: NaiveDate) -> Result<Vec<CommitRecord>, HistoryError> {
    let since_arg = since.format("%Y-%m-%d").to_string();
    let limit = MAX_COMMITS.to_string();

    info!(repo = %repo_dir.display(), since = %since_arg, "listing commits");
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_dir)
        .args(["log", "--since", &since_arg, "--format=%H,%ct", "-n", &limit])
        .output()?;

    if !output.status.success() {
        return Err(HistoryError::Exit {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8(output.stdout)?;
    let commits = parse_log(&stdout);
    info!(count = commits.len(), "listed commits");
    Ok(commits)
}

/// Parse `<hash>,<unix-seconds>` lines.
///
/// Lines with the wrong field count or an unusable timestamp are skipped;
/// the rest of the output is still parsed.
pub fn parse_log(output: &str) -> Vec<CommitRecord> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let record = parse_line(line);
            if record.is_none() {
                debug!(line, "skipping malformed log line");
            }
            record
        })
        .take(MAX_COMMITS)
        .collect()
}

fn parse_line(line: &str) -> Option<CommitRecord> {
    let mut fields = line.split(',');
    let (hash, secs) = match (fields.next(), fields.next(), fields.next()) {
        (Some(hash), Some(secs), None) => (hash, secs),
        _ => return None,
    };
    let secs: i64 = secs.parse().ok()?;
    let timestamp = DateTime::from_timestamp(secs, 0)?;
    Some(CommitRecord {
        hash: hash.to_string(),
        timestamp,
    })
}
