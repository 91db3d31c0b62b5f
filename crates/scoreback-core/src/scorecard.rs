//! Scorecard documents as served by the public scorecard API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A scorecard evaluation of one repository at one commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardDocument {
    #[serde(deserialize_with = "rfc3339_or_date")]
    pub date: DateTime<Utc>,
    pub repo: SubjectRepo,
    pub scorecard: ScorecardTool,
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub checks: Vec<CheckResult>,
}

/// The repository a document was computed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRepo {
    pub name: String,
    pub commit: String,
}

/// The scorecard build that produced a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardTool {
    pub version: String,
    pub commit: String,
}

/// Outcome of a single named check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    /// `-1` when the check was inconclusive.
    pub score: i64,
    #[serde(default)]
    pub reason: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub documentation: CheckDocumentation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDocumentation {
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub url: String,
}

impl ScorecardDocument {
    /// Decode a response body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// The API has served both full timestamps and bare dates.
fn rfc3339_or_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid scorecard date: {raw}")))
}
