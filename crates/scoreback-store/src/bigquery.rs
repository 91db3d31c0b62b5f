//! BigQuery streaming inserts via the `tabledata.insertAll` REST endpoint.

use async_trait::async_trait;
use scoreback_core::{PersistedRow, WarehouseTarget};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Warehouse, WriteError};

pub const BIGQUERY_API_BASE: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Appends rows to a fixed BigQuery table, one request per row.
///
/// Authenticates with an OAuth2 bearer token (e.g. the output of
/// `gcloud auth print-access-token`). Column names in BigQuery are
/// case-insensitive, so the snake_case row fields line up with an existing
/// `Date`/`Repo`/`Scorecard`/`Score`/`Checks` table.
pub struct BigQueryWriter {
    client: reqwest::Client,
    insert_url: String,
    token: String,
    target: WarehouseTarget,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertAllRequest<'a> {
    skip_invalid_rows: bool,
    ignore_unknown_values: bool,
    rows: [InsertRow<'a>; 1],
}

#[derive(Serialize)]
struct InsertRow<'a> {
    json: &'a PersistedRow,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct InsertAllResponse {
    #[serde(default)]
    insert_errors: Vec<RowErrors>,
}

#[derive(Deserialize)]
struct RowErrors {
    #[serde(default)]
    errors: Vec<ErrorProto>,
}

#[derive(Deserialize)]
struct ErrorProto {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    message: String,
}

impl BigQueryWriter {
    pub fn new(target: WarehouseTarget, token: String) -> Self {
        Self::with_base_url(BIGQUERY_API_BASE, target, token)
    }

    /// `base_url` should be like `https://bigquery.googleapis.com/bigquery/v2`.
    pub fn with_base_url(base_url: &str, target: WarehouseTarget, token: String) -> Self {
        let insert_url = format!(
            "{}/projects/{}/datasets/{}/tables/{}/insertAll",
            base_url.trim_end_matches('/'),
            target.project,
            target.dataset,
            target.table
        );
        Self {
            client: reqwest::Client::new(),
            insert_url,
            token,
            target,
        }
    }
}

#[async_trait]
impl Warehouse for BigQueryWriter {
    async fn insert_row(&mut self, row: &PersistedRow) -> Result<(), WriteError> {
        let body = InsertAllRequest {
            skip_invalid_rows: false,
            ignore_unknown_values: false,
            rows: [InsertRow { json: row }],
        };

        debug!(url = %self.insert_url, commit = %row.repo.commit, "inserting row");
        let resp = self
            .client
            .post(&self.insert_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(WriteError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        let result: InsertAllResponse = if text.trim().is_empty() {
            InsertAllResponse::default()
        } else {
            serde_json::from_str(&text)?
        };
        if let Some(message) = rejection_message(&result) {
            return Err(WriteError::Rejected(message));
        }

        info!(table = %self.target, commit = %row.repo.commit, "row inserted");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("bigquery:{}", self.target)
    }
}

fn rejection_message(resp: &InsertAllResponse) -> Option<String> {
    let messages: Vec<String> = resp
        .insert_errors
        .iter()
        .flat_map(|row| &row.errors)
        .map(|e| {
            if e.location.is_empty() {
                format!("{}: {}", e.reason, e.message)
            } else {
                format!("{} at {}: {}", e.reason, e.location, e.message)
            }
        })
        .collect();
    match (resp.insert_errors.is_empty(), messages.is_empty()) {
        (true, _) => None,
        (false, true) => Some("row rejected without detail".into()),
        (false, false) => Some(messages.join("; ")),
    }
}
