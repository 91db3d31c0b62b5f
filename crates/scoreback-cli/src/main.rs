mod backfill;

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use chrono::Local;
use clap::{Parser, ValueEnum};
use scoreback_api::ScorecardClient;
use scoreback_core::config::{DEFAULT_API_BASE, DEFAULT_DAYS_BACK};
use scoreback_core::{BackfillConfig, WarehouseTarget, history};
use scoreback_store::{BigQueryWriter, DuckStore, Warehouse};
use tracing::info;

use crate::backfill::run_backfill;

#[derive(Parser, Debug)]
#[command(
    name = "scoreback",
    version,
    about = "Backfill OpenSSF scorecard results for recent commits into a warehouse table"
)]
struct Cli {
    /// Local checkout whose history is walked
    repo_dir: PathBuf,
    /// GitHub organisation or user, e.g. `ossf`
    project: String,
    /// GitHub repository name, e.g. `scorecard`
    repo: String,
    /// How many days of history to backfill
    #[arg(default_value_t = DEFAULT_DAYS_BACK)]
    days_back: u32,

    /// Scorecard API base URL
    #[arg(long, env = "SCOREBACK_API_URL", default_value = DEFAULT_API_BASE)]
    api_url: String,

    /// Where rows are written. `bigquery` authenticates with an OAuth2 access
    /// token (`--bq-token` or GOOGLE_OAUTH_ACCESS_TOKEN), e.g. from
    /// `gcloud auth print-access-token`
    #[arg(long, value_enum, default_value_t = Sink::Bigquery)]
    sink: Sink,

    /// DuckDB file used by `--sink duckdb`
    #[arg(long, default_value = "scorecard.duckdb")]
    duckdb_path: PathBuf,

    #[arg(long, default_value = "openssf")]
    bq_project: String,
    #[arg(long, default_value = "phren")]
    bq_dataset: String,
    /// Destination table (also the DuckDB table name)
    #[arg(long, default_value = "scorecard")]
    bq_table: String,
    /// OAuth2 access token for BigQuery, e.g. from `gcloud auth print-access-token`
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    bq_token: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Sink {
    Bigquery,
    Duckdb,
}

impl Cli {
    fn backfill_config(&self) -> BackfillConfig {
        BackfillConfig {
            days_back: self.days_back,
            api_base: self.api_url.clone(),
            ..BackfillConfig::new(self.repo_dir.clone(), &self.project, &self.repo)
        }
    }

    fn target(&self) -> WarehouseTarget {
        WarehouseTarget {
            project: self.bq_project.clone(),
            dataset: self.bq_dataset.clone(),
            table: self.bq_table.clone(),
        }
    }
}

fn open_warehouse(cli: &Cli) -> anyhow::Result<Box<dyn Warehouse>> {
    let target = cli.target();
    match cli.sink {
        Sink::Bigquery => {
            let token = cli.bq_token.clone().ok_or_else(|| {
                anyhow!("--bq-token or GOOGLE_OAUTH_ACCESS_TOKEN is required for the bigquery sink")
            })?;
            Ok(Box::new(BigQueryWriter::new(target, token)))
        }
        Sink::Duckdb => {
            let store = DuckStore::open_persistent(&cli.duckdb_path, &target.table)
                .with_context(|| format!("opening {}", cli.duckdb_path.display()))?;
            Ok(Box::new(store))
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Usage errors exit 1, not clap's default 2.
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        std::process::exit(code);
    });

    tracing_subscriber::fmt::init();
    info!("scoreback v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.backfill_config();
    let mut warehouse = open_warehouse(&cli)?;

    let since = history::since_date(Local::now(), config.days_back)?;
    let commits = history::list_commits(&config.repo_dir, since)
        .with_context(|| format!("listing commits in {}", config.repo_dir.display()))?;

    let source = ScorecardClient::new(&config.api_base);
    let summary = run_backfill(&config, &commits, &source, warehouse.as_mut()).await;

    info!(
        destination = %warehouse.describe(),
        attempted = summary.attempted,
        written = summary.written,
        fetch_failed = summary.fetch_failed,
        write_failed = summary.write_failed,
        "backfill done"
    );
    Ok(())
}
