use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, SourceError};
use crate::posting_date::YearPolicy;
use crate::reconcile::{reconcile, CompanyStatus, RowOutcome, RowReport};
use crate::source::{fetch_readme, http_client};
use crate::store::{self, JobStore};
use crate::table;

/// Counts for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// False when the README had no postings table (or could not be fetched).
    pub table_found: bool,
    /// Rows posted on the reference date.
    pub rows: usize,
    pub jobs_created: usize,
    pub jobs_existing: usize,
    pub jobs_failed: usize,
    pub companies_created: usize,
}

impl RunSummary {
    fn from_reports(reports: &[RowReport]) -> Self {
        let mut summary = RunSummary {
            table_found: true,
            rows: reports.len(),
            ..Default::default()
        };
        for report in reports {
            match report.outcome {
                RowOutcome::Created { company } => {
                    summary.jobs_created += 1;
                    if company == CompanyStatus::Created {
                        summary.companies_created += 1;
                    }
                }
                RowOutcome::AlreadyExists => summary.jobs_existing += 1,
                RowOutcome::Failed => summary.jobs_failed += 1,
            }
        }
        summary
    }
}

/// Opens the configured store and performs one run.
pub async fn sync(config: &Config, reference_date: NaiveDate) -> Result<RunSummary, AppError> {
    let client = http_client(config.http_timeout).map_err(SourceError::Http)?;
    let store = store::connect(&config.store, &client).await?;
    run_internship_postings(store.as_ref(), &client, config, reference_date).await
}

/// Fetches the README and stores today's postings.
///
/// A non-success response from the README endpoint is treated like a README
/// without a table: nothing is written and the run still succeeds. Transport
/// and decoding failures abort the run.
pub async fn run_internship_postings(
    store: &dyn JobStore,
    client: &Client,
    config: &Config,
    reference_date: NaiveDate,
) -> Result<RunSummary, AppError> {
    let markdown = match fetch_readme(client, &config.readme_url).await {
        Ok(markdown) => markdown,
        Err(SourceError::Status { status, .. }) => {
            warn!("README unavailable (status {}); nothing to process", status);
            String::new()
        }
        Err(e) => return Err(e.into()),
    };

    let years = config.year_policy(reference_date);
    Ok(process_markdown(store, &markdown, reference_date, years, Utc::now()).await)
}

/// Extracts the rows posted on `reference_date` and reconciles them against the store.
pub async fn process_markdown(
    store: &dyn JobStore,
    markdown: &str,
    reference_date: NaiveDate,
    years: YearPolicy,
    now: DateTime<Utc>,
) -> RunSummary {
    let Some(rows) = table::extract(markdown, reference_date) else {
        error!("Error: Could not extract table data from README");
        return RunSummary::default();
    };

    if rows.is_empty() {
        info!("No new jobs found today");
        return RunSummary {
            table_found: true,
            ..Default::default()
        };
    }

    let reports = reconcile(store, &rows, years, now).await;
    let summary = RunSummary::from_reports(&reports);

    info!("Successfully processed {} jobs from today", summary.rows);
    info!(
        "Finished processing postings. Inserted: {}, Skipped (already exist): {}, Errors: {}, New companies: {}",
        summary.jobs_created, summary.jobs_existing, summary.jobs_failed, summary.companies_created
    );

    summary
}
