//! Turns extracted table rows into company and job records.
//!
//! Rows are handled one at a time, in order. A job is inserted only after a
//! lookup on (company, title, application URL) finds nothing. The lookup and
//! the insert are separate calls, so two overlapping runs can both insert the
//! same job.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, info, warn};

use crate::posting_date::YearPolicy;
use crate::store::{JobStore, NewCompany, NewJob};
use crate::table::RawTableRow;

static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]*)\)").expect("link pattern is valid"));

/// Company identity recovered from the Company column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompanyLink {
    pub name: String,
    pub website_url: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompanyStatus {
    Created,
    Existing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowOutcome {
    /// A new job was inserted.
    Created { company: CompanyStatus },
    /// A job with the same company, title and application URL was already stored.
    AlreadyExists,
    /// The company upsert, the job lookup or the job insert failed.
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowReport {
    pub company_name: String,
    pub role: String,
    pub outcome: RowOutcome,
}

/// Reads `[name](url)` from a company cell. Cells without a link are the name itself;
/// only http(s) targets are kept as the website.
pub fn company_from_cell(cell: &str) -> CompanyLink {
    match MARKDOWN_LINK_RE.captures(cell) {
        Some(caps) => {
            let url = &caps[2];
            CompanyLink {
                name: caps[1].trim().to_string(),
                website_url: (url.starts_with("http://") || url.starts_with("https://"))
                    .then(|| url.to_string()),
            }
        }
        None => CompanyLink {
            name: cell.to_string(),
            website_url: None,
        },
    }
}

/// Parses a Date Posted label. Empty labels are absent; anything else that fails
/// to parse is logged and treated as absent.
pub fn parse_date_posted(label: &str, role: &str, years: YearPolicy) -> Option<NaiveDate> {
    if label.trim().is_empty() {
        return None;
    }
    match years.resolve(label) {
        Ok(date) => Some(date),
        Err(e) => {
            warn!("Could not parse date '{}' for job {}: {}", label, role, e);
            None
        }
    }
}

/// Upserts the company and inserts the job for every row, in order.
pub async fn reconcile(
    store: &dyn JobStore,
    rows: &[RawTableRow],
    years: YearPolicy,
    now: DateTime<Utc>,
) -> Vec<RowReport> {
    let mut reports = Vec::with_capacity(rows.len());
    for row in rows {
        reports.push(reconcile_row(store, row, years, now).await);
    }
    reports
}

async fn reconcile_row(
    store: &dyn JobStore,
    row: &RawTableRow,
    years: YearPolicy,
    now: DateTime<Utc>,
) -> RowReport {
    let company = company_from_cell(&row.company_cell);
    let report = |outcome| RowReport {
        company_name: company.name.clone(),
        role: row.role.clone(),
        outcome,
    };

    let new_company = NewCompany {
        name: company.name.clone(),
        website_url: company.website_url.clone(),
        updated_at: now,
    };
    let record = match store.upsert_company(&new_company).await {
        Ok(record) => record,
        Err(e) => {
            error!("Error upserting company {} for job {}: {}", company.name, row.role, e);
            return report(RowOutcome::Failed);
        }
    };
    let company_status = if record.created {
        CompanyStatus::Created
    } else {
        CompanyStatus::Existing
    };

    let job = NewJob {
        company_id: record.id,
        title: row.role.clone(),
        location: row.location.clone(),
        application_url: row.application_cell.clone(),
        date_posted: parse_date_posted(&row.date_posted, &row.role, years),
        updated_at: now,
    };

    match store.find_job(&job.key()).await {
        Ok(Some(_)) => {
            info!("Job {} for company {} already exists, skipping...", row.role, company.name);
            return report(RowOutcome::AlreadyExists);
        }
        Ok(None) => {}
        Err(e) => {
            error!("Error checking job {} for company {}: {}", row.role, company.name, e);
            return report(RowOutcome::Failed);
        }
    }

    match store.insert_job(&job).await {
        Ok(_) => {
            info!("Successfully inserted job {} for company {}", row.role, company.name);
            report(RowOutcome::Created {
                company: company_status,
            })
        }
        Err(e) => {
            error!("Error inserting job {} for company {}: {}", row.role, company.name, e);
            report(RowOutcome::Failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_from_bold_link() {
        // The extractor strips '*' before this point.
        let link = company_from_cell("[Acme](https://acme.example)");
        assert_eq!(link.name, "Acme");
        assert_eq!(link.website_url.as_deref(), Some("https://acme.example"));
    }

    #[test]
    fn test_company_without_link() {
        let link = company_from_cell("Globex");
        assert_eq!(
            link,
            CompanyLink {
                name: "Globex".to_string(),
                website_url: None
            }
        );
    }

    #[test]
    fn test_company_with_relative_link_has_no_website() {
        let link = company_from_cell("[Initech](/companies/initech)");
        assert_eq!(link.name, "Initech");
        assert_eq!(link.website_url, None);
    }

    #[test]
    fn test_parse_date_posted() {
        let years = YearPolicy::Fixed(2023);
        assert_eq!(
            parse_date_posted("Dec 15", "SWE Intern", years),
            NaiveDate::from_ymd_opt(2023, 12, 15)
        );
        assert_eq!(parse_date_posted("", "SWE Intern", years), None);
        assert_eq!(parse_date_posted("soon", "SWE Intern", years), None);
    }
}
