//! Daily sync of internship postings.
//!
//! Pipeline: [`source`] fetches the README, [`table`] extracts today's rows,
//! [`reconcile`] upserts companies and inserts new jobs through a [`store::JobStore`].
//! [`jobs::run_internship_postings`] wires the steps together for one run.

pub mod config;
pub mod entities;
pub mod error;
pub mod jobs;
pub mod posting_date;
pub mod reconcile;
pub mod source;
pub mod store;
pub mod table;

pub use config::{Config, StoreConfig};
pub use error::{AppError, ConfigError, SourceError, StoreError};
pub use jobs::{process_markdown, run_internship_postings, sync, RunSummary};
pub use posting_date::YearPolicy;
pub use reconcile::{reconcile, CompanyStatus, RowOutcome, RowReport};
pub use store::{DatabaseStore, JobStore, RestStore};
pub use table::{extract, RawTableRow};
