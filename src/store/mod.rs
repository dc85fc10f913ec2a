//! Persistence seam for companies and jobs.
//!
//! Two backends implement [`JobStore`]:
//! - [`DatabaseStore`]: direct SQL through sea-orm (runs migrations on connect)
//! - [`RestStore`]: Supabase PostgREST over HTTP

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use tracing::info;

use crate::config::StoreConfig;
use crate::error::StoreError;

pub mod database;
pub mod rest;

pub use database::DatabaseStore;
pub use rest::RestStore;

/// Company fields written on every upsert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCompany {
    pub name: String,
    pub website_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a company upsert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompanyRecord {
    pub id: i32,
    /// False when a company with the same name already existed and was updated.
    pub created: bool,
}

/// Identity used to decide whether a job already exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JobKey<'a> {
    pub company_id: i32,
    pub title: &'a str,
    pub application_url: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewJob {
    pub company_id: i32,
    pub title: String,
    pub location: String,
    pub application_url: String,
    pub date_posted: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

impl NewJob {
    pub fn key(&self) -> JobKey<'_> {
        JobKey {
            company_id: self.company_id,
            title: &self.title,
            application_url: &self.application_url,
        }
    }
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Creates the company, or updates `website_url`/`updated_at` of the one with the same name.
    async fn upsert_company(&self, company: &NewCompany) -> Result<CompanyRecord, StoreError>;

    /// Id of a job matching all three fields of `key`, if any.
    async fn find_job(&self, key: &JobKey<'_>) -> Result<Option<i32>, StoreError>;

    /// Inserts unconditionally; callers check [`JobStore::find_job`] first.
    async fn insert_job(&self, job: &NewJob) -> Result<i32, StoreError>;
}

/// Opens the backend selected by configuration.
pub async fn connect(
    config: &StoreConfig,
    client: &Client,
) -> Result<Box<dyn JobStore>, StoreError> {
    match config {
        StoreConfig::Database { url } => {
            info!("Connecting to database store");
            Ok(Box::new(DatabaseStore::connect(url).await?))
        }
        StoreConfig::Rest { url, api_key } => {
            info!("Using PostgREST store at {}", url);
            Ok(Box::new(RestStore::new(client.clone(), url, api_key.clone())?))
        }
    }
}
