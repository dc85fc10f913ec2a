use std::fmt::{self, Display};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use super::{CompanyRecord, JobKey, JobStore, NewCompany, NewJob};
use crate::error::StoreError;

const COMPANIES: &str = "companies";
const JOBS: &str = "jobs";

/// Store that talks to a Supabase project through its PostgREST API.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base: Url,
    api_key: String,
}

impl fmt::Debug for RestStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestStore")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize, Debug)]
struct IdRow {
    id: i32,
}

#[derive(Serialize)]
struct CompanyPayload<'a> {
    name: &'a str,
    website_url: Option<&'a str>,
    updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct JobPayload<'a> {
    company_id: i32,
    title: &'a str,
    location: &'a str,
    application_url: &'a str,
    date_posted: Option<NaiveDate>,
    updated_at: DateTime<Utc>,
}

impl RestStore {
    /// `project_url` is the Supabase project root, e.g. `https://abc.supabase.co`.
    pub fn new(
        client: Client,
        project_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let mut root = Url::parse(project_url)?;
        // Url::join replaces the last path segment unless the path ends with '/'.
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        Ok(Self {
            client,
            base: root.join("rest/v1/")?,
            api_key: api_key.into(),
        })
    }

    pub fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        Ok(self.base.join(table)?)
    }

    fn request(&self, method: Method, table: &str) -> Result<RequestBuilder, StoreError> {
        Ok(self
            .client
            .request(method, self.table_url(table)?)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key))
    }

    async fn select_ids(
        &self,
        table: &'static str,
        filters: &[(&str, String)],
    ) -> Result<Vec<IdRow>, StoreError> {
        let mut query: Vec<(&str, String)> = vec![("select", "id".to_string())];
        query.extend(filters.iter().cloned());

        let response = self.request(Method::GET, table)?.query(&query).send().await?;
        read_rows(table, response).await
    }
}

fn eq(value: impl Display) -> String {
    format!("eq.{}", value)
}

async fn read_rows(table: &'static str, response: Response) -> Result<Vec<IdRow>, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        error!("PostgREST error on {}: Status {}, Body: {}", table, status, message);
        return Err(StoreError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl JobStore for RestStore {
    async fn upsert_company(&self, company: &NewCompany) -> Result<CompanyRecord, StoreError> {
        // The upsert response looks the same for inserts and updates.
        let existing = self
            .select_ids(COMPANIES, &[("name", eq(&company.name))])
            .await?;

        let payload = [CompanyPayload {
            name: &company.name,
            website_url: company.website_url.as_deref(),
            updated_at: company.updated_at,
        }];
        let response = self
            .request(Method::POST, COMPANIES)?
            .query(&[("on_conflict", "name")])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&payload)
            .send()
            .await?;

        let rows = read_rows(COMPANIES, response).await?;
        let id = rows
            .first()
            .map(|row| row.id)
            .ok_or(StoreError::EmptyResponse(COMPANIES))?;
        debug!("Upserted company {} (id {})", company.name, id);

        Ok(CompanyRecord {
            id,
            created: existing.is_empty(),
        })
    }

    async fn find_job(&self, key: &JobKey<'_>) -> Result<Option<i32>, StoreError> {
        let rows = self
            .select_ids(
                JOBS,
                &[
                    ("company_id", eq(key.company_id)),
                    ("title", eq(key.title)),
                    ("application_url", eq(key.application_url)),
                ],
            )
            .await?;
        Ok(rows.first().map(|row| row.id))
    }

    async fn insert_job(&self, job: &NewJob) -> Result<i32, StoreError> {
        let payload = JobPayload {
            company_id: job.company_id,
            title: &job.title,
            location: &job.location,
            application_url: &job.application_url,
            date_posted: job.date_posted,
            updated_at: job.updated_at,
        };
        let response = self
            .request(Method::POST, JOBS)?
            .header("Prefer", "return=representation")
            .json(&payload)
            .send()
            .await?;

        let rows = read_rows(JOBS, response).await?;
        rows.first()
            .map(|row| row.id)
            .ok_or(StoreError::EmptyResponse(JOBS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_with_and_without_trailing_slash() {
        let store = RestStore::new(Client::new(), "https://proj.supabase.co", "key").unwrap();
        assert_eq!(
            store.table_url("jobs").unwrap().as_str(),
            "https://proj.supabase.co/rest/v1/jobs"
        );

        let store = RestStore::new(Client::new(), "http://127.0.0.1:54321/", "key").unwrap();
        assert_eq!(
            store.table_url("companies").unwrap().as_str(),
            "http://127.0.0.1:54321/rest/v1/companies"
        );
    }

    #[test]
    fn test_invalid_project_url() {
        let err = RestStore::new(Client::new(), "not a url", "key").unwrap_err();
        assert!(matches!(err, StoreError::Url(_)));
    }

    #[test]
    fn test_eq_filter() {
        assert_eq!(eq(42), "eq.42");
        assert_eq!(eq("SWE Intern"), "eq.SWE Intern");
    }
}
