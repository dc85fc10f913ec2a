use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;

use crate::error::ConfigError;
use crate::posting_date::YearPolicy;

/// GitHub contents API endpoint for the tracked README.
pub const DEFAULT_README_URL: &str =
    "https://api.github.com/repos/SimplifyJobs/Summer2025-Internships/contents/README.md";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Where parsed postings are written.
#[derive(Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Direct SQL connection (Postgres in production, SQLite locally).
    Database { url: String },
    /// Supabase PostgREST endpoint plus its anon/service key.
    Rest { url: String, api_key: String },
}

// Keeps credentials out of log lines.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreConfig::Database { .. } => f.write_str("Database { url: <redacted> }"),
            StoreConfig::Rest { url, .. } => f
                .debug_struct("Rest")
                .field("url", url)
                .field("api_key", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub readme_url: String,
    pub store: StoreConfig,
    /// Fixed year for "Mon D" posting labels; derived from the run date when unset.
    pub posting_year: Option<i32>,
    pub http_timeout: Duration,
}

impl Config {
    /// Reads configuration from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let store = match get("DATABASE_URL") {
            Some(url) => StoreConfig::Database { url },
            None => StoreConfig::Rest {
                url: get("SUPABASE_URL")
                    .ok_or(ConfigError::Missing("SUPABASE_URL"))?,
                api_key: get("SUPABASE_ANON_KEY")
                    .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?,
            },
        };

        let posting_year = match get("POSTING_YEAR") {
            Some(raw) => Some(raw.parse::<i32>().map_err(|e| ConfigError::Invalid {
                key: "POSTING_YEAR",
                value: raw.clone(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        key: "HTTP_TIMEOUT_SECS",
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    })
                }
                Ok(secs) => secs,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        key: "HTTP_TIMEOUT_SECS",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            readme_url: get("README_SOURCE_URL").unwrap_or_else(|| DEFAULT_README_URL.to_string()),
            store,
            posting_year,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn year_policy(&self, reference_date: NaiveDate) -> YearPolicy {
        match self.posting_year {
            Some(year) => YearPolicy::Fixed(year),
            None => YearPolicy::RelativeTo(reference_date),
        }
    }
}
