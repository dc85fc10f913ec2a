use std::time::Duration;

use base64::Engine;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{error, info};

use crate::error::SourceError;

/// GitHub rejects API requests without a User-Agent.
pub const USER_AGENT: &str = concat!("internship-sync/", env!("CARGO_PKG_VERSION"));

/// Envelope returned by the GitHub contents API.
#[derive(Deserialize, Debug)]
struct ContentsEnvelope {
    content: Option<String>,
}

/// HTTP client shared by the README fetch and the REST store.
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Fetches the README through the contents API and returns it as markdown.
pub async fn fetch_readme(client: &Client, url: &str) -> Result<String, SourceError> {
    info!("Fetching README from: {}", url);

    let response = client
        .get(url)
        .header(header::ACCEPT, "application/vnd.github+json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        error!("README fetch error: Status {}, URL: {}, Body: {}", status, url, body);
        return Err(SourceError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let envelope: ContentsEnvelope = response.json().await?;
    let content = envelope.content.ok_or(SourceError::MissingContent)?;
    let markdown = decode_content(&content)?;
    info!("Fetched README ({} bytes).", markdown.len());
    Ok(markdown)
}

/// Decodes the base64 `content` field. GitHub wraps it at 60 columns.
pub fn decode_content(content: &str) -> Result<String, SourceError> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}
