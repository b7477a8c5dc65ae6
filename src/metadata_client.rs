//! Client for the external book metadata provider.
//!
//! One bounded-timeout call per fetch, no retries. Every failure mode
//! (transport, timeout, non-success status, malformed body) collapses into
//! `DomainError::External` so the enrichment path fails fast and typed.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

use crate::domain::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorMetadata {
    pub name: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherMetadata {
    pub name: String,
    pub country: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreMetadata {
    pub name: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingMetadata {
    pub average: f64,
    pub votes: u64,
    pub source: String,
}

/// Metadata record as returned by the provider. Fetched transiently per
/// enrichment call; only selected fields are folded into a Book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookMetadata {
    pub isbn: String,
    pub title: String,
    pub authors: Vec<AuthorMetadata>,
    #[serde(default)]
    pub publisher: Option<PublisherMetadata>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub publication_date: Option<NaiveDate>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<GenreMetadata>>,
    #[serde(default)]
    pub ratings: Option<Vec<RatingMetadata>>,
}

impl BookMetadata {
    /// Explicit date-to-year mapping for the integer-typed field on Book.
    pub fn publication_year(&self) -> Option<i32> {
        self.publication_date.map(|d| d.year())
    }
}

/// Providers disagree on date formats: accept RFC3339 datetimes as well as
/// bare `YYYY-MM-DD` dates, and reduce both to a calendar date.
fn flexible_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else { return Ok(None) };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(dt.date_naive()));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Some(dt.date()));
    }
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            serde::de::Error::custom(format!("unrecognized publication_date: {}", raw))
        })
}

pub struct MetadataClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl MetadataClient {
    /// Build a client for the provider at `base_url`. The URL is validated
    /// here so a misconfigured deployment fails at startup, not per-request.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| DomainError::Internal(format!("invalid metadata api url: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Internal(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Fetch metadata for one ISBN.
    pub async fn fetch(&self, isbn: &str) -> Result<BookMetadata, DomainError> {
        let url = format!("{}/books/{}", self.base_url, isbn);

        tracing::debug!("fetching metadata for isbn {}", isbn);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            DomainError::External(format!("metadata provider unreachable: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(DomainError::External(format!(
                "metadata provider returned status {}",
                response.status()
            )));
        }

        response.json::<BookMetadata>().await.map_err(|e| {
            DomainError::External(format!("malformed metadata response: {}", e))
        })
    }
}
