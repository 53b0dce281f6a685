//! Admin backend client
//!
//! HTTP client for the external admin REST API that owns the activity log.
//! The list endpoint has shipped three different response envelopes over
//! time (bare array, `{activities, pagination}`, and a `{data: {...}}`
//! wrapper), so the payload is probed and normalized before mapping.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::AdminApiConfig;
use crate::models::{ActivityQuery, RawActivityRecord};

/// A normalized page of raw activity records.
#[derive(Debug, Clone, Default)]
pub struct RawActivityPage {
    pub records: Vec<RawActivityRecord>,
    pub pagination: Option<RawPagination>,
}

/// Pagination block as the backend reports it, when it reports one.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default, alias = "per_page")]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

fn default_page() -> u32 {
    1
}

/// Seam between the audit service and the admin backend. Lets tests swap in
/// an in-memory source.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn fetch_activity(&self, query: &ActivityQuery) -> Result<RawActivityPage>;
    async fn fetch_activity_types(&self) -> Result<Vec<String>>;
    async fn fetch_activity_by_id(&self, id: Uuid) -> Result<Option<RawActivityRecord>>;
}

/// Admin backend API client
#[derive(Clone)]
pub struct AdminApiClient {
    client: Client,
    base_url: String,
}

impl AdminApiClient {
    /// Create a new client from configuration.
    pub fn new(config: &AdminApiConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));

        if let Some(ref token) = config.api_token {
            let mut headers = header::HeaderMap::new();
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .context("Admin API token contains invalid header characters")?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a page of activity records.
    pub async fn activity(&self, query: &ActivityQuery) -> Result<RawActivityPage> {
        let url = format!(
            "{}/admin/activity{}",
            self.base_url,
            query.to_query_string()
        );
        let payload: serde_json::Value = self.get(&url).await?;
        Ok(normalize_activity_payload(payload))
    }

    /// Fetch the list of known activity type strings.
    pub async fn activity_types(&self) -> Result<Vec<String>> {
        let url = format!("{}/admin/activity/types", self.base_url);
        let payload: serde_json::Value = self.get(&url).await?;

        // Tolerates both a bare array and a {"types": [...]} wrapper.
        let types = match payload {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut map) => match map.remove("types") {
                Some(serde_json::Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Ok(types
            .into_iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect())
    }

    /// Fetch a single activity record by id.
    pub async fn activity_by_id(&self, id: Uuid) -> Result<Option<RawActivityRecord>> {
        let url = format!("{}/admin/activity/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch activity {}", id))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to fetch activity {}: {} - {}", id, status, body);
        }

        let record = response
            .json::<RawActivityRecord>()
            .await
            .context("Failed to parse activity record")?;
        Ok(Some(record))
    }

    /// Internal GET request handler
    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("Admin API: sending GET request to {}", url);
        let response = self.client.get(url).send().await.map_err(|e| {
            error!(
                "Admin API: HTTP request failed to {}: {} (connect: {}, timeout: {})",
                url,
                e,
                e.is_connect(),
                e.is_timeout()
            );
            anyhow::anyhow!("Failed to send request to {}: {}", url, e)
        })?;

        let status = response.status();
        if status.is_success() {
            let body = response
                .text()
                .await
                .context("Failed to read response body")?;
            serde_json::from_str::<T>(&body).with_context(|| {
                let truncated = if body.len() > 500 {
                    format!("{}... (truncated)", &body[..500])
                } else {
                    body
                };
                format!("Failed to parse response JSON: {}", truncated)
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Request failed with status {}: {}", status, body);
        }
    }
}

#[async_trait]
impl ActivitySource for AdminApiClient {
    async fn fetch_activity(&self, query: &ActivityQuery) -> Result<RawActivityPage> {
        self.activity(query).await
    }

    async fn fetch_activity_types(&self) -> Result<Vec<String>> {
        self.activity_types().await
    }

    async fn fetch_activity_by_id(&self, id: Uuid) -> Result<Option<RawActivityRecord>> {
        self.activity_by_id(id).await
    }
}

/// Normalize the three observed list envelopes into one page shape.
///
/// Records that fail to deserialize are skipped with a warning rather than
/// failing the whole page; an unrecognized envelope degrades to an empty
/// page the same way the dashboard treats malformed data.
pub fn normalize_activity_payload(payload: serde_json::Value) -> RawActivityPage {
    match payload {
        serde_json::Value::Array(items) => RawActivityPage {
            records: parse_records(items),
            pagination: None,
        },
        serde_json::Value::Object(mut map) => {
            if let Some(activities) = map.remove("activities") {
                let records = match activities {
                    serde_json::Value::Array(items) => parse_records(items),
                    _ => Vec::new(),
                };
                let pagination = map
                    .remove("pagination")
                    .and_then(|p| serde_json::from_value(p).ok());
                RawActivityPage {
                    records,
                    pagination,
                }
            } else if let Some(inner) = map.remove("data") {
                normalize_activity_payload(inner)
            } else {
                warn!("Admin API: unrecognized activity payload shape, treating as empty");
                RawActivityPage::default()
            }
        }
        _ => {
            warn!("Admin API: unrecognized activity payload shape, treating as empty");
            RawActivityPage::default()
        }
    }
}

fn parse_records(items: Vec<serde_json::Value>) -> Vec<RawActivityRecord> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Admin API: skipping malformed activity record: {}", e);
                None
            }
        })
        .collect()
}
