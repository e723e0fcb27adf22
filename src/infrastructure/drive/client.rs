//! HTTP client for a OneDrive-style drive exposed through the Microsoft
//! Graph API. Implements the [`TreeSource`] port.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::models::{DriveConfig, RawItem};
use crate::domain::ports::{TreeSource, TreeSourceError};
use crate::infrastructure::retry::RetryPolicy;

use super::error::DriveApiError;
use super::types::{DriveItem, DriveItemList};

/// Environment variable consulted when the config carries no access token.
pub const ACCESS_TOKEN_ENV: &str = "GRAPH_ACCESS_TOKEN";

/// Graph drive client with connection pooling and transparent retry of
/// transient failures. The traversal controller above it never retries.
pub struct DriveClient {
    http_client: ReqwestClient,
    base_url: String,
    access_token: String,
    retry_policy: RetryPolicy,
}

impl DriveClient {
    /// Build a client from configuration. The access token comes from the
    /// config or, failing that, the `GRAPH_ACCESS_TOKEN` environment variable.
    pub fn new(config: &DriveConfig, retry_policy: RetryPolicy) -> Result<Self> {
        let access_token = config
            .access_token
            .clone()
            .or_else(|| std::env::var(ACCESS_TOKEN_ENV).ok())
            .context("No drive access token: set drive.access_token or GRAPH_ACCESS_TOKEN")?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(4)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token,
            retry_policy,
        })
    }

    /// GET a URL, retrying transient failures per the retry policy.
    async fn get(&self, url: &str) -> Result<reqwest::Response, DriveApiError> {
        let mut attempt = 0;
        loop {
            let result = self
                .http_client
                .get(url)
                .bearer_auth(&self.access_token)
                .send()
                .await;

            let error = match result {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error response".to_string());
                    DriveApiError::from_status(status, body)
                }
                Err(err) => DriveApiError::NetworkError(err),
            };

            if error.is_transient() && self.retry_policy.should_retry(attempt) {
                let delay = self.retry_policy.backoff_delay(attempt);
                warn!(url = %url, error = %error, delay_ms = delay.as_millis() as u64, "transient drive error, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }
            return Err(error);
        }
    }

    async fn get_listing(&self, url: &str) -> Result<Vec<RawItem>, DriveApiError> {
        let response = self.get(url).await?;
        let list: DriveItemList = response.json().await?;
        debug!(url = %url, count = list.value.len(), "drive listing fetched");
        Ok(list.value.into_iter().map(DriveItem::into_raw).collect())
    }

    /// Children of the drive root.
    pub async fn root_children(&self) -> Result<Vec<RawItem>, DriveApiError> {
        self.get_listing(&format!("{}/me/drive/root/children", self.base_url))
            .await
    }

    /// Children of a drive item.
    pub async fn item_children(&self, item_id: &str) -> Result<Vec<RawItem>, DriveApiError> {
        self.get_listing(&format!(
            "{}/me/drive/items/{}/children",
            self.base_url, item_id
        ))
        .await
    }

    /// Resolve a slash-delimited path to an item id.
    pub async fn item_by_path(&self, path: &str) -> Result<RawItem, DriveApiError> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        let response = self
            .get(&format!("{}/me/drive/root:{}", self.base_url, path))
            .await?;
        let item: DriveItem = response.json().await?;
        Ok(item.into_raw())
    }

    /// Download a file's raw bytes. Graph answers with a redirect to the
    /// content URL, which reqwest follows.
    pub async fn download(&self, item_id: &str) -> Result<Vec<u8>, DriveApiError> {
        let response = self
            .get(&format!(
                "{}/me/drive/items/{}/content",
                self.base_url, item_id
            ))
            .await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Server-side name search under the drive root. Not used by the
    /// traversal loop; exposed for the `ls --query` CLI convenience.
    pub async fn search(&self, query: &str) -> Result<Vec<RawItem>, DriveApiError> {
        let escaped = query.replace('\'', "''");
        self.get_listing(&format!(
            "{}/me/drive/root/search(q='{}')",
            self.base_url, escaped
        ))
        .await
    }
}

#[async_trait]
impl TreeSource for DriveClient {
    async fn resolve_path(&self, path: &str) -> Result<String, TreeSourceError> {
        match self.item_by_path(path).await {
            Ok(item) => Ok(item.id),
            Err(DriveApiError::NotFound(_)) => {
                Err(TreeSourceError::PathNotFound(path.to_string()))
            }
            Err(err) => Err(TreeSourceError::RequestFailed(err.to_string())),
        }
    }

    async fn list_root(&self) -> Result<Vec<RawItem>, TreeSourceError> {
        self.root_children()
            .await
            .map_err(|err| TreeSourceError::RequestFailed(err.to_string()))
    }

    async fn list_children(&self, node_id: &str) -> Result<Vec<RawItem>, TreeSourceError> {
        self.item_children(node_id)
            .await
            .map_err(|err| TreeSourceError::RequestFailed(err.to_string()))
    }

    async fn fetch_bytes(&self, file_id: &str) -> Result<Vec<u8>, TreeSourceError> {
        match self.download(file_id).await {
            Ok(bytes) => Ok(bytes),
            Err(DriveApiError::NotFound(_)) => {
                Err(TreeSourceError::ItemNotFound(file_id.to_string()))
            }
            Err(err) => Err(TreeSourceError::RequestFailed(err.to_string())),
        }
    }
}
