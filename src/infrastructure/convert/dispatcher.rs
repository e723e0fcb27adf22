//! Extension-dispatched document-to-text conversion.
//!
//! Plain text and code formats decode inline; rich document formats go to a
//! remote conversion service when one is configured. Every failure surfaces
//! as a typed error that the traversal controller degrades to an empty text
//! body, so conversion can never abort a search.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::domain::models::ConverterConfig;
use crate::domain::ports::{ConvertError, DocumentConverter};

/// Formats decoded inline as UTF-8.
const TEXT_EXTS: &[&str] = &[
    "txt", "md", "csv", "tsv", "json", "xml", "yaml", "yml", "html", "htm", "py", "js", "ts",
    "java", "c", "cpp", "h", "cs", "sql", "ini", "log", "rs", "toml",
];

/// Formats handed to the remote conversion service.
const RICH_EXTS: &[&str] = &[
    "pdf", "docx", "pptx", "xlsx", "png", "jpeg", "jpg", "bmp", "tiff", "webp",
];

#[derive(Debug, Deserialize)]
struct ConversionResponse {
    #[serde(default)]
    markdown: String,
}

/// Converter dispatching on file extension, with the content-type hint as a
/// fallback when the name has no suffix.
pub struct ConversionDispatcher {
    http_client: ReqwestClient,
    service_url: Option<String>,
}

impl ConversionDispatcher {
    pub fn new(config: &ConverterConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http_client,
            service_url: config
                .service_url
                .clone()
                .map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    /// Extension from the file name, falling back to the content-type hint.
    fn guess_extension(file_name: &str, content_type: Option<&str>) -> Option<String> {
        if let Some((_, ext)) = file_name.rsplit_once('.') {
            if !ext.is_empty() {
                return Some(ext.to_ascii_lowercase());
            }
        }
        match content_type? {
            "text/plain" => Some("txt".to_string()),
            "text/markdown" => Some("md".to_string()),
            "text/csv" => Some("csv".to_string()),
            "text/html" => Some("html".to_string()),
            "application/json" => Some("json".to_string()),
            "application/pdf" => Some("pdf".to_string()),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some("docx".to_string())
            }
            "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
                Some("pptx".to_string())
            }
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some("xlsx".to_string())
            }
            other if other.starts_with("text/") => Some("txt".to_string()),
            _ => None,
        }
    }

    async fn convert_remote(&self, bytes: &[u8], file_name: &str) -> Result<String, ConvertError> {
        let Some(service_url) = &self.service_url else {
            return Err(ConvertError::Unsupported(format!(
                "{file_name}: no conversion service configured"
            )));
        };

        let response = self
            .http_client
            .post(format!("{service_url}/convert"))
            .header("x-filename", file_name)
            .header("content-type", "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|err| ConvertError::Failed(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ConvertError::Failed(format!(
                "conversion service returned HTTP {}",
                response.status()
            )));
        }

        let converted: ConversionResponse = response
            .json()
            .await
            .map_err(|err| ConvertError::Failed(err.to_string()))?;
        Ok(converted.markdown)
    }
}

#[async_trait]
impl DocumentConverter for ConversionDispatcher {
    async fn to_text(
        &self,
        bytes: &[u8],
        file_name: &str,
        content_type: Option<&str>,
    ) -> Result<String, ConvertError> {
        let ext = Self::guess_extension(file_name, content_type);
        debug!(file = %file_name, ext = ext.as_deref().unwrap_or("?"), "converting");

        match ext.as_deref() {
            Some(ext) if TEXT_EXTS.contains(&ext) => {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
            Some(ext) if RICH_EXTS.contains(&ext) => self.convert_remote(bytes, file_name).await,
            Some(other) => Err(ConvertError::Unsupported(format!(
                "{file_name}: .{other}"
            ))),
            None => Err(ConvertError::Unsupported(file_name.to_string())),
        }
    }
}
