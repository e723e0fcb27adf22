//! LLM oracle over an OpenAI-compatible chat completions endpoint.
//!
//! One client serves both ports: [`DecisionOracle`] for navigation decisions
//! and [`RelevanceVerifier`] for content judgments. A decision that fails to
//! parse is a typed oracle error (the run terminates); a relevance judgment
//! that fails to parse degrades to a non-match so the run continues through
//! the attempt budget.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::models::{Candidate, Decision, FileRelevance, OracleConfig, SearchRequest};
use crate::domain::ports::{DecisionOracle, OracleError, RelevanceVerifier};
use crate::infrastructure::retry::RetryPolicy;

use super::prompts;

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Relevance judgment as the model emits it, before domain validation.
#[derive(Debug, Deserialize)]
struct RawJudgment {
    #[serde(default)]
    score: f64,
    #[serde(default)]
    is_match: bool,
    #[serde(default)]
    reason: String,
}

/// Chat-completions client implementing both oracle ports.
pub struct LlmOracle {
    http_client: ReqwestClient,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    retry_policy: RetryPolicy,
}

impl LlmOracle {
    /// Build a client from configuration. The API key comes from the config
    /// or, failing that, the `OPENAI_API_KEY` environment variable.
    pub fn new(config: &OracleConfig, retry_policy: RetryPolicy) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .context("No oracle API key: set oracle.api_key or OPENAI_API_KEY")?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            retry_policy,
        })
    }

    /// Send one prompt and return the assistant's text, retrying transient
    /// HTTP failures.
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        let request = ChatRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let mut attempt = 0;
        loop {
            let result = self
                .http_client
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await;

            let failure = match result {
                Ok(response) if response.status().is_success() => {
                    let parsed: ChatResponse = response.json().await.map_err(|err| {
                        OracleError::Malformed(format!("response body: {err}"))
                    })?;
                    let text = parsed
                        .choices
                        .into_iter()
                        .next()
                        .map(|choice| choice.message.content)
                        .unwrap_or_default();
                    if text.is_empty() {
                        return Err(OracleError::Malformed("empty completion".to_string()));
                    }
                    return Ok(text);
                }
                Ok(response) => {
                    let status = response.status();
                    let transient = status.as_u16() == 429 || status.is_server_error();
                    let body = response.text().await.unwrap_or_default();
                    (transient, format!("HTTP {status}: {body}"))
                }
                Err(err) => {
                    let transient = err.is_timeout() || err.is_connect();
                    (transient, err.to_string())
                }
            };

            let (transient, message) = failure;
            if transient && self.retry_policy.should_retry(attempt) {
                let delay = self.retry_policy.backoff_delay(attempt);
                warn!(error = %message, delay_ms = delay.as_millis() as u64, "transient oracle error, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }
            return Err(OracleError::RequestFailed(message));
        }
    }
}

/// Extract the JSON payload from a model response, stripping markdown code
/// fences when present.
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let after_lang = after_fence
            .strip_prefix("json")
            .unwrap_or(after_fence)
            .trim_start();
        if let Some(end) = after_lang.find("```") {
            return after_lang[..end].trim();
        }
        return after_lang.trim();
    }
    trimmed
}

#[async_trait]
impl DecisionOracle for LlmOracle {
    async fn decide(
        &self,
        request: &SearchRequest,
        current_path: &str,
        candidates: &[Candidate],
        attempt: u32,
        depth: u32,
    ) -> Result<Decision, OracleError> {
        let prompt = prompts::decision_prompt(request, current_path, candidates, attempt, depth);
        let response = self.complete(&prompt).await?;
        let decision: Decision = serde_json::from_str(extract_json(&response))
            .map_err(|err| OracleError::Malformed(format!("{err}: {response}")))?;
        debug!(action = ?decision.action, chosen = %decision.name, "oracle decided");
        Ok(decision)
    }
}

#[async_trait]
impl RelevanceVerifier for LlmOracle {
    async fn score_relevance(
        &self,
        request: &SearchRequest,
        file_name: &str,
        text: &str,
    ) -> Result<FileRelevance, OracleError> {
        let prompt = prompts::relevance_prompt(request, file_name, text);
        let response = self.complete(&prompt).await?;
        match serde_json::from_str::<RawJudgment>(extract_json(&response)) {
            Ok(raw) => Ok(FileRelevance {
                score: FileRelevance::snap_score(raw.score),
                is_match: raw.is_match,
                reason: raw.reason,
            }),
            Err(err) => {
                warn!(error = %err, "unparseable relevance judgment, treating as non-match");
                Ok(FileRelevance::no_match("verifier returned no parseable judgment"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_plain() {
        assert_eq!(extract_json(r#"{"action": "stop"}"#), r#"{"action": "stop"}"#);
    }

    #[test]
    fn test_extract_json_fenced() {
        let input = "```json\n{\"action\": \"stop\"}\n```";
        assert_eq!(extract_json(input), r#"{"action": "stop"}"#);
    }

    #[test]
    fn test_extract_json_fenced_without_language() {
        let input = "```\n{\"score\": 1.0}\n```";
        assert_eq!(extract_json(input), r#"{"score": 1.0}"#);
    }

    #[test]
    fn test_extract_json_with_preamble() {
        let input = "Here you go:\n```json\n{\"ok\": true}\n```\nanything else?";
        assert_eq!(extract_json(input), r#"{"ok": true}"#);
    }
}
