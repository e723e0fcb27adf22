use serde::{Deserialize, Serialize};

/// Main configuration structure for Wayfinder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Drive (Microsoft Graph) client configuration
    #[serde(default)]
    pub drive: DriveConfig,

    /// Decision/verification oracle configuration
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Document conversion configuration
    #[serde(default)]
    pub converter: ConverterConfig,

    /// HTTP retry policy configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Traversal defaults
    #[serde(default)]
    pub traversal: TraversalConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Microsoft Graph drive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DriveConfig {
    /// Graph API base URL
    #[serde(default = "default_drive_base_url")]
    pub base_url: String,

    /// OAuth access token; falls back to the GRAPH_ACCESS_TOKEN env var
    #[serde(default)]
    pub access_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_drive_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_drive_base_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

const fn default_drive_timeout_secs() -> u64 {
    30
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            base_url: default_drive_base_url(),
            access_token: None,
            timeout_secs: default_drive_timeout_secs(),
        }
    }
}

/// LLM oracle configuration (OpenAI-compatible chat completions endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OracleConfig {
    /// Base URL of the chat completions API
    #[serde(default = "default_oracle_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_oracle_model")]
    pub model: String,

    /// API key; falls back to the OPENAI_API_KEY env var
    #[serde(default)]
    pub api_key: Option<String>,

    /// Maximum tokens for a single response
    #[serde(default = "default_oracle_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (0.0-1.0); decisions want determinism
    #[serde(default = "default_oracle_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_oracle_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_oracle_model() -> String {
    "gpt-4o-mini".to_string()
}

const fn default_oracle_max_tokens() -> u32 {
    1024
}

const fn default_oracle_temperature() -> f32 {
    0.0
}

const fn default_oracle_timeout_secs() -> u64 {
    120
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_oracle_base_url(),
            model: default_oracle_model(),
            api_key: None,
            max_tokens: default_oracle_max_tokens(),
            temperature: default_oracle_temperature(),
            timeout_secs: default_oracle_timeout_secs(),
        }
    }
}

/// Document conversion configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConverterConfig {
    /// Remote conversion service URL for rich document formats; when unset,
    /// only inline text decoding is available
    #[serde(default)]
    pub service_url: Option<String>,
}

/// Retry policy configuration for the HTTP clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retries for transient errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

const fn default_max_backoff_ms() -> u64 {
    15_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Traversal defaults applied when a request does not override them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TraversalConfig {
    /// Default verification attempt budget
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Default bound on descend steps
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_max_depth() -> u32 {
    32
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            max_depth: default_max_depth(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
