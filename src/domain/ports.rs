//! Trait seams for the external collaborators the traversal controller
//! depends on: the tree source, the decision oracle, the relevance verifier,
//! and the document converter. Concrete implementations live in the
//! infrastructure layer; tests substitute scripted fakes.

use async_trait::async_trait;

use super::models::{Candidate, Decision, FileRelevance, RawItem, SearchRequest};

/// Error type for tree source operations
#[derive(Debug, thiserror::Error)]
pub enum TreeSourceError {
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

/// Error type for oracle and verifier calls
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("Oracle returned no parseable decision: {0}")]
    Malformed(String),

    #[error("Oracle request failed: {0}")]
    RequestFailed(String),
}

/// Error type for document-to-text conversion
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Unsupported format: {0}")]
    Unsupported(String),

    #[error("Conversion failed: {0}")]
    Failed(String),
}

/// Read-only view of the hierarchical store.
///
/// The controller issues exactly one call at a time; implementations do not
/// need to support concurrent use within a single run.
#[async_trait]
pub trait TreeSource: Send + Sync {
    /// Resolve a slash-delimited path (e.g. `/Work/Reports`) to a node id.
    async fn resolve_path(&self, path: &str) -> Result<String, TreeSourceError>;

    /// List the immediate children of the drive root.
    async fn list_root(&self) -> Result<Vec<RawItem>, TreeSourceError>;

    /// List the immediate children of a node.
    async fn list_children(&self, node_id: &str) -> Result<Vec<RawItem>, TreeSourceError>;

    /// Fetch the raw bytes of a file.
    async fn fetch_bytes(&self, file_id: &str) -> Result<Vec<u8>, TreeSourceError>;
}

/// Pluggable decision procedure: given the request and the current listing,
/// return exactly one structured decision.
#[async_trait]
pub trait DecisionOracle: Send + Sync {
    async fn decide(
        &self,
        request: &SearchRequest,
        current_path: &str,
        candidates: &[Candidate],
        attempt: u32,
        depth: u32,
    ) -> Result<Decision, OracleError>;
}

/// Judges whether a selected file's textual content satisfies the request.
#[async_trait]
pub trait RelevanceVerifier: Send + Sync {
    async fn score_relevance(
        &self,
        request: &SearchRequest,
        file_name: &str,
        text: &str,
    ) -> Result<FileRelevance, OracleError>;
}

/// Turns arbitrary file bytes into a textual rendering for verification.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn to_text(
        &self,
        bytes: &[u8],
        file_name: &str,
        content_type: Option<&str>,
    ) -> Result<String, ConvertError>;
}
