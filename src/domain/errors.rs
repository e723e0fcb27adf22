//! Domain errors for the Wayfinder traversal system.

use thiserror::Error;

/// Run-level errors that abort a search before a normal terminal report
/// can be produced.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid search request: {0}")]
    InvalidRequest(String),

    #[error("Start path could not be resolved: {0}")]
    ResolutionFailed(String),

    #[error("Tree source failure: {0}")]
    TreeSource(String),
}

pub type SearchResult<T> = Result<T, SearchError>;
