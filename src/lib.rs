//! Wayfinder - Agentic drive search
//!
//! Wayfinder locates a single target file inside a large OneDrive-style
//! drive by walking the folder tree one node at a time: list the children of
//! the current node, ask an LLM oracle for the most promising next step,
//! descend or select a file, and verify the selected file's content against
//! the original query. The search is bounded by a verification attempt
//! budget and a depth bound.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): search state, decisions, reports, and the
//!   trait seams for every external collaborator
//! - **Application Layer** (`application`): the traversal controller state
//!   machine
//! - **Infrastructure Layer** (`infrastructure`): Graph drive client, LLM
//!   oracle client, document conversion, configuration
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wayfinder::application::TraversalController;
//! use wayfinder::domain::models::SearchRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let controller = TraversalController::new(tree, oracle, verifier, converter);
//!     let report = controller.run(SearchRequest::new("find my resume")).await?;
//!     println!("matched: {}", report.matched);
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use application::TraversalController;
pub use domain::errors::{SearchError, SearchResult};
pub use domain::models::{
    Candidate, Config, Decision, DecisionAction, DecisionStep, FileRelevance, FoundFile, NodeKind,
    RawItem, RejectedPath, SearchOutcome, SearchReport, SearchRequest, TraversalState,
};
pub use domain::ports::{
    ConvertError, DecisionOracle, DocumentConverter, OracleError, RelevanceVerifier, TreeSource,
    TreeSourceError,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
