pub mod candidate;
pub mod config;
pub mod decision;
pub mod search;

pub use candidate::{Candidate, NodeKind, RawItem, ROOT_NODE};
pub use config::{
    Config, ConverterConfig, DriveConfig, LoggingConfig, OracleConfig, RetryConfig,
    TraversalConfig,
};
pub use decision::{Decision, DecisionAction, DecisionStep};
pub use search::{
    FileRelevance, FoundFile, RejectedPath, SearchOutcome, SearchReport, SearchRequest,
    TraversalState,
};
