//! Search request, traversal state, and terminal report types.
//!
//! `TraversalState` is the single mutable entity of a run. It is owned
//! exclusively by the traversal controller; every transition is a method here
//! so each one can be tested without any collaborator in play.

use serde::{Deserialize, Serialize};

use super::candidate::{Candidate, ROOT_NODE};
use super::decision::DecisionStep;

/// Immutable per-run search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text description of the file being looked for.
    pub query: String,
    /// Optional hint text describing how the drive is organized.
    #[serde(default)]
    pub drive_description: Option<String>,
    /// Explicit start node id; used verbatim when present.
    #[serde(default)]
    pub start_node_id: Option<String>,
    /// Explicit start path, resolved through the tree source when no start
    /// node id is given.
    #[serde(default)]
    pub start_path: Option<String>,
    /// Verification attempt budget.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Bound on descend steps; exceeding it terminates the run as a dead end.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_max_depth() -> u32 {
    32
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            drive_description: None,
            start_node_id: None,
            start_path: None,
            max_attempts: default_max_attempts(),
            max_depth: default_max_depth(),
        }
    }

    pub fn with_drive_description(mut self, description: impl Into<String>) -> Self {
        self.drive_description = Some(description.into());
        self
    }

    pub fn with_start_node_id(mut self, id: impl Into<String>) -> Self {
        self.start_node_id = Some(id.into());
        self
    }

    pub fn with_start_path(mut self, path: impl Into<String>) -> Self {
        self.start_path = Some(path.into());
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Relevance judgment for a selected file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRelevance {
    /// One of 0.0, 0.5, 1.0.
    pub score: f64,
    pub is_match: bool,
    pub reason: String,
}

impl FileRelevance {
    /// Judgment used when the verifier returns nothing parseable: a
    /// non-match that flows through the normal rejection path.
    pub fn no_match(reason: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            is_match: false,
            reason: reason.into(),
        }
    }

    /// Snap an arbitrary score onto the allowed {0.0, 0.5, 1.0} domain.
    pub fn snap_score(score: f64) -> f64 {
        if score < 0.25 {
            0.0
        } else if score < 0.75 {
            0.5
        } else {
            1.0
        }
    }
}

/// Currently-selected (or finally matched) file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundFile {
    pub id: String,
    pub name: String,
    /// Slash-delimited path from the search start to the file.
    pub path: String,
    #[serde(default)]
    pub relevance: Option<FileRelevance>,
}

/// Record of a selected-then-disqualified file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedPath {
    pub path: String,
    pub file_name: String,
    pub rejection_reason: String,
}

/// How a run reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    /// A selected file passed content verification.
    Matched,
    /// The verification attempt budget ran out.
    Exhausted,
    /// A listing came back empty, or the depth bound was hit.
    DeadEnd,
    /// The oracle decided nothing here is relevant.
    Stopped,
    /// The oracle returned no parseable decision.
    OracleFailed,
}

/// Final output surface of one search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub matched: bool,
    pub outcome: SearchOutcome,
    pub file: Option<FoundFile>,
    pub decision_trace: Vec<DecisionStep>,
    pub rejected_paths: Vec<RejectedPath>,
    pub attempts_used: u32,
}

/// Mutable core state of one traversal, created once per request and
/// discarded after the final report is read out.
#[derive(Debug, Clone)]
pub struct TraversalState {
    /// Node currently being examined, or the root sentinel.
    pub current_node: String,
    /// Path segments accumulated while descending; `depth == current_path.len()`.
    pub current_path: Vec<String>,
    pub depth: u32,
    /// 1-based verification attempt counter; `max_attempts + 1` marks exhaustion.
    pub attempt: u32,
    /// Nodes visited so far, insertion-ordered, diagnostics only.
    pub visited_nodes: Vec<String>,
    /// Most recent listing result, fully replaced on every listing step.
    pub candidates: Vec<Candidate>,
    pub selected_file: Option<FoundFile>,
    pub decision_trace: Vec<DecisionStep>,
    pub rejected_paths: Vec<RejectedPath>,
    pub done: bool,
    pub verified: bool,
}

impl TraversalState {
    pub fn new() -> Self {
        Self {
            current_node: ROOT_NODE.to_string(),
            current_path: Vec::new(),
            depth: 0,
            attempt: 1,
            visited_nodes: Vec::new(),
            candidates: Vec::new(),
            selected_file: None,
            decision_trace: Vec::new(),
            rejected_paths: Vec::new(),
            done: false,
            verified: false,
        }
    }

    /// Slash-delimited rendering of the current path; `/` at the start.
    pub fn path_string(&self) -> String {
        if self.current_path.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", self.current_path.join("/"))
        }
    }

    /// Replace the candidate list with a fresh listing and record the visit.
    /// Prior candidates from a different node are never retained.
    pub fn apply_listing(&mut self, candidates: Vec<Candidate>) {
        if !self.visited_nodes.contains(&self.current_node) {
            self.visited_nodes.push(self.current_node.clone());
        }
        self.candidates = candidates;
    }

    /// Descend into a chosen folder.
    pub fn enter_folder(&mut self, id: &str, name: &str) {
        self.current_node = id.to_string();
        self.current_path.push(name.to_string());
        self.depth += 1;
    }

    /// Mark a file as the current selection. Does not terminate the run;
    /// verification decides that.
    pub fn select_file(&mut self, id: &str, name: &str) {
        let path = format!(
            "{}/{}",
            if self.current_path.is_empty() {
                String::new()
            } else {
                format!("/{}", self.current_path.join("/"))
            },
            name
        );
        self.selected_file = Some(FoundFile {
            id: id.to_string(),
            name: name.to_string(),
            path,
            relevance: None,
        });
    }

    /// Record a failed verification: log the rejection, clear the selection,
    /// and consume one attempt. Returns true when the budget is exhausted.
    pub fn reject_selection(&mut self, reason: impl Into<String>, max_attempts: u32) -> bool {
        if let Some(file) = self.selected_file.take() {
            self.rejected_paths.push(RejectedPath {
                path: file.path,
                file_name: file.name,
                rejection_reason: reason.into(),
            });
        }
        self.attempt += 1;
        self.attempt > max_attempts
    }

    /// Attach the relevance judgment to the selected file and mark the
    /// run verified.
    pub fn confirm_selection(&mut self, relevance: FileRelevance) {
        if let Some(file) = self.selected_file.as_mut() {
            file.relevance = Some(relevance);
        }
        self.verified = true;
        self.done = true;
    }

    /// Read the terminal report out of a finished state.
    pub fn into_report(self, outcome: SearchOutcome) -> SearchReport {
        SearchReport {
            matched: self.verified,
            outcome,
            file: self.selected_file,
            decision_trace: self.decision_trace,
            rejected_paths: self.rejected_paths,
            attempts_used: self.attempt,
        }
    }
}

impl Default for TraversalState {
    fn default() -> Self {
        Self::new()
    }
}
