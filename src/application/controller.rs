//! The traversal controller: a bounded best-first search over a
//! lazily-revealed drive tree.
//!
//! One run owns one [`TraversalState`] and drives it through the loop
//! `resolve -> list -> decide -> {list | verify | done}` until a terminal
//! outcome is reached. The controller is strictly sequential: exactly one
//! listing, one decision, and one verification are in flight at a time, and
//! collaborator calls are awaited in order, never fanned out.
//!
//! Failure policy:
//! - A start path that does not resolve aborts before the loop starts.
//! - A listing or fetch failure aborts the current run; the controller does
//!   not re-issue tree source calls (transport retries live inside the
//!   clients).
//! - An oracle failure terminates the run with a normal report carrying the
//!   `OracleFailed` outcome; the oracle call is never retried.
//! - A conversion failure degrades to an empty text body and flows through
//!   the ordinary rejection/budget path.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::{SearchError, SearchResult};
use crate::domain::models::{
    Candidate, DecisionAction, DecisionStep, SearchOutcome, SearchReport, SearchRequest,
    TraversalState, ROOT_NODE,
};
use crate::domain::ports::{DecisionOracle, DocumentConverter, RelevanceVerifier, TreeSource};

/// Drives one search over the tree source, consulting the oracle at every
/// node and the verifier on every selected file.
pub struct TraversalController {
    tree: Arc<dyn TreeSource>,
    oracle: Arc<dyn DecisionOracle>,
    verifier: Arc<dyn RelevanceVerifier>,
    converter: Arc<dyn DocumentConverter>,
}

impl TraversalController {
    pub fn new(
        tree: Arc<dyn TreeSource>,
        oracle: Arc<dyn DecisionOracle>,
        verifier: Arc<dyn RelevanceVerifier>,
        converter: Arc<dyn DocumentConverter>,
    ) -> Self {
        Self {
            tree,
            oracle,
            verifier,
            converter,
        }
    }

    /// Run one search to completion and read out the terminal report.
    pub async fn run(&self, request: SearchRequest) -> SearchResult<SearchReport> {
        Self::validate_request(&request)?;

        let mut state = TraversalState::new();
        state.current_node = self.resolve_start(&request).await?;
        info!(
            query = %request.query,
            start_node = %state.current_node,
            max_attempts = request.max_attempts,
            "search started"
        );

        loop {
            self.list_step(&mut state).await?;

            // A dead-end branch terminates the whole search; there is no
            // backtracking to a sibling branch.
            if state.candidates.is_empty() {
                info!(path = %state.path_string(), "empty listing, dead end");
                state.done = true;
                return Ok(state.into_report(SearchOutcome::DeadEnd));
            }

            let decision = match self
                .oracle
                .decide(
                    &request,
                    &state.path_string(),
                    &state.candidates,
                    state.attempt,
                    state.depth,
                )
                .await
            {
                Ok(decision) => decision,
                Err(err) => {
                    warn!(error = %err, "oracle failure, terminating run");
                    state.done = true;
                    return Ok(state.into_report(SearchOutcome::OracleFailed));
                }
            };

            state.decision_trace.push(DecisionStep::record(
                &decision,
                &state.candidates,
                state.attempt,
                state.depth,
            ));
            debug!(
                action = ?decision.action,
                chosen = %decision.name,
                path = %state.path_string(),
                "decision recorded"
            );

            match decision.action {
                DecisionAction::EnterFolder => {
                    if state.depth + 1 > request.max_depth {
                        warn!(
                            max_depth = request.max_depth,
                            "depth bound reached, terminating run"
                        );
                        state.done = true;
                        return Ok(state.into_report(SearchOutcome::DeadEnd));
                    }
                    state.enter_folder(&decision.id, &decision.name);
                }
                DecisionAction::Stop => {
                    info!(path = %state.path_string(), "oracle stopped the search");
                    state.done = true;
                    return Ok(state.into_report(SearchOutcome::Stopped));
                }
                DecisionAction::SelectFile => {
                    state.select_file(&decision.id, &decision.name);
                    if let Some(outcome) = self.verify_selection(&request, &mut state).await? {
                        return Ok(state.into_report(outcome));
                    }
                    // Rejected within budget: resume listing at the current
                    // node so remaining siblings stay reachable. The start
                    // node is never reset.
                }
            }
        }
    }

    fn validate_request(request: &SearchRequest) -> SearchResult<()> {
        if request.query.trim().is_empty() {
            return Err(SearchError::InvalidRequest("query is empty".to_string()));
        }
        if request.max_attempts == 0 {
            return Err(SearchError::InvalidRequest(
                "max_attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Determine the initial node: explicit id verbatim, else resolve the
    /// explicit path, else the root sentinel. Runs exactly once per search.
    async fn resolve_start(&self, request: &SearchRequest) -> SearchResult<String> {
        if let Some(id) = &request.start_node_id {
            return Ok(id.clone());
        }
        if let Some(path) = &request.start_path {
            return self
                .tree
                .resolve_path(path)
                .await
                .map_err(|err| SearchError::ResolutionFailed(format!("{path}: {err}")));
        }
        Ok(ROOT_NODE.to_string())
    }

    /// Fetch and normalize the children of the current node, fully replacing
    /// the candidate list.
    async fn list_step(&self, state: &mut TraversalState) -> SearchResult<()> {
        let items = if state.current_node == ROOT_NODE {
            self.tree.list_root().await
        } else {
            self.tree.list_children(&state.current_node).await
        }
        .map_err(|err| SearchError::TreeSource(err.to_string()))?;

        debug!(
            node = %state.current_node,
            count = items.len(),
            "listing fetched"
        );
        state.apply_listing(items.into_iter().map(Candidate::from_raw).collect());
        Ok(())
    }

    /// Verify the selected file against the request. Returns the terminal
    /// outcome when the run is over, or `None` when a rejection left budget
    /// to continue.
    async fn verify_selection(
        &self,
        request: &SearchRequest,
        state: &mut TraversalState,
    ) -> SearchResult<Option<SearchOutcome>> {
        let Some(file) = state.selected_file.clone() else {
            return Ok(None);
        };

        let bytes = self
            .tree
            .fetch_bytes(&file.id)
            .await
            .map_err(|err| SearchError::TreeSource(err.to_string()))?;

        let content_type = state
            .candidates
            .iter()
            .find(|c| c.id == file.id)
            .and_then(|c| c.content_type.clone());

        let text = match self
            .converter
            .to_text(&bytes, &file.name, content_type.as_deref())
            .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!(file = %file.name, error = %err, "conversion failed, using empty text");
                String::new()
            }
        };

        let relevance = match self
            .verifier
            .score_relevance(request, &file.name, &text)
            .await
        {
            Ok(relevance) => relevance,
            Err(err) => {
                warn!(error = %err, "verifier failure, terminating run");
                state.selected_file = None;
                state.done = true;
                return Ok(Some(SearchOutcome::OracleFailed));
            }
        };

        if relevance.is_match {
            info!(file = %file.name, score = relevance.score, "match verified");
            state.confirm_selection(relevance);
            return Ok(Some(SearchOutcome::Matched));
        }

        info!(
            file = %file.name,
            attempt = state.attempt,
            reason = %relevance.reason,
            "selection rejected"
        );
        if state.reject_selection(relevance.reason, request.max_attempts) {
            info!(attempts = state.attempt, "attempt budget exhausted");
            state.done = true;
            return Ok(Some(SearchOutcome::Exhausted));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::models::{Decision, FileRelevance, RawItem};
    use crate::domain::ports::{ConvertError, OracleError, TreeSourceError};

    fn folder(id: &str, name: &str) -> RawItem {
        RawItem {
            id: id.to_string(),
            name: name.to_string(),
            is_folder: true,
            content_type: None,
            parent_path: None,
        }
    }

    fn file(id: &str, name: &str) -> RawItem {
        RawItem {
            id: id.to_string(),
            name: name.to_string(),
            is_folder: false,
            content_type: Some("text/plain".to_string()),
            parent_path: None,
        }
    }

    #[derive(Default)]
    struct FakeTree {
        root: Vec<RawItem>,
        children: HashMap<String, Vec<RawItem>>,
        bytes: HashMap<String, Vec<u8>>,
        paths: HashMap<String, String>,
    }

    #[async_trait]
    impl TreeSource for FakeTree {
        async fn resolve_path(&self, path: &str) -> Result<String, TreeSourceError> {
            self.paths
                .get(path)
                .cloned()
                .ok_or_else(|| TreeSourceError::PathNotFound(path.to_string()))
        }

        async fn list_root(&self) -> Result<Vec<RawItem>, TreeSourceError> {
            Ok(self.root.clone())
        }

        async fn list_children(&self, node_id: &str) -> Result<Vec<RawItem>, TreeSourceError> {
            Ok(self.children.get(node_id).cloned().unwrap_or_default())
        }

        async fn fetch_bytes(&self, file_id: &str) -> Result<Vec<u8>, TreeSourceError> {
            self.bytes
                .get(file_id)
                .cloned()
                .ok_or_else(|| TreeSourceError::ItemNotFound(file_id.to_string()))
        }
    }

    struct ScriptedOracle {
        decisions: Mutex<VecDeque<Result<Decision, OracleError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedOracle {
        fn new(decisions: Vec<Result<Decision, OracleError>>) -> Self {
            Self {
                decisions: Mutex::new(decisions.into()),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl DecisionOracle for ScriptedOracle {
        async fn decide(
            &self,
            _request: &SearchRequest,
            _current_path: &str,
            _candidates: &[Candidate],
            _attempt: u32,
            _depth: u32,
        ) -> Result<Decision, OracleError> {
            *self.calls.lock().unwrap() += 1;
            self.decisions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(OracleError::Malformed("script exhausted".to_string())))
        }
    }

    struct ScriptedVerifier {
        judgments: Mutex<VecDeque<FileRelevance>>,
        seen_texts: Mutex<Vec<String>>,
    }

    impl ScriptedVerifier {
        fn new(judgments: Vec<FileRelevance>) -> Self {
            Self {
                judgments: Mutex::new(judgments.into()),
                seen_texts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RelevanceVerifier for ScriptedVerifier {
        async fn score_relevance(
            &self,
            _request: &SearchRequest,
            _file_name: &str,
            text: &str,
        ) -> Result<FileRelevance, OracleError> {
            self.seen_texts.lock().unwrap().push(text.to_string());
            Ok(self
                .judgments
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| FileRelevance::no_match("script exhausted")))
        }
    }

    struct Utf8Converter;

    #[async_trait]
    impl DocumentConverter for Utf8Converter {
        async fn to_text(
            &self,
            bytes: &[u8],
            _file_name: &str,
            _content_type: Option<&str>,
        ) -> Result<String, ConvertError> {
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    struct FailingConverter;

    #[async_trait]
    impl DocumentConverter for FailingConverter {
        async fn to_text(
            &self,
            _bytes: &[u8],
            _file_name: &str,
            _content_type: Option<&str>,
        ) -> Result<String, ConvertError> {
            Err(ConvertError::Failed("converter offline".to_string()))
        }
    }

    fn enter(id: &str, name: &str) -> Result<Decision, OracleError> {
        Ok(Decision {
            action: DecisionAction::EnterFolder,
            id: id.to_string(),
            name: name.to_string(),
            reason: "looks promising".to_string(),
        })
    }

    fn select(id: &str, name: &str) -> Result<Decision, OracleError> {
        Ok(Decision {
            action: DecisionAction::SelectFile,
            id: id.to_string(),
            name: name.to_string(),
            reason: "likely the answer".to_string(),
        })
    }

    fn matching() -> FileRelevance {
        FileRelevance {
            score: 1.0,
            is_match: true,
            reason: "content matches".to_string(),
        }
    }

    fn controller(
        tree: FakeTree,
        oracle: Arc<ScriptedOracle>,
        verifier: Arc<ScriptedVerifier>,
    ) -> TraversalController {
        TraversalController::new(Arc::new(tree), oracle, verifier, Arc::new(Utf8Converter))
    }

    #[tokio::test]
    async fn test_empty_query_is_invalid() {
        let controller = controller(
            FakeTree::default(),
            Arc::new(ScriptedOracle::new(vec![])),
            Arc::new(ScriptedVerifier::new(vec![])),
        );
        let result = controller.run(SearchRequest::new("  ")).await;
        assert!(matches!(result, Err(SearchError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_zero_attempts_is_invalid() {
        let controller = controller(
            FakeTree::default(),
            Arc::new(ScriptedOracle::new(vec![])),
            Arc::new(ScriptedVerifier::new(vec![])),
        );
        let result = controller
            .run(SearchRequest::new("find it").with_max_attempts(0))
            .await;
        assert!(matches!(result, Err(SearchError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_explicit_start_id_is_used_verbatim() {
        let mut tree = FakeTree::default();
        tree.children
            .insert("folder-7".to_string(), vec![file("f1", "notes.txt")]);
        tree.bytes.insert("f1".to_string(), b"hello".to_vec());

        let oracle = Arc::new(ScriptedOracle::new(vec![select("f1", "notes.txt")]));
        let verifier = Arc::new(ScriptedVerifier::new(vec![matching()]));
        let controller = controller(tree, oracle, verifier);

        let report = controller
            .run(SearchRequest::new("notes").with_start_node_id("folder-7"))
            .await
            .unwrap();
        assert!(report.matched);
    }

    #[tokio::test]
    async fn test_unresolvable_start_path_aborts_before_loop() {
        let oracle = Arc::new(ScriptedOracle::new(vec![]));
        let controller = controller(
            FakeTree::default(),
            oracle.clone(),
            Arc::new(ScriptedVerifier::new(vec![])),
        );

        let result = controller
            .run(SearchRequest::new("anything").with_start_path("/no/such/place"))
            .await;
        assert!(matches!(result, Err(SearchError::ResolutionFailed(_))));
        assert_eq!(oracle.call_count(), 0, "loop must not have started");
    }

    #[tokio::test]
    async fn test_start_path_resolves_through_tree_source() {
        let mut tree = FakeTree::default();
        tree.paths
            .insert("/Work".to_string(), "work-id".to_string());
        tree.children
            .insert("work-id".to_string(), vec![file("f1", "report.pdf")]);
        tree.bytes.insert("f1".to_string(), b"quarterly".to_vec());

        let oracle = Arc::new(ScriptedOracle::new(vec![select("f1", "report.pdf")]));
        let verifier = Arc::new(ScriptedVerifier::new(vec![matching()]));
        let controller = controller(tree, oracle, verifier);

        let report = controller
            .run(SearchRequest::new("the report").with_start_path("/Work"))
            .await
            .unwrap();
        assert!(report.matched);
        assert_eq!(report.file.unwrap().path, "/report.pdf");
    }

    #[tokio::test]
    async fn test_oracle_failure_terminates_without_retry() {
        let mut tree = FakeTree::default();
        tree.root = vec![folder("a", "Work")];

        let oracle = Arc::new(ScriptedOracle::new(vec![Err(OracleError::Malformed(
            "not json".to_string(),
        ))]));
        let controller = controller(tree, oracle.clone(), Arc::new(ScriptedVerifier::new(vec![])));

        let report = controller.run(SearchRequest::new("anything")).await.unwrap();
        assert!(!report.matched);
        assert_eq!(report.outcome, SearchOutcome::OracleFailed);
        assert_eq!(oracle.call_count(), 1);
        assert!(report.decision_trace.is_empty());
    }

    #[tokio::test]
    async fn test_depth_bound_terminates_as_dead_end() {
        let mut tree = FakeTree::default();
        tree.root = vec![folder("a", "A")];
        tree.children
            .insert("a".to_string(), vec![folder("b", "B")]);

        let oracle = Arc::new(ScriptedOracle::new(vec![enter("a", "A"), enter("b", "B")]));
        let controller = controller(tree, oracle, Arc::new(ScriptedVerifier::new(vec![])));

        let report = controller
            .run(SearchRequest::new("deep thing").with_max_depth(1))
            .await
            .unwrap();
        assert!(!report.matched);
        assert_eq!(report.outcome, SearchOutcome::DeadEnd);
        assert_eq!(report.decision_trace.len(), 2);
    }

    #[tokio::test]
    async fn test_conversion_failure_degrades_to_empty_text() {
        let mut tree = FakeTree::default();
        tree.root = vec![file("f1", "scan.pdf")];
        tree.bytes.insert("f1".to_string(), vec![0xff, 0xfe]);

        let oracle = Arc::new(ScriptedOracle::new(vec![select("f1", "scan.pdf")]));
        let verifier = Arc::new(ScriptedVerifier::new(vec![matching()]));
        let controller = TraversalController::new(
            Arc::new(tree),
            oracle,
            verifier.clone(),
            Arc::new(FailingConverter),
        );

        let report = controller.run(SearchRequest::new("the scan")).await.unwrap();
        assert!(report.matched, "degraded text still reaches the verifier");
        assert_eq!(verifier.seen_texts.lock().unwrap().as_slice(), &[""]);
    }

    #[tokio::test]
    async fn test_rejection_continues_at_current_node() {
        let mut tree = FakeTree::default();
        tree.root = vec![folder("a", "Work")];
        tree.children.insert(
            "a".to_string(),
            vec![file("x", "draft.txt"), file("y", "final.txt")],
        );
        tree.bytes.insert("x".to_string(), b"draft".to_vec());
        tree.bytes.insert("y".to_string(), b"final".to_vec());

        let oracle = Arc::new(ScriptedOracle::new(vec![
            enter("a", "Work"),
            select("x", "draft.txt"),
            select("y", "final.txt"),
        ]));
        let verifier = Arc::new(ScriptedVerifier::new(vec![
            FileRelevance::no_match("wrong draft"),
            matching(),
        ]));
        let controller = controller(tree, oracle, verifier);

        let report = controller.run(SearchRequest::new("the final doc")).await.unwrap();
        assert!(report.matched);
        assert_eq!(report.attempts_used, 2);
        assert_eq!(report.rejected_paths.len(), 1);
        assert_eq!(report.rejected_paths[0].path, "/Work/draft.txt");
        // Same folder was re-listed, never reset to the start node.
        assert_eq!(report.file.unwrap().path, "/Work/final.txt");
    }

    #[tokio::test]
    async fn test_alternatives_exclude_exactly_the_chosen_candidate() {
        let mut tree = FakeTree::default();
        tree.root = vec![
            folder("a", "Work"),
            folder("b", "Personal"),
            file("c", "readme.md"),
        ];
        tree.children.insert("b".to_string(), vec![]);

        let oracle = Arc::new(ScriptedOracle::new(vec![enter("b", "Personal")]));
        let controller = controller(tree, oracle, Arc::new(ScriptedVerifier::new(vec![])));

        let report = controller.run(SearchRequest::new("something")).await.unwrap();
        assert_eq!(report.decision_trace.len(), 1);
        assert_eq!(
            report.decision_trace[0].alternatives,
            vec!["Work", "readme.md"]
        );
    }
}
