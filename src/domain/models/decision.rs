use serde::{Deserialize, Serialize};

use super::candidate::{Candidate, NodeKind};

/// Action chosen by the decision oracle for the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    /// Descend into the chosen folder.
    EnterFolder,
    /// Select the chosen file as the answer and move to verification.
    SelectFile,
    /// Nothing here is relevant; terminate the search.
    Stop,
}

/// One validated oracle decision.
///
/// The oracle returns strict JSON matching this shape; anything that fails to
/// deserialize is a typed oracle error, never a silent fallback guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub action: DecisionAction,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub reason: String,
}

impl Decision {
    /// Kind of the chosen node implied by the action.
    pub fn chosen_kind(&self) -> NodeKind {
        match self.action {
            DecisionAction::SelectFile => NodeKind::File,
            _ => NodeKind::Folder,
        }
    }
}

/// Audit-log entry for one decision step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionStep {
    pub attempt: u32,
    pub depth: u32,
    pub chosen_id: String,
    pub chosen_name: String,
    pub chosen_kind: NodeKind,
    pub reason: String,
    /// Names of every candidate that was not chosen.
    pub alternatives: Vec<String>,
}

impl DecisionStep {
    /// Build a trace entry from a decision against the candidate list it was
    /// made over. Alternatives exclude exactly the chosen candidate.
    pub fn record(decision: &Decision, candidates: &[Candidate], attempt: u32, depth: u32) -> Self {
        Self {
            attempt,
            depth,
            chosen_id: decision.id.clone(),
            chosen_name: decision.name.clone(),
            chosen_kind: decision.chosen_kind(),
            reason: decision.reason.clone(),
            alternatives: candidates
                .iter()
                .filter(|c| c.id != decision.id)
                .map(|c| c.name.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::candidate::RawItem;

    fn candidate(id: &str, name: &str, is_folder: bool) -> Candidate {
        Candidate::from_raw(RawItem {
            id: id.to_string(),
            name: name.to_string(),
            is_folder,
            content_type: None,
            parent_path: None,
        })
    }

    #[test]
    fn test_action_deserializes_snake_case() {
        let decision: Decision = serde_json::from_str(
            r#"{"action": "enter_folder", "id": "a", "name": "Work", "reason": "likely"}"#,
        )
        .unwrap();
        assert_eq!(decision.action, DecisionAction::EnterFolder);
        assert_eq!(decision.chosen_kind(), NodeKind::Folder);
    }

    #[test]
    fn test_unknown_action_is_an_error() {
        let result = serde_json::from_str::<Decision>(
            r#"{"action": "guess", "id": "a", "name": "b", "reason": ""}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_record_excludes_exactly_the_chosen_candidate() {
        let candidates = vec![
            candidate("a", "Work", true),
            candidate("b", "Personal", true),
            candidate("c", "notes.txt", false),
        ];
        let decision = Decision {
            action: DecisionAction::EnterFolder,
            id: "b".to_string(),
            name: "Personal".to_string(),
            reason: "query mentions personal files".to_string(),
        };

        let step = DecisionStep::record(&decision, &candidates, 1, 0);
        assert_eq!(step.alternatives, vec!["Work", "notes.txt"]);
        assert_eq!(step.chosen_name, "Personal");
        assert_eq!(step.chosen_kind, NodeKind::Folder);
    }

    #[test]
    fn test_record_select_file_kind() {
        let candidates = vec![candidate("c", "notes.txt", false)];
        let decision = Decision {
            action: DecisionAction::SelectFile,
            id: "c".to_string(),
            name: "notes.txt".to_string(),
            reason: String::new(),
        };
        let step = DecisionStep::record(&decision, &candidates, 2, 3);
        assert_eq!(step.chosen_kind, NodeKind::File);
        assert!(step.alternatives.is_empty());
        assert_eq!(step.attempt, 2);
        assert_eq!(step.depth, 3);
    }
}
