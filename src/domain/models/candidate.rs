use serde::{Deserialize, Serialize};

/// Sentinel node identifier for the drive root.
///
/// The Graph API addresses the root through a dedicated endpoint rather than
/// an item id, so the traversal state carries this marker until the first
/// descend replaces it with a real item id.
pub const ROOT_NODE: &str = "root";

/// Discriminator for tree entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Folder,
    File,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Folder => write!(f, "folder"),
            NodeKind::File => write!(f, "file"),
        }
    }
}

/// Raw child entry as returned by the tree source, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItem {
    pub id: String,
    pub name: String,
    /// True for folder entries, false for file entries.
    pub is_folder: bool,
    /// Content-type hint for file entries (e.g. "application/pdf").
    pub content_type: Option<String>,
    /// Parent path hint relative to the drive root, when the backend reports one.
    pub parent_path: Option<String>,
}

/// Normalized, minimal-metadata view of one child node offered to the
/// decision step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub content_type: Option<String>,
    pub parent_path: Option<String>,
}

impl Candidate {
    /// Normalize a raw listing entry into a candidate.
    pub fn from_raw(item: RawItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            kind: if item.is_folder {
                NodeKind::Folder
            } else {
                NodeKind::File
            },
            content_type: item.content_type,
            parent_path: item.parent_path,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_folder() {
        let raw = RawItem {
            id: "id1".to_string(),
            name: "Work".to_string(),
            is_folder: true,
            content_type: None,
            parent_path: Some("/".to_string()),
        };
        let candidate = Candidate::from_raw(raw);
        assert_eq!(candidate.kind, NodeKind::Folder);
        assert!(candidate.is_folder());
    }

    #[test]
    fn test_from_raw_file_keeps_content_type() {
        let raw = RawItem {
            id: "id2".to_string(),
            name: "resume.pdf".to_string(),
            is_folder: false,
            content_type: Some("application/pdf".to_string()),
            parent_path: None,
        };
        let candidate = Candidate::from_raw(raw);
        assert_eq!(candidate.kind, NodeKind::File);
        assert_eq!(candidate.content_type.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(NodeKind::Folder.to_string(), "folder");
        assert_eq!(NodeKind::File.to_string(), "file");
    }
}
