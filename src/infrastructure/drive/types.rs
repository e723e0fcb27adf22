//! Wire types for the Graph drive API responses.

use serde::Deserialize;

use crate::domain::models::RawItem;

/// Prefix Graph puts in front of parent paths relative to the drive root.
const ROOT_PATH_PREFIX: &str = "/drive/root:";

/// Paged listing envelope: `{"value": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DriveItemList {
    #[serde(default)]
    pub value: Vec<DriveItem>,
}

/// One drive item as Graph reports it. Folder/file facets discriminate the
/// entry kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub folder: Option<FolderFacet>,
    #[serde(default)]
    pub file: Option<FileFacet>,
    #[serde(default)]
    pub parent_reference: Option<ParentReference>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    #[serde(default)]
    pub child_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParentReference {
    #[serde(default)]
    pub path: Option<String>,
}

impl DriveItem {
    /// Normalize to the minimal metadata the traversal works with.
    pub fn into_raw(self) -> RawItem {
        let is_folder = self.folder.is_some();
        RawItem {
            id: self.id,
            name: self.name,
            is_folder,
            content_type: self.file.and_then(|f| f.mime_type),
            parent_path: self
                .parent_reference
                .and_then(|p| p.path)
                .map(|path| path.trim_start_matches(ROOT_PATH_PREFIX).to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_item_normalizes() {
        let json = r#"{
            "id": "ABC123",
            "name": "Work",
            "folder": {"childCount": 4},
            "parentReference": {"path": "/drive/root:/Archive"}
        }"#;
        let item: DriveItem = serde_json::from_str(json).unwrap();
        let raw = item.into_raw();
        assert!(raw.is_folder);
        assert_eq!(raw.content_type, None);
        assert_eq!(raw.parent_path.as_deref(), Some("/Archive"));
    }

    #[test]
    fn test_file_item_carries_mime_type() {
        let json = r#"{
            "id": "DEF456",
            "name": "resume.pdf",
            "file": {"mimeType": "application/pdf"}
        }"#;
        let item: DriveItem = serde_json::from_str(json).unwrap();
        let raw = item.into_raw();
        assert!(!raw.is_folder);
        assert_eq!(raw.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(raw.parent_path, None);
    }

    #[test]
    fn test_listing_envelope_defaults_to_empty() {
        let list: DriveItemList = serde_json::from_str("{}").unwrap();
        assert!(list.value.is_empty());
    }
}
