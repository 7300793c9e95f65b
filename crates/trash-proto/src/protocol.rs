use serde::{Deserialize, Serialize};

/// Namespace segment the server extension mounts its handlers under.
pub const API_NAMESPACE: &str = "jupyterlab-trash-mgmt-extension";

/// REST endpoints exposed by the server extension, relative to the namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Status,
    List,
    Restore,
    Delete,
    Empty,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::List => "list",
            Self::Restore => "restore",
            Self::Delete => "delete",
            Self::Empty => "empty",
        }
    }

    pub fn method(self) -> reqwest::Method {
        match self {
            Self::Status | Self::List => reqwest::Method::GET,
            Self::Restore | Self::Delete | Self::Empty => reqwest::Method::POST,
        }
    }
}

/// One deleted item as reported by the server. Immutable on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrashEntry {
    pub name: String,
    /// Opaque server-side identifier used for restore/delete.
    pub trash_path: String,
    #[serde(default)]
    pub original_path: String,
    /// ISO-8601 string; may be empty or malformed.
    #[serde(rename = "deletion_date", default)]
    pub deletion_timestamp: String,
    #[serde(rename = "size", default)]
    pub size_bytes: u64,
    /// Human-readable size, rendered verbatim.
    #[serde(rename = "size_formatted", default)]
    pub size_display: String,
    #[serde(rename = "is_dir", default)]
    pub is_directory: bool,
}

/// Full snapshot of the trash returned by `list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrashListing {
    #[serde(rename = "items", default)]
    pub entries: Vec<TrashEntry>,
    #[serde(default)]
    pub total_size: u64,
    #[serde(rename = "total_size_formatted", default)]
    pub total_size_display: String,
    #[serde(default)]
    pub item_count: usize,
}

impl TrashListing {
    /// Whether the server's aggregate count agrees with the entries it sent.
    pub fn count_matches(&self) -> bool {
        self.item_count == self.entries.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub trash_enabled: bool,
}

/// Request body for `restore` and `delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashPathRequest {
    pub trash_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub restored_to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub deleted_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_decodes_server_payload() {
        let raw = r#"{
            "items": [{
                "name": "notes.ipynb",
                "trash_path": "/home/u/.local/share/Trash/files/notes.ipynb",
                "original_path": "/home/u/work/notes.ipynb",
                "deletion_date": "2024-01-15T10:30:00",
                "size": 2048,
                "size_formatted": "2.0 KB",
                "is_dir": false
            }],
            "total_size": 2048,
            "total_size_formatted": "2.0 KB",
            "item_count": 1
        }"#;
        let listing: TrashListing = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.entries.len(), 1);
        let e = &listing.entries[0];
        assert_eq!(e.deletion_timestamp, "2024-01-15T10:30:00");
        assert_eq!(e.size_bytes, 2048);
        assert_eq!(e.size_display, "2.0 KB");
        assert!(!e.is_directory);
        assert!(listing.count_matches());
    }

    #[test]
    fn test_entry_tolerates_missing_optional_fields() {
        let raw = r#"{"name": "old", "trash_path": "/t/old"}"#;
        let e: TrashEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(e.deletion_timestamp, "");
        assert_eq!(e.size_bytes, 0);
        assert!(!e.is_directory);
    }

    #[test]
    fn test_count_mismatch_detected() {
        let listing = TrashListing {
            item_count: 3,
            ..Default::default()
        };
        assert!(!listing.count_matches());
    }

    #[test]
    fn test_endpoint_methods() {
        assert_eq!(Endpoint::List.method(), reqwest::Method::GET);
        assert_eq!(Endpoint::Empty.method(), reqwest::Method::POST);
        assert_eq!(Endpoint::Restore.path(), "restore");
    }
}
