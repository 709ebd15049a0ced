// src/api/responses.rs
//! Wire types for the repository root endpoint and the HTTP response envelope.

use serde::{Deserialize, Serialize};

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    /// Request URL with credentials removed.
    pub url: String,
}

/// The repository root (`GET /api/v2`), trimmed to what queries need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    #[serde(default)]
    pub refs: Vec<ApiRef>,
}

/// A content release a query can be pinned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRef {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

impl ApiInfo {
    /// The published-content ref every public query uses.
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_ref_is_selected() {
        let info: ApiInfo = serde_json::from_str(
            r#"{
                "refs": [
                    { "id": "release", "ref": "YEp-release", "label": "Spring", "isMasterRef": false },
                    { "id": "master", "ref": "YEp-master", "label": "Master", "isMasterRef": true }
                ],
                "types": { "posts": "Posts" }
            }"#,
        )
        .unwrap();
        assert_eq!(info.master_ref(), Some("YEp-master"));
    }

    #[test]
    fn test_missing_master_ref() {
        let info: ApiInfo = serde_json::from_str(r#"{ "refs": [] }"#).unwrap();
        assert_eq!(info.master_ref(), None);
    }
}
