//! Content-store wire types shared across the transport, client, and runtime layers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Store entry kind.
pub enum EntryKind {
    /// File entry.
    #[serde(rename = "file")]
    File,
    /// Directory entry.
    #[serde(rename = "dir")]
    Directory,
}

impl EntryKind {
    /// Returns `true` for directory entries.
    pub fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Opaque version tag the store assigns to a file's current content.
pub struct Fingerprint(pub String);

impl Fingerprint {
    /// Wraps a raw version tag.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw version tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One record of a directory listing.
pub struct StoreEntry {
    /// Display segment.
    pub name: String,
    /// Full store-relative path without a leading slash.
    pub path: String,
    /// File or directory.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Version tag (files only; ignored for directories).
    #[serde(rename = "sha", default)]
    pub fingerprint: Option<Fingerprint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single file as returned by a read.
pub struct FileContent {
    /// File name.
    #[serde(default)]
    pub name: String,
    /// Full store-relative path.
    #[serde(default)]
    pub path: String,
    /// Base64 wire text.
    pub content: String,
    /// Version tag of the returned content.
    #[serde(rename = "sha", default)]
    pub fingerprint: Option<Fingerprint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Classified answer of a listing request.
pub enum ListResult {
    /// The path is a directory.
    Entries(Vec<StoreEntry>),
    /// The path resolved to a file.
    SingleFile(FileContent),
    /// The store answered with an error payload.
    Error(String),
}

/// Classifies a listing response body by its shape.
///
/// An array is a directory listing, an object with `content` is a single file, and an object with
/// `error` is an error payload.
///
/// # Errors
///
/// Returns [`StoreError::MalformedResponse`] for non-JSON bodies and unrecognized shapes.
pub fn classify_list_payload(raw: &str) -> Result<ListResult, StoreError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| StoreError::MalformedResponse(format!("listing is not JSON: {err}")))?;
    classify_list_value(value)
}

fn classify_list_value(value: Value) -> Result<ListResult, StoreError> {
    if value.is_array() {
        return serde_json::from_value(value)
            .map(ListResult::Entries)
            .map_err(|err| StoreError::MalformedResponse(format!("bad listing entry: {err}")));
    }
    let Some(map) = value.as_object() else {
        return Err(StoreError::MalformedResponse(format!(
            "unexpected listing shape: {value}"
        )));
    };
    if let Some(message) = map.get("error") {
        return Ok(ListResult::Error(error_message(message)));
    }
    if !map.get("content").is_some_and(|content| !content.is_null()) {
        return Err(StoreError::MalformedResponse(
            "object without `content` or `error`".to_string(),
        ));
    }
    serde_json::from_value(value)
        .map(ListResult::SingleFile)
        .map_err(|err| StoreError::MalformedResponse(format!("bad file payload: {err}")))
}

/// Extracts a human-readable message from an `error` field or whole error body.
pub fn error_message(value: &Value) -> String {
    match value {
        Value::String(message) => message.clone(),
        Value::Object(map) => map
            .get("error")
            .or_else(|| map.get("message"))
            .map(error_message)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Body of a `PUT` request.
pub struct WriteBody {
    /// Base64 wire text.
    pub content: String,
    /// Last-known version tag; `null` creates a new file.
    pub sha: Option<Fingerprint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Body of a `DELETE` request.
pub struct DeleteBody {
    /// Version tag of the content being deleted.
    pub sha: Fingerprint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Body returned by `GET /verify`.
pub struct VerifyResponse {
    /// Whether the credential was accepted.
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Outcome of a successful write.
pub struct WriteReceipt {
    /// Version tag of the newly stored content, when the store reported one.
    pub fingerprint: Option<Fingerprint>,
}

impl WriteReceipt {
    /// Reads the new version tag from `content.sha` (or a top-level `sha`).
    pub fn from_body(raw: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(raw) else {
            return Self::default();
        };
        let sha = value
            .get("content")
            .and_then(|content| content.get("sha"))
            .or_else(|| value.get("sha"))
            .and_then(Value::as_str);
        Self {
            fingerprint: sha.map(Fingerprint::new),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// HTTP method used by a store request.
pub enum StoreMethod {
    /// Read or list.
    Get,
    /// Create or update.
    Put,
    /// Delete.
    Delete,
}

impl StoreMethod {
    /// Returns the HTTP method token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A request as handed to a [`crate::StoreTransport`].
pub struct StoreRequest {
    /// HTTP method.
    pub method: StoreMethod,
    /// Wire path (leading `/`, not yet percent-encoded).
    pub path: String,
    /// Caller credential sent in the credential header.
    pub credential: String,
    /// JSON body for `PUT`/`DELETE`.
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raw answer of the store.
pub struct StoreResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl StoreResponse {
    /// Builds a response from a status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn entry_kind_serde_values_match_wire_strings() {
        assert_eq!(
            serde_json::to_string(&EntryKind::Directory).expect("serialize"),
            "\"dir\""
        );
        let kind: EntryKind = serde_json::from_str("\"file\"").expect("deserialize");
        assert_eq!(kind, EntryKind::File);
    }

    #[test]
    fn classifier_discriminates_by_shape() {
        let listing = json!([
            {"name": "docs", "path": "docs", "type": "dir", "sha": "d1"},
            {"name": "a.txt", "path": "a.txt", "type": "file", "sha": "f1"}
        ]);
        match classify_list_payload(&listing.to_string()).expect("classify") {
            ListResult::Entries(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].kind, EntryKind::Directory);
                assert_eq!(entries[1].fingerprint, Some(Fingerprint::new("f1")));
            }
            other => panic!("expected entries, got {other:?}"),
        }

        let file = json!({"name": "a.txt", "path": "a.txt", "content": "aGk=", "sha": "f1"});
        assert!(matches!(
            classify_list_payload(&file.to_string()),
            Ok(ListResult::SingleFile(_))
        ));

        let error = json!({"error": "Not Found"});
        assert_eq!(
            classify_list_payload(&error.to_string()).expect("classify"),
            ListResult::Error("Not Found".to_string())
        );
    }

    #[test]
    fn classifier_rejects_unrecognized_shapes() {
        assert!(matches!(
            classify_list_payload("<html>oops</html>"),
            Err(StoreError::MalformedResponse(_))
        ));
        assert!(matches!(
            classify_list_payload("{\"name\": \"x\"}"),
            Err(StoreError::MalformedResponse(_))
        ));
        assert!(matches!(
            classify_list_payload("42"),
            Err(StoreError::MalformedResponse(_))
        ));
    }

    #[test]
    fn write_body_serializes_create_as_null_sha() {
        let body = WriteBody {
            content: "aGk=".to_string(),
            sha: None,
        };
        assert_eq!(
            serde_json::to_value(&body).expect("serialize"),
            json!({"content": "aGk=", "sha": null})
        );
    }

    #[test]
    fn write_receipt_reads_nested_or_flat_sha() {
        let nested = json!({"content": {"sha": "new1"}, "commit": {}}).to_string();
        assert_eq!(
            WriteReceipt::from_body(&nested).fingerprint,
            Some(Fingerprint::new("new1"))
        );
        assert_eq!(
            WriteReceipt::from_body("{\"sha\": \"new2\"}").fingerprint,
            Some(Fingerprint::new("new2"))
        );
        assert_eq!(WriteReceipt::from_body("ok").fingerprint, None);
    }
}
