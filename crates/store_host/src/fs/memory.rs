//! In-memory content store that honors the backend contract, including fingerprint arbitration.
//!
//! Used by tests and offline composition. Directories are implied by file paths, the way the
//! remote store derives them from its tree.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap, HashSet},
    rc::Rc,
};

use serde_json::{json, Value};

use super::{
    codec::{decode_binary, encode_text},
    path::{file_name, normalize_store_path},
    service::{StoreFuture, StoreTransport},
    types::{
        DeleteBody, EntryKind, Fingerprint, StoreEntry, StoreMethod, StoreRequest, StoreResponse,
        WriteBody,
    },
};
use crate::error::TransportError;

/// Path answered by the credential check.
pub const VERIFY_PATH: &str = "/verify";

const WIRE_LINE_WIDTH: usize = 60;

#[derive(Debug, Clone)]
struct StoredFile {
    bytes: Vec<u8>,
    fingerprint: Fingerprint,
}

#[derive(Debug, Default)]
struct MemoryStore {
    credential: Option<String>,
    files: BTreeMap<String, StoredFile>,
    next_version: u64,
    scripted: HashMap<(&'static str, String), StoreResponse>,
    unreachable: HashSet<String>,
    failing_writes: HashSet<String>,
    requests: Vec<StoreRequest>,
}

#[derive(Debug, Clone, Default)]
/// Shared in-memory store; clones observe the same contents.
pub struct MemoryStoreTransport {
    inner: Rc<RefCell<MemoryStore>>,
}

impl MemoryStoreTransport {
    /// Creates a store that only accepts `credential`.
    pub fn with_credential(credential: impl Into<String>) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().credential = Some(credential.into());
        store
    }

    /// Stores `text` at `path` under a freshly generated fingerprint.
    pub fn insert_text(&self, path: &str, text: &str) -> Fingerprint {
        let mut inner = self.inner.borrow_mut();
        let fingerprint = inner.next_fingerprint();
        inner.files.insert(
            normalize_store_path(path),
            StoredFile {
                bytes: text.as_bytes().to_vec(),
                fingerprint: fingerprint.clone(),
            },
        );
        fingerprint
    }

    /// Stores `text` at `path` under an explicit fingerprint.
    pub fn insert_with_fingerprint(&self, path: &str, text: &str, fingerprint: &str) {
        self.inner.borrow_mut().files.insert(
            normalize_store_path(path),
            StoredFile {
                bytes: text.as_bytes().to_vec(),
                fingerprint: Fingerprint::new(fingerprint),
            },
        );
    }

    /// Returns the stored text at `path` (lossy for binary content).
    pub fn text(&self, path: &str) -> Option<String> {
        self.inner
            .borrow()
            .files
            .get(&normalize_store_path(path))
            .map(|file| String::from_utf8_lossy(&file.bytes).into_owned())
    }

    /// Returns the stored bytes at `path`.
    pub fn bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.inner
            .borrow()
            .files
            .get(&normalize_store_path(path))
            .map(|file| file.bytes.clone())
    }

    /// Returns the current fingerprint at `path`.
    pub fn fingerprint(&self, path: &str) -> Option<Fingerprint> {
        self.inner
            .borrow()
            .files
            .get(&normalize_store_path(path))
            .map(|file| file.fingerprint.clone())
    }

    /// Returns every stored file path.
    pub fn paths(&self) -> Vec<String> {
        self.inner.borrow().files.keys().cloned().collect()
    }

    /// Answers `method` on wire path `path` with `response` instead of the stored contents.
    pub fn script_response(&self, method: StoreMethod, path: &str, response: StoreResponse) {
        let key = (method.as_str(), format!("/{}", normalize_store_path(path)));
        self.inner.borrow_mut().scripted.insert(key, response);
    }

    /// Makes every request to `path` fail at the network level.
    pub fn make_unreachable(&self, path: &str) {
        self.inner
            .borrow_mut()
            .unreachable
            .insert(normalize_store_path(path));
    }

    /// Makes writes to `path` fail with a server error.
    pub fn fail_writes_to(&self, path: &str) {
        self.inner
            .borrow_mut()
            .failing_writes
            .insert(normalize_store_path(path));
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<StoreRequest> {
        self.inner.borrow().requests.clone()
    }

    /// Returns how many requests with `method` were received.
    pub fn request_count(&self, method: StoreMethod) -> usize {
        self.inner
            .borrow()
            .requests
            .iter()
            .filter(|request| request.method == method)
            .count()
    }
}

impl MemoryStore {
    fn next_fingerprint(&mut self) -> Fingerprint {
        self.next_version += 1;
        Fingerprint::new(format!("v{}", self.next_version))
    }

    fn credential_accepted(&self, credential: &str) -> bool {
        match &self.credential {
            Some(expected) => expected == credential,
            None => !credential.is_empty(),
        }
    }

    fn handle(&mut self, request: &StoreRequest) -> Result<StoreResponse, TransportError> {
        let path = normalize_store_path(&request.path);
        if self.unreachable.contains(&path) {
            return Err(TransportError::Network(format!("{} unreachable", request.path)));
        }
        let key = (request.method.as_str(), format!("/{path}"));
        if let Some(response) = self.scripted.get(&key) {
            return Ok(response.clone());
        }

        if request.method == StoreMethod::Get && format!("/{path}") == VERIFY_PATH {
            let success = self.credential_accepted(&request.credential);
            return Ok(json_response(200, json!({ "success": success })));
        }
        if !self.credential_accepted(&request.credential) {
            return Ok(json_response(401, json!({ "error": "Unauthorized" })));
        }

        Ok(match request.method {
            StoreMethod::Get => self.get(&path),
            StoreMethod::Put => self.put(&path, request.body.as_deref()),
            StoreMethod::Delete => self.delete(&path, request.body.as_deref()),
        })
    }

    fn get(&self, path: &str) -> StoreResponse {
        if let Some(file) = self.files.get(path) {
            return json_response(
                200,
                json!({
                    "name": file_name(path),
                    "path": path,
                    "type": "file",
                    "sha": file.fingerprint,
                    "size": file.bytes.len(),
                    "content": wrapped_wire_text(&file.bytes),
                    "encoding": "base64",
                }),
            );
        }

        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        let mut entries: Vec<StoreEntry> = Vec::new();
        for (stored_path, file) in self.files.range(prefix.clone()..) {
            let Some(rest) = stored_path.strip_prefix(&prefix) else {
                break;
            };
            let (name, kind) = match rest.split_once('/') {
                Some((dir, _)) => (dir, EntryKind::Directory),
                None => (rest, EntryKind::File),
            };
            if entries.iter().any(|entry| entry.name == name) {
                continue;
            }
            entries.push(StoreEntry {
                name: name.to_string(),
                path: format!("{prefix}{name}"),
                kind,
                fingerprint: Some(match kind {
                    EntryKind::File => file.fingerprint.clone(),
                    EntryKind::Directory => Fingerprint::new(format!("tree:{prefix}{name}")),
                }),
            });
        }

        if entries.is_empty() && !path.is_empty() {
            return json_response(404, json!({ "error": "Not Found" }));
        }
        json_response(200, json!(entries))
    }

    fn put(&mut self, path: &str, body: Option<&str>) -> StoreResponse {
        let Some(body) = body.and_then(|raw| serde_json::from_str::<WriteBody>(raw).ok()) else {
            return json_response(400, json!({ "error": "Invalid JSON body" }));
        };
        if self.failing_writes.contains(path) {
            return json_response(500, json!({ "error": "Internal Server Error" }));
        }
        let Ok(bytes) = decode_binary(&body.content) else {
            return json_response(400, json!({ "error": "content is not base64" }));
        };

        let current = self.files.get(path).map(|file| file.fingerprint.clone());
        let status = match (current, body.sha) {
            (None, None) => 201,
            (Some(_), None) => {
                return json_response(422, json!({ "error": "\"sha\" wasn't supplied." }));
            }
            (Some(current), Some(expected)) if current == expected => 200,
            (_, Some(expected)) => {
                return json_response(
                    409,
                    json!({ "error": format!("{path} does not match {expected}") }),
                );
            }
        };

        let fingerprint = self.next_fingerprint();
        self.files.insert(
            path.to_string(),
            StoredFile {
                bytes,
                fingerprint: fingerprint.clone(),
            },
        );
        json_response(
            status,
            json!({
                "content": {
                    "name": file_name(path),
                    "path": path,
                    "sha": fingerprint,
                },
                "commit": { "message": format!("update {path}") },
            }),
        )
    }

    fn delete(&mut self, path: &str, body: Option<&str>) -> StoreResponse {
        let Some(body) = body.and_then(|raw| serde_json::from_str::<DeleteBody>(raw).ok()) else {
            return json_response(400, json!({ "error": "Invalid JSON body" }));
        };
        match self.files.get(path) {
            None => json_response(404, json!({ "error": "Not Found" })),
            Some(file) if file.fingerprint != body.sha => json_response(
                409,
                json!({ "error": format!("{path} does not match {}", body.sha) }),
            ),
            Some(_) => {
                self.files.remove(path);
                json_response(200, json!({ "content": null, "commit": {} }))
            }
        }
    }
}

impl StoreTransport for MemoryStoreTransport {
    fn send<'a>(
        &'a self,
        request: StoreRequest,
    ) -> StoreFuture<'a, Result<StoreResponse, TransportError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.requests.push(request.clone());
            inner.handle(&request)
        })
    }
}

fn json_response(status: u16, body: Value) -> StoreResponse {
    StoreResponse::new(status, body.to_string())
}

fn wrapped_wire_text(bytes: &[u8]) -> String {
    let wire = super::codec::encode_bytes(bytes);
    let mut out = String::with_capacity(wire.len() + wire.len() / WIRE_LINE_WIDTH + 1);
    for (idx, ch) in wire.chars().enumerate() {
        if idx > 0 && idx % WIRE_LINE_WIDTH == 0 {
            out.push('\n');
        }
        out.push(ch);
    }
    out.push('\n');
    out
}

/// Encodes `text` the way the store expects a `PUT` body.
pub fn write_body_json(text: &str, sha: Option<&str>) -> String {
    json!({ "content": encode_text(text), "sha": sha }).to_string()
}
