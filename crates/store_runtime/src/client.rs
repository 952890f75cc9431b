//! Credentialed list/read/write/delete requests with typed results.
//!
//! The client owns no session state: every call takes the credential explicitly and nothing is
//! retried.

use std::rc::Rc;

use serde_json::Value;
use store_host::{
    classify_list_payload, error_message, normalize_store_path, wire_path, DeleteBody,
    FileContent, Fingerprint, ListResult, StoreError, StoreMethod, StoreRequest, StoreResponse,
    StoreTransport, VerifyResponse, WriteBody, WriteReceipt,
};

#[derive(Clone)]
/// Content-store client over an injected [`StoreTransport`].
pub struct StoreClient {
    transport: Rc<dyn StoreTransport>,
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient").finish_non_exhaustive()
    }
}

impl StoreClient {
    /// Creates a client that sends every request through `transport`.
    pub fn new(transport: Rc<dyn StoreTransport>) -> Self {
        Self { transport }
    }

    async fn send(
        &self,
        method: StoreMethod,
        path: &str,
        credential: &str,
        body: Option<String>,
    ) -> Result<StoreResponse, StoreError> {
        let request = StoreRequest {
            method,
            path: wire_path(path),
            credential: credential.to_string(),
            body,
        };
        Ok(self.transport.send(request).await?)
    }

    /// Checks `credential` against `GET /verify`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Auth`] when the store answers `success: false` or rejects the credential,
    /// [`StoreError::MalformedResponse`] when the answer is not the expected JSON object.
    pub async fn verify(&self, credential: &str) -> Result<(), StoreError> {
        let response = self
            .send(StoreMethod::Get, "verify", credential, None)
            .await?;
        if !response.is_success() {
            return Err(status_error(&response, "verify", false));
        }
        let verdict: VerifyResponse = serde_json::from_str(&response.body).map_err(|err| {
            StoreError::MalformedResponse(format!("verify answer is not JSON: {err}"))
        })?;
        if verdict.success {
            Ok(())
        } else {
            Err(StoreError::Auth)
        }
    }

    /// Lists `path`, which may resolve to a directory, a single file, or an error payload.
    ///
    /// # Errors
    ///
    /// [`StoreError::Auth`] for a rejected credential, [`StoreError::MalformedResponse`] for an
    /// unrecognized body, and the status mapping for failures without an error payload.
    pub async fn list(&self, credential: &str, path: &str) -> Result<ListResult, StoreError> {
        let response = self.send(StoreMethod::Get, path, credential, None).await?;
        if matches!(response.status, 401 | 403) {
            return Err(StoreError::Auth);
        }
        match classify_list_payload(&response.body) {
            Ok(ListResult::Error(message)) => Ok(ListResult::Error(message)),
            Ok(result) if response.is_success() => Ok(result),
            Ok(_) | Err(_) if !response.is_success() => Err(status_error(&response, path, false)),
            other => other,
        }
    }

    /// Reads the file at `path`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the answer carries no `content` field,
    /// [`StoreError::MalformedResponse`] when the path answered with a directory listing or a
    /// non-JSON body.
    pub async fn read_file(&self, credential: &str, path: &str) -> Result<FileContent, StoreError> {
        let response = self.send(StoreMethod::Get, path, credential, None).await?;
        if !response.is_success() {
            return Err(status_error(&response, path, false));
        }
        let value: Value = serde_json::from_str(&response.body).map_err(|err| {
            StoreError::MalformedResponse(format!("file answer is not JSON: {err}"))
        })?;
        if value.is_array() {
            return Err(StoreError::MalformedResponse(format!(
                "`{}` answered with a directory listing",
                wire_path(path)
            )));
        }
        let has_content = value
            .get("content")
            .is_some_and(|content| !content.is_null());
        if !has_content {
            return Err(StoreError::NotFound {
                path: normalize_store_path(path),
            });
        }
        serde_json::from_value(value)
            .map_err(|err| StoreError::MalformedResponse(format!("bad file payload: {err}")))
    }

    /// Writes base64 `wire_content` to `path`.
    ///
    /// A `None` fingerprint creates the file; `Some` updates it only while the stored version
    /// still matches.
    ///
    /// # Errors
    ///
    /// [`StoreError::Conflict`] when the store rejects the fingerprint (or a create collides with
    /// an existing file), [`StoreError::Rejected`] for other failures.
    pub async fn write_file(
        &self,
        credential: &str,
        path: &str,
        wire_content: String,
        fingerprint: Option<&Fingerprint>,
    ) -> Result<WriteReceipt, StoreError> {
        let body = WriteBody {
            content: wire_content,
            sha: fingerprint.cloned(),
        };
        let body = serde_json::to_string(&body)
            .map_err(|err| StoreError::MalformedResponse(err.to_string()))?;
        let response = self
            .send(StoreMethod::Put, path, credential, Some(body))
            .await?;
        if !response.is_success() {
            return Err(status_error(&response, path, true));
        }
        if let Some(message) = embedded_error(&response.body) {
            return Err(StoreError::Rejected {
                status: response.status,
                message,
            });
        }
        Ok(WriteReceipt::from_body(&response.body))
    }

    /// Deletes the file at `path` whose current version is `fingerprint`.
    ///
    /// # Errors
    ///
    /// Same mapping as [`StoreClient::write_file`].
    pub async fn delete_file(
        &self,
        credential: &str,
        path: &str,
        fingerprint: &Fingerprint,
    ) -> Result<(), StoreError> {
        let body = DeleteBody {
            sha: fingerprint.clone(),
        };
        let body = serde_json::to_string(&body)
            .map_err(|err| StoreError::MalformedResponse(err.to_string()))?;
        let response = self
            .send(StoreMethod::Delete, path, credential, Some(body))
            .await?;
        if !response.is_success() {
            return Err(status_error(&response, path, true));
        }
        if let Some(message) = embedded_error(&response.body) {
            return Err(StoreError::Rejected {
                status: response.status,
                message,
            });
        }
        Ok(())
    }
}

fn embedded_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("error").map(error_message)
}

fn status_error(response: &StoreResponse, path: &str, mutating: bool) -> StoreError {
    let path = normalize_store_path(path);
    match response.status {
        401 | 403 => StoreError::Auth,
        404 => StoreError::NotFound { path },
        409 | 412 | 422 if mutating => StoreError::Conflict { path },
        status => StoreError::Rejected {
            status,
            message: match serde_json::from_str::<Value>(&response.body) {
                Ok(value) => error_message(&value),
                Err(_) => response.body.trim().to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use store_host::{encode_text, MemoryStoreTransport};

    use super::*;

    fn client_with(store: &MemoryStoreTransport) -> StoreClient {
        StoreClient::new(Rc::new(store.clone()))
    }

    #[test]
    fn verify_distinguishes_accepted_and_rejected_credentials() {
        let store = MemoryStoreTransport::with_credential("1234");
        let client = client_with(&store);
        block_on(client.verify("1234")).expect("verify");
        assert_eq!(block_on(client.verify("0000")), Err(StoreError::Auth));
    }

    #[test]
    fn verify_reports_non_json_answers_as_malformed() {
        let store = MemoryStoreTransport::with_credential("1234");
        store.script_response(
            StoreMethod::Get,
            "verify",
            StoreResponse::new(200, "<html>worker error</html>"),
        );
        assert!(matches!(
            block_on(client_with(&store).verify("1234")),
            Err(StoreError::MalformedResponse(_))
        ));
    }

    #[test]
    fn every_request_carries_the_credential_and_a_wire_path() {
        let store = MemoryStoreTransport::with_credential("1234");
        store.insert_text("docs/a.txt", "a");
        let client = client_with(&store);
        block_on(client.list("1234", "docs")).expect("list");
        block_on(client.read_file("1234", "docs/a.txt")).expect("read");

        let requests = store.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|request| request.credential == "1234"));
        assert_eq!(requests[0].path, "/docs");
        assert_eq!(requests[1].path, "/docs/a.txt");
    }

    #[test]
    fn list_passes_error_payloads_through() {
        let store = MemoryStoreTransport::with_credential("1234");
        let result = block_on(client_with(&store).list("1234", "missing")).expect("list");
        assert_eq!(result, ListResult::Error("Not Found".to_string()));
    }

    #[test]
    fn list_on_a_file_yields_the_single_file_variant() {
        let store = MemoryStoreTransport::with_credential("1234");
        store.insert_text("notes.txt", "hi");
        assert!(matches!(
            block_on(client_with(&store).list("1234", "notes.txt")),
            Ok(ListResult::SingleFile(_))
        ));
    }

    #[test]
    fn read_file_on_a_directory_is_malformed_not_a_crash() {
        let store = MemoryStoreTransport::with_credential("1234");
        store.insert_text("a/b/c.txt", "c");
        assert!(matches!(
            block_on(client_with(&store).read_file("1234", "a/b")),
            Err(StoreError::MalformedResponse(_))
        ));
    }

    #[test]
    fn read_file_without_content_is_not_found() {
        let store = MemoryStoreTransport::with_credential("1234");
        store.script_response(
            StoreMethod::Get,
            "ghost.txt",
            StoreResponse::new(200, r#"{"name": "ghost.txt", "content": null}"#),
        );
        assert_eq!(
            block_on(client_with(&store).read_file("1234", "ghost.txt")),
            Err(StoreError::NotFound {
                path: "ghost.txt".to_string()
            })
        );
    }

    #[test]
    fn stale_fingerprint_write_is_a_conflict() {
        let store = MemoryStoreTransport::with_credential("1234");
        store.insert_with_fingerprint("notes.txt", "server copy", "xyz999");
        let err = block_on(client_with(&store).write_file(
            "1234",
            "/notes.txt",
            encode_text("mine"),
            Some(&Fingerprint::new("abc123")),
        ))
        .expect_err("write should conflict");

        assert_eq!(
            err,
            StoreError::Conflict {
                path: "notes.txt".to_string()
            }
        );
        assert_eq!(store.text("notes.txt").as_deref(), Some("server copy"));
    }

    #[test]
    fn replayed_create_surfaces_a_conflict() {
        let store = MemoryStoreTransport::with_credential("1234");
        let client = client_with(&store);
        let receipt = block_on(client.write_file("1234", "new.txt", encode_text("x"), None))
            .expect("create");
        assert!(receipt.fingerprint.is_some());

        assert!(matches!(
            block_on(client.write_file("1234", "new.txt", encode_text("x"), None)),
            Err(StoreError::Conflict { .. })
        ));
    }

    #[test]
    fn delete_requires_the_current_fingerprint() {
        let store = MemoryStoreTransport::with_credential("1234");
        let current = store.insert_text("old.txt", "bye");
        let client = client_with(&store);

        assert!(matches!(
            block_on(client.delete_file("1234", "old.txt", &Fingerprint::new("nope"))),
            Err(StoreError::Conflict { .. })
        ));
        block_on(client.delete_file("1234", "old.txt", &current)).expect("delete");
        assert!(store.text("old.txt").is_none());
    }

    #[test]
    fn transport_failures_are_connection_errors() {
        let store = MemoryStoreTransport::with_credential("1234");
        store.make_unreachable("docs");
        assert!(matches!(
            block_on(client_with(&store).list("1234", "docs")),
            Err(StoreError::Connection(_))
        ));
    }

    #[test]
    fn other_failures_keep_status_and_message() {
        let store = MemoryStoreTransport::with_credential("1234");
        store.fail_writes_to("x.txt");
        assert_eq!(
            block_on(client_with(&store).write_file("1234", "x.txt", encode_text("x"), None)),
            Err(StoreError::Rejected {
                status: 500,
                message: "Internal Server Error".to_string()
            })
        );
    }
}
