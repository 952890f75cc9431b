//! Content-store transport backed by the browser `fetch` API.

use store_host::{
    encode_wire_path, StoreConfig, StoreFuture, StoreRequest, StoreResponse, StoreTransport,
    TransportError,
};

use crate::bridge::{self, FetchCall};

#[derive(Debug, Clone)]
/// Browser transport that issues one `fetch` per request, bounded by the configured timeout.
pub struct WebStoreTransport {
    config: StoreConfig,
}

impl WebStoreTransport {
    /// Creates a transport targeting `config.api_base_url`.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Returns the absolute URL a request for `path` is sent to.
    pub fn url_for(&self, path: &str) -> String {
        self.config.request_url(&encode_wire_path(path))
    }
}

impl StoreTransport for WebStoreTransport {
    fn send<'a>(
        &'a self,
        request: StoreRequest,
    ) -> StoreFuture<'a, Result<StoreResponse, TransportError>> {
        Box::pin(async move {
            let url = self.url_for(&request.path);
            bridge::store_fetch(FetchCall {
                method: request.method.as_str(),
                url: &url,
                credential_header: &self.config.credential_header,
                credential: &request.credential,
                body: request.body.as_deref(),
                timeout_ms: self.config.request_timeout_ms,
            })
            .await
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use store_host::StoreMethod;

    use super::*;

    fn transport() -> WebStoreTransport {
        WebStoreTransport::new(
            StoreConfig::from_json(r#"{"api_base_url": "https://store.example"}"#)
                .expect("config"),
        )
    }

    #[test]
    fn urls_carry_one_leading_slash_and_encoded_segments() {
        let transport = transport();
        assert_eq!(transport.url_for(""), "https://store.example/");
        assert_eq!(
            transport.url_for("/docs//My Notes.txt"),
            "https://store.example/docs/My%20Notes.txt"
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn send_is_unsupported_off_wasm() {
        let err = block_on(transport().send(StoreRequest {
            method: StoreMethod::Get,
            path: "/verify".to_string(),
            credential: "pin".to_string(),
            body: None,
        }))
        .expect_err("send should fail");
        assert!(matches!(err, TransportError::Unsupported(_)));
    }
}
