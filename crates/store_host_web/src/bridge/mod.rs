//! Browser capability bridge for `store_host_web` service adapters.
//!
//! This module is organized by host domain (`store`, `dialogs`) over a shared interop layer that
//! routes to the wasm implementation or to an explicit "unsupported" fallback.

mod dialogs;
mod interop;
mod store;

use store_host::{StoreResponse, TransportError};

/// Parameters of one credentialed request to the content store.
#[derive(Debug, Clone, Copy)]
pub struct FetchCall<'a> {
    pub method: &'a str,
    pub url: &'a str,
    pub credential_header: &'a str,
    pub credential: &'a str,
    pub body: Option<&'a str>,
    pub timeout_ms: u32,
}

pub async fn store_fetch(call: FetchCall<'_>) -> Result<StoreResponse, TransportError> {
    store::store_fetch(call).await
}

pub async fn offer_download(file_name: &str, bytes: &[u8]) -> Result<(), String> {
    store::offer_download(file_name, bytes).await
}

pub async fn sleep_ms(ms: u32) {
    store::sleep_ms(ms).await
}

pub async fn show_alert(message: &str) -> Result<(), String> {
    dialogs::show_alert(message).await
}

pub async fn prompt_text(message: &str) -> Result<Option<String>, String> {
    dialogs::prompt_text(message).await
}

pub async fn confirm(message: &str) -> Result<bool, String> {
    dialogs::confirm(message).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn store_public_api_non_wasm_parity() {
        let call = FetchCall {
            method: "GET",
            url: "/verify",
            credential_header: "x-password",
            credential: "pin",
            body: None,
            timeout_ms: 15_000,
        };
        assert!(matches!(
            block_on(store_fetch(call)),
            Err(TransportError::Unsupported(_))
        ));
        assert!(block_on(offer_download("a.txt", b"a")).is_err());
        block_on(sleep_ms(5));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn dialogs_public_api_non_wasm_parity() {
        let expected = "Browser dialogs are only available when compiled for wasm32".to_string();

        assert_eq!(
            block_on(show_alert("hello")).expect_err("alert should fail"),
            expected
        );
        assert_eq!(
            block_on(prompt_text("name?")).expect_err("prompt should fail"),
            expected
        );
        assert_eq!(
            block_on(confirm("sure?")).expect_err("confirm should fail"),
            expected
        );
    }
}
