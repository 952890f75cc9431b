//! Shared interop for browser bridge domains.
//!
//! This module routes calls to target-specific implementations while preserving a uniform API
//! for the bridge domain modules.

use store_host::{StoreResponse, TransportError};

use super::FetchCall;

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub async fn store_fetch(call: FetchCall<'_>) -> Result<StoreResponse, TransportError> {
    imp::store_fetch(call).await
}

pub async fn offer_download(file_name: &str, bytes: &[u8]) -> Result<(), String> {
    imp::offer_download(file_name, bytes).await
}

pub async fn sleep_ms(ms: u32) {
    imp::sleep_ms(ms).await
}

pub async fn show_alert(message: &str) -> Result<(), String> {
    imp::show_alert(message).await
}

pub async fn prompt_text(message: &str) -> Result<Option<String>, String> {
    imp::prompt_text(message).await
}

pub async fn confirm(message: &str) -> Result<bool, String> {
    imp::confirm(message).await
}
