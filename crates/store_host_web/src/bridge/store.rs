use store_host::{StoreResponse, TransportError};

use super::FetchCall;

pub(crate) async fn store_fetch(call: FetchCall<'_>) -> Result<StoreResponse, TransportError> {
    super::interop::store_fetch(call).await
}

pub(crate) async fn offer_download(file_name: &str, bytes: &[u8]) -> Result<(), String> {
    super::interop::offer_download(file_name, bytes).await
}

pub(crate) async fn sleep_ms(ms: u32) {
    super::interop::sleep_ms(ms).await
}
