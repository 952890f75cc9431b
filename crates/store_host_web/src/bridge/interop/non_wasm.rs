use super::*;

fn unsupported_dialogs() -> String {
    "Browser dialogs are only available when compiled for wasm32".to_string()
}

pub async fn store_fetch(call: FetchCall<'_>) -> Result<StoreResponse, TransportError> {
    Err(TransportError::Unsupported(format!(
        "fetch {} {} requires wasm32",
        call.method, call.url
    )))
}

pub async fn offer_download(file_name: &str, _bytes: &[u8]) -> Result<(), String> {
    Err(format!(
        "downloading `{file_name}` requires a browser (wasm32) build"
    ))
}

pub async fn sleep_ms(_ms: u32) {}

pub async fn show_alert(_message: &str) -> Result<(), String> {
    Err(unsupported_dialogs())
}

pub async fn prompt_text(_message: &str) -> Result<Option<String>, String> {
    Err(unsupported_dialogs())
}

pub async fn confirm(_message: &str) -> Result<bool, String> {
    Err(unsupported_dialogs())
}
