use futures::future::{select, Either};
use js_sys::{Array, Promise, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, HtmlAnchorElement, Headers, Request, RequestInit, Response, Url, Window};

use super::*;

fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "window is unavailable".to_string())
}

fn js_error(context: &str, err: JsValue) -> String {
    match err.as_string() {
        Some(message) => format!("{context}: {message}"),
        None => format!("{context}: {err:?}"),
    }
}

async fn fetch_once(call: FetchCall<'_>) -> Result<StoreResponse, String> {
    let headers = Headers::new().map_err(|err| js_error("headers", err))?;
    headers
        .set(call.credential_header, call.credential)
        .map_err(|err| js_error("credential header", err))?;

    let init = RequestInit::new();
    init.set_method(call.method);
    if let Some(body) = call.body {
        headers
            .set("Content-Type", "application/json")
            .map_err(|err| js_error("content type", err))?;
        init.set_body(&JsValue::from_str(body));
    }
    init.set_headers(&headers);

    let request = Request::new_with_str_and_init(call.url, &init)
        .map_err(|err| js_error("request", err))?;
    let response: Response = JsFuture::from(window()?.fetch_with_request(&request))
        .await
        .map_err(|err| js_error("fetch", err))?
        .dyn_into()
        .map_err(|err| js_error("fetch response", err))?;

    let text_promise = response.text().map_err(|err| js_error("body", err))?;
    let body = JsFuture::from(text_promise)
        .await
        .map_err(|err| js_error("body", err))?
        .as_string()
        .unwrap_or_default();
    Ok(StoreResponse::new(response.status(), body))
}

pub async fn store_fetch(call: FetchCall<'_>) -> Result<StoreResponse, TransportError> {
    let request = Box::pin(fetch_once(call));
    let deadline = Box::pin(sleep_ms(call.timeout_ms));
    match select(request, deadline).await {
        Either::Left((result, _)) => result.map_err(TransportError::Network),
        Either::Right(((), _)) => Err(TransportError::Timeout(call.timeout_ms)),
    }
}

pub async fn offer_download(file_name: &str, bytes: &[u8]) -> Result<(), String> {
    let parts = Array::of1(&Uint8Array::from(bytes));
    let blob =
        Blob::new_with_u8_array_sequence(&parts).map_err(|err| js_error("blob", err))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|err| js_error("object url", err))?;

    let document = window()?
        .document()
        .ok_or_else(|| "document is unavailable".to_string())?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|err| js_error("anchor", err))?
        .dyn_into()
        .map_err(|err| js_error("anchor", err))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    let body = document
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())?;
    body.append_child(&anchor)
        .map_err(|err| js_error("anchor attach", err))?;
    anchor.click();
    anchor.remove();
    Url::revoke_object_url(&url).map_err(|err| js_error("revoke object url", err))
}

pub async fn sleep_ms(ms: u32) {
    let Ok(window) = window() else {
        return;
    };
    let timeout = i32::try_from(ms).unwrap_or(i32::MAX);
    let promise = Promise::new(&mut |resolve, _reject| {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout);
    });
    let _ = JsFuture::from(promise).await;
}

pub async fn show_alert(message: &str) -> Result<(), String> {
    window()?
        .alert_with_message(message)
        .map_err(|err| js_error("alert", err))
}

pub async fn prompt_text(message: &str) -> Result<Option<String>, String> {
    window()?
        .prompt_with_message(message)
        .map_err(|err| js_error("prompt", err))
}

pub async fn confirm(message: &str) -> Result<bool, String> {
    window()?
        .confirm_with_message(message)
        .map_err(|err| js_error("confirm", err))
}
