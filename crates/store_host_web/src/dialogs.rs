//! Prompt and confirmation adapter for browser contexts.

use store_host::{DialogFuture, DialogService};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Browser dialog adapter backed by `window.prompt` and `window.confirm`.
///
/// Bridge failures count as a cancelled prompt or a declined confirmation.
pub struct WebDialogService;

impl DialogService for WebDialogService {
    fn prompt<'a>(&'a self, message: &'a str) -> DialogFuture<'a, Option<String>> {
        Box::pin(async move { bridge::prompt_text(message).await.ok().flatten() })
    }

    fn confirm<'a>(&'a self, message: &'a str) -> DialogFuture<'a, bool> {
        Box::pin(async move { bridge::confirm(message).await.unwrap_or(false) })
    }
}
