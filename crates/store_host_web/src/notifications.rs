//! Notification adapter for browser contexts.

use store_host::{NotificationFuture, NotificationService};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Browser notification adapter backed by `window.alert`.
pub struct WebNotificationService;

impl NotificationService for WebNotificationService {
    fn notify<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let rendered = if body.trim().is_empty() {
                title.to_string()
            } else {
                format!("{title}\n{body}")
            };
            bridge::show_alert(&rendered).await
        })
    }
}
