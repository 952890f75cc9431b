//! Notification service contracts with no-op and recording adapters.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`NotificationService`].
pub type NotificationFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Surfaces store failures and status messages to the user.
pub trait NotificationService {
    /// Shows `body` under `title`. Errors mean the host could not display it.
    fn notify<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Notification service that drops every message.
pub struct NoopNotificationService;

impl NotificationService for NoopNotificationService {
    fn notify<'a>(
        &'a self,
        _title: &'a str,
        _body: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One delivered notification.
pub struct Notice {
    /// Short title.
    pub title: String,
    /// Message body.
    pub body: String,
}

#[derive(Debug, Clone, Default)]
/// Notification service that records every message it receives.
pub struct MemoryNotificationService {
    inner: Rc<RefCell<Vec<Notice>>>,
}

impl MemoryNotificationService {
    /// Returns every recorded notification in delivery order.
    pub fn notices(&self) -> Vec<Notice> {
        self.inner.borrow().clone()
    }

    /// Returns recorded notifications whose title equals `title`.
    pub fn with_title(&self, title: &str) -> Vec<Notice> {
        self.inner
            .borrow()
            .iter()
            .filter(|notice| notice.title == title)
            .cloned()
            .collect()
    }

    /// Drops all recorded notifications.
    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }
}

impl NotificationService for MemoryNotificationService {
    fn notify<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().push(Notice {
                title: title.to_string(),
                body: body.to_string(),
            });
            Ok(())
        })
    }
}
