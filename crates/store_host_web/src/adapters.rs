use std::rc::Rc;

use store_host::{
    DialogFuture, DialogService, HostStrategy, ImmediateTimerService, NoopDialogService,
    NoopDownloadService, NoopNotificationService, NoopStoreTransport, NotificationFuture,
    NotificationService, StoreConfig, StoreFuture, StoreHostServices, StoreRequest,
    StoreResponse, StoreTransport, TransportError,
};

use crate::{
    WebDialogService, WebDownloadService, WebNotificationService, WebStoreTransport,
    WebTimerService,
};

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "host-stub")]
    {
        HostStrategy::Stub
    }

    #[cfg(not(feature = "host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    selected_host_strategy().as_str()
}

/// Adapter enum that erases the concrete transport behind [`StoreTransport`].
#[derive(Debug, Clone)]
pub enum StoreTransportAdapter {
    /// Browser `fetch` transport.
    Browser(WebStoreTransport),
    /// Transport that reports every request as unsupported.
    Stub(NoopStoreTransport),
}

impl StoreTransport for StoreTransportAdapter {
    fn send<'a>(
        &'a self,
        request: StoreRequest,
    ) -> StoreFuture<'a, Result<StoreResponse, TransportError>> {
        match self {
            Self::Browser(transport) => transport.send(request),
            Self::Stub(transport) => transport.send(request),
        }
    }
}

/// Adapter enum that erases the concrete notifier behind [`NotificationService`].
#[derive(Debug, Clone, Copy)]
pub enum NotificationServiceAdapter {
    /// Browser `alert` notifications.
    Browser(WebNotificationService),
    /// Notifications are dropped.
    Stub(NoopNotificationService),
}

impl NotificationService for NotificationServiceAdapter {
    fn notify<'a>(
        &'a self,
        title: &'a str,
        body: &'a str,
    ) -> NotificationFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(service) => service.notify(title, body),
            Self::Stub(service) => service.notify(title, body),
        }
    }
}

/// Adapter enum that erases the concrete dialog backend behind [`DialogService`].
#[derive(Debug, Clone, Copy)]
pub enum DialogServiceAdapter {
    /// Browser `prompt`/`confirm` dialogs.
    Browser(WebDialogService),
    /// Every dialog is cancelled.
    Stub(NoopDialogService),
}

impl DialogService for DialogServiceAdapter {
    fn prompt<'a>(&'a self, message: &'a str) -> DialogFuture<'a, Option<String>> {
        match self {
            Self::Browser(service) => service.prompt(message),
            Self::Stub(service) => service.prompt(message),
        }
    }

    fn confirm<'a>(&'a self, message: &'a str) -> DialogFuture<'a, bool> {
        match self {
            Self::Browser(service) => service.confirm(message),
            Self::Stub(service) => service.confirm(message),
        }
    }
}

/// Builds the transport adapter for the compile-time selected host strategy.
pub fn store_transport(config: &StoreConfig) -> StoreTransportAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => {
            StoreTransportAdapter::Browser(WebStoreTransport::new(config.clone()))
        }
        HostStrategy::Stub => StoreTransportAdapter::Stub(NoopStoreTransport),
    }
}

/// Builds the notification adapter for the compile-time selected host strategy.
pub fn notification_service() -> NotificationServiceAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => NotificationServiceAdapter::Browser(WebNotificationService),
        HostStrategy::Stub => NotificationServiceAdapter::Stub(NoopNotificationService),
    }
}

/// Builds the dialog adapter for the compile-time selected host strategy.
pub fn dialog_service() -> DialogServiceAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => DialogServiceAdapter::Browser(WebDialogService),
        HostStrategy::Stub => DialogServiceAdapter::Stub(NoopDialogService),
    }
}

/// Assembles the host service bundle for the compile-time selected host strategy.
pub fn build_host_services(config: StoreConfig) -> StoreHostServices {
    let host_strategy = selected_host_strategy();
    let mut services = StoreHostServices::noop(config.clone())
        .with_transport(Rc::new(store_transport(&config)))
        .with_notifications(Rc::new(notification_service()))
        .with_dialogs(Rc::new(dialog_service()));
    match host_strategy {
        HostStrategy::Browser => {
            services.downloads = Rc::new(WebDownloadService);
            services.timers = Rc::new(WebTimerService);
        }
        HostStrategy::Stub => {
            services.downloads = Rc::new(NoopDownloadService);
            services.timers = Rc::new(ImmediateTimerService);
        }
    }
    services.host_strategy = host_strategy;
    services
}
