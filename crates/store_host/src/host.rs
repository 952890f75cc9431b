//! Host service bundle handed to the store runtime.

use std::rc::Rc;

use crate::{
    DialogService, DownloadService, ImmediateTimerService, NoopDialogService,
    NoopDownloadService, NoopNotificationService, NoopStoreTransport, NotificationService,
    StoreConfig, StoreTransport, TimerService,
};

/// Host strategy selected for the current build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed composition.
    Browser,
    /// Composition with no-op or in-memory adapters.
    Stub,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Stub => "stub",
        }
    }
}

/// Runtime-selected host service bundle.
///
/// All environment-specific adapter selection happens before this bundle reaches
/// `store_runtime`, which keeps the client core free of browser details.
#[derive(Clone)]
pub struct StoreHostServices {
    /// Request transport to the content store.
    pub transport: Rc<dyn StoreTransport>,
    /// User-visible notifications.
    pub notifications: Rc<dyn NotificationService>,
    /// Text prompts and confirmations.
    pub dialogs: Rc<dyn DialogService>,
    /// Save-to-disk delivery.
    pub downloads: Rc<dyn DownloadService>,
    /// Delays for timed UI transitions.
    pub timers: Rc<dyn TimerService>,
    /// Client configuration.
    pub config: StoreConfig,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl StoreHostServices {
    /// Bundle of no-op adapters with the given configuration.
    pub fn noop(config: StoreConfig) -> Self {
        Self {
            transport: Rc::new(NoopStoreTransport),
            notifications: Rc::new(NoopNotificationService),
            dialogs: Rc::new(NoopDialogService),
            downloads: Rc::new(NoopDownloadService),
            timers: Rc::new(ImmediateTimerService),
            config,
            host_strategy: HostStrategy::Stub,
        }
    }

    /// Replaces the transport.
    pub fn with_transport(mut self, transport: Rc<dyn StoreTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Replaces the notification service.
    pub fn with_notifications(mut self, notifications: Rc<dyn NotificationService>) -> Self {
        self.notifications = notifications;
        self
    }

    /// Replaces the dialog service.
    pub fn with_dialogs(mut self, dialogs: Rc<dyn DialogService>) -> Self {
        self.dialogs = dialogs;
        self
    }

    /// Replaces the download service.
    pub fn with_downloads(mut self, downloads: Rc<dyn DownloadService>) -> Self {
        self.downloads = downloads;
        self
    }
}

impl std::fmt::Debug for StoreHostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHostServices")
            .field("config", &self.config)
            .field("host_strategy", &self.host_strategy)
            .finish_non_exhaustive()
    }
}
