//! Browser (`wasm32`) implementations of [`store_host`] service contracts.
//!
//! This crate wires the content-store client to the browser: `fetch` transport with a bounded
//! timeout, native `alert`/`prompt`/`confirm` dialogs, Blob downloads, `setTimeout` delays, and
//! `File` upload sources.
//!
//! Bridge bindings are split by domain under `bridge/`:
//! - `bridge::store`
//! - `bridge::dialogs`
//! - `bridge::interop` (shared wasm/non-wasm glue)

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
mod bridge;
pub mod dialogs;
pub mod downloads;
pub mod notifications;
pub mod timers;
pub mod transport;
pub mod uploads;

pub use adapters::{
    build_host_services, dialog_service, host_strategy_name, notification_service,
    selected_host_strategy, store_transport, DialogServiceAdapter, NotificationServiceAdapter,
    StoreTransportAdapter,
};
pub use dialogs::WebDialogService;
pub use downloads::WebDownloadService;
pub use notifications::WebNotificationService;
pub use timers::WebTimerService;
pub use transport::WebStoreTransport;
#[cfg(target_arch = "wasm32")]
pub use uploads::{upload_sources, WebUploadSource};
