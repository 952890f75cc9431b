//! Typed host contracts and the pure core of the content-store client.
//!
//! This crate is the boundary between the client runtime and its host. It exposes the path model,
//! the base64 content codec, wire types with the listing classifier, the error taxonomy, and
//! object-safe service traits (transport, notifications, dialogs, downloads, timers, upload
//! sources) with no-op and in-memory adapters. Browser adapters live in `store_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod dialogs;
pub mod downloads;
pub mod error;
pub mod fs;
pub mod host;
pub mod notifications;
pub mod timers;
pub mod uploads;

pub use config::StoreConfig;
pub use dialogs::{DialogFuture, DialogService, NoopDialogService, ScriptedDialogService};
pub use downloads::{DownloadFuture, DownloadService, MemoryDownloadService, NoopDownloadService};
pub use error::{StoreError, TransportError};
pub use fs::codec::{decode_binary, decode_text, encode_bytes, encode_text, CodecError};
pub use fs::memory::MemoryStoreTransport;
pub use fs::path::{
    display_path, encode_wire_path, feature_entry_path, file_name, folder_placeholder_path,
    is_direct_child_of_root, is_reserved_control_file, is_single_segment, join_store_path,
    normalize_store_path, parent_of, wire_path, ReservedFile, FEATURE_ENTRY_NAME,
    FOLDER_PLACEHOLDER_NAME,
};
pub use fs::service::{NoopStoreTransport, StoreFuture, StoreTransport};
pub use fs::types::{
    classify_list_payload, error_message, DeleteBody, EntryKind, FileContent, Fingerprint,
    ListResult, StoreEntry, StoreMethod, StoreRequest, StoreResponse, VerifyResponse, WriteBody,
    WriteReceipt,
};
pub use host::{HostStrategy, StoreHostServices};
pub use notifications::service::{
    MemoryNotificationService, NoopNotificationService, Notice, NotificationFuture,
    NotificationService,
};
pub use timers::{ImmediateTimerService, TimerFuture, TimerService};
pub use uploads::{MemoryUploadSource, UploadFuture, UploadSource};
