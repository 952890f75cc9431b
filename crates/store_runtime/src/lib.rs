//! Content-store client runtime: protocol client, session model, reducer, and async controller.
//!
//! The store speaks a contents-API-shaped JSON protocol. [`StoreClient`] turns raw responses into
//! typed results, [`reduce_store`] applies them to the single [`StoreSession`], and
//! [`StoreController`] sequences the two against injected host services. [`StoreProvider`] exposes
//! the whole thing to leptos views.

pub mod batch;
pub mod client;
pub mod controller;
pub mod editor;
pub mod features;
pub mod model;
pub mod reducer;
pub mod runtime_context;
pub mod visibility;

pub use batch::{BatchId, BatchJob, BatchProgress};
pub use client::StoreClient;
pub use controller::{StoreController, FOLDER_PLACEHOLDER_TEXT};
pub use editor::{EditError, EditSession, EditTracker, SaveOutcome, SaveTicket};
pub use features::{feature_names, starter_document, validate_feature_name, FeatureDocument};
pub use model::{ListingStatus, RequestSlot, StoreSession};
pub use reducer::{reduce_store, Mutation, ReducerError, StoreAction, StoreEffect};
pub use runtime_context::{
    default_host_services, use_store_runtime, StoreProvider, StoreRuntimeContext,
};
pub use visibility::{
    gate_accepts, navigation_requires_gate, visible_entries, GateState, ListingRow, RowAction,
    GO_UP_LABEL,
};
