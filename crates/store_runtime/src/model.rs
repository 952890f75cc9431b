//! Session state owned by the store runtime.
//!
//! Everything here lives in memory only; a reload or logout replaces the whole session.

use store_host::{config::DEFAULT_GATED_DIR_NAME, display_path, StoreEntry};

use crate::{
    batch::{BatchId, BatchJob},
    editor::EditTracker,
    features::FeatureDocument,
    visibility::{visible_entries, GateState, ListingRow},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Load state of the directory listing.
pub enum ListingStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A listing request is in flight.
    Loading,
    /// Rows reflect the current location.
    Ready,
    /// The last listing failed; the message is shown inline.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Request slots whose late responses must be discarded once superseded.
pub enum RequestSlot {
    /// Directory listing of the browser view.
    Listing,
    /// File open into the editor.
    Open,
    /// Mini-app document load.
    Feature,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RequestTokens {
    listing: u64,
    open: u64,
    feature: u64,
}

impl RequestTokens {
    fn slot_mut(&mut self, slot: RequestSlot) -> &mut u64 {
        match slot {
            RequestSlot::Listing => &mut self.listing,
            RequestSlot::Open => &mut self.open,
            RequestSlot::Feature => &mut self.feature,
        }
    }

    fn slot(&self, slot: RequestSlot) -> u64 {
        match slot {
            RequestSlot::Listing => self.listing,
            RequestSlot::Open => self.open,
            RequestSlot::Feature => self.feature,
        }
    }

    fn advanced(self) -> Self {
        Self {
            listing: self.listing + 1,
            open: self.open + 1,
            feature: self.feature + 1,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
/// The single explicit session object of the client.
pub struct StoreSession {
    credential: Option<String>,
    /// Location currently displayed (store-relative, `""` is the root).
    pub location: String,
    /// Listing load state.
    pub listing_status: ListingStatus,
    /// Entries of the last applied listing, before filtering.
    pub raw_entries: Vec<StoreEntry>,
    /// Rows derived from `raw_entries` for the current location and gate state.
    pub rows: Vec<ListingRow>,
    /// Edit session tracker.
    pub editor: EditTracker,
    /// Latest upload batch.
    pub batch: Option<BatchJob>,
    /// Area-gate state.
    pub gate: GateState,
    /// Name of the root directory behind the area gate.
    pub gated_dir_name: String,
    /// Installed mini-app names from the last features listing.
    pub features: Vec<String>,
    /// Mini-app shown in the viewer.
    pub feature_view: Option<FeatureDocument>,
    next_batch_id: BatchId,
    requests: RequestTokens,
}

impl Default for StoreSession {
    fn default() -> Self {
        Self::new(DEFAULT_GATED_DIR_NAME)
    }
}

impl StoreSession {
    /// Creates a signed-out session gating `gated_dir_name`.
    pub fn new(gated_dir_name: impl Into<String>) -> Self {
        Self {
            credential: None,
            location: String::new(),
            listing_status: ListingStatus::Idle,
            raw_entries: Vec::new(),
            rows: Vec::new(),
            editor: EditTracker::default(),
            batch: None,
            gate: GateState::default(),
            gated_dir_name: gated_dir_name.into(),
            features: Vec::new(),
            feature_view: None,
            next_batch_id: 0,
            requests: RequestTokens::default(),
        }
    }

    /// Returns a fresh signed-out session with the same configuration.
    ///
    /// Request tokens, the edit generation, and batch ids continue from this session, so nothing
    /// still in flight from it can be applied to the new one.
    pub fn reset(&self) -> Self {
        Self {
            editor: self.editor.successor(),
            next_batch_id: self.next_batch_id,
            requests: self.requests.advanced(),
            ..Self::new(self.gated_dir_name.clone())
        }
    }

    /// Whether the session holds nothing but counters and configuration.
    pub fn is_pristine(&self) -> bool {
        self.credential.is_none()
            && self.location.is_empty()
            && self.listing_status == ListingStatus::Idle
            && self.raw_entries.is_empty()
            && self.rows.is_empty()
            && !self.editor.is_open()
            && self.editor.pending_save().is_none()
            && self.batch.is_none()
            && self.gate == GateState::default()
            && self.features.is_empty()
            && self.feature_view.is_none()
    }

    /// Credential cached for this session.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Whether a verified credential is cached.
    pub fn is_signed_in(&self) -> bool {
        self.credential.is_some()
    }

    pub(crate) fn sign_in(&mut self, credential: String) {
        self.credential = Some(credential);
    }

    /// Location formatted for the path bar.
    pub fn display_location(&self) -> String {
        display_path(&self.location)
    }

    /// Supersedes any in-flight request in `slot` and returns the new token.
    pub fn issue_request(&mut self, slot: RequestSlot) -> u64 {
        let token = self.requests.slot_mut(slot);
        *token += 1;
        *token
    }

    /// Latest token issued for `slot`.
    pub fn current_request(&self, slot: RequestSlot) -> u64 {
        self.requests.slot(slot)
    }

    /// Whether a response carrying `token` may still be applied.
    pub fn is_current(&self, slot: RequestSlot, token: u64) -> bool {
        self.requests.slot(slot) == token
    }

    pub(crate) fn allocate_batch_id(&mut self) -> BatchId {
        self.next_batch_id += 1;
        self.next_batch_id
    }

    /// Rebuilds `rows` from `raw_entries` for the current location and gate state.
    pub fn recompute_rows(&mut self) {
        self.rows = visible_entries(
            &self.raw_entries,
            &self.location,
            self.gate.is_unlocked(),
            &self.gated_dir_name,
        );
    }
}

impl std::fmt::Debug for StoreSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSession")
            .field("signed_in", &self.credential.is_some())
            .field("location", &self.location)
            .field("listing_status", &self.listing_status)
            .field("rows", &self.rows.len())
            .field("editor", &self.editor.session().map(|s| &s.target_path))
            .field("batch", &self.batch)
            .field("gate", &self.gate)
            .field("feature_view", &self.feature_view.as_ref().map(|d| &d.name))
            .finish_non_exhaustive()
    }
}
