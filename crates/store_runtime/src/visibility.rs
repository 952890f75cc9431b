//! Listing filter, row actions, and the area-gate state machine.
//!
//! The gate is a client-side UX step, not access control: the store serves gated content to any
//! valid credential.

use store_host::{
    is_direct_child_of_root, is_reserved_control_file, normalize_store_path, parent_of, EntryKind,
    Fingerprint, StoreEntry,
};

/// Label of the synthetic parent row.
pub const GO_UP_LABEL: &str = "..";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What activating a listing row does.
pub enum RowAction {
    /// Navigate to the parent location.
    GoUp,
    /// Navigate into the directory.
    Navigate,
    /// Ask for the gate secret, then navigate.
    PromptGate,
    /// Open the file in the editor.
    OpenFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One rendered listing row.
pub struct ListingRow {
    /// Display label.
    pub label: String,
    /// Target path (the parent location for the go-up row).
    pub path: String,
    /// File or directory.
    pub kind: EntryKind,
    /// Version tag for file rows.
    pub fingerprint: Option<Fingerprint>,
    /// Activation behavior.
    pub action: RowAction,
}

impl ListingRow {
    fn from_entry(entry: &StoreEntry, action: RowAction) -> Self {
        Self {
            label: entry.name.clone(),
            path: normalize_store_path(&entry.path),
            kind: entry.kind,
            fingerprint: match entry.kind {
                EntryKind::File => entry.fingerprint.clone(),
                EntryKind::Directory => None,
            },
            action,
        }
    }

    /// Whether the row offers a delete action.
    pub fn can_delete(&self) -> bool {
        self.action == RowAction::OpenFile && self.fingerprint.is_some()
    }

    /// Whether the row offers a download action.
    pub fn can_download(&self) -> bool {
        self.action == RowAction::OpenFile
    }
}

/// Filters and labels raw listing entries for display at `location`.
///
/// Reserved control files are dropped regardless of gate state. Directories come before files,
/// each group in backend order. A go-up row leads the listing away from the root. The gated
/// directory prompts for the secret only as a direct child of the root while the gate is locked.
pub fn visible_entries(
    raw: &[StoreEntry],
    location: &str,
    gate_unlocked: bool,
    gated_dir_name: &str,
) -> Vec<ListingRow> {
    let location = normalize_store_path(location);
    let mut rows = Vec::with_capacity(raw.len() + 1);
    if let Some(parent) = parent_of(&location) {
        rows.push(ListingRow {
            label: GO_UP_LABEL.to_string(),
            path: parent,
            kind: EntryKind::Directory,
            fingerprint: None,
            action: RowAction::GoUp,
        });
    }

    let shown = raw
        .iter()
        .filter(|entry| !is_reserved_control_file(&entry.name))
        .filter(|entry| !is_reserved_control_file(&entry.path));
    let (dirs, files): (Vec<&StoreEntry>, Vec<&StoreEntry>) =
        shown.partition(|entry| entry.kind.is_directory());

    rows.extend(dirs.into_iter().map(|entry| {
        let gated = !gate_unlocked
            && location.is_empty()
            && entry.name == gated_dir_name
            && is_direct_child_of_root(&entry.path);
        let action = if gated {
            RowAction::PromptGate
        } else {
            RowAction::Navigate
        };
        ListingRow::from_entry(entry, action)
    }));
    rows.extend(
        files
            .into_iter()
            .map(|entry| ListingRow::from_entry(entry, RowAction::OpenFile)),
    );
    rows
}

/// Whether navigating straight to `path` must pass the gate first.
///
/// Any path inside the root-level gated directory counts, so typing a nested path does not skip
/// the prompt. A same-named directory below the root is never gated.
pub fn navigation_requires_gate(path: &str, gate_unlocked: bool, gated_dir_name: &str) -> bool {
    if gate_unlocked {
        return false;
    }
    let normalized = normalize_store_path(path);
    normalized.split('/').next() == Some(gated_dir_name) && !gated_dir_name.is_empty()
}

/// Returns `true` when `input` unlocks a gate whose secret is `secret`.
///
/// Both sides are trimmed; an empty secret never unlocks.
pub fn gate_accepts(input: &str, secret: &str) -> bool {
    let secret = secret.trim();
    !secret.is_empty() && input.trim() == secret
}

#[derive(Clone, Default, PartialEq, Eq)]
/// Session-scoped gate state: sticky unlock plus the lazily fetched secret.
pub struct GateState {
    unlocked: bool,
    cached_secret: Option<String>,
}

impl GateState {
    /// Whether the gate was unlocked this session.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// The memoized secret, once fetched.
    pub fn cached_secret(&self) -> Option<&str> {
        self.cached_secret.as_deref()
    }

    /// Memoizes `secret`. A secret already cached is kept.
    pub fn cache_secret(&mut self, secret: impl Into<String>) {
        if self.cached_secret.is_none() {
            self.cached_secret = Some(secret.into());
        }
    }

    /// Checks `input` against the cached secret and unlocks on a match.
    ///
    /// Returns the resulting unlock state; without a cached secret nothing unlocks.
    pub fn try_unlock(&mut self, input: &str) -> bool {
        if !self.unlocked {
            self.unlocked = self
                .cached_secret
                .as_deref()
                .is_some_and(|secret| gate_accepts(input, secret));
        }
        self.unlocked
    }
}

impl std::fmt::Debug for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateState")
            .field("unlocked", &self.unlocked)
            .field(
                "cached_secret",
                &self.cached_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
