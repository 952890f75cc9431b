//! Edit-session state machine and fingerprint tracking.
//!
//! At most one session is open. Every open, create, or close moves the tracker to a new
//! generation; a save result is applied only when it belongs to the generation that is still
//! current, so a save can never submit or record a fingerprint captured by an earlier session.

use store_host::{encode_text, Fingerprint, WriteReceipt};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
/// The file currently open in the editor.
pub struct EditSession {
    /// Store-relative path the buffer is saved to.
    pub target_path: String,
    /// Version the buffer was loaded from; `None` creates a new file.
    pub last_fingerprint: Option<Fingerprint>,
    /// Current editor text.
    pub buffer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Snapshot of the open session taken when a save is submitted.
pub struct SaveTicket {
    /// Tracker generation the ticket was issued for.
    pub generation: u64,
    /// Path being written.
    pub path: String,
    /// Base64 wire form of the buffer.
    pub wire_content: String,
    /// Fingerprint read from the session at submission time.
    pub fingerprint: Option<Fingerprint>,
    /// Whether a successful write closes the session.
    pub auto_close: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What [`EditTracker::finish_save`] did with a successful write.
pub enum SaveOutcome {
    /// The session was closed.
    Closed,
    /// The session stays open with the new fingerprint.
    KeptOpen,
    /// The ticket belongs to a superseded session; nothing changed.
    Stale,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Edit operations that do not apply to the tracker's current state.
pub enum EditError {
    /// No session is open.
    #[error("no file is open")]
    NoSession,
    /// A save for the open session is still in flight.
    #[error("a save is already in progress for `{0}`")]
    SaveInFlight(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Holds the single edit session and its generation counter.
pub struct EditTracker {
    session: Option<EditSession>,
    generation: u64,
    pending_save: Option<SaveTicket>,
}

impl EditTracker {
    /// Returns the open session, if any.
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Returns `true` while a session is open.
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the in-flight save ticket, if any.
    pub fn pending_save(&self) -> Option<&SaveTicket> {
        self.pending_save.as_ref()
    }

    /// Returns a closed tracker whose generation follows this one.
    ///
    /// Tickets issued by `self` are stale for the successor and everything it opens later.
    pub fn successor(&self) -> Self {
        Self {
            session: None,
            generation: self.generation + 1,
            pending_save: None,
        }
    }

    /// Opens `path` at version `fingerprint`, replacing any open session without prompting.
    pub fn open_existing(
        &mut self,
        path: impl Into<String>,
        fingerprint: Option<Fingerprint>,
        text: impl Into<String>,
    ) {
        self.replace(Some(EditSession {
            target_path: path.into(),
            last_fingerprint: fingerprint,
            buffer: text.into(),
        }));
    }

    /// Starts a new, empty file at `path`.
    pub fn create_new(&mut self, path: impl Into<String>) {
        self.replace(Some(EditSession {
            target_path: path.into(),
            last_fingerprint: None,
            buffer: String::new(),
        }));
    }

    /// Closes the open session. Returns `false` when nothing was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.session.is_some();
        self.replace(None);
        was_open
    }

    /// Replaces the editor text.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoSession`] when no session is open.
    pub fn set_buffer(&mut self, text: impl Into<String>) -> Result<(), EditError> {
        let session = self.session.as_mut().ok_or(EditError::NoSession)?;
        session.buffer = text.into();
        Ok(())
    }

    /// Snapshots the current session for submission. `auto_close` decides whether a successful
    /// write closes the session.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoSession`] when nothing is open and [`EditError::SaveInFlight`] when
    /// an earlier save of this session has not finished.
    pub fn begin_save(&mut self, auto_close: bool) -> Result<SaveTicket, EditError> {
        let session = self.session.as_ref().ok_or(EditError::NoSession)?;
        if self.pending_save.is_some() {
            return Err(EditError::SaveInFlight(session.target_path.clone()));
        }
        let ticket = SaveTicket {
            generation: self.generation,
            path: session.target_path.clone(),
            wire_content: encode_text(&session.buffer),
            fingerprint: session.last_fingerprint.clone(),
            auto_close,
        };
        self.pending_save = Some(ticket.clone());
        Ok(ticket)
    }

    /// Applies a successful write.
    ///
    /// With the ticket's `auto_close` the session closes; otherwise it stays open and adopts the
    /// new fingerprint (the previous one is kept when the store reported none).
    pub fn finish_save(&mut self, ticket: &SaveTicket, receipt: &WriteReceipt) -> SaveOutcome {
        if ticket.generation != self.generation {
            return SaveOutcome::Stale;
        }
        self.pending_save = None;
        if ticket.auto_close {
            self.close();
            return SaveOutcome::Closed;
        }
        if let (Some(session), Some(fingerprint)) =
            (self.session.as_mut(), receipt.fingerprint.as_ref())
        {
            session.last_fingerprint = Some(fingerprint.clone());
        }
        SaveOutcome::KeptOpen
    }

    /// Records a failed write. The session stays open with its buffer intact.
    ///
    /// Returns `false` for a ticket of a superseded session.
    pub fn save_failed(&mut self, ticket: &SaveTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.pending_save = None;
        true
    }

    fn replace(&mut self, session: Option<EditSession>) {
        self.session = session;
        self.pending_save = None;
        self.generation += 1;
    }
}
