//! Reducer actions, side-effect intents, and transition logic for the store session.

use store_host::{
    decode_text, file_name, is_reserved_control_file, normalize_store_path, parent_of,
    FileContent, ListResult, StoreError, WriteReceipt,
};
use thiserror::Error;

use crate::{
    batch::{BatchId, BatchJob},
    editor::{EditError, SaveOutcome, SaveTicket},
    features::{feature_names, FeatureDocument},
    model::{ListingStatus, RequestSlot, StoreSession},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Store mutations other than editor saves.
pub enum Mutation {
    /// File deletion.
    Delete,
    /// Folder creation through a placeholder file.
    CreateFolder,
    /// Mini-app creation.
    CreateFeature,
}

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_store`] to mutate [`StoreSession`].
pub enum StoreAction {
    /// The credential was verified; starts a fresh session.
    SignedIn {
        /// Verified credential.
        credential: String,
    },
    /// Drop the session and everything cached in it.
    SignOut,
    /// A listing of `path` is about to be requested.
    ListingRequested {
        /// Location to list.
        path: String,
    },
    /// A listing request finished.
    ListingLoaded {
        /// Token issued by [`StoreAction::ListingRequested`].
        token: u64,
        /// Location that was listed.
        path: String,
        /// Classified answer.
        result: Result<ListResult, StoreError>,
    },
    /// A file is about to be opened.
    OpenRequested {
        /// File to open.
        path: String,
    },
    /// A file read for the editor finished.
    FileLoaded {
        /// Token issued by [`StoreAction::OpenRequested`].
        token: u64,
        /// File that was read.
        path: String,
        /// Read result.
        result: Result<FileContent, StoreError>,
    },
    /// Start editing a new, empty file.
    NewFile {
        /// Path the file will be created at.
        path: String,
    },
    /// Replace the editor text.
    EditBuffer {
        /// New text.
        text: String,
    },
    /// Close the editor without saving.
    CancelEdit,
    /// Snapshot the open session for a save.
    SaveRequested {
        /// Close the editor once the write succeeds.
        auto_close: bool,
    },
    /// A save finished.
    SaveCompleted {
        /// Ticket issued by [`StoreAction::SaveRequested`].
        ticket: SaveTicket,
        /// Write result.
        result: Result<WriteReceipt, StoreError>,
    },
    /// A delete or create finished.
    MutationCompleted {
        /// Which mutation.
        mutation: Mutation,
        /// Path that was mutated.
        path: String,
        /// Mutation result.
        result: Result<(), StoreError>,
    },
    /// Raw bytes for a download were read.
    DownloadLoaded {
        /// Downloaded file.
        path: String,
        /// Decoded bytes.
        result: Result<Vec<u8>, StoreError>,
    },
    /// A user-facing action targeted a reserved control file.
    ReservedFileTouched {
        /// Targeted path.
        path: String,
    },
    /// An upload of `total` files starts.
    BatchStarted {
        /// Number of selected files.
        total: usize,
    },
    /// One file of a batch finished, successfully or not.
    BatchItemCompleted {
        /// Batch the item belongs to.
        job_id: BatchId,
        /// File name.
        name: String,
        /// Upload result.
        result: Result<(), StoreError>,
    },
    /// The completion delay of a finished batch elapsed.
    BatchDismissed {
        /// Batch to hide.
        job_id: BatchId,
    },
    /// The gate secret was fetched.
    GateSecretLoaded {
        /// Secret text.
        secret: String,
    },
    /// The user answered the gate prompt (`None` when cancelled).
    GateAttempted {
        /// Entered text.
        input: Option<String>,
    },
    /// The features root was listed.
    FeaturesLoaded {
        /// Listing result.
        result: Result<ListResult, StoreError>,
    },
    /// A mini-app document is about to be loaded.
    FeatureRequested {
        /// Mini-app name.
        name: String,
    },
    /// A mini-app document load finished.
    FeatureLoaded {
        /// Token issued by [`StoreAction::FeatureRequested`].
        token: u64,
        /// Mini-app name.
        name: String,
        /// Entry-point read result.
        result: Result<FileContent, StoreError>,
    },
    /// Close the mini-app viewer.
    FeatureClosed,
    /// Report a failure that changes no state.
    OperationFailed {
        /// Failure to report.
        error: StoreError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_store`] for the controller to execute.
pub enum StoreEffect {
    /// Re-list the current location.
    RefreshListing,
    /// Re-list the features root.
    RefreshFeatures,
    /// Show a user-visible notification.
    Notify {
        /// Short title.
        title: String,
        /// Message body.
        body: String,
    },
    /// The session was torn down; the view returns to the sign-in screen.
    ResetSession,
    /// Hide the finished batch indicator after the configured delay.
    ScheduleBatchDismiss {
        /// Finished batch.
        job_id: BatchId,
    },
    /// Hand bytes to the user as a file.
    OfferDownload {
        /// Suggested file name.
        file_name: String,
        /// File bytes.
        bytes: Vec<u8>,
    },
}

impl StoreEffect {
    fn error(err: &StoreError) -> Self {
        Self::Notify {
            title: err.title().to_string(),
            body: err.to_string(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that do not apply to the current session.
pub enum ReducerError {
    /// The action needs a signed-in session.
    #[error("not signed in")]
    NotSignedIn,
    /// A response arrived after a newer request in the same slot.
    #[error("discarded stale {0:?} response")]
    StaleResponse(RequestSlot),
    /// A save result arrived for a superseded edit session.
    #[error("discarded save result for a superseded edit session")]
    StaleSave,
    /// Editor operation rejected.
    #[error(transparent)]
    Edit(#[from] EditError),
    /// A batch completion does not belong to the running batch.
    #[error("batch {0} is not running")]
    UnknownBatch(BatchId),
}

/// Applies a [`StoreAction`] to the session and collects resulting side effects.
///
/// # Errors
///
/// Returns [`ReducerError`] when the action does not apply: no signed-in session, a superseded
/// response, an editor operation without an open file, or a completion for a batch that is not
/// running.
pub fn reduce_store(
    session: &mut StoreSession,
    action: StoreAction,
) -> Result<Vec<StoreEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        StoreAction::SignedIn { credential } => {
            *session = session.reset();
            session.sign_in(credential);
            effects.push(StoreEffect::RefreshListing);
            return Ok(effects);
        }
        StoreAction::SignOut => {
            *session = session.reset();
            effects.push(StoreEffect::ResetSession);
            return Ok(effects);
        }
        _ if !session.is_signed_in() => return Err(ReducerError::NotSignedIn),
        StoreAction::ListingRequested { .. } => {
            session.issue_request(RequestSlot::Listing);
            session.listing_status = ListingStatus::Loading;
        }
        StoreAction::ListingLoaded {
            token,
            path,
            result,
        } => {
            if !session.is_current(RequestSlot::Listing, token) {
                return Err(ReducerError::StaleResponse(RequestSlot::Listing));
            }
            let path = normalize_store_path(&path);
            match result {
                Ok(ListResult::Entries(entries)) => {
                    session.location = path;
                    session.raw_entries = entries;
                    session.recompute_rows();
                    session.listing_status = ListingStatus::Ready;
                }
                Ok(ListResult::SingleFile(content)) => {
                    session.location = parent_of(&path).unwrap_or_default();
                    if is_reserved_control_file(&path) {
                        return Ok(trip_reset(session));
                    }
                    session.issue_request(RequestSlot::Open);
                    open_in_editor(session, &path, content, &mut effects);
                    effects.push(StoreEffect::RefreshListing);
                }
                Ok(ListResult::Error(message)) => {
                    session.location = path;
                    session.raw_entries.clear();
                    session.recompute_rows();
                    session.listing_status = ListingStatus::Failed(message);
                }
                Err(err) => {
                    session.listing_status = ListingStatus::Failed(err.to_string());
                    effects.push(StoreEffect::error(&err));
                }
            }
        }
        StoreAction::OpenRequested { path } => {
            if is_reserved_control_file(&path) {
                return Ok(trip_reset(session));
            }
            session.issue_request(RequestSlot::Open);
        }
        StoreAction::FileLoaded {
            token,
            path,
            result,
        } => {
            if !session.is_current(RequestSlot::Open, token) {
                return Err(ReducerError::StaleResponse(RequestSlot::Open));
            }
            match result {
                Ok(content) => {
                    open_in_editor(session, &normalize_store_path(&path), content, &mut effects)
                }
                Err(err) => effects.push(StoreEffect::error(&err)),
            }
        }
        StoreAction::NewFile { path } => {
            if is_reserved_control_file(&path) {
                effects.push(policy_violation(&path));
            } else {
                session.issue_request(RequestSlot::Open);
                session.editor.create_new(normalize_store_path(&path));
            }
        }
        StoreAction::EditBuffer { text } => session.editor.set_buffer(text)?,
        StoreAction::CancelEdit => {
            session.issue_request(RequestSlot::Open);
            session.editor.close();
        }
        StoreAction::SaveRequested { auto_close } => {
            session.editor.begin_save(auto_close)?;
        }
        StoreAction::SaveCompleted { ticket, result } => match result {
            Ok(receipt) => match session.editor.finish_save(&ticket, &receipt) {
                SaveOutcome::Stale => return Err(ReducerError::StaleSave),
                SaveOutcome::Closed | SaveOutcome::KeptOpen => {
                    effects.push(StoreEffect::RefreshListing);
                }
            },
            Err(err) => {
                if !session.editor.save_failed(&ticket) {
                    return Err(ReducerError::StaleSave);
                }
                effects.push(StoreEffect::error(&err));
            }
        },
        StoreAction::MutationCompleted {
            mutation,
            path: _,
            result,
        } => match (mutation, result) {
            (Mutation::Delete | Mutation::CreateFolder, Ok(())) => {
                effects.push(StoreEffect::RefreshListing);
            }
            (Mutation::CreateFeature, Ok(())) => effects.push(StoreEffect::RefreshFeatures),
            (_, Err(err)) => effects.push(StoreEffect::error(&err)),
        },
        StoreAction::DownloadLoaded { path, result } => match result {
            Ok(bytes) => effects.push(StoreEffect::OfferDownload {
                file_name: file_name(&path).to_string(),
                bytes,
            }),
            Err(err) => effects.push(StoreEffect::error(&err)),
        },
        StoreAction::ReservedFileTouched { path } => effects.push(policy_violation(&path)),
        StoreAction::BatchStarted { total } => {
            if total > 0 {
                let id = session.allocate_batch_id();
                session.batch = BatchJob::start(id, total);
            }
        }
        StoreAction::BatchItemCompleted {
            job_id,
            name,
            result,
        } => {
            let job = session
                .batch
                .as_mut()
                .filter(|job| job.id() == job_id)
                .ok_or(ReducerError::UnknownBatch(job_id))?;
            let progress = job
                .step(result.is_ok())
                .ok_or(ReducerError::UnknownBatch(job_id))?;
            if let Err(err) = result {
                effects.push(StoreEffect::Notify {
                    title: "Upload failed".to_string(),
                    body: format!("{name}: {err}"),
                });
            }
            if progress.finished {
                effects.push(StoreEffect::RefreshListing);
                effects.push(StoreEffect::ScheduleBatchDismiss { job_id });
            }
        }
        StoreAction::BatchDismissed { job_id } => {
            if let Some(job) = session.batch.as_mut() {
                job.dismiss(job_id);
            }
        }
        StoreAction::GateSecretLoaded { secret } => session.gate.cache_secret(secret),
        StoreAction::GateAttempted { input } => {
            if let Some(input) = input {
                if session.gate.try_unlock(&input) {
                    session.recompute_rows();
                } else {
                    effects.push(StoreEffect::Notify {
                        title: "Access denied".to_string(),
                        body: format!("Wrong password for `{}`", session.gated_dir_name),
                    });
                }
            }
        }
        StoreAction::FeaturesLoaded { result } => match result {
            Ok(listing) => session.features = feature_names(&listing),
            Err(err) => {
                session.features.clear();
                effects.push(StoreEffect::error(&err));
            }
        },
        StoreAction::FeatureRequested { .. } => {
            session.issue_request(RequestSlot::Feature);
        }
        StoreAction::FeatureLoaded {
            token,
            name,
            result,
        } => {
            if !session.is_current(RequestSlot::Feature, token) {
                return Err(ReducerError::StaleResponse(RequestSlot::Feature));
            }
            match result.and_then(|content| Ok(decode_text(&content.content)?)) {
                Ok(html) => session.feature_view = Some(FeatureDocument { name, html }),
                Err(StoreError::NotFound { .. }) => effects.push(StoreEffect::Notify {
                    title: "Not found".to_string(),
                    body: format!("Feature `{name}` has no content."),
                }),
                Err(err) => effects.push(StoreEffect::error(&err)),
            }
        }
        StoreAction::FeatureClosed => {
            session.issue_request(RequestSlot::Feature);
            session.feature_view = None;
        }
        StoreAction::OperationFailed { error } => effects.push(StoreEffect::error(&error)),
    }
    Ok(effects)
}

fn open_in_editor(
    session: &mut StoreSession,
    path: &str,
    content: FileContent,
    effects: &mut Vec<StoreEffect>,
) {
    match decode_text(&content.content) {
        Ok(text) => session
            .editor
            .open_existing(path, content.fingerprint, text),
        Err(err) => effects.push(StoreEffect::error(&StoreError::from(err))),
    }
}

fn trip_reset(session: &mut StoreSession) -> Vec<StoreEffect> {
    *session = session.reset();
    vec![StoreEffect::ResetSession]
}

fn policy_violation(path: &str) -> StoreEffect {
    StoreEffect::error(&StoreError::PolicyViolation(file_name(path).to_string()))
}
