//! Async operations composed from the store client, the reducer, and host services.
//!
//! Each operation suspends only itself. Results are routed back through [`reduce_store`], which
//! discards responses that were superseded while they were in flight.

use std::{cell::RefCell, rc::Rc};

use futures::{
    future::{FutureExt, LocalBoxFuture},
    stream::{FuturesUnordered, StreamExt},
};
use leptos::logging;
use store_host::{
    decode_binary, decode_text, encode_bytes, encode_text, feature_entry_path,
    folder_placeholder_path, is_reserved_control_file, is_single_segment, join_store_path,
    normalize_store_path, parent_of, ReservedFile, StoreConfig, StoreError, StoreHostServices,
    UploadSource,
};

use crate::{
    batch::BatchJob,
    client::StoreClient,
    features::{starter_document, validate_feature_name},
    model::{RequestSlot, StoreSession},
    reducer::{reduce_store, Mutation, StoreAction, StoreEffect},
    visibility::{navigation_requires_gate, ListingRow, RowAction},
};

/// Text of the placeholder file that materializes a new folder.
pub const FOLDER_PLACEHOLDER_TEXT: &str = "placeholder";

type SessionListener = Rc<dyn Fn(&StoreSession)>;

#[derive(Clone)]
/// Application-level controller owning the session and the host services.
pub struct StoreController {
    services: StoreHostServices,
    client: StoreClient,
    session: Rc<RefCell<StoreSession>>,
    listeners: Rc<RefCell<Vec<SessionListener>>>,
}

impl StoreController {
    /// Creates a signed-out controller over `services`.
    pub fn new(services: StoreHostServices) -> Self {
        let session = StoreSession::new(services.config.gated_dir_name.clone());
        Self {
            client: StoreClient::new(services.transport.clone()),
            services,
            session: Rc::new(RefCell::new(session)),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Client configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.services.config
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> StoreSession {
        self.session.borrow().clone()
    }

    /// Registers a callback invoked with the session after every applied action.
    pub fn subscribe(&self, listener: impl Fn(&StoreSession) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn publish(&self) {
        let listeners = self.listeners.borrow().clone();
        if listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn dispatch(&self, action: StoreAction) -> Option<Vec<StoreEffect>> {
        let result = reduce_store(&mut self.session.borrow_mut(), action);
        match result {
            Ok(effects) => {
                self.publish();
                Some(effects)
            }
            Err(err) => {
                logging::warn!("store reducer rejected action: {err}");
                None
            }
        }
    }

    async fn apply(&self, action: StoreAction) {
        if let Some(effects) = self.dispatch(action) {
            self.run_effects(effects).await;
        }
    }

    fn run_effects(&self, effects: Vec<StoreEffect>) -> LocalBoxFuture<'_, ()> {
        async move {
            for effect in effects {
                match effect {
                    StoreEffect::RefreshListing => self.refresh().await,
                    StoreEffect::RefreshFeatures => self.list_features().await,
                    StoreEffect::Notify { title, body } => self.notify(&title, &body).await,
                    StoreEffect::ResetSession => logging::log!("store session reset"),
                    StoreEffect::ScheduleBatchDismiss { job_id } => {
                        self.services
                            .timers
                            .sleep(self.services.config.batch_dismiss_delay_ms)
                            .await;
                        self.dispatch(StoreAction::BatchDismissed { job_id });
                    }
                    StoreEffect::OfferDownload { file_name, bytes } => {
                        if let Err(err) = self.services.downloads.offer(&file_name, &bytes).await
                        {
                            logging::warn!("download of `{file_name}` failed: {err}");
                            self.notify("Download failed", &err).await;
                        }
                    }
                }
            }
        }
        .boxed_local()
    }

    async fn notify(&self, title: &str, body: &str) {
        if let Err(err) = self.services.notifications.notify(title, body).await {
            logging::warn!("notification `{title}` not delivered: {err}");
        }
    }

    fn credential(&self) -> Option<String> {
        let credential = self.session.borrow().credential().map(str::to_string);
        if credential.is_none() {
            logging::warn!("store operation skipped: not signed in");
        }
        credential
    }

    fn location(&self) -> String {
        self.session.borrow().location.clone()
    }

    async fn prompt_segment(&self, message: &str) -> Option<String> {
        let answer = self.services.dialogs.prompt(message).await?;
        if is_single_segment(&answer) {
            return Some(answer.trim().to_string());
        }
        if !answer.trim().is_empty() {
            self.notify("Invalid name", &format!("`{}` is not a valid name", answer.trim()))
                .await;
        }
        None
    }

    /// Verifies `credential` and starts a fresh session at the root.
    ///
    /// # Errors
    ///
    /// Returns the verification failure; the session stays signed out.
    pub async fn login(&self, credential: &str) -> Result<(), StoreError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(StoreError::Auth);
        }
        if let Err(err) = self.client.verify(credential).await {
            logging::warn!("sign-in failed: {err}");
            return Err(err);
        }
        logging::log!("store session started");
        self.apply(StoreAction::SignedIn {
            credential: credential.to_string(),
        })
        .await;
        Ok(())
    }

    /// Drops the session, the cached credential, and the gate state.
    pub async fn logout(&self) {
        self.apply(StoreAction::SignOut).await;
    }

    async fn load_listing(&self, path: &str) {
        let Some(credential) = self.credential() else {
            return;
        };
        let path = normalize_store_path(path);
        if self
            .dispatch(StoreAction::ListingRequested { path: path.clone() })
            .is_none()
        {
            return;
        }
        let token = self.session.borrow().current_request(RequestSlot::Listing);
        let result = self.client.list(&credential, &path).await;
        if let Err(err) = &result {
            logging::warn!("listing `/{path}` failed: {err}");
        }
        self.apply(StoreAction::ListingLoaded {
            token,
            path,
            result,
        })
        .await;
    }

    /// Lists `path`, passing the area gate first when the path lies behind it.
    pub async fn navigate(&self, path: &str) {
        let gated = {
            let session = self.session.borrow();
            navigation_requires_gate(path, session.gate.is_unlocked(), &session.gated_dir_name)
        };
        if gated && !self.unlock_gate().await {
            return;
        }
        self.load_listing(path).await;
    }

    /// Lists the parent of the current location. No-op at the root.
    pub async fn go_up(&self) {
        if let Some(parent) = parent_of(&self.location()) {
            self.load_listing(&parent).await;
        }
    }

    /// Re-lists the current location.
    pub async fn refresh(&self) {
        let location = self.location();
        self.load_listing(&location).await;
    }

    /// Runs the action attached to a listing row.
    pub async fn activate_row(&self, row: &ListingRow) {
        match row.action {
            RowAction::GoUp => self.load_listing(&row.path).await,
            RowAction::Navigate | RowAction::PromptGate => self.navigate(&row.path).await,
            RowAction::OpenFile => self.open_file(&row.path).await,
        }
    }

    /// Opens `path` in the editor, replacing any open session.
    ///
    /// Opening a reserved control file tears the session down instead.
    pub async fn open_file(&self, path: &str) {
        let Some(credential) = self.credential() else {
            return;
        };
        let path = normalize_store_path(path);
        let Some(effects) = self.dispatch(StoreAction::OpenRequested { path: path.clone() })
        else {
            return;
        };
        self.run_effects(effects).await;
        if !self.session.borrow().is_signed_in() {
            logging::warn!("reserved control file opened; session reset");
            return;
        }
        let token = self.session.borrow().current_request(RequestSlot::Open);
        let result = self.client.read_file(&credential, &path).await;
        if let Err(err) = &result {
            logging::warn!("opening `/{path}` failed: {err}");
        }
        self.apply(StoreAction::FileLoaded {
            token,
            path,
            result,
        })
        .await;
    }

    /// Asks for a name and opens an empty editor for a new file in the current location.
    pub async fn create_file(&self) {
        if self.credential().is_none() {
            return;
        }
        let Some(name) = self.prompt_segment("New file name (e.g. notes.txt):").await else {
            return;
        };
        let path = join_store_path(&self.location(), &name);
        self.apply(StoreAction::NewFile { path }).await;
    }

    /// Replaces the editor text.
    pub fn edit_buffer(&self, text: impl Into<String>) {
        self.dispatch(StoreAction::EditBuffer { text: text.into() });
    }

    /// Writes the editor buffer with the fingerprint the open session holds now.
    ///
    /// Success closes the editor and refreshes the listing; failure leaves the editor open with
    /// its content intact.
    pub async fn save(&self) {
        self.submit_save(true).await;
    }

    /// Like [`StoreController::save`], but the editor stays open on the new version.
    pub async fn save_and_keep_editing(&self) {
        self.submit_save(false).await;
    }

    async fn submit_save(&self, auto_close: bool) {
        let Some(credential) = self.credential() else {
            return;
        };
        if self
            .dispatch(StoreAction::SaveRequested { auto_close })
            .is_none()
        {
            return;
        }
        let Some(ticket) = self.session.borrow().editor.pending_save().cloned() else {
            return;
        };
        let result = self
            .client
            .write_file(
                &credential,
                &ticket.path,
                ticket.wire_content.clone(),
                ticket.fingerprint.as_ref(),
            )
            .await;
        if let Err(err) = &result {
            logging::warn!("saving `/{}` failed: {err}", ticket.path);
        }
        self.apply(StoreAction::SaveCompleted { ticket, result })
            .await;
    }

    /// Closes the editor without saving.
    pub fn cancel_edit(&self) {
        self.dispatch(StoreAction::CancelEdit);
    }

    /// Deletes the file behind `row` after confirmation.
    pub async fn delete_entry(&self, row: &ListingRow) {
        let Some(credential) = self.credential() else {
            return;
        };
        if is_reserved_control_file(&row.path) {
            self.apply(StoreAction::ReservedFileTouched {
                path: row.path.clone(),
            })
            .await;
            return;
        }
        let Some(fingerprint) = row.fingerprint.as_ref().filter(|_| row.can_delete()) else {
            logging::warn!("`/{}` cannot be deleted", row.path);
            return;
        };
        if !self
            .services
            .dialogs
            .confirm(&format!("Delete {}?", row.label))
            .await
        {
            return;
        }
        let result = self
            .client
            .delete_file(&credential, &row.path, fingerprint)
            .await;
        if let Err(err) = &result {
            logging::warn!("deleting `/{}` failed: {err}", row.path);
        }
        self.apply(StoreAction::MutationCompleted {
            mutation: Mutation::Delete,
            path: row.path.clone(),
            result,
        })
        .await;
    }

    /// Reads the file behind `row` as raw bytes and offers it for download.
    pub async fn download_entry(&self, row: &ListingRow) {
        let Some(credential) = self.credential() else {
            return;
        };
        if is_reserved_control_file(&row.path) {
            self.apply(StoreAction::ReservedFileTouched {
                path: row.path.clone(),
            })
            .await;
            return;
        }
        if !row.can_download() {
            return;
        }
        let result = match self.client.read_file(&credential, &row.path).await {
            Ok(content) => decode_binary(&content.content).map_err(StoreError::from),
            Err(err) => Err(err),
        };
        self.apply(StoreAction::DownloadLoaded {
            path: row.path.clone(),
            result,
        })
        .await;
    }

    /// Uploads every source into the current location as one batch.
    ///
    /// Files are read and written concurrently. Each failure is reported on its own; the listing
    /// is refreshed once, after the last file completes.
    pub async fn upload_files(&self, sources: &[Rc<dyn UploadSource>]) {
        let Some(credential) = self.credential() else {
            return;
        };
        if sources.is_empty() {
            return;
        }
        let location = self.location();
        self.dispatch(StoreAction::BatchStarted {
            total: sources.len(),
        });
        let Some(job_id) = self.session.borrow().batch.as_ref().map(BatchJob::id) else {
            return;
        };

        let mut pending: FuturesUnordered<_> = sources
            .iter()
            .map(|source| self.upload_one(&credential, &location, source.as_ref()))
            .collect();
        while let Some((name, result)) = pending.next().await {
            if let Err(err) = &result {
                logging::warn!("upload of `{name}` failed: {err}");
            }
            self.apply(StoreAction::BatchItemCompleted {
                job_id,
                name,
                result,
            })
            .await;
        }
        logging::log!("upload batch {job_id} finished");
    }

    async fn upload_one(
        &self,
        credential: &str,
        location: &str,
        source: &dyn UploadSource,
    ) -> (String, Result<(), StoreError>) {
        let name = source.name();
        let result: Result<(), StoreError> = async {
            if is_reserved_control_file(&name) {
                return Err(StoreError::PolicyViolation(name.clone()));
            }
            let bytes = source
                .read_bytes()
                .await
                .map_err(|reason| StoreError::LocalFile {
                    name: name.clone(),
                    reason,
                })?;
            let path = join_store_path(location, &name);
            self.client
                .write_file(credential, &path, encode_bytes(&bytes), None)
                .await
                .map(|_| ())
        }
        .await;
        (name, result)
    }

    /// Asks for a name and creates a folder in the current location.
    pub async fn create_folder(&self) {
        let Some(credential) = self.credential() else {
            return;
        };
        let Some(name) = self.prompt_segment("Folder name:").await else {
            return;
        };
        let path = folder_placeholder_path(&self.location(), &name);
        let result = self
            .client
            .write_file(&credential, &path, encode_text(FOLDER_PLACEHOLDER_TEXT), None)
            .await
            .map(|_| ());
        self.apply(StoreAction::MutationCompleted {
            mutation: Mutation::CreateFolder,
            path,
            result,
        })
        .await;
    }

    /// Unlocks the area gate for the rest of the session.
    ///
    /// The secret is fetched once per session, then the user is prompted. Returns whether the gate
    /// is unlocked afterwards.
    pub async fn unlock_gate(&self) -> bool {
        let Some(credential) = self.credential() else {
            return false;
        };
        let (unlocked, cached, gated_dir_name) = {
            let session = self.session.borrow();
            (
                session.gate.is_unlocked(),
                session.gate.cached_secret().is_some(),
                session.gated_dir_name.clone(),
            )
        };
        if unlocked {
            return true;
        }
        if !cached {
            let secret = self
                .client
                .read_file(&credential, ReservedFile::AreaGateSecret.file_name())
                .await
                .and_then(|content| decode_text(&content.content).map_err(StoreError::from));
            match secret {
                Ok(secret) => {
                    self.dispatch(StoreAction::GateSecretLoaded { secret });
                }
                Err(err) => {
                    logging::warn!("gate secret unavailable: {err}");
                    self.apply(StoreAction::OperationFailed { error: err }).await;
                    return false;
                }
            }
        }
        let input = self
            .services
            .dialogs
            .prompt(&format!("Password for {gated_dir_name}:"))
            .await;
        self.apply(StoreAction::GateAttempted { input }).await;
        self.session.borrow().gate.is_unlocked()
    }

    /// Lists installed mini-apps.
    pub async fn list_features(&self) {
        let Some(credential) = self.credential() else {
            return;
        };
        let result = self
            .client
            .list(&credential, &self.services.config.features_dir)
            .await;
        self.apply(StoreAction::FeaturesLoaded { result }).await;
    }

    /// Loads the entry document of mini-app `name` into the viewer.
    pub async fn run_feature(&self, name: &str) {
        let Some(credential) = self.credential() else {
            return;
        };
        let Some(name) = validate_feature_name(name) else {
            self.notify("Invalid name", &format!("`{name}` is not a mini-app"))
                .await;
            return;
        };
        if self
            .dispatch(StoreAction::FeatureRequested { name: name.clone() })
            .is_none()
        {
            return;
        }
        let token = self.session.borrow().current_request(RequestSlot::Feature);
        let path = feature_entry_path(&self.services.config.features_dir, &name);
        let result = self.client.read_file(&credential, &path).await;
        self.apply(StoreAction::FeatureLoaded {
            token,
            name,
            result,
        })
        .await;
    }

    /// Asks for a name and installs a starter mini-app.
    pub async fn create_feature(&self) {
        let Some(credential) = self.credential() else {
            return;
        };
        let Some(name) = self.prompt_segment("Feature name:").await else {
            return;
        };
        let path = feature_entry_path(&self.services.config.features_dir, &name);
        let result = self
            .client
            .write_file(&credential, &path, encode_text(&starter_document(&name)), None)
            .await
            .map(|_| ());
        self.apply(StoreAction::MutationCompleted {
            mutation: Mutation::CreateFeature,
            path,
            result,
        })
        .await;
    }

    /// Closes the mini-app viewer.
    pub fn close_feature(&self) {
        self.dispatch(StoreAction::FeatureClosed);
    }
}
