//! Runtime provider and context wiring for the store client views.
//!
//! The controller owns the session; this module mirrors it into a reactive signal and hands view
//! code a way to spawn controller operations.

use std::{future::Future, rc::Rc};

use leptos::*;
use store_host::{StoreConfig, StoreHostServices, UploadSource};

use crate::{controller::StoreController, model::StoreSession, visibility::ListingRow};

#[derive(Clone, Copy)]
/// Leptos context for reading the store session and starting store operations.
pub struct StoreRuntimeContext {
    /// Controller executing operations against the injected host services.
    pub controller: StoredValue<StoreController>,
    /// Reactive mirror of the controller session.
    pub session: RwSignal<StoreSession>,
}

impl StoreRuntimeContext {
    /// Wraps `controller` and mirrors every session change into [`StoreRuntimeContext::session`].
    pub fn new(controller: StoreController) -> Self {
        let session = create_rw_signal(controller.snapshot());
        controller.subscribe(move |snapshot| session.set(snapshot.clone()));
        Self {
            controller: store_value(controller),
            session,
        }
    }

    /// Spawns `operation` on the local executor with a handle to the controller.
    pub fn run<F, Fut>(&self, operation: F)
    where
        F: FnOnce(StoreController) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        spawn_local(operation(self.controller.get_value()));
    }

    /// Signs in; a failure is written to `error` for inline display.
    pub fn login(&self, credential: String, error: WriteSignal<Option<String>>) {
        self.run(move |controller| async move {
            let result = controller.login(&credential).await;
            error.set(result.err().map(|err| err.to_string()));
        });
    }

    /// Signs out.
    pub fn logout(&self) {
        self.run(|controller| async move { controller.logout().await });
    }

    /// Activates a listing row.
    pub fn activate(&self, row: ListingRow) {
        self.run(move |controller| async move { controller.activate_row(&row).await });
    }

    /// Navigates to a typed path.
    pub fn navigate(&self, path: String) {
        self.run(move |controller| async move { controller.navigate(&path).await });
    }

    /// Steps one level up.
    pub fn go_up(&self) {
        self.run(|controller| async move { controller.go_up().await });
    }

    /// Reloads the current listing.
    pub fn refresh(&self) {
        self.run(|controller| async move { controller.refresh().await });
    }

    /// Prompts for a name and opens an empty editor on it.
    pub fn create_file(&self) {
        self.run(|controller| async move { controller.create_file().await });
    }

    /// Prompts for a folder name and creates it with a placeholder file.
    pub fn create_folder(&self) {
        self.run(|controller| async move { controller.create_folder().await });
    }

    /// Replaces the editor buffer.
    pub fn edit(&self, text: String) {
        self.controller.with_value(|controller| controller.edit_buffer(text));
    }

    /// Saves the editor buffer and closes the editor.
    pub fn save(&self) {
        self.run(|controller| async move { controller.save().await });
    }

    /// Saves the editor buffer and keeps editing.
    pub fn save_and_keep_editing(&self) {
        self.run(|controller| async move { controller.save_and_keep_editing().await });
    }

    /// Discards the editor.
    pub fn cancel_edit(&self) {
        self.controller.with_value(StoreController::cancel_edit);
    }

    /// Prompts for the gate secret.
    pub fn unlock_gate(&self) {
        self.run(|controller| async move {
            controller.unlock_gate().await;
        });
    }

    /// Deletes the file behind `row`.
    pub fn delete(&self, row: ListingRow) {
        self.run(move |controller| async move { controller.delete_entry(&row).await });
    }

    /// Downloads the file behind `row`.
    pub fn download(&self, row: ListingRow) {
        self.run(move |controller| async move { controller.download_entry(&row).await });
    }

    /// Uploads the selected files into the current location.
    pub fn upload(&self, sources: Vec<Rc<dyn UploadSource>>) {
        self.run(move |controller| async move { controller.upload_files(&sources).await });
    }

    /// Reloads the mini-app names.
    pub fn list_features(&self) {
        self.run(|controller| async move { controller.list_features().await });
    }

    /// Prompts for a name and creates a mini-app from the starter document.
    pub fn create_feature(&self) {
        self.run(|controller| async move { controller.create_feature().await });
    }

    /// Opens a mini-app.
    pub fn run_feature(&self, name: String) {
        self.run(move |controller| async move { controller.run_feature(&name).await });
    }

    /// Closes the open mini-app.
    pub fn close_feature(&self) {
        self.controller.with_value(StoreController::close_feature);
    }
}

/// Assembles the host bundle selected for this build.
pub fn default_host_services(config: StoreConfig) -> StoreHostServices {
    store_host_web::build_host_services(config)
}

#[component]
/// Provides [`StoreRuntimeContext`] to descendant components.
pub fn StoreProvider(
    /// Injected host bundle assembled by the entry layer.
    host_services: StoreHostServices,
    children: Children,
) -> impl IntoView {
    logging::log!(
        "store runtime using {} host",
        host_services.host_strategy.as_str()
    );
    provide_context(StoreRuntimeContext::new(StoreController::new(host_services)));

    children().into_view()
}

/// Returns the [`StoreRuntimeContext`] provided by an enclosing [`StoreProvider`], if any.
pub fn use_store_runtime() -> Option<StoreRuntimeContext> {
    use_context::<StoreRuntimeContext>()
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use store_host::{MemoryStoreTransport, StoreConfig, StoreHostServices};

    use super::*;

    fn context_with(store: &MemoryStoreTransport) -> StoreRuntimeContext {
        let services = StoreHostServices::noop(StoreConfig::default())
            .with_transport(Rc::new(store.clone()));
        StoreRuntimeContext::new(StoreController::new(services))
    }

    #[test]
    fn editor_helpers_update_the_mirrored_session() {
        let _ = create_runtime();
        let store = MemoryStoreTransport::with_credential("1234");
        store.insert_text("f.txt", "draft");
        let runtime = context_with(&store);
        let controller = runtime.controller.get_value();
        block_on(controller.login("1234")).expect("login");
        block_on(controller.open_file("f.txt"));

        runtime.edit("draft, edited".to_string());
        let mirrored = runtime.session.get_untracked();
        assert_eq!(
            mirrored.editor.session().map(|s| s.buffer.as_str()),
            Some("draft, edited")
        );

        runtime.cancel_edit();
        assert!(runtime.session.get_untracked().editor.session().is_none());
        assert_eq!(store.text("f.txt").as_deref(), Some("draft"));
    }

    #[test]
    fn closing_a_feature_without_one_open_is_harmless() {
        let _ = create_runtime();
        let runtime = context_with(&MemoryStoreTransport::with_credential("1234"));
        block_on(runtime.controller.get_value().login("1234")).expect("login");
        runtime.close_feature();
        assert_eq!(runtime.session.get_untracked().feature_view, None);
    }
}
