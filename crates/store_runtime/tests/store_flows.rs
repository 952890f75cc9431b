use std::rc::Rc;

use futures::executor::block_on;
use pretty_assertions::assert_eq;
use store_host::{
    encode_text, fs::memory::write_body_json, FileContent, Fingerprint, ListResult,
    MemoryDownloadService, MemoryNotificationService, MemoryStoreTransport, MemoryUploadSource,
    ScriptedDialogService, StoreConfig, StoreError, StoreHostServices, StoreMethod, UploadSource,
    WriteBody, WriteReceipt,
};
use store_runtime::{
    reduce_store, ListingStatus, ReducerError, RequestSlot, StoreAction, StoreClient,
    StoreController, StoreEffect, StoreSession,
};

const PIN: &str = "4321";

struct Fixture {
    controller: StoreController,
    store: MemoryStoreTransport,
    notices: MemoryNotificationService,
    dialogs: ScriptedDialogService,
}

fn signed_in_fixture(seed: &[(&str, &str)]) -> Fixture {
    let store = MemoryStoreTransport::with_credential(PIN);
    for (path, text) in seed {
        store.insert_text(path, text);
    }
    let notices = MemoryNotificationService::default();
    let dialogs = ScriptedDialogService::default();
    let services = StoreHostServices::noop(StoreConfig::default())
        .with_transport(Rc::new(store.clone()))
        .with_notifications(Rc::new(notices.clone()))
        .with_dialogs(Rc::new(dialogs.clone()))
        .with_downloads(Rc::new(MemoryDownloadService::default()));
    let controller = StoreController::new(services);
    block_on(controller.login(PIN)).expect("login");
    Fixture {
        controller,
        store,
        notices,
        dialogs,
    }
}

fn sign_in(session: &mut StoreSession) {
    reduce_store(
        session,
        StoreAction::SignedIn {
            credential: PIN.to_string(),
        },
    )
    .expect("sign in");
}

fn sign_out_and_in(session: &mut StoreSession) {
    reduce_store(session, StoreAction::SignOut).expect("sign out");
    sign_in(session);
}

fn open_loaded(session: &mut StoreSession, path: &str, sha: &str) {
    reduce_store(
        session,
        StoreAction::OpenRequested {
            path: path.to_string(),
        },
    )
    .expect("open");
    let token = session.current_request(RequestSlot::Open);
    reduce_store(
        session,
        StoreAction::FileLoaded {
            token,
            path: path.to_string(),
            result: Ok(FileContent {
                name: path.to_string(),
                path: path.to_string(),
                content: encode_text(path),
                fingerprint: Some(Fingerprint::new(sha)),
            }),
        },
    )
    .expect("loaded");
}

fn listing_requests(store: &MemoryStoreTransport, wire: &str) -> usize {
    store
        .requests()
        .iter()
        .filter(|request| request.method == StoreMethod::Get && request.path == wire)
        .count()
}

fn last_write(store: &MemoryStoreTransport) -> (String, WriteBody) {
    let request = store
        .requests()
        .into_iter()
        .rev()
        .find(|request| request.method == StoreMethod::Put)
        .expect("a write was sent");
    let body = serde_json::from_str(request.body.as_deref().expect("write body")).expect("json");
    (request.path, body)
}

#[test]
fn save_submits_the_fingerprint_of_the_file_opened_last() {
    let fx = signed_in_fixture(&[("f.txt", "first"), ("g.txt", "second")]);
    let f_version = fx.store.fingerprint("f.txt").expect("f");
    let g_version = fx.store.fingerprint("g.txt").expect("g");
    assert_ne!(f_version, g_version);

    block_on(fx.controller.open_file("f.txt"));
    block_on(fx.controller.open_file("g.txt"));
    fx.controller.edit_buffer("second, edited");
    block_on(fx.controller.save());

    let (path, body) = last_write(&fx.store);
    assert_eq!(path, "/g.txt");
    assert_eq!(body.sha, Some(g_version));
    assert_eq!(fx.store.text("f.txt").as_deref(), Some("first"));
    assert_eq!(fx.store.text("g.txt").as_deref(), Some("second, edited"));
}

#[test]
fn batch_with_one_failure_completes_and_refreshes_once() {
    let fx = signed_in_fixture(&[]);
    fx.store.fail_writes_to("c.txt");
    let sources: Vec<Rc<dyn UploadSource>> = ["a.txt", "b.txt", "c.txt", "d.txt", "e.txt"]
        .into_iter()
        .map(|name| {
            Rc::new(MemoryUploadSource::new(name, name.as_bytes())) as Rc<dyn UploadSource>
        })
        .collect();

    let root_listings_before = listing_requests(&fx.store, "/");
    block_on(fx.controller.upload_files(&sources));

    let session = fx.controller.snapshot();
    let job = session.batch.expect("batch recorded");
    assert_eq!(job.completed(), 5);
    assert_eq!(job.failures(), 1);
    assert!(job.is_finished());
    assert!(!job.is_active());
    assert_eq!(listing_requests(&fx.store, "/") - root_listings_before, 1);

    let failures = fx.notices.with_title("Upload failed");
    assert_eq!(failures.len(), 1);
    assert!(failures[0].body.starts_with("c.txt: "));
    assert_eq!(fx.store.text("d.txt").as_deref(), Some("d.txt"));
    assert_eq!(fx.store.text("c.txt"), None);
}

#[test]
fn unreadable_and_reserved_uploads_fail_individually() {
    let fx = signed_in_fixture(&[]);
    let sources: Vec<Rc<dyn UploadSource>> = vec![
        Rc::new(MemoryUploadSource::unreadable("photo.png", "permission denied")),
        Rc::new(MemoryUploadSource::new("webpass.txt", b"x".to_vec())),
        Rc::new(MemoryUploadSource::new("ok.bin", vec![0_u8, 159, 255])),
    ];
    block_on(fx.controller.upload_files(&sources));

    assert_eq!(fx.notices.with_title("Upload failed").len(), 2);
    assert_eq!(fx.store.bytes("ok.bin"), Some(vec![0_u8, 159, 255]));
    assert_eq!(fx.store.text("webpass.txt"), None);
    assert_eq!(fx.controller.snapshot().batch.map(|job| job.failures()), Some(2));
}

#[test]
fn conflicting_save_keeps_the_editor_and_the_remote_file() {
    let fx = signed_in_fixture(&[]);
    fx.store.insert_with_fingerprint("notes.txt", "ours", "abc123");
    block_on(fx.controller.refresh());
    block_on(fx.controller.open_file("notes.txt"));

    fx.store.insert_with_fingerprint("notes.txt", "theirs", "xyz999");
    fx.controller.edit_buffer("ours, edited");
    let rows_before = fx.controller.snapshot().rows;
    block_on(fx.controller.save());

    let (_, body) = last_write(&fx.store);
    assert_eq!(body.sha, Some(Fingerprint::new("abc123")));

    let session = fx.controller.snapshot();
    let editor = session.editor.session().expect("editor stays open");
    assert_eq!(editor.buffer, "ours, edited");
    assert_eq!(editor.last_fingerprint, Some(Fingerprint::new("abc123")));
    assert_eq!(session.editor.pending_save(), None);
    assert_eq!(session.rows, rows_before);
    assert_eq!(fx.store.text("notes.txt").as_deref(), Some("theirs"));
    assert_eq!(fx.notices.with_title("Save failed").len(), 1);
}

#[test]
fn reading_a_directory_is_a_malformed_response() {
    let store = MemoryStoreTransport::with_credential(PIN);
    store.insert_text("docs/a.txt", "a");
    let client = StoreClient::new(Rc::new(store));
    let result = block_on(client.read_file(PIN, "docs"));
    assert!(matches!(result, Err(StoreError::MalformedResponse(_))));
}

#[test]
fn superseded_responses_are_discarded() {
    let mut session = StoreSession::default();
    reduce_store(
        &mut session,
        StoreAction::SignedIn {
            credential: PIN.to_string(),
        },
    )
    .expect("sign in");

    reduce_store(
        &mut session,
        StoreAction::ListingRequested {
            path: "slow".to_string(),
        },
    )
    .expect("first request");
    let slow = session.current_request(RequestSlot::Listing);
    reduce_store(
        &mut session,
        StoreAction::ListingRequested {
            path: "fast".to_string(),
        },
    )
    .expect("second request");
    let fast = session.current_request(RequestSlot::Listing);

    reduce_store(
        &mut session,
        StoreAction::ListingLoaded {
            token: fast,
            path: "fast".to_string(),
            result: Ok(ListResult::Entries(Vec::new())),
        },
    )
    .expect("current response");
    assert_eq!(
        reduce_store(
            &mut session,
            StoreAction::ListingLoaded {
                token: slow,
                path: "slow".to_string(),
                result: Ok(ListResult::Entries(Vec::new())),
            },
        ),
        Err(ReducerError::StaleResponse(RequestSlot::Listing))
    );
    assert_eq!(session.location, "fast");
    assert_eq!(session.listing_status, ListingStatus::Ready);
}

#[test]
fn save_result_for_a_replaced_session_is_ignored() {
    let mut session = StoreSession::default();
    sign_in(&mut session);

    open_loaded(&mut session, "f.txt", "v1");
    reduce_store(&mut session, StoreAction::SaveRequested { auto_close: true }).expect("save");
    let ticket = session.editor.pending_save().cloned().expect("ticket");
    open_loaded(&mut session, "g.txt", "v2");

    assert_eq!(
        reduce_store(
            &mut session,
            StoreAction::SaveCompleted {
                ticket,
                result: Ok(WriteReceipt {
                    fingerprint: Some(Fingerprint::new("v3")),
                }),
            },
        ),
        Err(ReducerError::StaleSave)
    );
    let editor = session.editor.session().expect("g stays open");
    assert_eq!(editor.target_path, "g.txt");
    assert_eq!(editor.last_fingerprint, Some(Fingerprint::new("v2")));
}

#[test]
fn listing_from_before_a_relogin_is_discarded() {
    let mut session = StoreSession::default();
    sign_in(&mut session);
    reduce_store(
        &mut session,
        StoreAction::ListingRequested {
            path: "old-account-dir".to_string(),
        },
    )
    .expect("request");
    let old = session.current_request(RequestSlot::Listing);

    sign_out_and_in(&mut session);
    reduce_store(
        &mut session,
        StoreAction::ListingRequested {
            path: String::new(),
        },
    )
    .expect("request");
    assert!(!session.is_current(RequestSlot::Listing, old));

    assert_eq!(
        reduce_store(
            &mut session,
            StoreAction::ListingLoaded {
                token: old,
                path: "old-account-dir".to_string(),
                result: Ok(ListResult::Entries(Vec::new())),
            },
        ),
        Err(ReducerError::StaleResponse(RequestSlot::Listing))
    );
    assert_eq!(session.location, "");
    assert_eq!(session.listing_status, ListingStatus::Loading);
}

#[test]
fn save_from_before_a_relogin_leaves_the_new_editor_alone() {
    let mut session = StoreSession::default();
    sign_in(&mut session);
    open_loaded(&mut session, "f.txt", "v1");
    reduce_store(&mut session, StoreAction::SaveRequested { auto_close: true }).expect("save");
    let ticket = session.editor.pending_save().cloned().expect("ticket");

    sign_out_and_in(&mut session);
    open_loaded(&mut session, "g.txt", "v1");
    reduce_store(
        &mut session,
        StoreAction::EditBuffer {
            text: "unsaved work".to_string(),
        },
    )
    .expect("edit");

    assert_eq!(
        reduce_store(
            &mut session,
            StoreAction::SaveCompleted {
                ticket: ticket.clone(),
                result: Ok(WriteReceipt {
                    fingerprint: Some(Fingerprint::new("v2")),
                }),
            },
        ),
        Err(ReducerError::StaleSave)
    );
    assert_eq!(
        reduce_store(
            &mut session,
            StoreAction::SaveCompleted {
                ticket,
                result: Err(StoreError::Connection("offline".to_string())),
            },
        ),
        Err(ReducerError::StaleSave)
    );
    let editor = session.editor.session().expect("g stays open");
    assert_eq!(editor.target_path, "g.txt");
    assert_eq!(editor.buffer, "unsaved work");
    assert_eq!(editor.last_fingerprint, Some(Fingerprint::new("v1")));
}

#[test]
fn batch_from_before_a_relogin_cannot_step_the_new_one() {
    let mut session = StoreSession::default();
    sign_in(&mut session);
    reduce_store(&mut session, StoreAction::BatchStarted { total: 3 }).expect("start");
    let old = session.batch.as_ref().expect("old job").id();

    sign_out_and_in(&mut session);
    reduce_store(&mut session, StoreAction::BatchStarted { total: 2 }).expect("start");
    let new = session.batch.as_ref().expect("new job").id();
    assert_ne!(old, new);

    for name in ["a.txt", "b.txt"] {
        assert_eq!(
            reduce_store(
                &mut session,
                StoreAction::BatchItemCompleted {
                    job_id: old,
                    name: name.to_string(),
                    result: Ok(()),
                },
            ),
            Err(ReducerError::UnknownBatch(old))
        );
    }
    assert_eq!(session.batch.as_ref().map(|job| job.completed()), Some(0));

    let failed = reduce_store(
        &mut session,
        StoreAction::BatchItemCompleted {
            job_id: new,
            name: "c.txt".to_string(),
            result: Err(StoreError::Connection("offline".to_string())),
        },
    )
    .expect("step");
    assert!(matches!(
        failed.as_slice(),
        [StoreEffect::Notify { title, .. }] if title == "Upload failed"
    ));
    let last = reduce_store(
        &mut session,
        StoreAction::BatchItemCompleted {
            job_id: new,
            name: "d.txt".to_string(),
            result: Ok(()),
        },
    )
    .expect("step");
    assert_eq!(
        last,
        vec![
            StoreEffect::RefreshListing,
            StoreEffect::ScheduleBatchDismiss { job_id: new }
        ]
    );
    let job = session.batch.expect("job");
    assert_eq!(job.completed(), 2);
    assert_eq!(job.failures(), 1);
}

#[test]
fn nested_direct_navigation_into_the_gated_area_prompts() {
    let fx = signed_in_fixture(&[("hidepass.txt", "letmein"), ("private/deep/x.txt", "x")]);

    block_on(fx.controller.navigate("/private/deep"));
    assert_eq!(fx.controller.snapshot().location, "");
    assert_eq!(fx.dialogs.asked().len(), 1);

    fx.dialogs.answer_prompt(Some(" letmein "));
    block_on(fx.controller.navigate("/private/deep"));
    assert_eq!(fx.controller.snapshot().location, "private/deep");

    block_on(fx.controller.navigate(""));
    let root = fx.controller.snapshot();
    assert_eq!(root.rows.len(), 1);
    assert_eq!(root.rows[0].action, store_runtime::RowAction::Navigate);
    assert_eq!(fx.dialogs.asked().len(), 2);
}

#[test]
fn listing_a_reserved_file_path_tears_the_session_down() {
    let fx = signed_in_fixture(&[("webpass.txt", "4321")]);
    assert!(fx.controller.snapshot().rows.is_empty());

    block_on(fx.controller.navigate("webpass.txt"));
    assert!(fx.controller.snapshot().is_pristine());

    block_on(fx.controller.refresh());
    assert_eq!(listing_requests(&fx.store, "/webpass.txt"), 1);
}

#[test]
fn listing_a_file_path_opens_it() {
    let fx = signed_in_fixture(&[("docs/readme.md", "# hi")]);
    block_on(fx.controller.navigate("docs/readme.md"));

    let session = fx.controller.snapshot();
    assert_eq!(session.location, "docs");
    assert_eq!(
        session.editor.session().map(|s| s.buffer.as_str()),
        Some("# hi")
    );
    assert_eq!(session.rows.len(), 2);
}

#[test]
fn missing_mini_app_document_is_reported() {
    let fx = signed_in_fixture(&[("features/empty/.keep", "placeholder")]);
    block_on(fx.controller.list_features());
    assert_eq!(fx.controller.snapshot().features, vec!["empty".to_string()]);

    block_on(fx.controller.run_feature("empty"));
    assert_eq!(fx.controller.snapshot().feature_view, None);
    let notices = fx.notices.with_title("Not found");
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].body, "Feature `empty` has no content.");
}

#[test]
fn scripted_write_body_matches_the_wire_shape() {
    let body: WriteBody =
        serde_json::from_str(&write_body_json("hi", Some("abc123"))).expect("write body");
    assert_eq!(body.sha, Some(Fingerprint::new("abc123")));
    assert_eq!(body.content, encode_text("hi"));
}
