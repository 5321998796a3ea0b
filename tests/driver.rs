//! Runtime tests: debounce timing, task supersession, and session expiry
//! against an in-process store, driven on a paused clock.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use shelfsync::app::Event;
use shelfsync::domain::{Book, CatalogResult, EntryId, ReadingStatus, RemoteError, ShelfEntry, ShelfError};
use shelfsync::observability::WarningSink;
use shelfsync::remote::{RemoteRequest, RemoteResponse, ShelfApi};
use shelfsync::runtime::Driver;
use shelfsync::storage::{CredentialStore, MemoryCredentialStore, Session};
use shelfsync::ShelfSyncController;
use tokio::task::LocalSet;
use tokio::time::Instant;

#[derive(Default)]
struct FakeStore {
    calls: RefCell<Vec<RemoteRequest>>,
    shelf: RefCell<Vec<ShelfEntry>>,
    load_delay: Duration,
    reject_all: bool,
    fail_deletes: bool,
}

/// Shared handle so tests can inspect the store after handing it to the driver.
#[derive(Clone, Default)]
struct FakeApi(Rc<FakeStore>);

impl ShelfApi for FakeApi {
    async fn execute(&self, request: RemoteRequest) -> RemoteResponse {
        let store = &self.0;
        store.calls.borrow_mut().push(request.clone());
        if store.reject_all {
            return RemoteResponse::failed(&request, RemoteError::Unauthenticated);
        }

        match request {
            RemoteRequest::SearchCatalog { ticket, query } => RemoteResponse::SearchCompleted {
                ticket,
                result: Ok(vec![catalog(&query)]),
            },
            RemoteRequest::LoadShelf { ticket, .. } => {
                let snapshot = store.shelf.borrow().clone();
                tokio::time::sleep(store.load_delay).await;
                RemoteResponse::ShelfLoaded {
                    ticket,
                    result: Ok(snapshot),
                }
            }
            RemoteRequest::CreateEntry { form, .. } => RemoteResponse::EntryCreated {
                form,
                result: Ok(None),
            },
            RemoteRequest::UpdateEntry { form, id, .. } => RemoteResponse::EntryUpdated {
                form,
                id,
                result: Ok(None),
            },
            RemoteRequest::DeleteEntry { id } => {
                if store.fail_deletes {
                    return RemoteResponse::EntryDeleted {
                        id,
                        result: Err(RemoteError::Rejected { status: 500, detail: None }),
                    };
                }
                store.shelf.borrow_mut().retain(|entry| entry.id != id);
                RemoteResponse::EntryDeleted { id, result: Ok(()) }
            }
        }
    }
}

#[derive(Clone, Default)]
struct RecordingSink(Rc<RefCell<Vec<String>>>);

impl WarningSink for RecordingSink {
    fn log_warning(&self, event: &str, _context: &str) {
        self.0.borrow_mut().push(event.to_string());
    }
}

fn catalog(query: &str) -> CatalogResult {
    CatalogResult {
        external_id: format!("OL-{query}"),
        title: query.to_string(),
        author: "Frank Herbert".to_string(),
        cover_url: None,
        first_publish_year: Some(1965),
    }
}

fn entry(id: i64, title: &str) -> ShelfEntry {
    ShelfEntry {
        id: EntryId(id),
        book: Book {
            title: title.to_string(),
            author: "Someone".to_string(),
            cover_url: None,
            first_publish_year: None,
        },
        status: ReadingStatus::Reading,
        rating: None,
        notes: None,
        created_at: None,
    }
}

fn driver(api: FakeApi, credentials: Arc<MemoryCredentialStore>, sink: RecordingSink) -> Driver<FakeApi> {
    Driver::new(
        ShelfSyncController::new(Duration::from_millis(400), 2),
        api,
        Box::new(Session::new(credentials)),
        Box::new(sink),
    )
}

fn searches(api: &FakeApi) -> Vec<String> {
    api.0
        .calls
        .borrow()
        .iter()
        .filter_map(|call| match call {
            RemoteRequest::SearchCatalog { query, .. } => Some(query.clone()),
            _ => None,
        })
        .collect()
}

fn cached_ids(driver: &Driver<FakeApi>) -> Vec<i64> {
    driver.controller().cache().entries().iter().map(|e| e.id.0).collect()
}

#[tokio::test(start_paused = true)]
async fn keystroke_burst_sends_one_search_after_quiet_period() {
    LocalSet::new()
        .run_until(async {
            let api = FakeApi::default();
            let credentials = Arc::new(MemoryCredentialStore::with_token("secret"));
            let mut driver = driver(api.clone(), credentials, RecordingSink::default());

            driver.start().unwrap();
            driver.step().await.unwrap();
            driver.dispatch(&Event::OpenCreate).unwrap();

            let first_keystroke = Instant::now();
            driver.dispatch(&Event::QueryChanged("Dun".into())).unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            driver.dispatch(&Event::QueryChanged("Dune".into())).unwrap();

            // window elapses 400ms after the last keystroke
            driver.step().await.unwrap();
            assert!(first_keystroke.elapsed() >= Duration::from_millis(500));
            assert_eq!(searches(&api), vec!["Dune".to_string()]);

            driver.step().await.unwrap();
            let results = driver.controller().search().results();
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].title, "Dune");

            tokio::time::sleep(Duration::from_secs(2)).await;
            assert_eq!(searches(&api).len(), 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn short_query_cancels_pending_window() {
    LocalSet::new()
        .run_until(async {
            let api = FakeApi::default();
            let credentials = Arc::new(MemoryCredentialStore::with_token("secret"));
            let mut driver = driver(api.clone(), credentials, RecordingSink::default());

            driver.start().unwrap();
            driver.step().await.unwrap();
            driver.dispatch(&Event::OpenCreate).unwrap();
            driver.dispatch(&Event::QueryChanged("Dune".into())).unwrap();
            driver.dispatch(&Event::QueryChanged("D".into())).unwrap();

            tokio::time::sleep(Duration::from_secs(1)).await;
            assert!(searches(&api).is_empty());
            assert!(!driver.controller().search().is_searching());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn delete_during_inflight_load_is_not_resurrected() {
    LocalSet::new()
        .run_until(async {
            let api = FakeApi(Rc::new(FakeStore {
                shelf: RefCell::new(vec![entry(1, "Dune"), entry(2, "Emma")]),
                load_delay: Duration::from_millis(50),
                ..FakeStore::default()
            }));
            let credentials = Arc::new(MemoryCredentialStore::with_token("secret"));
            let mut driver = driver(api.clone(), credentials, RecordingSink::default());

            driver.start().unwrap();
            driver.step().await.unwrap();
            assert_eq!(cached_ids(&driver), vec![1, 2]);

            // The reload snapshots the shelf before the delete reaches the store.
            driver.dispatch(&Event::Reload).unwrap();
            driver.dispatch(&Event::Delete(EntryId(1))).unwrap();
            assert_eq!(cached_ids(&driver), vec![2]);

            driver.step().await.unwrap();
            driver.step().await.unwrap();
            assert_eq!(cached_ids(&driver), vec![2]);
            assert!(!driver.controller().cache().is_loading());

            driver.dispatch(&Event::Reload).unwrap();
            driver.step().await.unwrap();
            assert_eq!(cached_ids(&driver), vec![2]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn failed_delete_is_reported_without_rollback() {
    LocalSet::new()
        .run_until(async {
            let api = FakeApi(Rc::new(FakeStore {
                shelf: RefCell::new(vec![entry(1, "Dune")]),
                fail_deletes: true,
                ..FakeStore::default()
            }));
            let credentials = Arc::new(MemoryCredentialStore::with_token("secret"));
            let sink = RecordingSink::default();
            let mut driver = driver(api, credentials, sink.clone());

            driver.start().unwrap();
            driver.step().await.unwrap();
            driver.dispatch(&Event::Delete(EntryId(1))).unwrap();
            driver.step().await.unwrap();

            assert!(cached_ids(&driver).is_empty());
            assert_eq!(*sink.0.borrow(), vec!["delete_failed".to_string()]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn unauthenticated_response_ends_the_session() {
    LocalSet::new()
        .run_until(async {
            let api = FakeApi(Rc::new(FakeStore {
                reject_all: true,
                ..FakeStore::default()
            }));
            let credentials = Arc::new(MemoryCredentialStore::with_token("stale"));
            let mut driver = driver(api.clone(), credentials.clone(), RecordingSink::default());

            driver.start().unwrap();
            driver.step().await.unwrap();

            assert!(!driver.controller().is_session_active());
            assert_eq!(credentials.get().unwrap(), None);
            assert!(matches!(driver.dispatch(&Event::Reload), Err(ShelfError::AuthExpired)));
            assert_eq!(api.0.calls.borrow().len(), 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn sign_out_forgets_token_and_shelf() {
    LocalSet::new()
        .run_until(async {
            let api = FakeApi(Rc::new(FakeStore {
                shelf: RefCell::new(vec![entry(1, "Dune")]),
                ..FakeStore::default()
            }));
            let credentials = Arc::new(MemoryCredentialStore::with_token("secret"));
            let mut driver = driver(api.clone(), credentials.clone(), RecordingSink::default());

            driver.start().unwrap();
            driver.step().await.unwrap();
            assert_eq!(cached_ids(&driver), vec![1]);

            driver.dispatch(&Event::SessionEnded).unwrap();
            assert!(cached_ids(&driver).is_empty());
            assert_eq!(credentials.get().unwrap(), None);
            assert!(matches!(driver.dispatch(&Event::Reload), Err(ShelfError::AuthExpired)));
            assert_eq!(api.0.calls.borrow().len(), 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn quit_stops_the_loop() {
    LocalSet::new()
        .run_until(async {
            let credentials = Arc::new(MemoryCredentialStore::new());
            let mut driver = driver(FakeApi::default(), credentials, RecordingSink::default());

            driver.start().unwrap();
            assert!(!driver.controller().is_session_active());

            driver.sender().send(Event::OpenCreate).unwrap();
            driver.sender().send(Event::Quit).unwrap();

            let mut renders = 0;
            driver.run(|_| renders += 1, |_| {}).await;
            assert!(!driver.is_running());
            assert!(driver.controller().form().is_some());
            assert!(renders >= 1);
        })
        .await;
}
