//! Orchestration of search, form sessions, and the shelf cache.
//!
//! [`ShelfSyncController`] owns all shelf state and is the only place that
//! produces mutation requests for the remote store. Each operation mutates
//! state synchronously and returns the [`Action`]s the runtime must carry
//! out; completions are fed back through the `*_completed` / `*_loaded`
//! methods.
//!
//! # Reconciliation policy
//!
//! - Create and edit are pessimistic: the form stays open with `submitting`
//!   set until the store answers, then the shelf is fully reloaded with the
//!   current filter.
//! - Delete is optimistic: the entry leaves the cache immediately and is not
//!   restored if the store rejects the delete.
//! - Signing out or any unauthenticated response ends the session. The form
//!   closes, search stops, the shelf is forgotten, and every remote-backed
//!   operation fails with
//!   [`ShelfError::AuthExpired`] until [`begin_session`](ShelfSyncController::begin_session).

use crate::app::actions::Action;
use crate::app::cache::{LoadTicket, ShelfCache};
use crate::app::form::{FormId, FormSession};
use crate::app::search::{SearchCompletion, SearchDebouncer, SearchStep, SearchTicket};
use crate::app::selection::SelectionState;
use crate::domain::{
    CatalogResult, EntryId, EntryUpdate, NewShelfEntry, ReadingStatus, RemoteError, Result,
    ShelfEntry, ShelfError, StatusFilter,
};
use crate::remote::RemoteRequest;
use std::time::Duration;

/// Inline message for a create submit with no book chosen.
pub const MISSING_SELECTION_MESSAGE: &str = "Please search for and select a book";

/// Coordinates the shelf cache, the active form session, and catalog search.
#[derive(Debug, Clone)]
pub struct ShelfSyncController {
    cache: ShelfCache,
    filter: StatusFilter,
    form: Option<FormSession>,
    next_form: u64,
    search: SearchDebouncer,
    session_active: bool,
}

impl ShelfSyncController {
    /// Creates a controller with no active session. Call
    /// [`begin_session`](Self::begin_session) once a credential is available.
    #[must_use]
    pub fn new(debounce: Duration, min_query_len: usize) -> Self {
        Self {
            cache: ShelfCache::new(),
            filter: StatusFilter::All,
            form: None,
            next_form: 0,
            search: SearchDebouncer::new(debounce, min_query_len),
            session_active: false,
        }
    }

    /// Starts (or restarts) a session and loads the shelf with the current filter.
    pub fn begin_session(&mut self) -> Vec<Action> {
        tracing::info!(filter = ?self.filter, "session started");
        self.session_active = true;
        vec![self.issue_load()]
    }

    #[must_use]
    pub const fn is_session_active(&self) -> bool {
        self.session_active
    }

    fn ensure_session(&self) -> Result<()> {
        if self.session_active {
            Ok(())
        } else {
            Err(ShelfError::AuthExpired)
        }
    }

    /// Signs out: closes the form, stops search, and forgets the shelf.
    ///
    /// Remote-backed operations fail with [`ShelfError::AuthExpired`] until
    /// the next [`begin_session`](Self::begin_session). Emits the
    /// session-ended signal once; ending an inactive session does nothing.
    pub fn end_session(&mut self) -> Vec<Action> {
        if !self.session_active {
            return vec![];
        }
        tracing::info!("session ended");
        self.session_active = false;
        self.form = None;
        self.search.reset();
        self.cache.clear();
        vec![Action::CancelSearch, Action::EndSession]
    }

    /// Reacts to an unauthenticated response; later unauthenticated
    /// completions are absorbed.
    fn session_expired(&mut self) -> Vec<Action> {
        if self.session_active {
            tracing::warn!("remote store rejected the credential");
        }
        self.end_session()
    }

    /// Opens a create session, discarding any open session.
    pub fn open_create(&mut self) -> Vec<Action> {
        self.open_form(None)
    }

    /// Opens an edit session for a cached entry, discarding any open session.
    ///
    /// # Errors
    ///
    /// [`ShelfError::EntryNotFound`] when `id` is not in the cache.
    pub fn open_edit(&mut self, id: EntryId) -> Result<Vec<Action>> {
        let entry = self.cache.get(id).cloned().ok_or(ShelfError::EntryNotFound(id))?;
        Ok(self.open_form(Some(entry)))
    }

    fn open_form(&mut self, entry: Option<ShelfEntry>) -> Vec<Action> {
        self.next_form += 1;
        let form = FormSession::open(FormId(self.next_form), entry);
        tracing::debug!(form = self.next_form, edit = form.selection.is_edit(), "form session opened");
        self.form = Some(form);
        self.search.reset();
        vec![Action::CancelSearch]
    }

    /// Closes the form session, if any.
    pub fn cancel_form(&mut self) -> Vec<Action> {
        if let Some(form) = self.form.take() {
            tracing::debug!(form = form.id().0, "form session cancelled");
        }
        self.search.reset();
        vec![Action::CancelSearch]
    }

    fn form_mut(&mut self) -> Result<&mut FormSession> {
        self.form.as_mut().ok_or(ShelfError::NoForm)
    }

    pub fn set_status(&mut self, status: ReadingStatus) -> Result<()> {
        self.form_mut()?.draft.status = status;
        Ok(())
    }

    /// Stores raw rating input; it is coerced only when submitting.
    pub fn set_rating_input(&mut self, input: &str) -> Result<()> {
        self.form_mut()?.draft.rating_input = input.to_string();
        Ok(())
    }

    pub fn set_notes(&mut self, notes: &str) -> Result<()> {
        self.form_mut()?.draft.notes = notes.to_string();
        Ok(())
    }

    /// Feeds a new raw query into the debouncer.
    ///
    /// # Errors
    ///
    /// [`ShelfError::NoForm`] without an open form, and
    /// [`ShelfError::AuthExpired`] after the session ended.
    pub fn observe_query(&mut self, raw_query: &str) -> Result<Vec<Action>> {
        let form = self.form.as_mut().ok_or(ShelfError::NoForm)?;
        form.query = raw_query.to_string();
        let searchable = form.selection.accepts_search();
        self.ensure_session()?;

        Ok(match self.search.observe(raw_query, searchable) {
            SearchStep::Cleared => vec![Action::CancelSearch],
            SearchStep::Scheduled { ticket, delay } => {
                vec![Action::ScheduleSearch { ticket, delay }]
            }
        })
    }

    /// The debounce window for `ticket` elapsed; issues the lookup if it is
    /// still current.
    pub fn search_window_elapsed(&mut self, ticket: SearchTicket) -> Vec<Action> {
        if !self.session_active {
            return vec![];
        }
        self.search
            .window_elapsed(ticket)
            .map(|query| {
                tracing::debug!(ticket = ticket.0, query = %query, "issuing catalog search");
                vec![Action::Remote(RemoteRequest::SearchCatalog { ticket, query })]
            })
            .unwrap_or_default()
    }

    pub fn search_completed(
        &mut self,
        ticket: SearchTicket,
        result: std::result::Result<Vec<CatalogResult>, RemoteError>,
    ) -> Vec<Action> {
        if matches!(result, Err(RemoteError::Unauthenticated)) {
            return self.session_expired();
        }
        match self.search.complete(ticket, result) {
            SearchCompletion::Failed(error) => vec![Action::Warn {
                event: "search_failed",
                context: error.to_string(),
            }],
            SearchCompletion::Applied | SearchCompletion::Stale => vec![],
        }
    }

    /// Chooses the search result at `index` for the create session.
    ///
    /// # Errors
    ///
    /// Fails without an open create session, with nothing at `index`, or when
    /// a book is already selected.
    pub fn select_result(&mut self, index: usize) -> Result<Vec<Action>> {
        self.form.as_ref().ok_or(ShelfError::NoForm)?;
        let result = self
            .search
            .results()
            .get(index)
            .cloned()
            .ok_or(ShelfError::Selection("no search result at that position"))?;
        let form = self.form_mut()?;
        form.selection.select(result)?;
        form.query.clear();
        form.error = None;
        self.search.reset();
        Ok(vec![Action::CancelSearch])
    }

    /// Drops the chosen book so the user can search again.
    pub fn clear_selection(&mut self) -> Result<Vec<Action>> {
        let form = self.form_mut()?;
        form.selection.clear()?;
        form.query.clear();
        self.search.reset();
        Ok(vec![Action::CancelSearch])
    }

    /// Submits the open form in whichever mode it was opened.
    ///
    /// # Errors
    ///
    /// See [`submit_create`](Self::submit_create) and
    /// [`submit_edit`](Self::submit_edit).
    pub fn submit(&mut self) -> Result<Vec<Action>> {
        let form = self.form.as_ref().ok_or(ShelfError::NoForm)?;
        if form.selection.is_edit() {
            self.submit_edit()
        } else {
            self.submit_create()
        }
    }

    fn submittable_form(&mut self) -> Result<&mut FormSession> {
        self.ensure_session()?;
        let form = self.form_mut()?;
        if form.is_submitting() {
            return Err(ShelfError::SubmitPending);
        }
        Ok(form)
    }

    /// Creates a shelf entry from the selected catalog result.
    ///
    /// # Errors
    ///
    /// [`ShelfError::Validation`] when no book is selected; the message is also
    /// set as the form's inline error and no request is emitted.
    pub fn submit_create(&mut self) -> Result<Vec<Action>> {
        let form = self.submittable_form()?;
        let SelectionState::Create { selected } = &form.selection else {
            return Err(ShelfError::Selection("the open form edits an existing entry"));
        };
        let Some(selected) = selected else {
            form.error = Some(MISSING_SELECTION_MESSAGE.to_string());
            return Err(ShelfError::Validation(MISSING_SELECTION_MESSAGE.to_string()));
        };

        let body = NewShelfEntry::from_selection(
            selected,
            form.draft.status,
            &form.draft.rating_input,
            &form.draft.notes,
        );
        form.begin_submit();
        tracing::debug!(form = form.id().0, title = %body.title, "submitting new entry");
        Ok(vec![Action::Remote(RemoteRequest::CreateEntry {
            form: form.id(),
            body,
        })])
    }

    /// Sends status, rating, and notes for the edited entry.
    ///
    /// # Errors
    ///
    /// Fails when the open form is a create session.
    pub fn submit_edit(&mut self) -> Result<Vec<Action>> {
        let form = self.submittable_form()?;
        let Some(id) = form.selection.editing().map(|entry| entry.id) else {
            return Err(ShelfError::Selection("the open form creates a new entry"));
        };

        let changes = EntryUpdate::from_input(
            form.draft.status,
            &form.draft.rating_input,
            &form.draft.notes,
        );
        form.begin_submit();
        tracing::debug!(form = form.id().0, entry = %id, "submitting entry update");
        Ok(vec![Action::Remote(RemoteRequest::UpdateEntry {
            form: form.id(),
            id,
            changes,
        })])
    }

    /// Completion of a create or edit submit.
    ///
    /// Success closes the session that submitted (if still open) and reloads
    /// the shelf. Failure keeps the form open with the store's message.
    pub fn submit_completed(
        &mut self,
        form_id: FormId,
        result: std::result::Result<Option<ShelfEntry>, RemoteError>,
    ) -> Vec<Action> {
        let is_current = self.form.as_ref().is_some_and(|form| form.id() == form_id);
        match result {
            Err(RemoteError::Unauthenticated) => self.session_expired(),
            Err(error) => {
                tracing::debug!(form = form_id.0, error = %error, "submit rejected");
                if let Some(form) = self.form.as_mut().filter(|_| is_current) {
                    form.fail_submit(error.user_message());
                }
                vec![]
            }
            Ok(_) => {
                let mut actions = Vec::with_capacity(2);
                if is_current {
                    self.form = None;
                    self.search.reset();
                    actions.push(Action::CancelSearch);
                }
                if self.session_active {
                    actions.push(self.issue_load());
                }
                actions
            }
        }
    }

    /// Optimistically removes `id` and asks the store to delete it.
    pub fn delete_entry(&mut self, id: EntryId) -> Result<Vec<Action>> {
        self.ensure_session()?;
        let removed = self.cache.remove_pending(id);
        tracing::debug!(entry = %id, removed, "deleting entry");
        Ok(vec![Action::Remote(RemoteRequest::DeleteEntry { id })])
    }

    /// Completion of a delete. Failures are reported but not rolled back.
    pub fn delete_completed(
        &mut self,
        id: EntryId,
        result: std::result::Result<(), RemoteError>,
    ) -> Vec<Action> {
        match result {
            Ok(()) => {
                self.cache.confirm_removal(id);
                vec![]
            }
            Err(RemoteError::Unauthenticated) => {
                self.cache.abandon_removal(id);
                self.session_expired()
            }
            Err(error) => {
                self.cache.abandon_removal(id);
                vec![Action::Warn {
                    event: "delete_failed",
                    context: format!("entry {id}: {error}"),
                }]
            }
        }
    }

    /// Changes the status filter and reloads the shelf.
    pub fn set_filter(&mut self, filter: StatusFilter) -> Result<Vec<Action>> {
        self.filter = filter;
        self.reload()
    }

    /// Reloads the shelf with the current filter.
    pub fn reload(&mut self) -> Result<Vec<Action>> {
        self.ensure_session()?;
        Ok(vec![self.issue_load()])
    }

    fn issue_load(&mut self) -> Action {
        let ticket = self.cache.begin_load(self.filter);
        Action::Remote(RemoteRequest::LoadShelf {
            ticket,
            filter: self.filter,
        })
    }

    pub fn shelf_loaded(
        &mut self,
        ticket: LoadTicket,
        result: std::result::Result<Vec<ShelfEntry>, RemoteError>,
    ) -> Vec<Action> {
        match result {
            Ok(entries) => {
                self.cache.apply_load(ticket, entries);
                vec![]
            }
            Err(RemoteError::Unauthenticated) => {
                self.cache.abandon_load(ticket);
                self.session_expired()
            }
            Err(error) => {
                self.cache.abandon_load(ticket);
                vec![Action::Warn {
                    event: "shelf_load_failed",
                    context: error.to_string(),
                }]
            }
        }
    }

    #[must_use]
    pub const fn cache(&self) -> &ShelfCache {
        &self.cache
    }

    #[must_use]
    pub const fn filter(&self) -> StatusFilter {
        self.filter
    }

    #[must_use]
    pub const fn form(&self) -> Option<&FormSession> {
        self.form.as_ref()
    }

    #[must_use]
    pub const fn search(&self) -> &SearchDebouncer {
        &self.search
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Book;

    fn controller() -> ShelfSyncController {
        let mut controller = ShelfSyncController::new(Duration::from_millis(400), 2);
        controller.begin_session();
        controller
    }

    fn entry(id: i64, status: ReadingStatus) -> ShelfEntry {
        ShelfEntry {
            id: EntryId(id),
            book: Book {
                title: format!("Book {id}"),
                author: "Author".into(),
                cover_url: None,
                first_publish_year: None,
            },
            status,
            rating: None,
            notes: None,
            created_at: None,
        }
    }

    fn catalog(title: &str) -> CatalogResult {
        CatalogResult {
            external_id: format!("OL-{title}"),
            title: title.into(),
            author: "Frank Herbert".into(),
            cover_url: None,
            first_publish_year: Some(1965),
        }
    }

    /// Applies the load issued by `actions` with `entries`.
    fn answer_load(controller: &mut ShelfSyncController, actions: &[Action], entries: Vec<ShelfEntry>) {
        let ticket = actions
            .iter()
            .find_map(|action| match action {
                Action::Remote(RemoteRequest::LoadShelf { ticket, .. }) => Some(*ticket),
                _ => None,
            })
            .expect("a shelf load");
        controller.shelf_loaded(ticket, Ok(entries));
    }

    fn loaded_controller(entries: Vec<ShelfEntry>) -> ShelfSyncController {
        let mut controller = ShelfSyncController::new(Duration::from_millis(400), 2);
        let actions = controller.begin_session();
        answer_load(&mut controller, &actions, entries);
        controller
    }

    fn remote_requests(actions: &[Action]) -> Vec<&RemoteRequest> {
        actions
            .iter()
            .filter_map(|action| match action {
                Action::Remote(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Drives one search for `query` to completion with `results`.
    fn search_and_answer(controller: &mut ShelfSyncController, query: &str, results: Vec<CatalogResult>) {
        let actions = controller.observe_query(query).unwrap();
        let [Action::ScheduleSearch { ticket, .. }] = actions.as_slice() else {
            panic!("expected a scheduled search, got {actions:?}");
        };
        let ticket = *ticket;
        assert_eq!(controller.search_window_elapsed(ticket).len(), 1);
        controller.search_completed(ticket, Ok(results));
    }

    #[test]
    fn create_without_selection_fails_locally() {
        let mut controller = controller();
        controller.open_create();
        controller.set_status(ReadingStatus::Reading).unwrap();

        let outcome = controller.submit();

        assert!(matches!(outcome, Err(ShelfError::Validation(ref m)) if m == MISSING_SELECTION_MESSAGE));
        let form = controller.form().unwrap();
        assert_eq!(form.error.as_deref(), Some(MISSING_SELECTION_MESSAGE));
        assert!(!form.is_submitting());
    }

    #[test]
    fn create_success_closes_form_and_reloads_with_current_filter() {
        let mut controller = controller();
        controller
            .set_filter(StatusFilter::Only(ReadingStatus::Reading))
            .unwrap();
        controller.open_create();
        search_and_answer(&mut controller, "Dune", vec![catalog("Dune")]);
        controller.select_result(0).unwrap();
        controller.set_rating_input("5").unwrap();

        let actions = controller.submit().unwrap();
        let requests = remote_requests(&actions);
        let [RemoteRequest::CreateEntry { form, body }] = requests[..] else {
            panic!("expected one create request");
        };
        assert_eq!(body.external_id.as_deref(), Some("OL-Dune"));
        assert!(controller.form().unwrap().is_submitting());
        assert!(matches!(controller.submit(), Err(ShelfError::SubmitPending)));

        let form = *form;
        let actions = controller.submit_completed(form, Ok(None));
        assert!(controller.form().is_none());
        assert!(matches!(
            remote_requests(&actions)[..],
            [RemoteRequest::LoadShelf { filter: StatusFilter::Only(ReadingStatus::Reading), .. }]
        ));
    }

    #[test]
    fn edit_sends_out_of_range_rating_as_absent() {
        let mut controller = loaded_controller(vec![entry(3, ReadingStatus::Reading)]);
        controller.open_edit(EntryId(3)).unwrap();
        controller.set_rating_input("7").unwrap();
        controller.set_status(ReadingStatus::Read).unwrap();

        let actions = controller.submit().unwrap();
        let requests = remote_requests(&actions);
        let [RemoteRequest::UpdateEntry { id, changes, .. }] = requests[..] else {
            panic!("expected one update request");
        };
        assert_eq!(*id, EntryId(3));
        assert_eq!(changes.rating, None);
        assert_eq!(changes.status, ReadingStatus::Read);
    }

    #[test]
    fn edit_session_never_searches() {
        let mut controller = loaded_controller(vec![entry(3, ReadingStatus::Reading)]);
        controller.open_edit(EntryId(3)).unwrap();
        assert_eq!(controller.observe_query("Dune").unwrap(), vec![Action::CancelSearch]);
        assert!(controller.select_result(0).is_err());
    }

    #[test]
    fn rejected_submit_shows_store_detail_then_generic_message() {
        let mut controller = loaded_controller(vec![entry(3, ReadingStatus::Reading)]);
        controller.open_edit(EntryId(3)).unwrap();
        let form_id = controller.form().unwrap().id();

        controller.submit().unwrap();
        controller.submit_completed(
            form_id,
            Err(RemoteError::Rejected { status: 404, detail: Some("Entry not found".into()) }),
        );
        assert_eq!(controller.form().unwrap().error.as_deref(), Some("Entry not found"));

        controller.submit().unwrap();
        controller.submit_completed(form_id, Err(RemoteError::Transport("reset".into())));
        let form = controller.form().unwrap();
        assert_eq!(form.error.as_deref(), Some("Something went wrong"));
        assert!(!form.is_submitting());
    }

    #[test]
    fn late_submit_completion_leaves_newer_form_alone() {
        let mut controller = loaded_controller(vec![entry(3, ReadingStatus::Reading)]);
        controller.open_edit(EntryId(3)).unwrap();
        let old = controller.form().unwrap().id();
        controller.submit().unwrap();

        controller.open_create();
        let actions = controller.submit_completed(old, Ok(None));

        assert_eq!(controller.form().map(FormSession::title), Some("Add a Book"));
        assert_eq!(remote_requests(&actions).len(), 1);
    }

    #[test]
    fn delete_is_optimistic_and_not_rolled_back() {
        let mut controller = loaded_controller(vec![entry(42, ReadingStatus::Read), entry(7, ReadingStatus::Read)]);

        let actions = controller.delete_entry(EntryId(42)).unwrap();
        assert_eq!(actions, vec![Action::Remote(RemoteRequest::DeleteEntry { id: EntryId(42) })]);
        assert!(controller.cache().get(EntryId(42)).is_none());

        let actions = controller.delete_completed(
            EntryId(42),
            Err(RemoteError::Rejected { status: 500, detail: None }),
        );
        assert!(matches!(actions[..], [Action::Warn { event: "delete_failed", .. }]));
        assert!(controller.cache().get(EntryId(42)).is_none());
    }

    #[test]
    fn delete_during_in_flight_load_is_not_resurrected() {
        let mut controller = loaded_controller(vec![entry(42, ReadingStatus::Reading)]);
        let load = controller
            .set_filter(StatusFilter::Only(ReadingStatus::Reading))
            .unwrap();

        controller.delete_entry(EntryId(42)).unwrap();
        answer_load(&mut controller, &load, vec![entry(42, ReadingStatus::Reading), entry(8, ReadingStatus::Reading)]);
        controller.delete_completed(EntryId(42), Ok(()));

        let ids: Vec<_> = controller.cache().entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntryId(8)]);
    }

    #[test]
    fn unauthenticated_response_ends_session_once() {
        let mut controller = loaded_controller(vec![entry(3, ReadingStatus::Reading)]);
        controller.open_edit(EntryId(3)).unwrap();
        let form_id = controller.form().unwrap().id();
        controller.submit().unwrap();

        let actions = controller.submit_completed(form_id, Err(RemoteError::Unauthenticated));
        assert!(actions.contains(&Action::EndSession));
        assert!(controller.form().is_none());
        assert!(!controller.is_session_active());

        let again = controller.delete_completed(EntryId(3), Err(RemoteError::Unauthenticated));
        assert!(!again.contains(&Action::EndSession));

        assert!(matches!(controller.reload(), Err(ShelfError::AuthExpired)));
        assert!(matches!(controller.delete_entry(EntryId(3)), Err(ShelfError::AuthExpired)));

        let actions = controller.begin_session();
        assert_eq!(remote_requests(&actions).len(), 1);
        assert!(controller.is_session_active());
    }

    #[test]
    fn sign_out_blocks_remote_operations_until_next_session() {
        let mut controller = loaded_controller(vec![entry(3, ReadingStatus::Reading)]);
        controller.open_create();

        let actions = controller.end_session();
        assert_eq!(actions, vec![Action::CancelSearch, Action::EndSession]);
        assert!(!controller.is_session_active());
        assert!(controller.form().is_none());
        assert!(controller.cache().is_empty());

        assert!(matches!(controller.reload(), Err(ShelfError::AuthExpired)));
        assert!(matches!(controller.delete_entry(EntryId(3)), Err(ShelfError::AuthExpired)));
        assert!(controller.end_session().is_empty());
    }

    #[test]
    fn load_issued_before_sign_out_is_discarded() {
        let mut controller = loaded_controller(vec![entry(3, ReadingStatus::Reading)]);
        let load = controller.reload().unwrap();
        controller.end_session();

        answer_load(&mut controller, &load, vec![entry(3, ReadingStatus::Reading)]);
        assert!(controller.cache().is_empty());
    }

    #[test]
    fn search_failure_is_swallowed_with_warning() {
        let mut controller = controller();
        controller.open_create();
        let actions = controller.observe_query("Dune").unwrap();
        let [Action::ScheduleSearch { ticket, .. }] = actions[..] else {
            panic!("expected a scheduled search");
        };
        controller.search_window_elapsed(ticket);

        let actions = controller.search_completed(ticket, Err(RemoteError::Transport("timeout".into())));
        assert!(matches!(actions[..], [Action::Warn { event: "search_failed", .. }]));
        assert!(controller.search().results().is_empty());
        assert!(controller.form().is_some());
    }

    #[test]
    fn selecting_resets_search_and_clearing_reenables_it() {
        let mut controller = controller();
        controller.open_create();
        search_and_answer(&mut controller, "Dune", vec![catalog("Dune"), catalog("Dune Messiah")]);

        controller.select_result(1).unwrap();
        assert!(controller.search().results().is_empty());
        assert_eq!(controller.form().map(|f| f.query.as_str()), Some(""));
        assert_eq!(
            controller.form().and_then(|f| f.selection.selected()).map(|r| r.title.as_str()),
            Some("Dune Messiah")
        );
        assert_eq!(controller.observe_query("Emma").unwrap(), vec![Action::CancelSearch]);

        controller.clear_selection().unwrap();
        assert!(matches!(
            controller.observe_query("Emma").unwrap()[..],
            [Action::ScheduleSearch { .. }]
        ));
    }
}
