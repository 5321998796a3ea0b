//! Executes controller actions on a single-threaded tokio `LocalSet`.
//!
//! The driver owns the controller and an event queue. Debounce windows are
//! `sleep` tasks; remote requests are tasks around [`ShelfApi::execute`]. Both
//! report back by pushing an [`Event`] onto the queue, so the controller is
//! only ever touched from [`Driver::dispatch`].
//!
//! Everything here must run inside [`tokio::task::LocalSet`]: tasks are
//! started with `spawn_local`.

use crate::app::{handle_event, Action, Event, ShelfSyncController};
use crate::domain::{Result, ShelfError};
use crate::observability::WarningSink;
use crate::remote::{RemoteRequest, ShelfApi};
use crate::storage::SessionState;
use std::rc::Rc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Event loop around a [`ShelfSyncController`].
pub struct Driver<A: ShelfApi + 'static> {
    controller: ShelfSyncController,
    api: Rc<A>,
    session: Box<dyn SessionState>,
    sink: Box<dyn WarningSink>,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
    search_timer: Option<JoinHandle<()>>,
    search_request: Option<JoinHandle<()>>,
    running: bool,
}

impl<A: ShelfApi + 'static> Driver<A> {
    pub fn new(
        controller: ShelfSyncController,
        api: A,
        session: Box<dyn SessionState>,
        sink: Box<dyn WarningSink>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller,
            api: Rc::new(api),
            session,
            sink,
            tx,
            rx,
            search_timer: None,
            search_request: None,
            running: true,
        }
    }

    /// Handle for feeding user input into the queue from other tasks.
    #[must_use]
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.tx.clone()
    }

    #[must_use]
    pub const fn controller(&self) -> &ShelfSyncController {
        &self.controller
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Begins a session if the session holder has a credential.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`handle_event`].
    pub fn start(&mut self) -> Result<bool> {
        if self.session.is_authenticated() {
            self.dispatch(&Event::SessionStarted)
        } else {
            tracing::info!("no credential stored, waiting for sign-in");
            Ok(true)
        }
    }

    /// Handles one event and executes the resulting actions.
    ///
    /// # Errors
    ///
    /// Propagates controller rejections; no actions run in that case.
    pub fn dispatch(&mut self, event: &Event) -> Result<bool> {
        let (render, actions) = handle_event(&mut self.controller, event)?;
        for action in actions {
            self.execute(action);
        }
        Ok(render)
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::ScheduleSearch { ticket, delay } => {
                let tx = self.tx.clone();
                let timer = tokio::task::spawn_local(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Event::SearchWindowElapsed { ticket });
                });
                if let Some(previous) = self.search_timer.replace(timer) {
                    previous.abort();
                }
            }
            Action::CancelSearch => {
                if let Some(timer) = self.search_timer.take() {
                    timer.abort();
                }
                if let Some(request) = self.search_request.take() {
                    request.abort();
                }
            }
            Action::Remote(request) => self.spawn_request(request),
            Action::EndSession => self.session.end_session(),
            Action::Warn { event, context } => self.sink.log_warning(event, &context),
            Action::Quit => self.running = false,
        }
    }

    fn spawn_request(&mut self, request: RemoteRequest) {
        let is_search = matches!(request, RemoteRequest::SearchCatalog { .. });
        tracing::debug!(
            kind = request.kind(),
            mutation = request.is_mutation(),
            "spawning remote request"
        );

        let api = Rc::clone(&self.api);
        let tx = self.tx.clone();
        let handle = tokio::task::spawn_local(async move {
            let response = api.execute(request).await;
            let _ = tx.send(Event::Remote(response));
        });

        if is_search {
            if let Some(previous) = self.search_request.replace(handle) {
                previous.abort();
            }
        }
    }

    /// Waits for the next queued event and dispatches it.
    ///
    /// Returns `Ok(None)` once the queue is closed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`dispatch`](Self::dispatch).
    pub async fn step(&mut self) -> Result<Option<bool>> {
        match self.rx.recv().await {
            Some(event) => self.dispatch(&event).map(Some),
            None => Ok(None),
        }
    }

    /// Runs until an [`Action::Quit`] executes.
    ///
    /// `on_render` is called whenever the view changed; `on_error` receives
    /// rejected operations (the view is re-rendered after, since a rejection
    /// may still set an inline error).
    pub async fn run(
        &mut self,
        mut on_render: impl FnMut(&ShelfSyncController),
        mut on_error: impl FnMut(&ShelfError),
    ) {
        while self.running {
            match self.step().await {
                Ok(Some(true)) => on_render(&self.controller),
                Ok(Some(false)) => {}
                Ok(None) => break,
                Err(error) => {
                    tracing::debug!(error = %error, "event rejected");
                    on_error(&error);
                    on_render(&self.controller);
                }
            }
        }
        tracing::info!("driver stopped");
    }
}

impl<A: ShelfApi + 'static> std::fmt::Debug for Driver<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("controller", &self.controller)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}
