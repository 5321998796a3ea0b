//! Event handling and state transition logic.
//!
//! [`handle_event`] is the single entry point the runtime uses to drive a
//! [`ShelfSyncController`]. Events fall into three groups:
//!
//! - **User intent**: form lifecycle, draft edits, search input, submit,
//!   delete, filter changes.
//! - **Timers**: [`Event::SearchWindowElapsed`] when a debounce window ends.
//! - **Remote completions**: [`Event::Remote`] wrapping a [`RemoteResponse`].
//!
//! The returned flag tells the runtime whether the view changed.

use crate::app::search::SearchTicket;
use crate::app::{Action, ShelfSyncController};
use crate::domain::error::Result;
use crate::domain::{EntryId, ReadingStatus, StatusFilter};
use crate::remote::RemoteResponse;

/// Everything that can happen to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Opens an empty create form.
    OpenCreate,
    /// Opens an edit form for a cached entry.
    OpenEdit(EntryId),
    /// Closes the form without saving.
    CancelForm,
    /// The catalog search box now holds this text.
    QueryChanged(String),
    /// A debounce window scheduled with this ticket ended.
    SearchWindowElapsed { ticket: SearchTicket },
    /// Picks the search result at this position.
    SelectResult(usize),
    /// Drops the picked book.
    ClearSelection,
    SetStatus(ReadingStatus),
    SetRatingInput(String),
    SetNotes(String),
    Submit,
    Delete(EntryId),
    SetFilter(StatusFilter),
    Reload,
    /// A fresh credential is available.
    SessionStarted,
    /// The user signed out.
    SessionEnded,
    /// A remote request finished.
    Remote(RemoteResponse),
    Quit,
}

/// Processes an event, mutates the controller, and returns actions to execute.
///
/// # Returns
///
/// `(should_render, actions)`. Actions must be executed in order.
///
/// # Errors
///
/// Propagates controller rejections such as [`ShelfError::Validation`],
/// [`ShelfError::NoForm`] and [`ShelfError::AuthExpired`]. State may still have
/// changed (a validation failure sets the form's inline error), so callers
/// should re-render after an error.
///
/// [`ShelfError::Validation`]: crate::domain::ShelfError::Validation
/// [`ShelfError::NoForm`]: crate::domain::ShelfError::NoForm
/// [`ShelfError::AuthExpired`]: crate::domain::ShelfError::AuthExpired
///
/// # Tracing
///
/// Each call creates a debug-level span carrying the event.
pub fn handle_event(
    controller: &mut ShelfSyncController,
    event: &Event,
) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::OpenCreate => Ok((true, controller.open_create())),
        Event::OpenEdit(id) => Ok((true, controller.open_edit(*id)?)),
        Event::CancelForm => Ok((true, controller.cancel_form())),
        Event::QueryChanged(query) => Ok((true, controller.observe_query(query)?)),
        Event::SearchWindowElapsed { ticket } => {
            let actions = controller.search_window_elapsed(*ticket);
            // Render only when a lookup actually started (searching indicator).
            Ok((!actions.is_empty(), actions))
        }
        Event::SelectResult(index) => Ok((true, controller.select_result(*index)?)),
        Event::ClearSelection => Ok((true, controller.clear_selection()?)),
        Event::SetStatus(status) => {
            controller.set_status(*status)?;
            Ok((true, vec![]))
        }
        Event::SetRatingInput(input) => {
            controller.set_rating_input(input)?;
            Ok((true, vec![]))
        }
        Event::SetNotes(notes) => {
            controller.set_notes(notes)?;
            Ok((true, vec![]))
        }
        Event::Submit => Ok((true, controller.submit()?)),
        Event::Delete(id) => Ok((true, controller.delete_entry(*id)?)),
        Event::SetFilter(filter) => {
            tracing::debug!(filter = ?filter, "filter changed");
            Ok((true, controller.set_filter(*filter)?))
        }
        Event::Reload => Ok((false, controller.reload()?)),
        Event::SessionStarted => Ok((true, controller.begin_session())),
        Event::SessionEnded => Ok((true, controller.end_session())),
        Event::Remote(response) => Ok((true, handle_response(controller, response))),
        Event::Quit => Ok((false, vec![Action::Quit])),
    }
}

fn handle_response(controller: &mut ShelfSyncController, response: &RemoteResponse) -> Vec<Action> {
    if let Some(error) = response.error() {
        tracing::debug!(error = %error, "remote request failed");
    }

    match response {
        RemoteResponse::SearchCompleted { ticket, result } => {
            controller.search_completed(*ticket, result.clone())
        }
        RemoteResponse::ShelfLoaded { ticket, result } => {
            controller.shelf_loaded(*ticket, result.clone())
        }
        RemoteResponse::EntryCreated { form, result }
        | RemoteResponse::EntryUpdated { form, result, .. } => {
            controller.submit_completed(*form, result.clone())
        }
        RemoteResponse::EntryDeleted { id, result } => {
            controller.delete_completed(*id, result.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Book, ShelfEntry, ShelfError};
    use crate::remote::RemoteRequest;
    use std::time::Duration;

    fn started() -> (ShelfSyncController, Vec<Action>) {
        let mut controller = ShelfSyncController::new(Duration::from_millis(400), 2);
        let (render, actions) = handle_event(&mut controller, &Event::SessionStarted).unwrap();
        assert!(render);
        (controller, actions)
    }

    #[test]
    fn session_start_loads_shelf_and_completion_fills_cache() {
        let (mut controller, actions) = started();
        let [Action::Remote(RemoteRequest::LoadShelf { ticket, filter })] = actions[..] else {
            panic!("expected a shelf load, got {actions:?}");
        };
        assert_eq!(filter, StatusFilter::All);

        let entry = ShelfEntry {
            id: EntryId(1),
            book: Book {
                title: "Emma".into(),
                author: "Jane Austen".into(),
                cover_url: None,
                first_publish_year: None,
            },
            status: ReadingStatus::Read,
            rating: None,
            notes: None,
            created_at: None,
        };
        let event = Event::Remote(RemoteResponse::ShelfLoaded {
            ticket,
            result: Ok(vec![entry]),
        });
        handle_event(&mut controller, &event).unwrap();
        assert_eq!(controller.cache().len(), 1);
    }

    #[test]
    fn create_submit_without_selection_makes_no_remote_call() {
        let (mut controller, _) = started();
        handle_event(&mut controller, &Event::OpenCreate).unwrap();
        handle_event(&mut controller, &Event::SetStatus(ReadingStatus::Reading)).unwrap();

        let outcome = handle_event(&mut controller, &Event::Submit);
        assert!(matches!(outcome, Err(ShelfError::Validation(_))));
        assert!(controller.form().and_then(|f| f.error.as_ref()).is_some());
    }

    #[test]
    fn draft_edits_require_an_open_form() {
        let (mut controller, _) = started();
        let outcome = handle_event(&mut controller, &Event::SetNotes("hi".into()));
        assert!(matches!(outcome, Err(ShelfError::NoForm)));
    }

    #[test]
    fn sign_out_ends_session_without_remote_calls() {
        let (mut controller, _) = started();
        handle_event(&mut controller, &Event::OpenCreate).unwrap();

        let (render, actions) = handle_event(&mut controller, &Event::SessionEnded).unwrap();
        assert!(render);
        assert_eq!(actions, vec![Action::CancelSearch, Action::EndSession]);
        assert!(controller.form().is_none());

        assert!(matches!(
            handle_event(&mut controller, &Event::Reload),
            Err(ShelfError::AuthExpired)
        ));
        assert!(matches!(
            handle_event(&mut controller, &Event::Delete(EntryId(1))),
            Err(ShelfError::AuthExpired)
        ));
    }

    #[test]
    fn quit_emits_quit_action() {
        let (mut controller, _) = started();
        assert_eq!(
            handle_event(&mut controller, &Event::Quit).unwrap(),
            (false, vec![Action::Quit])
        );
    }
}
