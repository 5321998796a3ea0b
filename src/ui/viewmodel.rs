//! Display-ready snapshot of controller state.
//!
//! View models are computed by [`ShelfView::from_controller`] and consumed by
//! the renderer. They hold no logic, only formatted strings and flags.

use crate::app::{FormSession, ShelfSyncController};
use crate::domain::{CatalogResult, Rating, ShelfEntry};

pub const EMPTY_SHELF_MESSAGE: &str = "No books yet. Add your first one!";
pub const SEARCHING_MESSAGE: &str = "Searching Open Library...";

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfView {
    pub header: HeaderInfo,
    pub rows: Vec<EntryRow>,
    /// Shown instead of `rows` when the shelf is empty.
    pub empty_message: Option<&'static str>,
    pub form: Option<FormView>,
    pub signed_out: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: &'static str,
    pub filter_label: &'static str,
    pub count: usize,
    pub loading: bool,
}

/// One shelf entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: Option<String>,
    pub status: &'static str,
    /// `★★★☆☆`, absent when unrated.
    pub stars: Option<String>,
    pub notes: Option<String>,
    pub added: Option<String>,
}

/// The open add/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: &'static str,
    pub query: String,
    pub searching: bool,
    pub results: Vec<String>,
    /// `Title by Author` of the picked (create) or edited (edit) book.
    pub book: Option<String>,
    pub status: &'static str,
    pub rating_input: String,
    pub notes: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl ShelfView {
    #[must_use]
    pub fn from_controller(controller: &ShelfSyncController) -> Self {
        let cache = controller.cache();
        let rows: Vec<EntryRow> = cache.entries().iter().map(EntryRow::from_entry).collect();

        Self {
            header: HeaderInfo {
                title: "My Bookshelf",
                filter_label: controller.filter().label(),
                count: rows.len(),
                loading: cache.is_loading(),
            },
            empty_message: rows.is_empty().then_some(EMPTY_SHELF_MESSAGE),
            rows,
            form: controller
                .form()
                .map(|form| FormView::from_form(form, controller.search())),
            signed_out: !controller.is_session_active(),
        }
    }
}

impl EntryRow {
    #[must_use]
    pub fn from_entry(entry: &ShelfEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            title: entry.book.title.clone(),
            author: entry.book.author.clone(),
            year: entry.book.first_publish_year.map(|y| y.to_string()),
            status: entry.status.label(),
            stars: entry.rating.map(stars),
            notes: entry.notes.clone().filter(|n| !n.is_empty()),
            added: entry.added_ago(),
        }
    }
}

impl FormView {
    fn from_form(form: &FormSession, search: &crate::app::SearchDebouncer) -> Self {
        let book = form
            .selection
            .selected()
            .map(describe_result)
            .or_else(|| {
                form.selection
                    .editing()
                    .map(|entry| format!("{} by {}", entry.book.title, entry.book.author))
            });

        Self {
            title: form.title(),
            query: form.query.clone(),
            searching: search.is_searching(),
            results: search.results().iter().map(describe_result).collect(),
            book,
            status: form.draft.status.label(),
            rating_input: form.draft.rating_input.clone(),
            notes: form.draft.notes.clone(),
            submitting: form.is_submitting(),
            error: form.error.clone(),
        }
    }
}

/// Filled stars for the rating, hollow stars for the rest of five.
#[must_use]
pub fn stars(rating: Rating) -> String {
    let filled = usize::from(rating.value());
    let hollow = usize::from(Rating::MAX).saturating_sub(filled);
    format!("{}{}", "★".repeat(filled), "☆".repeat(hollow))
}

fn describe_result(result: &CatalogResult) -> String {
    match result.first_publish_year {
        Some(year) => format!("{} by {} ({year})", result.title, result.author),
        None => format!("{} by {}", result.title, result.author),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Action;
    use crate::domain::{Book, EntryId, ReadingStatus};
    use crate::remote::RemoteRequest;
    use std::time::Duration;

    #[test]
    fn star_rendering() {
        assert_eq!(stars(Rating::new(3).unwrap()), "★★★☆☆");
        assert_eq!(stars(Rating::new(5).unwrap()), "★★★★★");
    }

    #[test]
    fn empty_shelf_shows_message() {
        let controller = ShelfSyncController::new(Duration::from_millis(400), 2);
        let view = ShelfView::from_controller(&controller);
        assert_eq!(view.empty_message, Some(EMPTY_SHELF_MESSAGE));
        assert!(view.signed_out);
        assert!(view.form.is_none());
    }

    #[test]
    fn rows_follow_cache_order_with_labels() {
        let mut controller = ShelfSyncController::new(Duration::from_millis(400), 2);
        let actions = controller.begin_session();
        let Some(Action::Remote(RemoteRequest::LoadShelf { ticket, .. })) = actions.first() else {
            panic!("expected load");
        };
        let entry = ShelfEntry {
            id: EntryId(9),
            book: Book {
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                cover_url: None,
                first_publish_year: Some(1965),
            },
            status: ReadingStatus::WantToRead,
            rating: Rating::new(2),
            notes: Some(String::new()),
            created_at: None,
        };
        controller.shelf_loaded(*ticket, Ok(vec![entry]));

        let view = ShelfView::from_controller(&controller);
        assert_eq!(view.header.count, 1);
        assert_eq!(view.header.filter_label, "All");
        let row = &view.rows[0];
        assert_eq!(row.status, "Want to Read");
        assert_eq!(row.stars.as_deref(), Some("★★☆☆☆"));
        assert_eq!(row.year.as_deref(), Some("1965"));
        assert_eq!(row.notes, None);
        assert_eq!(view.empty_message, None);
    }
}
