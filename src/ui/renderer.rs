//! Plain-text rendering of a [`ShelfView`].

use crate::app::ShelfSyncController;
use crate::ui::viewmodel::{EntryRow, FormView, ShelfView, SEARCHING_MESSAGE};
use std::fmt::Write as _;

/// Renders the controller's current state as text.
#[must_use]
pub fn render(controller: &ShelfSyncController) -> String {
    render_view(&ShelfView::from_controller(controller))
}

/// Renders a precomputed view.
#[must_use]
pub fn render_view(view: &ShelfView) -> String {
    let mut out = String::new();

    if view.signed_out {
        out.push_str("Signed out. Use `token <value>` to sign in.\n");
    }

    let header = &view.header;
    let _ = writeln!(
        out,
        "{} [{}] {} {}{}",
        header.title,
        header.filter_label,
        header.count,
        if header.count == 1 { "book" } else { "books" },
        if header.loading { " (loading...)" } else { "" },
    );

    match view.empty_message {
        Some(message) => {
            let _ = writeln!(out, "  {message}");
        }
        None => view.rows.iter().for_each(|row| render_row(&mut out, row)),
    }

    if let Some(form) = &view.form {
        render_form(&mut out, form);
    }
    out
}

fn render_row(out: &mut String, row: &EntryRow) {
    let year = row.year.as_ref().map(|y| format!(" ({y})")).unwrap_or_default();
    let _ = writeln!(out, "  #{} {} by {}{year}", row.id, row.title, row.author);

    let mut details = vec![row.status.to_string()];
    details.extend(row.stars.clone());
    details.extend(row.added.clone());
    let _ = writeln!(out, "      {}", details.join(" | "));

    if let Some(notes) = &row.notes {
        let _ = writeln!(out, "      {notes}");
    }
}

fn render_form(out: &mut String, form: &FormView) {
    let _ = writeln!(out, "--- {} ---", form.title);

    match &form.book {
        Some(book) => {
            let _ = writeln!(out, "  Book: {book}");
        }
        None => {
            let _ = writeln!(out, "  Search: {}", form.query);
            if form.searching {
                let _ = writeln!(out, "  {SEARCHING_MESSAGE}");
            }
            for (index, result) in form.results.iter().enumerate() {
                let _ = writeln!(out, "  [{index}] {result}");
            }
        }
    }

    let _ = writeln!(out, "  Status: {}", form.status);
    let _ = writeln!(out, "  Rating: {}", form.rating_input);
    let _ = writeln!(out, "  Notes: {}", form.notes);
    if form.submitting {
        let _ = writeln!(out, "  Saving...");
    }
    if let Some(error) = &form.error {
        let _ = writeln!(out, "  ! {error}");
    }
}
