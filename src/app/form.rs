//! The transient create-or-edit form session.

use crate::app::selection::SelectionState;
use crate::domain::{ReadingStatus, ShelfEntry};

/// Identifies one form session; submit completions carry it back so a
/// response for a closed session never touches a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormId(pub u64);

/// Raw, uncoerced field input. Coercion happens at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub status: ReadingStatus,
    pub rating_input: String,
    pub notes: String,
}

impl FormDraft {
    /// Pre-fills the draft from an existing entry.
    #[must_use]
    pub fn from_entry(entry: &ShelfEntry) -> Self {
        Self {
            status: entry.status,
            rating_input: entry
                .rating
                .map(|rating| rating.value().to_string())
                .unwrap_or_default(),
            notes: entry.notes.clone().unwrap_or_default(),
        }
    }
}

/// One live add/edit interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSession {
    id: FormId,
    pub selection: SelectionState,
    pub draft: FormDraft,
    /// Last raw query typed into the catalog search box.
    pub query: String,
    submitting: bool,
    /// Inline error shown under the form.
    pub error: Option<String>,
}

impl FormSession {
    /// Opens a create session, or an edit session when `entry` is supplied.
    #[must_use]
    pub fn open(id: FormId, entry: Option<ShelfEntry>) -> Self {
        let draft = entry.as_ref().map(FormDraft::from_entry).unwrap_or_default();
        Self {
            id,
            selection: SelectionState::for_entry(entry),
            draft,
            query: String::new(),
            submitting: false,
            error: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> FormId {
        self.id
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn begin_submit(&mut self) {
        self.submitting = true;
        self.error = None;
    }

    pub(crate) fn fail_submit(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }

    /// Title shown above the form.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        if self.selection.is_edit() {
            "Edit Entry"
        } else {
            "Add a Book"
        }
    }
}
