//! Selection state of a form session.
//!
//! A form session is either creating a new entry, optionally holding the
//! catalog result the user picked, or editing one existing shelf entry. The
//! mode is decided once when the session opens and never changes; the two
//! modes never share data.

use crate::domain::{CatalogResult, ShelfError, ShelfEntry};

/// Create-or-edit selection, fixed in mode for the life of a form session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    /// Adding a new entry; `selected` is the chosen catalog result, if any.
    Create { selected: Option<CatalogResult> },
    /// Editing an existing entry. Only status, rating, and notes change.
    Edit { entry: ShelfEntry },
}

impl SelectionState {
    /// Decides the mode from whether an existing entry was supplied.
    #[must_use]
    pub fn for_entry(entry: Option<ShelfEntry>) -> Self {
        match entry {
            Some(entry) => Self::Edit { entry },
            None => Self::Create { selected: None },
        }
    }

    #[must_use]
    pub const fn is_edit(&self) -> bool {
        matches!(self, Self::Edit { .. })
    }

    /// `true` when catalog search is meaningful: create mode, nothing chosen yet.
    #[must_use]
    pub const fn accepts_search(&self) -> bool {
        matches!(self, Self::Create { selected: None })
    }

    /// Chooses a catalog result.
    ///
    /// # Errors
    ///
    /// Fails in edit mode and when a result is already selected; the caller
    /// must [`clear`](Self::clear) first.
    pub fn select(&mut self, result: CatalogResult) -> Result<(), ShelfError> {
        match self {
            Self::Create { selected: slot @ None } => {
                tracing::debug!(external_id = %result.external_id, title = %result.title, "catalog result selected");
                *slot = Some(result);
                Ok(())
            }
            Self::Create { selected: Some(_) } => {
                Err(ShelfError::Selection("a book is already selected"))
            }
            Self::Edit { .. } => Err(ShelfError::Selection("cannot select a book while editing")),
        }
    }

    /// Returns to the unselected create state, re-enabling search.
    ///
    /// # Errors
    ///
    /// Fails in edit mode.
    pub fn clear(&mut self) -> Result<(), ShelfError> {
        match self {
            Self::Create { selected } => {
                *selected = None;
                Ok(())
            }
            Self::Edit { .. } => Err(ShelfError::Selection("cannot clear the book while editing")),
        }
    }

    #[must_use]
    pub const fn selected(&self) -> Option<&CatalogResult> {
        match self {
            Self::Create { selected } => selected.as_ref(),
            Self::Edit { .. } => None,
        }
    }

    #[must_use]
    pub const fn editing(&self) -> Option<&ShelfEntry> {
        match self {
            Self::Edit { entry } => Some(entry),
            Self::Create { .. } => None,
        }
    }
}
