//! Typed request/response protocol between the controller and the remote store.
//!
//! The controller never calls the store directly. It emits a [`RemoteRequest`]
//! inside an action; the runtime hands it to a [`ShelfApi`](super::ShelfApi)
//! and feeds the matching [`RemoteResponse`] back in as an event. Every
//! response echoes the ticket or id of its request so stale completions can
//! be recognized.

use crate::app::cache::LoadTicket;
use crate::app::form::FormId;
use crate::app::search::SearchTicket;
use crate::domain::{
    CatalogResult, EntryId, EntryUpdate, NewShelfEntry, RemoteError, ShelfEntry, StatusFilter,
};

/// A single call against the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRequest {
    /// `GET /api/search?q=`
    SearchCatalog { ticket: SearchTicket, query: String },
    /// `GET /api/shelf?status=`
    LoadShelf { ticket: LoadTicket, filter: StatusFilter },
    /// `POST /api/shelf`
    CreateEntry { form: FormId, body: NewShelfEntry },
    /// `PATCH /api/shelf/{id}`
    UpdateEntry { form: FormId, id: EntryId, changes: EntryUpdate },
    /// `DELETE /api/shelf/{id}`
    DeleteEntry { id: EntryId },
}

impl RemoteRequest {
    /// Short name used in spans and log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SearchCatalog { .. } => "search_catalog",
            Self::LoadShelf { .. } => "load_shelf",
            Self::CreateEntry { .. } => "create_entry",
            Self::UpdateEntry { .. } => "update_entry",
            Self::DeleteEntry { .. } => "delete_entry",
        }
    }

    /// `true` for create, update, and delete.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateEntry { .. } | Self::UpdateEntry { .. } | Self::DeleteEntry { .. }
        )
    }
}

/// Completion of a [`RemoteRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteResponse {
    SearchCompleted {
        ticket: SearchTicket,
        result: Result<Vec<CatalogResult>, RemoteError>,
    },
    ShelfLoaded {
        ticket: LoadTicket,
        result: Result<Vec<ShelfEntry>, RemoteError>,
    },
    /// The store may answer a create with the new entry or with no body.
    EntryCreated {
        form: FormId,
        result: Result<Option<ShelfEntry>, RemoteError>,
    },
    EntryUpdated {
        form: FormId,
        id: EntryId,
        result: Result<Option<ShelfEntry>, RemoteError>,
    },
    EntryDeleted {
        id: EntryId,
        result: Result<(), RemoteError>,
    },
}

impl RemoteResponse {
    /// The error carried by this completion, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&RemoteError> {
        match self {
            Self::SearchCompleted { result, .. } => result.as_ref().err(),
            Self::ShelfLoaded { result, .. } => result.as_ref().err(),
            Self::EntryCreated { result, .. } | Self::EntryUpdated { result, .. } => {
                result.as_ref().err()
            }
            Self::EntryDeleted { result, .. } => result.as_ref().err(),
        }
    }

    /// Builds the failed completion for `request`, used when a request could
    /// not be sent at all.
    #[must_use]
    pub fn failed(request: &RemoteRequest, error: RemoteError) -> Self {
        match request {
            RemoteRequest::SearchCatalog { ticket, .. } => Self::SearchCompleted {
                ticket: *ticket,
                result: Err(error),
            },
            RemoteRequest::LoadShelf { ticket, .. } => Self::ShelfLoaded {
                ticket: *ticket,
                result: Err(error),
            },
            RemoteRequest::CreateEntry { form, .. } => Self::EntryCreated {
                form: *form,
                result: Err(error),
            },
            RemoteRequest::UpdateEntry { form, id, .. } => Self::EntryUpdated {
                form: *form,
                id: *id,
                result: Err(error),
            },
            RemoteRequest::DeleteEntry { id } => Self::EntryDeleted {
                id: *id,
                result: Err(error),
            },
        }
    }
}
