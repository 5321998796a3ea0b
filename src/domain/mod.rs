//! Domain layer for shelf synchronization.
//!
//! Core types shared by the application, remote, and UI layers, free of any
//! runtime or transport concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`book`]: Catalog results, shelf entries, statuses, ratings, and request bodies

pub mod book;
pub mod error;

pub use book::{
    coerce_notes, Book, CatalogResult, EntryId, EntryUpdate, NewShelfEntry, Rating, ReadingStatus,
    ShelfEntry, StatusFilter,
};
pub use error::{RemoteError, Result, ShelfError, GENERIC_REMOTE_MESSAGE};
