//! Error types for shelf synchronization.
//!
//! This module defines the crate-wide error type [`ShelfError`], the
//! [`RemoteError`] carried inside remote completions, and a [`Result`] alias.
//! All errors derive their `Error` implementation through `thiserror`.
//!
//! The taxonomy mirrors how failures reach the user:
//!
//! - **Validation**: raised locally before any remote call, shown inline.
//! - **Remote**: any non-2xx or transport failure other than an expired session.
//! - **Auth expired**: never shown as a form error; ends the session instead.

use crate::domain::book::EntryId;
use thiserror::Error;

/// Message shown when a remote failure carries no human-readable detail.
pub const GENERIC_REMOTE_MESSAGE: &str = "Something went wrong";

/// Failure reported by the remote store for a single request.
///
/// Cloneable so it can travel inside [`crate::remote::RemoteResponse`] values
/// and runtime events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The store answered with a 401; the bearer credential is no longer valid.
    #[error("not authenticated")]
    Unauthenticated,

    /// The store answered with a non-success status.
    ///
    /// `detail` holds the `detail` field of the response body when it was a
    /// plain string.
    #[error("request rejected with status {status}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Human-readable explanation supplied by the store, if any.
        detail: Option<String>,
    },

    /// The request never produced a response (connection, DNS, TLS, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Returns `true` for the 401-class failure that ends the session.
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Message to show the user: the store's detail when present, otherwise
    /// [`GENERIC_REMOTE_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            _ => GENERIC_REMOTE_MESSAGE.to_string(),
        }
    }
}

/// The main error type for shelf operations.
///
/// # Examples
///
/// ```
/// use shelfsync::domain::ShelfError;
///
/// let err = ShelfError::Validation("Please search for and select a book".to_string());
/// assert_eq!(err.to_string(), "Please search for and select a book");
/// ```
#[derive(Debug, Error)]
pub enum ShelfError {
    /// Local validation rejected the request; no remote call was made.
    #[error("{0}")]
    Validation(String),

    /// The remote store reported a failure.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The session ended after an unauthenticated response. No remote call is
    /// issued until a new session begins.
    #[error("session expired, sign in again")]
    AuthExpired,

    /// A selection transition was attempted in the wrong form mode or state.
    #[error("invalid selection: {0}")]
    Selection(&'static str),

    /// The operation needs an open form session.
    #[error("no form is open")]
    NoForm,

    /// A submit is already outstanding for the current form session.
    #[error("a submission is already in progress")]
    SubmitPending,

    /// The referenced entry is not in the local cache.
    #[error("entry {0} is not on the shelf")]
    EntryNotFound(EntryId),

    /// Credential persistence failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for shelf operations.
pub type Result<T> = std::result::Result<T, ShelfError>;
