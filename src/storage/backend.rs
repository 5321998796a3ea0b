//! Credential storage abstraction.
//!
//! The bearer credential is opaque to this crate: it is set by whoever signs
//! the user in, read by the HTTP client for every request, and cleared when
//! the session ends.

use crate::domain::error::Result;

/// Persisted holder of the bearer credential.
///
/// Shared between the HTTP client and the session holder, hence `&self`
/// methods and `Send + Sync`.
///
/// # Implementations
///
/// - [`JsonCredentialStore`](super::JsonCredentialStore): JSON file with atomic writes
/// - [`MemoryCredentialStore`](super::MemoryCredentialStore): process-local, for tests
///
/// # Examples
///
/// ```no_run
/// use shelfsync::storage::{CredentialStore, JsonCredentialStore};
/// use std::path::PathBuf;
///
/// let store = JsonCredentialStore::new(PathBuf::from("/tmp/credentials.json"))?;
/// store.set("token-123")?;
/// assert_eq!(store.get()?.as_deref(), Some("token-123"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credential, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self) -> Result<Option<String>>;

    /// Replaces the stored credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be persisted.
    fn set(&self, token: &str) -> Result<()>;

    /// Forgets the stored credential. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    fn clear(&self) -> Result<()>;
}
