//! Login-state holder.

use crate::storage::backend::CredentialStore;
use std::sync::Arc;

/// Owner of login state. The controller only ever tells it that the session
/// ended; signing in happens elsewhere.
pub trait SessionState {
    fn is_authenticated(&self) -> bool;

    /// Forgets the credential after sign-out or after the store rejected it.
    fn end_session(&self);
}

/// [`SessionState`] backed by a [`CredentialStore`]: authenticated while a
/// credential is stored.
#[derive(Clone)]
pub struct Session {
    credentials: Arc<dyn CredentialStore>,
}

impl Session {
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }

    #[must_use]
    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.credentials)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionState for Session {
    fn is_authenticated(&self) -> bool {
        match self.credentials.get() {
            Ok(token) => token.is_some_and(|t| !t.is_empty()),
            Err(e) => {
                tracing::error!(error = %e, "failed to read credential");
                false
            }
        }
    }

    fn end_session(&self) {
        tracing::info!("session ended, clearing credential");
        if let Err(e) = self.credentials.clear() {
            tracing::error!(error = %e, "failed to clear credential");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCredentialStore;

    #[test]
    fn ending_the_session_clears_the_credential() {
        let store = Arc::new(MemoryCredentialStore::with_token("abc"));
        let session = Session::new(store.clone());
        assert!(session.is_authenticated());

        session.end_session();
        assert!(!session.is_authenticated());
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn empty_token_is_not_authenticated() {
        let session = Session::new(Arc::new(MemoryCredentialStore::with_token("")));
        assert!(!session.is_authenticated());
    }
}
