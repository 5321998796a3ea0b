//! JSON file-based credential store.
//!
//! The credential lives in a small JSON document next to the trace files. Writes
//! go to a temporary file first and are renamed into place so a crash never
//! leaves a truncated document.

use crate::domain::error::{Result, ShelfError};
use crate::storage::backend::CredentialStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// On-disk document format.
///
/// ```json
/// {
///   "version": 1,
///   "token": "eyJhbGciOi...",
///   "updated_at": "2024-03-01T10:15:00Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialData {
    /// Version of the document format for future migrations.
    version: u32,

    #[serde(default)]
    token: Option<String>,

    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Default for CredentialData {
    fn default() -> Self {
        Self {
            version: 1,
            token: None,
            updated_at: None,
        }
    }
}

/// Credential store persisted as a JSON file.
///
/// The document is loaded once on creation and kept in memory; every change is
/// written through immediately.
#[derive(Debug)]
pub struct JsonCredentialStore {
    file_path: PathBuf,
    data: Mutex<CredentialData>,
}

impl JsonCredentialStore {
    /// Creates or opens a credential file. Parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but is not valid JSON
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing credential store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("no credential file yet");
            CredentialData::default()
        };

        Ok(Self {
            file_path,
            data: Mutex::new(data),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<CredentialData> {
        let contents = std::fs::read_to_string(path)?;
        let data: CredentialData = serde_json::from_str(&contents)
            .map_err(|e| ShelfError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(
            version = data.version,
            has_token = data.token.is_some(),
            "loaded credential file"
        );
        Ok(data)
    }

    fn lock(&self) -> Result<MutexGuard<'_, CredentialData>> {
        self.data
            .lock()
            .map_err(|_| ShelfError::Storage("credential store lock poisoned".to_string()))
    }

    /// Writes `data` to a temporary file, then renames it over the target.
    fn save_to_file(&self, data: &CredentialData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| ShelfError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(path = ?self.file_path, "credential file saved");
        Ok(())
    }

    fn update(&self, token: Option<String>) -> Result<()> {
        let mut data = self.lock()?;
        let mut next = data.clone();
        next.token = token;
        next.updated_at = Some(Utc::now());
        self.save_to_file(&next)?;
        *data = next;
        Ok(())
    }
}

impl CredentialStore for JsonCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.lock()?.token.clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_set_credential").entered();
        self.update(Some(token.to_string()))
    }

    fn clear(&self) -> Result<()> {
        let _span = tracing::debug_span!("json_clear_credential").entered();
        if self.lock()?.token.is_none() {
            return Ok(());
        }
        self.update(None)
    }
}
