//! Shelfsync: client-side synchronization for a personal reading list.
//!
//! Shelfsync keeps a local replica of a remote "shelf" of books consistent
//! with user intent while talking to a REST store:
//! - Debounced catalog search with stale-result suppression
//! - Create-or-edit form sessions with raw rating/notes coercion
//! - A shelf cache with filtered reloads and optimistic deletion
//! - Session expiry handling on unauthenticated responses

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Command-line shim (main.rs)                        │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime/)                                 │  ← tokio LocalSet
//! │  - Debounce timers                                  │
//! │  - Remote request tasks                             │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │  ← No IO
//! │  - Action emission                                  │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Remote Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (remote/)     │
//! │ - View models │   │ - Credentials │   │ - REST client │
//! │ - Text render │   │ - Session     │   │ - Messages    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │  ← Core types
//! │  - Error types (domain/error)                       │
//! │  - Books, entries, ratings (domain/book)            │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing                            │
//! │  - File-based OTLP export                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Controller state machine with event/action model
//! - [`domain`]: Core domain types (entries, errors)
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`remote`]: Request/response messages and the HTTP store client
//! - [`runtime`]: Async driver executing actions
//! - [`storage`]: Credential persistence and login state
//! - [`ui`]: Text rendering of the shelf and form
//! - [`observability`]: Tracing setup and warning sink
//!
//! # Configuration
//!
//! Read from a TOML file; every key is optional:
//!
//! ```toml
//! api_base_url = "http://localhost:8000"
//! debounce_ms = 400
//! min_query_len = 2
//! data_dir = "~/.local/share/shelfsync"
//! trace_level = "debug"
//! log_to_stderr = false
//! ```
//!
//! `SHELFSYNC_API_URL` and `SHELFSYNC_TRACE_LEVEL` override the file.
//!
//! # Example
//!
//! ```rust
//! use shelfsync::{handle_event, initialize, Action, Config, Event};
//!
//! let mut controller = initialize(&Config::default());
//!
//! let (_, actions) = handle_event(&mut controller, &Event::SessionStarted)?;
//! assert_eq!(actions.len(), 1);
//!
//! let (_, actions) = handle_event(&mut controller, &Event::OpenCreate)?;
//! assert!(actions.contains(&Action::CancelSearch));
//! # Ok::<(), shelfsync::ShelfError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod remote;
pub mod runtime;
pub mod storage;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, Event, ShelfSyncController};
pub use domain::{Result, ShelfError};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_DEBOUNCE_MS: u64 = 400;
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Client configuration.
///
/// Missing keys take their defaults, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the shelf store. Default: `http://localhost:8000`
    pub api_base_url: String,

    /// Quiet period before a catalog search is sent. Default: 400
    pub debounce_ms: u64,

    /// Shortest query, in characters and untrimmed, that triggers a search.
    /// Default: 2
    pub min_query_len: usize,

    /// Directory for the credential file and trace output.
    ///
    /// See [`infrastructure::get_data_dir`] for the fallback chain.
    pub data_dir: Option<String>,

    /// Tracing level: `trace`, `debug`, `info`, `warn`, `error`.
    /// Ignored when `RUST_LOG` is set. Default: `"info"`
    pub trace_level: Option<String>,

    /// Also write human-readable logs to stderr.
    pub log_to_stderr: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            data_dir: None,
            trace_level: None,
            log_to_stderr: false,
        }
    }
}

impl Config {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Config`] on malformed TOML or mistyped values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shelfsync::Config;
    ///
    /// let config = Config::from_toml_str("debounce_ms = 250")?;
    /// assert_eq!(config.debounce_ms, 250);
    /// assert_eq!(config.min_query_len, 2);
    /// # Ok::<(), shelfsync::ShelfError>(())
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| ShelfError::Config(e.to_string()))
    }

    /// Loads the file at `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Io`] if the file exists but cannot be read, or
    /// [`ShelfError::Config`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Applies `SHELFSYNC_API_URL` and `SHELFSYNC_TRACE_LEVEL`.
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_overrides(
            std::env::var("SHELFSYNC_API_URL").ok(),
            std::env::var("SHELFSYNC_TRACE_LEVEL").ok(),
        )
    }

    fn apply_overrides(mut self, api_url: Option<String>, trace_level: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(level) = trace_level.filter(|l| !l.trim().is_empty()) {
            self.trace_level = Some(level);
        }
        self
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Creates a controller from configuration.
///
/// The controller starts without an active session; feed it
/// [`Event::SessionStarted`] once a credential is available.
#[must_use]
pub fn initialize(config: &Config) -> ShelfSyncController {
    tracing::debug!(
        api_base_url = %config.api_base_url,
        debounce_ms = config.debounce_ms,
        min_query_len = config.min_query_len,
        "initializing shelfsync"
    );
    ShelfSyncController::new(config.debounce(), config.min_query_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = Config::from_toml_str(
            "api_base_url = \"https://shelf.example\"\nlog_to_stderr = true\n",
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://shelf.example");
        assert!(config.log_to_stderr);
        assert_eq!(config.debounce(), Duration::from_millis(400));
    }

    #[test]
    fn mistyped_value_is_a_config_error() {
        let err = Config::from_toml_str("debounce_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ShelfError::Config(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn file_is_read_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "min_query_len = 3\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().min_query_len, 3);
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let config = Config::default().apply_overrides(Some("  ".into()), Some("debug".into()));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }
}
