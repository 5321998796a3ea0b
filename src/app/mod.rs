//! Application layer: the shelf synchronization state machine.
//!
//! Nothing in this module performs IO. The runtime feeds [`Event`]s into
//! [`handle_event`] and executes the [`Action`]s that come back.
//!
//! ```text
//! User Input → Event → handle_event → controller mutations → Actions → runtime
//!                  ↑                                                   ↓
//!                  └──── timer expiry / remote completions ────────────┘
//! ```
//!
//! # Modules
//!
//! - [`search`]: debounced catalog search with stale-result suppression
//! - [`selection`]: create-or-edit selection of a form session
//! - [`form`]: the transient form session and its raw draft
//! - [`cache`]: local replica of the shelf with load supersession
//! - [`controller`]: orchestration of the above
//! - [`actions`] / [`handler`]: the event/action boundary
//!
//! # Example
//!
//! ```rust
//! use shelfsync::app::{handle_event, Action, Event, ShelfSyncController};
//! use std::time::Duration;
//!
//! let mut controller = ShelfSyncController::new(Duration::from_millis(400), 2);
//! let (_, actions) = handle_event(&mut controller, &Event::SessionStarted)?;
//! assert!(matches!(actions[..], [Action::Remote(_)]));
//! # Ok::<(), shelfsync::domain::ShelfError>(())
//! ```

pub mod actions;
pub mod cache;
pub mod controller;
pub mod form;
pub mod handler;
pub mod search;
pub mod selection;

pub use actions::Action;
pub use cache::{LoadTicket, ShelfCache};
pub use controller::{ShelfSyncController, MISSING_SELECTION_MESSAGE};
pub use form::{FormDraft, FormId, FormSession};
pub use handler::{handle_event, Event};
pub use search::{SearchCompletion, SearchDebouncer, SearchStep, SearchTicket};
pub use selection::SelectionState;
