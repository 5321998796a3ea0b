//! Side effects emitted by the controller for the runtime to execute.
//!
//! The controller performs no IO. Every timer, remote call, and session
//! signal leaves it as an [`Action`], and every completion comes back as an
//! [`Event`](super::Event).

use crate::app::search::SearchTicket;
use crate::remote::RemoteRequest;
use std::time::Duration;

/// Commands produced by [`handle_event`](super::handle_event).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Starts a debounce window. Any window already running is superseded and
    /// should be cancelled; expiry is reported as
    /// [`Event::SearchWindowElapsed`](super::Event::SearchWindowElapsed).
    ScheduleSearch {
        ticket: SearchTicket,
        delay: Duration,
    },

    /// Cancels any running debounce window and any in-flight catalog lookup.
    CancelSearch,

    /// Sends a request to the remote store.
    Remote(RemoteRequest),

    /// Tells the session collaborator that the credential is no longer valid.
    EndSession,

    /// Reports a non-fatal failure to the observability sink.
    Warn {
        event: &'static str,
        context: String,
    },

    /// Stops the runtime loop.
    Quit,
}
