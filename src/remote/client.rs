//! The seam between the runtime and the remote store.

use crate::remote::messages::{RemoteRequest, RemoteResponse};

/// Executes [`RemoteRequest`]s against the remote store.
///
/// Failures never escape as `Err`: they travel inside the returned
/// [`RemoteResponse`] so the controller sees every completion. Futures are
/// polled on a single-threaded `LocalSet`, so implementations need not be
/// `Send`.
#[allow(async_fn_in_trait)]
pub trait ShelfApi {
    async fn execute(&self, request: RemoteRequest) -> RemoteResponse;
}
