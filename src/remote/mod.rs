//! Remote store access.
//!
//! - [`messages`]: typed requests and their completions
//! - [`client`]: the [`ShelfApi`] trait the runtime executes requests through
//! - [`http`]: the `reqwest` implementation

pub mod client;
pub mod http;
pub mod messages;

pub use client::ShelfApi;
pub use http::HttpShelfApi;
pub use messages::{RemoteRequest, RemoteResponse};
