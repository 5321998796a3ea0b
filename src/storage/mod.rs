//! Storage layer for the bearer credential and login state.
//!
//! # Modules
//!
//! - `backend`: [`CredentialStore`] trait
//! - `json`: JSON file-backed store with atomic writes
//! - `memory`: in-memory store
//! - `session`: [`SessionState`] trait and its credential-backed [`Session`]

pub mod backend;
pub mod json;
pub mod memory;
pub mod session;

pub use backend::CredentialStore;
pub use json::JsonCredentialStore;
pub use memory::MemoryCredentialStore;
pub use session::{Session, SessionState};
