//! Platform utilities.

pub mod paths;

pub use paths::{credentials_file, expand_tilde, get_data_dir, trace_file};
