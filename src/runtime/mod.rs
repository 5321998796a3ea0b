//! Async runtime glue: turns actions into tasks and completions into events.

pub mod driver;

pub use driver::Driver;
