//! User interface layer.
//!
//! ```text
//! ShelfSyncController → ShelfView::from_controller → ShelfView → render_view → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: display-ready view model types
//! - [`renderer`]: plain-text rendering

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_view};
pub use viewmodel::{EntryRow, FormView, HeaderInfo, ShelfView, EMPTY_SHELF_MESSAGE};
