//! Core types for duofm.
//!
//! This crate provides the data structures shared by the operation engine
//! and the front end: the panel model (directory listing, cursor, selection),
//! engine configuration, and error types.

mod config;
mod entry;
mod error;
mod panel;

pub use config::{OpConfig, OpConfigBuilder};
pub use entry::{EntryKind, PanelEntry};
pub use error::FmError;
pub use panel::{Panel, SortKey, SortOrder, is_directory};
