//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`table`] - Two-column tables for listings and help
//! - [`prompt`] - Terminal prompts for unset template parameters
//!
//! # Design
//!
//! Diagnostics go to stderr through `tracing`; only results are written to
//! stdout through this module. Prompts are drawn on stderr.

pub mod prompt;
pub mod table;

pub use prompt::TerminalPrompter;
pub use table::{print_rows, write_rows, TableMode};
