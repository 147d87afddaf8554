//! gh-template - list, clone, and format template repositories
//!
//! A GitHub CLI extension (`gh template`) that discovers template
//! repositories, creates new repositories from them, and applies parameters
//! such as the git identity, repository coordinates, and user-supplied
//! values to the cloned tree.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Catalog aggregation and the clone/apply pipeline
//! - [`core`] - Domain types, parameters, and configuration
//! - [`git`] - Single interface for all Git operations
//! - [`forge`] - GitHub GraphQL queries and `gh repo create`
//! - [`auth`] - Token discovery
//! - [`render`] - Template rendering of a working tree
//! - [`ui`] - Table output
//!
//! # Invariants
//!
//! 1. Flags are validated before any network or filesystem access
//! 2. User parameters always override derived ones
//! 3. The process working directory is never changed

pub mod auth;
pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod git;
pub mod render;
pub mod ui;
