//! core
//!
//! Core domain types and configuration for gh-template.
//!
//! # Modules
//!
//! - [`types`] - Strong types: RepoRef, LanguageTag, Delimiters, Fact
//! - [`params`] - Parameter store fed to the renderer
//! - [`config`] - Run configuration, repository options, defaults file
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Validation happens before any I/O
//! - Nothing here touches the network or the working tree

pub mod config;
pub mod params;
pub mod types;
