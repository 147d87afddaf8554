//! render
//!
//! Rendering engine boundary.
//!
//! # Architecture
//!
//! The orchestrator hands a working tree root, the assembled parameters, and
//! the run configuration to a [`Renderer`]. It does not know how templates
//! are found or what expression language they use.
//!
//! # Modules
//!
//! - [`engine`]: [`TemplateRenderer`], a minijinja-backed renderer that
//!   rewrites matching files in place
//! - [`prompt`]: [`Prompter`], the seam for asking the user for parameters

pub mod engine;
pub mod prompt;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::config::RunConfiguration;
use crate::core::params::ParameterStore;

pub use engine::TemplateRenderer;
pub use prompt::Prompter;

/// Errors from rendering a working tree.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to walk '{path}': {message}")]
    Walk { path: PathBuf, message: String },

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to render '{path}': {source}")]
    Template {
        path: PathBuf,
        source: minijinja::Error,
    },

    #[error("invalid template syntax: {0}")]
    Syntax(String),
}

/// What a render pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Files visited after exclusions
    pub examined: usize,
    /// Files rewritten, relative to the root
    pub rendered: Vec<PathBuf>,
    /// Files containing expressions whose output matched their input
    pub unchanged: Vec<PathBuf>,
    /// Files skipped as binary or non-UTF-8
    pub skipped_binary: usize,
}

/// Applies parameters to a working tree.
pub trait Renderer {
    /// Render every eligible file under `root`.
    ///
    /// # Errors
    ///
    /// Returns the first error; files already rewritten stay rewritten.
    fn apply(
        &self,
        root: &Path,
        params: &ParameterStore,
        config: &RunConfiguration,
    ) -> Result<RenderReport, RenderError>;
}
