//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the engine to execute the command
//! 3. Formats and displays output
//!
//! Configuration is resolved before any network or filesystem access, so
//! invalid flags fail fast.
//!
//! # Async Commands
//!
//! `list` and `clone` talk to the forge. Their handlers build a
//! current-thread tokio runtime and block on a single async pipeline.

mod apply;
mod clone;
mod completion;
mod list;

// Re-export command functions for testing and direct invocation
pub use apply::apply;
pub use clone::clone;
pub use completion::completion;
pub use list::list;

use std::future::Future;

use anyhow::{Context as _, Result};

use crate::cli::args::{ApplyArgs, Command};
use crate::core::config::{load_defaults, ConfigResolver, RunConfiguration};
use crate::engine::Context;
use crate::render::TemplateRenderer;
use crate::ui::TerminalPrompter;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::List { starred } => list::list(ctx, starred),
        Command::Apply(args) => apply::apply(ctx, &args),
        Command::Clone(args) => clone::clone(ctx, &args),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Resolve the run configuration from the defaults file and `args`.
pub(crate) fn run_configuration(args: &ApplyArgs, verbose: bool) -> Result<RunConfiguration> {
    let (left, right) = args.delimiter_pair()?;
    let defaults = load_defaults()?;

    let mut resolver = ConfigResolver::from_defaults(&defaults)
        .delimiters(left, right)
        .exclude(args.exclude.iter().cloned())
        .verbose(verbose);
    if let Some(language) = &args.language {
        resolver = resolver.language(language.clone());
    }

    let config = resolver.resolve()?;
    tracing::debug!(
        left = config.delimiters().left(),
        right = config.delimiters().right(),
        exclusions = ?config.exclusions(),
        language = %config.language(),
        "resolved configuration"
    );
    Ok(config)
}

/// Renderer that asks for unset parameters when run from a terminal.
pub(crate) fn renderer() -> TemplateRenderer {
    match TerminalPrompter::attended() {
        Some(prompter) => TemplateRenderer::new().with_prompter(prompter),
        None => TemplateRenderer::new(),
    }
}

/// Run `future` to completion on a current-thread runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(rt.block_on(future))
}
