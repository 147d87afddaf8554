//! cli::commands::apply
//!
//! Apply template parameters to the working tree.
//!
//! # Design
//!
//! Renders the current directory in place. The repository context is
//! optional: without a remote or `--repo`, the `github.*` variables are
//! simply absent. No token is required.

use anyhow::Result;

use super::{renderer, run_configuration};
use crate::cli::args::ApplyArgs;
use crate::engine::{self, Context, GitLocalRepository, RepoRoot};

/// Run the apply command.
pub fn apply(ctx: &Context, args: &ApplyArgs) -> Result<()> {
    let config = run_configuration(args, ctx.verbose)?;
    let repository = ctx.optional_repository()?;

    let root = RepoRoot::enter(ctx.working_dir())?;
    let outcome = engine::apply(
        &GitLocalRepository,
        &renderer(),
        &root,
        repository.as_ref(),
        &config,
        &args.params,
    )?;

    for path in &outcome.report.rendered {
        tracing::info!(path = %path.display(), "formatted");
    }
    tracing::debug!(
        examined = outcome.report.examined,
        rendered = outcome.report.rendered.len(),
        "apply complete"
    );
    Ok(())
}
