//! cli::commands::list
//!
//! List template repositories.
//!
//! # Design
//!
//! The owner comes from `--repo` or the current repository's remote. A token
//! for the owner's host must exist before any query is sent. Owned templates
//! are always listed; starred templates are added with `--starred`.
//!
//! # Example
//!
//! ```bash
//! # Templates owned by the current repository's owner
//! gh template list
//!
//! # Include starred templates
//! gh template list --starred
//! ```

use anyhow::{Context as _, Result};

use super::block_on;
use crate::auth::ensure_authenticated;
use crate::core::types::RepoRef;
use crate::engine::{catalog, Context};
use crate::forge::{create_forge, create_token_provider};
use crate::ui::table;

/// Run the list command.
pub fn list(ctx: &Context, starred: bool) -> Result<()> {
    let repo = ctx.repository()?;
    block_on(list_async(&repo, starred))?
}

async fn list_async(repo: &RepoRef, starred: bool) -> Result<()> {
    let provider = create_token_provider(&repo.host);
    ensure_authenticated(provider.as_ref()).await?;

    let forge = create_forge(provider);
    let catalog = catalog::collect(forge.as_ref(), &repo.owner, starred)
        .await
        .with_context(|| format!("failed to list templates for {}", repo.owner))?;

    tracing::debug!(count = catalog.len(), owner = %repo.owner, starred, "listing templates");
    table::print_rows(&catalog.rows()).context("failed to write output")?;
    Ok(())
}
