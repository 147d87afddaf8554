//! engine
//!
//! Orchestrates listing and clone/apply pipelines.
//!
//! # Architecture
//!
//! The engine coordinates the collaborators behind each command:
//!
//! 1. **Catalog**: page through forge queries and merge template repositories
//! 2. **Clone/apply**: create a repository, resolve its context, assemble
//!    parameters, and hand off to the rendering engine
//!
//! Commands build their collaborators (forge, local git facts, renderer) and
//! pass them in. The engine never reads flags or prints.
//!
//! # Invariants
//!
//! - Configuration is validated before any engine call
//! - Forge calls are awaited one at a time; no retries
//! - A failed step stops the pipeline; nothing is rolled back
//!
//! # Example
//!
//! ```ignore
//! use gh_template::engine::catalog;
//!
//! let catalog = catalog::collect(forge.as_ref(), "octo", true).await?;
//! for (key, description) in catalog.rows() {
//!     println!("{key}\t{description}");
//! }
//! ```

pub mod catalog;
pub mod clone_apply;

pub use catalog::{collect, Catalog};
pub use clone_apply::{
    apply, assemble_parameters, ApplyOutcome, ClonePhase, GitLocalRepository, LocalRepository,
    Orchestrator, OrchestratorError, RepoRoot,
};

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::auth::default_host;
use crate::core::types::RepoRef;
use crate::git::Git;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Directory commands operate in.
    pub cwd: PathBuf,
    /// `[HOST/]OWNER/REPO` from `--repo`.
    pub repo: Option<String>,
    /// Debug logging enabled.
    pub verbose: bool,
}

impl Context {
    /// Context for the process's current directory.
    pub fn current(repo: Option<String>, verbose: bool) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        Ok(Self { cwd, repo, verbose })
    }

    /// The directory commands operate in.
    pub fn working_dir(&self) -> &Path {
        &self.cwd
    }

    /// The repository from `--repo`, else from the working tree's remote.
    ///
    /// # Errors
    ///
    /// Fails if `--repo` is malformed or no repository can be found.
    pub fn repository(&self) -> Result<RepoRef> {
        if let Some(repo) = &self.repo {
            return Ok(RepoRef::parse(repo, &default_host())?);
        }
        let git = Git::open(self.working_dir())?;
        git.current_repository()
            .context("failed to determine repository; use --repo to specify one")
    }

    /// Like [`repository`](Self::repository), but absence is not an error.
    ///
    /// A malformed `--repo` is still an error.
    pub fn optional_repository(&self) -> Result<Option<RepoRef>> {
        if self.repo.is_some() {
            return self.repository().map(Some);
        }
        let found = Git::open(self.working_dir()).and_then(|git| git.current_repository());
        match found {
            Ok(repo) => Ok(Some(repo)),
            Err(e) => {
                tracing::debug!(reason = %e, "no current repository");
                Ok(None)
            }
        }
    }

    /// Host for forge calls: the repository's host, else the default.
    pub fn host(&self, repository: Option<&RepoRef>) -> String {
        repository
            .map(|r| r.host.clone())
            .unwrap_or_else(default_host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_flag_takes_precedence() {
        let ctx = Context {
            repo: Some("ghe.io/octo/app".into()),
            ..Default::default()
        };
        let repo = ctx.repository().unwrap();
        assert_eq!(repo, RepoRef::new("ghe.io", "octo", "app"));
        assert_eq!(ctx.host(Some(&repo)), "ghe.io");
    }

    #[test]
    fn malformed_repo_flag_is_error() {
        let ctx = Context {
            repo: Some("not-a-repo".into()),
            ..Default::default()
        };
        assert!(ctx.repository().is_err());
        assert!(ctx.optional_repository().is_err());
    }

    #[test]
    fn current_uses_process_directory() {
        let ctx = Context::current(Some("octo/app".into()), true).unwrap();
        assert_eq!(ctx.working_dir(), std::env::current_dir().unwrap());
        assert!(ctx.verbose);
    }

    #[test]
    fn outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            cwd: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(ctx.repository().is_err());
        assert_eq!(ctx.optional_repository().unwrap(), None);
    }

    #[test]
    fn repository_from_origin_remote() {
        let dir = tempfile::tempdir().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        repo.remote("origin", "git@github.com:octo/app.git").unwrap();

        let ctx = Context {
            cwd: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert_eq!(
            ctx.repository().unwrap(),
            RepoRef::new("github.com", "octo", "app")
        );
    }
}
