//! engine::clone_apply
//!
//! Creates a repository from a template and applies parameters to it.
//!
//! # Lifecycle
//!
//! ```text
//! Created -> RepositoryCreated -> DirectoryChanged -> ContextResolved
//!         -> ParametersAssembled -> Applied
//! ```
//!
//! Any failure stops the pipeline; no later step runs. A repository created
//! on the forge is never deleted after a later failure.
//!
//! # Working Directory
//!
//! The process working directory is never changed. The clone location is
//! resolved once into a [`RepoRoot`] and passed to every later step.
//!
//! # Parameters
//!
//! Parameters are assembled in a fixed order:
//! 1. `git.name`, `git.email` from the local identity, if configured
//! 2. `github.host`, `github.owner`, `github.repo`, if a repository is known
//! 3. User parameters, which override both

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::config::RunConfiguration;
use crate::core::params::ParameterStore;
use crate::core::types::{Fact, GitIdentity, RepoRef};
use crate::forge::{CreateRepoRequest, Forge, ForgeError};
use crate::git::{Git, GitError};
use crate::render::{RenderError, RenderReport, Renderer};

/// Steps of the clone pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClonePhase {
    Created,
    RepositoryCreated,
    DirectoryChanged,
    ContextResolved,
    ParametersAssembled,
    Applied,
    Failed,
}

impl fmt::Display for ClonePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClonePhase::Created => "created",
            ClonePhase::RepositoryCreated => "repository-created",
            ClonePhase::DirectoryChanged => "directory-changed",
            ClonePhase::ContextResolved => "context-resolved",
            ClonePhase::ParametersAssembled => "parameters-assembled",
            ClonePhase::Applied => "applied",
            ClonePhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Errors from the clone and apply pipeline.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("failed to create repository {name}")]
    CreateRepository {
        name: String,
        #[source]
        source: ForgeError,
    },

    #[error("failed to change directory to {}", path.display())]
    EnterDirectory { path: PathBuf },

    #[error("failed to get repository information")]
    RepositoryContext(#[source] GitError),

    #[error("failed to apply parameters")]
    Render(#[from] RenderError),
}

impl OrchestratorError {
    /// The last step that completed before this error.
    pub fn completed_phase(&self) -> ClonePhase {
        match self {
            OrchestratorError::CreateRepository { .. } => ClonePhase::Created,
            OrchestratorError::EnterDirectory { .. } => ClonePhase::RepositoryCreated,
            OrchestratorError::RepositoryContext(_) => ClonePhase::DirectoryChanged,
            OrchestratorError::Render(_) => ClonePhase::ParametersAssembled,
        }
    }
}

/// Root of a local working tree, checked to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRoot(PathBuf);

impl RepoRoot {
    /// Resolve `path` to a working tree root.
    ///
    /// # Errors
    ///
    /// Returns `EnterDirectory` unless `path` is an existing directory.
    pub fn enter(path: impl Into<PathBuf>) -> Result<Self, OrchestratorError> {
        let path = path.into();
        if !path.is_dir() {
            return Err(OrchestratorError::EnterDirectory { path });
        }
        Ok(Self(path))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Local facts the orchestrator reads from git.
pub trait LocalRepository {
    /// The configured user identity.
    fn identity(&self) -> Result<GitIdentity, GitError>;

    /// The repository a working tree belongs to.
    fn repository(&self, root: &Path) -> Result<RepoRef, GitError>;
}

/// [`LocalRepository`] backed by git configuration and remotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitLocalRepository;

impl LocalRepository for GitLocalRepository {
    fn identity(&self) -> Result<GitIdentity, GitError> {
        Git::user_identity()
    }

    fn repository(&self, root: &Path) -> Result<RepoRef, GitError> {
        Git::open(root)?.current_repository()
    }
}

/// Result of a successful apply.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub root: PathBuf,
    pub repository: Option<RepoRef>,
    pub parameters: ParameterStore,
    pub report: RenderReport,
    pub phase: ClonePhase,
}

/// Runs the clone and apply pipelines against injected collaborators.
pub struct Orchestrator<'a> {
    forge: &'a dyn Forge,
    local: &'a dyn LocalRepository,
    renderer: &'a dyn Renderer,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        forge: &'a dyn Forge,
        local: &'a dyn LocalRepository,
        renderer: &'a dyn Renderer,
    ) -> Self {
        Self {
            forge,
            local,
            renderer,
        }
    }

    /// Create a repository from a template, clone it, and apply parameters.
    ///
    /// # Errors
    ///
    /// Returns the first failing step. Nothing after a failed step runs.
    pub async fn clone_and_apply(
        &self,
        request: &CreateRepoRequest,
        config: &RunConfiguration,
        user_params: &[(String, String)],
    ) -> Result<ApplyOutcome, OrchestratorError> {
        self.run_clone(request, config, user_params)
            .await
            .inspect_err(|e| {
                tracing::debug!(
                    phase = %ClonePhase::Failed,
                    completed = %e.completed_phase(),
                    error = %e,
                    "clone stopped"
                );
            })
    }

    async fn run_clone(
        &self,
        request: &CreateRepoRequest,
        config: &RunConfiguration,
        user_params: &[(String, String)],
    ) -> Result<ApplyOutcome, OrchestratorError> {
        let mut phase = ClonePhase::Created;
        tracing::debug!(name = %request.name, template = %request.template, %phase, "cloning");

        let clone_dir = self
            .forge
            .create_repository(request)
            .await
            .map_err(|source| OrchestratorError::CreateRepository {
                name: request.name.clone(),
                source,
            })?;
        phase = ClonePhase::RepositoryCreated;
        tracing::debug!(path = %clone_dir.display(), %phase, "repository created");

        let root = RepoRoot::enter(clone_dir)?;
        phase = ClonePhase::DirectoryChanged;
        tracing::debug!(path = %root.path().display(), %phase, "entered clone");

        let repository = self
            .local
            .repository(root.path())
            .map_err(OrchestratorError::RepositoryContext)?;
        phase = ClonePhase::ContextResolved;
        tracing::debug!(repository = %repository, %phase, "resolved repository");

        apply(self.local, self.renderer, &root, Some(&repository), config, user_params)
    }
}

/// Assemble parameters and render an existing working tree.
///
/// # Errors
///
/// Returns `Render` if the rendering engine fails.
pub fn apply(
    local: &dyn LocalRepository,
    renderer: &dyn Renderer,
    root: &RepoRoot,
    repository: Option<&RepoRef>,
    config: &RunConfiguration,
    user_params: &[(String, String)],
) -> Result<ApplyOutcome, OrchestratorError> {
    let parameters = assemble_parameters(local, repository, user_params);
    tracing::debug!(
        count = parameters.len(),
        phase = %ClonePhase::ParametersAssembled,
        "parameters assembled"
    );

    let report = renderer.apply(root.path(), &parameters, config)?;
    tracing::debug!(
        rendered = report.rendered.len(),
        phase = %ClonePhase::Applied,
        "parameters applied"
    );

    Ok(ApplyOutcome {
        root: root.path().to_path_buf(),
        repository: repository.cloned(),
        parameters,
        report,
        phase: ClonePhase::Applied,
    })
}

/// Build the parameter store: identity, then repository, then user values.
pub fn assemble_parameters(
    local: &dyn LocalRepository,
    repository: Option<&RepoRef>,
    user_params: &[(String, String)],
) -> ParameterStore {
    let mut params = ParameterStore::new();

    match Fact::from_result(local.identity()) {
        Fact::Present(identity) => params.seed_identity(&identity),
        Fact::Absent(reason) => tracing::debug!(%reason, "git identity unavailable"),
    }

    if let Some(repository) = repository {
        params.seed_repository(repository);
    }

    params.merge(user_params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    params
}
