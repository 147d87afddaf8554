//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to Git in gh-template. Only
//! reads happen here: the configured user identity and the repository a
//! working tree belongs to.
//!
//! # Architecture
//!
//! The `Git` struct is the only way to interact with a Git repository.
//! No other module should import `git2` directly.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::NoRemote`]: Repository has no remotes
//! - [`GitError::UnrecognizedRemote`]: Remote URL is not `host/owner/repo`
//! - [`GitError::IdentityNotSet`]: `user.name` or `user.email` missing
//!
//! # Example
//!
//! ```ignore
//! use gh_template::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let repo = git.current_repository()?;
//! println!("{}", repo.full_name());
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{GitIdentity, RepoRef};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Repository has no remotes.
    #[error("no git remotes found")]
    NoRemote,

    /// Remote URL does not name a `host/owner/repo`.
    #[error("unrecognized remote URL: {url}")]
    UnrecognizedRemote {
        /// The remote URL
        url: String,
    },

    /// A required identity key is not configured.
    #[error("{key} not set")]
    IdentityNotSet {
        /// The missing config key
        key: &'static str,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// Read-only handle to a repository.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// so `path` can be any directory within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Working directory root.
    pub fn work_dir(&self) -> Result<&Path, GitError> {
        self.repo.workdir().ok_or(GitError::BareRepo)
    }

    /// Get the URL for a remote.
    ///
    /// Returns `None` if the remote doesn't exist.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the default remote name.
    ///
    /// Prefers `origin`, otherwise the first remote found, or `None` if no
    /// remotes exist.
    pub fn default_remote(&self) -> Result<Option<String>, GitError> {
        let remotes = self.repo.remotes()?;

        if remotes.iter().flatten().any(|name| name == "origin") {
            return Ok(Some("origin".to_string()));
        }

        Ok(remotes.iter().flatten().next().map(String::from))
    }

    /// The repository this working tree belongs to, from its default remote.
    ///
    /// # Errors
    ///
    /// - [`GitError::NoRemote`] if there are no remotes
    /// - [`GitError::UnrecognizedRemote`] if the URL cannot be parsed
    pub fn current_repository(&self) -> Result<RepoRef, GitError> {
        let remote = self.default_remote()?.ok_or(GitError::NoRemote)?;
        let url = self.remote_url(&remote)?.ok_or(GitError::NoRemote)?;
        parse_remote_url(&url).ok_or(GitError::UnrecognizedRemote { url })
    }

    /// The identity from global git configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::IdentityNotSet`] if either key is missing or
    /// empty. Callers treat this as non-fatal.
    pub fn user_identity() -> Result<GitIdentity, GitError> {
        let config = git2::Config::open_default()?;
        identity_from_config(&config)
    }
}

/// Read `user.name` and `user.email` from a git configuration.
pub(crate) fn identity_from_config(config: &git2::Config) -> Result<GitIdentity, GitError> {
    let read = |key: &'static str| -> Result<String, GitError> {
        match config.get_string(key) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            Ok(_) => Err(GitError::IdentityNotSet { key }),
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                Err(GitError::IdentityNotSet { key })
            }
            Err(e) => Err(e.into()),
        }
    };

    Ok(GitIdentity {
        name: read("user.name")?,
        email: read("user.email")?,
    })
}

/// Parse a remote URL into repository coordinates.
///
/// Handles HTTPS, scp-like SSH, and `ssh://` URLs on any host:
/// - `https://github.com/owner/repo.git`
/// - `git@github.example.com:owner/repo.git`
/// - `ssh://git@github.com:22/owner/repo`
///
/// `ssh.github.com` is normalized to `github.com`.
///
/// # Example
///
/// ```
/// use gh_template::git::parse_remote_url;
///
/// let repo = parse_remote_url("git@ghe.io:octo/app.git").unwrap();
/// assert_eq!(repo.to_string(), "ghe.io/octo/app");
///
/// assert!(parse_remote_url("/local/path/repo.git").is_none());
/// ```
pub fn parse_remote_url(url: &str) -> Option<RepoRef> {
    let url = url.trim();

    let (authority, path) = if let Some((scheme, rest)) = url.split_once("://") {
        if !matches!(scheme, "https" | "http" | "ssh" | "git" | "git+ssh") {
            return None;
        }
        rest.split_once('/')?
    } else {
        // scp-like: [user@]host:owner/repo
        let (authority, path) = url.split_once(':')?;
        if authority.is_empty() || authority.contains('/') {
            return None;
        }
        (authority, path)
    };

    let host = authority.rsplit('@').next()?;
    let host = host.split(':').next()?.to_ascii_lowercase();
    if host.is_empty() {
        return None;
    }
    let host = if host == "ssh.github.com" {
        "github.com".to_string()
    } else {
        host
    };

    let (owner, name) = parse_owner_repo(path)?;
    Some(RepoRef::new(host, owner, name))
}

/// Parse "owner/repo.git" or "owner/repo" into (owner, repo).
fn parse_owner_repo(path: &str) -> Option<(String, String)> {
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repo) = path.split_once('/')?;

    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }

    Some((owner.to_string(), repo.to_string()))
}
