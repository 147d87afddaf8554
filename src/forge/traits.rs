//! forge::traits
//!
//! Forge trait definition for interacting with remote hosting services.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O
//! or child processes. Callers await one call at a time; nothing here
//! retries.
//!
//! # Example
//!
//! ```ignore
//! use gh_template::forge::{CatalogSource, Forge, ForgeError};
//!
//! async fn first_page(forge: &dyn Forge) -> Result<(), ForgeError> {
//!     let page = forge
//!         .repositories(&CatalogSource::Owner("octo".into()), None)
//!         .await?;
//!     for record in page.nodes {
//!         println!("{}", record.key());
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::config::RepoOptions;

/// Repositories requested per listing query.
pub const PAGE_SIZE: u32 = 50;

/// Errors from forge operations.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required: {0}")]
    AuthRequired(String),

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// An external command exited unsuccessfully.
    #[error("`{command}` failed: {stderr}")]
    CommandFailed {
        /// Command line that was run
        command: String,
        /// Diagnostic output from the command
        stderr: String,
    },
}

/// Where to list repositories from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Repositories of a user or organization.
    Owner(String),
    /// Repositories the authenticated user has starred.
    Starred,
}

/// A repository as reported by a listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    /// Owner login
    pub owner: String,
    /// Repository name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Whether the repository is marked as a template
    pub is_template: bool,
}

impl RepositoryRecord {
    /// The `owner/name` key, case preserved.
    pub fn key(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Pagination state after one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    /// Cursor to pass as `after` for the next page
    pub end_cursor: Option<String>,
    /// Whether another page exists
    pub has_next_page: bool,
}

/// One page of repositories.
#[derive(Debug, Clone, Default)]
pub struct RepositoryPage {
    pub nodes: Vec<RepositoryRecord>,
    pub cursor: PageCursor,
}

/// Request to create a repository from a template and clone it locally.
#[derive(Debug, Clone)]
pub struct CreateRepoRequest {
    /// `NAME` or `OWNER/NAME` of the new repository
    pub name: String,
    /// `OWNER/REPO` of the template
    pub template: String,
    /// Validated creation options
    pub options: RepoOptions,
    /// Directory the clone is created in
    pub workdir: PathBuf,
}

impl CreateRepoRequest {
    /// Directory the clone lands in: the repository part of `name` under `workdir`.
    pub fn clone_dir(&self) -> PathBuf {
        let leaf = self.name.rsplit('/').next().unwrap_or(&self.name);
        self.workdir.join(leaf)
    }
}

/// The Forge trait for interacting with remote hosting services.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Callers should handle:
/// - `AuthRequired` / `AuthFailed`: Tell the user to authenticate
/// - `NotFound`: Owner or repository doesn't exist
/// - `ApiError`: Display error message to user
/// - `CommandFailed`: Display the command's diagnostic output
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Host this forge talks to (e.g., "github.com").
    fn host(&self) -> &str;

    /// Fetch one page of repositories from `source`.
    ///
    /// # Arguments
    ///
    /// * `source` - Owner or starred listing
    /// * `after` - Cursor from the previous page, `None` for the first page
    ///
    /// # Errors
    ///
    /// - `NotFound` if the owner doesn't exist
    /// - `ApiError` if the query is rejected
    async fn repositories(
        &self,
        source: &CatalogSource,
        after: Option<&str>,
    ) -> Result<RepositoryPage, ForgeError>;

    /// Create a repository from a template and clone it.
    ///
    /// # Returns
    ///
    /// The path of the local clone.
    ///
    /// # Errors
    ///
    /// - `CommandFailed` with the tool's diagnostic output
    async fn create_repository(&self, request: &CreateRepoRequest)
        -> Result<PathBuf, ForgeError>;
}
