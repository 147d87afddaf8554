//! auth::errors
//!
//! Token discovery error types.
//!
//! # Example
//!
//! ```
//! use gh_template::auth::AuthError;
//!
//! let err = AuthError::NotAuthenticated("github.com".to_string());
//! assert!(err.to_string().contains("gh auth login"));
//! ```

use thiserror::Error;

/// Errors from token discovery.
///
/// Messages never include token values.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token exists for the specified host.
    #[error("not authenticated for host '{0}': use `gh auth login` to authenticate with required scopes")]
    NotAuthenticated(String),

    /// The `gh` CLI could not be run.
    #[error("failed to run `gh`: {0}")]
    GhUnavailable(String),
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        AuthError::GhUnavailable(err.to_string())
    }
}
