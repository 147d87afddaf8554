//! auth - token discovery
//!
//! Finds an existing token for a forge host. Nothing here creates, stores,
//! or refreshes tokens; users authenticate with `gh auth login`.
//!
//! # Components
//!
//! - [`TokenProvider`] - Trait for providing bearer tokens to forge adapters
//! - [`GhTokenProvider`] - Environment variables, then `gh auth token`
//! - [`StaticTokenProvider`] - Fixed token, for tests
//!
//! # Security
//!
//! Tokens never appear in logs, error messages, or debug output. All
//! providers implement custom Debug to redact token values.
//!
//! # Example
//!
//! ```ignore
//! use gh_template::auth::{GhTokenProvider, TokenProvider};
//!
//! let provider = GhTokenProvider::new("github.com");
//! let token = provider.bearer_token().await?;
//! ```

mod errors;
mod provider;

pub use errors::AuthError;
pub use provider::{
    default_host, default_host_from, token_from_env, GhTokenProvider, StaticTokenProvider,
    ENTERPRISE_TOKEN_VARS, GITHUB_COM, GITHUB_TOKEN_VARS,
};

/// Trait for providing bearer tokens to forge adapters.
///
/// # Implementation Notes
///
/// Implementors must never log or expose token values.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a bearer token for [`host`](Self::host).
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotAuthenticated`] if no token exists
    /// - [`AuthError::GhUnavailable`] if `gh` could not be run
    async fn bearer_token(&self) -> Result<String, AuthError>;

    /// Get the host this provider authenticates for.
    fn host(&self) -> &str;
}

/// Fail early unless a token exists for the provider's host.
///
/// # Errors
///
/// Returns the provider's error, which names the host and suggests
/// `gh auth login`.
pub async fn ensure_authenticated(provider: &dyn TokenProvider) -> Result<(), AuthError> {
    provider.bearer_token().await.map(|_| ())
}
