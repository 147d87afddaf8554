//! forge::factory
//!
//! Forge selection and creation.
//!
//! # Design
//!
//! Commands use `create_forge()` instead of directly importing specific
//! forge implementations. Any host is treated as GitHub or GitHub
//! Enterprise Server; the host only decides the GraphQL endpoint and which
//! token variables apply.
//!
//! # Example
//!
//! ```
//! use gh_template::auth::StaticTokenProvider;
//! use gh_template::forge::{create_forge, Forge};
//! use std::sync::Arc;
//!
//! let forge = create_forge(Arc::new(StaticTokenProvider::new("ghe.example.com", "t")));
//! assert_eq!(forge.name(), "github");
//! assert_eq!(forge.host(), "ghe.example.com");
//! ```

use std::sync::Arc;

use super::github::GitHubForge;
use super::traits::Forge;
use crate::auth::{GhTokenProvider, TokenProvider};

/// Token provider for `host` backed by the environment and `gh`.
pub fn create_token_provider(host: &str) -> Arc<dyn TokenProvider> {
    Arc::new(GhTokenProvider::new(host))
}

/// Create a forge for the provider's host.
pub fn create_forge(provider: Arc<dyn TokenProvider>) -> Box<dyn Forge> {
    tracing::debug!(host = provider.host(), "creating GitHub forge");
    Box::new(GitHubForge::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_provider_uses_host() {
        let provider = create_token_provider("ghe.example.com");
        assert_eq!(provider.host(), "ghe.example.com");
    }

    #[test]
    fn forge_uses_provider_host() {
        let forge = create_forge(create_token_provider("github.com"));
        assert_eq!(forge.name(), "github");
        assert_eq!(forge.host(), "github.com");
    }
}
