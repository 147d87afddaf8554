//! auth::provider
//!
//! Token providers backed by the environment and the `gh` CLI.
//!
//! # Discovery Order
//!
//! For `github.com`:
//! 1. `GH_TOKEN`
//! 2. `GITHUB_TOKEN`
//!
//! For any other host:
//! 1. `GH_ENTERPRISE_TOKEN`
//! 2. `GITHUB_ENTERPRISE_TOKEN`
//!
//! Then, for any host, `gh auth token --hostname HOST`.
//!
//! The discovered token is cached for the lifetime of the provider.

use std::sync::RwLock;

use tokio::process::Command;

use super::errors::AuthError;
use super::TokenProvider;

/// Public GitHub host.
pub const GITHUB_COM: &str = "github.com";

/// Environment variables checked for `github.com`, in order.
pub const GITHUB_TOKEN_VARS: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN"];

/// Environment variables checked for other hosts, in order.
pub const ENTERPRISE_TOKEN_VARS: [&str; 2] = ["GH_ENTERPRISE_TOKEN", "GITHUB_ENTERPRISE_TOKEN"];

/// Default host: `$GH_HOST` if set, otherwise `github.com`.
pub fn default_host() -> String {
    default_host_from(|key| std::env::var(key).ok())
}

/// [`default_host`] with an injectable environment lookup.
pub fn default_host_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("GH_HOST")
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| GITHUB_COM.to_string())
}

/// Look up a token for `host` from environment variables.
pub fn token_from_env<F>(host: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let vars: &[&str] = if host.eq_ignore_ascii_case(GITHUB_COM) {
        &GITHUB_TOKEN_VARS
    } else {
        &ENTERPRISE_TOKEN_VARS
    };
    vars.iter()
        .filter_map(|var| lookup(var))
        .find(|token| !token.trim().is_empty())
}

/// Token provider that reads the environment, then asks `gh`.
pub struct GhTokenProvider {
    host: String,
    program: String,
    cache: RwLock<Option<String>>,
}

impl GhTokenProvider {
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_program(host, "gh")
    }

    /// Use a different `gh` executable.
    pub fn with_program(host: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            program: program.into(),
            cache: RwLock::new(None),
        }
    }

    fn cached(&self) -> Option<String> {
        self.cache.read().ok().and_then(|guard| guard.clone())
    }

    fn store(&self, token: &str) {
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(token.to_string());
        }
    }

    async fn token_from_gh(&self) -> Result<Option<String>, AuthError> {
        let output = Command::new(&self.program)
            .args(["auth", "token", "--hostname", self.host.as_str()])
            .output()
            .await?;

        if !output.status.success() {
            tracing::debug!(
                host = %self.host,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "gh auth token reported no token"
            );
            return Ok(None);
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(token).filter(|t| !t.is_empty()))
    }
}

#[async_trait::async_trait]
impl TokenProvider for GhTokenProvider {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        if let Some(token) = self.cached() {
            return Ok(token);
        }

        let token = match token_from_env(&self.host, |key| std::env::var(key).ok()) {
            Some(token) => {
                tracing::debug!(host = %self.host, "using token from environment");
                Some(token)
            }
            None => self.token_from_gh().await?,
        };

        match token {
            Some(token) => {
                self.store(&token);
                Ok(token)
            }
            None => Err(AuthError::NotAuthenticated(self.host.clone())),
        }
    }

    fn host(&self) -> &str {
        &self.host
    }
}

impl std::fmt::Debug for GhTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GhTokenProvider")
            .field("host", &self.host)
            .field("program", &self.program)
            .field("cached", &self.cached().is_some())
            .finish()
    }
}

/// Token provider over a fixed token, for tests and injected credentials.
pub struct StaticTokenProvider {
    host: String,
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: Some(token.into()),
        }
    }

    /// A provider that always reports the host as unauthenticated.
    pub fn unauthenticated(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: None,
        }
    }
}

#[async_trait::async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        self.token
            .clone()
            .ok_or_else(|| AuthError::NotAuthenticated(self.host.clone()))
    }

    fn host(&self) -> &str {
        &self.host
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
