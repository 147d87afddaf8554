//! core::params
//!
//! The per-invocation parameter mapping fed to the rendering engine.
//!
//! # Layering
//!
//! Parameters are written in a fixed order by the orchestrator:
//!
//! 1. Identity facts (`git.name`, `git.email`), best-effort
//! 2. Repository facts (`github.host`, `github.owner`, `github.repo`)
//! 3. User-supplied `name=value` pairs, which override anything above
//!
//! The `git.` and `github.` namespaces are reserved for the first two layers.
//! [`ParameterStore::user_defined`] hides them so they are not reported back
//! to the user as if they had set them.

use std::collections::BTreeMap;

use super::types::{GitIdentity, RepoRef, TypeError};

/// Configured git `user.name`.
pub const GIT_NAME: &str = "git.name";
/// Configured git `user.email`.
pub const GIT_EMAIL: &str = "git.email";
/// Forge host, e.g. `github.com`.
pub const GITHUB_HOST: &str = "github.host";
/// Owning user or organization.
pub const GITHUB_OWNER: &str = "github.owner";
/// Repository name.
pub const GITHUB_REPO: &str = "github.repo";

/// Namespaces populated only by the orchestrator.
pub const RESERVED_PREFIXES: [&str; 2] = ["git.", "github."];

/// Built-in variables and their descriptions, for help output.
pub const BUILTIN_VARIABLES: [(&str, &str); 5] = [
    (GIT_NAME, "Configured Git user.name"),
    (GIT_EMAIL, "Configured Git user.email"),
    (GITHUB_HOST, "The host e.g., github.com"),
    (GITHUB_OWNER, "Owning user or organization"),
    (GITHUB_REPO, "Name of the repository"),
];

/// Mapping from parameter name to value.
///
/// Keys are case-sensitive. Iteration is sorted by key so output is
/// reproducible; no operation depends on insertion order.
///
/// # Example
///
/// ```
/// use gh_template::core::params::{ParameterStore, GITHUB_OWNER};
///
/// let mut params = ParameterStore::new();
/// params.set(GITHUB_OWNER, "orig");
/// params.merge([("github.owner", "override"), ("name", "app")]);
///
/// assert_eq!(params.get(GITHUB_OWNER), Some("override"));
/// assert_eq!(params.user_defined().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterStore {
    values: BTreeMap<String, String>,
}

impl ParameterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any existing one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Set a value only if the key is not present yet.
    pub fn set_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Apply caller-supplied values last, overriding existing keys.
    pub fn merge<I, K, V>(&mut self, params: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in params {
            self.set(key, value);
        }
    }

    /// Write `git.name` and `git.email`.
    pub fn seed_identity(&mut self, identity: &GitIdentity) {
        self.set(GIT_NAME, identity.name.as_str());
        self.set(GIT_EMAIL, identity.email.as_str());
    }

    /// Write `github.host`, `github.owner`, and `github.repo`.
    pub fn seed_repository(&mut self, repo: &RepoRef) {
        self.set(GITHUB_HOST, repo.host.as_str());
        self.set(GITHUB_OWNER, repo.owner.as_str());
        self.set(GITHUB_REPO, repo.name.as_str());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All parameters, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parameters outside the reserved namespaces.
    pub fn user_defined(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(key, _)| !is_reserved(key))
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

/// Whether a key belongs to a namespace the orchestrator owns.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

/// Parse a `name=value` pair. Splits on the first `=`; the value may be empty.
///
/// # Example
///
/// ```
/// use gh_template::core::params::parse_param;
///
/// assert_eq!(parse_param("a=b=c").unwrap(), ("a".to_string(), "b=c".to_string()));
/// assert!(parse_param("=x").is_err());
/// assert!(parse_param("novalue").is_err());
/// ```
pub fn parse_param(value: &str) -> Result<(String, String), TypeError> {
    match value.split_once('=') {
        Some((name, val)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), val.to_string()))
        }
        _ => Err(TypeError::InvalidParam(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites() {
        let mut params = ParameterStore::new();
        params.set("name", "a");
        params.set("name", "b");
        assert_eq!(params.get("name"), Some("b"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn set_if_absent_keeps_existing() {
        let mut params = ParameterStore::new();
        params.set_if_absent("name", "a");
        params.set_if_absent("name", "b");
        assert_eq!(params.get("name"), Some("a"));
    }

    #[test]
    fn merge_overrides_derived_values() {
        let mut params = ParameterStore::new();
        params.seed_repository(&RepoRef::new("github.com", "orig", "app"));
        params.merge([("github.owner".to_string(), "override".to_string())]);

        assert_eq!(params.get(GITHUB_OWNER), Some("override"));
        assert_eq!(params.get(GITHUB_REPO), Some("app"));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let mut params = ParameterStore::new();
        params.set("Name", "upper");
        params.set("name", "lower");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn seed_identity_sets_both_keys() {
        let mut params = ParameterStore::new();
        params.seed_identity(&GitIdentity {
            name: "Test User".into(),
            email: "test@example.com".into(),
        });
        assert_eq!(params.get(GIT_NAME), Some("Test User"));
        assert_eq!(params.get(GIT_EMAIL), Some("test@example.com"));
    }

    #[test]
    fn user_defined_hides_reserved_namespaces() {
        let mut params = ParameterStore::new();
        params.seed_repository(&RepoRef::new("github.com", "octo", "app"));
        params.set(GIT_NAME, "Test User");
        params.set("gitignore", "rust");
        params.set("project", "app");

        let user: Vec<_> = params.user_defined().map(|(k, _)| k).collect();
        assert_eq!(user, vec!["gitignore", "project"]);
    }

    #[test]
    fn iteration_is_sorted() {
        let mut params = ParameterStore::new();
        params.set("b", "2");
        params.set("a", "1");
        params.set("C", "3");
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["C", "a", "b"]);
    }

    #[test]
    fn reserved_prefixes() {
        assert!(is_reserved("git.name"));
        assert!(is_reserved("github.owner"));
        assert!(!is_reserved("gitlab.owner"));
        assert!(!is_reserved("git"));
    }

    #[test]
    fn parse_param_values() {
        assert_eq!(
            parse_param("name=value").unwrap(),
            ("name".to_string(), "value".to_string())
        );
        assert_eq!(
            parse_param("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert_eq!(
            parse_param("bad"),
            Err(TypeError::InvalidParam("bad".to_string()))
        );
    }
}
