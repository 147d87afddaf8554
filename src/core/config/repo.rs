//! core::config::repo
//!
//! Options for creating a repository from a template.
//!
//! # Example
//!
//! ```
//! use gh_template::core::config::{RepoOptions, Visibility};
//!
//! let options = RepoOptions::builder()
//!     .description("My app")
//!     .private(true)
//!     .build()
//!     .unwrap();
//! assert_eq!(options.visibility, Some(Visibility::Private));
//!
//! let conflict = RepoOptions::builder().private(true).public(true).build();
//! assert!(conflict.is_err());
//! ```

use std::fmt;

use super::ConfigError;

/// Repository visibility. Left to the forge when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Internal,
    Private,
    Public,
}

impl Visibility {
    /// The `gh repo create` flag for this visibility.
    pub fn as_flag(&self) -> &'static str {
        match self {
            Visibility::Internal => "--internal",
            Visibility::Private => "--private",
            Visibility::Public => "--public",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Visibility::Internal => "internal",
            Visibility::Private => "private",
            Visibility::Public => "public",
        };
        f.write_str(name)
    }
}

/// Validated repository creation options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoOptions {
    pub description: Option<String>,
    pub remote: Option<String>,
    pub homepage: Option<String>,
    pub disable_issues: bool,
    pub disable_wiki: bool,
    pub include_all_branches: bool,
    pub visibility: Option<Visibility>,
    pub team: Option<String>,
}

impl RepoOptions {
    pub fn builder() -> RepoOptionsBuilder {
        RepoOptionsBuilder::default()
    }

    /// Command-line arguments for `gh repo create`, after `--clone`.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        let mut push_value = |flag: &str, value: &Option<String>| {
            if let Some(value) = value {
                args.push(flag.to_string());
                args.push(value.clone());
            }
        };
        push_value("--description", &self.description);
        push_value("--remote", &self.remote);
        push_value("--homepage", &self.homepage);

        if self.disable_issues {
            args.push("--disable-issues".to_string());
        }
        if self.disable_wiki {
            args.push("--disable-wiki".to_string());
        }
        if self.include_all_branches {
            args.push("--include-all-branches".to_string());
        }
        if let Some(visibility) = self.visibility {
            args.push(visibility.as_flag().to_string());
        }
        if let Some(team) = &self.team {
            args.push("--team".to_string());
            args.push(team.clone());
        }
        args
    }
}

/// Builder for [`RepoOptions`]. Visibility flags are collected and checked
/// together in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct RepoOptionsBuilder {
    options: RepoOptions,
    internal: bool,
    private: bool,
    public: bool,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    Some(value.into()).filter(|s| !s.is_empty())
}

impl RepoOptionsBuilder {
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.options.description = non_empty(value);
        self
    }

    pub fn remote(mut self, value: impl Into<String>) -> Self {
        self.options.remote = non_empty(value);
        self
    }

    pub fn homepage(mut self, value: impl Into<String>) -> Self {
        self.options.homepage = non_empty(value);
        self
    }

    pub fn team(mut self, value: impl Into<String>) -> Self {
        self.options.team = non_empty(value);
        self
    }

    pub fn disable_issues(mut self, value: bool) -> Self {
        self.options.disable_issues = value;
        self
    }

    pub fn disable_wiki(mut self, value: bool) -> Self {
        self.options.disable_wiki = value;
        self
    }

    pub fn include_all_branches(mut self, value: bool) -> Self {
        self.options.include_all_branches = value;
        self
    }

    pub fn internal(mut self, value: bool) -> Self {
        self.internal = value;
        self
    }

    pub fn private(mut self, value: bool) -> Self {
        self.private = value;
        self
    }

    pub fn public(mut self, value: bool) -> Self {
        self.public = value;
        self
    }

    /// # Errors
    ///
    /// Returns `ConfigError::ConflictingVisibility` if more than one
    /// visibility flag is set.
    pub fn build(self) -> Result<RepoOptions, ConfigError> {
        let selected: Vec<Visibility> = [
            (self.internal, Visibility::Internal),
            (self.private, Visibility::Private),
            (self.public, Visibility::Public),
        ]
        .into_iter()
        .filter_map(|(set, visibility)| set.then_some(visibility))
        .collect();

        if selected.len() > 1 {
            return Err(ConfigError::ConflictingVisibility);
        }

        let mut options = self.options;
        options.visibility = selected.first().copied();
        Ok(options)
    }
}
