//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`RepoRef`] - Repository coordinates (host, owner, name)
//! - [`LanguageTag`] - Validated BCP-47 language tag
//! - [`Delimiters`] - Template expression delimiter pair
//! - [`GitIdentity`] - Configured git user name and email
//! - [`Fact`] - Best-effort value that may be absent
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use gh_template::core::types::{LanguageTag, RepoRef};
//!
//! let repo = RepoRef::parse("heaths/gh-template", "github.com").unwrap();
//! assert_eq!(repo.full_name(), "heaths/gh-template");
//!
//! let tag = LanguageTag::parse("en-us").unwrap();
//! assert_eq!(tag.as_str(), "en-US");
//!
//! assert!(RepoRef::parse("no-slash", "github.com").is_err());
//! assert!(LanguageTag::parse("not a tag").is_err());
//! ```

use std::fmt;

use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid repository '{0}': expected [HOST/]OWNER/REPO")]
    InvalidRepo(String),

    #[error("invalid language tag '{tag}': {reason}")]
    InvalidLanguageTag { tag: String, reason: String },

    #[error("invalid parameter '{0}': expected name=value")]
    InvalidParam(String),
}

/// Repository coordinates on a forge.
///
/// # Example
///
/// ```
/// use gh_template::core::types::RepoRef;
///
/// let repo = RepoRef::parse("github.example.com/octo/app", "github.com").unwrap();
/// assert_eq!(repo.host, "github.example.com");
/// assert_eq!(repo.owner, "octo");
/// assert_eq!(repo.name, "app");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    /// Forge host, e.g. `github.com`
    pub host: String,
    /// Owning user or organization
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoRef {
    /// Create a repository reference from its parts.
    pub fn new(
        host: impl Into<String>,
        owner: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `[HOST/]OWNER/REPO`, using `default_host` when no host is given.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRepo` for anything other than two or three
    /// non-empty, slash-separated segments.
    pub fn parse(value: &str, default_host: &str) -> Result<Self, TypeError> {
        let invalid = || TypeError::InvalidRepo(value.to_string());
        let parts: Vec<&str> = value.trim().split('/').collect();
        if parts.iter().any(|p| p.is_empty() || p.contains(char::is_whitespace)) {
            return Err(invalid());
        }

        match parts.as_slice() {
            [owner, name] => Ok(Self::new(default_host, *owner, *name)),
            [host, owner, name] => Ok(Self::new(*host, *owner, *name)),
            _ => Err(invalid()),
        }
    }

    /// The `owner/name` form used by the forge and for display.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner, self.name)
    }
}

/// A BCP-47 language tag, validated against the IANA subtag registry and
/// kept in canonical casing.
///
/// Accepts `_` as a subtag separator and normalizes it to `-`. Casing is
/// canonicalized: language lowercase, script titlecase, region uppercase.
///
/// # Example
///
/// ```
/// use gh_template::core::types::LanguageTag;
///
/// assert_eq!(LanguageTag::parse("zh_hant_tw").unwrap().as_str(), "zh-Hant-TW");
/// assert_eq!(LanguageTag::parse("de-CH-1996").unwrap().as_str(), "de-CH-1996");
/// assert!(LanguageTag::parse("").is_err());
/// assert!(LanguageTag::parse("en--US").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Parse, validate and canonicalize a language tag.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidLanguageTag` if the tag is not well-formed
    /// or uses subtags the registry does not define.
    pub fn parse(tag: &str) -> Result<Self, TypeError> {
        let invalid = |reason: String| TypeError::InvalidLanguageTag {
            tag: tag.to_string(),
            reason,
        };

        let normalized = tag.trim().replace('_', "-");
        let parsed = language_tags::LanguageTag::parse(&normalized)
            .map_err(|e| invalid(e.to_string()))?;
        parsed.validate().map_err(|e| invalid(e.to_string()))?;

        Ok(Self(canonical_case(parsed.as_str())))
    }

    /// Get the canonical tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for LanguageTag {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// RFC 5646 casing: subtags after the language and before the first
/// singleton are titlecased when 4 letters and uppercased when 2 letters.
fn canonical_case(tag: &str) -> String {
    let mut extension = false;
    tag.split('-')
        .enumerate()
        .map(|(i, subtag)| {
            extension |= subtag.len() == 1;
            let alpha = subtag.chars().all(|c| c.is_ascii_alphabetic());
            match subtag.len() {
                2 if i > 0 && alpha && !extension => subtag.to_ascii_uppercase(),
                4 if i > 0 && alpha && !extension => {
                    let mut script = subtag.to_ascii_lowercase();
                    script[..1].make_ascii_uppercase();
                    script
                }
                _ => subtag.to_ascii_lowercase(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Left and right delimiters that open and close template expressions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delimiters {
    left: String,
    right: String,
}

impl Delimiters {
    /// Default left delimiter.
    pub const DEFAULT_LEFT: &'static str = "{{";
    /// Default right delimiter.
    pub const DEFAULT_RIGHT: &'static str = "}}";

    /// Create a delimiter pair. Both sides must already be validated.
    pub(crate) fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    /// Whether this is the `{{`/`}}` pair.
    pub fn is_default(&self) -> bool {
        self.left == Self::DEFAULT_LEFT && self.right == Self::DEFAULT_RIGHT
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEFT, Self::DEFAULT_RIGHT)
    }
}

/// Configured git user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

/// A best-effort input: either present, or absent with a reason.
///
/// Absence is never an error. Callers log the reason and move on.
///
/// # Example
///
/// ```
/// use gh_template::core::types::Fact;
///
/// let found: Fact<u32> = Fact::from_result(Ok::<_, String>(7));
/// assert_eq!(found, Fact::Present(7));
///
/// let missing: Fact<u32> = Fact::from_result(Err("user.name not set"));
/// assert_eq!(missing.reason(), Some("user.name not set"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact<T> {
    Present(T),
    Absent(String),
}

impl<T> Fact<T> {
    /// Convert a fallible lookup, keeping the error text as the reason.
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Fact::Present(value),
            Err(err) => Fact::Absent(err.to_string()),
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Fact::Present(_) => None,
            Fact::Absent(reason) => Some(reason),
        }
    }
}
