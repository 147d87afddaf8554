//! core::config
//!
//! Run configuration and defaults loading.
//!
//! # Overview
//!
//! Every `apply` and `clone` invocation resolves one [`RunConfiguration`]
//! before touching the network or the working tree. It is immutable once
//! built and passed by reference to the renderer.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Built-in defaults (`{{`/`}}`, language `en`)
//! 2. Defaults file
//! 3. CLI flags
//!
//! Exclusions are additive: CLI entries are appended to file entries.
//!
//! # Defaults File Locations
//!
//! Searched in order:
//! 1. `$GH_TEMPLATE_CONFIG` if set
//! 2. `<config dir>/gh-template/config.toml`
//!
//! # Example
//!
//! ```
//! use gh_template::core::config::{ConfigResolver, WORKFLOW_EXCLUSION};
//!
//! let config = ConfigResolver::new()
//!     .exclude(["docs/"])
//!     .language("en-us")
//!     .resolve()
//!     .unwrap();
//!
//! assert_eq!(config.language().as_str(), "en-US");
//! assert_eq!(config.exclusions(), ["docs", WORKFLOW_EXCLUSION]);
//! ```

pub mod repo;
pub mod schema;

pub use repo::{RepoOptions, RepoOptionsBuilder, Visibility};
pub use schema::Defaults;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::{Delimiters, LanguageTag, TypeError};

/// Excluded by default so workflow expressions (`${{ ... }}`) survive rendering.
pub const WORKFLOW_EXCLUSION: &str = ".github/workflows";

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Environment variable overriding the defaults file location.
pub const CONFIG_ENV: &str = "GH_TEMPLATE_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("both left and right delimiters are required")]
    InvalidDelimiterPair,

    #[error("invalid language: {0}")]
    InvalidLocale(#[source] TypeError),

    #[error("only one of --internal, --private, or --public may be specified")]
    ConflictingVisibility,

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Validated settings for one render pass.
///
/// Fields are private; build one with [`ConfigResolver`] or [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    delimiters: Delimiters,
    exclusions: Vec<String>,
    language: LanguageTag,
    verbose: bool,
}

impl RunConfiguration {
    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Normalized exclusions in first-seen order.
    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    pub fn language(&self) -> &LanguageTag {
        &self.language
    }

    /// Whether the logging subscriber was initialized for verbose output.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether `path` (relative, `/`-separated) falls under an exclusion.
    ///
    /// Matching is case-insensitive and by whole path segments.
    pub fn is_excluded(&self, path: &str) -> bool {
        let path = path.trim_start_matches("./").to_lowercase();
        self.exclusions.iter().any(|exclusion| {
            let exclusion = exclusion.to_lowercase();
            path == exclusion
                || path
                    .strip_prefix(&exclusion)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

/// Builder that layers defaults-file values under CLI flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    left: Option<String>,
    right: Option<String>,
    exclusions: Vec<String>,
    language: Option<String>,
    verbose: bool,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the defaults file. Call before applying CLI flags.
    pub fn from_defaults(defaults: &Defaults) -> Self {
        let mut resolver = Self::new();
        if let Some(delims) = &defaults.delims {
            resolver.left = delims.first().cloned();
            resolver.right = delims.get(1).cloned();
        }
        resolver.exclusions = defaults.exclude.clone();
        resolver.language = defaults.language.clone();
        resolver
    }

    /// Replace the delimiter pair if either side is given.
    pub fn delimiters(mut self, left: Option<String>, right: Option<String>) -> Self {
        let left = left.filter(|s| !s.is_empty());
        let right = right.filter(|s| !s.is_empty());
        if left.is_some() || right.is_some() {
            self.left = left;
            self.right = right;
        }
        self
    }

    /// Append exclusions.
    pub fn exclude<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Replace the language tag.
    pub fn language(mut self, tag: impl Into<String>) -> Self {
        self.language = Some(tag.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidDelimiterPair` if only one delimiter is set
    /// - `InvalidLocale` if the language is not a well-formed BCP-47 tag
    pub fn resolve(self) -> Result<RunConfiguration, ConfigError> {
        let mut config = resolve(
            self.left.as_deref(),
            self.right.as_deref(),
            &self.exclusions,
            self.language.as_deref(),
        )?;
        config.verbose = self.verbose;
        Ok(config)
    }
}

/// Resolve a run configuration from raw inputs.
///
/// Empty delimiter strings count as unset. The workflow exclusion is added
/// when the delimiters are unset or equal to the default pair.
///
/// # Errors
///
/// See [`ConfigResolver::resolve`].
pub fn resolve<S: AsRef<str>>(
    left: Option<&str>,
    right: Option<&str>,
    exclusions: &[S],
    language: Option<&str>,
) -> Result<RunConfiguration, ConfigError> {
    let left = left.filter(|s| !s.is_empty());
    let right = right.filter(|s| !s.is_empty());

    let delimiters = match (left, right) {
        (Some(l), Some(r)) => Delimiters::new(l, r),
        (None, None) => Delimiters::default(),
        _ => return Err(ConfigError::InvalidDelimiterPair),
    };

    let language = LanguageTag::parse(language.unwrap_or(DEFAULT_LANGUAGE))
        .map_err(ConfigError::InvalidLocale)?;

    let mut normalized: Vec<String> = Vec::new();
    for raw in exclusions {
        push_unique(&mut normalized, raw.as_ref());
    }
    if delimiters.is_default() {
        push_unique(&mut normalized, WORKFLOW_EXCLUSION);
    }

    Ok(RunConfiguration {
        delimiters,
        exclusions: normalized,
        language,
        verbose: false,
    })
}

fn push_unique(exclusions: &mut Vec<String>, raw: &str) {
    let path = raw.trim().trim_end_matches('/').trim_start_matches("./");
    if path.is_empty() {
        return;
    }
    let lower = path.to_lowercase();
    if !exclusions.iter().any(|e| e.to_lowercase() == lower) {
        exclusions.push(path.to_string());
    }
}

/// Path of the defaults file, if one can be determined.
pub fn defaults_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir().map(|dir| dir.join("gh-template").join("config.toml"))
}

/// Load the defaults file. A missing file yields empty defaults.
///
/// # Errors
///
/// Returns `ReadError` or `ParseError` if the file exists but is unusable.
pub fn load_defaults() -> Result<Defaults, ConfigError> {
    match defaults_path() {
        Some(path) if path.exists() => read_defaults(&path),
        _ => Ok(Defaults::default()),
    }
}

/// Read and validate a defaults file at `path`.
pub fn read_defaults(path: &Path) -> Result<Defaults, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let defaults: Defaults = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    defaults.validate()?;
    Ok(defaults)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    mod delimiters {
        use super::*;

        #[test]
        fn default_pair_adds_workflow_exclusion() {
            let config = resolve(None, None, &NONE, None).unwrap();
            assert!(config.delimiters().is_default());
            assert_eq!(config.exclusions(), [WORKFLOW_EXCLUSION]);
        }

        #[test]
        fn explicit_default_pair_adds_workflow_exclusion() {
            let config = resolve(Some("{{"), Some("}}"), &NONE, None).unwrap();
            assert_eq!(config.exclusions(), [WORKFLOW_EXCLUSION]);
        }

        #[test]
        fn custom_pair_omits_workflow_exclusion() {
            let config = resolve(Some("<<"), Some(">>"), &NONE, None).unwrap();
            assert_eq!(config.delimiters().left(), "<<");
            assert_eq!(config.delimiters().right(), ">>");
            assert!(config.exclusions().is_empty());
        }

        #[test]
        fn custom_pair_keeps_user_listed_workflows() {
            let config =
                resolve(Some("<<"), Some(">>"), &[".github/workflows"], None).unwrap();
            assert_eq!(config.exclusions(), [WORKFLOW_EXCLUSION]);
        }

        #[test]
        fn half_pair_is_invalid() {
            for (l, r) in [(Some("<<"), None), (None, Some(">>")), (Some("<<"), Some(""))] {
                assert!(matches!(
                    resolve(l, r, &NONE, None),
                    Err(ConfigError::InvalidDelimiterPair)
                ));
            }
        }

        #[test]
        fn empty_strings_are_unset() {
            let config = resolve(Some(""), Some(""), &NONE, None).unwrap();
            assert!(config.delimiters().is_default());
        }
    }

    mod exclusions {
        use super::*;

        #[test]
        fn workflow_exclusion_deduplicated_case_insensitively() {
            let config = resolve(None, None, &[".GitHub/Workflows/"], None).unwrap();
            assert_eq!(config.exclusions(), [".GitHub/Workflows"]);
        }

        #[test]
        fn normalized_in_first_seen_order() {
            let config =
                resolve(None, None, &[" docs/ ", "", "Vendor", "vendor", "./src"], None).unwrap();
            assert_eq!(
                config.exclusions(),
                ["docs", "Vendor", "src", WORKFLOW_EXCLUSION]
            );
        }

        #[test]
        fn is_excluded_matches_segments() {
            let config = resolve(None, None, &["docs"], None).unwrap();
            assert!(config.is_excluded("docs"));
            assert!(config.is_excluded("DOCS/readme.md"));
            assert!(config.is_excluded(".github/workflows/ci.yml"));
            assert!(!config.is_excluded("docsite/index.md"));
            assert!(!config.is_excluded(".github/CODEOWNERS"));
        }
    }

    mod language {
        use super::*;

        #[test]
        fn defaults_to_en() {
            let config = resolve(None, None, &NONE, None).unwrap();
            assert_eq!(config.language().as_str(), "en");
        }

        #[test]
        fn invalid_tag() {
            for tag in ["not a tag", "en-a-bb-a-cc"] {
                let err = resolve(None, None, &NONE, Some(tag)).unwrap_err();
                assert!(matches!(err, ConfigError::InvalidLocale(_)), "{tag}");
            }
        }
    }

    mod resolver {
        use super::*;

        #[test]
        fn cli_overrides_defaults_file() {
            let defaults = Defaults {
                language: Some("fr".into()),
                exclude: vec!["vendor".into()],
                delims: Some(vec!["<%".into(), "%>".into()]),
            };

            let config = ConfigResolver::from_defaults(&defaults)
                .delimiters(Some("[[".into()), Some("]]".into()))
                .exclude(["docs"])
                .language("de")
                .verbose(true)
                .resolve()
                .unwrap();

            assert_eq!(config.delimiters().left(), "[[");
            assert_eq!(config.exclusions(), ["vendor", "docs"]);
            assert_eq!(config.language().as_str(), "de");
            assert!(config.verbose());
        }

        #[test]
        fn unset_cli_delimiters_keep_file_values() {
            let defaults = Defaults {
                delims: Some(vec!["<%".into(), "%>".into()]),
                ..Default::default()
            };

            let config = ConfigResolver::from_defaults(&defaults)
                .delimiters(None, None)
                .resolve()
                .unwrap();

            assert_eq!(config.delimiters().left(), "<%");
            assert!(config.exclusions().is_empty());
        }

        #[test]
        fn half_cli_pair_overrides_and_fails() {
            let defaults = Defaults {
                delims: Some(vec!["<%".into(), "%>".into()]),
                ..Default::default()
            };

            let result = ConfigResolver::from_defaults(&defaults)
                .delimiters(Some("[[".into()), None)
                .resolve();

            assert!(matches!(result, Err(ConfigError::InvalidDelimiterPair)));
        }
    }

    mod defaults_file {
        use super::*;
        use std::io::Write;

        #[test]
        fn reads_valid_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "language = \"pt-br\"\nexclude = [\"vendor\"]").unwrap();

            let defaults = read_defaults(file.path()).unwrap();
            assert_eq!(defaults.language.as_deref(), Some("pt-br"));
            assert_eq!(defaults.exclude, vec!["vendor".to_string()]);
        }

        #[test]
        fn malformed_file_is_parse_error() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "exclude = 42").unwrap();

            assert!(matches!(
                read_defaults(file.path()),
                Err(ConfigError::ParseError { .. })
            ));
        }

        #[test]
        fn missing_file_is_read_error() {
            let dir = tempfile::tempdir().unwrap();
            assert!(matches!(
                read_defaults(&dir.path().join("missing.toml")),
                Err(ConfigError::ReadError { .. })
            ));
        }
    }
}
