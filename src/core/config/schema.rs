//! core::config::schema
//!
//! Defaults file schema.
//!
//! Located at (in order of precedence):
//! 1. `$GH_TEMPLATE_CONFIG` if set
//! 2. `<config dir>/gh-template/config.toml` (`$XDG_CONFIG_HOME` on Linux)
//!
//! Values here are the lowest layer. Command-line flags replace `language`
//! and `delims`, and add to `exclude`.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Defaults applied before command-line flags.
///
/// # Example
///
/// ```toml
/// language = "en-GB"
/// exclude = ["docs/generated", "vendor"]
/// delims = ["<%", "%>"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    /// BCP-47 language for locale-aware template functions
    pub language: Option<String>,

    /// Paths to exclude, compared case-insensitively
    pub exclude: Vec<String>,

    /// Left and right expression delimiters
    pub delims: Option<Vec<String>>,
}

impl Defaults {
    /// Validate shape-level constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDelimiterPair` if `delims` does not hold
    /// exactly two entries. Language validity is checked during resolution.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(delims) = &self.delims {
            if delims.len() != 2 {
                return Err(ConfigError::InvalidDelimiterPair);
            }
        }
        Ok(())
    }
}
