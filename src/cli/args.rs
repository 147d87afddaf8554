//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--repo` / `-R <[HOST/]OWNER/REPO>`: Select another repository
//! - `--verbose` / `-v`: Enable debug logging

use clap::{Args, Parser, Subcommand};

use crate::core::config::ConfigError;
use crate::core::params::{parse_param, BUILTIN_VARIABLES};
use crate::render::engine::BUILTIN_FUNCTIONS;

/// Lists, clones, and formats template repositories
#[derive(Parser, Debug)]
#[command(name = "gh-template", bin_name = "gh template")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Select another repository using the [HOST/]OWNER/REPO format
    #[arg(short = 'R', long, global = true, value_name = "[HOST/]OWNER/REPO")]
    pub repo: Option<String>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lists template repositories
    #[command(
        name = "list",
        long_about = "List repository templates from user or organization accounts, and \
            optionally any template repositories the user has starred.\n\n\
            The owner is taken from --repo, or from the current repository's remote.",
        after_help = "\
EXAMPLES:
    # Templates owned by the current repository's owner
    gh template list

    # Include templates you have starred
    gh template list --starred

    # Templates owned by another organization
    gh template list -R octo-org/any"
    )]
    List {
        /// Include starred repositories
        #[arg(long)]
        starred: bool,
    },

    /// Apply project template parameters
    #[command(
        name = "apply",
        long_about = "Apply parameters to an already cloned repository template. When run \
                      from a terminal, parameters read with param() but not passed to --param \
                      prompt for a value, offering the default if one is given.",
        after_help = template_help()
    )]
    Apply(ApplyArgs),

    /// Clones and formats a template repository
    #[command(
        name = "clone",
        long_about = "Clones a template repository then formats any templates found.",
        after_help = template_help()
    )]
    Clone(CloneArgs),

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    gh-template completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    gh-template completion zsh >> ~/.zshrc

    # Fish
    gh-template completion fish > ~/.config/fish/completions/gh-template.fish

    # PowerShell
    gh-template completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Flags shared by `apply` and `clone`.
#[derive(Args, Debug, Clone, Default)]
pub struct ApplyArgs {
    /// `left,right` delimiters to open and close template expressions
    #[arg(long, value_name = "left,right", value_delimiter = ',', num_args = 1)]
    pub delims: Option<Vec<String>>,

    /// Any paths to exclude using case-insensitive comparisons
    #[arg(short = 'x', long = "exclude", value_name = "paths", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// BCP-47 language for some template functions [default: en]
    #[arg(short, long, value_name = "tag")]
    pub language: Option<String>,

    /// Parameters to apply to project template
    #[arg(short, long = "param", value_name = "name=value", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

impl ApplyArgs {
    /// Split `--delims` into its left and right parts.
    ///
    /// Returns `(None, None)` when the flag was not given.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDelimiterPair` unless exactly two values were given.
    pub fn delimiter_pair(&self) -> Result<(Option<String>, Option<String>), ConfigError> {
        match self.delims.as_deref() {
            None => Ok((None, None)),
            Some([left, right]) => Ok((Some(left.clone()), Some(right.clone()))),
            Some(_) => Err(ConfigError::InvalidDelimiterPair),
        }
    }
}

/// Flags for `clone`.
#[derive(Args, Debug, Clone)]
pub struct CloneArgs {
    /// Name of the new repository, as NAME or OWNER/NAME
    pub name: String,

    /// Make the new repository based on a template repository
    #[arg(long, value_name = "repository")]
    pub template: String,

    /// Description of the repository
    #[arg(short, long)]
    pub description: Option<String>,

    /// Specify remote name for the new repository
    #[arg(short, long)]
    pub remote: Option<String>,

    /// Repository home page URL
    #[arg(long, value_name = "URL")]
    pub homepage: Option<String>,

    /// Disable issues in the new repository
    #[arg(long)]
    pub disable_issues: bool,

    /// Disable wiki in the new repository
    #[arg(long)]
    pub disable_wiki: bool,

    /// Include all branches from template repository
    #[arg(long)]
    pub include_all_branches: bool,

    /// Make the new repository internal
    #[arg(long)]
    pub internal: bool,

    /// Make the new repository private
    #[arg(long)]
    pub private: bool,

    /// Make the new repository public
    #[arg(long)]
    pub public: bool,

    /// The name of the organization team to be granted access
    #[arg(short, long, value_name = "name")]
    pub team: Option<String>,

    #[command(flatten)]
    pub apply: ApplyArgs,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

/// Variables and functions available in templates, for `apply` and `clone` help.
pub fn template_help() -> String {
    let width = BUILTIN_VARIABLES
        .iter()
        .map(|(name, _)| name.len())
        .chain(BUILTIN_FUNCTIONS.iter().map(|(name, _)| name.len()))
        .max()
        .unwrap_or(0);

    let mut help = String::from("VARIABLES:\n");
    for (name, description) in BUILTIN_VARIABLES {
        help.push_str(&format!("  {:width$}  {}\n", name, description, width = width));
    }
    help.push_str("\nFUNCTIONS:\n");
    for (name, description) in BUILTIN_FUNCTIONS {
        help.push_str(&format!("  {:width$}  {}\n", name, description, width = width));
    }
    help.push_str("\nDotted variables are nested objects: {{ github.owner }}.");
    help.push_str("\nStatements and comments open with the left delimiter: {{% if x %}}, {{# note #}}.");
    help
}
