//! render::engine
//!
//! minijinja-backed template renderer.
//!
//! # Behavior
//!
//! - Walks the tree under the root, skipping `.git` and configured exclusions
//!   (case-insensitive, by path segment)
//! - Renders UTF-8 text files that contain the left variable delimiter
//! - Rewrites a file only if rendering changed it
//!
//! # Syntax
//!
//! Every tag opens with the left delimiter. For a pair `L`/`R`, expressions
//! are `L ... R`, statements `L% ... %R`, and comments `L# ... #R`. With the
//! default pair that is `{{ x }}`, `{{% if x %}}` and `{{# note #}}`, so bare
//! `{%` or `{#` in a file is plain text.
//!
//! # Template Context
//!
//! Dotted parameter names are exposed as nested objects, so `github.owner`
//! is written `{{ github.owner }}`. When a name cannot nest (both `a` and
//! `a.b` are set) the nested form is dropped with a warning and the value
//! stays reachable through `param("a.b")`.
//!
//! Globals and functions:
//!
//! | Name | Description |
//! |---|---|
//! | `language` | Configured BCP-47 language tag |
//! | `date` | Current UTC date, `YYYY-MM-DD` |
//! | `date.local()` | The same instant in the local time zone |
//! | `date.year` | Year of `date` |
//! | `date.format(layout)` | `date` formatted with a strftime layout |
//! | `year` | Current UTC year |
//! | `param(name, default, prompt)` | Value of `name`; asks for it when unset and a prompter is attached, else `default` |
//! | `pluralize(count, thing)` | `thing`, pluralized unless `count` is 1 |
//! | `lowercase(s)`, `uppercase(s)`, `titlecase(s)` | Case conversion |
//!
//! Undefined values are errors that name the file.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, FixedOffset, Local, Utc};
use minijinja::syntax::SyntaxConfig;
use minijinja::value::{from_args, Object, ObjectRepr};
use minijinja::{Environment, Error, ErrorKind, State, UndefinedBehavior, Value};
use walkdir::WalkDir;

use super::prompt::{PromptSession, Prompter};
use super::{RenderError, RenderReport, Renderer};
use crate::core::config::RunConfiguration;
use crate::core::params::ParameterStore;
use crate::core::types::Delimiters;

/// Functions and variables listed in command help.
pub const BUILTIN_FUNCTIONS: [(&str, &str); 10] = [
    ("param name [default [prompt]]", "Replace name with value, optionally prompting with default"),
    ("pluralize count thing", "Pluralize thing based on count"),
    ("lowercase string", "Make string lowercase"),
    ("titlecase string", "Make string titlecase"),
    ("uppercase string", "Make string uppercase"),
    ("date", "Get UTC date"),
    ("date.local()", "Get local date"),
    ("date.year", "Get year from date"),
    ("date.format(layout)", "Format date based on a strftime layout like '%Y-%m-%d'"),
    ("year", "Get year from UTC date"),
];

/// Renders files in place with minijinja.
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    prompter: Option<Arc<dyn Prompter>>,
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask `prompter` for parameters that `param()` finds unset.
    pub fn with_prompter(mut self, prompter: Arc<dyn Prompter>) -> Self {
        self.prompter = Some(prompter);
        self
    }

    fn environment(
        &self,
        params: &ParameterStore,
        config: &RunConfiguration,
    ) -> Result<Environment<'static>, RenderError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_syntax(syntax(config.delimiters())?);

        let now = Utc::now().fixed_offset();
        env.add_global("language", config.language().as_str().to_string());
        env.add_global("date", Value::from_object(Date(now)));
        env.add_global("year", now.year());

        let values = Arc::new(params.as_map().clone());
        let session = self.prompter.clone().map(PromptSession::new);
        env.add_function(
            "param",
            move |name: String, default: Option<Value>, prompt: Option<String>| -> Result<Value, Error> {
                if let Some(value) = values.get(&name) {
                    return Ok(Value::from(value.as_str()));
                }
                match (&session, default) {
                    (Some(session), default) => {
                        let default = default.map(|d| d.to_string());
                        session
                            .value(&name, prompt.as_deref(), default.as_deref())
                            .map(Value::from)
                            .map_err(|e| {
                                Error::new(
                                    ErrorKind::InvalidOperation,
                                    format!("failed to read parameter '{}'", name),
                                )
                                .with_source(e)
                            })
                    }
                    (None, Some(default)) => Ok(default),
                    (None, None) => Err(Error::new(
                        ErrorKind::UndefinedError,
                        format!("parameter '{}' is not set", name),
                    )),
                }
            },
        );
        env.add_function("pluralize", |count: i64, thing: String| -> String {
            if count == 1 {
                thing
            } else {
                pluralize(&thing)
            }
        });
        env.add_function("lowercase", |s: String| -> String { s.to_lowercase() });
        env.add_function("uppercase", |s: String| -> String { s.to_uppercase() });
        env.add_function("titlecase", |s: String| -> String { titlecase(&s) });

        Ok(env)
    }
}

/// Statement and comment tags derived from the variable delimiters.
fn syntax(delimiters: &Delimiters) -> Result<SyntaxConfig, RenderError> {
    let (left, right) = (delimiters.left(), delimiters.right());
    SyntaxConfig::builder()
        .block_delimiters(format!("{left}%"), format!("%{right}"))
        .variable_delimiters(left.to_string(), right.to_string())
        .comment_delimiters(format!("{left}#"), format!("#{right}"))
        .build()
        .map_err(|e| RenderError::Syntax(e.to_string()))
}

/// The `date` global.
#[derive(Debug)]
struct Date(DateTime<FixedOffset>);

impl Date {
    fn format(&self, layout: &str) -> Result<String, Error> {
        let invalid = || Error::new(ErrorKind::InvalidOperation, format!("invalid date layout '{}'", layout));
        let items: Vec<Item<'_>> = StrftimeItems::new(layout).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return Err(invalid());
        }
        let mut out = String::new();
        write!(out, "{}", self.0.format_with_items(items.iter())).map_err(|_| invalid())?;
        Ok(out)
    }
}

impl Object for Date {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "year" => Some(Value::from(self.0.year())),
            _ => None,
        }
    }

    fn call_method(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> Result<Value, Error> {
        match method {
            "local" => {
                if !args.is_empty() {
                    return Err(Error::from(ErrorKind::TooManyArguments));
                }
                let local = self.0.with_timezone(&Local).fixed_offset();
                Ok(Value::from_object(Date(local)))
            }
            "format" => {
                let (layout,): (&str,) = from_args(args)?;
                self.format(layout).map(Value::from)
            }
            _ => Err(Error::from(ErrorKind::UnknownMethod)),
        }
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Renderer for TemplateRenderer {
    fn apply(
        &self,
        root: &Path,
        params: &ParameterStore,
        config: &RunConfiguration,
    ) -> Result<RenderReport, RenderError> {
        let env = self.environment(params, config)?;
        let context = Value::from_serialize(nest(params));
        let left = config.delimiters().left();
        let mut report = RenderReport::default();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 {
                    return true;
                }
                if e.file_name() == ".git" {
                    return false;
                }
                match relative(root, e.path()) {
                    Some(rel) => !config.is_excluded(&rel),
                    None => true,
                }
            });

        for entry in walker {
            let entry = entry.map_err(|e| RenderError::Walk {
                path: e.path().unwrap_or(root).to_path_buf(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let rel = PathBuf::from(relative(root, path).unwrap_or_default());
            report.examined += 1;

            let bytes = fs::read(path).map_err(|e| RenderError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;
            if bytes.contains(&0) {
                report.skipped_binary += 1;
                continue;
            }
            let Ok(source) = String::from_utf8(bytes) else {
                report.skipped_binary += 1;
                continue;
            };
            if !source.contains(left) {
                continue;
            }

            let name = rel.to_string_lossy().into_owned();
            let rendered = env
                .render_named_str(&name, &source, &context)
                .map_err(|e| RenderError::Template {
                    path: rel.clone(),
                    source: e,
                })?;

            if rendered == source {
                tracing::debug!(path = %rel.display(), "unchanged");
                report.unchanged.push(rel);
                continue;
            }

            fs::write(path, rendered).map_err(|e| RenderError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
            tracing::debug!(path = %rel.display(), "rendered");
            report.rendered.push(rel);
        }

        Ok(report)
    }
}

/// `/`-separated path of `path` under `root`.
fn relative(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Build a nested object from dotted keys.
fn nest(params: &ParameterStore) -> serde_json::Value {
    let mut root = serde_json::Map::new();

    'keys: for (key, value) in params.iter() {
        let mut segments: Vec<&str> = key.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            tracing::warn!(key, "parameter name has an empty segment; use param() to read it");
            continue;
        }
        let Some(leaf) = segments.pop() else {
            continue;
        };

        let mut node = &mut root;
        for segment in segments {
            let child = node
                .entry(segment.to_string())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            match child {
                serde_json::Value::Object(map) => node = map,
                _ => {
                    tracing::warn!(key, "parameter conflicts with '{}'; use param() to read it", segment);
                    continue 'keys;
                }
            }
        }

        if node.contains_key(leaf) {
            tracing::warn!(key, "parameter conflicts with a nested name; use param() to read it");
            continue;
        }
        node.insert(leaf.to_string(), serde_json::Value::String(value.to_string()));
    }

    serde_json::Value::Object(root)
}

/// Naive English plural.
fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();
    if ["s", "x", "z", "ch", "sh"].iter().any(|end| lower.ends_with(end)) {
        format!("{}es", word)
    } else if lower.ends_with('y')
        && !lower
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| "aeiou".contains(c))
    {
        format!("{}ies", &word[..word.len() - 1])
    } else {
        format!("{}s", word)
    }
}

fn titlecase(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
