//! render::prompt
//!
//! Interactive values for `param()`.
//!
//! When a template asks for a parameter that was not passed and a
//! [`Prompter`] is attached to the renderer, the user is asked once per
//! name; later calls in any file reuse the answer.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};

/// Source of values for parameters that were not passed.
pub trait Prompter: fmt::Debug + Send + Sync {
    /// Ask for a value, showing `message` and offering `default`.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn ask(&self, message: &str, default: Option<&str>) -> io::Result<String>;
}

/// A prompter plus the answers it has given during one render pass.
#[derive(Debug, Clone)]
pub(crate) struct PromptSession {
    prompter: Arc<dyn Prompter>,
    answers: Arc<Mutex<BTreeMap<String, String>>>,
}

impl PromptSession {
    pub(crate) fn new(prompter: Arc<dyn Prompter>) -> Self {
        Self {
            prompter,
            answers: Arc::default(),
        }
    }

    /// The answer for `name`, asking only the first time.
    pub(crate) fn value(
        &self,
        name: &str,
        message: Option<&str>,
        default: Option<&str>,
    ) -> io::Result<String> {
        let mut answers = self
            .answers
            .lock()
            .map_err(|_| io::Error::other("prompt answers are unavailable"))?;
        if let Some(answer) = answers.get(name) {
            return Ok(answer.clone());
        }

        let answer = self.prompter.ask(message.unwrap_or(name), default)?;
        tracing::debug!(name, "parameter entered");
        answers.insert(name.to_string(), answer.clone());
        Ok(answer)
    }
}
