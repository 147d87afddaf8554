//! ui::prompt
//!
//! Terminal prompts for template parameters.

use std::io::{self, IsTerminal};
use std::sync::Arc;

use console::Term;
use dialoguer::Input;

use crate::render::Prompter;

/// Asks on stderr with dialoguer, prefilling the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    /// A prompter if stdin and stderr are both terminals.
    pub fn attended() -> Option<Arc<dyn Prompter>> {
        if io::stdin().is_terminal() && Term::stderr().is_term() {
            Some(Arc::new(TerminalPrompter))
        } else {
            tracing::debug!("not a terminal; unset parameters will not be prompted");
            None
        }
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&self, message: &str, default: Option<&str>) -> io::Result<String> {
        let mut input = Input::<String>::new().with_prompt(message).allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input
            .interact_text()
            .map_err(|dialoguer::Error::IO(e)| e)
    }
}
