//! Interactive questions asked during setup.
use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

/// Line that ends a list of answers.
pub const DONE: &str = "done";

/// Source of answers to setup questions.
///
/// [`TerminalPrompter`] asks on the terminal; tests script the answers.
pub trait Prompter {
    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns an error if no answer can be read.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Ask for one line of text.  An empty answer is allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if no answer can be read.
    fn input(&self, prompt: &str) -> Result<String>;

    /// Ask repeatedly until the answer is [`DONE`].
    ///
    /// Answers are trimmed; blank answers are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if an answer cannot be read.
    fn collect_until_done(&self, prompt: &str) -> Result<Vec<String>> {
        let mut answers = Vec::new();
        loop {
            let answer = self.input(prompt)?;
            let answer = answer.trim();
            if answer == DONE {
                return Ok(answers);
            }
            if !answer.is_empty() {
                answers.push(answer.to_string());
            }
        }
    }
}

/// [`Prompter`] backed by `dialoguer` on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn input(&self, prompt: &str) -> Result<String> {
        Ok(Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct Scripted(RefCell<VecDeque<&'static str>>);

    impl Prompter for Scripted {
        fn confirm(&self, _prompt: &str, default: bool) -> Result<bool> {
            Ok(default)
        }

        fn input(&self, _prompt: &str) -> Result<String> {
            self.0
                .borrow_mut()
                .pop_front()
                .map(String::from)
                .ok_or_else(|| anyhow::anyhow!("no more answers"))
        }
    }

    #[test]
    fn collects_until_done_dropping_blanks() {
        let prompter = Scripted(RefCell::new(
            ["vim", " ", " git ", "done", "ignored"].into(),
        ));
        let answers = prompter.collect_until_done("package").unwrap();
        assert_eq!(answers, vec!["vim", "git"]);
    }

    #[test]
    fn end_of_input_is_an_error() {
        let prompter = Scripted(RefCell::new(["vim"].into()));
        assert!(prompter.collect_until_done("package").is_err());
    }
}
