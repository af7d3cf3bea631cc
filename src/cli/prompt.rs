//! Line-oriented terminal input
//!
//! Plain answers are read line by line from the input stream. On a real
//! terminal, passwords and yes/no questions go through dialoguer so that
//! passwords are never echoed.

use crate::domain::entry::split_list;
use crate::error::{JournalError, Result};
use dialoguer::{Confirm, Password};
use std::io::{BufRead, Write};

/// How secrets and confirmations are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Everything comes from the input stream (pipes, tests)
    Scripted,
    /// stdin is a terminal: hidden password entry and dialoguer confirmations
    Terminal,
}

/// Reads answers from `input` after writing prompts to `output`.
///
/// Generic over the streams so the menu can be driven from a script in tests.
pub struct Prompter<R: BufRead, W: Write> {
    input: R,
    output: W,
    mode: InputMode,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter {
            input,
            output,
            mode: InputMode::Scripted,
        }
    }

    pub fn with_mode(mut self, mode: InputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Output stream, for printing between prompts
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Prompt and read one trimmed line; `None` at end of input
    pub fn line(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    /// Like `line`, treating end of input as an empty answer
    pub fn text(&mut self, label: &str) -> Result<String> {
        Ok(self.line(label)?.unwrap_or_default())
    }

    /// Read a password; surrounding whitespace is significant
    pub fn secret(&mut self, label: &str) -> Result<String> {
        if self.mode == InputMode::Terminal {
            self.output.flush()?;
            return Password::new()
                .with_prompt(label)
                .allow_empty_password(true)
                .interact()
                .map_err(dialog_error);
        }

        write!(self.output, "{}: ", label)?;
        self.output.flush()?;

        let mut buf = String::new();
        self.input.read_line(&mut buf)?;
        Ok(buf.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Read an integer, re-asking until one is given; `None` on empty input
    pub fn number(&mut self, label: &str) -> Result<Option<i64>> {
        loop {
            let Some(answer) = self.line(label)? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => writeln!(self.output, "Please enter a whole number")?,
            }
        }
    }

    /// Yes/no question, defaulting to no
    pub fn confirm(&mut self, label: &str) -> Result<bool> {
        if self.mode == InputMode::Terminal {
            self.output.flush()?;
            return Confirm::new()
                .with_prompt(label)
                .default(false)
                .interact()
                .map_err(dialog_error);
        }

        let answer = self.text(&format!("{} [y/N]", label))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    /// Comma-separated list
    pub fn list(&mut self, label: &str) -> Result<Vec<String>> {
        Ok(split_list(&self.text(label)?))
    }
}

fn dialog_error(err: dialoguer::Error) -> JournalError {
    JournalError::Io(std::io::Error::other(err.to_string()))
}
