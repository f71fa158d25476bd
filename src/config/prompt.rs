//! Interactive fallback for fields no other source supplied.

use std::io::{BufRead, Write};

use dialoguer::{Input, Password};

use super::FieldSpec;
use crate::error::ConfigError;

/// Reads one answer per prompt.
///
/// Implementations return the answer with surrounding whitespace removed. An
/// empty answer is not an error; the resolver treats it as "still missing".
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Asks for the value described by `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PromptFailed`] when the input stream fails.
    fn prompt(&mut self, spec: &FieldSpec) -> Result<String, ConfigError>;
}

/// Terminal prompter backed by `dialoguer`.
///
/// Sensitive fields are read without echo.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, spec: &FieldSpec) -> Result<String, ConfigError> {
        let answer = if spec.sensitive {
            Password::new()
                .with_prompt(spec.prompt)
                .allow_empty_password(true)
                .interact()
        } else {
            Input::<String>::new()
                .with_prompt(spec.prompt)
                .allow_empty(true)
                .interact_text()
        };
        answer
            .map(|value| value.trim().to_owned())
            .map_err(|error| ConfigError::PromptFailed {
                field: spec.name.to_owned(),
                message: error.to_string(),
            })
    }
}

/// Line-oriented prompter for piped input.
///
/// Writes `label: ` to `output` and reads one line from `input`. End of input
/// yields an empty answer.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    /// Creates a prompter reading from `input` and echoing labels to `output`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn prompt(&mut self, spec: &FieldSpec) -> Result<String, ConfigError> {
        let failed = |error: std::io::Error| ConfigError::PromptFailed {
            field: spec.name.to_owned(),
            message: error.to_string(),
        };
        write!(self.output, "{}: ", spec.prompt).map_err(failed)?;
        self.output.flush().map_err(failed)?;

        let mut line = String::new();
        self.input.read_line(&mut line).map_err(failed)?;
        Ok(line.trim().to_owned())
    }
}
