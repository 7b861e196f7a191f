pub mod dialog;

use std::io::{BufRead, Write};

use crate::config::PromptKind;
use crate::domain::AppError;

pub use dialog::DialogPrompt;

pub const PROMPT_TITLE: &str = "Enter URL to download";

/// Source of the URL to download.
pub trait InputProvider {
    /// `Ok(None)` means the user cancelled.
    fn request_url(&mut self, prompt: &str) -> Result<Option<String>, AppError>;
}

pub fn provider_for(kind: PromptKind) -> Box<dyn InputProvider> {
    match kind {
        PromptKind::Dialog => Box::new(DialogPrompt),
        PromptKind::Console => Box::new(ConsolePrompt::stdio()),
    }
}

/// Returns the trimmed input, or `None` if it is missing or only whitespace.
pub fn non_blank(input: Option<String>) -> Option<String> {
    input
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Reads one line from a reader after printing the prompt. EOF counts as cancel.
pub struct ConsolePrompt<R, W> {
    reader: R,
    writer: W,
}

impl ConsolePrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> InputProvider for ConsolePrompt<R, W> {
    fn request_url(&mut self, prompt: &str) -> Result<Option<String>, AppError> {
        write!(self.writer, "{}: ", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Always answers with the same value. For headless runs and tests.
pub struct FixedInput(pub Option<String>);

impl FixedInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    pub fn cancelled() -> Self {
        Self(None)
    }
}

impl InputProvider for FixedInput {
    fn request_url(&mut self, _prompt: &str) -> Result<Option<String>, AppError> {
        Ok(self.0.clone())
    }
}
