use crate::domain::error::ChatError;
use std::io::{self, Write};

/// Output writer trait for user-facing console messages
pub trait OutputWriter {
    fn write_message(&mut self, message: &str) -> Result<(), OutputError>;
    fn write_error(&mut self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for ChatError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer. Banners and diagnostics go to stdout next to the
/// chat itself.
pub struct ConsoleWriter<W = io::Stdout> {
    out: W,
}

impl ConsoleWriter {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Report a failure that ends the program.
    pub fn write_failure(&mut self, error: &ChatError) -> Result<(), OutputError> {
        match error {
            // Already reads "Failed to connect to host:port: ..."
            ChatError::Connection { .. } => self.write_message(&error.to_string()),
            _ => self.write_error(&error.to_string()),
        }
    }
}

impl<W: Write> OutputWriter for ConsoleWriter<W> {
    fn write_message(&mut self, message: &str) -> Result<(), OutputError> {
        writeln!(self.out, "{}", message)?;
        self.out.flush()?;
        Ok(())
    }

    fn write_error(&mut self, error: &str) -> Result<(), OutputError> {
        writeln!(self.out, "Error: {}", error)?;
        self.out.flush()?;
        Ok(())
    }
}
