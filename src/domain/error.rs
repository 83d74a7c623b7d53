use thiserror::Error;

/// linechat unified error type
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Failed to connect to {host}:{port}: {message}")]
    Connection {
        host: String,
        port: u16,
        message: String,
    },

    #[error("Stream error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output error: {0}")]
    Output(String),
}

impl ChatError {
    pub(crate) fn connection(host: &str, port: u16, message: impl Into<String>) -> Self {
        Self::Connection {
            host: host.to_string(),
            port,
            message: message.into(),
        }
    }

    /// True for errors that happen on an already established connection.
    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
