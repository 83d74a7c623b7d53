use crate::domain::error::{ChatError, ChatResult};
use async_trait::async_trait;

/// Result of a single line read from the server.
#[derive(Debug)]
pub enum ReadOutcome {
    /// A complete line, delimiter stripped
    Line(String),
    /// The server closed its side of the connection
    EndOfStream,
    /// The connection failed
    Error(ChatError),
}

/// Inbound direction of a session.
#[async_trait]
pub trait LineSource: Send {
    /// Next line from the remote side. Never yields a partial line.
    async fn read_line(&mut self) -> ReadOutcome;
}

/// Outbound direction of a session.
#[async_trait]
pub trait LineSink: Send {
    /// Write one line and its delimiter, flushed immediately.
    async fn write_line(&mut self, line: &str) -> ChatResult<()>;

    /// Release the outbound direction. Must be idempotent.
    async fn close(&mut self) -> ChatResult<()>;
}

#[async_trait]
impl<T: LineSource + ?Sized> LineSource for &mut T {
    async fn read_line(&mut self) -> ReadOutcome {
        (**self).read_line().await
    }
}

#[async_trait]
impl<T: LineSink + ?Sized> LineSink for &mut T {
    async fn write_line(&mut self, line: &str) -> ChatResult<()> {
        (**self).write_line(line).await
    }

    async fn close(&mut self) -> ChatResult<()> {
        (**self).close().await
    }
}
