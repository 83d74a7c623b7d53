use crate::core::transport::{LineSink, LineSource, ReadOutcome};
use crate::domain::{config::ConnectionSettings, error::{ChatError, ChatResult}};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::io;
use std::net::SocketAddr;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{debug, info, warn};

/// An established TCP connection to a line-oriented chat server.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    peer_addr: Option<SocketAddr>,
    max_line_length: usize,
}

impl Connection {
    /// Open a connection using the given settings.
    ///
    /// Host and port are validated first. Refused, unreachable and unresolvable
    /// addresses as well as connect timeouts all map to `ChatError::Connection`.
    pub async fn connect(settings: &ConnectionSettings) -> ChatResult<Self> {
        settings.validate()?;

        let host = settings.host.as_str();
        let port = settings.port;
        debug!("Connecting to {}:{}", host, port);

        let connect = TcpStream::connect((host, port));
        let result = if settings.connect_timeout_ms == 0 {
            connect.await
        } else {
            tokio::time::timeout(settings.connect_timeout(), connect)
                .await
                .map_err(|_| {
                    ChatError::connection(
                        host,
                        port,
                        format!("connection timed out after {}ms", settings.connect_timeout_ms),
                    )
                })?
        };
        let stream = result.map_err(|e| ChatError::connection(host, port, e.to_string()))?;

        if settings.nodelay {
            if let Err(e) = stream.set_nodelay(true) {
                warn!("Failed to set TCP_NODELAY: {}", e);
            }
        }

        let peer_addr = stream.peer_addr().ok();
        info!("TCP connection established to {}:{} ({:?})", host, port, peer_addr);

        Ok(Self {
            stream,
            peer_addr,
            max_line_length: settings.max_line_length,
        })
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    /// Split into independently owned read and write halves.
    pub fn into_split(self) -> (LineReader, LineWriter) {
        let (read_half, write_half) = self.stream.into_split();

        let codec = if self.max_line_length == 0 {
            LinesCodec::new()
        } else {
            LinesCodec::new_with_max_length(self.max_line_length)
        };

        (
            LineReader {
                lines: FramedRead::new(read_half, codec),
            },
            LineWriter {
                lines: FramedWrite::new(write_half, LinesCodec::new()),
                closed: false,
            },
        )
    }
}

/// Read half of a connection, yielding newline-delimited lines.
#[derive(Debug)]
pub struct LineReader {
    lines: FramedRead<OwnedReadHalf, LinesCodec>,
}

impl LineReader {
    /// Wait for the next line. Blocks until data, EOF or an error arrives.
    pub async fn read_line(&mut self) -> ReadOutcome {
        match self.lines.next().await {
            Some(Ok(line)) => ReadOutcome::Line(line),
            Some(Err(e)) => ReadOutcome::Error(codec_error(e)),
            None => ReadOutcome::EndOfStream,
        }
    }
}

/// Write half of a connection. Every line is flushed as soon as it is written.
#[derive(Debug)]
pub struct LineWriter {
    lines: FramedWrite<OwnedWriteHalf, LinesCodec>,
    closed: bool,
}

impl LineWriter {
    /// Send `line` followed by `\n`.
    ///
    /// `\r` is rejected along with `\n`: the reader strips a trailing `\r`, so
    /// it would not survive the trip.
    pub async fn write_line(&mut self, line: &str) -> ChatResult<()> {
        if line.contains(['\n', '\r']) {
            return Err(ChatError::InvalidInput(
                "a line must not contain a line break".to_string(),
            ));
        }
        if self.closed {
            return Err(ChatError::Stream(io::Error::new(
                io::ErrorKind::NotConnected,
                "connection already closed",
            )));
        }

        // `send` flushes the sink after encoding
        self.lines.send(line).await.map_err(codec_error)?;
        debug!("Sent {} bytes", line.len() + 1);
        Ok(())
    }

    /// Shut down the write half. Calling it again is a no-op.
    pub async fn close(&mut self) -> ChatResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        SinkExt::<&str>::close(&mut self.lines).await.map_err(codec_error)?;
        debug!("Write half shut down");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl LineSource for LineReader {
    async fn read_line(&mut self) -> ReadOutcome {
        LineReader::read_line(self).await
    }
}

#[async_trait]
impl LineSink for LineWriter {
    async fn write_line(&mut self, line: &str) -> ChatResult<()> {
        LineWriter::write_line(self, line).await
    }

    async fn close(&mut self) -> ChatResult<()> {
        LineWriter::close(self).await
    }
}

fn codec_error(error: LinesCodecError) -> ChatError {
    match error {
        LinesCodecError::Io(e) => ChatError::Stream(e),
        LinesCodecError::MaxLineLengthExceeded => ChatError::Stream(io::Error::new(
            io::ErrorKind::InvalidData,
            "line exceeds the maximum allowed length",
        )),
    }
}
