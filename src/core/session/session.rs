use crate::core::pump::{run_inbound, run_outbound};
use crate::core::session::state::SessionSummary;
use crate::core::transport::{LineSink, LineSource};
use crate::domain::config::SessionSettings;
use crate::infrastructure::tcp::{Connection, LineReader, LineWriter};
use std::net::SocketAddr;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info, warn};

/// One live connection and its two line streams.
///
/// `run` drives the inbound pump on a spawned task and the outbound pump on the
/// caller's task. Once the outbound pump stops, the write half is closed and the
/// inbound pump gets `shutdown_grace_ms` to drain before it is aborted.
pub struct Session<S = LineReader, K = LineWriter> {
    source: S,
    sink: K,
    settings: SessionSettings,
    peer_addr: Option<SocketAddr>,
}

impl Session {
    pub fn new(connection: Connection, settings: SessionSettings) -> Self {
        let peer_addr = connection.peer_addr();
        let (source, sink) = connection.into_split();

        Self {
            source,
            sink,
            settings,
            peer_addr,
        }
    }
}

impl<S, K> Session<S, K>
where
    S: LineSource + 'static,
    K: LineSink,
{
    /// Build a session from any pair of line streams.
    pub fn from_parts(source: S, sink: K, settings: SessionSettings) -> Self {
        Self {
            source,
            sink,
            settings,
            peer_addr: None,
        }
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    /// Run both pumps until the session is over.
    ///
    /// `input` feeds the outbound pump, `output` receives server lines and
    /// `diagnostics` receives outbound failures.
    pub async fn run<I, O, D>(self, input: I, output: O, diagnostics: D) -> SessionSummary
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin + Send + 'static,
        D: AsyncWrite + Unpin,
    {
        let started = Instant::now();
        let Session {
            source,
            mut sink,
            settings,
            peer_addr,
        } = self;

        let prefix = settings.incoming_prefix.clone();
        let mut inbound_handle =
            tokio::spawn(async move { run_inbound(source, output, &prefix).await });

        let outbound = run_outbound(input, &mut sink, diagnostics).await;
        debug!("Outbound pump stopped: {}", outbound.exit);

        // Silent close, the server gets no goodbye line
        if let Err(e) = sink.close().await {
            debug!("Closing the write half failed: {}", e);
        }

        let grace = settings.shutdown_grace();
        let inbound = match tokio::time::timeout(grace, &mut inbound_handle).await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(e)) => {
                warn!("Inbound pump task failed: {}", e);
                None
            }
            Err(_) => {
                debug!("Inbound pump still running after {:?}, aborting", grace);
                inbound_handle.abort();
                None
            }
        };

        let summary = SessionSummary {
            peer_addr,
            outbound,
            inbound,
            duration: started.elapsed(),
        };
        if summary.is_graceful() {
            info!("Session ended: {}", summary);
        } else {
            info!("Session ended after a failure: {}", summary);
        }
        summary
    }
}
