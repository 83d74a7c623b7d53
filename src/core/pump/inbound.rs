use crate::core::pump::{write_console, SERVER_CLOSED_MESSAGE};
use crate::core::session::state::{PumpExit, PumpReport};
use crate::core::transport::{LineSource, ReadOutcome};
use tokio::io::AsyncWrite;
use tracing::{debug, info, warn};

/// Server -> console.
///
/// Prints every received line behind `prefix` until the server closes the
/// connection or the stream fails. Either condition is reported on the
/// console once and ends the pump.
pub async fn run_inbound<S, W>(mut source: S, mut console: W, prefix: &str) -> PumpReport
where
    S: LineSource,
    W: AsyncWrite + Unpin,
{
    let mut lines = 0u64;

    loop {
        match source.read_line().await {
            ReadOutcome::Line(line) => {
                debug!("Received line of {} bytes", line.len());
                let text = format!("{}{}", prefix, line);
                if let Err(e) = write_console(&mut console, &text).await {
                    warn!("Failed to write to console: {}", e);
                    return PumpReport::new(PumpExit::ConsoleError(e.to_string()), lines);
                }
                lines += 1;
            }
            ReadOutcome::EndOfStream => {
                info!("Server closed the connection after {} line(s)", lines);
                if let Err(e) = write_console(&mut console, SERVER_CLOSED_MESSAGE).await {
                    warn!("Failed to write to console: {}", e);
                }
                return PumpReport::new(PumpExit::EndOfStream, lines);
            }
            ReadOutcome::Error(e) => {
                debug!("Inbound stream failed: {}", e);
                if let Err(console_error) =
                    write_console(&mut console, &format!("Error: {}", e)).await
                {
                    warn!("Failed to write to console: {}", console_error);
                }
                return PumpReport::new(PumpExit::StreamError(e.to_string()), lines);
            }
        }
    }
}
