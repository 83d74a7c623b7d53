use crate::core::pump::write_console;
use crate::core::session::state::{PumpExit, PumpReport};
use crate::core::transport::LineSink;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite};
use tracing::{debug, info, warn};

/// Console -> server.
///
/// Forwards each line the user types. An empty line is the quit gesture and is
/// never sent. Console EOF, a console read failure or a failed write also end
/// the pump; failures are reported on `diagnostics`.
pub async fn run_outbound<I, K, W>(mut input: I, sink: &mut K, mut diagnostics: W) -> PumpReport
where
    I: AsyncBufRead + Unpin,
    K: LineSink + ?Sized,
    W: AsyncWrite + Unpin,
{
    let mut lines = 0u64;
    let mut buffer = String::new();

    loop {
        buffer.clear();

        match input.read_line(&mut buffer).await {
            Ok(0) => {
                info!("Console input closed after {} line(s)", lines);
                return PumpReport::new(PumpExit::InputExhausted, lines);
            }
            Ok(_) => {
                let line = strip_line_ending(&buffer);
                if line.is_empty() {
                    info!("Empty input, ending session");
                    return PumpReport::new(PumpExit::EmptyInput, lines);
                }

                if let Err(e) = sink.write_line(line).await {
                    debug!("Failed to send line: {}", e);
                    if let Err(console_error) =
                        write_console(&mut diagnostics, &format!("Error: {}", e)).await
                    {
                        warn!("Failed to write to console: {}", console_error);
                    }
                    return PumpReport::new(PumpExit::StreamError(e.to_string()), lines);
                }
                lines += 1;
                debug!("Forwarded line {}", lines);
            }
            Err(e) => {
                debug!("Failed to read console input: {}", e);
                if let Err(console_error) =
                    write_console(&mut diagnostics, &format!("Error: {}", e)).await
                {
                    warn!("Failed to write to console: {}", console_error);
                }
                return PumpReport::new(PumpExit::ConsoleError(e.to_string()), lines);
            }
        }
    }
}

fn strip_line_ending(raw: &str) -> &str {
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    line.strip_suffix('\r').unwrap_or(line)
}
