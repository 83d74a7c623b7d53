// Pump module - The two directional line pumps of a session
pub mod inbound;
pub mod outbound;

pub use inbound::run_inbound;
pub use outbound::run_outbound;

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Reported once when the server ends the connection.
pub const SERVER_CLOSED_MESSAGE: &str = "Server has closed the connection";

/// Write one line to the console and flush it.
pub(crate) async fn write_console<W>(console: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    console.write_all(text.as_bytes()).await?;
    console.write_all(b"\n").await?;
    console.flush().await
}
