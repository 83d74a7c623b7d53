use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// Why a pump stopped. Every pump makes exactly one `Running -> Terminated`
/// transition and reports it with one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PumpExit {
    /// Server closed its side of the connection
    EndOfStream,
    /// I/O failure on the connection
    StreamError(String),
    /// User entered an empty line
    EmptyInput,
    /// Console input was closed
    InputExhausted,
    /// Reading from or writing to the console failed
    ConsoleError(String),
}

impl PumpExit {
    /// Graceful exits are the ones not caused by a failure.
    pub fn is_graceful(&self) -> bool {
        matches!(self, Self::EndOfStream | Self::EmptyInput | Self::InputExhausted)
    }
}

impl fmt::Display for PumpExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PumpExit::EndOfStream => write!(f, "server closed the connection"),
            PumpExit::StreamError(e) => write!(f, "stream error: {}", e),
            PumpExit::EmptyInput => write!(f, "user quit"),
            PumpExit::InputExhausted => write!(f, "console input closed"),
            PumpExit::ConsoleError(e) => write!(f, "console error: {}", e),
        }
    }
}

/// Outcome of one pump run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpReport {
    pub exit: PumpExit,
    /// Lines moved in this pump's direction
    pub lines: u64,
}

impl PumpReport {
    pub fn new(exit: PumpExit, lines: u64) -> Self {
        Self { exit, lines }
    }
}

/// What happened during one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub peer_addr: Option<SocketAddr>,
    pub outbound: PumpReport,
    /// `None` when the inbound pump was still running at teardown and got aborted
    pub inbound: Option<PumpReport>,
    pub duration: Duration,
}

impl SessionSummary {
    pub fn lines_sent(&self) -> u64 {
        self.outbound.lines
    }

    pub fn lines_received(&self) -> Option<u64> {
        self.inbound.as_ref().map(|report| report.lines)
    }

    /// True when neither pump stopped on a failure. An aborted inbound pump
    /// counts as graceful.
    pub fn is_graceful(&self) -> bool {
        self.outbound.exit.is_graceful()
            && self.inbound.as_ref().map_or(true, |report| report.exit.is_graceful())
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sent {} line(s), outbound ended: {}; ",
            self.outbound.lines, self.outbound.exit
        )?;
        match &self.inbound {
            Some(report) => write!(
                f,
                "received {} line(s), inbound ended: {}",
                report.lines, report.exit
            )?,
            None => write!(f, "inbound aborted at teardown")?,
        }
        write!(f, " ({:.1}s)", self.duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graceful_exits() {
        assert!(PumpExit::EndOfStream.is_graceful());
        assert!(PumpExit::EmptyInput.is_graceful());
        assert!(PumpExit::InputExhausted.is_graceful());
        assert!(!PumpExit::StreamError("reset".to_string()).is_graceful());
        assert!(!PumpExit::ConsoleError("closed".to_string()).is_graceful());
    }

    #[test]
    fn test_summary_display() {
        let summary = SessionSummary {
            peer_addr: None,
            outbound: PumpReport::new(PumpExit::EmptyInput, 2),
            inbound: None,
            duration: Duration::from_millis(1500),
        };

        assert_eq!(summary.lines_sent(), 2);
        assert_eq!(summary.lines_received(), None);
        assert!(summary.is_graceful());
        assert_eq!(
            summary.to_string(),
            "sent 2 line(s), outbound ended: user quit; inbound aborted at teardown (1.5s)"
        );
    }

    #[test]
    fn test_summary_with_inbound_failure_is_not_graceful() {
        let summary = SessionSummary {
            peer_addr: None,
            outbound: PumpReport::new(PumpExit::InputExhausted, 0),
            inbound: Some(PumpReport::new(PumpExit::StreamError("reset".to_string()), 3)),
            duration: Duration::ZERO,
        };

        assert!(!summary.is_graceful());
        assert_eq!(summary.lines_received(), Some(3));
    }
}
