//! linechat library
//!
//! Interactive client for line-oriented TCP chat servers: one connection,
//! an inbound pump printing server lines and an outbound pump forwarding
//! console input.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::session::{PumpExit, PumpReport, Session, SessionSummary};
pub use crate::core::transport::{LineSink, LineSource, ReadOutcome};
pub use domain::config::{ChatConfig, ConnectionSettings, SessionSettings};
pub use domain::error::{ChatError, ChatResult};
pub use infrastructure::tcp::{Connection, EchoServer, LineReader, LineWriter};
