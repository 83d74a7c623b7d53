// TCP module - Line-oriented TCP transport
pub mod connection;
pub mod server;

pub use connection::{Connection, LineReader, LineWriter};
pub use server::EchoServer;
