use crate::domain::error::{ChatError, ChatResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// linechat configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Connection settings
    #[serde(default)]
    pub connection: ConnectionSettings,
    /// Session settings
    #[serde(default)]
    pub session: SessionSettings,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where to connect and how the socket is configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Server host name or address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connect timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    /// Disable Nagle's algorithm so each line leaves immediately
    #[serde(default = "default_nodelay")]
    pub nodelay: bool,
    /// Maximum accepted inbound line length in bytes (0 = unlimited)
    #[serde(default)]
    pub max_line_length: usize,
}

/// Session lifecycle and presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// How long the inbound pump may keep draining after the user quits
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_ms: u64,
    /// Marker printed in front of every line received from the server
    #[serde(default = "default_incoming_prefix")]
    pub incoming_prefix: String,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions
fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6666
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_nodelay() -> bool {
    true
}

fn default_shutdown_grace() -> u64 {
    250
}

fn default_incoming_prefix() -> String {
    "=> ".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            connect_timeout_ms: default_connect_timeout(),
            nodelay: default_nodelay(),
            max_line_length: 0,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            shutdown_grace_ms: default_shutdown_grace(),
            incoming_prefix: default_incoming_prefix(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ConnectionSettings {
    /// Settings for `host:port` with every other field at its default.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Reject an empty host or port 0 before any socket work happens.
    pub fn validate(&self) -> ChatResult<()> {
        if self.host.trim().is_empty() {
            return Err(ChatError::InvalidInput("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ChatError::InvalidInput(
                "port must be in the range 1-65535".to_string(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SessionSettings {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}
