use crate::domain::config::ChatConfig;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for linechat
#[derive(Parser, Debug)]
#[command(
    name = "linechat",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interactive client for line-oriented TCP chat servers",
    long_about = "Connects to a line-oriented chat server, prints every line the server sends \
                  prefixed with '=> ' and forwards each line typed on stdin. \
                  Enter an empty line to quit."
)]
pub struct Args {
    /// Server host [default: localhost]
    #[arg(value_parser = parse_host)]
    pub host: Option<String>,

    /// Server port [default: 6666]
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path (skips the global and project files)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Positional arguments win over anything loaded from files.
    pub fn apply_to(&self, config: &mut ChatConfig) {
        if let Some(host) = &self.host {
            config.connection.host = host.clone();
        }
        if let Some(port) = self.port {
            config.connection.port = port;
        }
    }
}

fn parse_host(value: &str) -> Result<String, String> {
    let host = value.trim();
    if host.is_empty() {
        Err("host must not be empty".to_string())
    } else {
        Ok(host.to_string())
    }
}
