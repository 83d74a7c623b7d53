// Logging module - Logging infrastructure
use crate::domain::error::{ChatError, ChatResult};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for the given level. `verbose` forces debug output.
pub fn filter_directive(log_level: &str, verbose: bool) -> String {
    let level = if verbose {
        "debug"
    } else {
        match log_level {
            "error" | "warn" | "info" | "debug" | "trace" => log_level,
            _ => "warn",
        }
    };
    format!("linechat={},warn", level)
}

/// Initialize logging system. Logs go to stderr so they never mix with chat output.
pub fn init_logging(log_level: &str, verbose: bool) -> ChatResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level, verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(verbose)
                .with_file(verbose)
                .with_line_number(verbose),
        )
        .try_init()
        .map_err(|e| ChatError::Config {
            message: format!("Failed to initialize logging: {}", e),
        })?;

    tracing::debug!("linechat logging system initialized");
    Ok(())
}
