use crate::cli::args::Args;
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::session::{Session, SessionSummary};
use crate::domain::config::ChatConfig;
use crate::domain::error::ChatResult;
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::tcp::Connection;
use tokio::io::{self, BufReader};
use tracing::debug;

/// Execute CLI command
pub async fn execute_command(args: Args) -> ChatResult<()> {
    let config = resolve_config(&args)?;

    if !args.quiet {
        init_logging(&config.logging.log_level, args.verbose)?;
    }
    debug!("Effective configuration: {:?}", config);

    run_client(&config).await.map(|_| ())
}

/// Load configuration files and apply the positional arguments on top.
pub fn resolve_config(args: &Args) -> ChatResult<ChatConfig> {
    let config_manager = ConfigManager::new();
    let mut config = match &args.config {
        Some(path) => config_manager.load_config_from_path(path)?,
        None => config_manager.load_config()?,
    };

    args.apply_to(&mut config);
    Ok(config)
}

/// Connect and run one interactive session on stdin/stdout.
pub async fn run_client(config: &ChatConfig) -> ChatResult<SessionSummary> {
    let mut writer = ConsoleWriter::stdout();

    let connection = Connection::connect(&config.connection).await?;
    writer.write_message(&format!(
        "Connected to the chat server at {}",
        config.connection.address()
    ))?;

    let session = Session::new(connection, config.session.clone());
    let summary = session
        .run(BufReader::new(io::stdin()), io::stdout(), io::stdout())
        .await;

    Ok(summary)
}
