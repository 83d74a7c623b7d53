// linechat - Interactive line-oriented TCP chat client
use clap::Parser;
use linechat::cli::{execute_command, Args, ConsoleWriter};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = execute_command(args).await {
        let mut writer = ConsoleWriter::stdout();
        if writer.write_failure(&e).is_err() {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}
