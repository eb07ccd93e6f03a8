use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use flexi_logger::Logger;
use log::{error, info};

use ircd::config::Config;
use ircd::server;

#[derive(Parser, Debug)]
#[command(name = "ircd", about = "A single-writer IRC daemon", version)]
struct Cli {
    /// Port the server listens on (1-65535)
    #[arg(value_parser = parse_port)]
    port: u16,

    /// Connection password required from every client
    #[arg(value_parser = parse_password)]
    password: String,

    /// Optional TOML configuration file; the port and password given on
    /// the command line always win
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_port(value: &str) -> Result<u16, String> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err("port must be a decimal number".to_string());
    }
    match value.parse::<u16>() {
        Ok(port) if port >= 1 => Ok(port),
        _ => Err("port must be between 1 and 65535".to_string()),
    }
}

fn parse_password(value: &str) -> Result<String, String> {
    if value.is_empty() {
        return Err("password cannot be empty".to_string());
    }
    if value.len() > 255 {
        return Err("password too long (maximum 255 characters)".to_string());
    }
    if value.chars().any(|c| c.is_ascii_control() && c != '\t') {
        return Err("password contains invalid characters".to_string());
    }
    Ok(value.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _logger = Logger::try_with_env_or_str("info")
        .and_then(|logger| logger.log_to_stderr().start())
        .ok();

    let mut config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };
    config.network.port = cli.port;

    info!(
        "starting {} {} on port {}",
        config.server.name, config.server.version, config.network.port
    );

    match server::run(config, cli.password).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
