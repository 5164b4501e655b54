//! upstox - OAuth bootstrap and tool server for the Upstox API.
//!
//! `login` walks through the browser authorization flow and saves the
//! token, `status` checks a saved token, `serve` exposes account and market
//! data as text tools over stdin/stdout, and `config` edits local settings.

mod commands;
mod server;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use upstox_core::api::ApiClient;
use upstox_core::auth::{Credentials, TokenManager, DEFAULT_STATE};
use upstox_core::config::Config;

#[derive(Debug, Parser)]
#[command(name = "upstox", version, about = "Upstox OAuth bootstrap and tool server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Authorize in the browser and save the access token
    Login {
        /// Show configuration and validate the pasted code
        #[arg(long)]
        debug: bool,

        /// OAuth state parameter
        #[arg(long, default_value = DEFAULT_STATE)]
        state: String,
    },
    /// Check the saved token and show market status
    Status,
    /// Serve the text tools over stdin/stdout
    Serve {
        /// Stock directory JSON file
        #[arg(long, env = "UPSTOX_STOCK_DATA")]
        stock_data: Option<PathBuf>,
    },
    /// Show or update the configuration file
    Config(commands::config::ConfigArgs),
}

/// Initialize the tracing subscriber for logging.
/// Logs go to stderr; stdout carries user output and the tool protocol.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Build the token manager from the environment and configuration
fn build_manager(config: &Config) -> upstox_core::Result<TokenManager> {
    let credentials = Credentials::from_env()?;
    let api = ApiClient::new()?.with_base_url(config.api_base_url());
    Ok(TokenManager::new(credentials, api).with_market_exchanges(config.market_exchanges.clone()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing();

    let config = Config::load()?;
    info!(command = ?cli.command, "upstox starting");

    if let Command::Config(args) = &cli.command {
        return commands::config::run(config, args);
    }

    let manager = match build_manager(&config) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("❌ {}", e);
            commands::print_guidance(&e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::Login { debug, state } => {
            commands::login::run(manager, &config.token_path(), &state, debug).await
        }
        Command::Status => commands::status::run(manager, &config.token_path()).await,
        Command::Serve { stock_data } => {
            let stock_path = stock_data.unwrap_or_else(|| config.stock_data_path());
            server::serve(manager, &config.token_path(), &stock_path).await
        }
        Command::Config(_) => Ok(()),
    }
}
