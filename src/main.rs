mod config;
mod database;
mod entities;
mod error;
mod http_server;
mod logging;
mod services;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{config::Config, database::Database, logging::setup_logging};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "STAGE_MANAGER_CONFIG")]
    config: Option<PathBuf>,

    /// Console log level
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "STAGE_MANAGER_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// The port to run the server on
        #[arg(short, long, default_value = "3000", env = "STAGE_MANAGER_HTTP_PORT")]
        port: u16,

        /// Database path, overriding the config file
        #[arg(short, long, env = "STAGE_MANAGER_DATABASE")]
        database: Option<PathBuf>,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    log::debug!("Stage manager starting");

    match args.command {
        Commands::Serve { port, database } => {
            let database_path = match database {
                Some(path) => path,
                None => {
                    let config = {
                        if let Some(config) = args.config {
                            Config::from_file(&config)
                        } else {
                            Config::load()
                        }
                    }
                    .with_context(|| "Failed to load stage-manager config")?;
                    config.database_path()
                }
            };

            log::debug!("Opening database at: {}", database_path.display());
            let database = Database::open(&database_path).await?;

            http_server::app::start(port, database).await?;
        }
        Commands::Config(command) => match command {
            ConfigCommands::CreateDefault => {
                let path = Config::create_default()?;
                println!("Created config file: {}", path.display());
            }
            ConfigCommands::Path => {
                let path = Config::config_path()
                    .ok_or(color_eyre::eyre::eyre!("No config directory available"))?;
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}
