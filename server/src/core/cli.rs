use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_HOST, ENV_MAX_PAGE_SIZE, ENV_PAGE_SIZE, ENV_PORT, ENV_SEARCH_ENABLED,
};

#[derive(Parser)]
#[command(name = "hrdesk")]
#[command(version, about = "HR records query service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Enable or disable the full-text search mirror
    #[arg(long, global = true, env = ENV_SEARCH_ENABLED)]
    pub search: Option<bool>,

    /// Default page size for paged and search endpoints
    #[arg(long, global = true, env = ENV_PAGE_SIZE)]
    pub page_size: Option<u32>,

    /// Largest page size a client may request
    #[arg(long, global = true, env = ENV_MAX_PAGE_SIZE)]
    pub max_page_size: Option<u32>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// System maintenance commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum SystemCommands {
    /// Rebuild the search mirror from the primary store
    Reindex,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub search: Option<bool>,
    pub page_size: Option<u32>,
    pub max_page_size: Option<u32>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            config: cli.config,
            search: cli.search,
            page_size: cli.page_size,
            max_page_size: cli.max_page_size,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (cli.into(), command)
}
