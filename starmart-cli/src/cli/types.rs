use clap::{Parser, Subcommand};

use super::helper::{DESCRIPTION, LOGO};

use starmart_types::constants::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(author, version, name = "starmart")]
#[command(
    about = format!("{} \n {}", LOGO, DESCRIPTION),
    long_about = None,
)]
pub struct Cli {
    #[arg(
        global = true,
        short = 'c',
        long,
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config_path: String,

    #[clap(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Debug, Subcommand, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Rebuild the warehouse from the transaction feed (default)")]
    Run,
    #[command(about = "Show row counts of the current warehouse")]
    Stats,
    #[command(about = "Show the effective configuration")]
    Config,
}
