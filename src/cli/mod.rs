//! CLI interface and argument parsing
//!
//! This module provides the `bxconfig` command-line interface using clap.

pub mod commands;

use crate::logging::LogFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bxconfig - inspect and edit the shared CLI configuration
#[derive(Parser, Debug)]
#[command(name = "bxconfig")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file (defaults to ~/.bluemix/config.json)
    #[arg(short, long, env = "BXCONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "BXCONFIG_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the current configuration (tokens masked)
    Show(commands::show::ShowArgs),

    /// Print the cloud name and type derived from the region
    Cloud(commands::region::CloudArgs),

    /// Select a region
    Region(commands::region::RegionArgs),

    /// Forget tokens, account and resource group
    Logout(commands::session::LogoutArgs),

    /// Forget region and API endpoints
    ResetApi(commands::session::ResetApiArgs),

    /// Change a single setting
    Set(commands::set::SetArgs),

    /// Manage plugin repositories
    Repo(commands::repo::RepoArgs),

    /// Download a file into a directory
    Download(commands::download::DownloadArgs),
}
