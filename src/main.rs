// bxconfig - shared CLI configuration
// Copyright (c) 2025 Bxconfig Contributors
// Licensed under the MIT License

use bxconfig::cli::commands::EXIT_FATAL;
use bxconfig::cli::{Cli, Commands};
use bxconfig::config::{paths, BxConfigRepository};
use bxconfig::domain::fatal_error_handler;
use bxconfig::logging::{init_logging, level_for_config_file};
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let resolved = match &cli.config {
        Some(path) => Ok(path.clone()),
        None => paths::config_file_path(),
    };
    let config_path = match resolved {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Failed to locate configuration file: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    // Logging comes up before the repository's first load so load errors are
    // recorded. An explicit level wins over the file's Trace setting.
    let log_level = match &cli.log_level {
        Some(level) => level.clone(),
        None => level_for_config_file(&config_path, "warn"),
    };
    if let Err(e) = init_logging(&log_level, cli.log_format) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(EXIT_FATAL);
    }

    let repo = BxConfigRepository::from_path(&config_path, fatal_error_handler());

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        path = %config_path.display(),
        "bxconfig starting"
    );

    let exit_code = match execute_command(&cli, &repo).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, repo: &BxConfigRepository) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Show(args) => args.execute(repo),
        Commands::Cloud(args) => args.execute(repo),
        Commands::Region(args) => args.execute(repo),
        Commands::Logout(args) => args.execute(repo),
        Commands::ResetApi(args) => args.execute(repo),
        Commands::Set(args) => args.execute(repo),
        Commands::Repo(args) => args.execute(repo),
        Commands::Download(args) => args.execute(repo).await,
    }
}
