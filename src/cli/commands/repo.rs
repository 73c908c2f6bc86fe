//! Plugin repository commands

use super::{EXIT_FAILURE, EXIT_OK, EXIT_USAGE};
use crate::config::BxConfigRepository;
use crate::domain::models::PluginRepo;
use clap::{Args, Subcommand};
use url::Url;

/// Arguments for the repo command
#[derive(Args, Debug)]
pub struct RepoArgs {
    #[command(subcommand)]
    pub action: RepoAction,
}

#[derive(Subcommand, Debug)]
pub enum RepoAction {
    /// List configured repositories
    List,

    /// Register a repository
    Add {
        /// Repository name (case-insensitive)
        name: String,
        /// Repository URL
        url: String,
    },

    /// Remove the first repository with the given name
    Remove {
        /// Repository name (case-insensitive)
        name: String,
    },
}

impl RepoArgs {
    /// Execute the repo command
    pub fn execute(&self, repo: &BxConfigRepository) -> anyhow::Result<i32> {
        match &self.action {
            RepoAction::List => {
                let repos = repo.plugin_repos();
                if repos.is_empty() {
                    println!("No plugin repositories configured");
                }
                for r in repos {
                    println!("{:<20} {}", r.name, r.url);
                }
                Ok(EXIT_OK)
            }
            RepoAction::Add { name, url } => {
                if let Err(e) = Url::parse(url) {
                    println!("❌ Invalid repository URL '{url}': {e}");
                    return Ok(EXIT_USAGE);
                }
                if let Some(existing) = repo.plugin_repo(name) {
                    println!("❌ Repository '{}' already exists ({})", existing.name, existing.url);
                    return Ok(EXIT_FAILURE);
                }

                repo.set_plugin_repo(PluginRepo::new(name, url));
                tracing::info!(repo = %name, url = %url, "Plugin repository added");
                println!("✅ Repository '{name}' added");
                Ok(EXIT_OK)
            }
            RepoAction::Remove { name } => {
                if repo.plugin_repo(name).is_none() {
                    println!("❌ Repository '{name}' not found");
                    return Ok(EXIT_FAILURE);
                }

                repo.unset_plugin_repo(name);
                tracing::info!(repo = %name, "Plugin repository removed");
                println!("✅ Repository '{name}' removed");
                Ok(EXIT_OK)
            }
        }
    }
}
