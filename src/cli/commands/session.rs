//! Session commands: logout and API cache reset

use super::EXIT_OK;
use crate::config::BxConfigRepository;
use clap::Args;

/// Arguments for the logout command
#[derive(Args, Debug)]
pub struct LogoutArgs {}

impl LogoutArgs {
    /// Execute the logout command
    pub fn execute(&self, repo: &BxConfigRepository) -> anyhow::Result<i32> {
        repo.clear_session();
        tracing::info!("Session cleared");
        println!("✅ Logged out");
        Ok(EXIT_OK)
    }
}

/// Arguments for the reset-api command
#[derive(Args, Debug)]
pub struct ResetApiArgs {}

impl ResetApiArgs {
    /// Execute the reset-api command
    pub fn execute(&self, repo: &BxConfigRepository) -> anyhow::Result<i32> {
        repo.clear_api_cache();
        tracing::info!("API endpoint cache cleared");
        println!("✅ Region and API endpoints cleared");
        Ok(EXIT_OK)
    }
}
