//! Show command implementation

use super::EXIT_OK;
use crate::config::BxConfigRepository;
use crate::domain::models::{Account, PluginRepo, Region, ResourceGroup};
use clap::Args;
use serde::Serialize;

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {}

impl ShowArgs {
    /// Execute the show command
    pub fn execute(&self, repo: &BxConfigRepository) -> anyhow::Result<i32> {
        tracing::debug!("Showing configuration");
        println!("{}", serde_json::to_string_pretty(&public_view(repo))?);
        Ok(EXIT_OK)
    }
}

/// The configuration as users see it, tokens replaced by their presence
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicView {
    pub region: Region,
    pub cloud_name: String,
    pub cloud_type: String,
    pub console_endpoint: String,
    #[serde(rename = "IAMEndpoint")]
    pub iam_endpoint: String,
    #[serde(rename = "IAMID")]
    pub iam_id: String,
    pub logged_in: bool,
    pub has_refresh_token: bool,
    pub account: Account,
    pub resource_group: ResourceGroup,
    pub plugin_repos: Vec<PluginRepo>,
    pub locale: String,
    pub trace: String,
    pub color_enabled: String,
    #[serde(rename = "HTTPTimeout")]
    pub http_timeout: i64,
    #[serde(rename = "CLIInfoEndpoint")]
    pub cli_info_endpoint: String,
    #[serde(rename = "CheckCLIVersionDisabled")]
    pub check_cli_version_disabled: bool,
    pub usage_stats_disabled: bool,
}

pub fn public_view(repo: &BxConfigRepository) -> PublicView {
    PublicView {
        region: repo.region(),
        cloud_name: repo.cloud_name(),
        cloud_type: repo.cloud_type(),
        console_endpoint: repo.console_endpoint(),
        iam_endpoint: repo.iam_endpoint(),
        iam_id: repo.iam_id(),
        logged_in: !repo.iam_token().is_empty(),
        has_refresh_token: !repo.iam_refresh_token().is_empty(),
        account: repo.account(),
        resource_group: repo.resource_group(),
        plugin_repos: repo.plugin_repos(),
        locale: repo.locale(),
        trace: repo.trace(),
        color_enabled: repo.color_enabled(),
        http_timeout: repo.http_timeout(),
        cli_info_endpoint: repo.cli_info_endpoint(),
        check_cli_version_disabled: repo.check_cli_version_disabled(),
        usage_stats_disabled: repo.usage_stats_disabled(),
    }
}
