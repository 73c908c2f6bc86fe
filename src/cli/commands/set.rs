//! Set command implementation
//!
//! Changes one scalar setting of the configuration.

use super::{EXIT_OK, EXIT_USAGE};
use crate::config::BxConfigRepository;
use clap::{Args, ValueEnum};

/// Settings that can be changed from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingKey {
    Locale,
    Trace,
    /// `true`, `false` or `auto`
    Color,
    /// Seconds
    HttpTimeout,
    CliInfoEndpoint,
    CheckVersionDisabled,
    UsageStatsDisabled,
    ConsoleEndpoint,
    IamEndpoint,
}

/// Arguments for the set command
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Setting to change
    #[arg(value_enum)]
    pub key: SettingKey,

    /// New value
    pub value: String,
}

impl SetArgs {
    /// Execute the set command
    pub fn execute(&self, repo: &BxConfigRepository) -> anyhow::Result<i32> {
        if let Err(reason) = self.apply(repo) {
            println!("❌ Invalid value '{}' for {:?}: {reason}", self.value, self.key);
            return Ok(EXIT_USAGE);
        }

        tracing::info!(key = ?self.key, "Setting updated");
        println!("✅ {:?} updated", self.key);
        Ok(EXIT_OK)
    }

    fn apply(&self, repo: &BxConfigRepository) -> Result<(), String> {
        let value = self.value.trim();
        match self.key {
            SettingKey::Locale => repo.set_locale(value),
            SettingKey::Trace => repo.set_trace(value),
            SettingKey::Color => repo.set_color_enabled(parse_color(value)?),
            SettingKey::HttpTimeout => {
                let seconds: i64 = value.parse().map_err(|e| format!("{e}"))?;
                if seconds < 0 {
                    return Err("timeout cannot be negative".to_string());
                }
                repo.set_http_timeout(seconds);
            }
            SettingKey::CliInfoEndpoint => repo.set_cli_info_endpoint(value),
            SettingKey::CheckVersionDisabled => {
                repo.set_check_cli_version_disabled(parse_bool(value)?);
            }
            SettingKey::UsageStatsDisabled => repo.set_usage_stats_disabled(parse_bool(value)?),
            SettingKey::ConsoleEndpoint => repo.set_console_endpoint(value),
            SettingKey::IamEndpoint => repo.set_iam_endpoint(value),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => Err("expected true or false".to_string()),
    }
}

/// Color is stored as `"true"`, `"false"` or empty for auto
fn parse_color(value: &str) -> Result<&'static str, String> {
    match value.to_lowercase().as_str() {
        "auto" | "" => Ok(""),
        other => parse_bool(other).map(|b| if b { "true" } else { "false" }),
    }
}
