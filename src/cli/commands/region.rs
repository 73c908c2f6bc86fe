//! Region and cloud commands

use super::{EXIT_OK, EXIT_USAGE};
use crate::config::BxConfigRepository;
use crate::domain::models::{cloud_name, Region};
use clap::Args;

/// Arguments for the region command
#[derive(Args, Debug)]
pub struct RegionArgs {
    /// Region id, `customer:deployment:locationcode`
    #[arg(long)]
    pub id: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// Region type
    #[arg(long = "type", default_value = "public")]
    pub region_type: String,
}

impl RegionArgs {
    /// Execute the region command
    pub fn execute(&self, repo: &BxConfigRepository) -> anyhow::Result<i32> {
        if self.id.split(':').count() != 3 {
            println!("❌ Region id must look like customer:deployment:locationcode");
            return Ok(EXIT_USAGE);
        }

        let region = Region::new(&self.id, &self.name, &self.region_type);
        if cloud_name(&region.id).is_empty() {
            tracing::warn!(region_id = %region.id, "Region id does not map to a known cloud");
        }

        repo.set_region(region);
        tracing::info!(region = %self.name, "Region selected");
        println!("✅ Region set to {} ({})", self.name, self.id);
        Ok(EXIT_OK)
    }
}

/// Arguments for the cloud command
#[derive(Args, Debug)]
pub struct CloudArgs {}

impl CloudArgs {
    /// Execute the cloud command
    pub fn execute(&self, repo: &BxConfigRepository) -> anyhow::Result<i32> {
        println!("Cloud name: {}", repo.cloud_name());
        println!("Cloud type: {}", repo.cloud_type());
        Ok(EXIT_OK)
    }
}
