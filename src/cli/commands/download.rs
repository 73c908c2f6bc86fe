//! Download command implementation

use super::{EXIT_FAILURE, EXIT_OK};
use crate::config::BxConfigRepository;
use crate::domain::{DownloadError, SdkError};
use crate::downloader::FileDownloader;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// URL to download
    pub url: String,

    /// Directory to save into
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// File name to save as (defaults to the server-provided name)
    #[arg(short, long)]
    pub output: Option<String>,
}

impl DownloadArgs {
    /// Execute the download command
    ///
    /// Uses the configured HTTP timeout when it is positive.
    pub async fn execute(&self, repo: &BxConfigRepository) -> anyhow::Result<i32> {
        let mut downloader = FileDownloader::new(&self.dir);
        let timeout = repo.http_timeout();
        if timeout > 0 {
            downloader = downloader.with_timeout(timeout as u64)?;
        }

        tracing::info!(url = %self.url, dir = %self.dir.display(), "Starting download");

        match downloader.download_to(&self.url, self.output.as_deref()).await {
            Ok((dest, size)) => {
                tracing::info!(path = %dest.display(), bytes = size, "Download complete");
                println!("✅ Saved {} bytes to {}", size, dest.display());
                Ok(EXIT_OK)
            }
            Err(SdkError::Download(DownloadError::FileExists(path))) => {
                println!("❌ {path} already exists");
                Ok(EXIT_FAILURE)
            }
            Err(e) => {
                tracing::error!(error = %e, url = %self.url, "Download failed");
                println!("❌ Download failed: {e}");
                Ok(EXIT_FAILURE)
            }
        }
    }
}
