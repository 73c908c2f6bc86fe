//! File downloads
//!
//! # Example
//!
//! ```no_run
//! use bxconfig::downloader::FileDownloader;
//!
//! # async fn example() -> bxconfig::domain::Result<()> {
//! let downloader = FileDownloader::new("/tmp/plugins").with_timeout(60)?;
//! let (dest, size) = downloader.download("https://plugins.example.com/cf.tgz").await?;
//! println!("saved {} bytes to {}", size, dest.display());
//! # Ok(())
//! # }
//! ```

pub mod file_download;

pub use file_download::{FileDownloader, ProgressObserver};
