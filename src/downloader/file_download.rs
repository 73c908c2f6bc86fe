//! HTTP file downloads into a directory
//!
//! Used to fetch plugin binaries. The destination is created exclusively, so
//! an existing file is never overwritten.

use crate::domain::{DownloadError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_DISPOSITION, USER_AGENT};
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use url::Url;

const DEFAULT_USER_AGENT: &str = "bluemix-cli";
const FALLBACK_FILE_NAME: &str = "index.html";

/// Receives progress of a running download
pub trait ProgressObserver: Send + Sync {
    /// Called once before the body is read; `total` is the Content-Length if known
    fn start(&self, total: Option<u64>);

    fn advance(&self, bytes: u64);

    /// Called once after the body was read, whether or not it succeeded
    fn finish(&self);
}

/// Downloads files into `save_dir`
pub struct FileDownloader {
    save_dir: PathBuf,
    default_headers: HeaderMap,
    client: reqwest::Client,
    progress: Option<Arc<dyn ProgressObserver>>,
}

impl FileDownloader {
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
            default_headers: HeaderMap::new(),
            client: reqwest::Client::new(),
            progress: None,
        }
    }

    /// Rebuilds the HTTP client with a request timeout; `0` means no timeout
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Request`] if the client cannot be built.
    pub fn with_timeout(mut self, seconds: u64) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if seconds > 0 {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        self.client = builder
            .build()
            .map_err(|e| DownloadError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    /// Adds a header sent with every request
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Request`] if the name or value is not a valid header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| DownloadError::Request(format!("invalid header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| DownloadError::Request(format!("invalid header value: {e}")))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    pub fn with_progress(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.progress = Some(observer);
        self
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Downloads `url`, naming the file after the response
    ///
    /// # Errors
    ///
    /// See [`FileDownloader::download_to`].
    pub async fn download(&self, url: &str) -> Result<(PathBuf, u64)> {
        self.download_to(url, None).await
    }

    /// Downloads `url` to `output_name` (or a name derived from the response)
    ///
    /// Returns the destination path and the number of bytes written.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::Request`] if the URL is invalid or the request fails
    /// - [`DownloadError::UnexpectedStatus`] for any status other than 200
    /// - [`DownloadError::FileExists`] if the destination already exists
    /// - [`DownloadError::Io`] if the file cannot be written
    pub async fn download_to(&self, url: &str, output_name: Option<&str>) -> Result<(PathBuf, u64)> {
        let url = Url::parse(url).map_err(|e| DownloadError::Request(format!("{url}: {e}")))?;

        let mut request = self.client.get(url.clone()).headers(self.default_headers.clone());
        if !self.default_headers.contains_key(USER_AGENT) {
            request = request.header(USER_AGENT, DEFAULT_USER_AGENT);
        }

        let mut response = request
            .send()
            .await
            .map_err(|e| DownloadError::Request(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(url = %url, status = status.as_u16(), "Download rejected");
            return Err(DownloadError::UnexpectedStatus {
                status: status.as_u16(),
            }
            .into());
        }

        let name = match output_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => output_name_for(&response),
        };
        let dest = self.save_dir.join(name);
        let mut file = self.create_exclusive(&dest).await?;

        if let Some(progress) = &self.progress {
            progress.start(response.content_length());
        }
        let copied = copy_body(&mut response, &mut file, &dest, self.progress.as_deref()).await;
        if let Some(progress) = &self.progress {
            progress.finish();
        }
        let size = copied?;

        tracing::info!(url = %url, dest = %dest.display(), bytes = size, "Download complete");
        Ok((dest, size))
    }

    /// Deletes the save directory and everything in it
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be removed.
    pub async fn remove_dir(&self) -> Result<()> {
        match fs::remove_dir_all(&self.save_dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_exclusive(&self, dest: &Path) -> Result<File> {
        let io_error = |e: std::io::Error| DownloadError::Io {
            path: dest.display().to_string(),
            message: e.to_string(),
        };

        fs::create_dir_all(&self.save_dir).await.map_err(io_error)?;

        let mut options = OpenOptions::new();
        options.read(true).write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        options.open(dest).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                DownloadError::FileExists(dest.display().to_string()).into()
            } else {
                io_error(e).into()
            }
        })
    }
}

async fn copy_body(
    response: &mut reqwest::Response,
    file: &mut File,
    dest: &Path,
    progress: Option<&dyn ProgressObserver>,
) -> Result<u64> {
    let io_error = |e: std::io::Error| DownloadError::Io {
        path: dest.display().to_string(),
        message: e.to_string(),
    };

    let mut size = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| DownloadError::Request(e.to_string()))?
    {
        file.write_all(&chunk).await.map_err(io_error)?;
        size += chunk.len() as u64;
        if let Some(progress) = progress {
            progress.advance(chunk.len() as u64);
        }
    }
    file.flush().await.map_err(io_error)?;
    Ok(size)
}

fn output_name_for(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(file_name_from_header)
        .or_else(|| file_name_from_url(response.url()))
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// `filename=` parameter of a Content-Disposition header, quotes trimmed
fn file_name_from_header(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|field| field.strip_prefix("filename="))
        .map(|name| name.trim_matches('"'))
        .and_then(base_name)
}

/// Last non-empty path segment of `url`
fn file_name_from_url(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .and_then(base_name)
}

/// Final component of `name`, rejecting anything that would escape the save dir
fn base_name(name: &str) -> Option<String> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}
