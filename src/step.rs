//! Single-entry download execution
//!
//! A step is the unit of work for one manifest entry: pace, resolve, stream
//! to disk, classify. Steps are issued strictly one at a time by the engine;
//! the classification rules are:
//!
//! - network failure during resolution → fatal
//! - empty resolved name, or destination not creatable → recoverable
//!   [`Outcome::Failure`] ("mod not found"), no file left behind
//! - I/O failure while copying the body → fatal

use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::DownloadConfig;
use crate::error::Result;
use crate::manifest::ManifestEntry;
use crate::resolver::RedirectResolver;
use crate::types::Outcome;

/// Executes one download per manifest entry
pub struct DownloadStep {
    resolver: Arc<RedirectResolver>,
    download_dir: PathBuf,
    pacing_delay: Duration,
}

impl DownloadStep {
    /// Create a step executor writing into the configured destination
    pub fn new(resolver: Arc<RedirectResolver>, config: &DownloadConfig) -> Self {
        Self {
            resolver,
            download_dir: config.download_dir.clone(),
            pacing_delay: config.pacing_delay(),
        }
    }

    /// Run the step for one entry and classify the result
    ///
    /// The pacing delay fires exactly once per entry, unconditionally,
    /// before the resolution attempt.
    pub async fn run(&self, entry: &ManifestEntry) -> Result<Outcome> {
        tokio::time::sleep(self.pacing_delay).await;

        let resolution = self
            .resolver
            .resolve(entry.project_id, entry.file_id)
            .await?;

        if resolution.file_name.is_empty() {
            debug!(
                project_id = entry.project_id,
                file_id = entry.file_id,
                "no redirect target"
            );
            return Ok(Outcome::not_found(&entry.display_name));
        }

        let destination = self.download_dir.join(&resolution.file_name);
        let file = match File::create(&destination).await {
            Ok(file) => file,
            Err(error) => {
                warn!(
                    destination = %destination.display(),
                    %error,
                    "could not create destination file"
                );
                return Ok(Outcome::not_found(&entry.display_name));
            }
        };

        write_artifact(file, resolution.response).await?;

        Ok(Outcome::Success {
            resolved_name: resolution.file_name,
        })
    }
}

/// Stream a response body into an open file, byte for byte
///
/// Flushes before returning so a completed step never leaves buffered data
/// behind. Copy errors propagate as fatal.
async fn write_artifact(mut file: File, response: reqwest::Response) -> Result<()> {
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(())
}
