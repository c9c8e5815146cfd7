//! Redirect-based artifact resolution
//!
//! The upstream download endpoint answers with an HTTP redirect whose
//! `Location` header points at the real artifact. The resolver issues that
//! one request with redirect-following disabled and infers the on-disk file
//! name from the redirect target. The response is handed onward un-consumed;
//! exactly one outbound request is made per artifact.

use reqwest::header::LOCATION;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::DownloadConfig;
use crate::error::Result;

/// Resolves project/file identifier pairs to downloadable artifacts
pub struct RedirectResolver {
    client: reqwest::Client,
    base_url: String,
}

/// Result of one resolution attempt
pub struct Resolution {
    /// File name inferred from the `Location` header; empty when the header
    /// is absent or malformed, which signals "mod not found"
    pub file_name: String,
    /// The un-consumed response whose body is the artifact payload
    pub response: reqwest::Response,
}

impl RedirectResolver {
    /// Create a resolver for the configured endpoint
    ///
    /// The underlying client never follows redirects; the `Location` header
    /// is the sole signal consumed from the endpoint.
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a resolver with an explicit base URL and timeout
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let config = DownloadConfig {
            api_base_url: base_url.into(),
            request_timeout_secs: timeout.as_secs().max(1),
            ..DownloadConfig::default()
        };
        Self::new(&config)
    }

    /// Canonical download URL for a project/file identifier pair
    pub fn download_url(&self, project_id: u64, file_id: u64) -> String {
        format!(
            "{}/mods/{}/files/{}/download",
            self.base_url, project_id, file_id
        )
    }

    /// Resolve one artifact
    ///
    /// Network-level failures (connection error, timeout) are fatal for the
    /// run and propagate as [`crate::Error::Network`]. An absent or malformed
    /// `Location` header is not an error: it yields an empty file name.
    pub async fn resolve(&self, project_id: u64, file_id: u64) -> Result<Resolution> {
        let url = self.download_url(project_id, file_id);
        let response = self.client.get(&url).send().await?;

        let file_name = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(file_name_from_location)
            .unwrap_or_default();

        debug!(project_id, file_id, file_name = %file_name, "resolved redirect");

        Ok(Resolution {
            file_name,
            response,
        })
    }
}

/// Infer a file name from a redirect target
///
/// The name is the final path segment with any query string stripped. A
/// target with no usable segment yields an empty name.
pub(crate) fn file_name_from_location(location: &str) -> String {
    if let Ok(url) = Url::parse(location) {
        return url
            .path_segments()
            .and_then(|segments| segments.last())
            .unwrap_or_default()
            .to_string();
    }

    // Relative or otherwise unparseable target: split by hand.
    let path = location.split('?').next().unwrap_or_default();
    path.rsplit('/').next().unwrap_or_default().to_string()
}
