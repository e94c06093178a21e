// ABOUTME: The version-source collaborator seam and its HTTP implementation.
// ABOUTME: Fetches the per-platform release manifest as a blocking call.

use crate::error::{Result, VersionError};
use crate::manifest::ReleaseManifest;
use std::time::Duration;
use tracing::debug;

/// A collaborator that can produce the latest release manifest.
///
/// Calls are blocking; retry and backoff policy belong to the caller that
/// composes the implementation.
pub trait VersionSource {
    /// Fetch the current release manifest.
    ///
    /// # Errors
    /// Returns `VersionError::FetchFailed` if no manifest can be produced.
    fn fetch_latest(&self) -> Result<ReleaseManifest>;
}

/// Fetches the release manifest as JSON from a configured URL.
#[derive(Debug, Clone)]
pub struct HttpVersionSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpVersionSource {
    /// Build a source for the given manifest URL with fixed request timeouts.
    ///
    /// # Errors
    /// Returns `VersionError::FetchFailed` if the HTTP client cannot be
    /// constructed.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| VersionError::FetchFailed(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl VersionSource for HttpVersionSource {
    fn fetch_latest(&self) -> Result<ReleaseManifest> {
        debug!(url = %self.url, "fetching latest version manifest");
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| VersionError::FetchFailed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(VersionError::FetchFailed(format!(
                "version endpoint returned {}",
                response.status()
            )));
        }
        response
            .json()
            .map_err(|e| VersionError::FetchFailed(format!("invalid manifest: {e}")))
    }
}
