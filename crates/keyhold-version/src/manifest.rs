// ABOUTME: Per-platform release manifest and platform channel selection.
// ABOUTME: JSON document with one semantic version string per platform.

use crate::error::Result;
use semver::Version;
use serde::{Deserialize, Serialize};

/// Platform channels a release manifest carries versions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    /// The channel for the build target this crate was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

/// The latest released version per platform, as published by the version
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseManifest {
    pub linux: String,
    pub darwin: String,
    pub windows: String,
}

impl ReleaseManifest {
    /// Parse the version string for the given platform channel.
    ///
    /// # Errors
    /// Returns `VersionError::InvalidVersion` if the channel's string does
    /// not conform to semantic-versioning grammar.
    pub fn version_for(&self, platform: Platform) -> Result<Version> {
        let raw = match platform {
            Platform::Linux => &self.linux,
            Platform::MacOs => &self.darwin,
            Platform::Windows => &self.windows,
        };
        Ok(Version::parse(raw)?)
    }
}
