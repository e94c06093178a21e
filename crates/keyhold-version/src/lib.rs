// ABOUTME: Semantic version tracking for keyhold - current, latest, cached latest
// ABOUTME: Comparison primitives plus the fetch and cache collaborator seams

pub mod error;
pub mod manifest;
pub mod source;
pub mod store;

pub use error::{Result, VersionError};
pub use manifest::{Platform, ReleaseManifest};
pub use source::{HttpVersionSource, VersionSource};
pub use store::{FileVersionStore, VersionStore};

use semver::Version;
use tracing::debug;

/// Version of the running application, embedded at build time.
pub fn current_version() -> Version {
    Version::parse(env!("CARGO_PKG_VERSION")).expect("CARGO_PKG_VERSION is valid semver")
}

/// Latest version for `platform`, obtained from the fetch collaborator.
///
/// # Errors
/// Returns `VersionError::FetchFailed` if no manifest can be produced, or
/// `VersionError::InvalidVersion` if the channel string is malformed.
pub fn latest_version(source: &impl VersionSource, platform: Platform) -> Result<Version> {
    source.fetch_latest()?.version_for(platform)
}

/// Latest version for `platform`, obtained from the cache-store collaborator.
///
/// # Errors
/// Returns `VersionError::CacheMiss` if no manifest has been cached, or
/// `VersionError::InvalidVersion` if the cached channel string is malformed.
pub fn cached_latest_version(store: &impl VersionStore, platform: Platform) -> Result<Version> {
    store.read_cached()?.version_for(platform)
}

/// True when `latest` is strictly newer than `current` under semantic-version
/// ordering. Whether to act on it is the caller's policy.
pub fn update_available(current: &Version, latest: &Version) -> bool {
    latest > current
}

/// Composes a version source with a cache store.
#[derive(Debug)]
pub struct VersionTracker<S, C> {
    source: S,
    store: C,
}

impl<S: VersionSource, C: VersionStore> VersionTracker<S, C> {
    pub fn new(source: S, store: C) -> Self {
        Self { source, store }
    }

    /// Latest version for `platform`, fetched from the source.
    pub fn latest(&self, platform: Platform) -> Result<Version> {
        latest_version(&self.source, platform)
    }

    /// Latest version for `platform`, as recorded in the cache store.
    pub fn cached_latest(&self, platform: Platform) -> Result<Version> {
        cached_latest_version(&self.store, platform)
    }

    /// Fetch the manifest and write it through to the cache store.
    ///
    /// # Errors
    /// Returns the fetch or cache-write error unchanged; a failed fetch
    /// leaves the cache untouched.
    pub fn refresh(&self) -> Result<ReleaseManifest> {
        let manifest = self.source.fetch_latest()?;
        self.store.write_cache(&manifest)?;
        debug!(linux = %manifest.linux, "refreshed version cache");
        Ok(manifest)
    }
}
