// ABOUTME: The cache-store collaborator seam and its JSON-file implementation.
// ABOUTME: A missing or unreadable cache is a miss, never a default version.

use crate::error::{Result, VersionError};
use crate::manifest::ReleaseManifest;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A collaborator that remembers the most recently fetched release manifest.
pub trait VersionStore {
    /// Read the cached release manifest.
    ///
    /// # Errors
    /// Returns `VersionError::CacheMiss` if no manifest has been cached.
    fn read_cached(&self) -> Result<ReleaseManifest>;

    /// Replace the cached release manifest.
    ///
    /// # Errors
    /// Returns `VersionError::CacheWrite` if the manifest cannot be stored.
    fn write_cache(&self, manifest: &ReleaseManifest) -> Result<()>;
}

/// Caches the release manifest as a JSON file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileVersionStore {
    path: PathBuf,
}

impl FileVersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default cache location under the XDG config dir
    /// (~/.config/keyhold/latest.json).
    ///
    /// Uses `XDG_CONFIG_HOME` if set, otherwise falls back to `~/.config`.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|p| p.join("keyhold").join("latest.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VersionStore for FileVersionStore {
    fn read_cached(&self) -> Result<ReleaseManifest> {
        let raw = std::fs::read_to_string(&self.path).map_err(|_| VersionError::CacheMiss)?;
        // A corrupt cache is treated the same as a missing one.
        serde_json::from_str(&raw).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "discarding unreadable version cache");
            VersionError::CacheMiss
        })
    }

    fn write_cache(&self, manifest: &ReleaseManifest) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| VersionError::CacheWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(manifest).map_err(|e| VersionError::CacheWrite {
            path: self.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        std::fs::write(&self.path, json).map_err(|e| VersionError::CacheWrite {
            path: self.path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manifest() -> ReleaseManifest {
        ReleaseManifest {
            linux: "2.1.0".to_string(),
            darwin: "2.1.0".to_string(),
            windows: "2.1.0".to_string(),
        }
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let store = FileVersionStore::new(temp_dir.path().join("latest.json"));

        store.write_cache(&manifest()).expect("should write cache");
        let cached = store.read_cached().expect("should read cache");
        assert_eq!(cached, manifest());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let store = FileVersionStore::new(temp_dir.path().join("nested").join("latest.json"));

        store.write_cache(&manifest()).expect("should write cache");
        assert!(store.path().exists());
    }

    #[test]
    fn test_missing_cache_is_a_miss() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let store = FileVersionStore::new(temp_dir.path().join("absent.json"));

        let err = store.read_cached().unwrap_err();
        assert!(matches!(err, VersionError::CacheMiss));
    }

    #[test]
    fn test_corrupt_cache_is_a_miss() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let path = temp_dir.path().join("latest.json");
        std::fs::write(&path, "{{ not json").expect("should write file");

        let store = FileVersionStore::new(path);
        let err = store.read_cached().unwrap_err();
        assert!(matches!(err, VersionError::CacheMiss));
    }

    #[test]
    fn test_write_replaces_previous_manifest() {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let store = FileVersionStore::new(temp_dir.path().join("latest.json"));

        store.write_cache(&manifest()).expect("should write cache");
        let mut newer = manifest();
        newer.linux = "2.2.0".to_string();
        store.write_cache(&newer).expect("should overwrite cache");

        let cached = store.read_cached().expect("should read cache");
        assert_eq!(cached.linux, "2.2.0");
    }

    #[test]
    fn test_default_path_is_under_keyhold_dir() {
        if let Some(path) = FileVersionStore::default_path() {
            assert!(path.ends_with("latest.json"));
            assert!(path.to_string_lossy().contains("keyhold"));
        }
    }
}
