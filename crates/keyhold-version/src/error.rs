// ABOUTME: Error types for version tracking using thiserror.
// ABOUTME: Covers version grammar, manifest fetching, and the cache store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving latest or cached versions.
#[derive(Error, Debug)]
pub enum VersionError {
    /// A version string does not conform to semantic-versioning grammar.
    #[error("invalid version string: {0}")]
    InvalidVersion(#[from] semver::Error),

    /// The fetch collaborator could not produce a release manifest.
    #[error("failed to fetch latest version manifest: {0}")]
    FetchFailed(String),

    /// No cached release manifest exists.
    #[error("no cached version manifest")]
    CacheMiss,

    /// Failed to write the release manifest to the cache store.
    #[error("failed to write version cache to {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using VersionError.
pub type Result<T> = std::result::Result<T, VersionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_invalid_version_display() {
        let err = VersionError::from(semver::Version::parse("not a version").unwrap_err());
        let display = format!("{}", err);
        assert!(display.contains("invalid version string"));
    }

    #[test]
    fn test_fetch_failed_display() {
        let err = VersionError::FetchFailed("connection refused".to_string());
        let display = format!("{}", err);
        assert!(display.contains("failed to fetch latest version manifest"));
        assert!(display.contains("connection refused"));
    }

    #[test]
    fn test_cache_miss_display() {
        assert_eq!(format!("{}", VersionError::CacheMiss), "no cached version manifest");
    }

    #[test]
    fn test_cache_write_display_and_source() {
        use std::error::Error;

        let err = VersionError::CacheWrite {
            path: PathBuf::from("/tmp/latest.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
        };
        let display = format!("{}", err);
        assert!(display.contains("failed to write version cache"));
        assert!(display.contains("/tmp/latest.json"));
        assert!(err.source().is_some());
    }
}
