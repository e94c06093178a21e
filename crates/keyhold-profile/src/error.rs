// ABOUTME: Error types for identity profile operations using thiserror.
// ABOUTME: Provides typed errors for wire decoding, packet scanning, and armoring.

use thiserror::Error;

/// Errors that can occur while deriving representations from a profile.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// The SSH wire-format public key is truncated or malformed.
    #[error("invalid SSH wire key format: {0}")]
    InvalidKeyFormat(String),

    /// The decoded key is not an RSA key.
    #[error("not an RSA key: {0}")]
    NotRsa(String),

    /// The profile has no linked PGP public key.
    #[error("no pgp public key")]
    NoPgpKey,

    /// An OpenPGP packet header is truncated or invalid.
    #[error("malformed OpenPGP packet stream: {0}")]
    MalformedPacketStream(String),

    /// The OpenPGP packet stream contains no public-key packet.
    #[error("no pgp public key packet found")]
    NoPgpKeyPacket,

    /// An ASCII-armored block could not be decoded.
    #[error("invalid ASCII armor: {0}")]
    InvalidArmor(String),
}

/// Result type alias using ProfileError.
pub type Result<T> = std::result::Result<T, ProfileError>;
