// ABOUTME: SSH public key fingerprint computation.
// ABOUTME: SHA256 digest over the raw wire-format key bytes.

use sha2::{Digest, Sha256};

/// Compute the SHA256 fingerprint of an SSH wire-format public key.
///
/// The digest is taken over the raw wire bytes, so it matches what
/// `sha256.Sum256` over `ssh.PublicKey.Marshal()` output would produce.
/// Deterministic, no error path: any byte sequence has a fingerprint.
pub fn ssh_fingerprint(wire: &[u8]) -> [u8; 32] {
    Sha256::digest(wire).into()
}

/// The SHA256 fingerprint as a 64-character lowercase hex string.
pub fn ssh_fingerprint_hex(wire: &[u8]) -> String {
    hex::encode(ssh_fingerprint(wire))
}
