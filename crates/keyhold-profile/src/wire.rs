// ABOUTME: SSH wire-format public key decoding.
// ABOUTME: Length-prefixed algorithm name plus type-specific fields, per RFC 4253.

use crate::error::{ProfileError, Result};

/// Cursor over SSH wire data.
///
/// The wire format is a sequence of SSH strings: a 4-byte big-endian length
/// prefix followed by that many bytes. Multi-precision integers (mpints) are
/// SSH strings whose payload may carry a leading zero byte as sign padding.
struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self
            .data
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| ProfileError::InvalidKeyFormat("truncated length prefix".to_string()))?;
        self.pos += 4;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_string(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u32()? as usize;
        let end = self.pos.checked_add(len).ok_or_else(|| {
            ProfileError::InvalidKeyFormat("field length overflows input".to_string())
        })?;
        let bytes = self.data.get(self.pos..end).ok_or_else(|| {
            ProfileError::InvalidKeyFormat(format!(
                "field of {} bytes exceeds remaining input",
                len
            ))
        })?;
        self.pos = end;
        Ok(bytes)
    }

    fn read_mpint(&mut self) -> Result<Vec<u8>> {
        let raw = self.read_string()?;
        // Strip sign padding so the bytes are the canonical magnitude.
        let start = raw.iter().position(|&b| b != 0).unwrap_or(raw.len());
        Ok(raw[start..].to_vec())
    }

    fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn is_empty(&self) -> bool {
        self.pos == self.data.len()
    }
}

/// RSA public key parameters recovered from the wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    /// Public exponent, big-endian, sign padding stripped.
    pub exponent: Vec<u8>,
    /// Modulus, big-endian, sign padding stripped.
    pub modulus: Vec<u8>,
}

impl RsaPublicKey {
    /// Bit length of the modulus (e.g. 2048 or 4096 for common keys).
    pub fn modulus_bits(&self) -> usize {
        match self.modulus.first() {
            Some(first) => (self.modulus.len() - 1) * 8 + (8 - first.leading_zeros() as usize),
            None => 0,
        }
    }
}

/// A decoded SSH public key.
///
/// The variant is selected by the algorithm name embedded in the wire bytes.
/// Algorithms this crate does not interpret are preserved as [`PublicKey::Other`]
/// with their payload left opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// `ssh-rsa`: public exponent followed by modulus.
    Rsa(RsaPublicKey),
    /// `ssh-ed25519`: 32-byte public key.
    Ed25519(Vec<u8>),
    /// `ecdsa-sha2-*`: curve identifier and encoded curve point.
    Ecdsa {
        algorithm: String,
        curve: String,
        point: Vec<u8>,
    },
    /// Any algorithm this crate does not interpret.
    Other { algorithm: String, data: Vec<u8> },
}

impl PublicKey {
    /// Decode an SSH wire-format public key.
    ///
    /// # Errors
    /// Returns `ProfileError::InvalidKeyFormat` if the algorithm name or the
    /// type-specific fields are truncated or malformed, or if a recognized key
    /// type carries trailing bytes.
    pub fn parse(wire: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(wire);
        let algorithm = std::str::from_utf8(reader.read_string()?)
            .map_err(|_| {
                ProfileError::InvalidKeyFormat("algorithm name is not valid UTF-8".to_string())
            })?
            .to_string();

        let key = match algorithm.as_str() {
            "ssh-rsa" => {
                // Wire order is exponent then modulus.
                let exponent = reader.read_mpint()?;
                let modulus = reader.read_mpint()?;
                PublicKey::Rsa(RsaPublicKey { exponent, modulus })
            }
            "ssh-ed25519" => {
                let bytes = reader.read_string()?.to_vec();
                if bytes.len() != 32 {
                    return Err(ProfileError::InvalidKeyFormat(format!(
                        "ed25519 key is {} bytes, expected 32",
                        bytes.len()
                    )));
                }
                PublicKey::Ed25519(bytes)
            }
            name if name.starts_with("ecdsa-sha2-") => {
                let curve = std::str::from_utf8(reader.read_string()?)
                    .map_err(|_| {
                        ProfileError::InvalidKeyFormat(
                            "curve identifier is not valid UTF-8".to_string(),
                        )
                    })?
                    .to_string();
                if algorithm != format!("ecdsa-sha2-{curve}") {
                    return Err(ProfileError::InvalidKeyFormat(format!(
                        "curve {curve} does not match algorithm {algorithm}"
                    )));
                }
                let point = reader.read_string()?.to_vec();
                PublicKey::Ecdsa {
                    algorithm,
                    curve,
                    point,
                }
            }
            _ => {
                // Unknown algorithms keep their payload opaque; there is no
                // structure to validate.
                return Ok(PublicKey::Other {
                    algorithm,
                    data: reader.remaining().to_vec(),
                });
            }
        };

        if !reader.is_empty() {
            return Err(ProfileError::InvalidKeyFormat(format!(
                "{} trailing bytes after key material",
                reader.remaining().len()
            )));
        }
        Ok(key)
    }

    /// Canonical algorithm name, as embedded in the wire encoding.
    ///
    /// This is the first token of an authorized-keys line.
    pub fn algorithm(&self) -> &str {
        match self {
            PublicKey::Rsa(_) => "ssh-rsa",
            PublicKey::Ed25519(_) => "ssh-ed25519",
            PublicKey::Ecdsa { algorithm, .. } => algorithm,
            PublicKey::Other { algorithm, .. } => algorithm,
        }
    }

    /// View the key as RSA parameters.
    ///
    /// # Errors
    /// Returns `ProfileError::NotRsa` naming the actual algorithm for any
    /// other variant.
    pub fn as_rsa(&self) -> Result<&RsaPublicKey> {
        match self {
            PublicKey::Rsa(rsa) => Ok(rsa),
            other => Err(ProfileError::NotRsa(other.algorithm().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Append an SSH string (4-byte length prefix + payload).
    fn put_string(out: &mut Vec<u8>, payload: &[u8]) {
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(payload);
    }

    fn ed25519_wire(key_bytes: &[u8; 32]) -> Vec<u8> {
        let mut wire = Vec::new();
        put_string(&mut wire, b"ssh-ed25519");
        put_string(&mut wire, key_bytes);
        wire
    }

    #[test]
    fn test_parse_ed25519() {
        let key_bytes = [0x42u8; 32];
        let wire = ed25519_wire(&key_bytes);

        let key = PublicKey::parse(&wire).expect("should parse ed25519 key");
        assert_eq!(key, PublicKey::Ed25519(key_bytes.to_vec()));
        assert_eq!(key.algorithm(), "ssh-ed25519");
    }

    #[test]
    fn test_parse_known_openssh_key() {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine;

        // The base64 field of an authorized_keys line IS the wire encoding.
        let encoded = "AAAAC3NzaC1lZDI1NTE5AAAAIO3mepiIGcR/X0pUqTHo4qI27NLDq/DXpX/C2m+nGcM9";
        let wire = STANDARD.decode(encoded).expect("should decode base64");

        let key = PublicKey::parse(&wire).expect("should parse wire key");
        assert_eq!(key.algorithm(), "ssh-ed25519");
        match key {
            PublicKey::Ed25519(bytes) => assert_eq!(bytes.len(), 32),
            other => panic!("expected ed25519, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rsa_strips_sign_padding() {
        let mut wire = Vec::new();
        put_string(&mut wire, b"ssh-rsa");
        put_string(&mut wire, &[0x01, 0x00, 0x01]);
        // High bit set, so the wire carries a leading zero byte.
        put_string(&mut wire, &[0x00, 0xC3, 0x5E, 0x77, 0x21]);

        let key = PublicKey::parse(&wire).expect("should parse rsa key");
        assert_eq!(key.algorithm(), "ssh-rsa");

        let rsa = key.as_rsa().expect("should view as rsa");
        assert_eq!(rsa.exponent, vec![0x01, 0x00, 0x01]);
        assert_eq!(rsa.modulus, vec![0xC3, 0x5E, 0x77, 0x21], "sign padding should be stripped");
        assert_eq!(rsa.modulus_bits(), 32);
    }

    #[test]
    fn test_parse_ecdsa() {
        let mut wire = Vec::new();
        put_string(&mut wire, b"ecdsa-sha2-nistp256");
        put_string(&mut wire, b"nistp256");
        put_string(&mut wire, &[0x04, 0x01, 0x02]);

        let key = PublicKey::parse(&wire).expect("should parse ecdsa key");
        assert_eq!(key.algorithm(), "ecdsa-sha2-nistp256");
        match key {
            PublicKey::Ecdsa { curve, point, .. } => {
                assert_eq!(curve, "nistp256");
                assert_eq!(point, vec![0x04, 0x01, 0x02]);
            }
            other => panic!("expected ecdsa, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_ecdsa_curve_mismatch() {
        let mut wire = Vec::new();
        put_string(&mut wire, b"ecdsa-sha2-nistp256");
        put_string(&mut wire, b"nistp384");
        put_string(&mut wire, &[0x04]);

        let err = PublicKey::parse(&wire).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidKeyFormat(_)));
    }

    #[test]
    fn test_parse_unknown_algorithm_preserved() {
        let mut wire = Vec::new();
        put_string(&mut wire, b"sk-ssh-ed25519@openssh.com");
        wire.extend_from_slice(&[0xAA, 0xBB, 0xCC]);

        let key = PublicKey::parse(&wire).expect("should accept unknown algorithm");
        assert_eq!(key.algorithm(), "sk-ssh-ed25519@openssh.com");
        match key {
            PublicKey::Other { data, .. } => assert_eq!(data, vec![0xAA, 0xBB, 0xCC]),
            other => panic!("expected other, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_truncated_length_prefix() {
        // Fewer than 4 bytes cannot even carry a length prefix.
        let err = PublicKey::parse(&[0x00, 0x00]).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidKeyFormat(_)));
    }

    #[test]
    fn test_parse_length_exceeds_input() {
        // Claims an 11-byte algorithm name but carries only 3.
        let mut wire = Vec::new();
        wire.extend_from_slice(&11u32.to_be_bytes());
        wire.extend_from_slice(b"ssh");

        let err = PublicKey::parse(&wire).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidKeyFormat(_)));
    }

    #[test]
    fn test_parse_truncated_key_material() {
        let mut wire = Vec::new();
        put_string(&mut wire, b"ssh-ed25519");
        wire.extend_from_slice(&32u32.to_be_bytes());
        wire.extend_from_slice(&[0u8; 7]);

        let err = PublicKey::parse(&wire).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidKeyFormat(_)));
    }

    #[test]
    fn test_parse_rejects_trailing_bytes() {
        let mut wire = ed25519_wire(&[0u8; 32]);
        wire.push(0xFF);

        let err = PublicKey::parse(&wire).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidKeyFormat(_)));
    }

    #[test]
    fn test_parse_empty_input() {
        let err = PublicKey::parse(&[]).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidKeyFormat(_)));
    }

    #[test]
    fn test_as_rsa_rejects_other_variants() {
        let key = PublicKey::parse(&ed25519_wire(&[0u8; 32])).expect("should parse");
        let err = key.as_rsa().unwrap_err();
        match err {
            ProfileError::NotRsa(algorithm) => assert_eq!(algorithm, "ssh-ed25519"),
            other => panic!("expected NotRsa, got {other:?}"),
        }
    }

    #[test]
    fn test_cross_validate_against_ssh_key_crate() {
        // The ssh-key crate produces the same wire encoding this module parses.
        let private_key =
            ssh_key::PrivateKey::random(&mut rand::thread_rng(), ssh_key::Algorithm::Ed25519)
                .expect("should generate ed25519 key");
        let wire = private_key
            .public_key()
            .to_bytes()
            .expect("should encode wire key");

        let key = PublicKey::parse(&wire).expect("should parse generated key");
        match (&key, private_key.public_key().key_data()) {
            (PublicKey::Ed25519(bytes), ssh_key::public::KeyData::Ed25519(ed)) => {
                assert_eq!(bytes.as_slice(), ed.as_ref());
            }
            other => panic!("expected matching ed25519 keys, got {other:?}"),
        }
    }
}
