// ABOUTME: The identity profile value and its derived representations.
// ABOUTME: Authorized-keys lines, fingerprints, armored PGP blocks, and equality.

use crate::armor::{self, ArmorHeaders};
use crate::error::{ProfileError, Result};
use crate::fingerprint::ssh_fingerprint;
use crate::pgp::pgp_fingerprint;
use crate::wire::{PublicKey, RsaPublicKey};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Serde adapters matching the original JSON wire representation, where byte
/// fields travel as standard base64 strings.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(&encoded).map_err(serde::de::Error::custom)
    }
}

mod base64_bytes_opt {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => STANDARD
                .decode(&encoded)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// A client's cryptographic identity: an SSH public key in wire format, an
/// email, and an optional linked PGP public key.
///
/// The profile is immutable once constructed; every derived representation is
/// a pure function of these fields, so shared reads across threads are safe.
/// The email is an opaque label and is never validated as an address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// SSH public key in wire format (length-prefixed algorithm name followed
    /// by type-specific fields).
    #[serde(rename = "public_key_wire", with = "base64_bytes")]
    pub public_key_wire: Vec<u8>,

    /// Email label attached to the identity. May be empty, may contain spaces.
    pub email: String,

    /// Optional linked OpenPGP public key as a raw packet stream.
    #[serde(
        rename = "pgp_pk",
        default,
        skip_serializing_if = "Option::is_none",
        with = "base64_bytes_opt"
    )]
    pub pgp_public_key: Option<Vec<u8>>,
}

impl Profile {
    /// Build a profile from externally obtained bytes.
    pub fn new(
        public_key_wire: Vec<u8>,
        email: impl Into<String>,
        pgp_public_key: Option<Vec<u8>>,
    ) -> Self {
        Self {
            public_key_wire,
            email: email.into(),
            pgp_public_key,
        }
    }

    /// Decode the SSH wire public key.
    ///
    /// # Errors
    /// Returns `ProfileError::InvalidKeyFormat` if the wire bytes are
    /// truncated or malformed.
    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::parse(&self.public_key_wire)
    }

    /// Decode the SSH wire public key as RSA parameters.
    ///
    /// # Errors
    /// Returns `ProfileError::NotRsa` if the key is valid but not RSA, or
    /// `ProfileError::InvalidKeyFormat` if it cannot be decoded at all.
    pub fn rsa_public_key(&self) -> Result<RsaPublicKey> {
        match self.public_key()? {
            PublicKey::Rsa(rsa) => Ok(rsa),
            other => Err(ProfileError::NotRsa(other.algorithm().to_string())),
        }
    }

    /// SHA256 fingerprint over the raw wire key bytes.
    pub fn public_key_fingerprint(&self) -> [u8; 32] {
        ssh_fingerprint(&self.public_key_wire)
    }

    /// The `<type> <base64-key>` prefix of an authorized_keys line.
    ///
    /// # Errors
    /// Returns `ProfileError::InvalidKeyFormat` if the wire key cannot be
    /// decoded to recover its algorithm name.
    pub fn authorized_key_string_without_email(&self) -> Result<String> {
        let key = self.public_key()?;
        Ok(format!(
            "{} {}",
            key.algorithm(),
            STANDARD.encode(&self.public_key_wire)
        ))
    }

    /// A full authorized_keys line: `<type> <base64-key> <email>`.
    ///
    /// Every space character in the email is removed (not merely trimmed)
    /// so the comment field stays a single token.
    ///
    /// # Errors
    /// Returns `ProfileError::InvalidKeyFormat` if the wire key cannot be
    /// decoded.
    pub fn authorized_key_string(&self) -> Result<String> {
        let mut line = self.authorized_key_string_without_email()?;
        line.push(' ');
        line.push_str(&self.email.replace(' ', ""));
        Ok(line)
    }

    /// ASCII-armor the linked PGP public key.
    ///
    /// # Errors
    /// Returns `ProfileError::NoPgpKey` if the profile has no PGP key.
    pub fn ascii_armor_pgp_public_key(&self, headers: &ArmorHeaders) -> Result<String> {
        let pgp = self.pgp_public_key.as_deref().ok_or(ProfileError::NoPgpKey)?;
        Ok(armor::armor(pgp, headers))
    }

    /// Fingerprint of the first public-key packet in the linked PGP key,
    /// as a lowercase hex string.
    ///
    /// # Errors
    /// Returns `ProfileError::NoPgpKey` if the profile has no PGP key, or
    /// the packet-scan errors from [`pgp_fingerprint`].
    pub fn pgp_public_key_fingerprint(&self) -> Result<String> {
        let pgp = self.pgp_public_key.as_deref().ok_or(ProfileError::NoPgpKey)?;
        pgp_fingerprint(pgp)
    }
}

/// Identity equality is defined by the SSH key and email alone; the linked
/// PGP key does not participate.
impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.public_key_wire == other.public_key_wire && self.email == other.email
    }
}

impl Eq for Profile {}
