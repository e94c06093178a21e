// ABOUTME: OpenPGP packet stream scanning and v4 key fingerprints.
// ABOUTME: Old- and new-format packet headers per RFC 4880 section 4.2.

use crate::error::{ProfileError, Result};
use sha1::{Digest, Sha1};

/// OpenPGP packet tags, per RFC 4880 section 4.3.
///
/// Every tag value decodes to a variant so packet dispatch is an exhaustive
/// match rather than runtime type inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketTag {
    PublicKeyEncryptedSessionKey,
    Signature,
    SymKeyEncryptedSessionKey,
    OnePassSignature,
    SecretKey,
    PublicKey,
    SecretSubkey,
    CompressedData,
    SymmetricallyEncryptedData,
    Marker,
    LiteralData,
    Trust,
    UserId,
    PublicSubkey,
    UserAttribute,
    SymEncryptedIntegrityProtectedData,
    ModificationDetectionCode,
    Unknown(u8),
}

impl From<u8> for PacketTag {
    fn from(value: u8) -> Self {
        match value {
            1 => PacketTag::PublicKeyEncryptedSessionKey,
            2 => PacketTag::Signature,
            3 => PacketTag::SymKeyEncryptedSessionKey,
            4 => PacketTag::OnePassSignature,
            5 => PacketTag::SecretKey,
            6 => PacketTag::PublicKey,
            7 => PacketTag::SecretSubkey,
            8 => PacketTag::CompressedData,
            9 => PacketTag::SymmetricallyEncryptedData,
            10 => PacketTag::Marker,
            11 => PacketTag::LiteralData,
            12 => PacketTag::Trust,
            13 => PacketTag::UserId,
            14 => PacketTag::PublicSubkey,
            17 => PacketTag::UserAttribute,
            18 => PacketTag::SymEncryptedIntegrityProtectedData,
            19 => PacketTag::ModificationDetectionCode,
            other => PacketTag::Unknown(other),
        }
    }
}

/// A framed packet: its tag and a borrowed view of its body.
struct Packet<'a> {
    tag: PacketTag,
    body: &'a [u8],
}

/// Frame the next packet off the front of `input`.
///
/// Handles both old-format headers (1-, 2-, 4-byte and indeterminate lengths)
/// and new-format headers (1-, 2- and 5-byte lengths). Partial body lengths
/// are rejected; they never appear in serialized key material.
fn next_packet(input: &[u8]) -> Result<Option<(Packet<'_>, &[u8])>> {
    let first = match input.first() {
        Some(&b) => b,
        None => return Ok(None),
    };
    if first & 0x80 == 0 {
        return Err(ProfileError::MalformedPacketStream(format!(
            "packet tag byte {first:#04x} is missing the always-set bit"
        )));
    }

    let (tag, body_len, header_len): (u8, usize, usize) = if first & 0x40 != 0 {
        // New format: tag in the low six bits, variable-width length field.
        let tag = first & 0x3F;
        let l0 = *input.get(1).ok_or_else(|| {
            ProfileError::MalformedPacketStream("truncated packet length".to_string())
        })?;
        match l0 {
            0..=191 => (tag, l0 as usize, 2),
            192..=223 => {
                let l1 = *input.get(2).ok_or_else(|| {
                    ProfileError::MalformedPacketStream("truncated packet length".to_string())
                })?;
                (tag, ((l0 as usize - 192) << 8) + l1 as usize + 192, 3)
            }
            255 => {
                let bytes = input.get(2..6).ok_or_else(|| {
                    ProfileError::MalformedPacketStream("truncated packet length".to_string())
                })?;
                let len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                (tag, len as usize, 6)
            }
            _ => {
                return Err(ProfileError::MalformedPacketStream(
                    "partial packet lengths are not supported".to_string(),
                ))
            }
        }
    } else {
        // Old format: tag in bits 2-5, length width in the low two bits.
        let tag = (first >> 2) & 0x0F;
        match first & 0x03 {
            0 => {
                let len = *input.get(1).ok_or_else(|| {
                    ProfileError::MalformedPacketStream("truncated packet length".to_string())
                })?;
                (tag, len as usize, 2)
            }
            1 => {
                let bytes = input.get(1..3).ok_or_else(|| {
                    ProfileError::MalformedPacketStream("truncated packet length".to_string())
                })?;
                (tag, u16::from_be_bytes([bytes[0], bytes[1]]) as usize, 3)
            }
            2 => {
                let bytes = input.get(1..5).ok_or_else(|| {
                    ProfileError::MalformedPacketStream("truncated packet length".to_string())
                })?;
                let len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                (tag, len as usize, 5)
            }
            // Indeterminate length: the body runs to the end of the stream.
            _ => (tag, input.len() - 1, 1),
        }
    };

    let end = header_len.checked_add(body_len).ok_or_else(|| {
        ProfileError::MalformedPacketStream("packet length overflows input".to_string())
    })?;
    let body = input.get(header_len..end).ok_or_else(|| {
        ProfileError::MalformedPacketStream(format!(
            "packet body of {body_len} bytes exceeds remaining input"
        ))
    })?;
    Ok(Some((
        Packet {
            tag: tag.into(),
            body,
        },
        &input[end..],
    )))
}

/// Fingerprint of a v4 public-key packet body: SHA1 over `0x99 || length || body`
/// per RFC 4880 section 12.2, as a lowercase hex string.
fn v4_fingerprint(body: &[u8]) -> Result<String> {
    match body.first() {
        None => Err(ProfileError::MalformedPacketStream(
            "empty public key packet".to_string(),
        )),
        Some(4) => {
            if body.len() > u16::MAX as usize {
                return Err(ProfileError::MalformedPacketStream(
                    "public key packet exceeds the two-byte fingerprint framing".to_string(),
                ));
            }
            let mut hasher = Sha1::new();
            hasher.update([0x99, (body.len() >> 8) as u8, body.len() as u8]);
            hasher.update(body);
            Ok(hex::encode(hasher.finalize()))
        }
        Some(version) => Err(ProfileError::MalformedPacketStream(format!(
            "unsupported public key packet version {version}"
        ))),
    }
}

/// Scan an OpenPGP packet stream and fingerprint its first public-key packet.
///
/// All other packet kinds (user IDs, signatures, subkeys, ...) are skipped;
/// once a public-key packet has been seen, later packets are never consulted.
///
/// # Errors
/// Returns `ProfileError::NoPgpKeyPacket` if the stream runs out with no
/// public-key packet, or `ProfileError::MalformedPacketStream` if a packet
/// header is truncated or invalid before any match is found.
pub fn pgp_fingerprint(bytes: &[u8]) -> Result<String> {
    let mut input = bytes;
    loop {
        match next_packet(input)? {
            None => return Err(ProfileError::NoPgpKeyPacket),
            Some((packet, rest)) => {
                if packet.tag == PacketTag::PublicKey {
                    return v4_fingerprint(packet.body);
                }
                input = rest;
            }
        }
    }
}
