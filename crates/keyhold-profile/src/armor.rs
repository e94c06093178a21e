// ABOUTME: RFC 4880 ASCII armor encoding and decoding for PGP key blocks.
// ABOUTME: Base64 body wrapped at 64 columns with a CRC-24 checksum line.

use crate::error::{ProfileError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const BEGIN_MARKER: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----";
const END_MARKER: &str = "-----END PGP PUBLIC KEY BLOCK-----";
const LINE_WIDTH: usize = 64;

/// Header lines emitted inside an armored block.
///
/// Passed explicitly to [`armor`] so different callers can identify
/// themselves; there is no process-wide header table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmorHeaders {
    entries: Vec<(String, String)>,
}

impl ArmorHeaders {
    /// Headers with no entries at all.
    pub fn none() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a `Key: Value` header line.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }
}

impl Default for ArmorHeaders {
    /// A single `Comment` header naming this tool as the producer.
    fn default() -> Self {
        Self::none().with("Comment", "Created with keyhold")
    }
}

/// CRC-24 per RFC 4880 section 6.1.
fn crc24(data: &[u8]) -> u32 {
    const INIT: u32 = 0x00B7_04CE;
    const POLY: u32 = 0x0186_4CFB;

    let mut crc = INIT;
    for &byte in data {
        crc ^= u32::from(byte) << 16;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x0100_0000 != 0 {
                crc ^= POLY;
            }
        }
    }
    crc & 0x00FF_FFFF
}

fn crc24_base64(data: &[u8]) -> String {
    let crc = crc24(data);
    STANDARD.encode([(crc >> 16) as u8, (crc >> 8) as u8, crc as u8])
}

/// Encode raw OpenPGP public-key bytes as an ASCII-armored block.
///
/// Output is byte-for-byte reproducible for identical input: begin marker,
/// the given header lines, a blank separator, base64 wrapped at 64 columns,
/// a `=` CRC-24 line, and the end marker with a trailing newline.
pub fn armor(data: &[u8], headers: &ArmorHeaders) -> String {
    let mut out = String::new();
    out.push_str(BEGIN_MARKER);
    out.push('\n');
    for (key, value) in &headers.entries {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out.push('\n');

    let encoded = STANDARD.encode(data);
    let mut rest = encoded.as_str();
    while !rest.is_empty() {
        let take = rest.len().min(LINE_WIDTH);
        let (line, tail) = rest.split_at(take);
        out.push_str(line);
        out.push('\n');
        rest = tail;
    }

    out.push('=');
    out.push_str(&crc24_base64(data));
    out.push('\n');
    out.push_str(END_MARKER);
    out.push('\n');
    out
}

/// Decode an ASCII-armored public-key block back to raw bytes.
///
/// Verifies the begin/end markers and, when present, the CRC-24 line.
///
/// # Errors
/// Returns `ProfileError::InvalidArmor` for missing markers, malformed
/// header or base64 lines, or a checksum mismatch.
pub fn dearmor(text: &str) -> Result<Vec<u8>> {
    let mut lines = text.lines();

    if !lines.by_ref().any(|line| line.trim_end() == BEGIN_MARKER) {
        return Err(ProfileError::InvalidArmor(
            "missing begin marker".to_string(),
        ));
    }

    // Header lines run until the blank separator.
    loop {
        let line = lines.next().ok_or_else(|| {
            ProfileError::InvalidArmor("truncated block after begin marker".to_string())
        })?;
        if line.trim().is_empty() {
            break;
        }
        if !line.contains(':') {
            return Err(ProfileError::InvalidArmor(format!(
                "malformed header line: {line}"
            )));
        }
    }

    let mut body = String::new();
    let mut checksum = None;
    loop {
        let line = lines
            .next()
            .ok_or_else(|| ProfileError::InvalidArmor("missing end marker".to_string()))?;
        let line = line.trim_end();
        if line == END_MARKER {
            break;
        }
        if let Some(crc_text) = line.strip_prefix('=') {
            let crc_bytes = STANDARD
                .decode(crc_text)
                .map_err(|e| ProfileError::InvalidArmor(format!("invalid checksum line: {e}")))?;
            if crc_bytes.len() != 3 {
                return Err(ProfileError::InvalidArmor(
                    "checksum is not 24 bits".to_string(),
                ));
            }
            checksum = Some(
                u32::from(crc_bytes[0]) << 16 | u32::from(crc_bytes[1]) << 8
                    | u32::from(crc_bytes[2]),
            );
            continue;
        }
        body.push_str(line);
    }

    let data = STANDARD
        .decode(&body)
        .map_err(|e| ProfileError::InvalidArmor(format!("invalid base64 body: {e}")))?;

    if let Some(expected) = checksum {
        if crc24(&data) != expected {
            return Err(ProfileError::InvalidArmor("checksum mismatch".to_string()));
        }
    }
    Ok(data)
}
