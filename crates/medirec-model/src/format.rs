//! On-disk container for model artifacts.
//!
//! An artifact file is a CBOR [`ArtifactHeader`] followed directly by the
//! CBOR payload. The header pins the payload length and its SHA-256, and
//! carries a SHA-256 over its own fields so a flipped flag or schema number
//! is caught before the payload is decoded.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// `"MRXA"`
pub const MAGIC: [u8; 4] = *b"MRXA";

/// Container version, packed as `major << 24 | minor << 16 | patch`.
pub const VERSION: u32 = 0x00_01_00_00;

/// Payload-kind bits stored in [`ArtifactHeader::flags`].
pub mod flags {
    pub const ONE_VS_REST: u64 = 1 << 0;
    pub const ONE_VS_ONE: u64 = 1 << 1;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub schema_version: u32,
    pub flags: u64,
    pub content_length: u64,
    pub content_checksum: [u8; 32],
    /// Covers every field above.
    pub header_checksum: [u8; 32],
}

impl ArtifactHeader {
    pub fn new(content: &[u8], schema_version: u32, flags: u64) -> Self {
        let mut header = Self {
            magic: MAGIC,
            version: VERSION,
            schema_version,
            flags,
            content_length: content.len() as u64,
            content_checksum: sha256(content),
            header_checksum: [0u8; 32],
        };
        header.header_checksum = header.fields_checksum();
        header
    }

    fn fields_checksum(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.magic);
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.schema_version.to_le_bytes());
        hasher.update(self.flags.to_le_bytes());
        hasher.update(self.content_length.to_le_bytes());
        hasher.update(self.content_checksum);
        hasher.finalize().into()
    }

    /// Magic, readable container version and self-checksum.
    pub fn verify(&self) -> Result<(), FormatError> {
        if self.magic != MAGIC {
            return Err(FormatError::NotAnArtifact);
        }
        if !readable_version(self.version) {
            return Err(FormatError::UnreadableVersion {
                file: self.version,
                reader: VERSION,
            });
        }
        if self.header_checksum != self.fields_checksum() {
            return Err(FormatError::HeaderChecksumMismatch);
        }
        Ok(())
    }

    pub fn verify_content(&self, content: &[u8]) -> Result<(), FormatError> {
        if content.len() as u64 != self.content_length {
            return Err(FormatError::ContentLengthMismatch {
                expected: self.content_length,
                actual: content.len() as u64,
            });
        }
        if sha256(content) != self.content_checksum {
            return Err(FormatError::ContentChecksumMismatch);
        }
        Ok(())
    }

    /// Lowercase hex of the payload checksum.
    pub fn content_checksum_hex(&self) -> String {
        self.content_checksum
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Same major as this reader, and a minor it already knows.
fn readable_version(file: u32) -> bool {
    let major = |v: u32| v >> 24;
    let minor = |v: u32| (v >> 16) & 0xFF;
    major(file) == major(VERSION) && minor(file) <= minor(VERSION)
}

pub fn encode_container<T: Serialize>(
    payload: &T,
    schema_version: u32,
    flags: u64,
) -> Result<Vec<u8>, FormatError> {
    let mut content = Vec::new();
    ciborium::into_writer(payload, &mut content).map_err(|e| FormatError::Encode(e.to_string()))?;

    let header = ArtifactHeader::new(&content, schema_version, flags);
    let mut out = Vec::with_capacity(content.len() + 128);
    ciborium::into_writer(&header, &mut out).map_err(|e| FormatError::Encode(e.to_string()))?;
    out.extend_from_slice(&content);
    Ok(out)
}

/// Verify the header and payload, check the schema version, then decode.
pub fn decode_container<T: DeserializeOwned>(
    data: &[u8],
    expected_schema: u32,
) -> Result<(T, ArtifactHeader), FormatError> {
    let (header, content) = split_container(data)?;
    if header.schema_version != expected_schema {
        return Err(FormatError::SchemaVersion {
            found: header.schema_version,
            expected: expected_schema,
        });
    }
    let payload = ciborium::from_reader(content).map_err(|e| FormatError::Decode(e.to_string()))?;
    Ok((payload, header))
}

fn split_container(data: &[u8]) -> Result<(ArtifactHeader, &[u8]), FormatError> {
    let mut cursor = std::io::Cursor::new(data);
    let header: ArtifactHeader = ciborium::from_reader(&mut cursor)
        .map_err(|e| FormatError::MalformedHeader(e.to_string()))?;
    header.verify()?;

    let content = &data[cursor.position() as usize..];
    header.verify_content(content)?;
    Ok((header, content))
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("not a model artifact (bad magic bytes)")]
    NotAnArtifact,

    #[error("artifact container version {file:#x} is not readable by this build ({reader:#x})")]
    UnreadableVersion { file: u32, reader: u32 },

    #[error("artifact header checksum mismatch")]
    HeaderChecksumMismatch,

    #[error("artifact payload is {actual} bytes, header says {expected}")]
    ContentLengthMismatch { expected: u64, actual: u64 },

    #[error("artifact payload checksum mismatch")]
    ContentChecksumMismatch,

    #[error("unsupported artifact schema version {found} (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },

    #[error("failed to encode artifact: {0}")]
    Encode(String),

    #[error("malformed artifact header: {0}")]
    MalformedHeader(String),

    #[error("failed to decode artifact payload: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_header_verifies() {
        let content = b"weights";
        let header = ArtifactHeader::new(content, 1, 0);

        assert!(header.verify().is_ok());
        assert!(header.verify_content(content).is_ok());
        assert!(header.verify_content(b"biases").is_err());
    }

    #[test]
    fn payload_and_header_survive_encoding() {
        let data = encode_container(&vec![1.5f64, -2.0], 1, flags::ONE_VS_REST).unwrap();
        let (restored, header): (Vec<f64>, _) = decode_container(&data, 1).unwrap();

        assert_eq!(restored, vec![1.5, -2.0]);
        assert_eq!(header.flags, flags::ONE_VS_REST);
        assert_eq!(header.schema_version, 1);
    }

    #[test]
    fn other_schema_is_rejected_before_decoding() {
        let data = encode_container(&"weights".to_string(), 3, 0).unwrap();
        let err = decode_container::<String>(&data, 1).unwrap_err();
        assert!(matches!(err, FormatError::SchemaVersion { found: 3, expected: 1 }));
    }

    #[test]
    fn flipped_content_byte_is_detected() {
        let mut data = encode_container(&"weights".to_string(), 1, 0).unwrap();
        let last = data.len() - 1;
        data[last] ^= 0x01;

        let err = decode_container::<String>(&data, 1).unwrap_err();
        assert!(matches!(err, FormatError::ContentChecksumMismatch));
    }

    #[test]
    fn truncated_content_is_detected() {
        let mut data = encode_container(&"weights".to_string(), 1, 0).unwrap();
        data.pop();

        let err = decode_container::<String>(&data, 1).unwrap_err();
        assert!(matches!(err, FormatError::ContentLengthMismatch { .. }));
    }

    #[test]
    fn garbage_is_a_malformed_header() {
        let err = decode_container::<String>(b"plain text, not cbor", 1).unwrap_err();
        assert!(matches!(
            err,
            FormatError::MalformedHeader(_) | FormatError::NotAnArtifact
        ));
    }

    #[test]
    fn foreign_magic_is_rejected() {
        let mut header = ArtifactHeader::new(b"x", 1, 0);
        header.magic = *b"AXVF";
        assert!(matches!(header.verify(), Err(FormatError::NotAnArtifact)));
    }

    #[test]
    fn newer_major_or_minor_is_unreadable() {
        for version in [0x02_00_00_00, 0x00_02_00_00] {
            let mut header = ArtifactHeader::new(b"x", 1, 0);
            header.version = version;
            assert!(matches!(
                header.verify(),
                Err(FormatError::UnreadableVersion { .. })
            ));
        }
        assert!(readable_version(0x00_01_00_07));
    }

    #[test]
    fn tampered_header_field_is_detected() {
        let mut header = ArtifactHeader::new(b"x", 1, 0);
        header.flags = flags::ONE_VS_ONE;
        assert!(matches!(
            header.verify(),
            Err(FormatError::HeaderChecksumMismatch)
        ));
    }
}
