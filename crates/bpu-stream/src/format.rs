//! BPUI stream header: layout, serialization, and validation
//!
//! Header layout (48 bytes, all fields little-endian):
//! magic, version, word width in bits, chip revision tag, neuron word
//! count, synapse word count, total word count, payload CRC32, and a
//! trailing CRC32 over the preceding header bytes. Serialization is
//! explicit field-by-field, so no layout tricks are needed.

use bpu_hal::{ChipRevision, WordWidth};

use crate::error::{Result, StreamError};

/// Magic number "BPUI" (BPU Instructions)
pub const BPUI_MAGIC: [u8; 4] = *b"BPUI";

/// Current stream schema version
pub const STREAM_VERSION: u32 = 1;

/// Serialized header size in bytes
pub const HEADER_LEN: usize = 48;

/// BPUI stream header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    /// Schema version (current: 1)
    pub version: u32,
    /// Instruction word width in bits (32/64/96)
    pub word_bits: u32,
    /// Chip revision tag (0 = 40 nm, 1 = 28 nm)
    pub revision: u32,
    /// Number of neuron configuration words
    pub neuron_words: u64,
    /// Number of synapse words
    pub synapse_words: u64,
    /// Total number of words in the payload
    pub total_words: u64,
    /// CRC32 of the payload bytes
    pub payload_checksum: u32,
}

/// Encode a chip revision as its header tag
pub fn revision_tag(revision: ChipRevision) -> u32 {
    match revision {
        ChipRevision::Bpu40 => 0,
        ChipRevision::Bpu28 => 1,
    }
}

/// Decode a header tag back into a chip revision
pub fn revision_from_tag(tag: u32) -> Result<ChipRevision> {
    match tag {
        0 => Ok(ChipRevision::Bpu40),
        1 => Ok(ChipRevision::Bpu28),
        other => Err(StreamError::invalid_format(format!(
            "unknown chip revision tag {other}"
        ))),
    }
}

/// Decode the header's word width field
pub fn word_width_from_bits(bits: u32) -> Result<WordWidth> {
    match bits {
        32 => Ok(WordWidth::W32),
        64 => Ok(WordWidth::W64),
        96 => Ok(WordWidth::W96),
        other => Err(StreamError::invalid_format(format!(
            "unsupported word width {other} bits"
        ))),
    }
}

impl StreamHeader {
    /// Serialize to the 48-byte wire form, computing the header CRC
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&BPUI_MAGIC);
        out[4..8].copy_from_slice(&self.version.to_le_bytes());
        out[8..12].copy_from_slice(&self.word_bits.to_le_bytes());
        out[12..16].copy_from_slice(&self.revision.to_le_bytes());
        out[16..24].copy_from_slice(&self.neuron_words.to_le_bytes());
        out[24..32].copy_from_slice(&self.synapse_words.to_le_bytes());
        out[32..40].copy_from_slice(&self.total_words.to_le_bytes());
        out[40..44].copy_from_slice(&self.payload_checksum.to_le_bytes());
        let header_checksum = crc32fast::hash(&out[..44]);
        out[44..48].copy_from_slice(&header_checksum.to_le_bytes());
        out
    }

    /// Parse and validate a wire-form header
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(StreamError::invalid_format(format!(
                "header too short: {} bytes, need {}",
                bytes.len(),
                HEADER_LEN
            )));
        }

        let found = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if found != BPUI_MAGIC {
            return Err(StreamError::InvalidMagic {
                expected: BPUI_MAGIC,
                found,
            });
        }

        let expected = u32::from_le_bytes(bytes[44..48].try_into().unwrap());
        let computed = crc32fast::hash(&bytes[..44]);
        if expected != computed {
            return Err(StreamError::ChecksumMismatch { expected, computed });
        }

        let header = Self {
            version: u32::from_le_bytes(bytes[4..8].try_into().unwrap()),
            word_bits: u32::from_le_bytes(bytes[8..12].try_into().unwrap()),
            revision: u32::from_le_bytes(bytes[12..16].try_into().unwrap()),
            neuron_words: u64::from_le_bytes(bytes[16..24].try_into().unwrap()),
            synapse_words: u64::from_le_bytes(bytes[24..32].try_into().unwrap()),
            total_words: u64::from_le_bytes(bytes[32..40].try_into().unwrap()),
            payload_checksum: u32::from_le_bytes(bytes[40..44].try_into().unwrap()),
        };

        if header.version != STREAM_VERSION {
            return Err(StreamError::UnsupportedVersion {
                version: header.version,
                supported: STREAM_VERSION,
            });
        }
        // Counts come straight off the wire; sum without trusting them.
        let summed = header.neuron_words.checked_add(header.synapse_words);
        if summed != Some(header.total_words) {
            return Err(StreamError::invalid_format(format!(
                "word counts disagree: {} + {} != {}",
                header.neuron_words, header.synapse_words, header.total_words
            )));
        }

        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> StreamHeader {
        StreamHeader {
            version: STREAM_VERSION,
            word_bits: 32,
            revision: 0,
            neuron_words: 2,
            synapse_words: 1,
            total_words: 3,
            payload_checksum: 0xdeadbeef,
        }
    }

    #[test]
    fn header_roundtrip() {
        let header = sample_header();
        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), HEADER_LEN);
        let back = StreamHeader::from_bytes(&bytes).unwrap();
        assert_eq!(back, header);
    }

    #[test]
    fn bad_magic_rejected() {
        let mut bytes = sample_header().to_bytes();
        bytes[0] = b'X';
        assert!(matches!(
            StreamHeader::from_bytes(&bytes),
            Err(StreamError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn corrupt_header_rejected() {
        let mut bytes = sample_header().to_bytes();
        bytes[20] ^= 0xFF;
        assert!(matches!(
            StreamHeader::from_bytes(&bytes),
            Err(StreamError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn inconsistent_counts_rejected() {
        let mut header = sample_header();
        header.total_words = 5;
        let bytes = header.to_bytes();
        assert!(matches!(
            StreamHeader::from_bytes(&bytes),
            Err(StreamError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn overflowing_counts_rejected() {
        // Counts that sum past u64::MAX must be an error, not a wrap.
        let mut header = sample_header();
        header.neuron_words = u64::MAX;
        header.synapse_words = 2;
        header.total_words = 1; // whatever the wrapped sum would be
        let bytes = header.to_bytes();
        assert!(matches!(
            StreamHeader::from_bytes(&bytes),
            Err(StreamError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn revision_tags_roundtrip() {
        for rev in [ChipRevision::Bpu40, ChipRevision::Bpu28] {
            assert_eq!(revision_from_tag(revision_tag(rev)).unwrap(), rev);
        }
        assert!(revision_from_tag(7).is_err());
    }
}
