//! Emission and read-back of BPUI instruction streams

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use bpu_compiler::{CompiledProgram, InstructionWord};

use crate::error::Result;
use crate::format::{
    revision_tag, word_width_from_bits, StreamHeader, HEADER_LEN, STREAM_VERSION,
};

/// Writes compiled programs as BPUI streams
///
/// Words are written in exactly the order the encoder produced them;
/// the emitter never reorders or re-buffers in a way that could change
/// output between runs.
#[derive(Debug, Default)]
pub struct Emitter;

impl Emitter {
    /// Create an emitter
    pub fn new() -> Self {
        Self
    }

    /// Write the program to `writer`; returns bytes written
    pub fn emit<W: Write>(&self, program: &CompiledProgram, writer: &mut W) -> Result<u64> {
        let mut payload = Vec::with_capacity(program.words.len() * program.profile.word.bytes());
        for word in &program.words {
            payload.extend_from_slice(&word.to_bytes());
        }

        let header = StreamHeader {
            version: STREAM_VERSION,
            word_bits: program.profile.word.bits(),
            revision: revision_tag(program.profile.revision),
            neuron_words: program.neuron_words() as u64,
            synapse_words: program.synapse_words() as u64,
            total_words: program.words.len() as u64,
            payload_checksum: crc32fast::hash(&payload),
        };

        let header_bytes = header.to_bytes();
        writer.write_all(&header_bytes)?;
        writer.write_all(&payload)?;
        writer.flush()?;

        let written = (header_bytes.len() + payload.len()) as u64;
        log::debug!("emitted {} words ({} bytes)", program.words.len(), written);
        Ok(written)
    }

    /// Write the program to a file; the handle is scoped to this call
    /// and released on every exit path
    pub fn emit_to_path(&self, program: &CompiledProgram, path: &Path) -> Result<u64> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.emit(program, &mut writer)
    }
}

/// Reads and validates BPUI streams
#[derive(Debug, Default)]
pub struct StreamReader;

impl StreamReader {
    /// Create a reader
    pub fn new() -> Self {
        Self
    }

    /// Read a stream, validating magic, version, and checksums
    pub fn read<R: Read>(&self, reader: &mut R) -> Result<(StreamHeader, Vec<InstructionWord>)> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.read_bytes(&bytes)
    }

    /// Read a stream from an in-memory byte slice
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<(StreamHeader, Vec<InstructionWord>)> {
        let header = StreamHeader::from_bytes(bytes)?;
        let width = word_width_from_bits(header.word_bits)?;

        let payload = &bytes[HEADER_LEN..];
        let expected_len = usize::try_from(header.total_words)
            .ok()
            .and_then(|count| count.checked_mul(width.bytes()))
            .ok_or_else(|| {
                crate::error::StreamError::invalid_format(format!(
                    "word count {} overflows the addressable payload size",
                    header.total_words
                ))
            })?;
        if payload.len() != expected_len {
            return Err(crate::error::StreamError::invalid_format(format!(
                "payload is {} bytes, header promises {}",
                payload.len(),
                expected_len
            )));
        }

        let computed = crc32fast::hash(payload);
        if computed != header.payload_checksum {
            return Err(crate::error::StreamError::ChecksumMismatch {
                expected: header.payload_checksum,
                computed,
            });
        }

        let words = payload
            .chunks_exact(width.bytes())
            .map(|chunk| InstructionWord::from_bytes(chunk, width))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok((header, words))
    }

    /// Read a stream from a file
    pub fn read_path(&self, path: &Path) -> Result<(StreamHeader, Vec<InstructionWord>)> {
        let mut file = File::open(path)?;
        self.read(&mut file)
    }
}
