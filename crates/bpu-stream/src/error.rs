//! Error types for the stream layer

use thiserror::Error;

/// Result type for stream operations
pub type Result<T> = std::result::Result<T, StreamError>;

/// Errors that can occur while emitting or reading instruction streams
#[derive(Error, Debug)]
pub enum StreamError {
    /// Invalid magic number in the stream header
    #[error("Invalid magic number: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Expected magic number
        expected: [u8; 4],
        /// Found magic number
        found: [u8; 4],
    },

    /// Unsupported stream version
    #[error("Unsupported stream version: {version}, supported: {supported}")]
    UnsupportedVersion {
        /// Version found
        version: u32,
        /// Supported version
        supported: u32,
    },

    /// Checksum verification failed
    #[error("Checksum verification failed: expected {expected:08x}, computed {computed:08x}")]
    ChecksumMismatch {
        /// Expected checksum
        expected: u32,
        /// Computed checksum
        computed: u32,
    },

    /// Structurally invalid stream
    #[error("Invalid stream format: {reason}")]
    InvalidFormat {
        /// Reason for invalid format
        reason: String,
    },

    /// Emission target unwritable or unreadable
    #[error("I/O error: {source}")]
    Io {
        #[from]
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Word-level decode error from the compiler codec
    #[error("Word decode error: {0}")]
    Word(#[from] bpu_compiler::CompileError),

    /// Report serialization error
    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}

impl StreamError {
    /// Create an invalid format error
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StreamError::InvalidMagic {
            expected: *b"BPUI",
            found: [0, 0, 0, 0],
        };
        assert!(format!("{}", err).contains("Invalid magic number"));

        let err = StreamError::invalid_format("short header");
        assert!(matches!(err, StreamError::InvalidFormat { .. }));
    }
}
