//! Error types for the hardware abstraction layer

use thiserror::Error;

/// Result type for HAL operations
pub type Result<T> = std::result::Result<T, HalError>;

/// Errors that can occur in the hardware abstraction layer
#[derive(Error, Debug)]
pub enum HalError {
    /// The caller requested a profile name not in the static table
    #[error("Unknown target profile '{name}' (supported: {supported})")]
    UnknownProfile {
        /// Requested profile name
        name: String,
        /// Comma-separated list of supported profile names
        supported: String,
    },

    /// A core ID appears twice in the supplied core set
    #[error("Duplicate physical core C{core}")]
    DuplicateCore {
        /// Duplicated core ID
        core: u16,
    },

    /// The supplied core set is empty
    #[error("Hardware configuration contains no cores")]
    NoCores,

    /// A core declares a zero capacity that makes it unusable
    #[error("Core C{core} has zero {resource} capacity")]
    ZeroCapacity {
        /// Core ID with the bad capacity
        core: u16,
        /// Resource name ("neuron" or "synapse-row")
        resource: &'static str,
    },

    /// A mesh fabric was described with zero width
    #[error("Mesh fabric width must be non-zero")]
    ZeroMeshWidth,
}
