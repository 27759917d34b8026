//! Error types for the mapping and encoding pipeline

use thiserror::Error;

use bpu_hal::CoreId;
use bpu_model::{NeuronId, SynapseId};

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors that can occur while mapping, validating, or encoding
#[derive(Error, Debug)]
pub enum CompileError {
    /// A core's neuron or synapse-row capacity is insufficient
    #[error("Capacity exceeded on {core}: {resource} capacity {capacity}, required {required}")]
    CapacityExceeded {
        /// Core whose capacity is insufficient
        core: CoreId,
        /// Resource name ("neuron" or "synapse-row")
        resource: &'static str,
        /// Stated capacity of the core
        capacity: u32,
        /// Amount the graph requires of this core
        required: u32,
    },

    /// A synapse cannot be routed between its endpoint cores
    #[error("Synapse {synapse} unroutable from {source_core} to {target_core}: {reason}")]
    UnroutableSynapse {
        /// Offending synapse
        synapse: SynapseId,
        /// Core hosting the source neuron
        source_core: CoreId,
        /// Core hosting the target neuron
        target_core: CoreId,
        /// Constraint that was violated
        reason: &'static str,
    },

    /// A numeric value does not fit the profile's field width
    #[error("Field overflow: {field} of {entity} is {value}, profile allows {min}..={max}")]
    FieldOverflow {
        /// Field name within the instruction word
        field: &'static str,
        /// Entity the value belongs to (neuron, synapse, core)
        entity: String,
        /// Observed value
        value: i64,
        /// Minimum representable value
        min: i64,
        /// Maximum representable value
        max: i64,
    },

    /// A synapse refers to a neuron absent from the mapping table.
    /// This is an internal consistency violation, not a user error.
    #[error("Internal: synapse {synapse} references neuron {neuron} absent from mapping")]
    DanglingReference {
        /// Synapse with the dangling endpoint
        synapse: SynapseId,
        /// Neuron missing from the mapping
        neuron: NeuronId,
    },

    /// An internal pipeline invariant was violated
    #[error("Internal invariant violated: {reason}")]
    Internal {
        /// Description of the broken invariant
        reason: String,
    },

    /// An instruction word could not be decoded
    #[error("Malformed instruction word: {reason}")]
    MalformedWord {
        /// Description of the malformation
        reason: String,
    },

    /// Hardware layer error (unknown profile, bad core set)
    #[error("Hardware error: {0}")]
    Hal(#[from] bpu_hal::HalError),

    /// Graph model error
    #[error("Model error: {0}")]
    Model(#[from] bpu_model::ModelError),
}

impl CompileError {
    /// Whether this error indicates a compiler bug rather than a
    /// structural mismatch the caller can act on
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CompileError::DanglingReference { .. } | CompileError::Internal { .. }
        )
    }

    /// Create an internal invariant error
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_classification() {
        let err = CompileError::DanglingReference {
            synapse: SynapseId::new(1),
            neuron: NeuronId::new(2),
        };
        assert!(err.is_internal());

        let err = CompileError::CapacityExceeded {
            core: CoreId::new(0),
            resource: "neuron",
            capacity: 4,
            required: 5,
        };
        assert!(!err.is_internal());
    }

    #[test]
    fn test_field_overflow_display() {
        let err = CompileError::FieldOverflow {
            field: "weight",
            entity: "S3".into(),
            value: 128,
            min: -128,
            max: 127,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("weight"));
        assert!(msg.contains("S3"));
        assert!(msg.contains("128"));
    }
}
