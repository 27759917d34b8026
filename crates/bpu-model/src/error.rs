//! Error types for the graph model layer

use thiserror::Error;

use crate::ids::{NeuronId, SynapseId};

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while ingesting a graph model
#[derive(Error, Debug)]
pub enum ModelError {
    /// A neuron ID was added twice
    #[error("Duplicate neuron {neuron}")]
    DuplicateNeuron {
        /// Neuron ID that was duplicated
        neuron: NeuronId,
    },

    /// A synapse ID was added twice
    #[error("Duplicate synapse {synapse}")]
    DuplicateSynapse {
        /// Synapse ID that was duplicated
        synapse: SynapseId,
    },

    /// A synapse endpoint refers to a neuron that is not in the graph
    #[error("Synapse {synapse} refers to unknown neuron {neuron} ({endpoint})")]
    UnknownNeuron {
        /// Synapse with the unresolved endpoint
        synapse: SynapseId,
        /// Neuron ID that could not be resolved
        neuron: NeuronId,
        /// Which endpoint ("source" or "target")
        endpoint: &'static str,
    },

    /// An ID with the reserved invalid value was supplied
    #[error("Reserved invalid ID used for {entity}")]
    ReservedId {
        /// Entity kind ("neuron" or "synapse")
        entity: &'static str,
    },

    /// The graph contains no neurons
    #[error("Graph is empty: at least one neuron is required")]
    EmptyGraph,
}
