//! Canonical in-memory SNN graph model for the BPU compiler
//!
//! This crate is the data layer of the compilation pipeline: neurons,
//! synapses, and their fixed-point parameters, ingested once from the
//! external adapter and read-only for every downstream stage. All
//! structural validation (unique ids, resolvable endpoints) happens
//! here, so the mapper and encoder operate on already-validated data.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod graph;
pub mod ids;

pub use error::{ModelError, Result};
pub use graph::{GraphBuilder, GraphModel, Neuron, NeuronParams, Synapse};
pub use ids::{NeuronId, SynapseId};
