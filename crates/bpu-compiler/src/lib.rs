//! BPU compiler core: mapping, validation, and instruction encoding
//!
//! The pipeline is one sequential pass per compilation run:
//! graph → ResourceMapper → Validator → InstructionEncoder → Validator,
//! producing the ordered word stream handed to the emitter. Each run
//! owns its graph and mapping; nothing is shared between runs, so
//! compilations for different chip targets can proceed concurrently.
//!
//! Key invariants:
//! - Mapping and encoding are pure functions of their inputs; output
//!   is byte-identical across runs.
//! - Numeric values that do not fit the target profile's fields are
//!   errors, never truncated or clamped.
//! - `MappingTable` is frozen once post-mapping validation succeeds.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod encode;
pub mod error;
pub mod mapping;
pub mod validate;

pub use encode::{
    decode_word, encode, Instruction, InstructionWord, OP_NEURON_CFG, OP_SYNAPSE,
};
pub use error::{CompileError, Result};
pub use mapping::{MappingTable, Placement, ResourceMapper, RowAssignment};
pub use validate::{check_encoding, check_mapping};

use bpu_hal::{PhysicalCore, RoutingFabric, TargetProfile};
use bpu_model::GraphModel;

/// Result of a successful compilation run
#[derive(Debug)]
pub struct CompiledProgram {
    /// Profile the program was encoded for
    pub profile: TargetProfile,
    /// Instruction words in canonical emission order
    pub words: Vec<InstructionWord>,
    /// Frozen mapping table (for reports and diagnostics)
    pub mapping: MappingTable,
}

impl CompiledProgram {
    /// Number of neuron configuration words
    pub fn neuron_words(&self) -> usize {
        self.mapping.neuron_count()
    }

    /// Number of synapse words
    pub fn synapse_words(&self) -> usize {
        self.mapping.synapse_count()
    }
}

/// Run the full mapping-and-encoding pipeline for one target
pub fn compile(
    graph: &GraphModel,
    cores: &[PhysicalCore],
    fabric: &dyn RoutingFabric,
    profile: &TargetProfile,
) -> Result<CompiledProgram> {
    log::info!(
        "compiling {} neurons / {} synapses for {}",
        graph.neuron_count(),
        graph.synapse_count(),
        profile
    );

    let mapping = ResourceMapper::new(cores, fabric).map(graph)?;
    check_mapping(graph, cores, fabric, &mapping)?;

    // Field-fit check up front gives richer diagnostics than the
    // packing-time re-check inside the encoder.
    check_encoding(graph, &mapping, profile)?;
    let words = encode(graph, &mapping, profile)?;

    let expected = graph.neuron_count() + graph.synapse_count();
    if words.len() != expected {
        return Err(CompileError::internal(format!(
            "encoded {} words, expected {}",
            words.len(),
            expected
        )));
    }

    log::info!("encoded {} words ({})", words.len(), profile.word);

    Ok(CompiledProgram {
        profile: *profile,
        words,
        mapping,
    })
}
