//! Instruction word packing and the per-core encoder
//!
//! One word layout per word kind, parameterized by the active
//! profile's field widths; all three word widths share this codec.
//! Fields are packed LSB-first and words serialize little-endian.
//! Out-of-range values are reported as `FieldOverflow`, never clamped.

use bpu_hal::{max_signed, max_unsigned, min_signed, TargetProfile, WordWidth};
use bpu_model::GraphModel;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{CompileError, Result};
use crate::mapping::MappingTable;

/// Opcode of a neuron configuration word
pub const OP_NEURON_CFG: u64 = 0x1;
/// Opcode of a synapse connection word
pub const OP_SYNAPSE: u64 = 0x2;

/// One fixed-width instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionWord {
    /// Packed bits, LSB-aligned
    pub bits: u128,
    /// Word width of the owning profile
    pub width: WordWidth,
}

impl InstructionWord {
    /// Serialize to little-endian bytes of the profile's word size
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits.to_le_bytes()[..self.width.bytes()].to_vec()
    }

    /// Deserialize from little-endian bytes of the given width
    pub fn from_bytes(bytes: &[u8], width: WordWidth) -> Result<Self> {
        if bytes.len() != width.bytes() {
            return Err(CompileError::MalformedWord {
                reason: format!(
                    "expected {} bytes for a {} word, got {}",
                    width.bytes(),
                    width,
                    bytes.len()
                ),
            });
        }
        let mut buf = [0u8; 16];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            bits: u128::from_le_bytes(buf),
            width,
        })
    }
}

/// Decoded view of an instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Neuron configuration word
    NeuronConfig {
        /// Local slot on the owning core
        slot: u32,
        /// Firing threshold
        threshold: i32,
        /// Leak term
        leak: i32,
        /// Bias current
        bias: i32,
    },
    /// Synapse connection word
    Synapse {
        /// Source neuron's local slot
        source_slot: u32,
        /// Target core address
        target_core: u16,
        /// Target neuron's local slot
        target_slot: u32,
        /// Signed weight
        weight: i32,
        /// Unsigned delay in ticks
        delay: u32,
    },
}

/// LSB-first field writer over a single word
struct BitWriter {
    bits: u128,
    cursor: u32,
    capacity: u32,
}

impl BitWriter {
    fn new(width: WordWidth) -> Self {
        Self {
            bits: 0,
            cursor: 0,
            capacity: width.bits(),
        }
    }

    fn push_unsigned(
        &mut self,
        field: &'static str,
        entity: &str,
        value: u64,
        bits: u32,
    ) -> Result<()> {
        let max = max_unsigned(bits);
        if value > max {
            return Err(CompileError::FieldOverflow {
                field,
                entity: entity.to_string(),
                value: value as i64,
                min: 0,
                max: max as i64,
            });
        }
        debug_assert!(self.cursor + bits <= self.capacity, "word overflow");
        self.bits |= (value as u128) << self.cursor;
        self.cursor += bits;
        Ok(())
    }

    fn push_signed(
        &mut self,
        field: &'static str,
        entity: &str,
        value: i64,
        bits: u32,
    ) -> Result<()> {
        let (min, max) = (min_signed(bits), max_signed(bits));
        if value < min || value > max {
            return Err(CompileError::FieldOverflow {
                field,
                entity: entity.to_string(),
                value,
                min,
                max,
            });
        }
        // Two's complement truncation is exact inside the checked range.
        let raw = (value as u64) & max_unsigned(bits);
        debug_assert!(self.cursor + bits <= self.capacity, "word overflow");
        self.bits |= (raw as u128) << self.cursor;
        self.cursor += bits;
        Ok(())
    }

    fn finish(self, width: WordWidth) -> InstructionWord {
        InstructionWord {
            bits: self.bits,
            width,
        }
    }
}

/// LSB-first field reader over a single word
struct BitReader {
    bits: u128,
    cursor: u32,
}

impl BitReader {
    fn new(word: &InstructionWord) -> Self {
        Self {
            bits: word.bits,
            cursor: 0,
        }
    }

    fn take_unsigned(&mut self, bits: u32) -> u64 {
        let value = ((self.bits >> self.cursor) as u64) & max_unsigned(bits);
        self.cursor += bits;
        value
    }

    fn take_signed(&mut self, bits: u32) -> i64 {
        let raw = self.take_unsigned(bits);
        let sign = 1u64 << (bits - 1);
        if raw & sign != 0 {
            (raw as i64) - (1i64 << bits)
        } else {
            raw as i64
        }
    }
}

/// Encode one neuron configuration word
pub fn encode_neuron_word(
    profile: &TargetProfile,
    entity: &str,
    slot: u32,
    threshold: i32,
    leak: i32,
    bias: i32,
) -> Result<InstructionWord> {
    let mut w = BitWriter::new(profile.word);
    w.push_unsigned("opcode", entity, OP_NEURON_CFG, profile.opcode_bits)?;
    w.push_unsigned("slot", entity, slot as u64, profile.slot_bits)?;
    w.push_signed("threshold", entity, threshold as i64, profile.param_bits)?;
    w.push_signed("leak", entity, leak as i64, profile.param_bits)?;
    w.push_signed("bias", entity, bias as i64, profile.param_bits)?;
    Ok(w.finish(profile.word))
}

/// Encode one synapse connection word
pub fn encode_synapse_word(
    profile: &TargetProfile,
    entity: &str,
    source_slot: u32,
    target_core: u16,
    target_slot: u32,
    weight: i32,
    delay: u32,
) -> Result<InstructionWord> {
    let mut w = BitWriter::new(profile.word);
    w.push_unsigned("opcode", entity, OP_SYNAPSE, profile.opcode_bits)?;
    w.push_unsigned("source slot", entity, source_slot as u64, profile.slot_bits)?;
    w.push_unsigned("target core", entity, target_core as u64, profile.core_bits)?;
    w.push_unsigned("target slot", entity, target_slot as u64, profile.slot_bits)?;
    w.push_signed("weight", entity, weight as i64, profile.weight_bits)?;
    w.push_unsigned("delay", entity, delay as u64, profile.delay_bits)?;
    Ok(w.finish(profile.word))
}

/// Decode a word back into its field values
pub fn decode_word(profile: &TargetProfile, word: &InstructionWord) -> Result<Instruction> {
    if word.width != profile.word {
        return Err(CompileError::MalformedWord {
            reason: format!(
                "word width {} does not match profile width {}",
                word.width, profile.word
            ),
        });
    }
    let mut r = BitReader::new(word);
    let opcode = r.take_unsigned(profile.opcode_bits);
    match opcode {
        OP_NEURON_CFG => Ok(Instruction::NeuronConfig {
            slot: r.take_unsigned(profile.slot_bits) as u32,
            threshold: r.take_signed(profile.param_bits) as i32,
            leak: r.take_signed(profile.param_bits) as i32,
            bias: r.take_signed(profile.param_bits) as i32,
        }),
        OP_SYNAPSE => Ok(Instruction::Synapse {
            source_slot: r.take_unsigned(profile.slot_bits) as u32,
            target_core: r.take_unsigned(profile.core_bits) as u16,
            target_slot: r.take_unsigned(profile.slot_bits) as u32,
            weight: r.take_signed(profile.weight_bits) as i32,
            delay: r.take_unsigned(profile.delay_bits) as u32,
        }),
        other => Err(CompileError::MalformedWord {
            reason: format!("unknown opcode {:#x}", other),
        }),
    }
}

/// Encode the full program: per core, neuron configuration words in
/// slot order followed by synapse words in row order; cores ascending.
///
/// A pure function of (graph, mapping, profile). Per-core encoding may
/// run on a thread pool; the output is reassembled by core ID so
/// parallelism is never observable.
pub fn encode(
    graph: &GraphModel,
    mapping: &MappingTable,
    profile: &TargetProfile,
) -> Result<Vec<InstructionWord>> {
    let cores = mapping.occupied_cores();

    let encode_core = |core: &bpu_hal::CoreId| -> Result<Vec<InstructionWord>> {
        let core = *core;
        let mut words = Vec::new();

        for (neuron_id, placement) in mapping.neurons_on_core(core) {
            let neuron = graph
                .neuron(neuron_id)
                .ok_or_else(|| CompileError::internal(format!("mapped unknown {}", neuron_id)))?;
            words.push(encode_neuron_word(
                profile,
                &neuron_id.to_string(),
                placement.slot,
                neuron.params.threshold,
                neuron.params.leak,
                neuron.params.bias,
            )?);
        }

        for (syn_id, _row) in mapping.synapses_on_core(core) {
            let syn = graph
                .synapse(syn_id)
                .ok_or_else(|| CompileError::internal(format!("mapped unknown {}", syn_id)))?;
            let source = mapping
                .neuron(syn.source)
                .ok_or(CompileError::DanglingReference {
                    synapse: syn_id,
                    neuron: syn.source,
                })?;
            let target = mapping
                .neuron(syn.target)
                .ok_or(CompileError::DanglingReference {
                    synapse: syn_id,
                    neuron: syn.target,
                })?;
            words.push(encode_synapse_word(
                profile,
                &syn_id.to_string(),
                source.slot,
                target.core.raw(),
                target.slot,
                syn.weight,
                syn.delay,
            )?);
        }

        Ok(words)
    };

    #[cfg(feature = "parallel")]
    let per_core: Vec<Vec<InstructionWord>> = cores
        .par_iter()
        .map(encode_core)
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let per_core: Vec<Vec<InstructionWord>> = cores
        .iter()
        .map(encode_core)
        .collect::<Result<Vec<_>>>()?;

    // `cores` is ascending, so flattening preserves the canonical order.
    Ok(per_core.into_iter().flatten().collect())
}
