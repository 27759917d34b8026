//! Target profiles: chip revision, word width, and field sizes
//!
//! One profile per supported silicon variant. Dispatch across the
//! three word widths is data-driven: the encoder reads field widths
//! from the active profile instead of branching per variant, so all
//! widths share one conformance suite.

use core::fmt;

use crate::error::{HalError, Result};

/// Silicon process node / chip revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChipRevision {
    /// 40 nm node (FPGA-bridged bring-up silicon)
    Bpu40,
    /// 28 nm node (production ASIC)
    Bpu28,
}

impl fmt::Display for ChipRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChipRevision::Bpu40 => write!(f, "40nm"),
            ChipRevision::Bpu28 => write!(f, "28nm"),
        }
    }
}

/// Instruction word width family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WordWidth {
    /// 32-bit instruction words
    W32,
    /// 64-bit instruction words
    W64,
    /// 96-bit instruction words
    W96,
}

impl WordWidth {
    /// Width in bits
    pub const fn bits(self) -> u32 {
        match self {
            WordWidth::W32 => 32,
            WordWidth::W64 => 64,
            WordWidth::W96 => 96,
        }
    }

    /// Width in bytes
    pub const fn bytes(self) -> usize {
        (self.bits() / 8) as usize
    }
}

impl fmt::Display for WordWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bit", self.bits())
    }
}

/// Field widths and numeric ranges for one silicon variant
///
/// Field layout of the two word kinds (LSB-first):
/// - neuron config: opcode, slot, threshold, leak, bias
/// - synapse: opcode, source slot, target core, target slot, weight, delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetProfile {
    /// Profile name accepted by `select`
    pub name: &'static str,
    /// Chip revision this profile targets
    pub revision: ChipRevision,
    /// Instruction word width
    pub word: WordWidth,
    /// Opcode field width
    pub opcode_bits: u32,
    /// Core address field width
    pub core_bits: u32,
    /// Local slot / neuron address field width
    pub slot_bits: u32,
    /// Synapse weight field width (two's complement)
    pub weight_bits: u32,
    /// Synapse delay field width (unsigned)
    pub delay_bits: u32,
    /// Neuron parameter field width (two's complement), used for
    /// threshold, leak, and bias
    pub param_bits: u32,
}

impl TargetProfile {
    /// Total bits of a synapse word's payload
    pub const fn synapse_word_bits(&self) -> u32 {
        self.opcode_bits + 2 * self.slot_bits + self.core_bits + self.weight_bits + self.delay_bits
    }

    /// Total bits of a neuron configuration word's payload
    pub const fn neuron_word_bits(&self) -> u32 {
        self.opcode_bits + self.slot_bits + 3 * self.param_bits
    }

    /// Look up a profile by name; pure lookup into the static table
    pub fn select(name: &str) -> Result<&'static TargetProfile> {
        PROFILES
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| HalError::UnknownProfile {
                name: name.to_string(),
                supported: PROFILES
                    .iter()
                    .map(|p| p.name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for TargetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.revision, self.word)
    }
}

/// Static table of supported silicon variants
pub static PROFILES: &[TargetProfile] = &[
    TargetProfile {
        name: "bpu40-32bit",
        revision: ChipRevision::Bpu40,
        word: WordWidth::W32,
        opcode_bits: 4,
        core_bits: 5,
        slot_bits: 5,
        weight_bits: 8,
        delay_bits: 5,
        param_bits: 6,
    },
    TargetProfile {
        name: "bpu28-64bit",
        revision: ChipRevision::Bpu28,
        word: WordWidth::W64,
        opcode_bits: 6,
        core_bits: 8,
        slot_bits: 10,
        weight_bits: 16,
        delay_bits: 8,
        param_bits: 14,
    },
    TargetProfile {
        name: "bpu28-96bit",
        revision: ChipRevision::Bpu28,
        word: WordWidth::W96,
        opcode_bits: 8,
        core_bits: 10,
        slot_bits: 12,
        weight_bits: 24,
        delay_bits: 12,
        param_bits: 20,
    },
];

/// Maximum value of an unsigned field of the given width
pub const fn max_unsigned(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Maximum value of a two's-complement field of the given width
pub const fn max_signed(bits: u32) -> i64 {
    (1i64 << (bits - 1)) - 1
}

/// Minimum value of a two's-complement field of the given width
pub const fn min_signed(bits: u32) -> i64 {
    -(1i64 << (bits - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_known_profiles() {
        for name in ["bpu40-32bit", "bpu28-64bit", "bpu28-96bit"] {
            let profile = TargetProfile::select(name).unwrap();
            assert_eq!(profile.name, name);
        }
    }

    #[test]
    fn select_unknown_profile() {
        let err = TargetProfile::select("48bit").unwrap_err();
        match err {
            HalError::UnknownProfile { name, supported } => {
                assert_eq!(name, "48bit");
                assert!(supported.contains("bpu40-32bit"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn words_fit_their_width() {
        for profile in PROFILES {
            assert!(
                profile.synapse_word_bits() <= profile.word.bits(),
                "{}: synapse word overflows",
                profile.name
            );
            assert!(
                profile.neuron_word_bits() <= profile.word.bits(),
                "{}: neuron word overflows",
                profile.name
            );
        }
    }

    #[test]
    fn signed_ranges() {
        assert_eq!(max_signed(8), 127);
        assert_eq!(min_signed(8), -128);
        assert_eq!(max_unsigned(5), 31);
        assert_eq!(max_unsigned(12), 4095);
    }

    #[test]
    fn profile_display() {
        let p = TargetProfile::select("bpu28-96bit").unwrap();
        assert_eq!(format!("{}", p), "bpu28-96bit (28nm, 96bit)");
    }
}
