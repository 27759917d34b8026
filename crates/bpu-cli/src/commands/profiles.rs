//! List supported target profiles

use clap::Args;

use bpu_hal::PROFILES;

use crate::error::CliResult;

/// List supported target profiles
#[derive(Args, Debug)]
pub struct ProfilesCommand {
    /// Show field widths for each profile
    #[arg(long)]
    pub detailed: bool,
}

impl ProfilesCommand {
    /// Execute the profiles command
    pub fn execute(self) -> CliResult<()> {
        for profile in PROFILES {
            println!("{profile}");
            if self.detailed {
                println!(
                    "  opcode {}b, core {}b, slot {}b, weight {}b, delay {}b, param {}b",
                    profile.opcode_bits,
                    profile.core_bits,
                    profile.slot_bits,
                    profile.weight_bits,
                    profile.delay_bits,
                    profile.param_bits
                );
                println!(
                    "  neuron word {}b, synapse word {}b (of {}b)",
                    profile.neuron_word_bits(),
                    profile.synapse_word_bits(),
                    profile.word.bits()
                );
            }
        }
        Ok(())
    }
}
