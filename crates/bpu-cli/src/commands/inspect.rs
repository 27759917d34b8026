//! Decode and print the words of an emitted stream

use std::path::PathBuf;

use clap::Args;

use bpu_compiler::{decode_word, Instruction};
use bpu_hal::{TargetProfile, PROFILES};
use bpu_stream::format::{revision_from_tag, word_width_from_bits};
use bpu_stream::{StreamHeader, StreamReader};

use crate::error::{CliError, CliResult};

/// Decode a stream and print each instruction
#[derive(Args, Debug)]
pub struct InspectCommand {
    /// Stream file to inspect
    pub input: PathBuf,

    /// Limit output to the first N words
    #[arg(long)]
    pub limit: Option<usize>,
}

impl InspectCommand {
    /// Execute the inspect command
    pub fn execute(self) -> CliResult<()> {
        let (header, words) = StreamReader::new().read_path(&self.input)?;
        let profile = profile_for_header(&header)?;

        println!(
            "{}: {} ({} words)",
            self.input.display(),
            profile,
            words.len()
        );

        let limit = self.limit.unwrap_or(words.len());
        for (index, word) in words.iter().take(limit).enumerate() {
            match decode_word(profile, word)? {
                Instruction::NeuronConfig {
                    slot,
                    threshold,
                    leak,
                    bias,
                } => println!(
                    "{index:6}  neuron-cfg  slot={slot} threshold={threshold} leak={leak} bias={bias}"
                ),
                Instruction::Synapse {
                    source_slot,
                    target_core,
                    target_slot,
                    weight,
                    delay,
                } => println!(
                    "{index:6}  synapse     src-slot={source_slot} -> C{target_core}/slot={target_slot} weight={weight} delay={delay}"
                ),
            }
        }
        if limit < words.len() {
            println!("... {} more words", words.len() - limit);
        }
        Ok(())
    }
}

/// Recover the target profile a stream was encoded for
fn profile_for_header(header: &StreamHeader) -> CliResult<&'static TargetProfile> {
    let width = word_width_from_bits(header.word_bits)?;
    let revision = revision_from_tag(header.revision)?;
    PROFILES
        .iter()
        .find(|p| p.word == width && p.revision == revision)
        .ok_or_else(|| {
            CliError::invalid_args(format!(
                "no profile matches {} bits on {}",
                header.word_bits, revision
            ))
        })
}
