//! CLI command implementations for bpuc

use clap::{Parser, Subcommand};

use crate::error::CliResult;

pub mod compile;
pub mod inspect;
pub mod profiles;
pub mod verify;

/// bpuc - BPU compilation toolchain
#[derive(Parser, Debug)]
#[command(
    name = "bpuc",
    version,
    about = "Compile spiking network graphs into BPU instruction streams",
    long_about = "bpuc maps a spiking network graph onto a described set of BPU cores \
                  and encodes it as a bit-exact instruction stream for the selected \
                  chip profile. Identical inputs always produce identical bytes."
)]
pub struct BpucCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a graph into an instruction stream
    Compile(compile::CompileCommand),

    /// Verify the integrity of an emitted stream
    Verify(verify::VerifyCommand),

    /// List supported target profiles
    Profiles(profiles::ProfilesCommand),

    /// Decode and print the words of an emitted stream
    Inspect(inspect::InspectCommand),
}

impl BpucCli {
    /// Execute the CLI command
    pub fn execute(self) -> CliResult<()> {
        match self.command {
            Commands::Compile(cmd) => cmd.execute(),
            Commands::Verify(cmd) => cmd.execute(),
            Commands::Profiles(cmd) => cmd.execute(),
            Commands::Inspect(cmd) => cmd.execute(),
        }
    }
}
