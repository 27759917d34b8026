//! Compile a graph description into a BPU instruction stream

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use bpu_compiler::compile;
use bpu_hal::TargetProfile;
use bpu_stream::{Emitter, MappingReport};

use crate::config::{load_graph, HardwareConfig};
use crate::error::CliResult;

/// Compile a graph into an instruction stream
#[derive(Args, Debug)]
pub struct CompileCommand {
    /// Input graph description (JSON)
    pub graph: PathBuf,

    /// Hardware description file (TOML)
    #[arg(long)]
    pub hardware: PathBuf,

    /// Target profile name (see `bpuc profiles`)
    #[arg(short, long)]
    pub profile: String,

    /// Output stream path
    #[arg(short, long, default_value = "program.bpu")]
    pub output: PathBuf,

    /// Also write the mapping report next to the stream
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl CompileCommand {
    /// Execute the compile command
    pub fn execute(self) -> CliResult<()> {
        // Resolve the profile before touching inputs, so an unknown
        // name fails without leaving partial output behind.
        let profile = TargetProfile::select(&self.profile)?;

        let graph = load_graph(&self.graph)?;
        let hardware = HardwareConfig::load(&self.hardware)?;
        let cores = hardware.cores()?;
        let fabric = hardware.fabric()?;

        info!(
            "compiling {} ({} neurons, {} synapses) for {}",
            self.graph.display(),
            graph.neuron_count(),
            graph.synapse_count(),
            profile
        );

        let program = compile(&graph, &cores, fabric.as_ref(), profile)?;
        let written = Emitter::new().emit_to_path(&program, &self.output)?;

        let report = MappingReport::build(&graph, &cores, &program.mapping, profile);
        if let Some(report_path) = &self.report {
            std::fs::write(report_path, report.to_json()?)?;
            info!("wrote mapping report to {}", report_path.display());
        }

        println!(
            "wrote {} ({} words, {} bytes)",
            self.output.display(),
            program.words.len(),
            written
        );
        print!("{}", report.render_text());
        Ok(())
    }
}
