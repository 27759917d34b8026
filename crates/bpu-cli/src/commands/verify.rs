//! Dry-run mapping and validation without emitting a stream

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use bpu_compiler::{check_encoding, check_mapping, ResourceMapper};
use bpu_hal::TargetProfile;
use bpu_stream::MappingReport;

use crate::config::{load_graph, HardwareConfig};
use crate::error::CliResult;

/// Check that a graph maps and encodes for a profile, without output
#[derive(Args, Debug)]
pub struct VerifyCommand {
    /// Input graph description (JSON)
    pub graph: PathBuf,

    /// Hardware description file (TOML)
    #[arg(long)]
    pub hardware: PathBuf,

    /// Target profile name (see `bpuc profiles`)
    #[arg(short, long)]
    pub profile: String,
}

impl VerifyCommand {
    /// Execute the verify command
    pub fn execute(self) -> CliResult<()> {
        let profile = TargetProfile::select(&self.profile)?;
        let graph = load_graph(&self.graph)?;
        let hardware = HardwareConfig::load(&self.hardware)?;
        let cores = hardware.cores()?;
        let fabric = hardware.fabric()?;

        let mapping = ResourceMapper::new(&cores, fabric.as_ref()).map(&graph)?;
        check_mapping(&graph, &cores, fabric.as_ref(), &mapping)?;
        check_encoding(&graph, &mapping, profile)?;

        info!("verification passed for {}", profile);
        println!(
            "{}: ok for {} ({} neurons, {} synapses)",
            self.graph.display(),
            profile,
            graph.neuron_count(),
            graph.synapse_count()
        );
        print!(
            "{}",
            MappingReport::build(&graph, &cores, &mapping, profile).render_text()
        );
        Ok(())
    }
}
