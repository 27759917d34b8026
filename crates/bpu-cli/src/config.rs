//! Input file loaders: hardware descriptions (TOML) and graphs (JSON)

use std::path::Path;

use serde::Deserialize;

use bpu_hal::{validate_core_set, CoreId, Crossbar, MeshFabric, PhysicalCore, RoutingFabric};
use bpu_model::{GraphBuilder, GraphModel, NeuronId, NeuronParams, SynapseId};

use crate::error::{CliError, CliResult};

/// Hardware description file: core inventory plus routing fabric
#[derive(Debug, Deserialize)]
pub struct HardwareConfig {
    /// Core inventory
    #[serde(rename = "core")]
    pub cores: Vec<CoreEntry>,

    /// Routing fabric selection
    #[serde(default)]
    pub fabric: FabricConfig,
}

/// One `[[core]]` table
#[derive(Debug, Deserialize)]
pub struct CoreEntry {
    /// Core ID
    pub id: u16,
    /// Maximum neurons on this core
    pub neuron_capacity: u32,
    /// Synapse row count
    pub synapse_rows: u32,
    /// Routing degree limit
    pub max_fanout_cores: u32,
}

/// `[fabric]` table
#[derive(Debug, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FabricConfig {
    /// All-to-all interconnect
    #[default]
    Crossbar,
    /// 2D mesh with a hop budget
    Mesh {
        /// Mesh width in cores
        width: u16,
        /// Maximum Manhattan hop count
        max_hops: u16,
    },
}

impl HardwareConfig {
    /// Load and validate a hardware description
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HardwareConfig = toml::from_str(&content)?;
        if config.cores.is_empty() {
            return Err(CliError::config(format!(
                "{}: no [[core]] entries",
                path.display()
            )));
        }
        Ok(config)
    }

    /// Validated, sorted core set
    pub fn cores(&self) -> CliResult<Vec<PhysicalCore>> {
        let cores = self
            .cores
            .iter()
            .map(|entry| {
                PhysicalCore::new(
                    CoreId::new(entry.id),
                    entry.neuron_capacity,
                    entry.synapse_rows,
                    entry.max_fanout_cores,
                )
            })
            .collect();
        Ok(validate_core_set(cores)?)
    }

    /// Routing fabric instance
    pub fn fabric(&self) -> CliResult<Box<dyn RoutingFabric>> {
        match self.fabric {
            FabricConfig::Crossbar => Ok(Box::new(Crossbar)),
            FabricConfig::Mesh { width, max_hops } => {
                Ok(Box::new(MeshFabric::new(width, max_hops)?))
            }
        }
    }
}

/// Graph description file
#[derive(Debug, Deserialize)]
pub struct GraphFile {
    /// Neuron list
    pub neurons: Vec<NeuronEntry>,
    /// Synapse list
    #[serde(default)]
    pub synapses: Vec<SynapseEntry>,
}

/// One neuron record
#[derive(Debug, Deserialize)]
pub struct NeuronEntry {
    /// Neuron ID
    pub id: u32,
    /// Firing threshold
    #[serde(default = "default_threshold")]
    pub threshold: i32,
    /// Leak per timestep
    #[serde(default)]
    pub leak: i32,
    /// Constant input bias
    #[serde(default)]
    pub bias: i32,
}

fn default_threshold() -> i32 {
    1
}

/// One synapse record
#[derive(Debug, Deserialize)]
pub struct SynapseEntry {
    /// Synapse ID
    pub id: u32,
    /// Source neuron ID
    pub source: u32,
    /// Target neuron ID
    pub target: u32,
    /// Signed weight
    pub weight: i32,
    /// Delay in timesteps
    #[serde(default)]
    pub delay: u32,
}

/// Load a graph description and build the validated model
pub fn load_graph(path: &Path) -> CliResult<GraphModel> {
    let content = std::fs::read_to_string(path)?;
    let file: GraphFile = serde_json::from_str(&content)?;

    let mut builder = GraphBuilder::new();
    for neuron in &file.neurons {
        builder = builder.add_neuron(
            NeuronId::new(neuron.id),
            NeuronParams {
                threshold: neuron.threshold,
                leak: neuron.leak,
                bias: neuron.bias,
            },
        )?;
    }
    for synapse in &file.synapses {
        builder = builder.add_synapse(
            SynapseId::new(synapse.id),
            NeuronId::new(synapse.source),
            NeuronId::new(synapse.target),
            synapse.weight,
            synapse.delay,
        )?;
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_hardware_toml() {
        let text = r#"
            [[core]]
            id = 0
            neuron_capacity = 16
            synapse_rows = 64
            max_fanout_cores = 4

            [[core]]
            id = 1
            neuron_capacity = 16
            synapse_rows = 64
            max_fanout_cores = 4

            [fabric]
            kind = "mesh"
            width = 2
            max_hops = 1
        "#;
        let config: HardwareConfig = toml::from_str(text).unwrap();
        let cores = config.cores().unwrap();
        assert_eq!(cores.len(), 2);
        assert_eq!(config.fabric().unwrap().name(), "mesh");
    }

    #[test]
    fn zero_mesh_width_rejected() {
        let text = r#"
            [[core]]
            id = 0
            neuron_capacity = 4
            synapse_rows = 8
            max_fanout_cores = 2

            [fabric]
            kind = "mesh"
            width = 0
            max_hops = 2
        "#;
        let config: HardwareConfig = toml::from_str(text).unwrap();
        assert!(matches!(config.fabric(), Err(CliError::Hal(_))));
    }

    #[test]
    fn fabric_defaults_to_crossbar() {
        let text = r#"
            [[core]]
            id = 0
            neuron_capacity = 4
            synapse_rows = 8
            max_fanout_cores = 2
        "#;
        let config: HardwareConfig = toml::from_str(text).unwrap();
        assert_eq!(config.fabric().unwrap().name(), "crossbar");
    }

    #[test]
    fn load_graph_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "neurons": [
                    {{"id": 0, "threshold": 10}},
                    {{"id": 1}}
                ],
                "synapses": [
                    {{"id": 0, "source": 0, "target": 1, "weight": -3, "delay": 2}}
                ]
            }}"#
        )
        .unwrap();
        let graph = load_graph(file.path()).unwrap();
        assert_eq!(graph.neuron_count(), 2);
        assert_eq!(graph.synapse_count(), 1);
        assert_eq!(graph.neuron(NeuronId::new(0)).unwrap().params.threshold, 10);
    }

    #[test]
    fn dangling_synapse_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "neurons": [{{"id": 0}}],
                "synapses": [{{"id": 0, "source": 0, "target": 9, "weight": 1}}]
            }}"#
        )
        .unwrap();
        assert!(matches!(
            load_graph(file.path()),
            Err(CliError::Model(_))
        ));
    }
}
