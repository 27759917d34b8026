//! Mapping report written alongside the instruction stream
//!
//! A JSON document describing where every neuron and synapse landed
//! and how full each core is, for inspection and downstream tooling.

use std::collections::BTreeMap;

use serde::Serialize;

use bpu_compiler::MappingTable;
use bpu_hal::{PhysicalCore, TargetProfile};
use bpu_model::GraphModel;

use crate::error::Result;

/// Occupancy of one physical core
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CoreUsage {
    /// Core ID
    pub core: u16,
    /// Neurons placed on the core
    pub neurons_used: u32,
    /// Neuron slot capacity
    pub neuron_capacity: u32,
    /// Synapse rows in use
    pub rows_used: u32,
    /// Synapse row capacity
    pub synapse_rows: u32,
    /// Distinct remote cores targeted from this core
    pub remote_targets: u32,
    /// Routing degree limit
    pub max_fanout_cores: u32,
}

/// Placement record for one neuron
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NeuronAssignment {
    /// Neuron ID
    pub neuron: u32,
    /// Hosting core
    pub core: u16,
    /// Slot on the hosting core
    pub slot: u32,
}

/// Row record for one synapse
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SynapseAssignment {
    /// Synapse ID
    pub synapse: u32,
    /// Core hosting the row (the source neuron's core)
    pub core: u16,
    /// Row index
    pub row: u32,
}

/// Full mapping report for a compilation run
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MappingReport {
    /// Profile name the program was compiled for
    pub profile: String,
    /// Per-core occupancy, ascending by core ID
    pub cores: Vec<CoreUsage>,
    /// Neuron placements, ascending by neuron ID
    pub neurons: Vec<NeuronAssignment>,
    /// Synapse rows, ascending by synapse ID
    pub synapses: Vec<SynapseAssignment>,
}

impl MappingReport {
    /// Build a report from a frozen mapping
    pub fn build(
        graph: &GraphModel,
        cores: &[PhysicalCore],
        mapping: &MappingTable,
        profile: &TargetProfile,
    ) -> Self {
        let mut remote: BTreeMap<u16, std::collections::BTreeSet<u16>> = BTreeMap::new();
        for synapse in graph.synapses() {
            let (Some(src), Some(dst)) = (
                mapping.neuron(synapse.source),
                mapping.neuron(synapse.target),
            ) else {
                continue;
            };
            if src.core != dst.core {
                remote
                    .entry(src.core.raw())
                    .or_default()
                    .insert(dst.core.raw());
            }
        }

        let mut sorted: Vec<PhysicalCore> = cores.to_vec();
        sorted.sort_by_key(|c| c.id);
        let core_usage = sorted
            .iter()
            .map(|core| CoreUsage {
                core: core.id.raw(),
                neurons_used: mapping.neurons_on_core(core.id).len() as u32,
                neuron_capacity: core.neuron_capacity,
                rows_used: mapping.synapses_on_core(core.id).len() as u32,
                synapse_rows: core.synapse_rows,
                remote_targets: remote
                    .get(&core.id.raw())
                    .map(|set| set.len() as u32)
                    .unwrap_or(0),
                max_fanout_cores: core.max_fanout_cores,
            })
            .collect();

        let neurons = mapping
            .neurons()
            .map(|(id, placement)| NeuronAssignment {
                neuron: id.raw(),
                core: placement.core.raw(),
                slot: placement.slot,
            })
            .collect();

        let synapses = mapping
            .synapses()
            .map(|(id, row)| SynapseAssignment {
                synapse: id.raw(),
                core: row.core.raw(),
                row: row.row,
            })
            .collect();

        Self {
            profile: profile.name.to_string(),
            cores: core_usage,
            neurons,
            synapses,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render a human-readable summary
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("profile: {}\n", self.profile));
        out.push_str(&format!(
            "placed {} neurons, {} synapse rows across {} cores\n",
            self.neurons.len(),
            self.synapses.len(),
            self.cores.len()
        ));
        for usage in &self.cores {
            out.push_str(&format!(
                "  C{}: neurons {}/{}, rows {}/{}, remote targets {}/{}\n",
                usage.core,
                usage.neurons_used,
                usage.neuron_capacity,
                usage.rows_used,
                usage.synapse_rows,
                usage.remote_targets,
                usage.max_fanout_cores
            ));
        }
        out
    }
}
