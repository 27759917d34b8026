//! Graph records and the ingestion builder
//!
//! `GraphModel` is built exactly once per compilation run through
//! `GraphBuilder`, which resolves every synapse endpoint and rejects
//! duplicate ids up front. After `build()` the model is read-only.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::error::{ModelError, Result};
use crate::ids::{NeuronId, SynapseId};

/// Fixed-point configuration values for one neuron
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeuronParams {
    /// Firing threshold (signed fixed-point)
    pub threshold: i32,
    /// Leak term applied each step (signed fixed-point)
    pub leak: i32,
    /// Constant bias current (signed fixed-point)
    pub bias: i32,
}

impl Default for NeuronParams {
    fn default() -> Self {
        Self {
            threshold: 1,
            leak: 0,
            bias: 0,
        }
    }
}

/// A neuron record: parameters plus the fan-out collected at ingestion
#[derive(Debug, Clone)]
pub struct Neuron {
    /// Unique neuron ID
    pub id: NeuronId,
    /// Configuration parameters
    pub params: NeuronParams,
    /// Outgoing synapse IDs, ascending
    pub fanout: SmallVec<[SynapseId; 4]>,
}

/// A synapse record: weighted, delayed connection between two neurons
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Synapse {
    /// Unique synapse ID
    pub id: SynapseId,
    /// Pre-synaptic neuron
    pub source: NeuronId,
    /// Post-synaptic neuron
    pub target: NeuronId,
    /// Signed fixed-point weight
    pub weight: i32,
    /// Transmission delay in hardware ticks
    pub delay: u32,
}

/// Read-only graph model consumed by all compiler stages
///
/// Iteration order over neurons and synapses is ascending by ID, which
/// every downstream stage relies on for deterministic output.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    neurons: BTreeMap<NeuronId, Neuron>,
    synapses: BTreeMap<SynapseId, Synapse>,
}

impl GraphModel {
    /// Number of neurons in the graph
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// Number of synapses in the graph
    pub fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    /// Look up a neuron by ID
    pub fn neuron(&self, id: NeuronId) -> Option<&Neuron> {
        self.neurons.get(&id)
    }

    /// Look up a synapse by ID
    pub fn synapse(&self, id: SynapseId) -> Option<&Synapse> {
        self.synapses.get(&id)
    }

    /// Iterate neurons in ascending ID order
    pub fn neurons(&self) -> impl Iterator<Item = &Neuron> {
        self.neurons.values()
    }

    /// Iterate synapses in ascending ID order
    pub fn synapses(&self) -> impl Iterator<Item = &Synapse> {
        self.synapses.values()
    }

    /// Whether the graph contains the given neuron
    pub fn contains_neuron(&self, id: NeuronId) -> bool {
        self.neurons.contains_key(&id)
    }
}

/// Builder that ingests adapter records and validates them once
#[derive(Debug, Default)]
pub struct GraphBuilder {
    neurons: BTreeMap<NeuronId, Neuron>,
    synapses: BTreeMap<SynapseId, Synapse>,
}

impl GraphBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a neuron with the given parameters
    pub fn add_neuron(mut self, id: NeuronId, params: NeuronParams) -> Result<Self> {
        if !id.is_valid() {
            return Err(ModelError::ReservedId { entity: "neuron" });
        }
        if self.neurons.contains_key(&id) {
            return Err(ModelError::DuplicateNeuron { neuron: id });
        }
        self.neurons.insert(
            id,
            Neuron {
                id,
                params,
                fanout: SmallVec::new(),
            },
        );
        Ok(self)
    }

    /// Add a synapse; both endpoints must already be present
    pub fn add_synapse(
        mut self,
        id: SynapseId,
        source: NeuronId,
        target: NeuronId,
        weight: i32,
        delay: u32,
    ) -> Result<Self> {
        if !id.is_valid() {
            return Err(ModelError::ReservedId { entity: "synapse" });
        }
        if self.synapses.contains_key(&id) {
            return Err(ModelError::DuplicateSynapse { synapse: id });
        }
        if !self.neurons.contains_key(&source) {
            return Err(ModelError::UnknownNeuron {
                synapse: id,
                neuron: source,
                endpoint: "source",
            });
        }
        if !self.neurons.contains_key(&target) {
            return Err(ModelError::UnknownNeuron {
                synapse: id,
                neuron: target,
                endpoint: "target",
            });
        }
        self.synapses.insert(
            id,
            Synapse {
                id,
                source,
                target,
                weight,
                delay,
            },
        );
        Ok(self)
    }

    /// Finalize the model; fan-out lists are populated here
    pub fn build(mut self) -> Result<GraphModel> {
        if self.neurons.is_empty() {
            return Err(ModelError::EmptyGraph);
        }

        // BTreeMap iteration gives ascending synapse ids, so fan-out
        // lists come out sorted without an explicit sort.
        for syn in self.synapses.values() {
            if let Some(neuron) = self.neurons.get_mut(&syn.source) {
                neuron.fanout.push(syn.id);
            }
        }

        log::debug!(
            "graph ingested: {} neurons, {} synapses",
            self.neurons.len(),
            self.synapses.len()
        );

        Ok(GraphModel {
            neurons: self.neurons,
            synapses: self.synapses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_neuron_graph() -> GraphModel {
        GraphBuilder::new()
            .add_neuron(NeuronId::new(0), NeuronParams::default())
            .unwrap()
            .add_neuron(NeuronId::new(1), NeuronParams::default())
            .unwrap()
            .add_synapse(SynapseId::new(0), NeuronId::new(0), NeuronId::new(1), 5, 1)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn build_small_graph() {
        let g = two_neuron_graph();
        assert_eq!(g.neuron_count(), 2);
        assert_eq!(g.synapse_count(), 1);

        let n0 = g.neuron(NeuronId::new(0)).unwrap();
        assert_eq!(n0.fanout.as_slice(), &[SynapseId::new(0)]);

        let s0 = g.synapse(SynapseId::new(0)).unwrap();
        assert_eq!(s0.weight, 5);
        assert_eq!(s0.delay, 1);
    }

    #[test]
    fn duplicate_neuron_rejected() {
        let err = GraphBuilder::new()
            .add_neuron(NeuronId::new(0), NeuronParams::default())
            .unwrap()
            .add_neuron(NeuronId::new(0), NeuronParams::default())
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateNeuron { .. }));
    }

    #[test]
    fn dangling_endpoint_rejected() {
        let err = GraphBuilder::new()
            .add_neuron(NeuronId::new(0), NeuronParams::default())
            .unwrap()
            .add_synapse(SynapseId::new(0), NeuronId::new(0), NeuronId::new(9), 1, 0)
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::UnknownNeuron {
                endpoint: "target",
                ..
            }
        ));
    }

    #[test]
    fn empty_graph_rejected() {
        let err = GraphBuilder::new().build().unwrap_err();
        assert!(matches!(err, ModelError::EmptyGraph));
    }

    #[test]
    fn fanout_order_is_ascending() {
        let g = GraphBuilder::new()
            .add_neuron(NeuronId::new(0), NeuronParams::default())
            .unwrap()
            .add_neuron(NeuronId::new(1), NeuronParams::default())
            .unwrap()
            .add_synapse(SynapseId::new(5), NeuronId::new(0), NeuronId::new(1), 1, 0)
            .unwrap()
            .add_synapse(SynapseId::new(2), NeuronId::new(0), NeuronId::new(1), 1, 0)
            .unwrap()
            .build()
            .unwrap();

        let n0 = g.neuron(NeuronId::new(0)).unwrap();
        assert_eq!(
            n0.fanout.as_slice(),
            &[SynapseId::new(2), SynapseId::new(5)]
        );
    }

    proptest::proptest! {
        #[test]
        fn fanout_totals_match_synapse_count(
            n in 1u32..16,
            edges in proptest::collection::vec((0u32..16, 0u32..16), 0..32),
        ) {
            let mut b = GraphBuilder::new();
            for i in 0..n {
                b = b.add_neuron(NeuronId::new(i), NeuronParams::default()).unwrap();
            }
            let mut next_id = 0u32;
            for (src, dst) in edges {
                if src < n && dst < n {
                    b = b
                        .add_synapse(
                            SynapseId::new(next_id),
                            NeuronId::new(src),
                            NeuronId::new(dst),
                            1,
                            0,
                        )
                        .unwrap();
                    next_id += 1;
                }
            }
            let g = b.build().unwrap();
            let total: usize = g.neurons().map(|neuron| neuron.fanout.len()).sum();
            proptest::prop_assert_eq!(total, g.synapse_count());
        }
    }
}
