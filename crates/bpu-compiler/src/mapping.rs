//! Resource mapping: logical neurons and synapses onto physical cores
//!
//! Placement is greedy first-fit over a deterministic breadth-first
//! traversal of the graph, so strongly connected clusters land on the
//! same or adjacent cores and identical inputs always map identically.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use bpu_hal::{CoreId, PhysicalCore, RoutingFabric};
use bpu_model::{GraphModel, NeuronId, SynapseId};

use crate::error::{CompileError, Result};

/// Physical location of one mapped neuron
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Core hosting the neuron
    pub core: CoreId,
    /// Local slot index on that core
    pub slot: u32,
}

/// Physical location of one mapped synapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAssignment {
    /// Core hosting the row (always the source neuron's core)
    pub core: CoreId,
    /// Row index on that core
    pub row: u32,
}

/// Immutable result of the mapping stage
///
/// Owned by the mapper; handed by reference to the validator and
/// encoder and never mutated after post-mapping validation succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    neurons: BTreeMap<NeuronId, Placement>,
    synapses: BTreeMap<SynapseId, RowAssignment>,
}

impl MappingTable {
    /// Look up a neuron's placement
    pub fn neuron(&self, id: NeuronId) -> Option<Placement> {
        self.neurons.get(&id).copied()
    }

    /// Look up a synapse's row assignment
    pub fn synapse(&self, id: SynapseId) -> Option<RowAssignment> {
        self.synapses.get(&id).copied()
    }

    /// Iterate neuron placements in ascending neuron ID order
    pub fn neurons(&self) -> impl Iterator<Item = (NeuronId, Placement)> + '_ {
        self.neurons.iter().map(|(id, p)| (*id, *p))
    }

    /// Iterate synapse row assignments in ascending synapse ID order
    pub fn synapses(&self) -> impl Iterator<Item = (SynapseId, RowAssignment)> + '_ {
        self.synapses.iter().map(|(id, r)| (*id, *r))
    }

    /// Number of mapped neurons
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// Number of mapped synapses
    pub fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    /// Neurons placed on the given core, ascending slot order
    pub fn neurons_on_core(&self, core: CoreId) -> Vec<(NeuronId, Placement)> {
        let mut placed: Vec<_> = self
            .neurons()
            .filter(|(_, p)| p.core == core)
            .collect();
        placed.sort_by_key(|(_, p)| p.slot);
        placed
    }

    /// Synapses rowed on the given core, ascending row order
    pub fn synapses_on_core(&self, core: CoreId) -> Vec<(SynapseId, RowAssignment)> {
        let mut rows: Vec<_> = self
            .synapses()
            .filter(|(_, r)| r.core == core)
            .collect();
        rows.sort_by_key(|(_, r)| r.row);
        rows
    }

    /// Cores that host at least one neuron or synapse row, ascending
    pub fn occupied_cores(&self) -> Vec<CoreId> {
        let mut cores: BTreeSet<CoreId> = self.neurons.values().map(|p| p.core).collect();
        cores.extend(self.synapses.values().map(|r| r.core));
        cores.into_iter().collect()
    }
}

/// Greedy first-fit mapper
pub struct ResourceMapper<'a> {
    cores: Vec<PhysicalCore>,
    fabric: &'a dyn RoutingFabric,
}

impl<'a> ResourceMapper<'a> {
    /// Create a mapper for the given core set and routing fabric
    pub fn new(cores: &[PhysicalCore], fabric: &'a dyn RoutingFabric) -> Self {
        let mut cores = cores.to_vec();
        cores.sort_by_key(|c| c.id);
        Self { cores, fabric }
    }

    /// Map the graph onto the core set
    pub fn map(&self, graph: &GraphModel) -> Result<MappingTable> {
        let order = traversal_order(graph);
        let neurons = self.place_neurons(&order)?;
        let synapses = self.place_synapses(graph, &neurons)?;

        log::debug!(
            "mapped {} neurons and {} synapses onto {} cores ({})",
            neurons.len(),
            synapses.len(),
            self.cores.len(),
            self.fabric.name(),
        );

        Ok(MappingTable { neurons, synapses })
    }

    fn place_neurons(&self, order: &[NeuronId]) -> Result<BTreeMap<NeuronId, Placement>> {
        let mut placements = BTreeMap::new();
        let mut used: Vec<u32> = vec![0; self.cores.len()];

        for (placed, &neuron) in order.iter().enumerate() {
            let next = self
                .cores
                .iter()
                .enumerate()
                .find(|(i, core)| used[*i] < core.neuron_capacity);

            let (idx, core) = match next {
                Some(found) => found,
                None => {
                    // All cores full. Report the last core with the
                    // outstanding deficit so the caller can size up.
                    let Some(last) = self.cores.last() else {
                        return Err(CompileError::Hal(bpu_hal::HalError::NoCores));
                    };
                    let remaining = (order.len() - placed) as u32;
                    return Err(CompileError::CapacityExceeded {
                        core: last.id,
                        resource: "neuron",
                        capacity: last.neuron_capacity,
                        required: last.neuron_capacity + remaining,
                    });
                }
            };

            placements.insert(
                neuron,
                Placement {
                    core: core.id,
                    slot: used[idx],
                },
            );
            used[idx] += 1;
        }

        Ok(placements)
    }

    fn place_synapses(
        &self,
        graph: &GraphModel,
        neurons: &BTreeMap<NeuronId, Placement>,
    ) -> Result<BTreeMap<SynapseId, RowAssignment>> {
        let core_by_id: BTreeMap<CoreId, &PhysicalCore> =
            self.cores.iter().map(|c| (c.id, c)).collect();

        let mut rows = BTreeMap::new();
        let mut rows_used: BTreeMap<CoreId, u32> = BTreeMap::new();
        let mut remote_targets: BTreeMap<CoreId, BTreeSet<CoreId>> = BTreeMap::new();

        for syn in graph.synapses() {
            let src = neurons.get(&syn.source).ok_or(CompileError::DanglingReference {
                synapse: syn.id,
                neuron: syn.source,
            })?;
            let dst = neurons.get(&syn.target).ok_or(CompileError::DanglingReference {
                synapse: syn.id,
                neuron: syn.target,
            })?;

            let core = core_by_id
                .get(&src.core)
                .ok_or_else(|| CompileError::internal(format!("unknown core {}", src.core)))?;

            if !self.fabric.reachable(src.core, dst.core) {
                return Err(CompileError::UnroutableSynapse {
                    synapse: syn.id,
                    source_core: src.core,
                    target_core: dst.core,
                    reason: "destination core unreachable through fabric",
                });
            }

            if dst.core != src.core {
                let targets = remote_targets.entry(src.core).or_default();
                targets.insert(dst.core);
                if targets.len() as u32 > core.max_fanout_cores {
                    return Err(CompileError::UnroutableSynapse {
                        synapse: syn.id,
                        source_core: src.core,
                        target_core: dst.core,
                        reason: "routing degree limit exceeded",
                    });
                }
            }

            let used = rows_used.entry(src.core).or_insert(0);
            if *used >= core.synapse_rows {
                return Err(CompileError::CapacityExceeded {
                    core: src.core,
                    resource: "synapse-row",
                    capacity: core.synapse_rows,
                    required: *used + 1,
                });
            }

            rows.insert(
                syn.id,
                RowAssignment {
                    core: src.core,
                    row: *used,
                },
            );
            *used += 1;
        }

        Ok(rows)
    }
}

/// Deterministic breadth-first neuron order: roots in ascending ID,
/// neighbors visited along ascending synapse IDs. Connected clusters
/// come out adjacent, so first-fit packs them onto the same core.
fn traversal_order(graph: &GraphModel) -> Vec<NeuronId> {
    let mut order = Vec::with_capacity(graph.neuron_count());
    let mut visited: BTreeSet<NeuronId> = BTreeSet::new();
    let mut queue: VecDeque<NeuronId> = VecDeque::new();

    for root in graph.neurons() {
        if visited.contains(&root.id) {
            continue;
        }
        visited.insert(root.id);
        queue.push_back(root.id);

        while let Some(current) = queue.pop_front() {
            order.push(current);
            let neuron = graph
                .neuron(current)
                .expect("traversal only visits graph neurons");
            for &syn_id in &neuron.fanout {
                let syn = graph
                    .synapse(syn_id)
                    .expect("fanout lists only reference graph synapses");
                if visited.insert(syn.target) {
                    queue.push_back(syn.target);
                }
            }
        }
    }

    order
}
