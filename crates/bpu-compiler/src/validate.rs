//! Cross-checks over mapping and encoding invariants
//!
//! The validator runs twice per compilation: after mapping (capacity,
//! coverage, reachability) and around encoding (field-width fit).
//! Values that do not fit a profile field are reported, never
//! truncated.

use std::collections::{BTreeMap, BTreeSet};

use bpu_hal::{
    max_signed, max_unsigned, min_signed, CoreId, PhysicalCore, RoutingFabric, TargetProfile,
};
use bpu_model::GraphModel;

use crate::error::{CompileError, Result};
use crate::mapping::MappingTable;

/// Verify capacity, coverage, and routing invariants after mapping
pub fn check_mapping(
    graph: &GraphModel,
    cores: &[PhysicalCore],
    fabric: &dyn RoutingFabric,
    mapping: &MappingTable,
) -> Result<()> {
    let core_by_id: BTreeMap<CoreId, &PhysicalCore> = cores.iter().map(|c| (c.id, c)).collect();

    // Every neuron mapped exactly once, to a real core, with a unique slot.
    let mut slots_seen: BTreeSet<(CoreId, u32)> = BTreeSet::new();
    let mut neuron_load: BTreeMap<CoreId, u32> = BTreeMap::new();
    for neuron in graph.neurons() {
        let placement = mapping.neuron(neuron.id).ok_or_else(|| {
            CompileError::internal(format!("neuron {} missing from mapping", neuron.id))
        })?;
        if !core_by_id.contains_key(&placement.core) {
            return Err(CompileError::internal(format!(
                "neuron {} placed on unknown core {}",
                neuron.id, placement.core
            )));
        }
        if !slots_seen.insert((placement.core, placement.slot)) {
            return Err(CompileError::internal(format!(
                "slot {} on {} assigned twice",
                placement.slot, placement.core
            )));
        }
        *neuron_load.entry(placement.core).or_insert(0) += 1;
    }
    for (core_id, load) in &neuron_load {
        let core = core_by_id[core_id];
        if *load > core.neuron_capacity {
            return Err(CompileError::CapacityExceeded {
                core: *core_id,
                resource: "neuron",
                capacity: core.neuron_capacity,
                required: *load,
            });
        }
    }

    // Every synapse mapped exactly once; its row lives on the source
    // core; endpoints resolved; routing constraints hold.
    let mut rows_seen: BTreeSet<(CoreId, u32)> = BTreeSet::new();
    let mut row_load: BTreeMap<CoreId, u32> = BTreeMap::new();
    let mut remote_targets: BTreeMap<CoreId, BTreeSet<CoreId>> = BTreeMap::new();
    for syn in graph.synapses() {
        let source = mapping
            .neuron(syn.source)
            .ok_or(CompileError::DanglingReference {
                synapse: syn.id,
                neuron: syn.source,
            })?;
        let target = mapping
            .neuron(syn.target)
            .ok_or(CompileError::DanglingReference {
                synapse: syn.id,
                neuron: syn.target,
            })?;
        let row = mapping.synapse(syn.id).ok_or_else(|| {
            CompileError::internal(format!("synapse {} missing from mapping", syn.id))
        })?;

        if row.core != source.core {
            return Err(CompileError::internal(format!(
                "synapse {} rowed on {} but sourced from {}",
                syn.id, row.core, source.core
            )));
        }
        if !rows_seen.insert((row.core, row.row)) {
            return Err(CompileError::internal(format!(
                "row {} on {} assigned twice",
                row.row, row.core
            )));
        }
        *row_load.entry(row.core).or_insert(0) += 1;

        if !fabric.reachable(source.core, target.core) {
            return Err(CompileError::UnroutableSynapse {
                synapse: syn.id,
                source_core: source.core,
                target_core: target.core,
                reason: "destination core unreachable through fabric",
            });
        }
        if target.core != source.core {
            remote_targets
                .entry(source.core)
                .or_default()
                .insert(target.core);
        }
    }
    for (core_id, load) in &row_load {
        let core = core_by_id[core_id];
        if *load > core.synapse_rows {
            return Err(CompileError::CapacityExceeded {
                core: *core_id,
                resource: "synapse-row",
                capacity: core.synapse_rows,
                required: *load,
            });
        }
    }
    for (core_id, targets) in &remote_targets {
        let core = core_by_id[core_id];
        if targets.len() as u32 > core.max_fanout_cores {
            // Degree breaches are reported against the first synapse
            // that targets a surplus core during mapping; here we only
            // confirm the aggregate bound.
            return Err(CompileError::internal(format!(
                "core {} targets {} remote cores, degree limit {}",
                core_id,
                targets.len(),
                core.max_fanout_cores
            )));
        }
    }

    // Mapping carries no entries beyond the graph.
    if mapping.neuron_count() != graph.neuron_count() {
        return Err(CompileError::internal(format!(
            "mapping has {} neurons, graph has {}",
            mapping.neuron_count(),
            graph.neuron_count()
        )));
    }
    if mapping.synapse_count() != graph.synapse_count() {
        return Err(CompileError::internal(format!(
            "mapping has {} synapses, graph has {}",
            mapping.synapse_count(),
            graph.synapse_count()
        )));
    }

    Ok(())
}

/// Verify that every mapped value fits the profile's field widths
pub fn check_encoding(
    graph: &GraphModel,
    mapping: &MappingTable,
    profile: &TargetProfile,
) -> Result<()> {
    let slot_max = max_unsigned(profile.slot_bits) as i64;
    let core_max = max_unsigned(profile.core_bits) as i64;
    let delay_max = max_unsigned(profile.delay_bits) as i64;
    let weight_min = min_signed(profile.weight_bits);
    let weight_max = max_signed(profile.weight_bits);
    let param_min = min_signed(profile.param_bits);
    let param_max = max_signed(profile.param_bits);

    let fit_unsigned = |field: &'static str, entity: String, value: i64, max: i64| -> Result<()> {
        if value > max {
            return Err(CompileError::FieldOverflow {
                field,
                entity,
                value,
                min: 0,
                max,
            });
        }
        Ok(())
    };
    let fit_signed =
        |field: &'static str, entity: String, value: i64, min: i64, max: i64| -> Result<()> {
            if value < min || value > max {
                return Err(CompileError::FieldOverflow {
                    field,
                    entity,
                    value,
                    min,
                    max,
                });
            }
            Ok(())
        };

    for neuron in graph.neurons() {
        let placement = mapping.neuron(neuron.id).ok_or_else(|| {
            CompileError::internal(format!("neuron {} missing from mapping", neuron.id))
        })?;
        let entity = neuron.id.to_string();
        fit_unsigned("slot", entity.clone(), placement.slot as i64, slot_max)?;
        fit_unsigned("core", entity.clone(), placement.core.raw() as i64, core_max)?;
        fit_signed(
            "threshold",
            entity.clone(),
            neuron.params.threshold as i64,
            param_min,
            param_max,
        )?;
        fit_signed(
            "leak",
            entity.clone(),
            neuron.params.leak as i64,
            param_min,
            param_max,
        )?;
        fit_signed("bias", entity, neuron.params.bias as i64, param_min, param_max)?;
    }

    for syn in graph.synapses() {
        let target = mapping
            .neuron(syn.target)
            .ok_or(CompileError::DanglingReference {
                synapse: syn.id,
                neuron: syn.target,
            })?;
        let entity = syn.id.to_string();
        fit_signed(
            "weight",
            entity.clone(),
            syn.weight as i64,
            weight_min,
            weight_max,
        )?;
        fit_unsigned("delay", entity.clone(), syn.delay as i64, delay_max)?;
        fit_unsigned(
            "target core",
            entity.clone(),
            target.core.raw() as i64,
            core_max,
        )?;
        fit_unsigned("target slot", entity, target.slot as i64, slot_max)?;
    }

    Ok(())
}
