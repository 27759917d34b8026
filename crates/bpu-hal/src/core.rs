//! Physical compute cores

use core::fmt;

use crate::error::{HalError, Result};

/// Unique identifier for a physical core
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoreId(pub u16);

impl CoreId {
    /// Create a new core ID
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn raw(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Serialize};

    impl Serialize for CoreId {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.0.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for CoreId {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let id = u16::deserialize(deserializer)?;
            Ok(CoreId::new(id))
        }
    }
}

/// One hardware compute unit and its placement limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalCore {
    /// Core ID
    pub id: CoreId,
    /// Maximum neurons placeable on this core
    pub neuron_capacity: u32,
    /// Synaptic row capacity (one mapped synapse per row)
    pub synapse_rows: u32,
    /// Routing degree limit: distinct remote cores this core may target
    pub max_fanout_cores: u32,
}

impl PhysicalCore {
    /// Create a core description
    pub const fn new(
        id: CoreId,
        neuron_capacity: u32,
        synapse_rows: u32,
        max_fanout_cores: u32,
    ) -> Self {
        Self {
            id,
            neuron_capacity,
            synapse_rows,
            max_fanout_cores,
        }
    }
}

/// Validate a core set supplied by the configuration loader: non-empty,
/// unique ids, usable capacities. Returns the cores sorted by ID.
pub fn validate_core_set(mut cores: Vec<PhysicalCore>) -> Result<Vec<PhysicalCore>> {
    if cores.is_empty() {
        return Err(HalError::NoCores);
    }
    cores.sort_by_key(|c| c.id);
    for pair in cores.windows(2) {
        if pair[0].id == pair[1].id {
            return Err(HalError::DuplicateCore {
                core: pair[0].id.raw(),
            });
        }
    }
    for core in &cores {
        if core.neuron_capacity == 0 {
            return Err(HalError::ZeroCapacity {
                core: core.id.raw(),
                resource: "neuron",
            });
        }
        if core.synapse_rows == 0 {
            return Err(HalError::ZeroCapacity {
                core: core.id.raw(),
                resource: "synapse-row",
            });
        }
    }

    log::debug!(
        "validated core set: {} cores, {} neuron slots, {} synapse rows",
        cores.len(),
        cores.iter().map(|c| c.neuron_capacity as u64).sum::<u64>(),
        cores.iter().map(|c| c.synapse_rows as u64).sum::<u64>(),
    );

    Ok(cores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_id_display() {
        assert_eq!(format!("{}", CoreId::new(3)), "C3");
    }

    #[test]
    fn validate_sorts_and_accepts() {
        let cores = vec![
            PhysicalCore::new(CoreId::new(2), 8, 16, 4),
            PhysicalCore::new(CoreId::new(0), 8, 16, 4),
        ];
        let sorted = validate_core_set(cores).unwrap();
        assert_eq!(sorted[0].id, CoreId::new(0));
        assert_eq!(sorted[1].id, CoreId::new(2));
    }

    #[test]
    fn validate_rejects_duplicates() {
        let cores = vec![
            PhysicalCore::new(CoreId::new(1), 8, 16, 4),
            PhysicalCore::new(CoreId::new(1), 8, 16, 4),
        ];
        assert!(matches!(
            validate_core_set(cores),
            Err(HalError::DuplicateCore { core: 1 })
        ));
    }

    #[test]
    fn validate_rejects_zero_capacity() {
        let cores = vec![PhysicalCore::new(CoreId::new(0), 0, 16, 4)];
        assert!(matches!(
            validate_core_set(cores),
            Err(HalError::ZeroCapacity {
                resource: "neuron",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_empty() {
        assert!(matches!(validate_core_set(vec![]), Err(HalError::NoCores)));
    }
}
