//! ID types for the graph model

use core::fmt;

/// Unique identifier for a neuron within a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NeuronId(pub u32);

impl NeuronId {
    /// Create a new neuron ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Invalid neuron ID constant
    pub const INVALID: Self = Self(u32::MAX);

    /// Check if this is a valid neuron ID
    pub const fn is_valid(&self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Unique identifier for a synapse within a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SynapseId(pub u32);

impl SynapseId {
    /// Create a new synapse ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Invalid synapse ID constant
    pub const INVALID: Self = Self(u32::MAX);

    /// Check if this is a valid synapse ID
    pub const fn is_valid(&self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Display for SynapseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Serialize};

    impl Serialize for NeuronId {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.0.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for NeuronId {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let id = u32::deserialize(deserializer)?;
            Ok(NeuronId::new(id))
        }
    }

    impl Serialize for SynapseId {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.0.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for SynapseId {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let id = u32::deserialize(deserializer)?;
            Ok(SynapseId::new(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neuron_id() {
        let n = NeuronId::new(42);
        assert_eq!(n.raw(), 42);
        assert!(n.is_valid());
        assert_eq!(format!("{}", n), "N42");
    }

    #[test]
    fn test_synapse_id() {
        let s = SynapseId::new(7);
        assert_eq!(s.raw(), 7);
        assert!(s.is_valid());
        assert_eq!(format!("{}", s), "S7");
    }

    #[test]
    fn test_invalid_ids() {
        assert!(!NeuronId::INVALID.is_valid());
        assert!(!SynapseId::INVALID.is_valid());
    }

    #[test]
    fn test_ordering() {
        assert!(NeuronId::new(1) < NeuronId::new(2));
        assert!(SynapseId::new(1) < SynapseId::new(2));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&NeuronId::new(42)).unwrap();
        assert_eq!(json, "42");
        let back: NeuronId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NeuronId::new(42));

        let json = serde_json::to_string(&SynapseId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
