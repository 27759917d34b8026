//! Hardware abstraction for BPU silicon
//!
//! Describes what the compiler needs to know about a chip: the set of
//! physical cores with their capacities, the routing fabric connecting
//! them, and the target profile fixing instruction word width and
//! field sizes per silicon variant. Capacity and topology numbers come
//! from the external hardware-configuration loader; this crate only
//! defines the validated shapes.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod error;
pub mod fabric;
pub mod profile;

pub use crate::core::{validate_core_set, CoreId, PhysicalCore};
pub use error::{HalError, Result};
pub use fabric::{Crossbar, MeshFabric, RoutingFabric};
pub use profile::{
    max_signed, max_unsigned, min_signed, ChipRevision, TargetProfile, WordWidth, PROFILES,
};
