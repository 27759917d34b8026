//! Routing fabric policies
//!
//! The exact on-chip interconnect differs per silicon variant and is
//! supplied by the hardware-configuration collaborator, so the mapper
//! only sees the `RoutingFabric` trait. Two policies are provided: a
//! full crossbar (every core reaches every core) and a 2-D mesh with a
//! hop budget.

use crate::core::CoreId;
use crate::error::{HalError, Result};

/// Reachability policy between physical cores
pub trait RoutingFabric: Send + Sync {
    /// Policy name for reports and diagnostics
    fn name(&self) -> &'static str;

    /// Whether a packet from `from` can be routed to `to`
    fn reachable(&self, from: CoreId, to: CoreId) -> bool;
}

/// Full crossbar: all cores mutually reachable
#[derive(Debug, Clone, Copy, Default)]
pub struct Crossbar;

impl RoutingFabric for Crossbar {
    fn name(&self) -> &'static str {
        "crossbar"
    }

    fn reachable(&self, _from: CoreId, _to: CoreId) -> bool {
        true
    }
}

/// 2-D mesh with row-major core placement and a Manhattan hop budget
#[derive(Debug, Clone, Copy)]
pub struct MeshFabric {
    /// Number of cores per mesh row
    pub width: u16,
    /// Maximum Manhattan distance a packet may travel
    pub max_hops: u16,
}

impl MeshFabric {
    /// Create a mesh fabric; a zero `width` is rejected
    pub fn new(width: u16, max_hops: u16) -> Result<Self> {
        if width == 0 {
            return Err(HalError::ZeroMeshWidth);
        }
        Ok(Self { width, max_hops })
    }

    fn position(&self, core: CoreId) -> (u16, u16) {
        (core.raw() / self.width, core.raw() % self.width)
    }
}

impl RoutingFabric for MeshFabric {
    fn name(&self) -> &'static str {
        "mesh"
    }

    fn reachable(&self, from: CoreId, to: CoreId) -> bool {
        let (fr, fc) = self.position(from);
        let (tr, tc) = self.position(to);
        let hops = fr.abs_diff(tr) + fc.abs_diff(tc);
        hops <= self.max_hops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossbar_reaches_everything() {
        let fabric = Crossbar;
        assert!(fabric.reachable(CoreId::new(0), CoreId::new(65535)));
    }

    #[test]
    fn zero_width_rejected() {
        assert!(matches!(
            MeshFabric::new(0, 4),
            Err(HalError::ZeroMeshWidth)
        ));
    }

    #[test]
    fn mesh_respects_hop_budget() {
        // 4x4 mesh, 2 hops max.
        let fabric = MeshFabric::new(4, 2).unwrap();

        // C0 at (0,0); C5 at (1,1) is 2 hops away.
        assert!(fabric.reachable(CoreId::new(0), CoreId::new(5)));
        // C10 at (2,2) is 4 hops away.
        assert!(!fabric.reachable(CoreId::new(0), CoreId::new(10)));
        // Self-routing is always 0 hops.
        assert!(fabric.reachable(CoreId::new(7), CoreId::new(7)));
    }

    #[test]
    fn mesh_is_symmetric() {
        let fabric = MeshFabric::new(3, 1).unwrap();
        for a in 0..9u16 {
            for b in 0..9u16 {
                assert_eq!(
                    fabric.reachable(CoreId::new(a), CoreId::new(b)),
                    fabric.reachable(CoreId::new(b), CoreId::new(a)),
                );
            }
        }
    }

    proptest::proptest! {
        #[test]
        fn mesh_reachability_monotone_in_hop_budget(
            width in 1u16..16,
            hops in 0u16..8,
            a in 0u16..256,
            b in 0u16..256,
        ) {
            let tight = MeshFabric::new(width, hops).unwrap();
            let loose = MeshFabric::new(width, hops + 1).unwrap();
            let (a, b) = (CoreId::new(a), CoreId::new(b));
            // Raising the budget never cuts a route.
            if tight.reachable(a, b) {
                proptest::prop_assert!(loose.reachable(a, b));
            }
            proptest::prop_assert!(tight.reachable(a, a));
        }
    }
}
