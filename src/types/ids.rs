//! Identifier newtypes for the original instance and the shared graph.
//!
//! `OrigNode` lives in the original Steiner instance; `NodeId`, `EdgeId`
//! and `Dart` address slots of the shared component graph. Slot ids are
//! stable until the owning component is removed, after which the slot may
//! be reused by a later insertion.

use serde::{Deserialize, Serialize};

/// Node of the original Steiner instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrigNode(pub u32);

impl OrigNode {
    /// Index into dense per-original-node arrays.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for OrigNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Node slot in the shared component graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Index into dense per-node side arrays, valid up to
    /// [`node_bound`](crate::graph::SharedGraph::node_bound).
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Edge slot in the shared component graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub(crate) u32);

impl EdgeId {
    /// Index into dense per-edge side arrays, valid up to
    /// [`edge_bound`](crate::graph::SharedGraph::edge_bound).
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Directed half-edge handle into the shared graph.
///
/// A dart is one endpoint-side of an edge; [`twin`](Dart::twin) is the
/// other side. Traversal is expressed entirely in darts so that edge
/// orientation relative to a component's anchor is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Dart(pub(crate) u32);

impl Dart {
    pub(crate) fn new(edge: EdgeId, side: u32) -> Self {
        debug_assert!(side < 2);
        Dart(edge.0 * 2 + side)
    }

    /// The undirected edge this dart belongs to.
    pub fn edge(self) -> EdgeId {
        EdgeId(self.0 >> 1)
    }

    /// The dart on the opposite side of the same edge.
    pub fn twin(self) -> Dart {
        Dart(self.0 ^ 1)
    }

    pub(crate) fn side(self) -> usize {
        (self.0 & 1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dart_twin_involution() {
        let e = EdgeId(7);
        let d = Dart::new(e, 0);
        assert_eq!(d.twin().twin(), d);
        assert_eq!(d.twin().edge(), e);
        assert_ne!(d.twin(), d);
    }

    #[test]
    fn test_dart_sides() {
        let e = EdgeId(3);
        assert_eq!(Dart::new(e, 0).side(), 0);
        assert_eq!(Dart::new(e, 1).side(), 1);
        assert_eq!(Dart::new(e, 0).twin(), Dart::new(e, 1));
    }
}
