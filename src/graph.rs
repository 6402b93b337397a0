//! The shared component graph: a slotted, weighted half-edge graph.
//!
//! All live components are compacted into one `SharedGraph`. Terminal
//! nodes are persistent; non-terminal nodes and all edges are private to
//! a single component and die with it. Node and edge slots are recycled
//! through free lists, so ids stay dense enough for side arrays sized by
//! [`node_bound`](SharedGraph::node_bound) /
//! [`edge_bound`](SharedGraph::edge_bound).

use std::fmt;
use std::ops::{Add, AddAssign};

use crate::types::{Dart, EdgeId, NodeId, OrigNode};

/// Edge-weight bound: ordered, additive, with a zero default.
///
/// Satisfied by the integer types; float weights need an ordered wrapper
/// supplied by the caller.
pub trait Weight:
    Copy + Ord + Default + Add<Output = Self> + AddAssign + fmt::Debug
{
}

impl<T> Weight for T where
    T: Copy + Ord + Default + Add<Output = T> + AddAssign + fmt::Debug
{
}

#[derive(Debug, Clone)]
struct NodeSlot {
    orig: OrigNode,
    /// Darts anchored at this node; insertion order is the cyclic order.
    adj: Vec<Dart>,
    alive: bool,
}

#[derive(Debug, Clone)]
struct EdgeSlot<W> {
    /// Endpoints by dart side: `ends[0]` is the source side.
    ends: [NodeId; 2],
    weight: W,
    alive: bool,
}

/// Weighted half-edge graph shared by all live components.
#[derive(Debug, Clone, Default)]
pub struct SharedGraph<W> {
    nodes: Vec<NodeSlot>,
    edges: Vec<EdgeSlot<W>>,
    free_nodes: Vec<u32>,
    free_edges: Vec<u32>,
    live_nodes: usize,
    live_edges: usize,
}

impl<W: Weight> SharedGraph<W> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            free_nodes: Vec::new(),
            free_edges: Vec::new(),
            live_nodes: 0,
            live_edges: 0,
        }
    }

    /// Number of live nodes.
    pub fn num_nodes(&self) -> usize {
        self.live_nodes
    }

    /// Number of live edges.
    pub fn num_edges(&self) -> usize {
        self.live_edges
    }

    /// Exclusive upper bound on node indices, including dead slots.
    pub fn node_bound(&self) -> usize {
        self.nodes.len()
    }

    /// Exclusive upper bound on edge indices, including dead slots.
    pub fn edge_bound(&self) -> usize {
        self.edges.len()
    }

    /// Allocate a node mapped to the given original node.
    pub fn new_node(&mut self, orig: OrigNode) -> NodeId {
        let slot = NodeSlot {
            orig,
            adj: Vec::new(),
            alive: true,
        };
        self.live_nodes += 1;
        match self.free_nodes.pop() {
            Some(i) => {
                self.nodes[i as usize] = slot;
                NodeId(i)
            }
            None => {
                self.nodes.push(slot);
                NodeId(self.nodes.len() as u32 - 1)
            }
        }
    }

    /// Connect two live nodes with a weighted edge.
    pub fn new_edge(&mut self, u: NodeId, v: NodeId, weight: W) -> EdgeId {
        debug_assert!(self.contains_node(u) && self.contains_node(v));
        let slot = EdgeSlot {
            ends: [u, v],
            weight,
            alive: true,
        };
        self.live_edges += 1;
        let e = match self.free_edges.pop() {
            Some(i) => {
                self.edges[i as usize] = slot;
                EdgeId(i)
            }
            None => {
                self.edges.push(slot);
                EdgeId(self.edges.len() as u32 - 1)
            }
        };
        self.nodes[u.index()].adj.push(Dart::new(e, 0));
        self.nodes[v.index()].adj.push(Dart::new(e, 1));
        e
    }

    /// Delete a live edge, unlinking its darts from both endpoints.
    pub fn del_edge(&mut self, e: EdgeId) {
        assert!(self.contains_edge(e), "edge slot is not alive");
        let ends = self.edges[e.index()].ends;
        for side in 0..2 {
            let dart = Dart::new(e, side as u32);
            let slot = &mut self.nodes[ends[side].index()];
            let pos = slot.adj.iter().position(|&d| d == dart);
            debug_assert!(pos.is_some(), "dart missing from adjacency");
            if let Some(pos) = pos {
                slot.adj.remove(pos);
            }
        }
        self.edges[e.index()].alive = false;
        self.free_edges.push(e.0);
        self.live_edges -= 1;
    }

    /// Delete a live node together with all its incident edges.
    pub fn del_node(&mut self, v: NodeId) {
        assert!(self.contains_node(v), "node slot is not alive");
        while let Some(d) = self.nodes[v.index()].adj.last().copied() {
            self.del_edge(d.edge());
        }
        self.nodes[v.index()].alive = false;
        self.free_nodes.push(v.0);
        self.live_nodes -= 1;
    }

    /// Whether a node slot is alive.
    pub fn contains_node(&self, v: NodeId) -> bool {
        self.nodes.get(v.index()).is_some_and(|slot| slot.alive)
    }

    /// Whether an edge slot is alive.
    pub fn contains_edge(&self, e: EdgeId) -> bool {
        self.edges.get(e.index()).is_some_and(|slot| slot.alive)
    }

    /// The original node a shared node maps back to.
    ///
    /// # Panics
    ///
    /// Panics if the slot is not alive.
    pub fn original(&self, v: NodeId) -> OrigNode {
        assert!(self.contains_node(v), "node slot is not alive");
        self.nodes[v.index()].orig
    }

    /// Weight of a live edge.
    pub fn weight(&self, e: EdgeId) -> W {
        assert!(self.contains_edge(e), "edge slot is not alive");
        self.edges[e.index()].weight
    }

    /// Both endpoints of a live edge, source side first.
    pub fn endpoints(&self, e: EdgeId) -> (NodeId, NodeId) {
        assert!(self.contains_edge(e), "edge slot is not alive");
        let ends = self.edges[e.index()].ends;
        (ends[0], ends[1])
    }

    /// The endpoint of `e` other than `v`.
    pub fn opposite(&self, e: EdgeId, v: NodeId) -> NodeId {
        let (u, w) = self.endpoints(e);
        debug_assert!(v == u || v == w, "node is not an endpoint of the edge");
        if v == u {
            w
        } else {
            u
        }
    }

    /// The node a dart is anchored at.
    pub fn dart_node(&self, d: Dart) -> NodeId {
        assert!(self.contains_edge(d.edge()), "edge slot is not alive");
        self.edges[d.edge().index()].ends[d.side()]
    }

    /// The node at the far end of a dart.
    pub fn dart_target(&self, d: Dart) -> NodeId {
        self.dart_node(d.twin())
    }

    /// Darts anchored at a node, in cyclic order.
    pub fn darts(&self, v: NodeId) -> impl Iterator<Item = Dart> + '_ {
        debug_assert!(self.contains_node(v));
        self.nodes[v.index()].adj.iter().copied()
    }

    /// Degree of a live node.
    pub fn degree(&self, v: NodeId) -> usize {
        debug_assert!(self.contains_node(v));
        self.nodes[v.index()].adj.len()
    }

    /// Live node ids in index order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.alive)
            .map(|(i, _)| NodeId(i as u32))
    }

    /// Live edge ids in index order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.alive)
            .map(|(i, _)| EdgeId(i as u32))
    }
}
