//! Minimum spanning tree labeling over the shared graph.
//!
//! Loss decomposition consumes an MST collaborator: any function that
//! maps a shared graph and a root to a [`SpanningTreeLabeling`]. The
//! bundled [`prim`] solver is the default; external solvers can build a
//! labeling through the public setters.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::graph::{SharedGraph, Weight};
use crate::types::{EdgeId, NodeId};

/// Result of one MST pass: a predecessor edge per node and an in-tree
/// flag per edge, both keyed by slot index.
#[derive(Debug, Clone)]
pub struct SpanningTreeLabeling {
    pred: Vec<Option<EdgeId>>,
    in_tree: Vec<bool>,
}

impl SpanningTreeLabeling {
    /// Create an empty labeling sized for the given slot bounds.
    pub fn new(node_bound: usize, edge_bound: usize) -> Self {
        Self {
            pred: vec![None; node_bound],
            in_tree: vec![false; edge_bound],
        }
    }

    /// The edge connecting `v` to its MST parent, if any. The root and
    /// unreached nodes have none.
    pub fn predecessor(&self, v: NodeId) -> Option<EdgeId> {
        self.pred.get(v.index()).copied().flatten()
    }

    /// Record the predecessor edge of `v`.
    pub fn set_predecessor(&mut self, v: NodeId, e: EdgeId) {
        self.pred[v.index()] = Some(e);
    }

    /// Whether an edge belongs to the spanning tree.
    pub fn is_tree_edge(&self, e: EdgeId) -> bool {
        self.in_tree.get(e.index()).copied().unwrap_or(false)
    }

    /// Flag an edge as part of the spanning tree.
    pub fn mark_tree_edge(&mut self, e: EdgeId) {
        self.in_tree[e.index()] = true;
    }
}

/// Prim's algorithm with a lazy binary-heap frontier, rooted at `root`.
///
/// Nodes not reachable from the root keep no predecessor and contribute
/// no tree edges. Heap ties break on node index, so the labeling is
/// deterministic for a given graph.
pub fn prim<W: Weight>(graph: &SharedGraph<W>, root: NodeId) -> SpanningTreeLabeling {
    let mut labeling = SpanningTreeLabeling::new(graph.node_bound(), graph.edge_bound());
    let mut best: Vec<Option<W>> = vec![None; graph.node_bound()];
    let mut done = vec![false; graph.node_bound()];
    let mut frontier: BinaryHeap<Reverse<(W, NodeId)>> = BinaryHeap::new();

    best[root.index()] = Some(W::default());
    frontier.push(Reverse((W::default(), root)));

    while let Some(Reverse((_, v))) = frontier.pop() {
        if done[v.index()] {
            continue;
        }
        done[v.index()] = true;
        if let Some(e) = labeling.predecessor(v) {
            labeling.mark_tree_edge(e);
        }
        for dart in graph.darts(v) {
            let u = graph.dart_target(dart);
            if done[u.index()] {
                continue;
            }
            let w = graph.weight(dart.edge());
            if best[u.index()].map_or(true, |b| w < b) {
                best[u.index()] = Some(w);
                labeling.set_predecessor(u, dart.edge());
                frontier.push(Reverse((w, u)));
            }
        }
    }
    labeling
}
