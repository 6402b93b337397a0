//! Candidate full components: the validated input to
//! [`insert`](crate::store::ComponentStore::insert).
//!
//! A candidate is a small tree over original nodes. Nodes are implied by
//! edge endpoints; validation happens at insertion time, before any
//! mutation of the store.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::ComponentDefect;
use crate::instance::SteinerInstance;
use crate::types::OrigNode;

/// One weighted edge of a candidate tree, endpoints in original-node space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEdge<W> {
    /// One endpoint.
    pub u: OrigNode,
    /// The other endpoint.
    pub v: OrigNode,
    /// Edge weight; for contracted edges, the total weight of the
    /// underlying original path.
    pub weight: W,
}

/// A candidate full component: a tree whose leaves are terminals of the
/// instance, possibly passing through non-terminal (Steiner) nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateTree<W> {
    edges: Vec<CandidateEdge<W>>,
}

impl<W> Default for CandidateTree<W> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

impl<W: Copy> CandidateTree<W> {
    /// Create an empty candidate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the degenerate two-terminal candidate consisting of one edge.
    pub fn single_edge(u: OrigNode, v: OrigNode, weight: W) -> Self {
        let mut tree = Self::new();
        tree.add_edge(u, v, weight);
        tree
    }

    /// Append an edge.
    pub fn add_edge(&mut self, u: OrigNode, v: OrigNode, weight: W) {
        self.edges.push(CandidateEdge { u, v, weight });
    }

    /// The candidate's edges, in insertion order.
    pub fn edges(&self) -> &[CandidateEdge<W>] {
        &self.edges
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Whether the candidate has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Check the full-component shape against the instance: non-empty,
    /// connected and acyclic, at least two terminals, every terminal a
    /// leaf.
    ///
    /// # Panics
    ///
    /// Panics if an endpoint is not a node of the instance.
    pub(crate) fn validate(&self, instance: &SteinerInstance) -> Result<(), ComponentDefect> {
        if self.edges.is_empty() {
            return Err(ComponentDefect::Empty);
        }

        let mut degree: BTreeMap<OrigNode, usize> = BTreeMap::new();
        let mut adjacency: BTreeMap<OrigNode, Vec<OrigNode>> = BTreeMap::new();
        for e in &self.edges {
            if e.u == e.v {
                return Err(ComponentDefect::NotATree);
            }
            *degree.entry(e.u).or_default() += 1;
            *degree.entry(e.v).or_default() += 1;
            adjacency.entry(e.u).or_default().push(e.v);
            adjacency.entry(e.v).or_default().push(e.u);
        }

        // A connected graph with |E| == |V| - 1 is a tree.
        if self.edges.len() != degree.len() - 1 {
            return Err(ComponentDefect::NotATree);
        }
        let mut visited: BTreeSet<OrigNode> = BTreeSet::new();
        let mut worklist = vec![self.edges[0].u];
        visited.insert(self.edges[0].u);
        while let Some(v) = worklist.pop() {
            if let Some(neighbors) = adjacency.get(&v) {
                for &u in neighbors {
                    if visited.insert(u) {
                        worklist.push(u);
                    }
                }
            }
        }
        if visited.len() != degree.len() {
            return Err(ComponentDefect::NotATree);
        }

        let mut num_terminals = 0;
        for (&v, &d) in &degree {
            if instance.is_terminal(v) {
                num_terminals += 1;
                if d != 1 {
                    return Err(ComponentDefect::TerminalNotLeaf);
                }
            }
        }
        if num_terminals < 2 {
            return Err(ComponentDefect::TooFewTerminals);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> SteinerInstance {
        // Terminals 0, 1, 2; Steiner candidates 3, 4.
        SteinerInstance::new(5, vec![OrigNode(0), OrigNode(1), OrigNode(2)])
    }

    fn star() -> CandidateTree<u64> {
        let mut tree = CandidateTree::new();
        tree.add_edge(OrigNode(0), OrigNode(3), 1);
        tree.add_edge(OrigNode(1), OrigNode(3), 2);
        tree.add_edge(OrigNode(2), OrigNode(3), 3);
        tree
    }

    #[test]
    fn test_valid_star() {
        assert_eq!(star().validate(&instance()), Ok(()));
    }

    #[test]
    fn test_valid_single_edge() {
        let tree = CandidateTree::single_edge(OrigNode(0), OrigNode(1), 5u64);
        assert_eq!(tree.validate(&instance()), Ok(()));
    }

    #[test]
    fn test_empty_rejected() {
        let tree: CandidateTree<u64> = CandidateTree::new();
        assert_eq!(tree.validate(&instance()), Err(ComponentDefect::Empty));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = star();
        tree.add_edge(OrigNode(0), OrigNode(4), 1);
        tree.add_edge(OrigNode(4), OrigNode(3), 1);
        assert_eq!(tree.validate(&instance()), Err(ComponentDefect::NotATree));
    }

    #[test]
    fn test_self_loop_rejected() {
        let tree = CandidateTree::single_edge(OrigNode(3), OrigNode(3), 1u64);
        assert_eq!(tree.validate(&instance()), Err(ComponentDefect::NotATree));
    }

    #[test]
    fn test_disconnected_rejected() {
        let mut tree: CandidateTree<u64> = CandidateTree::new();
        tree.add_edge(OrigNode(0), OrigNode(3), 1);
        tree.add_edge(OrigNode(1), OrigNode(4), 1);
        tree.add_edge(OrigNode(2), OrigNode(4), 1);
        assert_eq!(tree.validate(&instance()), Err(ComponentDefect::NotATree));
    }

    #[test]
    fn test_disconnected_with_parallel_cycle_rejected() {
        // |E| == |V| - 1 but one part carries a parallel-edge cycle,
        // so the edge count alone does not expose the defect.
        let mut tree: CandidateTree<u64> = CandidateTree::new();
        tree.add_edge(OrigNode(0), OrigNode(3), 1);
        tree.add_edge(OrigNode(3), OrigNode(1), 1);
        tree.add_edge(OrigNode(2), OrigNode(4), 1);
        tree.add_edge(OrigNode(4), OrigNode(2), 1);
        assert_eq!(tree.validate(&instance()), Err(ComponentDefect::NotATree));
    }

    #[test]
    fn test_interior_terminal_rejected() {
        let mut tree: CandidateTree<u64> = CandidateTree::new();
        tree.add_edge(OrigNode(0), OrigNode(1), 1);
        tree.add_edge(OrigNode(1), OrigNode(2), 1);
        assert_eq!(
            tree.validate(&instance()),
            Err(ComponentDefect::TerminalNotLeaf)
        );
    }

    #[test]
    fn test_too_few_terminals_rejected() {
        let tree = CandidateTree::single_edge(OrigNode(0), OrigNode(3), 1u64);
        assert_eq!(
            tree.validate(&instance()),
            Err(ComponentDefect::TooFewTerminals)
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let tree = star();
        let json = serde_json::to_string(&tree).unwrap();
        let back: CandidateTree<u64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.edges(), tree.edges());
    }
}
