//! Read-only view of the original Steiner instance.
//!
//! The store never sees the original graph itself; it only needs the
//! ordered terminal list and a membership predicate, both fixed for the
//! store's lifetime.

use serde::{Deserialize, Serialize};

use crate::types::OrigNode;

/// Terminal structure of the original Steiner instance.
///
/// Holds the ordered terminal list and a dense terminal-membership bitmap
/// over original node indices. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteinerInstance {
    num_nodes: usize,
    terminals: Vec<OrigNode>,
    is_terminal: Vec<bool>,
}

impl SteinerInstance {
    /// Create an instance view over `num_nodes` original nodes with the
    /// given ordered terminal list.
    ///
    /// # Panics
    ///
    /// Panics if a terminal index is out of range or listed twice.
    pub fn new(num_nodes: usize, terminals: Vec<OrigNode>) -> Self {
        let mut is_terminal = vec![false; num_nodes];
        for &t in &terminals {
            assert!(t.index() < num_nodes, "terminal {t} out of range");
            assert!(!is_terminal[t.index()], "terminal {t} listed twice");
            is_terminal[t.index()] = true;
        }
        Self {
            num_nodes,
            terminals,
            is_terminal,
        }
    }

    /// Number of nodes of the original instance.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// The ordered terminal list.
    pub fn terminals(&self) -> &[OrigNode] {
        &self.terminals
    }

    /// Number of terminals.
    pub fn num_terminals(&self) -> usize {
        self.terminals.len()
    }

    /// Whether an original node is a terminal.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not a node of the instance.
    pub fn is_terminal(&self, v: OrigNode) -> bool {
        self.is_terminal[v.index()]
    }
}
