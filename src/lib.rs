//! # steiner-components
//!
//! A full-component store for Steiner tree approximation algorithms.
//!
//! A *full component* is a tree whose leaves are exactly a subset of a
//! fixed terminal set, possibly branching through non-terminal (Steiner)
//! nodes. Approximation algorithms juggle many of them at once; this
//! crate keeps the whole collection compacted into one shared graph:
//!
//! ```text
//! CandidateTree → validate → SharedGraph + ComponentRecord (dense id)
//!                                 ↓
//!                 for_each_dart / for_each_node / reconstruction
//!                                 ↓
//!                 compute_all_losses (one global MST pass)
//! ```
//!
//! ## Core Contract
//!
//! 1. Terminal nodes are created once and shared by every component;
//!    non-terminal nodes and all edges are private to the component that
//!    inserted them and are deleted with it.
//! 2. Component ids are dense: removal swaps the last record into the
//!    freed slot and reports the relocation explicitly via
//!    [`Removal`], so id invalidation is never silent.
//! 3. Terminals are leaves inside their component, so every traversal is
//!    a DFS that never crosses a terminal and visits each private edge
//!    exactly once.
//! 4. Loss decomposition partitions each component's edges against one
//!    global spanning tree: `loss(id)` plus the bridge weights always
//!    equals `cost(id)`.
//!
//! ## Concurrency
//!
//! Single-threaded and synchronous. Mutations (`insert`, `remove`,
//! `compute_all_losses`) must be serialized against each other and
//! against in-flight traversals; concurrent read-only traversals over a
//! quiescent store are safe.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod graph;
pub mod instance;
pub mod loss;
pub mod mst;
pub mod store;
pub mod traverse;
pub mod types;

// Re-exports
pub use error::{ComponentDefect, StoreError};
pub use graph::{SharedGraph, Weight};
pub use instance::SteinerInstance;
pub use loss::{LossRecord, LossStore};
pub use mst::{prim, SpanningTreeLabeling};
pub use store::{ComponentStore, Removal};
pub use traverse::{PathPredecessors, PredecessorMatrix};
pub use types::{CandidateEdge, CandidateTree, Dart, EdgeId, NodeId, OrigNode};
