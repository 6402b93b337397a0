//! Core types for the component store.

pub mod candidate;
pub mod ids;

pub use candidate::{CandidateEdge, CandidateTree};
pub use ids::{Dart, EdgeId, NodeId, OrigNode};
