//! Error types for the component store.

/// Why a candidate tree was rejected by [`insert`](crate::store::ComponentStore::insert).
///
/// All defects are detected before the shared graph or the registry is
/// touched, so a rejected insertion leaves the store unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ComponentDefect {
    /// The candidate has no edges.
    #[error("candidate has no edges")]
    Empty,
    /// The candidate spans fewer than two terminals.
    #[error("candidate spans fewer than two terminals")]
    TooFewTerminals,
    /// The candidate is cyclic or disconnected.
    #[error("candidate is not a connected acyclic tree")]
    NotATree,
    /// A terminal appears as an interior node of the candidate.
    #[error("terminal appears as an interior node, not a leaf")]
    TerminalNotLeaf,
}

/// Error type for store mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Candidate rejected by validation; nothing was mutated.
    #[error("invalid component: {0}")]
    InvalidComponent(#[from] ComponentDefect),
    /// Component id outside the live range `[0, size)`; nothing was mutated.
    #[error("component id {id} out of range (store size {size})")]
    IndexOutOfRange {
        /// The offending id.
        id: usize,
        /// Store size at the time of the call.
        size: usize,
    },
}
