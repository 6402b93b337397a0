//! Loss decomposition: which component edges a global MST explains.
//!
//! One spanning-tree pass over the shared graph, augmented with a star of
//! zero-weight edges between the terminals, partitions every component's
//! edge set: edges inside the tree are "loss" (implicitly cheap), edges
//! outside are "bridges" (genuinely costly). The pass is global and
//! one-shot; it recomputes every component and must not be interleaved
//! with `insert` or `remove`.

use std::ops::Deref;

use crate::error::StoreError;
use crate::graph::{SharedGraph, Weight};
use crate::instance::SteinerInstance;
use crate::mst::{self, SpanningTreeLabeling};
use crate::store::{ComponentStore, Removal};
use crate::types::{CandidateTree, EdgeId, NodeId, OrigNode};

/// Per-component result of the loss decomposition.
#[derive(Debug, Clone, Default)]
pub struct LossRecord<W> {
    pub(crate) loss: W,
    pub(crate) bridges: Vec<EdgeId>,
}

/// A component store extended with loss decomposition.
///
/// Mutations go through this wrapper so that stale loss data can never be
/// observed: any `insert` or `remove` invalidates the previous
/// [`compute_all_losses`](Self::compute_all_losses) pass, and the loss
/// accessors panic until the next one.
///
/// Read access to the underlying store is available through `Deref`.
#[derive(Debug, Clone)]
pub struct LossStore<W> {
    store: ComponentStore<W, LossRecord<W>>,
    /// Loss terminal per shared node slot; memoized MST-predecessor walk.
    loss_terminal: Vec<Option<OrigNode>>,
    computed: bool,
}

impl<W: Weight> LossStore<W> {
    /// Create a loss-extended store over the given instance.
    pub fn new(instance: SteinerInstance) -> Self {
        Self {
            store: ComponentStore::new(instance),
            loss_terminal: Vec::new(),
            computed: false,
        }
    }

    /// Insert a candidate tree; on success, invalidates any computed
    /// loss data. A rejected candidate leaves the store, and any
    /// computed loss data, unchanged.
    pub fn insert(&mut self, tree: CandidateTree<W>) -> Result<usize, StoreError> {
        let inserted = self.store.insert(tree);
        if inserted.is_ok() {
            self.computed = false;
        }
        inserted
    }

    /// Remove a component; on success, invalidates any computed loss
    /// data. An out-of-range id leaves the store, and any computed loss
    /// data, unchanged.
    pub fn remove(&mut self, id: usize) -> Result<Removal, StoreError> {
        let removed = self.store.remove(id);
        if removed.is_ok() {
            self.computed = false;
        }
        removed
    }

    /// Recompute the loss decomposition of every component with the
    /// bundled Prim solver.
    pub fn compute_all_losses(&mut self) {
        self.compute_all_losses_with(mst::prim);
    }

    /// Recompute the loss decomposition of every component, delegating
    /// the spanning-tree pass to `solver`.
    ///
    /// The solver sees the shared graph augmented with a zero-weight star
    /// from the first terminal to every other terminal; the star is
    /// removed again before classification.
    pub fn compute_all_losses_with<F>(&mut self, solver: F)
    where
        F: FnOnce(&SharedGraph<W>, NodeId) -> SpanningTreeLabeling,
    {
        let terminals: Vec<OrigNode> = self.store.instance().terminals().to_vec();
        assert!(
            !terminals.is_empty(),
            "loss decomposition needs at least one terminal"
        );

        // Terminals resolve to themselves; everything else is memoized
        // during bridge classification.
        self.loss_terminal = vec![None; self.store.graph().node_bound()];
        for &t in &terminals {
            let t_shared = self.store.shared_terminal(t);
            self.loss_terminal[t_shared.index()] = Some(t);
        }

        let root = self.store.shared_terminal(terminals[0]);
        let mut star_edges = Vec::with_capacity(terminals.len().saturating_sub(1));
        for &t in &terminals[1..] {
            let t_shared = self.store.shared_terminal(t);
            star_edges.push(self.store.graph_mut().new_edge(root, t_shared, W::default()));
        }

        let labeling = solver(self.store.graph(), root);

        for e in star_edges {
            self.store.graph_mut().del_edge(e);
        }

        let mut records: Vec<LossRecord<W>> = Vec::with_capacity(self.store.size());
        for id in 0..self.store.size() {
            let store = &self.store;
            let memo = &mut self.loss_terminal;
            let mut loss = W::default();
            let mut bridges = Vec::new();
            store.for_each_dart(id, |back| {
                let e = back.edge();
                if labeling.is_tree_edge(e) {
                    loss += store.graph().weight(e);
                } else {
                    bridges.push(e);
                    let (u, v) = store.graph().endpoints(e);
                    resolve_loss_terminal(memo, store.graph(), &labeling, u);
                    resolve_loss_terminal(memo, store.graph(), &labeling, v);
                }
            });
            tracing::trace!(
                id,
                loss = ?loss,
                num_bridges = bridges.len(),
                "classified component edges"
            );
            records.push(LossRecord { loss, bridges });
        }
        for (id, record) in records.into_iter().enumerate() {
            *self.store.payload_mut(id) = record;
        }
        self.computed = true;
        tracing::debug!(
            num_components = self.store.size(),
            "loss decomposition complete"
        );
    }

    fn assert_computed(&self) {
        assert!(
            self.computed,
            "loss data not available: call compute_all_losses after the last mutation"
        );
    }

    /// Loss value of the component at `id`: the summed weight of its
    /// edges inside the global spanning tree.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range or losses have not been computed
    /// since the last mutation.
    pub fn loss(&self, id: usize) -> W {
        self.assert_computed();
        self.store.payload(id).loss
    }

    /// The component's bridge edges: private edges outside the global
    /// spanning tree. Endpoints and weights are resolvable through
    /// [`graph`](ComponentStore::graph).
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range or losses have not been computed
    /// since the last mutation.
    pub fn loss_bridges(&self, id: usize) -> &[EdgeId] {
        self.assert_computed();
        &self.store.payload(id).bridges
    }

    /// The terminal a shared node drains to along spanning-tree
    /// predecessor edges. A terminal node resolves to its own original
    /// terminal; nodes never touched by a bridge may be unresolved.
    ///
    /// # Panics
    ///
    /// Panics if losses have not been computed since the last mutation.
    pub fn loss_terminal(&self, v: NodeId) -> Option<OrigNode> {
        self.assert_computed();
        self.loss_terminal.get(v.index()).copied().flatten()
    }
}

impl<W: Weight> Deref for LossStore<W> {
    type Target = ComponentStore<W, LossRecord<W>>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Walk spanning-tree predecessor edges from `start` until a node with a
/// known loss terminal (terminals are pre-seeded), memoizing the whole
/// chain. Explicitly stacked to stay shallow on long predecessor chains.
fn resolve_loss_terminal<W: Weight>(
    memo: &mut [Option<OrigNode>],
    graph: &SharedGraph<W>,
    labeling: &SpanningTreeLabeling,
    start: NodeId,
) -> Option<OrigNode> {
    let mut chain = Vec::new();
    let mut v = start;
    let found = loop {
        if let Some(t) = memo[v.index()] {
            break Some(t);
        }
        match labeling.predecessor(v) {
            Some(e) => {
                chain.push(v);
                v = graph.opposite(e, v);
            }
            None => break None,
        }
    };
    if let Some(t) = found {
        for u in chain {
            memo[u.index()] = Some(t);
        }
    }
    found
}
