//! Traversal over a component's region of the shared graph.
//!
//! All traversals start at the component's anchor and rely on the leaf
//! property: terminals have degree one inside their component, so the
//! walk never crosses a terminal and never leaves the component. Darts
//! are produced oriented away from the anchor, each private edge exactly
//! once.
//!
//! Traversals take `&self`; callbacks run on the calling stack and
//! cannot mutate the store. They assume a valid id (checked by the
//! registry accessors) and must not be interleaved with `insert` or
//! `remove`.

use crate::graph::Weight;
use crate::store::ComponentStore;
use crate::types::{Dart, OrigNode};

/// Predecessor tables for expanding contracted shared-graph edges into
/// paths of the original instance.
///
/// When a stored edge stands for a multi-hop original path, the caller
/// supplies the shortest-path predecessor structure it used to build the
/// candidate. A table with cycles or a chain that never reaches `source`
/// violates the traversal contract; the walk is not defended against it.
pub trait PathPredecessors {
    /// Original-edge handle produced during reconstruction.
    type Edge: Copy;

    /// The next edge on the path from `source` toward `v`, together with
    /// the node reached by crossing it, or `None` once `v` has no
    /// predecessor entry (in particular once `v == source`).
    fn next_hop(&self, source: OrigNode, v: OrigNode) -> Option<(Self::Edge, OrigNode)>;
}

/// Dense predecessor matrix keyed by original node indices.
#[derive(Debug, Clone)]
pub struct PredecessorMatrix<E> {
    num_nodes: usize,
    hops: Vec<Option<(E, OrigNode)>>,
}

impl<E: Copy> PredecessorMatrix<E> {
    /// Create an empty matrix over `num_nodes` original nodes.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            hops: vec![None; num_nodes * num_nodes],
        }
    }

    /// Record that the path from `source` toward `v` continues across
    /// `edge` to `next`.
    pub fn set(&mut self, source: OrigNode, v: OrigNode, edge: E, next: OrigNode) {
        let idx = self.index(source, v);
        self.hops[idx] = Some((edge, next));
    }

    fn index(&self, source: OrigNode, v: OrigNode) -> usize {
        debug_assert!(source.index() < self.num_nodes && v.index() < self.num_nodes);
        source.index() * self.num_nodes + v.index()
    }
}

impl<E: Copy> PathPredecessors for PredecessorMatrix<E> {
    type Edge = E;

    fn next_hop(&self, source: OrigNode, v: OrigNode) -> Option<(E, OrigNode)> {
        self.hops[self.index(source, v)]
    }
}

impl<W: Weight, X> ComponentStore<W, X> {
    /// Visit every private edge of the component at `id` as a dart
    /// pointing away from the anchor, in DFS order.
    ///
    /// A two-terminal component is a single edge and yields exactly one
    /// dart, the anchor's twin. Larger components are walked depth-first;
    /// the stack never exceeds `2 * num_terminals - 2` entries, a bound
    /// full components guarantee.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn for_each_dart(&self, id: usize, mut visit: impl FnMut(Dart)) {
        let record = self.record(id);
        let num_terminals = record.terminals.len();
        let graph = self.graph();
        if num_terminals == 2 && self.is_terminal(graph.dart_target(record.anchor)) {
            // Two terminals joined by one contracted edge.
            visit(record.anchor.twin());
            return;
        }
        let mut stack = Vec::with_capacity(2 * num_terminals - 2);
        stack.push(record.anchor);
        while let Some(dart) = stack.pop() {
            let back = dart.twin();
            visit(back);
            let far = graph.dart_node(back);
            if !self.is_terminal(far) {
                stack.extend(graph.darts(far).filter(|&d| d != back));
            }
        }
    }

    /// Visit the original node of every shared node of the component at
    /// `id`: the anchor's terminal first, then the far node of every
    /// traversed dart.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn for_each_node(&self, id: usize, mut visit: impl FnMut(OrigNode)) {
        let graph = self.graph();
        visit(graph.original(graph.dart_node(self.anchor(id))));
        self.for_each_dart(id, |back| {
            visit(graph.original(graph.dart_node(back)));
        });
    }

    /// Visit every original edge of the component at `id`, expanding each
    /// stored (possibly contracted) edge into the original path between
    /// its endpoints through `preds`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn for_each_original_edge<P: PathPredecessors>(
        &self,
        id: usize,
        preds: &P,
        mut visit: impl FnMut(P::Edge),
    ) {
        let graph = self.graph();
        self.for_each_dart(id, |back| {
            let near = graph.original(graph.dart_target(back));
            let mut v = graph.original(graph.dart_node(back));
            while let Some((edge, next)) = preds.next_hop(near, v) {
                visit(edge);
                v = next;
            }
        });
    }

    /// Visit every original node of the component at `id`, including the
    /// interior nodes of contracted paths.
    ///
    /// For three-terminal components the walk takes a direct route over
    /// the single branch node and its three paths, so `preds` only needs
    /// rows for the terminals; this assumes the stored shape is a star,
    /// which holds for contracted full components.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range, or if a three-terminal predecessor
    /// chain never reaches its terminal (contract violation).
    pub fn for_each_original_node<P: PathPredecessors>(
        &self,
        id: usize,
        preds: &P,
        mut visit: impl FnMut(OrigNode),
    ) {
        let graph = self.graph();
        if self.terminals(id).len() == 3 {
            let branch = graph.dart_target(self.anchor(id));
            let branch_orig = graph.original(branch);
            visit(branch_orig);
            for dart in graph.darts(branch) {
                let terminal = graph.original(graph.dart_target(dart));
                let mut v = branch_orig;
                while v != terminal {
                    let Some((_, next)) = preds.next_hop(terminal, v) else {
                        panic!("predecessor chain from {v} never reaches {terminal}");
                    };
                    v = next;
                    visit(v);
                }
            }
            return;
        }
        visit(graph.original(graph.dart_node(self.anchor(id))));
        self.for_each_dart(id, |back| {
            let near = graph.original(graph.dart_target(back));
            let mut v = graph.original(graph.dart_node(back));
            while let Some((_, next)) = preds.next_hop(near, v) {
                visit(v);
                v = next;
            }
        });
    }
}
