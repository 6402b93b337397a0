//! The component registry: dense ids over the shared graph.
//!
//! `ComponentStore` owns the shared graph and a dense, index-addressable
//! collection of component records. Ids are stable until a removal;
//! removal swaps the last record into the freed slot (see [`Removal`]),
//! so an id held across a `remove` call may now address a different
//! component.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::graph::{SharedGraph, Weight};
use crate::instance::SteinerInstance;
use crate::types::{CandidateTree, Dart, NodeId, OrigNode};

/// Metadata of one stored full component.
#[derive(Debug, Clone)]
pub(crate) struct ComponentRecord<W, X> {
    /// The component's terminals, sorted ascending by original node.
    pub(crate) terminals: Vec<OrigNode>,
    /// Sum of the weights of the component's private edges.
    pub(crate) cost: W,
    /// Half-edge at a terminal; deterministic root of all traversals.
    pub(crate) anchor: Dart,
    /// Caller-defined payload.
    pub(crate) payload: X,
}

/// Outcome of [`ComponentStore::remove`]: the explicit contract of the
/// swap-with-last id scheme.
///
/// After `remove(k)` returns [`Removal::Swapped`], the id `k` addresses
/// the component that previously answered to `moved_from`; any other id
/// the caller holds is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Removal {
    /// The removed id was the last slot; no id changed meaning.
    Last,
    /// The record previously at `moved_from` was moved into the freed slot.
    Swapped {
        /// The id the relocated component was addressed by before the call.
        moved_from: usize,
    },
}

/// A store for full components, compacted into one shared graph.
///
/// Terminal nodes are created once at construction and shared by all
/// components; non-terminal nodes and all edges are private to the
/// component that inserted them and are deleted with it.
///
/// `X` is an optional per-component payload, attached at insertion and
/// free when unused.
#[derive(Debug, Clone)]
pub struct ComponentStore<W, X = ()> {
    instance: SteinerInstance,
    graph: SharedGraph<W>,
    /// Persistent shared node per original terminal, by original index.
    terminal_node: Vec<Option<NodeId>>,
    components: Vec<ComponentRecord<W, X>>,
}

impl<W: Weight, X> ComponentStore<W, X> {
    /// Create a store over the given instance, allocating one persistent
    /// shared node per terminal.
    pub fn new(instance: SteinerInstance) -> Self {
        let mut graph = SharedGraph::new();
        let mut terminal_node = vec![None; instance.num_nodes()];
        for &t in instance.terminals() {
            terminal_node[t.index()] = Some(graph.new_node(t));
        }
        Self {
            instance,
            graph,
            terminal_node,
            components: Vec::new(),
        }
    }

    /// Insert a candidate tree with an explicit payload; returns the new
    /// dense id.
    ///
    /// The candidate is validated first and rejected without mutation if
    /// it is empty, not a tree, spans fewer than two terminals, or has a
    /// terminal as an interior node.
    pub fn insert_with(
        &mut self,
        tree: CandidateTree<W>,
        payload: X,
    ) -> Result<usize, StoreError> {
        tree.validate(&self.instance)?;

        // Fresh shared nodes for this insertion's non-terminals, deduped
        // by original node within the insertion only.
        let mut fresh: HashMap<OrigNode, NodeId> = HashMap::new();
        let mut terminals: BTreeSet<OrigNode> = BTreeSet::new();
        let mut cost = W::default();
        let mut anchor: Option<Dart> = None;

        for edge in tree.edges() {
            let (u, u_is_terminal) = self.materialize(edge.u, &mut fresh, &mut terminals);
            let (v, v_is_terminal) = self.materialize(edge.v, &mut fresh, &mut terminals);
            let e = self.graph.new_edge(u, v, edge.weight);
            cost += edge.weight;
            if anchor.is_none() {
                if u_is_terminal {
                    anchor = Some(Dart::new(e, 0));
                } else if v_is_terminal {
                    anchor = Some(Dart::new(e, 1));
                }
            }
        }

        let anchor = match anchor {
            Some(a) => a,
            // Validation guarantees a terminal-incident edge.
            None => unreachable!("validated component has a terminal leaf"),
        };
        let terminals: Vec<OrigNode> = terminals.into_iter().collect();
        let id = self.components.len();
        tracing::debug!(
            id,
            num_terminals = terminals.len(),
            cost = ?cost,
            "inserted full component"
        );
        self.components.push(ComponentRecord {
            terminals,
            cost,
            anchor,
            payload,
        });
        Ok(id)
    }

    fn materialize(
        &mut self,
        v: OrigNode,
        fresh: &mut HashMap<OrigNode, NodeId>,
        terminals: &mut BTreeSet<OrigNode>,
    ) -> (NodeId, bool) {
        if self.instance.is_terminal(v) {
            terminals.insert(v);
            (self.persistent_terminal(v), true)
        } else {
            let node = *fresh
                .entry(v)
                .or_insert_with(|| self.graph.new_node(v));
            (node, false)
        }
    }

    fn persistent_terminal(&self, t: OrigNode) -> NodeId {
        match self.terminal_node[t.index()] {
            Some(n) => n,
            None => unreachable!("persistent node exists for every terminal"),
        }
    }

    /// Remove the component at `id`, deleting its private nodes and edges
    /// from the shared graph. Terminal nodes are never deleted.
    ///
    /// Returns how the registry slot was freed; see [`Removal`] for the
    /// id-invalidation contract.
    pub fn remove(&mut self, id: usize) -> Result<Removal, StoreError> {
        let size = self.components.len();
        if id >= size {
            return Err(StoreError::IndexOutOfRange { id, size });
        }

        let anchor = self.components[id].anchor;
        let num_terminals = self.components[id].terminals.len();
        if num_terminals == 2 && self.is_terminal(self.graph.dart_target(anchor)) {
            // Two terminals joined by one contracted edge.
            self.graph.del_edge(anchor.edge());
        } else {
            // Worklist walk over the private non-terminals; never crosses
            // a terminal, so it stays inside this component.
            let mut worklist = Vec::with_capacity(2 * num_terminals - 3);
            worklist.push(self.graph.dart_target(anchor));
            self.graph.del_edge(anchor.edge());
            while let Some(v) = worklist.pop() {
                if !self.is_terminal(v) {
                    worklist.extend(self.graph.darts(v).map(|d| self.graph.dart_target(d)));
                    self.graph.del_node(v);
                }
            }
        }

        let last = size - 1;
        let removal = if id == last {
            Removal::Last
        } else {
            Removal::Swapped { moved_from: last }
        };
        self.components.swap_remove(id);
        tracing::debug!(id, ?removal, "removed full component");
        Ok(removal)
    }

    /// Number of stored components.
    pub fn size(&self) -> usize {
        self.components.len()
    }

    /// Whether the store holds no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub(crate) fn record(&self, id: usize) -> &ComponentRecord<W, X> {
        assert!(
            id < self.components.len(),
            "component id {id} out of range (store size {})",
            self.components.len()
        );
        &self.components[id]
    }

    /// Terminals of the component at `id`, sorted ascending.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range; this and the other read accessors
    /// treat a dead id as a caller contract violation.
    pub fn terminals(&self, id: usize) -> &[OrigNode] {
        &self.record(id).terminals
    }

    /// Sum of the weights of the component's private edges.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn cost(&self, id: usize) -> W {
        self.record(id).cost
    }

    /// The component's anchor: a half-edge at one of its terminals, the
    /// deterministic root of all traversals.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn anchor(&self, id: usize) -> Dart {
        self.record(id).anchor
    }

    /// Whether `t` is one of the terminals of the component at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn is_component_terminal(&self, id: usize, t: OrigNode) -> bool {
        self.record(id).terminals.binary_search(&t).is_ok()
    }

    /// Whether a shared-graph node maps back to an original terminal.
    pub fn is_terminal(&self, v: NodeId) -> bool {
        self.instance.is_terminal(self.graph.original(v))
    }

    /// The original node a shared node maps back to.
    pub fn original(&self, v: NodeId) -> OrigNode {
        self.graph.original(v)
    }

    /// The persistent shared node of an original terminal.
    ///
    /// # Panics
    ///
    /// Panics if `t` is not a terminal of the instance.
    pub fn shared_terminal(&self, t: OrigNode) -> NodeId {
        assert!(self.instance.is_terminal(t), "{t} is not a terminal");
        self.persistent_terminal(t)
    }

    /// The shared graph all components are compacted into.
    pub fn graph(&self) -> &SharedGraph<W> {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut SharedGraph<W> {
        &mut self.graph
    }

    /// The instance view this store was built over.
    pub fn instance(&self) -> &SteinerInstance {
        &self.instance
    }

    /// Payload of the component at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn payload(&self, id: usize) -> &X {
        &self.record(id).payload
    }

    /// Mutable payload of the component at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn payload_mut(&mut self, id: usize) -> &mut X {
        let size = self.components.len();
        assert!(id < size, "component id {id} out of range (store size {size})");
        &mut self.components[id].payload
    }
}

impl<W: Weight, X: Default> ComponentStore<W, X> {
    /// Insert a candidate tree with a default payload; returns the new
    /// dense id. See [`insert_with`](Self::insert_with).
    pub fn insert(&mut self, tree: CandidateTree<W>) -> Result<usize, StoreError> {
        self.insert_with(tree, X::default())
    }
}
