//! End-to-end scenarios for the full-component store.
//!
//! These tests exercise the store the way an approximation driver does:
//! insert candidate trees, traverse, remove, and run loss decomposition,
//! checking the store's documented invariants along the way.

use std::collections::BTreeMap;

use proptest::prelude::*;
use steiner_components::{
    CandidateTree, ComponentStore, LossStore, OrigNode, Removal, SteinerInstance, StoreError,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Instance with terminals `0..num_terminals` out of `num_nodes` nodes.
fn instance(num_nodes: usize, num_terminals: usize) -> SteinerInstance {
    let terminals = (0..num_terminals as u32).map(OrigNode).collect();
    SteinerInstance::new(num_nodes, terminals)
}

/// Star component through Steiner node `center`.
fn star(center: u32, leaves: &[(u32, u64)]) -> CandidateTree<u64> {
    let mut tree = CandidateTree::new();
    for &(t, w) in leaves {
        tree.add_edge(OrigNode(t), OrigNode(center), w);
    }
    tree
}

/// Sum of edge weights seen by a full dart traversal of `id`.
fn traversed_weight(store: &ComponentStore<u64>, id: usize) -> u64 {
    let mut sum = 0;
    store.for_each_dart(id, |d| sum += store.graph().weight(d.edge()));
    sum
}

// ─────────────────────────────────────────────────────────────────────────────
// End-to-End Scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn single_edge_component() {
    // Terminals {A=0, B=1}; one edge A–B of weight 5.
    let mut store: ComponentStore<u64> = ComponentStore::new(instance(2, 2));
    let id = store
        .insert(CandidateTree::single_edge(OrigNode(0), OrigNode(1), 5))
        .unwrap();

    assert_eq!(store.size(), 1);
    assert_eq!(store.terminals(id), &[OrigNode(0), OrigNode(1)]);
    assert_eq!(store.cost(id), 5);

    let mut visited = Vec::new();
    store.for_each_dart(id, |d| visited.push(d));
    assert_eq!(visited.len(), 1);
    // The one dart points at the terminal opposite the anchor.
    let far = store.original(store.graph().dart_node(visited[0]));
    let near = store.original(store.graph().dart_target(visited[0]));
    assert_ne!(far, near);
    assert!(matches!(far, OrigNode(0) | OrigNode(1)));
}

#[test]
fn star_component_traversal() {
    // Terminals {A, B, C} through Steiner point S=3.
    let mut store: ComponentStore<u64> = ComponentStore::new(instance(4, 3));
    let id = store.insert(star(3, &[(0, 1), (1, 2), (2, 3)])).unwrap();

    assert_eq!(store.cost(id), 6);
    assert_eq!(
        store.terminals(id),
        &[OrigNode(0), OrigNode(1), OrigNode(2)]
    );

    let mut leaf_darts = 0;
    let mut steiner_revisits = 0;
    let mut total = 0;
    store.for_each_dart(id, |d| {
        total += 1;
        let far = store.graph().dart_node(d);
        if store.is_terminal(far) {
            leaf_darts += 1;
        } else {
            steiner_revisits += 1;
        }
    });
    assert_eq!(total, 3);
    // Two darts end at the non-anchor terminals; the anchor edge's dart
    // ends at S, which is expanded but never treated as a terminal.
    assert_eq!(leaf_darts, 2);
    assert_eq!(steiner_revisits, 1);
}

#[test]
fn remove_frees_private_subgraph() {
    let mut store: ComponentStore<u64> = ComponentStore::new(instance(4, 3));
    let id = store.insert(star(3, &[(0, 1), (1, 2), (2, 3)])).unwrap();
    let steiner = store.graph().dart_target(store.anchor(id));

    assert_eq!(store.remove(id), Ok(Removal::Last));
    assert_eq!(store.size(), 0);
    assert!(!store.graph().contains_node(steiner));
    assert_eq!(store.graph().num_edges(), 0);

    // A, B, C survive and accept a fresh component.
    for t in 0..3 {
        assert!(store.graph().contains_node(store.shared_terminal(OrigNode(t))));
    }
    let id2 = store.insert(star(3, &[(0, 7), (1, 7), (2, 7)])).unwrap();
    assert_eq!(store.cost(id2), 21);
}

#[test]
fn components_share_only_terminals() {
    // Terminals {A, B, C, D}; two components share terminal B=1 but have
    // disjoint Steiner points 4 and 5.
    let mut store: ComponentStore<u64> = ComponentStore::new(instance(6, 4));
    let first = store.insert(star(4, &[(0, 1), (1, 2), (2, 3)])).unwrap();
    // Path-shaped two-terminal component 1 - 5 - 3.
    store.insert(star(5, &[(1, 4), (3, 5)])).unwrap();

    let b_shared = store.shared_terminal(OrigNode(1));
    assert_eq!(store.remove(first), Ok(Removal::Swapped { moved_from: 1 }));

    // B survives, and the remaining component is untouched.
    assert!(store.graph().contains_node(b_shared));
    assert_eq!(store.size(), 1);
    assert_eq!(store.cost(0), 9);
    assert_eq!(store.terminals(0), &[OrigNode(1), OrigNode(3)]);
    assert_eq!(traversed_weight(&store, 0), 9);
}

// ─────────────────────────────────────────────────────────────────────────────
// Invariant Checks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn cost_matches_traversed_weight() {
    let mut store: ComponentStore<u64> = ComponentStore::new(instance(8, 4));
    let ids = [
        store.insert(star(4, &[(0, 1), (1, 2), (2, 3)])).unwrap(),
        store
            .insert(CandidateTree::single_edge(OrigNode(2), OrigNode(3), 11))
            .unwrap(),
        store
            .insert(star(5, &[(0, 2), (1, 2), (2, 2), (3, 2)]))
            .unwrap(),
    ];
    for id in ids {
        assert_eq!(store.cost(id), traversed_weight(&store, id));
    }
}

#[test]
fn each_component_terminal_has_one_incidence() {
    let mut store: ComponentStore<u64> = ComponentStore::new(instance(8, 4));
    // Caterpillar: 0 - 4 - 5 - 1 with 2 off 4 and 3 off 5.
    let mut tree = CandidateTree::new();
    tree.add_edge(OrigNode(0), OrigNode(4), 1);
    tree.add_edge(OrigNode(4), OrigNode(5), 2);
    tree.add_edge(OrigNode(5), OrigNode(1), 3);
    tree.add_edge(OrigNode(2), OrigNode(4), 4);
    tree.add_edge(OrigNode(3), OrigNode(5), 5);
    let id = store.insert(tree).unwrap();

    let mut incidences: BTreeMap<OrigNode, usize> = BTreeMap::new();
    store.for_each_dart(id, |d| {
        let (u, v) = store.graph().endpoints(d.edge());
        for node in [u, v] {
            if store.is_terminal(node) {
                *incidences.entry(store.original(node)).or_default() += 1;
            }
        }
    });
    assert_eq!(incidences.len(), 4);
    assert!(incidences.values().all(|&count| count == 1));
}

#[test]
fn swap_remove_relocates_last_id() {
    let mut store: ComponentStore<u64> = ComponentStore::new(instance(8, 4));
    for (i, w) in [10u64, 20, 30, 40].into_iter().enumerate() {
        let t = (i % 3) as u32;
        store
            .insert(CandidateTree::single_edge(OrigNode(t), OrigNode(t + 1), w))
            .unwrap();
    }
    assert_eq!(store.remove(1), Ok(Removal::Swapped { moved_from: 3 }));
    assert_eq!(store.size(), 3);
    assert_eq!(store.cost(1), 40);
    assert_eq!(store.cost(0), 10);
    assert_eq!(store.cost(2), 30);
}

#[test]
fn loss_and_bridges_partition_cost() {
    let mut store: LossStore<u64> = LossStore::new(instance(8, 4));
    store.insert(star(4, &[(0, 1), (1, 2), (2, 3)])).unwrap();
    store
        .insert(CandidateTree::single_edge(OrigNode(0), OrigNode(1), 4))
        .unwrap();
    store.insert(star(5, &[(1, 6), (2, 6), (3, 6)])).unwrap();
    store.compute_all_losses();

    for id in 0..store.size() {
        let bridge_sum: u64 = store
            .loss_bridges(id)
            .iter()
            .map(|&e| store.graph().weight(e))
            .sum();
        assert_eq!(store.loss(id) + bridge_sum, store.cost(id));
    }
}

#[test]
fn terminal_loss_terminal_is_itself() {
    let mut store: LossStore<u64> = LossStore::new(instance(8, 4));
    store.insert(star(4, &[(0, 1), (1, 2), (2, 3)])).unwrap();
    store.compute_all_losses();

    for t in 0..4 {
        let shared = store.shared_terminal(OrigNode(t));
        assert_eq!(store.loss_terminal(shared), Some(OrigNode(t)));
    }
}

#[test]
fn failed_insert_is_atomic() {
    let mut store: ComponentStore<u64> = ComponentStore::new(instance(6, 3));
    let nodes_before = store.graph().num_nodes();

    let mut bad = star(4, &[(0, 1), (1, 1)]);
    bad.add_edge(OrigNode(1), OrigNode(5), 1); // terminal 1 interior
    assert!(matches!(
        store.insert(bad),
        Err(StoreError::InvalidComponent(_))
    ));
    assert!(store.is_empty());
    assert_eq!(store.graph().num_nodes(), nodes_before);
    assert_eq!(store.graph().num_edges(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Randomized properties
// ─────────────────────────────────────────────────────────────────────────────

/// Broom component: a chain of Steiner nodes with every terminal hanging
/// off it as a leaf.
fn broom(
    num_terminals: usize,
    chain_len: usize,
    weights: &[u64],
    attach: &[usize],
) -> CandidateTree<u64> {
    let steiner = |i: usize| OrigNode((num_terminals + i) as u32);
    let mut tree = CandidateTree::new();
    let mut w = weights.iter().copied().cycle();
    for i in 1..chain_len {
        tree.add_edge(steiner(i - 1), steiner(i), w.next().unwrap_or(1));
    }
    for (t, &slot) in attach.iter().enumerate() {
        tree.add_edge(
            OrigNode(t as u32),
            steiner(slot % chain_len),
            w.next().unwrap_or(1),
        );
    }
    tree
}

proptest! {
    #[test]
    fn prop_traversal_accounts_for_every_edge(
        num_terminals in 3usize..8,
        chain_len in 1usize..5,
        weights in prop::collection::vec(1u64..100, 4..20),
        attach_seed in prop::collection::vec(0usize..16, 8),
    ) {
        let attach: Vec<usize> = attach_seed[..num_terminals].to_vec();
        let inst = instance(num_terminals + chain_len, num_terminals);
        let mut store: ComponentStore<u64> = ComponentStore::new(inst);
        let tree = broom(num_terminals, chain_len, &weights, &attach);
        let id = store.insert(tree).unwrap();

        // Traversal sees exactly the component's cost.
        prop_assert_eq!(store.cost(id), traversed_weight(&store, id));

        // Every terminal has exactly one traversed incidence.
        let mut incidences: BTreeMap<OrigNode, usize> = BTreeMap::new();
        store.for_each_dart(id, |d| {
            let (u, v) = store.graph().endpoints(d.edge());
            for node in [u, v] {
                if store.is_terminal(node) {
                    *incidences.entry(store.original(node)).or_default() += 1;
                }
            }
        });
        prop_assert_eq!(incidences.len(), num_terminals);
        prop_assert!(incidences.values().all(|&count| count == 1));

        // Removal restores the terminal-only graph.
        store.remove(id).unwrap();
        prop_assert_eq!(store.graph().num_nodes(), num_terminals);
        prop_assert_eq!(store.graph().num_edges(), 0);
    }

    #[test]
    fn prop_loss_partitions_cost(
        num_terminals in 3usize..8,
        weights in prop::collection::vec(1u64..100, 8),
        edge_weight in 1u64..50,
    ) {
        let inst = instance(num_terminals + 1, num_terminals);
        let mut store: LossStore<u64> = LossStore::new(inst);
        let center = num_terminals as u32;
        let leaves: Vec<(u32, u64)> = (0..num_terminals)
            .map(|t| (t as u32, weights[t]))
            .collect();
        let a = store.insert(star(center, &leaves)).unwrap();
        let b = store
            .insert(CandidateTree::single_edge(OrigNode(0), OrigNode(1), edge_weight))
            .unwrap();
        store.compute_all_losses();

        for id in [a, b] {
            let bridge_sum: u64 = store
                .loss_bridges(id)
                .iter()
                .map(|&e| store.graph().weight(e))
                .sum();
            prop_assert_eq!(store.loss(id) + bridge_sum, store.cost(id));
        }

        // Terminals resolve to themselves on the way out.
        for t in 0..num_terminals as u32 {
            let shared = store.shared_terminal(OrigNode(t));
            prop_assert_eq!(store.loss_terminal(shared), Some(OrigNode(t)));
        }
    }
}
