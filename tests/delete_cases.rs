//! Concrete deletion, boundary, and configuration scenarios.

use pretty_assertions::assert_eq;
use rowan_tree::{Rank, Strategy, TreeMap};

const STRATEGIES: [Strategy; 3] = [Strategy::Unbalanced, Strategy::Avl, Strategy::Scapegoat];

/// Builds the three-node tree {2: [1, 3]} - root 2, left child 1, right
/// child 3 - which covers every structural deletion case.
fn three_node_map(strategy: Strategy) -> TreeMap<i32, &'static str> {
    let mut map = TreeMap::with_strategy(strategy);
    map.insert(2, "two");
    map.insert(1, "one");
    map.insert(3, "three");
    map
}

#[test]
fn removing_left_leaf_keeps_the_rest() {
    for strategy in STRATEGIES {
        let mut map = three_node_map(strategy);
        assert_eq!(map.remove(&1), Some("one"));

        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, [2, 3]);
        assert_eq!(map.first_key_value(), Some((&2, &"two")));
    }
}

#[test]
fn removing_right_leaf_keeps_the_rest() {
    for strategy in STRATEGIES {
        let mut map = three_node_map(strategy);
        assert_eq!(map.remove(&3), Some("three"));

        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, [1, 2]);
        assert_eq!(map.last_key_value(), Some((&2, &"two")));
    }
}

#[test]
fn removing_two_child_root_preserves_in_order_sequence() {
    for strategy in STRATEGIES {
        let mut map = three_node_map(strategy);
        assert_eq!(map.remove(&2), Some("two"));

        // Which node gets promoted is an implementation choice; the in-order
        // sequence is the contract.
        let entries: Vec<_> = map.iter().map(|(&k, &v)| (k, v)).collect();
        assert_eq!(entries, [(1, "one"), (3, "three")]);
    }
}

#[test]
fn removing_one_child_nodes_and_the_root() {
    for strategy in STRATEGIES {
        let mut map = three_node_map(strategy);
        // Strip to a two-node chain, then remove the root of the chain.
        assert_eq!(map.remove(&1), Some("one"));
        assert_eq!(map.remove(&2), Some("two"));
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, [3]);

        // Removing the last node empties the tree.
        assert_eq!(map.remove(&3), Some("three"));
        assert!(map.is_empty());
        assert_eq!(map.iter().next(), None);
    }
}

#[test]
fn interior_two_child_deletion_in_a_larger_tree() {
    for strategy in STRATEGIES {
        let mut map: TreeMap<i32, i32> = TreeMap::with_strategy(strategy);
        for k in [50, 20, 80, 10, 30, 60, 90, 25, 35, 55, 65] {
            map.insert(k, k);
        }

        // 20 and 80 both have two children.
        assert_eq!(map.remove(&20), Some(20));
        assert_eq!(map.remove(&80), Some(80));

        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, [10, 25, 30, 35, 50, 55, 60, 65, 90]);
    }
}

// ─── Empty-map boundaries ────────────────────────────────────────────────────

#[test]
fn empty_map_reads_are_misses_not_errors() {
    for strategy in STRATEGIES {
        let mut map: TreeMap<i32, i32> = TreeMap::with_strategy(strategy);
        assert_eq!(map.get(&1), None);
        assert_eq!(map.get_key_value(&1), None);
        assert!(!map.contains_key(&1));
        assert_eq!(map.remove(&1), None);
        assert_eq!(map.remove_entry(&1), None);
        assert_eq!(map.first_key_value(), None);
        assert_eq!(map.last_key_value(), None);
        assert_eq!(map.pop_first(), None);
        assert_eq!(map.pop_last(), None);
        assert_eq!(map.get_by_rank(0), None);
        assert_eq!(map.remove_by_rank(0), None);
        assert_eq!(map.rank_of(&1), None);
        assert_eq!(map.iter().next(), None);
    }
}

#[test]
#[should_panic(expected = "index out of bounds")]
fn rank_indexing_an_empty_map_panics() {
    let map: TreeMap<i32, i32> = TreeMap::new();
    let _ = map[Rank(0)];
}

#[test]
#[should_panic(expected = "index out of bounds")]
fn rank_indexing_past_the_end_panics() {
    let map = TreeMap::from([(1, "a")]);
    let _ = map[Rank(1)];
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn key_indexing_a_missing_key_panics() {
    let map = TreeMap::from([(1, "a")]);
    let _ = map[&2];
}

// ─── Indexed access round-trips ──────────────────────────────────────────────

#[test]
fn get_by_rank_round_trips_a_range() {
    const N: i32 = 500;
    for strategy in STRATEGIES {
        let mut map: TreeMap<i32, i32> = TreeMap::with_strategy(strategy);
        // Insert out of order so the unbalanced variant gets some shape too.
        for i in (0..N).rev() {
            map.insert(i, i + 1);
        }

        for i in 0..N {
            let rank = usize::try_from(i).unwrap();
            // The value at rank i is the (i+1)-th smallest.
            assert_eq!(map.get_by_rank(rank), Some((&i, &(i + 1))));
            assert_eq!(map.rank_of(&i), Some(rank));
        }
        assert_eq!(map.get_by_rank(usize::try_from(N).unwrap()), None);
    }
}

#[test]
fn swapping_values_at_symmetric_ranks_reads_back() {
    for strategy in STRATEGIES {
        let mut map: TreeMap<i32, i32> = TreeMap::with_strategy(strategy);
        for i in 0..10 {
            map.insert(i, i);
        }

        for i in 0..5usize {
            let j = 9 - i;
            let low = map[Rank(i)];
            let high = map[Rank(j)];
            map[Rank(i)] = high;
            map[Rank(j)] = low;
        }

        let values: Vec<_> = map.values().copied().collect();
        assert_eq!(values, [9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        // Keys are untouched by value swaps.
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[test]
fn scapegoat_alpha_bounds_are_enforced() {
    // Boundary values are accepted...
    let _ = TreeMap::<i32, i32>::scapegoat_with_alpha(0.51);
    let _ = TreeMap::<i32, i32>::scapegoat_with_alpha(0.99);
}

#[test]
#[should_panic(expected = "`alpha` must be in (0.5, 1.0)!")]
fn scapegoat_alpha_of_one_half_panics() {
    let _ = TreeMap::<i32, i32>::scapegoat_with_alpha(0.5);
}

#[test]
#[should_panic(expected = "`alpha` must be in (0.5, 1.0)!")]
fn scapegoat_alpha_of_one_panics() {
    let _ = TreeMap::<i32, i32>::scapegoat_with_alpha(1.0);
}

#[test]
fn strategy_is_reported_and_fixed() {
    assert_eq!(TreeMap::<i32, i32>::new().strategy(), Strategy::Avl);
    assert_eq!(TreeMap::<i32, i32>::unbalanced().strategy(), Strategy::Unbalanced);
    assert_eq!(TreeMap::<i32, i32>::scapegoat().strategy(), Strategy::Scapegoat);
    assert_eq!(
        TreeMap::<i32, i32>::scapegoat_with_alpha(0.6).strategy(),
        Strategy::Scapegoat
    );

    let mut map = TreeMap::<i32, i32>::scapegoat();
    map.insert(1, 1);
    map.clear();
    assert_eq!(map.strategy(), Strategy::Scapegoat);
}

#[test]
fn clear_resets_to_the_empty_state() {
    for strategy in STRATEGIES {
        let mut map: TreeMap<i32, i32> = TreeMap::with_strategy(strategy);
        for i in 0..100 {
            map.insert(i, i);
        }
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.iter().next(), None);

        // The map is fully usable after clearing.
        map.insert(42, 1);
        assert_eq!(map.get(&42), Some(&1));
        assert_eq!(map.len(), 1);
    }
}

#[test]
fn clone_eq_and_ordering_are_structural() {
    let a: TreeMap<i32, i32> = (0..50).map(|i| (i, i)).collect();
    let b = a.clone();
    assert_eq!(a, b);

    // Maps with the same contents built in different orders compare equal.
    let mut c: TreeMap<i32, i32> = TreeMap::unbalanced();
    for i in (0..50).rev() {
        c.insert(i, i);
    }
    assert_eq!(a, c);

    let mut d = c.clone();
    d.insert(50, 50);
    assert!(a < d);
}
