//! Test long seeded sequences of mixed operations against a reference set.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::btree::{BTree, BTreeError, Key};
use crate::e2e_tests::helpers::*;

/// Run `steps` random operations on keys in `-range..range`, checking the
/// tree against a `BTreeSet` after every one.
fn run_mixed(seed: u64, t: usize, steps: usize, range: Key) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tree = BTree::with_min_degree(t).expect("valid degree");
    let mut expected = BTreeSet::new();

    for _ in 0..steps {
        let key = rng.random_range(-range..range);
        match rng.random_range(0..10) {
            0..=4 => {
                let result = tree.insert(key);
                if expected.insert(key) {
                    assert_eq!(result, Ok(()));
                } else {
                    assert_eq!(result, Err(BTreeError::DuplicateKey(key)));
                }
            }
            5..=8 => {
                assert_eq!(tree.delete(key), expected.remove(&key));
            }
            _ => {
                assert_eq!(tree.search(key), expected.contains(&key));
            }
        }
        assert_tree_matches(&tree, &expected);
    }
}

#[test]
fn test_mixed_operations_degree_two() {
    run_mixed(0x5EED, 2, 3_000, 150);
}

#[test]
fn test_mixed_operations_degree_three() {
    run_mixed(42, 3, 3_000, 200);
}

#[test]
fn test_mixed_operations_degree_five() {
    run_mixed(7, 5, 2_000, 300);
}

#[test]
fn test_mixed_operations_wide_nodes() {
    run_mixed(1234, 16, 2_000, 1_000);
}

#[test]
fn test_shuffled_fill_and_drain() {
    for (seed, t) in [(1_u64, 2_usize), (2, 3), (3, 4), (4, 8)] {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut keys: Vec<Key> = (0..500).collect();
        keys.shuffle(&mut rng);

        let mut tree = tree_from(t, keys.iter().copied());
        let mut expected = key_set(keys.iter().copied());
        assert_tree_matches(&tree, &expected);

        keys.shuffle(&mut rng);
        for key in keys {
            assert!(tree.delete(key), "seed {seed}: {key} should be deleted");
            expected.remove(&key);
        }
        assert_tree_matches(&tree, &expected);
        assert!(tree.is_empty());
    }
}

#[test]
fn test_never_inserted_keys_are_never_found() {
    let mut rng = StdRng::seed_from_u64(99);
    let evens: Vec<Key> = (0..400).map(|k| k * 2).collect();
    let tree = tree_from(3, evens.iter().copied());

    for _ in 0..1_000 {
        let odd = rng.random_range(-500..500) * 2 + 1;
        assert!(!tree.search(odd), "{odd} was never inserted");
    }
}
