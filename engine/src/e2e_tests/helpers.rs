//! Common helpers for scenario tests.

use std::collections::BTreeSet;

use crate::btree::{BTree, Key};

pub use crate::testing::assert_tree_matches;

/// Build a tree of minimum degree `t` by inserting `keys` in order.
pub fn tree_from(t: usize, keys: impl IntoIterator<Item = Key>) -> BTree {
    let mut tree = BTree::with_min_degree(t).expect("valid degree");
    for key in keys {
        tree.insert(key).expect("insert");
    }
    tree
}

/// The key set a tree is expected to hold.
pub fn key_set(keys: impl IntoIterator<Item = Key>) -> BTreeSet<Key> {
    keys.into_iter().collect()
}
