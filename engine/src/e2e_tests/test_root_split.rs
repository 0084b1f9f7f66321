//! Test how insertion splits full nodes and grows the tree at the root.

use crate::e2e_tests::helpers::*;

#[test]
fn test_sixth_key_splits_full_root_leaf() {
    let mut tree = tree_from(3, 1..=5);
    assert!(tree.root().is_leaf());
    assert_eq!(tree.root().key_count(), 5);

    tree.insert(6).expect("insert");

    let root = tree.root();
    assert_eq!(root.keys(), &[3]);
    assert!(!root.is_leaf());
    assert_eq!(root.children().len(), 2);
    assert!(root.children()[0].keys().iter().all(|&k| k < 3));
    assert!(root.children()[1].keys().iter().all(|&k| k > 3));
    assert_eq!(root.children()[0].keys(), &[1, 2]);
    assert_eq!(root.children()[1].keys(), &[4, 5, 6]);
    assert_tree_matches(&tree, &key_set(1..=6));
}

#[test]
fn test_full_child_is_split_before_descent() {
    // Root [3] with children [1, 2] and [4, 5, 6, 7, 8]; the right child is full.
    let mut tree = tree_from(3, 1..=8);
    assert_eq!(tree.root().keys(), &[3]);
    assert_eq!(tree.root().children()[1].keys(), &[4, 5, 6, 7, 8]);

    tree.insert(9).expect("insert");

    assert_eq!(tree.root().keys(), &[3, 6]);
    assert_eq!(tree.root().children()[1].keys(), &[4, 5]);
    assert_eq!(tree.root().children()[2].keys(), &[7, 8, 9]);
    assert_tree_matches(&tree, &key_set(1..=9));
}

#[test]
fn test_key_lands_left_of_promoted_median() {
    let mut tree = tree_from(3, [10, 20, 30, 40, 50, 60, 70, 80]);
    // Right child [40, 50, 60, 70, 80] is full; 45 belongs left of its median 60.
    tree.insert(45).expect("insert");

    assert_eq!(tree.root().keys(), &[30, 60]);
    assert_eq!(tree.root().children()[1].keys(), &[40, 45, 50]);
    assert_tree_matches(&tree, &key_set([10, 20, 30, 40, 45, 50, 60, 70, 80]));
}

#[test]
fn test_height_grows_only_through_root_splits() {
    let mut tree = tree_from(2, []);
    let mut height = tree.height();

    for key in 0..500 {
        let root_was_full = tree.root().key_count() == tree.min_degree().max_keys();
        tree.insert(key).expect("insert");

        let new_height = tree.height();
        if root_was_full {
            assert_eq!(new_height, height + 1, "root split at key {key}");
        } else {
            assert_eq!(new_height, height, "no root split at key {key}");
        }
        height = new_height;
    }

    assert_tree_matches(&tree, &key_set(0..500));
}

#[test]
fn test_descending_inserts_stay_balanced() {
    let tree = tree_from(4, (0..300).rev());
    assert_tree_matches(&tree, &key_set(0..300));
}
