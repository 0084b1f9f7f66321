//! Test that deletion shrinks the tree from the root down to an empty leaf.

use crate::btree::NodeSnapshot;
use crate::e2e_tests::helpers::*;

#[test]
fn test_down_to_single_key_leaves_leaf_root() {
    let mut tree = tree_from(2, 1..=40);
    for key in (1..=40).filter(|&k| k != 17) {
        assert!(tree.delete(key));
    }

    assert_eq!(tree.height(), 1);
    assert!(tree.root().is_leaf());
    assert_eq!(tree.root().keys(), &[17]);
    assert_tree_matches(&tree, &key_set([17]));
}

#[test]
fn test_deleting_last_key_leaves_empty_leaf() {
    let mut tree = tree_from(3, [5]);
    assert!(tree.delete(5));

    assert!(tree.is_empty());
    assert!(tree.root().is_leaf());
    assert_eq!(tree.root().key_count(), 0);
    assert_eq!(tree.snapshot(), NodeSnapshot::empty());
}

#[test]
fn test_height_never_increases_during_deletes() {
    let mut tree = tree_from(3, 0..400);
    let mut height = tree.height();

    for key in (0..400).step_by(3).chain((1..400).step_by(3)).chain((2..400).step_by(3)) {
        assert!(tree.delete(key));
        let new_height = tree.height();
        assert!(new_height <= height, "height grew deleting {key}");
        height = new_height;
    }

    assert!(tree.is_empty());
    assert_eq!(tree.height(), 1);
}

#[test]
fn test_tree_is_reusable_after_emptying() {
    let mut tree = tree_from(3, 0..50);
    for key in 0..50 {
        tree.delete(key);
    }
    assert!(tree.is_empty());

    for key in (100..150).rev() {
        tree.insert(key).expect("insert");
    }
    assert_tree_matches(&tree, &key_set(100..150));
}
