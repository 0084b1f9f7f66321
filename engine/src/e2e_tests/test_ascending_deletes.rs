//! Test borrowing and merging while deleting keys in ascending order.

use crate::e2e_tests::helpers::*;

const KEYS: [i64; 7] = [10, 20, 30, 40, 50, 60, 70];

#[test]
fn test_delete_ascending_keeps_invariants() {
    let mut tree = tree_from(3, KEYS);
    let mut expected = key_set(KEYS);
    assert!(!tree.root().is_leaf(), "seven keys force a split at t = 3");

    for key in KEYS {
        assert!(tree.delete(key), "{key} should be deleted");
        expected.remove(&key);
        assert_tree_matches(&tree, &expected);
        assert!(!tree.search(key));
    }

    assert!(tree.is_empty());
}

#[test]
fn test_borrow_then_merge_shapes() {
    let mut tree = tree_from(3, KEYS);
    assert_eq!(tree.root().keys(), &[30]);
    assert_eq!(tree.root().children()[0].keys(), &[10, 20]);
    assert_eq!(tree.root().children()[1].keys(), &[40, 50, 60, 70]);

    // Left child is minimal, right sibling has a spare key: borrow.
    tree.delete(10);
    assert_eq!(tree.root().keys(), &[40]);
    assert_eq!(tree.root().children()[0].keys(), &[20, 30]);
    assert_eq!(tree.root().children()[1].keys(), &[50, 60, 70]);

    tree.delete(20);
    assert_eq!(tree.root().keys(), &[50]);
    assert_eq!(tree.root().children()[0].keys(), &[30, 40]);
    assert_eq!(tree.root().children()[1].keys(), &[60, 70]);

    // Both children minimal: merge, and the emptied root collapses.
    tree.delete(30);
    assert!(tree.root().is_leaf());
    assert_eq!(tree.root().keys(), &[40, 50, 60, 70]);
}

#[test]
fn test_delete_from_internal_uses_predecessor() {
    // Root [30] over [10, 20, 25] and [40, 50]; left child can spare a key.
    let mut tree = tree_from(3, [10, 20, 30, 40, 50, 60]);
    tree.delete(60);
    tree.insert(25).expect("insert");
    assert_eq!(tree.root().keys(), &[30]);
    assert_eq!(tree.root().children()[0].keys(), &[10, 20, 25]);

    assert!(tree.delete(30));
    assert_eq!(tree.root().keys(), &[25]);
    assert_eq!(tree.root().children()[0].keys(), &[10, 20]);
    assert_tree_matches(&tree, &key_set([10, 20, 25, 40, 50]));
}

#[test]
fn test_delete_from_internal_uses_successor() {
    let mut tree = tree_from(3, [10, 20, 30, 40, 50, 60]);
    assert_eq!(tree.root().children()[0].keys(), &[10, 20]);
    assert_eq!(tree.root().children()[1].keys(), &[40, 50, 60]);

    assert!(tree.delete(30));
    assert_eq!(tree.root().keys(), &[40]);
    assert_eq!(tree.root().children()[1].keys(), &[50, 60]);
    assert_tree_matches(&tree, &key_set([10, 20, 40, 50, 60]));
}

#[test]
fn test_delete_descending_in_deep_tree() {
    let mut tree = tree_from(2, 0..200);
    let mut expected = key_set(0..200);
    assert!(tree.height() > 3);

    for key in (0..200).rev() {
        assert!(tree.delete(key));
        expected.remove(&key);
        assert_tree_matches(&tree, &expected);
    }
}
