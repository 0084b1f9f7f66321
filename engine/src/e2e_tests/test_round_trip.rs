//! Test that inserting then deleting a key restores the key set.

use crate::e2e_tests::helpers::*;

#[test]
fn test_insert_then_delete_restores_keys() {
    let base: Vec<i64> = (0..120).map(|k| k * 5).collect();
    let mut tree = tree_from(3, base.iter().copied());
    let expected = key_set(base.iter().copied());

    for probe in [-1, 2, 62, 301, 597, 1000] {
        tree.insert(probe).expect("insert");
        assert!(tree.search(probe));
        assert!(tree.delete(probe));
        assert_tree_matches(&tree, &expected);
    }
}

#[test]
fn test_delete_then_reinsert_restores_keys() {
    let mut tree = tree_from(2, 0..64);
    let expected = key_set(0..64);

    for key in [0, 31, 32, 63, 17] {
        assert!(tree.delete(key));
        assert!(!tree.search(key));
        tree.insert(key).expect("reinsert");
        assert_tree_matches(&tree, &expected);
    }
}

#[test]
fn test_delete_absent_key_keeps_key_set() {
    let mut tree = tree_from(3, (0..90).map(|k| k * 2));
    let expected = key_set((0..90).map(|k| k * 2));

    for odd in [1, 59, 177, -3, 500] {
        assert!(!tree.delete(odd));
        assert_tree_matches(&tree, &expected);
    }
}
