//! The B-tree itself: root ownership, length bookkeeping and the public
//! search / insert / delete / traverse / snapshot operations.
//!
//! Structural work happens in [`Node`]; this type only handles the two places
//! where the root changes identity:
//! - a full root is pushed down under a fresh internal root before insertion
//! - an emptied internal root is replaced by its sole child after deletion

use std::fmt;

use crate::btree::iter::Iter;
use crate::btree::node::{Node, NodeSnapshot};
use crate::btree::{BTreeError, Key, MinDegree};

/// An in-memory B-tree of unique integer keys.
#[derive(Debug, Clone)]
pub struct BTree {
    root: Node,
    min_degree: MinDegree,
    len: usize,
}

impl BTree {
    /// Create an empty tree whose root is a key-less leaf.
    #[must_use]
    pub const fn new(min_degree: MinDegree) -> Self {
        Self {
            root: Node::new_leaf(),
            min_degree,
            len: 0,
        }
    }

    /// Create an empty tree, validating the minimum degree.
    pub const fn with_min_degree(t: usize) -> Result<Self, BTreeError> {
        match MinDegree::new(t) {
            Ok(min_degree) => Ok(Self::new(min_degree)),
            Err(e) => Err(e),
        }
    }

    #[must_use]
    pub const fn min_degree(&self) -> MinDegree {
        self.min_degree
    }

    /// Number of keys stored.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, counting the root. An empty tree has height 1.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.root;
        while let Some(child) = node.child(0) {
            height += 1;
            node = child;
        }
        height
    }

    /// Read-only access to the root node.
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Whether `key` is stored in the tree.
    #[must_use]
    pub fn search(&self, key: Key) -> bool {
        self.root.contains(key)
    }

    /// Smallest key, if any.
    #[must_use]
    pub fn min(&self) -> Option<Key> {
        if self.is_empty() {
            return None;
        }
        Some(self.root.min_key())
    }

    /// Largest key, if any.
    #[must_use]
    pub fn max(&self) -> Option<Key> {
        if self.is_empty() {
            return None;
        }
        Some(self.root.max_key())
    }

    /// Insert `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BTreeError::DuplicateKey`] if the key is already present; the
    /// tree is left untouched in that case.
    pub fn insert(&mut self, key: Key) -> Result<(), BTreeError> {
        if self.search(key) {
            return Err(BTreeError::DuplicateKey(key));
        }

        let t = self.min_degree;
        if self.root.is_full(t) {
            let old_root = std::mem::replace(&mut self.root, Node::new_leaf());
            self.root = Node::new_root_above(old_root);
            self.root.split_child(0, t);
            tracing::debug!(key, height = self.height(), "root split, tree grew");
        }

        self.root.insert_non_full(key, t);
        self.len += 1;

        #[cfg(debug_assertions)]
        self.debug_validate();

        Ok(())
    }

    /// Delete `key`, returning whether it was present.
    ///
    /// Deleting an absent key is a no-op on the key set. The descent may still
    /// rebalance nodes along the way, which leaves every invariant intact.
    pub fn delete(&mut self, key: Key) -> bool {
        let removed = self.root.remove(key, self.min_degree);

        if self.root.keys.is_empty() && !self.root.leaf {
            let old_root = std::mem::replace(&mut self.root, Node::new_leaf());
            if let Some(child) = old_root.children.into_iter().next() {
                self.root = child;
            }
            tracing::debug!(key, height = self.height(), "root collapsed, tree shrank");
        }

        if removed {
            self.len -= 1;
        }

        #[cfg(debug_assertions)]
        self.debug_validate();

        removed
    }

    /// All keys in ascending order.
    #[must_use]
    pub fn traverse(&self) -> Vec<Key> {
        let mut keys = Vec::with_capacity(self.len);
        keys.extend(self.iter());
        keys
    }

    /// Borrowing in-order iterator over the keys.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.root, self.len)
    }

    /// Structural description of the whole tree.
    #[must_use]
    pub fn snapshot(&self) -> NodeSnapshot {
        self.root.snapshot()
    }

    #[cfg(debug_assertions)]
    fn debug_validate(&self) {
        if let Err(violation) = self.check_invariants() {
            panic!("B-tree invariant violated: {violation}");
        }
    }
}

impl Default for BTree {
    fn default() -> Self {
        Self::new(MinDegree::DEFAULT)
    }
}

impl<'a> IntoIterator for &'a BTree {
    type Item = Key;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for BTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn fmt_depth(node: &Node, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
            writeln!(f, "{}{:?}", "  ".repeat(depth), node.keys())?;
            for child in node.children() {
                fmt_depth(child, f, depth + 1)?;
            }
            Ok(())
        }

        fmt_depth(&self.root, f, 0)
    }
}
