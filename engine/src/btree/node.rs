//! B-tree node type and the structural primitives that operate on it.
//!
//! A node is either a leaf (no children) or an internal node holding
//! `keys.len() + 1` children. Every primitive here takes the minimum degree
//! `t` from the owning tree; nodes do not store it.
//!
//! The split, merge and borrow primitives all act on a *parent* and the index
//! of the child being restructured, because each of them moves a separator key
//! between the parent and its children.

use serde::Serialize;

use crate::btree::{Key, MinDegree};

/// A single vertex of the tree.
///
/// Children are owned outright; there are no parent or sibling links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) keys: Vec<Key>,
    pub(crate) children: Vec<Node>,
    pub(crate) leaf: bool,
}

/// Read-only structural description of a node and its subtree.
///
/// Serializes as `{"keys": [...], "leaf": bool, "children": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub keys: Vec<Key>,
    pub leaf: bool,
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Snapshot of an empty tree: a single key-less leaf.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            keys: Vec::new(),
            leaf: true,
            children: Vec::new(),
        }
    }
}

impl Node {
    /// Create an empty leaf.
    pub(crate) const fn new_leaf() -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
            leaf: true,
        }
    }

    /// Create an empty internal node whose only child is `child`.
    ///
    /// The result is transiently malformed (zero keys, one child) and must be
    /// fixed immediately by splitting that child.
    pub(crate) fn new_root_above(child: Self) -> Self {
        Self {
            keys: Vec::new(),
            children: vec![child],
            leaf: false,
        }
    }

    /// Keys stored in this node, ascending.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Number of keys stored in this node.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// Child at `index`, or `None` for leaves and out-of-range indexes.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }

    /// All children, in key order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Build a structural snapshot of this subtree.
    #[must_use]
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            keys: self.keys.clone(),
            leaf: self.leaf,
            children: self.children.iter().map(Self::snapshot).collect(),
        }
    }

    pub(crate) fn is_full(&self, t: MinDegree) -> bool {
        self.keys.len() == t.max_keys()
    }

    /// Index of the first key `>= key`, paired with whether it is an exact match.
    pub(crate) fn locate(&self, key: Key) -> (usize, bool) {
        match self.keys.binary_search(&key) {
            Ok(index) => (index, true),
            Err(index) => (index, false),
        }
    }

    /// Membership test for this subtree.
    pub(crate) fn contains(&self, key: Key) -> bool {
        let mut node = self;
        loop {
            let (index, found) = node.locate(key);
            if found {
                return true;
            }
            if node.leaf {
                return false;
            }
            node = &node.children[index];
        }
    }

    /// Largest key in this subtree (descends rightmost).
    pub(crate) fn max_key(&self) -> Key {
        let mut node = self;
        while !node.leaf {
            node = &node.children[node.children.len() - 1];
        }
        node.keys[node.keys.len() - 1]
    }

    /// Smallest key in this subtree (descends leftmost).
    pub(crate) fn min_key(&self) -> Key {
        let mut node = self;
        while !node.leaf {
            node = &node.children[0];
        }
        node.keys[0]
    }

    /// Insert `key` into the subtree rooted here.
    ///
    /// Pre-condition: this node is not full. Any full child on the descent path
    /// is split before it is entered, so the pre-condition holds at every level.
    pub(crate) fn insert_non_full(&mut self, key: Key, t: MinDegree) {
        let (mut index, found) = self.locate(key);
        debug_assert!(!found, "duplicate keys are rejected before descent");

        if self.leaf {
            self.keys.insert(index, key);
            return;
        }

        if self.children[index].is_full(t) {
            self.split_child(index, t);
            if key > self.keys[index] {
                index += 1;
            }
        }
        self.children[index].insert_non_full(key, t);
    }

    /// Split the full child at `index` around its median.
    ///
    /// The median moves up into `self.keys[index]`, the upper half becomes a
    /// new sibling at `self.children[index + 1]`. Both halves keep `t - 1` keys.
    pub(crate) fn split_child(&mut self, index: usize, t: MinDegree) {
        let mid = t.min_keys();
        let child = &mut self.children[index];
        debug_assert!(child.is_full(t), "only full children are split");

        let right_keys = child.keys.split_off(mid + 1);
        let median = child.keys[mid];
        child.keys.truncate(mid);

        let right_children = if child.leaf {
            Vec::new()
        } else {
            child.children.split_off(mid + 1)
        };

        let right = Self {
            keys: right_keys,
            children: right_children,
            leaf: child.leaf,
        };

        tracing::trace!(index, median, "split child");
        self.keys.insert(index, median);
        self.children.insert(index + 1, right);
    }

    /// Delete `key` from the subtree rooted here.
    ///
    /// Pre-condition: this node is the root or holds at least `t` keys, so one
    /// key can be taken out of it without underflow. Returns whether the key
    /// was present.
    pub(crate) fn remove(&mut self, key: Key, t: MinDegree) -> bool {
        let (index, found) = self.locate(key);

        if found {
            if self.leaf {
                self.keys.remove(index);
            } else {
                self.remove_from_internal(index, t);
            }
            return true;
        }

        if self.leaf {
            return false;
        }

        let is_in_last_child = index == self.keys.len();
        if self.children[index].keys.len() < t.get() {
            self.fill(index, t);
        }

        // Filling the last child may have merged it into its left sibling.
        if is_in_last_child && index > self.keys.len() {
            self.children[index - 1].remove(key, t)
        } else {
            self.children[index].remove(key, t)
        }
    }

    /// Remove `self.keys[index]` from an internal node.
    fn remove_from_internal(&mut self, index: usize, t: MinDegree) {
        let key = self.keys[index];

        if self.children[index].keys.len() >= t.get() {
            let predecessor = self.children[index].max_key();
            self.keys[index] = predecessor;
            self.children[index].remove(predecessor, t);
        } else if self.children[index + 1].keys.len() >= t.get() {
            let successor = self.children[index + 1].min_key();
            self.keys[index] = successor;
            self.children[index + 1].remove(successor, t);
        } else {
            self.merge(index);
            self.children[index].remove(key, t);
        }
    }

    /// Bring `self.children[index]` up to at least `t` keys.
    fn fill(&mut self, index: usize, t: MinDegree) {
        let last = self.keys.len();
        if index != 0 && self.children[index - 1].keys.len() > t.min_keys() {
            self.borrow_from_prev(index);
        } else if index != last && self.children[index + 1].keys.len() > t.min_keys() {
            self.borrow_from_next(index);
        } else if index != last {
            self.merge(index);
        } else {
            self.merge(index - 1);
        }
    }

    /// Rotate one key from the left sibling through the parent into `children[index]`.
    fn borrow_from_prev(&mut self, index: usize) {
        let (left, right) = self.children.split_at_mut(index);
        let sibling = &mut left[index - 1];
        let child = &mut right[0];

        let Some(raised) = sibling.keys.pop() else {
            unreachable!("left sibling has surplus keys");
        };
        let lowered = std::mem::replace(&mut self.keys[index - 1], raised);
        child.keys.insert(0, lowered);

        if !child.leaf {
            let grandchild = sibling.children.remove(sibling.children.len() - 1);
            child.children.insert(0, grandchild);
        }
        tracing::trace!(index, "borrowed from previous sibling");
    }

    /// Rotate one key from the right sibling through the parent into `children[index]`.
    fn borrow_from_next(&mut self, index: usize) {
        let (left, right) = self.children.split_at_mut(index + 1);
        let child = &mut left[index];
        let sibling = &mut right[0];

        let raised = sibling.keys.remove(0);
        let lowered = std::mem::replace(&mut self.keys[index], raised);
        child.keys.push(lowered);

        if !child.leaf {
            child.children.push(sibling.children.remove(0));
        }
        tracing::trace!(index, "borrowed from next sibling");
    }

    /// Merge `children[index + 1]` and the separator `keys[index]` into `children[index]`.
    pub(crate) fn merge(&mut self, index: usize) {
        let separator = self.keys.remove(index);
        let right = self.children.remove(index + 1);
        let left = &mut self.children[index];

        left.keys.push(separator);
        left.keys.extend(right.keys);
        left.children.extend(right.children);
        tracing::trace!(index, separator, "merged children");
    }
}
