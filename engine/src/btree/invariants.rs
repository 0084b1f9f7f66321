//! Structural invariant checking.
//!
//! Every mutation is followed by a full check in debug builds, and tests call
//! [`BTree::check_invariants`] directly after each step of longer operation
//! sequences.

use std::fmt;

use crate::btree::node::Node;
use crate::btree::tree::BTree;
use crate::btree::{Key, MinDegree};

/// A broken structural invariant, located by the path of child indexes
/// leading from the root to the offending node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub path: Vec<usize>,
    pub kind: ViolationKind,
}

/// The rule that was broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Non-root node holds fewer than `t - 1` keys.
    Underfull { keys: usize, min: usize },
    /// Node holds more than `2t - 1` keys.
    Overfull { keys: usize, max: usize },
    /// Keys are not strictly ascending.
    Unsorted,
    /// A key falls outside the range its ancestors' separators allow.
    OutOfRange { key: Key },
    /// Leaf flag disagrees with whether the node has children.
    LeafFlagMismatch { leaf: bool, children: usize },
    /// Internal node whose child count is not key count plus one.
    ChildCount { keys: usize, children: usize },
    /// Leaf found at a different depth from the first leaf.
    UnevenDepth { depth: usize, expected: usize },
    /// Cached length disagrees with the number of stored keys.
    LengthMismatch { cached: usize, counted: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at node {:?}: ", self.path)?;
        match &self.kind {
            ViolationKind::Underfull { keys, min } => {
                write!(f, "{keys} keys, fewer than the minimum {min}")
            }
            ViolationKind::Overfull { keys, max } => {
                write!(f, "{keys} keys, more than the maximum {max}")
            }
            ViolationKind::Unsorted => write!(f, "keys are not strictly ascending"),
            ViolationKind::OutOfRange { key } => {
                write!(f, "key {key} lies outside its separator range")
            }
            ViolationKind::LeafFlagMismatch { leaf, children } => {
                write!(f, "leaf flag is {leaf} but node has {children} children")
            }
            ViolationKind::ChildCount { keys, children } => {
                write!(f, "{keys} keys but {children} children")
            }
            ViolationKind::UnevenDepth { depth, expected } => {
                write!(f, "leaf at depth {depth}, expected {expected}")
            }
            ViolationKind::LengthMismatch { cached, counted } => {
                write!(f, "tree reports {cached} keys but holds {counted}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

struct Checker {
    t: MinDegree,
    leaf_depth: Option<usize>,
    counted: usize,
    path: Vec<usize>,
}

impl Checker {
    fn violation(&self, kind: ViolationKind) -> InvariantViolation {
        InvariantViolation {
            path: self.path.clone(),
            kind,
        }
    }

    /// Check `node` and its subtree; every key must lie in `(lower, upper)`.
    fn check(
        &mut self,
        node: &Node,
        lower: Option<Key>,
        upper: Option<Key>,
    ) -> Result<(), InvariantViolation> {
        let keys = node.keys();
        let children = node.children();
        let depth = self.path.len();

        if keys.len() > self.t.max_keys() {
            return Err(self.violation(ViolationKind::Overfull {
                keys: keys.len(),
                max: self.t.max_keys(),
            }));
        }
        if depth > 0 && keys.len() < self.t.min_keys() {
            return Err(self.violation(ViolationKind::Underfull {
                keys: keys.len(),
                min: self.t.min_keys(),
            }));
        }
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(self.violation(ViolationKind::Unsorted));
        }
        for &key in keys {
            let above = lower.is_none_or(|bound| key > bound);
            let below = upper.is_none_or(|bound| key < bound);
            if !(above && below) {
                return Err(self.violation(ViolationKind::OutOfRange { key }));
            }
        }
        if node.is_leaf() != children.is_empty() {
            return Err(self.violation(ViolationKind::LeafFlagMismatch {
                leaf: node.is_leaf(),
                children: children.len(),
            }));
        }

        self.counted += keys.len();

        if node.is_leaf() {
            match self.leaf_depth {
                None => self.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(self.violation(ViolationKind::UnevenDepth { depth, expected }));
                }
                Some(_) => {}
            }
            return Ok(());
        }

        if children.len() != keys.len() + 1 {
            return Err(self.violation(ViolationKind::ChildCount {
                keys: keys.len(),
                children: children.len(),
            }));
        }

        for (index, child) in children.iter().enumerate() {
            let child_lower = if index == 0 { lower } else { Some(keys[index - 1]) };
            let child_upper = keys.get(index).copied().or(upper);
            self.path.push(index);
            self.check(child, child_lower, child_upper)?;
            self.path.pop();
        }
        Ok(())
    }
}

impl BTree {
    /// Verify every structural invariant of the tree.
    ///
    /// # Errors
    ///
    /// Returns the first violation found in a depth-first walk.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut checker = Checker {
            t: self.min_degree(),
            leaf_depth: None,
            counted: 0,
            path: Vec::new(),
        };
        checker.check(self.root(), None, None)?;

        if checker.counted != self.len() {
            return Err(checker.violation(ViolationKind::LengthMismatch {
                cached: self.len(),
                counted: checker.counted,
            }));
        }
        Ok(())
    }
}
