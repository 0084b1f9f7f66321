//! In-order iteration over a B-tree.

use std::iter::FusedIterator;

use crate::btree::Key;
use crate::btree::node::Node;

/// Borrowing in-order iterator over the keys of a [`BTree`](crate::btree::BTree).
///
/// Holds an explicit stack of `(node, next key index)` frames instead of
/// recursing, so it can be paused and resumed between calls to `next`.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    stack: Vec<(&'a Node, usize)>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(root: &'a Node, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.descend_leftmost(root);
        iter
    }

    /// Push `node` and every leftmost descendant.
    fn descend_leftmost(&mut self, mut node: &'a Node) {
        loop {
            self.stack.push((node, 0));
            match node.child(0) {
                Some(child) => node = child,
                None => break,
            }
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        loop {
            let (node, index) = self.stack.pop()?;
            if let Some(&key) = node.keys().get(index) {
                self.stack.push((node, index + 1));
                // Keys of the subtree between this key and the next come next.
                if let Some(child) = node.child(index + 1) {
                    self.descend_leftmost(child);
                }
                self.remaining = self.remaining.saturating_sub(1);
                return Some(key);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
