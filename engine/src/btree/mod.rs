//! In-memory B-tree of integer keys.
//!
//! This is a classic minimum-degree B-tree: every node except the root holds
//! between `t - 1` and `2t - 1` keys, and all leaves sit at the same depth.
//!
//! # Structure
//!
//! - Insertion descends top-down and splits any full node *before* entering
//!   it, so a single pass suffices and the tree only grows at the root.
//! - Deletion descends top-down and tops up any minimal child *before*
//!   entering it (borrowing from a sibling or merging with one), so removal
//!   never has to walk back up.
//!
//! # Usage
//!
//! ```
//! use btree_engine::btree::{BTree, MinDegree};
//!
//! let mut tree = BTree::new(MinDegree::DEFAULT);
//! for key in [30, 10, 20] {
//!     tree.insert(key).unwrap();
//! }
//!
//! assert!(tree.search(20));
//! assert_eq!(tree.traverse(), vec![10, 20, 30]);
//!
//! assert!(tree.delete(20));
//! assert!(!tree.search(20));
//! ```

mod invariants;
mod iter;
mod node;
mod tree;

pub use invariants::{InvariantViolation, ViolationKind};
pub use iter::Iter;
pub use node::{Node, NodeSnapshot};
pub use tree::BTree;

/// Key type stored in the tree.
pub type Key = i64;

/// Minimum degree `t` of a B-tree.
///
/// Always at least 2, which keeps every non-root node holding at least one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinDegree(usize);

impl MinDegree {
    /// Smallest legal minimum degree (a 2-3-4 tree).
    pub const MIN: Self = Self(2);

    /// Degree used for session trees unless configured otherwise.
    pub const DEFAULT: Self = Self(3);

    /// Validate a minimum degree.
    pub const fn new(t: usize) -> Result<Self, BTreeError> {
        if t < Self::MIN.0 {
            return Err(BTreeError::InvalidMinDegree(t));
        }
        Ok(Self(t))
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Fewest keys a non-root node may hold (`t - 1`).
    #[must_use]
    pub const fn min_keys(self) -> usize {
        self.0 - 1
    }

    /// Most keys any node may hold (`2t - 1`).
    #[must_use]
    pub const fn max_keys(self) -> usize {
        2 * self.0 - 1
    }
}

impl Default for MinDegree {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for MinDegree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors reported by B-tree operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BTreeError {
    /// The key is already stored in the tree.
    DuplicateKey(Key),
    /// The requested minimum degree is below 2.
    InvalidMinDegree(usize),
}

impl std::fmt::Display for BTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(key) => write!(f, "key {key} already exists"),
            Self::InvalidMinDegree(t) => {
                write!(f, "minimum degree must be at least 2, got {t}")
            }
        }
    }
}

impl std::error::Error for BTreeError {}
