//! Registry of B-trees, keyed by session id.
//!
//! Each session owns exactly one tree. Trees are created lazily on first use
//! with the configured minimum degree, replaced wholesale on reset, and dropped
//! once the session has been idle for longer than the configured TTL.
//!
//! # Thread Safety
//!
//! - The session map sits behind an `RwLock`, so lookups of existing sessions
//!   only take a read lock.
//! - Each tree sits behind its own `Mutex`. The tree itself has no internal
//!   locking, so all mutation of one session's tree is serialized here.
//!
//! # Invariants
//!
//! - Each session id maps to at most one tree
//! - All session ids are validated before use

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::btree::{BTree, MinDegree};
use crate::config::EngineConfig;
use crate::time::{SystemTimeSource, TimeSource};

/// Maximum length for a session id.
const MAX_SESSION_ID_LENGTH: usize = 128;

/// Session used when a caller does not name one.
pub const DEFAULT_SESSION_ID: &str = "default";

struct SessionEntry {
    tree: Arc<Mutex<BTree>>,
    /// Last time the session was handed out, in milliseconds since Unix epoch.
    last_access_ms: AtomicU64,
}

/// Registry of per-session trees.
pub struct SessionRegistry<T: TimeSource = SystemTimeSource> {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    min_degree: MinDegree,
    /// Idle time after which a session is evicted; `None` disables expiry.
    session_ttl_ms: Option<u64>,
    time: T,
}

impl SessionRegistry<SystemTimeSource> {
    /// Create a registry driven by the system clock.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_time_source(config, SystemTimeSource)
    }
}

impl<T: TimeSource> SessionRegistry<T> {
    /// Create a registry that reads time from `time`.
    #[must_use]
    pub fn with_time_source(config: &EngineConfig, time: T) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            min_degree: config.min_degree,
            session_ttl_ms: config.session_ttl_ms(),
            time,
        }
    }

    /// Get or create the tree for `session_id`, refreshing its last access time.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `session_id` is not a valid session id
    /// - The registry lock is poisoned
    #[allow(clippy::significant_drop_tightening)] // We need the lock held during insert
    pub fn get_or_create(&self, session_id: &str) -> Result<Arc<Mutex<BTree>>, RegistryError> {
        validate_session_id(session_id)?;
        let now = self.time.now_ms();

        // Fast path: session already exists (read lock only)
        {
            let sessions = self
                .sessions
                .read()
                .map_err(|_| RegistryError::LockPoisoned)?;
            if let Some(entry) = sessions.get(session_id) {
                entry.last_access_ms.store(now, Ordering::Relaxed);
                return Ok(Arc::clone(&entry.tree));
            }
        }

        // Slow path: create the session (write lock)
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;

        // Double-check: another thread may have created it while we waited for the write lock
        if let Some(entry) = sessions.get(session_id) {
            entry.last_access_ms.store(now, Ordering::Relaxed);
            return Ok(Arc::clone(&entry.tree));
        }

        let tree = Arc::new(Mutex::new(BTree::new(self.min_degree)));
        sessions.insert(
            session_id.to_string(),
            SessionEntry {
                tree: Arc::clone(&tree),
                last_access_ms: AtomicU64::new(now),
            },
        );

        tracing::info!(
            session_id,
            min_degree = self.min_degree.get(),
            "created session tree"
        );

        Ok(tree)
    }

    /// Run `f` against the session's tree while holding its lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the session id is invalid or a lock is poisoned.
    pub fn with_tree<R>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut BTree) -> R,
    ) -> Result<R, RegistryError> {
        let tree = self.get_or_create(session_id)?;
        let mut tree = tree.lock().map_err(|_| RegistryError::LockPoisoned)?;
        Ok(f(&mut tree))
    }

    /// Replace the session's tree with a fresh empty one.
    ///
    /// Creates the session if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the session id is invalid or a lock is poisoned.
    pub fn reset(&self, session_id: &str) -> Result<(), RegistryError> {
        let min_degree = self.min_degree;
        self.with_tree(session_id, |tree| *tree = BTree::new(min_degree))?;
        tracing::info!(session_id, "reset session tree");
        Ok(())
    }

    /// Drop a session. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry lock is poisoned.
    pub fn remove(&self, session_id: &str) -> Result<bool, RegistryError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(sessions.remove(session_id).is_some())
    }

    /// Drop every session idle for longer than the TTL. Returns how many were dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry lock is poisoned.
    pub fn evict_expired(&self) -> Result<usize, RegistryError> {
        let Some(ttl_ms) = self.session_ttl_ms else {
            return Ok(0);
        };
        let now = self.time.now_ms();

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;
        let before = sessions.len();
        sessions.retain(|session_id, entry| {
            let idle_ms = now.saturating_sub(entry.last_access_ms.load(Ordering::Relaxed));
            let keep = idle_ms <= ttl_ms;
            if !keep {
                tracing::info!(session_id = session_id.as_str(), idle_ms, "evicting idle session");
            }
            keep
        });
        Ok(before - sessions.len())
    }

    /// Number of live sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry lock is poisoned.
    pub fn len(&self) -> Result<usize, RegistryError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| RegistryError::LockPoisoned)?;
        Ok(sessions.len())
    }

    /// Whether there are no live sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, RegistryError> {
        self.len().map(|len| len == 0)
    }

    #[must_use]
    pub const fn min_degree(&self) -> MinDegree {
        self.min_degree
    }

    /// The clock this registry reads session times from.
    #[must_use]
    pub const fn time_source(&self) -> &T {
        &self.time
    }
}

/// Error returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The session id failed validation.
    InvalidSessionId(SessionIdValidationError),
    /// A registry or tree lock was poisoned by a panicking holder.
    LockPoisoned,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSessionId(e) => write!(f, "invalid session id: {e}"),
            Self::LockPoisoned => write!(f, "session registry lock poisoned"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<SessionIdValidationError> for RegistryError {
    fn from(e: SessionIdValidationError) -> Self {
        Self::InvalidSessionId(e)
    }
}

/// Error returned when validating a session id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionIdValidationError {
    /// The id is empty.
    Empty,
    /// The id exceeds the maximum length.
    TooLong,
    /// The id contains invalid characters.
    InvalidCharacters,
}

impl std::fmt::Display for SessionIdValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "session id must not be empty"),
            Self::TooLong => write!(
                f,
                "session id exceeds maximum length of {MAX_SESSION_ID_LENGTH} characters"
            ),
            Self::InvalidCharacters => write!(
                f,
                "session id contains invalid characters; only alphanumeric, hyphens, and underscores are allowed"
            ),
        }
    }
}

/// Validate that a session id is well-formed.
///
/// Valid ids:
/// - Are non-empty
/// - Are at most 128 characters
/// - Contain only alphanumeric characters, hyphens, and underscores
///
/// # Examples
///
/// ```
/// use btree_engine::session_registry::validate_session_id;
///
/// assert!(validate_session_id("default").is_ok());
/// assert!(validate_session_id("tab-42_a").is_ok());
/// assert!(validate_session_id("").is_err());
/// assert!(validate_session_id("a b").is_err());
/// ```
pub fn validate_session_id(id: &str) -> Result<(), SessionIdValidationError> {
    if id.is_empty() {
        return Err(SessionIdValidationError::Empty);
    }

    if id.len() > MAX_SESSION_ID_LENGTH {
        return Err(SessionIdValidationError::TooLong);
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(SessionIdValidationError::InvalidCharacters);
    }

    Ok(())
}
