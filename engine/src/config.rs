//! Engine configuration module.
//!
//! Configuration is loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `BTREE_MIN_DEGREE`: Minimum degree `t` for every session tree (default: `3`, must be >= 2)
//! - `BTREE_SESSION_TTL_SECS`: Idle time after which a session is dropped (default: `1800`, `0` disables expiry)

use crate::btree::MinDegree;

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Minimum degree used when a session's tree is created or reset.
    pub min_degree: MinDegree,
    /// Idle time in seconds before a session expires. Zero means never.
    pub session_ttl_secs: u64,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_degree: MinDegree::DEFAULT,
            session_ttl_secs: Self::DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl EngineConfig {
    /// Default idle time before a session expires.
    pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `BTREE_MIN_DEGREE` is set but not an integer >= 2
    /// - `BTREE_SESSION_TTL_SECS` is set but not a non-negative integer
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Used by `from_env` and by tests, which must not mutate the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let min_degree = Self::load_min_degree(lookup("BTREE_MIN_DEGREE"))?;
        let session_ttl_secs = Self::load_session_ttl(lookup("BTREE_SESSION_TTL_SECS"))?;

        Ok(Self {
            min_degree,
            session_ttl_secs,
        })
    }

    /// Session TTL in milliseconds, or `None` when expiry is disabled.
    #[must_use]
    pub const fn session_ttl_ms(&self) -> Option<u64> {
        if self.session_ttl_secs == 0 {
            None
        } else {
            Some(self.session_ttl_secs.saturating_mul(1000))
        }
    }

    fn load_min_degree(value: Option<String>) -> Result<MinDegree, ConfigError> {
        let Some(value) = value else {
            return Ok(MinDegree::DEFAULT);
        };

        let invalid = || ConfigError::InvalidValue {
            name: "BTREE_MIN_DEGREE".to_string(),
            message: format!("'{value}' is not an integer >= 2"),
        };
        let t = value.trim().parse::<usize>().map_err(|_| invalid())?;
        MinDegree::new(t).map_err(|_| invalid())
    }

    fn load_session_ttl(value: Option<String>) -> Result<u64, ConfigError> {
        match value {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "BTREE_SESSION_TTL_SECS".to_string(),
                    message: format!("'{value}' is not a number of seconds"),
                }),
            None => Ok(Self::DEFAULT_SESSION_TTL_SECS),
        }
    }
}
