//! Configuration error types.
//!
//! The error surface is deliberately narrow: this crate is a
//! performance-and-correctness structure, not an I/O boundary. The only
//! fatal conditions are bad construction parameters, rejected up front so
//! the simulation never runs on a degenerate grid or pool.

use std::fmt;

/// Errors raised while validating simulation configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid cell size must be strictly positive and finite.
    InvalidCellSize {
        /// The value that was rejected.
        value: f32,
    },

    /// A pool was configured with a maximum capacity of zero.
    ZeroPoolCapacity {
        /// Which pool (for logging).
        pool: &'static str,
    },

    /// A pool's pre-created instance count exceeds its maximum capacity.
    PoolInitialExceedsMax {
        /// Which pool (for logging).
        pool: &'static str,
        /// Requested initial instance count.
        initial: usize,
        /// Configured maximum capacity.
        max: usize,
    },

    /// Asteroid sizing must allow at least one size class of positive radius.
    InvalidAsteroidSizing {
        /// Configured minimum radius.
        min_radius: f32,
        /// Configured number of size classes.
        kinds: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCellSize { value } => {
                write!(f, "grid cell size must be positive, got {}", value)
            }
            ConfigError::ZeroPoolCapacity { pool } => {
                write!(f, "{} pool max capacity must be at least 1", pool)
            }
            ConfigError::PoolInitialExceedsMax { pool, initial, max } => write!(
                f,
                "{} pool initial size {} exceeds max capacity {}",
                pool, initial, max
            ),
            ConfigError::InvalidAsteroidSizing { min_radius, kinds } => write!(
                f,
                "asteroid sizing invalid: min_radius {} with {} size classes",
                min_radius, kinds
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Convenience alias: a `Result` using `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;
