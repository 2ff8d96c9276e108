//! Runtime simulation configuration
//!
//! Tunables for the arena, the broad-phase grid, the pools, and the entity
//! kinds. Loaded from a JSON file when one is supplied, with a logged
//! fallback to defaults on any read/parse/validation failure.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::{ConfigError, ConfigResult};

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Asteroids farther than this outside the arena rectangle are released
    pub cull_margin: f32,

    // === Broad phase ===
    /// Grid cell size. Queries are only exhaustive while
    /// `cell_size >= 2 * max entity radius`; `validate` warns but does not
    /// reject a smaller value.
    pub cell_size: f32,

    // === Asteroids ===
    pub asteroid_min_radius: f32,
    /// Number of size classes; spawn radius is `min_radius * k`, k in [1, kinds]
    pub asteroid_kinds: u32,
    pub spawn_interval: f32,
    pub spawn_speed_min: f32,
    pub spawn_speed_max: f32,

    // === Shots ===
    pub shot_radius: f32,
    pub shot_speed: f32,
    /// Seconds before a live shot auto-expires back to its pool
    pub shot_lifetime: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_speed: f32,
    /// Radians per second
    pub player_turn_speed: f32,
    pub shoot_cooldown: f32,
    pub scan_range: f32,
    pub scan_time_quick: f32,
    pub scan_time_full: f32,

    // === Pools ===
    /// When false, lifecycle adapters construct and drop entities directly
    pub pooling: bool,
    pub asteroid_pool_initial: usize,
    pub asteroid_pool_max: usize,
    pub shot_pool_initial: usize,
    pub shot_pool_max: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena_width: consts::ARENA_WIDTH,
            arena_height: consts::ARENA_HEIGHT,
            cull_margin: consts::CULL_MARGIN,

            cell_size: consts::CELL_SIZE,

            asteroid_min_radius: consts::ASTEROID_MIN_RADIUS,
            asteroid_kinds: consts::ASTEROID_KINDS,
            spawn_interval: consts::ASTEROID_SPAWN_INTERVAL,
            spawn_speed_min: consts::ASTEROID_SPAWN_SPEED_MIN,
            spawn_speed_max: consts::ASTEROID_SPAWN_SPEED_MAX,

            shot_radius: consts::SHOT_RADIUS,
            shot_speed: consts::PLAYER_SHOOT_SPEED,
            shot_lifetime: consts::SHOT_LIFETIME,

            player_radius: consts::PLAYER_RADIUS,
            player_speed: consts::PLAYER_SPEED,
            player_turn_speed: consts::PLAYER_TURN_SPEED,
            shoot_cooldown: consts::PLAYER_SHOOT_COOLDOWN,
            scan_range: consts::SCAN_RANGE,
            scan_time_quick: consts::SCAN_TIME_QUICK,
            scan_time_full: consts::SCAN_TIME_FULL,

            pooling: true,
            asteroid_pool_initial: consts::ASTEROID_POOL_INITIAL,
            asteroid_pool_max: consts::ASTEROID_POOL_MAX,
            shot_pool_initial: consts::SHOT_POOL_INITIAL,
            shot_pool_max: consts::SHOT_POOL_MAX,
        }
    }
}

impl SimConfig {
    /// Largest radius any spawned asteroid can have
    pub fn max_asteroid_radius(&self) -> f32 {
        self.asteroid_min_radius * self.asteroid_kinds as f32
    }

    /// Reject configurations the simulation cannot run on.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.cell_size > 0.0) || !self.cell_size.is_finite() {
            return Err(ConfigError::InvalidCellSize {
                value: self.cell_size,
            });
        }
        if !(self.asteroid_min_radius > 0.0) || self.asteroid_kinds == 0 {
            return Err(ConfigError::InvalidAsteroidSizing {
                min_radius: self.asteroid_min_radius,
                kinds: self.asteroid_kinds,
            });
        }
        if self.pooling {
            if self.asteroid_pool_max == 0 {
                return Err(ConfigError::ZeroPoolCapacity { pool: "asteroid" });
            }
            if self.asteroid_pool_initial > self.asteroid_pool_max {
                return Err(ConfigError::PoolInitialExceedsMax {
                    pool: "asteroid",
                    initial: self.asteroid_pool_initial,
                    max: self.asteroid_pool_max,
                });
            }
            if self.shot_pool_max == 0 {
                return Err(ConfigError::ZeroPoolCapacity { pool: "shot" });
            }
            if self.shot_pool_initial > self.shot_pool_max {
                return Err(ConfigError::PoolInitialExceedsMax {
                    pool: "shot",
                    initial: self.shot_pool_initial,
                    max: self.shot_pool_max,
                });
            }
        }

        if self.cell_size < 2.0 * self.max_asteroid_radius() {
            log::warn!(
                "cell_size {} is below twice the max asteroid radius {}; \
                 broad-phase queries may miss pairs",
                self.cell_size,
                self.max_asteroid_radius()
            );
        }

        Ok(())
    }

    /// Load configuration from a JSON file, falling back to defaults on any
    /// failure. The fallback is logged, never fatal.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<SimConfig>(&json) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(err) => {
                        log::warn!("Config {} rejected ({}), using defaults", path.display(), err);
                        Self::default()
                    }
                },
                Err(err) => {
                    log::warn!("Config {} unreadable ({}), using defaults", path.display(), err);
                    Self::default()
                }
            },
            Err(err) => {
                log::info!("No config at {} ({}), using defaults", path.display(), err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_cell_size() {
        let mut config = SimConfig::default();
        config.cell_size = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCellSize { .. })
        ));

        config.cell_size = -10.0;
        assert!(config.validate().is_err());

        config.cell_size = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_pool_capacity() {
        let mut config = SimConfig::default();
        config.shot_pool_max = 0;
        config.shot_pool_initial = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroPoolCapacity { pool: "shot" })
        ));
    }

    #[test]
    fn test_rejects_initial_above_max() {
        let mut config = SimConfig::default();
        config.asteroid_pool_initial = 10;
        config.asteroid_pool_max = 4;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PoolInitialExceedsMax {
                pool: "asteroid",
                initial: 10,
                max: 4,
            })
        ));
    }

    #[test]
    fn test_pool_limits_ignored_when_pooling_disabled() {
        let mut config = SimConfig::default();
        config.pooling = false;
        config.asteroid_pool_max = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = SimConfig::load(Path::new("/nonexistent/debris-field.json"));
        assert!((config.cell_size - consts::CELL_SIZE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_roundtrip_json() {
        let config = SimConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.asteroid_pool_max, config.asteroid_pool_max);
        assert!((back.cell_size - config.cell_size).abs() < f32::EPSILON);
    }
}
