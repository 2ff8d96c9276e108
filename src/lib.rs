//! Debris Field - broad-phase collision core for a churning asteroid arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pool, spatial hash, entities, tick)
//! - `config`: Runtime configuration with validation
//! - `error`: Configuration errors

pub mod config;
pub mod error;
pub mod sim;

pub use config::SimConfig;
pub use error::ConfigError;
pub use sim::pool::{ObjectPool, Poolable, SlotId};
pub use sim::spatial::SpatialHash;
pub use sim::state::{
    Asteroid, DebrisRecord, EntityKind, EntityRef, Player, Shot, SimEvent, World,
};
pub use sim::tick::{TickInput, tick};

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;
    /// Asteroids farther than this outside the arena are released
    pub const CULL_MARGIN: f32 = 256.0;

    /// Asteroid sizing - radius is MIN_RADIUS times a size class in [1, KINDS]
    pub const ASTEROID_MIN_RADIUS: f32 = 20.0;
    pub const ASTEROID_KINDS: u32 = 3;
    pub const ASTEROID_MAX_RADIUS: f32 = ASTEROID_MIN_RADIUS * ASTEROID_KINDS as f32;

    /// Edge spawner cadence and speeds
    pub const ASTEROID_SPAWN_INTERVAL: f32 = 0.8;
    pub const ASTEROID_SPAWN_SPEED_MIN: f32 = 40.0;
    pub const ASTEROID_SPAWN_SPEED_MAX: f32 = 100.0;
    /// Spawn velocity jitter, applied as a rotation in [-30, 30] degrees
    pub const ASTEROID_SPAWN_JITTER_DEG: f32 = 30.0;

    /// Split rule: offspring velocity = parent rotated ±θ, θ in degrees
    pub const SPLIT_ANGLE_MIN_DEG: f32 = 20.0;
    pub const SPLIT_ANGLE_MAX_DEG: f32 = 50.0;
    pub const SPLIT_SPEED_SCALE: f32 = 1.2;

    /// Grid cell size. The 3x3 neighborhood query is only exhaustive when
    /// cell_size >= 2 * max entity radius.
    pub const CELL_SIZE: f32 = ASTEROID_MAX_RADIUS * 2.0 + 32.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 200.0;
    /// Turn rate in radians/sec (~300 deg/sec)
    pub const PLAYER_TURN_SPEED: f32 = 5.235_988;
    pub const PLAYER_SHOOT_SPEED: f32 = 500.0;
    pub const PLAYER_SHOOT_COOLDOWN: f32 = 0.3;

    /// Shot defaults
    pub const SHOT_RADIUS: f32 = 5.0;
    pub const SHOT_LIFETIME: f32 = 2.0;

    /// Scan mechanic
    pub const SCAN_RANGE: f32 = 300.0;
    pub const SCAN_TIME_QUICK: f32 = 0.75;
    pub const SCAN_TIME_FULL: f32 = 2.5;

    /// Pool sizing
    pub const ASTEROID_POOL_INITIAL: usize = 100;
    pub const ASTEROID_POOL_MAX: usize = 500;
    pub const SHOT_POOL_INITIAL: usize = 50;
    pub const SHOT_POOL_MAX: usize = 200;
}
