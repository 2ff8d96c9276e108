//! Deterministic simulation module
//!
//! All simulation logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Broad-phase index rebuilt from the live set every step
//! - No rendering or platform dependencies

pub mod collision;
pub mod field;
pub mod pool;
pub mod spatial;
pub mod state;
pub mod tick;

pub use collision::circles_overlap;
pub use field::EdgeSpawner;
pub use pool::{ObjectPool, Poolable, SlotId};
pub use spatial::SpatialHash;
pub use state::{
    Asteroid, AsteroidParams, DebrisRecord, EntityKind, EntityRef, Player, Shot, ShotParams,
    SimEvent, World,
};
pub use tick::{TickInput, tick};
