//! Entity types, world aggregate, and pooling-aware lifecycle
//!
//! The lifecycle contract: spawn is acquire → reset → re-register into the
//! world's tracking vecs; despawn is mark dead → detach → pool return.
//! Acquired instances carry stale state from their previous life, so every
//! `reset` overwrites every field.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::field::EdgeSpawner;
use super::pool::{ObjectPool, Poolable, SlotId};
use super::spatial::SpatialHash;
use crate::config::SimConfig;
use crate::consts;
use crate::error::ConfigResult;

/// Entity discriminator carried by broad-phase candidates. Queries return
/// mixed kinds; callers filter on this tag instead of probing types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Asteroid,
    Shot,
    Player,
}

/// Handle to an entity for one clear/insert cycle of the grid.
///
/// `index` points into the owning world vec and is only stable until the
/// deferred resolution phase mutates those vecs; handles must not be kept
/// across steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub index: u32,
}

/// Opaque debris-catalog payload attached to spawned asteroids and
/// propagated unchanged to split offspring. The simulation copies it,
/// never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebrisRecord {
    pub norad_id: u32,
    pub name: String,
    pub object_type: String,
    pub country: String,
    pub launch_date: String,
}

/// Events emitted by one simulation step. The core does its own lifecycle
/// bookkeeping; an embedding orchestrator does whatever scoring or session
/// tracking it wants with these.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    AsteroidShot { norad_id: Option<u32> },
    AsteroidSplit { offspring: u32 },
    ShotExpired,
    PlayerHit,
    ScanQuick { norad_id: Option<u32> },
    ScanFull { norad_id: Option<u32>, name: Option<String> },
}

/// An asteroid entity
#[derive(Debug, Clone)]
pub struct Asteroid {
    /// Per-life identity, reassigned on every reuse
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
    /// Transient scan flags, cleared by reset
    pub scanned: bool,
    pub fully_scanned: bool,
    pub debris: Option<DebrisRecord>,
    slot: Option<SlotId>,
}

/// Full construction parameters for one asteroid life
#[derive(Debug, Clone)]
pub struct AsteroidParams {
    /// Assigned by the world on spawn; spawners leave it zero
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub debris: Option<DebrisRecord>,
}

impl Asteroid {
    /// Blank instance for the pool factory. Callers reset before use.
    pub fn new() -> Self {
        Self {
            id: 0,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: consts::ASTEROID_MIN_RADIUS,
            alive: false,
            scanned: false,
            fully_scanned: false,
            debris: None,
            slot: None,
        }
    }

    pub fn norad_id(&self) -> Option<u32> {
        self.debris.as_ref().map(|d| d.norad_id)
    }
}

impl Default for Asteroid {
    fn default() -> Self {
        Self::new()
    }
}

impl Poolable for Asteroid {
    type ResetParams = AsteroidParams;

    fn reset(&mut self, params: AsteroidParams) {
        self.id = params.id;
        self.pos = params.pos;
        self.vel = params.vel;
        self.radius = params.radius;
        self.alive = true;
        self.scanned = false;
        self.fully_scanned = false;
        self.debris = params.debris;
    }

    fn slot(&self) -> Option<SlotId> {
        self.slot
    }

    fn bind_slot(&mut self, slot: SlotId) {
        self.slot = Some(slot);
    }

    fn mark_dead(&mut self) {
        self.alive = false;
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// A projectile entity
#[derive(Debug, Clone)]
pub struct Shot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
    /// Seconds since this life started; expires at the configured lifetime
    pub age: f32,
    slot: Option<SlotId>,
}

/// Full construction parameters for one shot life
#[derive(Debug, Clone, Copy)]
pub struct ShotParams {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Shot {
    /// Blank instance for the pool factory. Callers reset before use.
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: consts::SHOT_RADIUS,
            alive: false,
            age: 0.0,
            slot: None,
        }
    }
}

impl Default for Shot {
    fn default() -> Self {
        Self::new()
    }
}

impl Poolable for Shot {
    type ResetParams = ShotParams;

    fn reset(&mut self, params: ShotParams) {
        self.pos = params.pos;
        self.vel = params.vel;
        self.radius = params.radius;
        self.alive = true;
        self.age = 0.0;
    }

    fn slot(&self) -> Option<SlotId> {
        self.slot
    }

    fn bind_slot(&mut self, slot: SlotId) {
        self.slot = Some(slot);
    }

    fn mark_dead(&mut self) {
        self.alive = false;
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// The player ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Heading in radians
    pub rotation: f32,
    pub radius: f32,
    pub alive: bool,
    pub shoot_timer: f32,
    /// Seconds of continuous scan held on the current target
    pub scan_timer: f32,
    /// Asteroid id of the current scan target
    pub scan_target: Option<u32>,
}

impl Player {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            rotation: 0.0,
            radius,
            alive: true,
            shoot_timer: 0.0,
            scan_timer: 0.0,
            scan_target: None,
        }
    }

    /// Unit heading vector
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }

    pub fn end_scan(&mut self) {
        self.scan_timer = 0.0;
        self.scan_target = None;
    }
}

/// Complete simulation state: entities, pools, broad-phase grid, RNG.
///
/// All randomness flows through the seeded RNG, so a seed reproduces a run.
pub struct World {
    pub config: SimConfig,
    pub seed: u64,
    /// Simulated seconds since construction
    pub time: f32,
    pub player: Player,
    /// Live asteroids. Indices are stable within a step until deferred
    /// resolution; never hold them across steps.
    pub asteroids: Vec<Asteroid>,
    /// Live shots, same index discipline as asteroids
    pub shots: Vec<Shot>,
    pub grid: SpatialHash<EntityRef>,
    pub spawner: EdgeSpawner,
    asteroid_pool: Option<ObjectPool<Asteroid>>,
    shot_pool: Option<ObjectPool<Shot>>,
    rng: Pcg32,
    catalog: Vec<DebrisRecord>,
    next_asteroid_id: u32,
}

impl World {
    /// Build a world from a validated config, a run seed, and an optional
    /// debris catalog for the spawner to draw records from.
    pub fn new(config: SimConfig, seed: u64, catalog: Vec<DebrisRecord>) -> ConfigResult<Self> {
        config.validate()?;
        let grid = SpatialHash::new(config.cell_size)?;

        let (asteroid_pool, shot_pool) = if config.pooling {
            (
                Some(ObjectPool::new(
                    config.asteroid_pool_initial,
                    config.asteroid_pool_max,
                    Box::new(Asteroid::new),
                )?),
                Some(ObjectPool::new(
                    config.shot_pool_initial,
                    config.shot_pool_max,
                    Box::new(Shot::new),
                )?),
            )
        } else {
            (None, None)
        };

        let player = Player::new(
            Vec2::new(config.arena_width / 2.0, config.arena_height / 2.0),
            config.player_radius,
        );

        log::info!(
            "World created: seed={} arena={}x{} cell_size={} catalog={} records",
            seed,
            config.arena_width,
            config.arena_height,
            config.cell_size,
            catalog.len()
        );

        Ok(Self {
            config,
            seed,
            time: 0.0,
            player,
            asteroids: Vec::new(),
            shots: Vec::new(),
            grid,
            spawner: EdgeSpawner::new(),
            asteroid_pool,
            shot_pool,
            rng: Pcg32::seed_from_u64(seed),
            catalog,
            next_asteroid_id: 1,
        })
    }

    fn alloc_asteroid_id(&mut self) -> u32 {
        let id = self.next_asteroid_id;
        self.next_asteroid_id += 1;
        id
    }

    /// Spawn an asteroid through the pool path when one is configured:
    /// acquire, full reset, re-register into the live vec. Without a pool,
    /// plain construction. Returns the new life's id.
    pub fn spawn_asteroid(&mut self, mut params: AsteroidParams) -> u32 {
        params.id = self.alloc_asteroid_id();
        let id = params.id;

        let mut asteroid = match &mut self.asteroid_pool {
            Some(pool) => pool.acquire(),
            None => Asteroid::new(),
        };
        asteroid.reset(params);
        self.asteroids.push(asteroid);
        id
    }

    /// Spawn a shot; same acquire → reset → re-register path as asteroids.
    pub fn spawn_shot(&mut self, params: ShotParams) {
        let mut shot = match &mut self.shot_pool {
            Some(pool) => pool.acquire(),
            None => Shot::new(),
        };
        shot.reset(params);
        self.shots.push(shot);
    }

    /// Despawn an asteroid: mark dead, detach from the live vec, return to
    /// the pool. Transient overflow instances are simply dropped.
    pub(crate) fn release_asteroid_at(&mut self, index: usize) {
        let mut asteroid = self.asteroids.swap_remove(index);
        asteroid.mark_dead();
        if let Some(pool) = &mut self.asteroid_pool {
            pool.release(asteroid);
        }
    }

    /// Despawn a shot, same path as asteroids.
    pub(crate) fn release_shot_at(&mut self, index: usize) {
        let mut shot = self.shots.swap_remove(index);
        shot.mark_dead();
        if let Some(pool) = &mut self.shot_pool {
            pool.release(shot);
        }
    }

    /// Split an asteroid destroyed by collision. Returns the offspring
    /// count (0 at or below the minimum radius, otherwise 2).
    ///
    /// The parent's position, velocity, and metadata are captured before it
    /// is released: release may hand the same instance straight back to the
    /// offspring acquire.
    pub(crate) fn split_asteroid_at(&mut self, index: usize) -> u32 {
        let mut parent = self.asteroids.swap_remove(index);
        parent.mark_dead();

        let pos = parent.pos;
        let vel = parent.vel;
        let radius = parent.radius;
        let debris = parent.debris.clone();

        if let Some(pool) = &mut self.asteroid_pool {
            pool.release(parent);
        }

        if radius <= self.config.asteroid_min_radius {
            return 0;
        }

        let new_radius = radius - self.config.asteroid_min_radius;
        let theta = self
            .rng
            .random_range(consts::SPLIT_ANGLE_MIN_DEG..=consts::SPLIT_ANGLE_MAX_DEG)
            .to_radians();

        for sign in [1.0f32, -1.0] {
            let child_vel = Vec2::from_angle(sign * theta).rotate(vel) * consts::SPLIT_SPEED_SCALE;
            self.spawn_asteroid(AsteroidParams {
                id: 0,
                pos,
                vel: child_vel,
                radius: new_radius,
                debris: debris.clone(),
            });
        }
        2
    }

    /// Advance the edge spawner; returns spawn parameters when its timer
    /// elapses.
    pub(crate) fn update_field(&mut self, dt: f32) -> Option<AsteroidParams> {
        self.spawner
            .update(dt, &self.config, &self.catalog, &mut self.rng)
    }

    /// Nearest live asteroid within `range` of a point, by id. Linear scan;
    /// scan targeting happens once per step.
    pub fn nearest_asteroid_within(&self, point: Vec2, range: f32) -> Option<u32> {
        let mut best: Option<(f32, u32)> = None;
        for asteroid in &self.asteroids {
            if !asteroid.alive {
                continue;
            }
            let d = asteroid.pos.distance_squared(point);
            if d <= range * range && best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, asteroid.id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Current vec index of an asteroid id, if it is still alive.
    pub fn asteroid_index_by_id(&self, id: u32) -> Option<usize> {
        self.asteroids.iter().position(|a| a.id == id && a.alive)
    }

    /// Arena rectangle expanded by the cull margin. Asteroids outside it
    /// are released.
    pub(crate) fn cull_bounds(&self) -> (Vec2, Vec2) {
        (
            Vec2::splat(-self.config.cull_margin),
            Vec2::new(
                self.config.arena_width + self.config.cull_margin,
                self.config.arena_height + self.config.cull_margin,
            ),
        )
    }

    /// (available, active, total) for the asteroid pool, if pooling is on.
    pub fn asteroid_pool_stats(&self) -> Option<(usize, usize, usize)> {
        self.asteroid_pool
            .as_ref()
            .map(|p| (p.available(), p.active(), p.total()))
    }

    /// (available, active, total) for the shot pool, if pooling is on.
    pub fn shot_pool_stats(&self) -> Option<(usize, usize, usize)> {
        self.shot_pool
            .as_ref()
            .map(|p| (p.available(), p.active(), p.total()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.asteroid_pool_initial = 4;
        config.asteroid_pool_max = 16;
        config.shot_pool_initial = 2;
        config.shot_pool_max = 8;
        config
    }

    fn record() -> DebrisRecord {
        DebrisRecord {
            norad_id: 25544,
            name: "COSMOS 2251 DEB".into(),
            object_type: "DEBRIS".into(),
            country: "CIS".into(),
            launch_date: "1993-06-16".into(),
        }
    }

    #[test]
    fn test_split_conservation() {
        let mut world = World::new(small_config(), 7, Vec::new()).unwrap();
        world.spawn_asteroid(AsteroidParams {
            id: 0,
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::new(100.0, 0.0),
            radius: 60.0,
            debris: Some(record()),
        });

        let offspring = world.split_asteroid_at(0);
        assert_eq!(offspring, 2);
        assert_eq!(world.asteroids.len(), 2);

        for child in &world.asteroids {
            assert!((child.radius - 40.0).abs() < 1e-4);
            assert_eq!(child.pos, Vec2::new(400.0, 300.0));
            // Parent speed 100, scaled 1.2x
            assert!((child.vel.length() - 120.0).abs() < 1e-2);
            // Rotation angle within [20, 50] degrees off the parent heading
            let angle = child.vel.y.atan2(child.vel.x).to_degrees().abs();
            assert!((20.0..=50.0).contains(&angle), "angle {} out of range", angle);
            assert_eq!(child.debris, Some(record()));
        }

        // Offspring rotate in opposite directions
        let s0 = world.asteroids[0].vel.y.signum();
        let s1 = world.asteroids[1].vel.y.signum();
        assert!(s0 * s1 < 0.0);
    }

    #[test]
    fn test_split_below_minimum_yields_nothing() {
        let mut world = World::new(small_config(), 7, Vec::new()).unwrap();
        world.spawn_asteroid(AsteroidParams {
            id: 0,
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::new(50.0, 0.0),
            radius: 20.0,
            debris: None,
        });

        assert_eq!(world.split_asteroid_at(0), 0);
        assert!(world.asteroids.is_empty());
        // Parent went back to the pool
        let (available, active, total) = world.asteroid_pool_stats().unwrap();
        assert_eq!(active, 0);
        assert_eq!(available, total);
    }

    #[test]
    fn test_reset_clears_stale_state_on_reuse() {
        let mut world = World::new(small_config(), 3, Vec::new()).unwrap();
        world.spawn_asteroid(AsteroidParams {
            id: 0,
            pos: Vec2::new(50.0, 50.0),
            vel: Vec2::new(10.0, 0.0),
            radius: 40.0,
            debris: Some(record()),
        });
        world.asteroids[0].scanned = true;
        world.asteroids[0].fully_scanned = true;
        let first_id = world.asteroids[0].id;

        world.release_asteroid_at(0);

        // The recycled instance must come back fully overwritten
        let second_id = world.spawn_asteroid(AsteroidParams {
            id: 0,
            pos: Vec2::new(70.0, 70.0),
            vel: Vec2::ZERO,
            radius: 20.0,
            debris: None,
        });
        let reused = &world.asteroids[0];
        assert_ne!(second_id, first_id);
        assert_eq!(reused.id, second_id);
        assert!(reused.alive);
        assert!(!reused.scanned);
        assert!(!reused.fully_scanned);
        assert_eq!(reused.vel, Vec2::ZERO);
        assert_eq!(reused.debris, None);
    }

    #[test]
    fn test_pooling_disabled_still_spawns() {
        let mut config = small_config();
        config.pooling = false;
        let mut world = World::new(config, 1, Vec::new()).unwrap();
        assert!(world.asteroid_pool_stats().is_none());

        world.spawn_asteroid(AsteroidParams {
            id: 0,
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::ZERO,
            radius: 20.0,
            debris: None,
        });
        world.spawn_shot(ShotParams {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::new(500.0, 0.0),
            radius: 5.0,
        });
        assert_eq!(world.asteroids.len(), 1);
        assert_eq!(world.shots.len(), 1);

        world.release_shot_at(0);
        world.release_asteroid_at(0);
        assert!(world.asteroids.is_empty());
        assert!(world.shots.is_empty());
    }

    #[test]
    fn test_nearest_asteroid_selection() {
        let mut world = World::new(small_config(), 9, Vec::new()).unwrap();
        let far = world.spawn_asteroid(AsteroidParams {
            id: 0,
            pos: Vec2::new(250.0, 0.0),
            vel: Vec2::ZERO,
            radius: 20.0,
            debris: None,
        });
        let near = world.spawn_asteroid(AsteroidParams {
            id: 0,
            pos: Vec2::new(100.0, 0.0),
            vel: Vec2::ZERO,
            radius: 20.0,
            debris: None,
        });

        assert_eq!(
            world.nearest_asteroid_within(Vec2::ZERO, 300.0),
            Some(near)
        );
        assert_eq!(world.nearest_asteroid_within(Vec2::ZERO, 150.0), Some(near));
        assert_eq!(world.nearest_asteroid_within(Vec2::ZERO, 50.0), None);
        assert_ne!(near, far);
    }

    #[test]
    fn test_world_rejects_bad_config() {
        let mut config = SimConfig::default();
        config.cell_size = -1.0;
        assert!(World::new(config, 0, Vec::new()).is_err());
    }
}
