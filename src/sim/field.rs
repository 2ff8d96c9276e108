//! Edge spawner for the asteroid field
//!
//! Every `spawn_interval` seconds picks one of the four arena edges, a
//! speed, a jittered inward velocity, and a size class, then hands the
//! spawn parameters back to the world, which runs them through the pool
//! path.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{AsteroidParams, DebrisRecord};
use crate::config::SimConfig;
use crate::consts;

/// Timer-driven spawner placing asteroids just outside the arena edges,
/// drifting inward.
#[derive(Debug, Clone, Default)]
pub struct EdgeSpawner {
    timer: f32,
}

impl EdgeSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the spawn timer; when the interval elapses, produce spawn
    /// parameters for one asteroid. Attaches a random catalog record when a
    /// catalog is available.
    pub fn update(
        &mut self,
        dt: f32,
        config: &SimConfig,
        catalog: &[DebrisRecord],
        rng: &mut Pcg32,
    ) -> Option<AsteroidParams> {
        self.timer += dt;
        if self.timer <= config.spawn_interval {
            return None;
        }
        self.timer = 0.0;

        let max_radius = config.max_asteroid_radius();
        let speed = rng.random_range(config.spawn_speed_min..=config.spawn_speed_max);
        let along = rng.random_range(0.0..1.0f32);

        // Each edge: inward direction, spawn point just outside the arena
        let (inward, pos) = match rng.random_range(0..4u32) {
            0 => (
                Vec2::X,
                Vec2::new(-max_radius, along * config.arena_height),
            ),
            1 => (
                Vec2::NEG_X,
                Vec2::new(config.arena_width + max_radius, along * config.arena_height),
            ),
            2 => (
                Vec2::Y,
                Vec2::new(along * config.arena_width, -max_radius),
            ),
            _ => (
                Vec2::NEG_Y,
                Vec2::new(along * config.arena_width, config.arena_height + max_radius),
            ),
        };

        let jitter = rng
            .random_range(-consts::ASTEROID_SPAWN_JITTER_DEG..=consts::ASTEROID_SPAWN_JITTER_DEG)
            .to_radians();
        let vel = Vec2::from_angle(jitter).rotate(inward * speed);

        let kind = rng.random_range(1..=config.asteroid_kinds);

        let debris = if catalog.is_empty() {
            None
        } else {
            Some(catalog[rng.random_range(0..catalog.len())].clone())
        };

        Some(AsteroidParams {
            id: 0,
            pos,
            vel,
            radius: config.asteroid_min_radius * kind as f32,
            debris,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn catalog() -> Vec<DebrisRecord> {
        vec![DebrisRecord {
            norad_id: 33442,
            name: "FENGYUN 1C DEB".into(),
            object_type: "DEBRIS".into(),
            country: "PRC".into(),
            launch_date: "1999-05-10".into(),
        }]
    }

    #[test]
    fn test_spawner_respects_interval() {
        let config = SimConfig::default();
        let mut spawner = EdgeSpawner::new();
        let mut rng = rng();

        // Default interval is 0.8s; half of it must not spawn
        assert!(spawner.update(0.4, &config, &[], &mut rng).is_none());
        assert!(spawner.update(0.5, &config, &[], &mut rng).is_some());
        // Timer resets after a spawn
        assert!(spawner.update(0.4, &config, &[], &mut rng).is_none());
    }

    #[test]
    fn test_spawn_radius_is_a_size_class() {
        let config = SimConfig::default();
        let mut spawner = EdgeSpawner::new();
        let mut rng = rng();

        for _ in 0..50 {
            let params = spawner.update(1.0, &config, &[], &mut rng).unwrap();
            let class = params.radius / config.asteroid_min_radius;
            assert!((class - class.round()).abs() < 1e-4);
            assert!(class >= 1.0 && class <= config.asteroid_kinds as f32);
        }
    }

    #[test]
    fn test_spawn_outside_arena_drifting_inward() {
        let config = SimConfig::default();
        let mut spawner = EdgeSpawner::new();
        let mut rng = rng();

        for _ in 0..50 {
            let params = spawner.update(1.0, &config, &[], &mut rng).unwrap();
            let outside = params.pos.x < 0.0
                || params.pos.x > config.arena_width
                || params.pos.y < 0.0
                || params.pos.y > config.arena_height;
            assert!(outside, "spawned inside arena at {:?}", params.pos);

            // Jitter is capped at 30 degrees, so velocity keeps a positive
            // component along the inward edge normal
            let speed = params.vel.length();
            assert!(speed >= config.spawn_speed_min - 1e-3);
            assert!(speed <= config.spawn_speed_max + 1e-3);

            let center = Vec2::new(config.arena_width / 2.0, config.arena_height / 2.0);
            assert!(params.vel.dot(center - params.pos) > 0.0);
        }
    }

    #[test]
    fn test_catalog_record_attached() {
        let config = SimConfig::default();
        let mut spawner = EdgeSpawner::new();
        let mut rng = rng();
        let catalog = catalog();

        let params = spawner.update(1.0, &config, &catalog, &mut rng).unwrap();
        assert_eq!(params.debris.unwrap().norad_id, 33442);

        let bare = spawner.update(1.0, &config, &[], &mut rng).unwrap();
        assert!(bare.debris.is_none());
    }
}
