//! Fixed timestep simulation tick
//!
//! Per-step contract: advance entities, rebuild the broad-phase index from
//! the current live set, query, narrow-phase test the candidates, and only
//! then resolve releases and splits. Entities condemned during the query
//! scan go into side lists and are resolved after iteration completes, so
//! no collection is mutated while it is being walked.

use super::collision::circles_overlap;
use super::state::{EntityKind, EntityRef, ShotParams, SimEvent, World};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Turn direction in [-1, 1]
    pub turn: f32,
    /// Thrust direction in [-1, 1]
    pub thrust: f32,
    /// Fire a shot (subject to cooldown)
    pub shoot: bool,
    /// Hold the scanner on the nearest in-range asteroid
    pub scan: bool,
}

/// Advance the world by one fixed timestep, returning the step's events.
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> Vec<SimEvent> {
    let mut events = Vec::new();

    advance_player(world, input, dt);
    advance_asteroids(world, dt);
    advance_shots(world, dt, &mut events);

    if let Some(params) = world.update_field(dt) {
        world.spawn_asteroid(params);
    }

    update_scan(world, input, dt, &mut events);

    // Rebuild the index from the current live set. Queries against a
    // partially populated index are a caller error, so everything above
    // this point has already settled the step's entity membership.
    world.grid.clear();
    for (i, asteroid) in world.asteroids.iter().enumerate() {
        let key = EntityRef {
            kind: EntityKind::Asteroid,
            index: i as u32,
        };
        world.grid.insert(key, asteroid.pos, asteroid.radius);
    }
    for (i, shot) in world.shots.iter().enumerate() {
        let key = EntityRef {
            kind: EntityKind::Shot,
            index: i as u32,
        };
        world.grid.insert(key, shot.pos, shot.radius);
    }
    if world.player.alive {
        let key = EntityRef {
            kind: EntityKind::Player,
            index: 0,
        };
        world.grid.insert(key, world.player.pos, world.player.radius);
    }

    // Query phase: condemned entities go into side lists, resolved after
    // iteration. The same asteroid can land in the split list twice when
    // two shots overlap it in one step; dedup below makes that safe.
    let mut shots_to_release: Vec<usize> = Vec::new();
    let mut asteroids_to_split: Vec<usize> = Vec::new();

    for (i, shot) in world.shots.iter().enumerate() {
        let me = EntityRef {
            kind: EntityKind::Shot,
            index: i as u32,
        };
        for candidate in world.grid.query(me, shot.pos, shot.radius) {
            if candidate.kind != EntityKind::Asteroid {
                continue;
            }
            let asteroid = &world.asteroids[candidate.index as usize];
            if !asteroid.alive {
                continue;
            }
            if circles_overlap(shot.pos, shot.radius, asteroid.pos, asteroid.radius) {
                events.push(SimEvent::AsteroidShot {
                    norad_id: asteroid.norad_id(),
                });
                shots_to_release.push(i);
                asteroids_to_split.push(candidate.index as usize);
                break;
            }
        }
    }

    if world.player.alive {
        let me = EntityRef {
            kind: EntityKind::Player,
            index: 0,
        };
        for candidate in world.grid.query(me, world.player.pos, world.player.radius) {
            if candidate.kind != EntityKind::Asteroid {
                continue;
            }
            let asteroid = &world.asteroids[candidate.index as usize];
            if asteroid.alive
                && circles_overlap(
                    asteroid.pos,
                    asteroid.radius,
                    world.player.pos,
                    world.player.radius,
                )
            {
                world.player.alive = false;
                world.player.end_scan();
                log::info!("Player hit at t={:.2}s, run over", world.time);
                events.push(SimEvent::PlayerHit);
                break;
            }
        }
    }

    // Deferred resolution. Descending index order keeps pending indices
    // valid across swap_remove.
    shots_to_release.sort_unstable();
    shots_to_release.dedup();
    for &i in shots_to_release.iter().rev() {
        world.release_shot_at(i);
    }

    asteroids_to_split.sort_unstable();
    asteroids_to_split.dedup();
    for &i in asteroids_to_split.iter().rev() {
        let offspring = world.split_asteroid_at(i);
        events.push(SimEvent::AsteroidSplit { offspring });
    }

    world.time += dt;
    events
}

fn advance_player(world: &mut World, input: &TickInput, dt: f32) {
    if !world.player.alive {
        return;
    }
    world.player.rotation += input.turn * world.config.player_turn_speed * dt;
    let forward = world.player.forward();
    world.player.pos += forward * (input.thrust * world.config.player_speed * dt);

    world.player.shoot_timer -= dt;
    if input.shoot && world.player.shoot_timer <= 0.0 {
        world.player.shoot_timer = world.config.shoot_cooldown;
        let params = ShotParams {
            pos: world.player.pos,
            vel: forward * world.config.shot_speed,
            radius: world.config.shot_radius,
        };
        world.spawn_shot(params);
    }
}

fn advance_asteroids(world: &mut World, dt: f32) {
    let (cull_min, cull_max) = world.cull_bounds();
    let mut culled: Vec<usize> = Vec::new();
    for (i, asteroid) in world.asteroids.iter_mut().enumerate() {
        asteroid.pos += asteroid.vel * dt;
        let p = asteroid.pos;
        if p.x < cull_min.x || p.x > cull_max.x || p.y < cull_min.y || p.y > cull_max.y {
            culled.push(i);
        }
    }
    for &i in culled.iter().rev() {
        world.release_asteroid_at(i);
    }
}

fn advance_shots(world: &mut World, dt: f32, events: &mut Vec<SimEvent>) {
    let mut expired: Vec<usize> = Vec::new();
    for (i, shot) in world.shots.iter_mut().enumerate() {
        shot.pos += shot.vel * dt;
        shot.age += dt;
        if shot.age >= world.config.shot_lifetime {
            expired.push(i);
        }
    }
    for &i in expired.iter().rev() {
        world.release_shot_at(i);
        events.push(SimEvent::ShotExpired);
    }
}

/// Scan mechanic: holding scan on the nearest in-range asteroid accumulates
/// a timer; crossing the quick then the full threshold marks the target and
/// emits an event. Retargeting or letting go resets the timer.
fn update_scan(world: &mut World, input: &TickInput, dt: f32, events: &mut Vec<SimEvent>) {
    if !world.player.alive || !input.scan {
        world.player.end_scan();
        return;
    }

    if let Some(nearest) = world.nearest_asteroid_within(world.player.pos, world.config.scan_range)
        && world.player.scan_target != Some(nearest)
    {
        world.player.scan_target = Some(nearest);
        world.player.scan_timer = 0.0;
    }

    let Some(target_id) = world.player.scan_target else {
        return;
    };
    let Some(index) = world.asteroid_index_by_id(target_id) else {
        world.player.end_scan();
        return;
    };

    let player_pos = world.player.pos;
    if world.asteroids[index].pos.distance(player_pos) > world.config.scan_range {
        world.player.end_scan();
        return;
    }

    world.player.scan_timer += dt;
    let timer = world.player.scan_timer;
    let quick = world.config.scan_time_quick;
    let full = world.config.scan_time_full;

    let asteroid = &mut world.asteroids[index];
    if timer >= full && !asteroid.fully_scanned {
        asteroid.fully_scanned = true;
        asteroid.scanned = true;
        events.push(SimEvent::ScanFull {
            norad_id: asteroid.norad_id(),
            name: asteroid.debris.as_ref().map(|d| d.name.clone()),
        });
    } else if timer >= quick && !asteroid.scanned {
        asteroid.scanned = true;
        events.push(SimEvent::ScanQuick {
            norad_id: asteroid.norad_id(),
        });
    }
}
