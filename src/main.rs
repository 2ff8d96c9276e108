//! Headless demo entry point
//!
//! Runs a fixed-step simulation for a few simulated minutes with a scripted
//! autopilot, logging pool and grid diagnostics once per simulated second.
//! Useful for profiling the broad phase and watching pool behavior under
//! churn without any rendering attached.

use std::path::Path;

use debris_field::SimConfig;
use debris_field::consts::SIM_DT;
use debris_field::sim::{DebrisRecord, SimEvent, TickInput, World, tick};

/// Tally of events over a whole run
#[derive(Debug, Default)]
struct RunStats {
    asteroids_shot: u32,
    splits: u32,
    shots_expired: u32,
    quick_scans: u32,
    full_scans: u32,
    player_hits: u32,
}

impl RunStats {
    fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::AsteroidShot { .. } => self.asteroids_shot += 1,
            SimEvent::AsteroidSplit { .. } => self.splits += 1,
            SimEvent::ShotExpired => self.shots_expired += 1,
            SimEvent::ScanQuick { .. } => self.quick_scans += 1,
            SimEvent::ScanFull { .. } => self.full_scans += 1,
            SimEvent::PlayerHit => self.player_hits += 1,
        }
    }
}

/// Scripted input: sweep the turret, thrust in bursts, keep firing and
/// scanning. Enough activity to exercise every lifecycle path.
fn autopilot(time: f32) -> TickInput {
    TickInput {
        turn: (time * 0.4).sin().signum() * 0.6,
        thrust: if (time % 7.0) < 2.0 { 1.0 } else { 0.0 },
        shoot: true,
        scan: true,
    }
}

/// Stand-in tracking catalog so spawned asteroids carry records without a
/// network fetch.
fn builtin_catalog() -> Vec<DebrisRecord> {
    let raw = [
        (33442u32, "FENGYUN 1C DEB", "DEBRIS", "PRC", "1999-05-10"),
        (25544, "ISS (ZARYA)", "PAYLOAD", "ISS", "1998-11-20"),
        (20580, "HST", "PAYLOAD", "US", "1990-04-24"),
        (36516, "COSMOS 2251 DEB", "DEBRIS", "CIS", "1993-06-16"),
        (43013, "NOAA 20", "PAYLOAD", "US", "2017-11-18"),
        (27386, "ENVISAT", "PAYLOAD", "ESA", "2002-03-01"),
    ];
    raw.iter()
        .map(|&(norad_id, name, object_type, country, launch_date)| DebrisRecord {
            norad_id,
            name: name.into(),
            object_type: object_type.into(),
            country: country.into(),
            launch_date: launch_date.into(),
        })
        .collect()
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1234);
    let duration: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);

    let config = SimConfig::load(Path::new("debris-field.json"));
    log::info!(
        "Debris field starting: seed {seed}, {duration}s simulated, cell size {}",
        config.cell_size
    );

    let mut world = match World::new(config, seed, builtin_catalog()) {
        Ok(world) => world,
        Err(err) => {
            log::error!("Cannot start simulation: {err}");
            std::process::exit(1);
        }
    };

    let steps = (duration / SIM_DT).ceil() as u64;
    let steps_per_second = (1.0 / SIM_DT).round() as u64;
    let mut stats = RunStats::default();

    for step in 0..steps {
        let input = autopilot(world.time);
        let events = tick(&mut world, &input, SIM_DT);

        for event in &events {
            stats.record(event);
            match event {
                SimEvent::ScanFull { norad_id, name } => {
                    log::info!(
                        "Full scan: {} ({})",
                        name.as_deref().unwrap_or("unknown object"),
                        norad_id.map_or_else(|| "untracked".into(), |id| id.to_string())
                    );
                }
                SimEvent::PlayerHit => log::warn!("Player hit at t={:.2}s", world.time),
                _ => {}
            }
        }

        if step % steps_per_second == 0 {
            log_diagnostics(&world);
        }

        if !world.player.alive {
            log::info!("Run ended early at t={:.2}s", world.time);
            break;
        }
    }

    log::info!(
        "Run complete at t={:.1}s: {} asteroids and {} shots live",
        world.time,
        world.asteroids.len(),
        world.shots.len()
    );
    log::info!(
        "Events: {} hit, {} split, {} shots expired, {} quick scans, {} full scans, {} player hits",
        stats.asteroids_shot,
        stats.splits,
        stats.shots_expired,
        stats.quick_scans,
        stats.full_scans,
        stats.player_hits
    );
}

fn log_diagnostics(world: &World) {
    log::debug!(
        "t={:.0}s asteroids={} shots={} grid: {} entities in {} cells",
        world.time,
        world.asteroids.len(),
        world.shots.len(),
        world.grid.entity_count(),
        world.grid.cell_count()
    );
    if let Some((available, active, total)) = world.asteroid_pool_stats() {
        log::debug!("asteroid pool: {available} available, {active} active, {total} created");
    }
    if let Some((available, active, total)) = world.shot_pool_stats() {
        log::debug!("shot pool: {available} available, {active} active, {total} created");
    }
}
