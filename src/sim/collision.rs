//! Circle-circle narrow phase
//!
//! Broad-phase queries return candidates that are merely near; this exact
//! test is the only geometry the simulation needs.

use glam::Vec2;

/// True when two circles overlap or touch. Uses squared distances, no sqrt.
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) <= reach * reach
}
