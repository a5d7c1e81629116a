//! Collision tests
//!
//! Everything in this game is a circle, so these are all distance checks.

use glam::Vec2;

use super::entity::{Bounds, Enemy, Projectile};
use crate::consts::*;

/// Circle-circle overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Projectile touches enemy
pub fn projectile_hits_enemy(projectile: &Projectile, enemy: &Enemy) -> bool {
    circles_overlap(projectile.pos, projectile.radius, enemy.pos, enemy.radius)
}

/// Enemy reached the bow at the board center
pub fn enemy_touches_bow(enemy: &Enemy, center: Vec2) -> bool {
    enemy.pos.distance(center) < enemy.radius + BOW_RADIUS
}

/// Enemy has left the extended off-screen area and should be culled
pub fn enemy_offscreen(enemy: &Enemy, bounds: Bounds) -> bool {
    !enemy.pattern.exempt_from_offscreen() && bounds.is_outside(enemy.pos, OFFSCREEN_MARGIN)
}

/// Projectile has left the visible board
pub fn projectile_offscreen(projectile: &Projectile, bounds: Bounds) -> bool {
    bounds.is_outside(projectile.pos, projectile.radius)
}
