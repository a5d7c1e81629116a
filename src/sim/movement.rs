//! Enemy movement patterns
//!
//! One match arm per `MovementPattern`. Every pattern keeps the enemy at its
//! cruise speed; renormalization is skipped for zero-length vectors.

use glam::Vec2;
use rand::Rng;

use super::entity::{Bounds, Enemy, MovementPattern, SpawnOverrides, spawn_enemy};
use crate::consts::*;
use crate::with_speed;

/// A teleporting enemy jumped to a new edge position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relocation {
    pub from: Vec2,
    pub to: Vec2,
}

/// Advance `enemy` by one frame of its movement pattern
pub fn advance<R: Rng>(enemy: &mut Enemy, bounds: Bounds, rng: &mut R) -> Option<Relocation> {
    let center = bounds.center();
    let mut relocation = None;

    match enemy.pattern {
        MovementPattern::Straight | MovementPattern::Split => {
            enemy.pos += enemy.vel;
        }
        MovementPattern::Zigzag => {
            enemy.zigzag_timer += 1;
            if enemy.zigzag_timer >= ZIGZAG_PERIOD {
                enemy.zigzag_timer = 0;
                if let Some(heading) = with_speed(center - enemy.pos, 1.0) {
                    let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                    let kick = heading.perp() * side * ZIGZAG_KICK;
                    if let Some(vel) = with_speed(heading + kick, enemy.speed) {
                        enemy.vel = vel;
                    }
                }
            }
            enemy.pos += enemy.vel;
        }
        MovementPattern::Chase => {
            if let Some(desired) = with_speed(center - enemy.pos, enemy.speed) {
                enemy.vel += (desired - enemy.vel) * CHASE_EASE;
                enemy.vel = enemy.vel.clamp_length_max(enemy.speed);
            }
            enemy.pos += enemy.vel;
        }
        MovementPattern::Teleport => {
            enemy.pos += enemy.vel;
            enemy.teleport_timer = enemy.teleport_timer.saturating_sub(1);
            if enemy.teleport_timer == 0 {
                relocation = Some(teleport(enemy, bounds, rng));
            }
        }
        MovementPattern::Bounce => {
            enemy.pos += enemy.vel;
            bounce(enemy, bounds);
        }
        MovementPattern::Spiral => {
            if let Some(inward) = with_speed(center - enemy.pos, 1.0) {
                let swirl = inward.perp() + inward * SPIRAL_PULL;
                if let Some(vel) = with_speed(swirl, enemy.speed) {
                    enemy.vel = vel;
                }
            }
            enemy.pos += enemy.vel;
        }
    }

    animate(enemy);
    relocation
}

/// Reflect off the board edges. Only the component pointing out of the
/// board is flipped, so enemies still entering from the margin pass through.
pub fn bounce(enemy: &mut Enemy, bounds: Bounds) {
    let r = enemy.radius;
    if (enemy.pos.x - r <= 0.0 && enemy.vel.x < 0.0)
        || (enemy.pos.x + r >= bounds.width && enemy.vel.x > 0.0)
    {
        enemy.vel.x = -enemy.vel.x;
    }
    if (enemy.pos.y - r <= 0.0 && enemy.vel.y < 0.0)
        || (enemy.pos.y + r >= bounds.height && enemy.vel.y > 0.0)
    {
        enemy.vel.y = -enemy.vel.y;
    }
}

/// Jump to a fresh edge spawn using the regular factory, keeping health
fn teleport<R: Rng>(enemy: &mut Enemy, bounds: Bounds, rng: &mut R) -> Relocation {
    let from = enemy.pos;
    let fresh = spawn_enemy(
        enemy.kind,
        bounds,
        rng,
        enemy.id,
        SpawnOverrides {
            position: None,
            speed_scale: enemy.speed_scale(),
        },
    );
    enemy.pos = fresh.pos;
    enemy.vel = with_speed(fresh.vel, enemy.speed).unwrap_or(fresh.vel);
    enemy.teleport_timer = fresh.teleport_timer;
    Relocation { from, to: enemy.pos }
}

/// Facing, pulse and hit-flash animation
fn animate(enemy: &mut Enemy) {
    if enemy.vel.length_squared() > 0.0 {
        enemy.angle = enemy.vel.y.atan2(enemy.vel.x);
    }
    enemy.pulse += 0.05 * enemy.pulse_dir;
    if enemy.pulse >= 1.0 {
        enemy.pulse = 1.0;
        enemy.pulse_dir = -1.0;
    } else if enemy.pulse <= 0.0 {
        enemy.pulse = 0.0;
        enemy.pulse_dir = 1.0;
    }
    enemy.hit_flash = enemy.hit_flash.saturating_sub(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EnemyKind, EntityId};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy_at(kind: EnemyKind, pos: Vec2, rng: &mut Pcg32) -> Enemy {
        spawn_enemy(
            kind,
            Bounds::default(),
            rng,
            EntityId(1),
            SpawnOverrides {
                position: Some(pos),
                speed_scale: 1.0,
            },
        )
    }

    #[test]
    fn test_straight_is_linear() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = enemy_at(EnemyKind::Grunt, Vec2::new(0.0, 300.0), &mut rng);
        let vel = e.vel;
        let start = e.pos;
        for _ in 0..10 {
            advance(&mut e, Bounds::default(), &mut rng);
        }
        assert_eq!(e.vel, vel);
        assert!((e.pos - (start + vel * 10.0)).length() < 1e-3);
    }

    #[test]
    fn test_zigzag_keeps_speed() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut e = enemy_at(EnemyKind::Zigzag, Vec2::new(0.0, 0.0), &mut rng);
        let initial = e.vel;
        for _ in 0..ZIGZAG_PERIOD {
            advance(&mut e, Bounds::default(), &mut rng);
        }
        assert_ne!(e.vel, initial);
        assert!((e.vel.length() - e.speed).abs() < 1e-3);
    }

    #[test]
    fn test_chase_never_exceeds_speed() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut e = enemy_at(EnemyKind::Hunter, Vec2::new(50.0, 50.0), &mut rng);
        e.vel = Vec2::new(-e.speed, 0.0);
        for _ in 0..200 {
            advance(&mut e, Bounds::default(), &mut rng);
            assert!(e.vel.length() <= e.speed + 1e-3);
        }
        // Turned around toward the center
        let to_center = Bounds::default().center() - e.pos;
        assert!(e.vel.dot(to_center) > 0.0);
    }

    #[test]
    fn test_teleport_relocates_to_edge() {
        let mut rng = Pcg32::seed_from_u64(4);
        let bounds = Bounds::default();
        let mut e = enemy_at(EnemyKind::Phantom, Vec2::new(300.0, 300.0), &mut rng);
        e.health = 1;
        e.teleport_timer = 1;
        let moved = advance(&mut e, bounds, &mut rng).unwrap();
        assert_eq!(moved.to, e.pos);
        assert!(bounds.is_outside(e.pos, SPAWN_MARGIN - 1.0));
        assert!(e.teleport_timer >= TELEPORT_MIN_FRAMES);
        assert!((e.vel.length() - e.speed).abs() < 1e-3);
        assert_eq!(e.health, 1);
    }

    #[test]
    fn test_spiral_closes_in() {
        let mut rng = Pcg32::seed_from_u64(5);
        let bounds = Bounds::default();
        let mut e = enemy_at(EnemyKind::Spiral, Vec2::new(-40.0, 300.0), &mut rng);
        let start = e.pos.distance(bounds.center());
        for _ in 0..100 {
            advance(&mut e, bounds, &mut rng);
            assert!((e.vel.length() - e.speed).abs() < 1e-3);
        }
        assert!(e.pos.distance(bounds.center()) < start);
    }

    #[test]
    fn test_spiral_at_center_is_stable() {
        let mut rng = Pcg32::seed_from_u64(6);
        let bounds = Bounds::default();
        let mut e = enemy_at(EnemyKind::Spiral, bounds.center(), &mut rng);
        advance(&mut e, bounds, &mut rng);
        assert!(e.pos.is_finite());
        assert!(e.vel.is_finite());
    }

    #[test]
    fn test_bounce_flips_x_on_right_wall() {
        let mut rng = Pcg32::seed_from_u64(7);
        let bounds = Bounds::default();
        let mut e = enemy_at(EnemyKind::Bouncer, Vec2::new(bounds.width - 18.0, 300.0), &mut rng);
        e.vel = Vec2::new(2.0, 1.0);
        advance(&mut e, bounds, &mut rng);
        assert_eq!(e.vel, Vec2::new(-2.0, 1.0));
    }

    #[test]
    fn test_bounce_ignores_entering_enemy() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut e = enemy_at(EnemyKind::Bouncer, Vec2::new(-40.0, 300.0), &mut rng);
        e.vel = Vec2::new(2.0, 0.5);
        advance(&mut e, Bounds::default(), &mut rng);
        assert_eq!(e.vel, Vec2::new(2.0, 0.5));
    }

    proptest! {
        #[test]
        fn prop_bounce_keeps_speed_and_faces_inward(
            x in -60.0f32..860.0,
            y in -60.0f32..660.0,
            vx in -3.0f32..3.0,
            vy in -3.0f32..3.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(9);
            let bounds = Bounds::default();
            let mut e = enemy_at(EnemyKind::Bouncer, Vec2::new(x, y), &mut rng);
            e.vel = Vec2::new(vx, vy);
            let before = e.vel;
            bounce(&mut e, bounds);

            prop_assert_eq!(e.pos, Vec2::new(x, y));
            prop_assert!((e.vel.length() - before.length()).abs() < 1e-5);
            prop_assert!(e.vel.x == before.x || e.vel.x == -before.x);
            prop_assert!(e.vel.y == before.y || e.vel.y == -before.y);

            // Touching a wall never leaves the enemy heading further out
            let r = e.radius;
            if x - r <= 0.0 {
                prop_assert!(e.vel.x >= 0.0);
            }
            if x + r >= bounds.width {
                prop_assert!(e.vel.x <= 0.0);
            }
            if y - r <= 0.0 {
                prop_assert!(e.vel.y >= 0.0);
            }
            if y + r >= bounds.height {
                prop_assert!(e.vel.y <= 0.0);
            }
        }
    }
}
