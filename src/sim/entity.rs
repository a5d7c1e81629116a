//! Entity definitions and factories
//!
//! Enemy archetypes, the enemy spawn factory, and the plain data types for
//! projectiles, particles, power-up pickups and floating score text.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{angle_to_dir, with_speed};

/// Stable entity identifier, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Visible board rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
        }
    }
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Board center (where the bow sits)
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True if `pos` lies outside the board extended by `margin` on every side
    pub fn is_outside(&self, pos: Vec2, margin: f32) -> bool {
        pos.x < -margin
            || pos.x > self.width + margin
            || pos.y < -margin
            || pos.y > self.height + margin
    }
}

/// How an enemy moves each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementPattern {
    Straight,
    Zigzag,
    Teleport,
    Chase,
    Bounce,
    Spiral,
    Split,
}

impl MovementPattern {
    /// Bouncing enemies stay on the board and are never culled off-screen
    pub fn exempt_from_offscreen(&self) -> bool {
        matches!(self, MovementPattern::Bounce)
    }
}

/// Enemy kinds, in unlock order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Grunt,
    Zigzag,
    Splitter,
    Phantom,
    Hunter,
    Bouncer,
    Spiral,
}

/// Static definition of an enemy kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Archetype {
    pub kind: EnemyKind,
    pub name: &'static str,
    pub color: &'static str,
    pub max_health: u32,
    pub damage: f32,
    pub radius: f32,
    pub speed: f32,
    pub points: u32,
    pub pattern: MovementPattern,
    /// First wave this archetype can spawn in
    pub unlock_wave: u32,
}

pub const ARCHETYPES: [Archetype; 7] = [
    Archetype {
        kind: EnemyKind::Grunt,
        name: "Grunt",
        color: "#ff4d4d",
        max_health: 1,
        damage: 10.0,
        radius: 14.0,
        speed: 1.4,
        points: 10,
        pattern: MovementPattern::Straight,
        unlock_wave: 1,
    },
    Archetype {
        kind: EnemyKind::Zigzag,
        name: "Zigzag",
        color: "#ffb347",
        max_health: 1,
        damage: 10.0,
        radius: 13.0,
        speed: 1.8,
        points: 15,
        pattern: MovementPattern::Zigzag,
        unlock_wave: 2,
    },
    Archetype {
        kind: EnemyKind::Splitter,
        name: "Splitter",
        color: "#b967ff",
        max_health: 2,
        damage: 15.0,
        radius: 18.0,
        speed: 1.2,
        points: 25,
        pattern: MovementPattern::Split,
        unlock_wave: 3,
    },
    Archetype {
        kind: EnemyKind::Phantom,
        name: "Phantom",
        color: "#4dd2ff",
        max_health: 1,
        damage: 15.0,
        radius: 14.0,
        speed: 1.5,
        points: 25,
        pattern: MovementPattern::Teleport,
        unlock_wave: 4,
    },
    Archetype {
        kind: EnemyKind::Hunter,
        name: "Hunter",
        color: "#7dff6a",
        max_health: 2,
        damage: 15.0,
        radius: 16.0,
        speed: 1.7,
        points: 30,
        pattern: MovementPattern::Chase,
        unlock_wave: 5,
    },
    Archetype {
        kind: EnemyKind::Bouncer,
        name: "Bouncer",
        color: "#ffe14d",
        max_health: 3,
        damage: 20.0,
        radius: 17.0,
        speed: 2.0,
        points: 35,
        pattern: MovementPattern::Bounce,
        unlock_wave: 6,
    },
    Archetype {
        kind: EnemyKind::Spiral,
        name: "Spiral",
        color: "#ff6ad5",
        max_health: 2,
        damage: 15.0,
        radius: 15.0,
        speed: 1.6,
        points: 40,
        pattern: MovementPattern::Spiral,
        unlock_wave: 7,
    },
];

impl EnemyKind {
    pub fn archetype(&self) -> &'static Archetype {
        match self {
            EnemyKind::Grunt => &ARCHETYPES[0],
            EnemyKind::Zigzag => &ARCHETYPES[1],
            EnemyKind::Splitter => &ARCHETYPES[2],
            EnemyKind::Phantom => &ARCHETYPES[3],
            EnemyKind::Hunter => &ARCHETYPES[4],
            EnemyKind::Bouncer => &ARCHETYPES[5],
            EnemyKind::Spiral => &ARCHETYPES[6],
        }
    }
}

/// Archetypes available by `wave`
pub fn unlocked_kinds(wave: u32) -> Vec<EnemyKind> {
    ARCHETYPES
        .iter()
        .filter(|a| a.unlock_wave <= wave)
        .map(|a| a.kind)
        .collect()
}

/// Optional tweaks applied by the spawn factory
#[derive(Debug, Clone, Copy)]
pub struct SpawnOverrides {
    /// Force the spawn position instead of picking a random edge
    pub position: Option<Vec2>,
    /// Multiplier on archetype speed (difficulty × wave bonus)
    pub speed_scale: f32,
}

impl Default for SpawnOverrides {
    fn default() -> Self {
        Self {
            position: None,
            speed_scale: 1.0,
        }
    }
}

/// A live enemy
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub max_health: u32,
    pub health: u32,
    pub damage: f32,
    pub radius: f32,
    /// Cruise speed (px/frame) after difficulty/wave scaling and jitter
    pub speed: f32,
    pub points: u32,
    pub pattern: MovementPattern,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle (radians)
    pub angle: f32,
    pub zigzag_timer: u32,
    pub teleport_timer: u32,
    /// Pulse animation (0-1) and its direction
    pub pulse: f32,
    pub pulse_dir: f32,
    pub hit_flash: u32,
    /// Set once a splitter has produced its offspring
    pub has_split: bool,
    /// Marked for removal this frame
    pub dead: bool,
}

impl Enemy {
    pub fn name(&self) -> &'static str {
        self.kind.archetype().name
    }

    pub fn color(&self) -> &'static str {
        self.kind.archetype().color
    }

    /// Apply `amount` damage, saturating at zero. Returns true if this killed it.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.dead {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.hit_flash = HIT_FLASH_DURATION;
        if self.health == 0 {
            self.dead = true;
            true
        } else {
            false
        }
    }

    /// Speed multiplier relative to the archetype (used when re-spawning in place)
    pub fn speed_scale(&self) -> f32 {
        let base = self.kind.archetype().speed;
        if base > 0.0 { self.speed / base } else { 1.0 }
    }
}

/// Pick a random position just outside one of the four board edges
pub fn random_edge_position<R: Rng>(bounds: Bounds, rng: &mut R) -> Vec2 {
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random_range(0.0..bounds.width), -SPAWN_MARGIN),
        1 => Vec2::new(
            bounds.width + SPAWN_MARGIN,
            rng.random_range(0.0..bounds.height),
        ),
        2 => Vec2::new(
            rng.random_range(0.0..bounds.width),
            bounds.height + SPAWN_MARGIN,
        ),
        _ => Vec2::new(-SPAWN_MARGIN, rng.random_range(0.0..bounds.height)),
    }
}

/// Build a fully initialized enemy of `kind`
pub fn spawn_enemy<R: Rng>(
    kind: EnemyKind,
    bounds: Bounds,
    rng: &mut R,
    id: EntityId,
    overrides: SpawnOverrides,
) -> Enemy {
    let arch = kind.archetype();
    let pos = overrides
        .position
        .unwrap_or_else(|| random_edge_position(bounds, rng));
    let speed = arch.speed * overrides.speed_scale * rng.random_range(0.85..1.15);
    // A forced position can coincide with the center; fall back to heading right
    let vel = with_speed(bounds.center() - pos, speed).unwrap_or(Vec2::new(speed, 0.0));

    Enemy {
        id,
        kind,
        max_health: arch.max_health,
        health: arch.max_health,
        damage: arch.damage,
        radius: arch.radius,
        speed,
        points: arch.points,
        pattern: arch.pattern,
        pos,
        vel,
        angle: vel.y.atan2(vel.x),
        zigzag_timer: 0,
        teleport_timer: rng.random_range(TELEPORT_MIN_FRAMES..TELEPORT_MAX_FRAMES),
        pulse: 0.0,
        pulse_dir: 1.0,
        hit_flash: 0,
        has_split: false,
        dead: false,
    }
}

/// Angle (radians) each split offspring veers off the parent's heading
pub const SPLIT_ANGLE: f32 = 0.6;

/// Build the two one-hit offspring of a dying splitter
pub fn spawn_split_offspring<R: Rng>(
    parent: &Enemy,
    bounds: Bounds,
    rng: &mut R,
    ids: [EntityId; 2],
) -> [Enemy; 2] {
    let heading = bounds.center() - parent.pos;
    let base_angle = if heading.length_squared() > 0.0 {
        heading.y.atan2(heading.x)
    } else {
        parent.angle
    };

    let make = |id: EntityId, offset: f32, rng: &mut R| {
        let mut child = spawn_enemy(
            parent.kind,
            bounds,
            rng,
            id,
            SpawnOverrides {
                position: Some(parent.pos),
                speed_scale: parent.speed_scale(),
            },
        );
        child.max_health = 1;
        child.health = 1;
        child.radius = parent.radius * 0.6;
        child.points = (parent.points as f32 / 2.0).round() as u32;
        child.pattern = MovementPattern::Straight;
        child.has_split = true;
        let angle = base_angle + offset;
        child.vel = angle_to_dir(angle) * child.speed;
        child.angle = angle;
        child
    };

    [make(ids[0], -SPLIT_ANGLE, rng), make(ids[1], SPLIT_ANGLE, rng)]
}

/// Maximum trail points kept per projectile at full quality
pub const TRAIL_LENGTH: usize = 8;

/// A projectile fired from the bow
#[derive(Debug, Clone, Serialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Trail history for rendering (newest first)
    pub trail: VecDeque<Vec2>,
    /// Survives enemy contact instead of being consumed
    pub piercing: bool,
    /// Enemies already struck (a piercing arrow hits each enemy once)
    pub struck: Vec<EntityId>,
    /// Marked for removal this frame
    pub consumed: bool,
}

impl Projectile {
    pub fn new(id: EntityId, pos: Vec2, vel: Vec2, piercing: bool) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: PROJECTILE_RADIUS,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
            piercing,
            struck: Vec::new(),
            consumed: false,
        }
    }

    /// Record the current position, then move one frame
    pub fn advance(&mut self, trail_length: usize) {
        self.trail.push_front(self.pos);
        self.trail.truncate(trail_length);
        self.pos += self.vel;
    }
}

/// A cosmetic particle
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Per-frame velocity multiplier
    pub drag: f32,
    pub life: u32,
    pub max_life: u32,
    pub radius: f32,
    pub color: &'static str,
}

impl Particle {
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            (self.life as f32 / self.max_life as f32).clamp(0.0, 1.0)
        }
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.vel *= self.drag;
        self.life = self.life.saturating_sub(1);
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    MultiShot,
    Piercing,
    RapidFire,
    Bomb,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::MultiShot,
        PowerUpKind::Piercing,
        PowerUpKind::RapidFire,
        PowerUpKind::Bomb,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::MultiShot => "MULTI SHOT",
            PowerUpKind::Piercing => "PIERCING",
            PowerUpKind::RapidFire => "RAPID FIRE",
            PowerUpKind::Bomb => "BOMB",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            PowerUpKind::MultiShot => "#00e5ff",
            PowerUpKind::Piercing => "#ff9100",
            PowerUpKind::RapidFire => "#76ff03",
            PowerUpKind::Bomb => "#ff1744",
        }
    }
}

/// A power-up pickup lying on the board
#[derive(Debug, Clone, Serialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
    pub rotation: f32,
    /// Frames until it expires
    pub life: u32,
    pub pulse: f32,
}

impl PowerUp {
    pub fn new(id: EntityId, kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            radius: POWER_UP_RADIUS,
            rotation: 0.0,
            life: POWER_UP_LIFETIME,
            pulse: 0.0,
        }
    }

    /// Pointer is close enough to collect it
    pub fn within_reach(&self, pointer: Vec2) -> bool {
        self.pos.distance(pointer) < self.radius + PICKUP_TOLERANCE
    }
}

/// Rising score/label text
#[derive(Debug, Clone, Serialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub color: &'static str,
    pub life: u32,
}

impl FloatingText {
    pub fn new(pos: Vec2, text: impl Into<String>, color: &'static str) -> Self {
        Self {
            pos,
            text: text.into(),
            color,
            life: FLOATING_TEXT_LIFE,
        }
    }

    pub fn alpha(&self) -> f32 {
        self.life as f32 / FLOATING_TEXT_LIFE as f32
    }
}
