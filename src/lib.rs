//! Bow Defense - A stationary-bow arcade defense game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, game state)
//! - `session`: Frame-loop host that owns the simulation and feeds it input
//! - `audio`: Sound cue routing for simulation events
//! - `persistence`: Key/value storage (LocalStorage on web, JSON files natively)
//! - `highscores` / `settings`: Persisted leaderboard and preferences

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use session::{FinalScore, Session, SessionObserver};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (the simulation counts in 60 Hz frames)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default board size
    pub const DEFAULT_BOARD_WIDTH: f32 = 800.0;
    pub const DEFAULT_BOARD_HEIGHT: f32 = 600.0;

    /// Player
    pub const MAX_HEALTH: f32 = 100.0;
    /// Enemies touching this circle around the bow deal contact damage
    pub const BOW_RADIUS: f32 = 30.0;

    /// Waves
    pub const WAVE_DURATION: u32 = 700;
    pub const WAVE_ANNOUNCE_DURATION: u32 = 120;
    /// Spawning never gets faster than this many frames between spawns
    pub const SPAWN_FLOOR: u32 = 20;
    /// Frames shaved off the spawn interval per wave
    pub const SPAWN_RATE_DECAY: u32 = 3;
    /// Extra enemy speed per wave past the first
    pub const WAVE_SPEED_BONUS: f32 = 0.05;

    /// Spawn/removal margins outside the visible board
    pub const SPAWN_MARGIN: f32 = 40.0;
    pub const OFFSCREEN_MARGIN: f32 = 100.0;

    /// Shooting
    pub const SHOOT_COOLDOWN: u32 = 12;
    pub const RAPID_FIRE_COOLDOWN: u32 = 4;
    pub const PROJECTILE_SPEED: f32 = 12.0;
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    pub const MULTI_SHOT_SPREAD: f32 = 0.2;
    pub const BOW_PULSE_DURATION: u32 = 10;

    /// Combo
    pub const COMBO_WINDOW: u32 = 120;

    /// Power-ups
    pub const POWER_UP_DURATION: u32 = 480;
    pub const POWER_UP_LIFETIME: u32 = 600;
    pub const POWER_UP_RADIUS: f32 = 14.0;
    pub const PICKUP_TOLERANCE: f32 = 10.0;
    pub const DROP_THRESHOLD_MIN: u32 = 8;
    pub const DROP_THRESHOLD_MAX: u32 = 15;
    pub const BOMB_RADIUS: f32 = 150.0;

    /// Feedback
    pub const HIT_FLASH_DURATION: u32 = 6;
    pub const FLOATING_TEXT_LIFE: u32 = 45;
    pub const CONTACT_SHAKE: f32 = 8.0;
    pub const BOMB_SHAKE: f32 = 18.0;
    pub const SHAKE_DECAY: f32 = 0.9;

    /// Movement pattern tuning
    pub const ZIGZAG_PERIOD: u32 = 30;
    pub const ZIGZAG_KICK: f32 = 0.8;
    pub const CHASE_EASE: f32 = 0.05;
    pub const SPIRAL_PULL: f32 = 0.6;
    pub const TELEPORT_MIN_FRAMES: u32 = 90;
    pub const TELEPORT_MAX_FRAMES: u32 = 180;
}

/// Unit vector for an angle in radians
#[inline]
pub fn angle_to_dir(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Rescale `v` to length `speed`. Returns `None` for a zero-length vector.
#[inline]
pub fn with_speed(v: Vec2, speed: f32) -> Option<Vec2> {
    let len = v.length();
    if len <= f32::EPSILON || !len.is_finite() {
        None
    } else {
        Some(v / len * speed)
    }
}
