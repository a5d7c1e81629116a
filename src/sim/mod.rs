//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `tick` per frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (entities keep insertion order, IDs never reused)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod movement;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use difficulty::{Difficulty, DifficultyProfile};
pub use entity::{
    Bounds, Enemy, EnemyKind, EntityId, FloatingText, MovementPattern, Particle, PowerUp,
    PowerUpKind, Projectile, SpawnOverrides, spawn_enemy,
};
pub use snapshot::HudSnapshot;
pub use state::{ActivePowerUp, GameConfig, GameEvent, GamePhase, GameState, ReloadState};
pub use tick::{TickInput, attempt_shot, tick};
