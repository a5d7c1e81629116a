//! Game state and core simulation types
//!
//! `GameState` is the single mutable aggregate for a match. Only the
//! simulation mutates it; everything else reads snapshots.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{Difficulty, DifficultyProfile};
use super::entity::{
    Bounds, Enemy, EnemyKind, EntityId, FloatingText, Particle, PowerUp, PowerUpKind, Projectile,
    TRAIL_LENGTH,
};
use super::snapshot::HudSnapshot;
use crate::angle_to_dir;
use crate::consts::*;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Health reached zero (terminal)
    GameOver,
}

/// Ammo/reload state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReloadState {
    Ready,
    Reloading { remaining: u32 },
}

/// The power-up currently modifying shots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    /// Frames left (unused for bombs, which wait for the next shot)
    pub remaining: u32,
}

/// Things that happened during a step, for audio and UI feedback
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    ShotFired { projectiles: u32 },
    EnemyHit { id: EntityId, kind: EnemyKind },
    EnemyKilled { id: EntityId, kind: EnemyKind, pos: Vec2, points: u64 },
    EnemySplit { id: EntityId },
    Teleported { id: EntityId, from: Vec2, to: Vec2 },
    PlayerDamaged { amount: f32 },
    ReloadStarted,
    ReloadComplete,
    PowerUpDropped { kind: PowerUpKind, pos: Vec2 },
    PowerUpCollected { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    BombDetonated { pos: Vec2, kills: u32 },
    WaveStarted { wave: u32 },
    GameOver { score: u64, wave: u32 },
}

/// Per-session configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub bounds: Bounds,
    /// Particle cap (0 disables particles)
    pub max_particles: usize,
    /// Projectile trail length
    pub trail_length: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            bounds: Bounds::default(),
            max_particles: 400,
            trail_length: TRAIL_LENGTH,
        }
    }
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Simulation frame counter
    pub frame: u64,

    pub health: f32,
    pub max_health: f32,
    pub score: u64,

    pub wave: u32,
    pub wave_timer: u32,
    /// Frames left on the "WAVE N" banner
    pub wave_announce: u32,
    pub spawn_timer: u32,

    pub ammo: u32,
    pub max_ammo: u32,
    pub reload: ReloadState,
    /// 0-1, meaningful while reloading (1 when ready)
    pub reload_progress: f32,
    pub shoot_cooldown: u32,
    /// Bow recoil animation timer
    pub bow_pulse: u32,

    pub combo: u32,
    pub combo_timer: u32,
    pub kill_streak: u32,
    pub total_kills: u32,
    pub kills_since_drop: u32,
    pub next_drop_at: u32,
    pub active_power: Option<ActivePowerUp>,

    pub screen_shake: f32,
    /// Latest pointer position (board coordinates)
    pub pointer: Vec2,

    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: VecDeque<Particle>,
    pub power_ups: Vec<PowerUp>,
    pub floating_texts: Vec<FloatingText>,

    /// Events raised during the current step
    pub events: Vec<GameEvent>,
    pub(crate) last_snapshot: Option<HudSnapshot>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new match with the given seed
    pub fn new(seed: u64, config: GameConfig) -> Self {
        let profile = config.difficulty.profile();
        let mut rng = Pcg32::seed_from_u64(seed);
        let next_drop_at = rng.random_range(DROP_THRESHOLD_MIN..DROP_THRESHOLD_MAX);

        Self {
            config,
            seed,
            phase: GamePhase::Running,
            frame: 0,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            score: 0,
            wave: 1,
            wave_timer: 0,
            wave_announce: WAVE_ANNOUNCE_DURATION,
            spawn_timer: 0,
            ammo: profile.max_ammo,
            max_ammo: profile.max_ammo,
            reload: ReloadState::Ready,
            reload_progress: 1.0,
            shoot_cooldown: 0,
            bow_pulse: 0,
            combo: 0,
            combo_timer: 0,
            kill_streak: 0,
            total_kills: 0,
            kills_since_drop: 0,
            next_drop_at,
            active_power: None,
            screen_shake: 0.0,
            pointer: config.bounds.center(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: VecDeque::new(),
            power_ups: Vec::new(),
            floating_texts: Vec::new(),
            events: Vec::new(),
            last_snapshot: None,
            rng,
            next_id: 1,
        }
    }

    pub fn profile(&self) -> &'static DifficultyProfile {
        self.config.difficulty.profile()
    }

    pub fn center(&self) -> Vec2 {
        self.config.bounds.center()
    }

    pub fn is_alive(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.reload, ReloadState::Reloading { .. })
    }

    pub fn active_power_kind(&self) -> Option<PowerUpKind> {
        self.active_power.map(|p| p.kind)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    /// Fraction of the current wave elapsed (0-1)
    pub fn wave_progress(&self) -> f32 {
        self.wave_timer as f32 / WAVE_DURATION as f32
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Add a particle, dropping the oldest once the cap is reached
    pub(crate) fn push_particle(&mut self, particle: Particle) {
        let cap = self.config.max_particles;
        if cap == 0 {
            return;
        }
        while self.particles.len() >= cap {
            self.particles.pop_front();
        }
        self.particles.push_back(particle);
    }

    /// Radial burst of `count` particles at `pos`
    pub(crate) fn burst(&mut self, pos: Vec2, count: usize, speed: f32, color: &'static str) {
        for _ in 0..count {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let s = speed * self.rng.random_range(0.4..1.0);
            let life = self.rng.random_range(20..40);
            let radius = self.rng.random_range(1.5..3.5);
            self.push_particle(Particle {
                pos,
                vel: angle_to_dir(angle) * s,
                drag: 0.95,
                life,
                max_life: life,
                radius,
                color,
            });
        }
    }

    pub(crate) fn add_shake(&mut self, amount: f32) {
        self.screen_shake += amount;
    }

    /// Start the reload countdown
    pub(crate) fn begin_reload(&mut self) {
        let frames = self.profile().reload_frames;
        self.reload = ReloadState::Reloading { remaining: frames };
        self.reload_progress = 0.0;
        self.events.push(GameEvent::ReloadStarted);
        log::debug!("Reloading ({} frames)", frames);
    }
}
