//! Per-frame simulation step
//!
//! `tick` advances the match by exactly one frame. The order of the phases
//! below is fixed; tests and replays depend on it.

use glam::Vec2;
use rand::Rng;

use super::collision::{
    enemy_offscreen, enemy_touches_bow, projectile_hits_enemy, projectile_offscreen,
};
use super::entity::{
    Enemy, FloatingText, MovementPattern, PowerUp, PowerUpKind, Projectile, SpawnOverrides,
    spawn_enemy, spawn_split_offspring, unlocked_kinds,
};
use super::movement;
use super::snapshot::{HudSnapshot, emit_if_changed};
use super::state::{ActivePowerUp, GameEvent, GamePhase, GameState, ReloadState};
use crate::consts::*;
use crate::{angle_to_dir, with_speed};

/// Input gathered since the previous step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position, if it moved
    pub pointer: Option<Vec2>,
    /// Fire at the pointer (click/tap/space)
    pub trigger: bool,
}

/// Advance the game state by one frame.
///
/// Returns a snapshot when any HUD value changed during the step.
pub fn tick(state: &mut GameState, input: &TickInput) -> Option<HudSnapshot> {
    if state.phase == GamePhase::GameOver {
        return None;
    }

    state.events.clear();
    state.frame += 1;

    // Input inbox
    if let Some(pointer) = input.pointer {
        state.pointer = pointer;
    }
    let mut reload_started_now = false;
    if input.trigger {
        let was_reloading = state.is_reloading();
        let pointer = state.pointer;
        attempt_shot(state, pointer);
        reload_started_now = !was_reloading && state.is_reloading();
    }

    advance_wave(state);
    advance_spawner(state);
    if !reload_started_now {
        advance_reload(state);
    }
    advance_timers(state);

    update_enemies(state);
    if state.phase == GamePhase::GameOver {
        state.enemies.retain(|e| !e.dead);
        return emit_if_changed(state);
    }

    let offspring = resolve_projectile_hits(state);
    state.enemies.retain(|e| !e.dead);
    state.projectiles.retain(|p| !p.consumed);
    state.enemies.extend(offspring);

    collect_power_ups(state);
    advance_effects(state);

    emit_if_changed(state)
}

/// Try to fire at `pointer`. Returns true if a shot (or bomb) went off.
pub fn attempt_shot(state: &mut GameState, pointer: Vec2) -> bool {
    if !state.is_alive() || state.is_reloading() || state.ammo == 0 || state.shoot_cooldown > 0 {
        return false;
    }
    let center = state.center();
    let Some(dir) = with_speed(pointer - center, 1.0) else {
        return false;
    };

    state.bow_pulse = BOW_PULSE_DURATION;
    let power = state.active_power_kind();

    if power == Some(PowerUpKind::Bomb) {
        detonate_bomb(state, pointer);
        state.active_power = None;
        state.shoot_cooldown = SHOOT_COOLDOWN;
    } else {
        let piercing = power == Some(PowerUpKind::Piercing);
        let base_angle = dir.y.atan2(dir.x);
        let offsets: &[f32] = if power == Some(PowerUpKind::MultiShot) {
            &[-MULTI_SHOT_SPREAD, 0.0, MULTI_SHOT_SPREAD]
        } else {
            &[0.0]
        };
        for offset in offsets {
            let angle = base_angle + offset;
            let vel = angle_to_dir(angle) * PROJECTILE_SPEED;
            let id = state.next_entity_id();
            state
                .projectiles
                .push(Projectile::new(id, center, vel, piercing));
        }
        state.shoot_cooldown = if power == Some(PowerUpKind::RapidFire) {
            RAPID_FIRE_COOLDOWN
        } else {
            SHOOT_COOLDOWN
        };
        state.events.push(GameEvent::ShotFired {
            projectiles: offsets.len() as u32,
        });
    }

    state.ammo -= 1;
    if state.ammo == 0 {
        state.begin_reload();
    }
    true
}

fn advance_wave(state: &mut GameState) {
    // Count down before a rollover can reset it
    state.wave_announce = state.wave_announce.saturating_sub(1);
    state.wave_timer += 1;
    if state.wave_timer >= WAVE_DURATION {
        state.wave += 1;
        state.wave_timer = 0;
        state.wave_announce = WAVE_ANNOUNCE_DURATION;
        state.events.push(GameEvent::WaveStarted { wave: state.wave });
        log::info!("Wave {} started (score {})", state.wave, state.score);
    }
}

/// Frames between spawns at the current wave
pub fn spawn_interval(state: &GameState) -> u32 {
    let decay = state.wave.saturating_mul(SPAWN_RATE_DECAY);
    state
        .profile()
        .spawn_interval
        .saturating_sub(decay)
        .max(SPAWN_FLOOR)
}

/// Speed multiplier applied to new spawns at the current wave
pub fn spawn_speed_scale(state: &GameState) -> f32 {
    let wave_bonus = 1.0 + state.wave.saturating_sub(1) as f32 * WAVE_SPEED_BONUS;
    state.profile().enemy_speed * wave_bonus
}

fn advance_spawner(state: &mut GameState) {
    state.spawn_timer += 1;
    if state.spawn_timer < spawn_interval(state) {
        return;
    }
    state.spawn_timer = 0;

    let pool = unlocked_kinds(state.wave);
    if pool.is_empty() {
        return;
    }
    let kind = pool[state.rng.random_range(0..pool.len())];
    let id = state.next_entity_id();
    let overrides = SpawnOverrides {
        position: None,
        speed_scale: spawn_speed_scale(state),
    };
    let enemy = spawn_enemy(kind, state.config.bounds, &mut state.rng, id, overrides);
    log::debug!("Spawned {} #{} at {:?}", enemy.name(), id.0, enemy.pos);
    state.enemies.push(enemy);
}

fn advance_reload(state: &mut GameState) {
    let ReloadState::Reloading { remaining } = state.reload else {
        return;
    };
    let duration = state.profile().reload_frames.max(1);
    let remaining = remaining.saturating_sub(1);
    state.reload_progress = (1.0 - remaining as f32 / duration as f32).clamp(0.0, 1.0);

    if remaining == 0 {
        state.reload = ReloadState::Ready;
        state.ammo = state.max_ammo;
        state.reload_progress = 1.0;
        state.events.push(GameEvent::ReloadComplete);
        let center = state.center();
        state.burst(center, 12, 2.0, "#ffd54f");
    } else {
        state.reload = ReloadState::Reloading { remaining };
    }
}

fn advance_timers(state: &mut GameState) {
    state.shoot_cooldown = state.shoot_cooldown.saturating_sub(1);
    state.bow_pulse = state.bow_pulse.saturating_sub(1);

    if state.combo_timer > 0 {
        state.combo_timer -= 1;
        if state.combo_timer == 0 {
            state.combo = 0;
        }
    }

    if let Some(active) = state.active_power.as_mut() {
        // Bombs wait for the next shot
        if active.kind != PowerUpKind::Bomb {
            active.remaining = active.remaining.saturating_sub(1);
            if active.remaining == 0 {
                let kind = active.kind;
                state.active_power = None;
                state.events.push(GameEvent::PowerUpExpired { kind });
                log::debug!("{} expired", kind.label());
            }
        }
    }

    state.screen_shake *= SHAKE_DECAY;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }
}

/// Move enemies, then apply bow contact and off-screen culling
fn update_enemies(state: &mut GameState) {
    let bounds = state.config.bounds;
    let center = state.center();
    let damage_mult = state.profile().player_damage;

    for i in 0..state.enemies.len() {
        if state.enemies[i].dead {
            continue;
        }

        if let Some(moved) = movement::advance(&mut state.enemies[i], bounds, &mut state.rng) {
            let id = state.enemies[i].id;
            let color = state.enemies[i].color();
            state.burst(moved.from, 8, 2.0, color);
            state.burst(moved.to, 8, 2.0, color);
            state.events.push(GameEvent::Teleported {
                id,
                from: moved.from,
                to: moved.to,
            });
        }

        let enemy = &state.enemies[i];
        if enemy_touches_bow(enemy, center) {
            let amount = enemy.damage * damage_mult;
            let pos = enemy.pos;
            state.enemies[i].dead = true;
            damage_player(state, amount, pos);
        } else if enemy_offscreen(enemy, bounds) {
            state.enemies[i].dead = true;
        }
    }
}

/// Bow contact: every contacting enemy deals its damage (cumulative)
fn damage_player(state: &mut GameState, amount: f32, pos: Vec2) {
    state.health = (state.health - amount).clamp(0.0, state.max_health);
    state.combo = 0;
    state.combo_timer = 0;
    state.kill_streak = 0;
    state.add_shake(CONTACT_SHAKE);
    state.burst(pos, 12, 3.5, "#ff3b3b");
    state.events.push(GameEvent::PlayerDamaged { amount });

    if state.health <= 0.0 && state.phase == GamePhase::Running {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            score: state.score,
            wave: state.wave,
        });
        log::info!(
            "Game over: score {} on wave {} after {} frames",
            state.score,
            state.wave,
            state.frame
        );
    }
}

/// Projectile × enemy overlap tests. Returns split offspring to add after removal.
fn resolve_projectile_hits(state: &mut GameState) -> Vec<Enemy> {
    let mut offspring = Vec::new();

    for p in 0..state.projectiles.len() {
        for e in 0..state.enemies.len() {
            let projectile = &state.projectiles[p];
            let enemy = &state.enemies[e];
            if projectile.consumed || enemy.dead || projectile.struck.contains(&enemy.id) {
                continue;
            }
            if !projectile_hits_enemy(projectile, enemy) {
                continue;
            }

            let enemy_id = enemy.id;
            let projectile = &mut state.projectiles[p];
            if projectile.piercing {
                projectile.struck.push(enemy_id);
            } else {
                projectile.consumed = true;
            }
            damage_enemy(state, e, 1, &mut offspring);
        }
    }

    offspring
}

/// Damage the enemy at `index`; on death runs the kill bookkeeping
fn damage_enemy(state: &mut GameState, index: usize, amount: u32, offspring: &mut Vec<Enemy>) {
    let enemy = &mut state.enemies[index];
    let killed = enemy.take_damage(amount);
    let (id, kind, pos, color) = (enemy.id, enemy.kind, enemy.pos, enemy.color());

    state.events.push(GameEvent::EnemyHit { id, kind });
    state.burst(pos, 6, 2.5, color);

    if killed {
        award_kill(state, index, offspring);
    }
}

/// Points for a kill at the current wave and combo
pub fn kill_points(base: u32, wave: u32, combo: u32) -> u64 {
    let multiplier = 1.0 + (combo / 3) as f64 * 0.5;
    (base as f64 * wave as f64 * multiplier).round() as u64
}

fn award_kill(state: &mut GameState, index: usize, offspring: &mut Vec<Enemy>) {
    let enemy = &state.enemies[index];
    let (id, kind, pos, color) = (enemy.id, enemy.kind, enemy.pos, enemy.color());
    let should_split = enemy.pattern == MovementPattern::Split && !enemy.has_split;

    let points = kill_points(enemy.points, state.wave, state.combo);
    state.score += points;
    state.combo += 1;
    state.combo_timer = COMBO_WINDOW;
    state.kill_streak += 1;
    state.total_kills += 1;
    state.kills_since_drop += 1;

    state.burst(pos, 16, 4.0, color);
    state
        .floating_texts
        .push(FloatingText::new(pos, format!("+{}", points), color));
    state.events.push(GameEvent::EnemyKilled {
        id,
        kind,
        pos,
        points,
    });

    if should_split {
        state.enemies[index].has_split = true;
        let ids = [state.next_entity_id(), state.next_entity_id()];
        let parent = state.enemies[index].clone();
        let bounds = state.config.bounds;
        offspring.extend(spawn_split_offspring(&parent, bounds, &mut state.rng, ids));
        state.events.push(GameEvent::EnemySplit { id });
    }

    if state.kills_since_drop >= state.next_drop_at {
        state.kills_since_drop = 0;
        state.next_drop_at = state
            .rng
            .random_range(DROP_THRESHOLD_MIN..DROP_THRESHOLD_MAX);
        let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
        let pickup_id = state.next_entity_id();
        state.power_ups.push(PowerUp::new(pickup_id, kind, pos));
        state.events.push(GameEvent::PowerUpDropped { kind, pos });
        log::debug!("Dropped {} at {:?}", kind.label(), pos);
    }
}

/// Kill or damage every enemy near `pos`. No projectile is created.
fn detonate_bomb(state: &mut GameState, pos: Vec2) {
    let mut offspring = Vec::new();
    let mut kills = 0;

    for i in 0..state.enemies.len() {
        let enemy = &state.enemies[i];
        if enemy.dead || enemy.pos.distance(pos) > BOMB_RADIUS {
            continue;
        }
        let health = enemy.health;
        damage_enemy(state, i, health, &mut offspring);
        kills += 1;
    }

    state.enemies.retain(|e| !e.dead);
    state.enemies.extend(offspring);

    state.burst(pos, 60, 7.0, PowerUpKind::Bomb.color());
    state.add_shake(BOMB_SHAKE);
    state.events.push(GameEvent::BombDetonated { pos, kills });
    log::debug!("Bomb detonated at {:?}: {} kills", pos, kills);
}

/// Grant any power-up the pointer is touching. The newest pickup wins.
fn collect_power_ups(state: &mut GameState) {
    let pointer = state.pointer;
    let mut i = 0;
    while i < state.power_ups.len() {
        if !state.power_ups[i].within_reach(pointer) {
            i += 1;
            continue;
        }
        let pickup = state.power_ups.remove(i);
        state.active_power = Some(ActivePowerUp {
            kind: pickup.kind,
            remaining: POWER_UP_DURATION,
        });
        state.burst(pickup.pos, 14, 3.0, pickup.kind.color());
        state.floating_texts.push(FloatingText::new(
            pickup.pos,
            pickup.kind.label(),
            pickup.kind.color(),
        ));
        state.events.push(GameEvent::PowerUpCollected { kind: pickup.kind });
        log::debug!("Collected {}", pickup.kind.label());
    }
}

/// Move projectiles/particles/texts and cull what is finished
fn advance_effects(state: &mut GameState) {
    let bounds = state.config.bounds;
    let trail_length = state.config.trail_length;

    for projectile in &mut state.projectiles {
        projectile.advance(trail_length);
    }
    state
        .projectiles
        .retain(|p| !projectile_offscreen(p, bounds));

    for particle in &mut state.particles {
        particle.advance();
    }
    state.particles.retain(|p| p.life > 0);

    for text in &mut state.floating_texts {
        text.pos.y -= 1.0;
        text.life = text.life.saturating_sub(1);
    }
    state.floating_texts.retain(|t| t.life > 0);

    for pickup in &mut state.power_ups {
        pickup.rotation += 0.05;
        pickup.pulse = (pickup.pulse + 0.1) % std::f32::consts::TAU;
        pickup.life = pickup.life.saturating_sub(1);
    }
    state.power_ups.retain(|p| p.life > 0);
}
