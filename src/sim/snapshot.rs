//! Read-only HUD snapshot emitted after each step

use serde::{Deserialize, Serialize};

use super::state::GameState;

/// Point-in-time copy of the values the HUD and session host observe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub health: f32,
    pub max_health: f32,
    pub score: u64,
    pub wave: u32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub reloading: bool,
    pub reload_progress: f32,
    pub combo: u32,
    pub kill_streak: u32,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            health: state.health.clamp(0.0, state.max_health),
            max_health: state.max_health,
            score: state.score,
            wave: state.wave,
            ammo: state.ammo,
            max_ammo: state.max_ammo,
            reloading: state.is_reloading(),
            reload_progress: state.reload_progress.clamp(0.0, 1.0),
            combo: state.combo,
            kill_streak: state.kill_streak,
        }
    }

    /// Health as a 0-1 fraction for bars
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Capture a snapshot and return it only if it differs from the last one emitted
pub(crate) fn emit_if_changed(state: &mut GameState) -> Option<HudSnapshot> {
    let snapshot = HudSnapshot::capture(state);
    if state.last_snapshot.as_ref() == Some(&snapshot) {
        return None;
    }
    state.last_snapshot = Some(snapshot);
    Some(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameConfig;

    #[test]
    fn test_first_snapshot_always_emitted() {
        let mut state = GameState::new(5, GameConfig::default());
        let snap = emit_if_changed(&mut state).unwrap();
        assert_eq!(snap.health, 100.0);
        assert_eq!(snap.ammo, 8);
        assert!(!snap.reloading);
        assert!(emit_if_changed(&mut state).is_none());
    }

    #[test]
    fn test_change_triggers_emission() {
        let mut state = GameState::new(5, GameConfig::default());
        emit_if_changed(&mut state);
        state.score += 10;
        let snap = emit_if_changed(&mut state).unwrap();
        assert_eq!(snap.score, 10);
    }

    #[test]
    fn test_values_clamped() {
        let mut state = GameState::new(5, GameConfig::default());
        state.health = -12.0;
        state.reload_progress = 1.7;
        let snap = HudSnapshot::capture(&state);
        assert_eq!(snap.health, 0.0);
        assert_eq!(snap.reload_progress, 1.0);
        assert_eq!(snap.health_fraction(), 0.0);
    }
}
