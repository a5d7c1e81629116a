//! Difficulty profiles
//!
//! Static tuning table; the engine reads these values and never modifies them.

use serde::{Deserialize, Serialize};

/// Difficulty selector chosen at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Tuning constants for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyProfile {
    /// Base frames between spawn attempts (before wave scaling)
    pub spawn_interval: u32,
    /// Multiplier on archetype speed
    pub enemy_speed: f32,
    /// Multiplier on contact damage dealt to the player
    pub player_damage: f32,
    /// Starting and maximum ammo
    pub max_ammo: u32,
    /// Reload duration in frames
    pub reload_frames: u32,
}

const EASY: DifficultyProfile = DifficultyProfile {
    spawn_interval: 90,
    enemy_speed: 0.8,
    player_damage: 0.5,
    max_ammo: 12,
    reload_frames: 60,
};

const NORMAL: DifficultyProfile = DifficultyProfile {
    spawn_interval: 70,
    enemy_speed: 1.0,
    player_damage: 1.0,
    max_ammo: 8,
    reload_frames: 90,
};

const HARD: DifficultyProfile = DifficultyProfile {
    spawn_interval: 50,
    enemy_speed: 1.3,
    player_damage: 1.5,
    max_ammo: 6,
    reload_frames: 120,
};

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn profile(&self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Normal => &NORMAL,
            Difficulty::Hard => &HARD,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_profile() {
        let p = Difficulty::Normal.profile();
        assert_eq!(p.max_ammo, 8);
        assert_eq!(p.spawn_interval, 70);
        assert_eq!(p.enemy_speed, 1.0);
    }

    #[test]
    fn test_harder_is_harder() {
        let easy = Difficulty::Easy.profile();
        let hard = Difficulty::Hard.profile();
        assert!(hard.spawn_interval < easy.spawn_interval);
        assert!(hard.player_damage > easy.player_damage);
        assert!(hard.max_ammo < easy.max_ammo);
        assert!(hard.reload_frames > easy.reload_frames);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("medium"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }
}
