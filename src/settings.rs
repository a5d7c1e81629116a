//! Game settings and preferences
//!
//! Persisted separately from the leaderboard under its own storage key.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage};
use crate::sim::{Bounds, Difficulty, GameConfig};

/// Storage key
pub const SETTINGS_KEY: &str = "bow_defense_settings";

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 3] = [
        QualityPreset::Low,
        QualityPreset::Medium,
        QualityPreset::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 400,
            QualityPreset::High => 1000,
        }
    }

    /// Projectile trail samples kept
    pub fn trail_length(&self) -> usize {
        match self {
            QualityPreset::Low => 3,
            QualityPreset::Medium => 8,
            QualityPreset::High => 12,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Forward sound cues to the audio sink
    pub sound_enabled: bool,
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on contact and bombs
    pub screen_shake: bool,
    /// Projectile trails
    pub trails: bool,
    /// Particle effects (hits, kills, teleports)
    pub particles: bool,

    // === Accessibility ===
    /// Reduced motion (suppresses shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            sound_enabled: true,
            quality: QualityPreset::Medium,

            // Visual effects - all on by default
            screen_shake: true,
            trails: true,
            particles: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective trail length
    pub fn trail_length(&self) -> usize {
        if !self.trails {
            0
        } else {
            self.quality.trail_length()
        }
    }

    /// Simulation config for a board of the given size
    pub fn game_config(&self, bounds: Bounds) -> GameConfig {
        GameConfig {
            difficulty: self.difficulty,
            bounds,
            max_particles: self.max_particles(),
            trail_length: self.trail_length(),
        }
    }

    /// Load settings, falling back to defaults
    pub fn load(storage: &Storage) -> Self {
        match storage.load_json::<Settings>(SETTINGS_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &Storage) -> persistence::Result<()> {
        storage.save_json(SETTINGS_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_game_config() {
        let config = Settings::default().game_config(Bounds::default());
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_disabled_effects_zero_caps() {
        let settings = Settings {
            particles: false,
            trails: false,
            ..Settings::from_preset(QualityPreset::High)
        };
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.trail_length(), 0);
    }

    #[test]
    fn test_reduced_motion_suppresses_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_preset_parsing() {
        for preset in QualityPreset::ALL {
            assert_eq!(QualityPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"difficulty":"Hard","sound_enabled":false}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert!(!settings.sound_enabled);
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert!(settings.particles);
    }

    #[test]
    fn test_save_and_load() {
        let storage = Storage::memory();
        assert_eq!(Settings::load(&storage), Settings::default());

        let settings = Settings {
            difficulty: Difficulty::Easy,
            quality: QualityPreset::Low,
            ..Settings::default()
        };
        settings.save(&storage).unwrap();
        assert_eq!(Settings::load(&storage), settings);

        storage.set_item(SETTINGS_KEY, "[]").unwrap();
        assert_eq!(Settings::load(&storage), Settings::default());
    }
}
