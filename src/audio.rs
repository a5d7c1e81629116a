//! Sound cue routing
//!
//! The simulation never plays audio. Each `GameEvent` maps to at most one
//! `SoundCue`, which the session forwards to a `CueSink` when sound is
//! enabled. Every cue carries a small tone recipe so a host can synthesize
//! it procedurally without any asset files.

use std::cell::RefCell;
use std::rc::Rc;

use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Arrow loosed
    Shoot,
    /// Enemy hit but not killed
    EnemyHit,
    /// Enemy killed
    EnemyKill,
    /// Splitter broke apart
    Split,
    /// Phantom blinked
    Teleport,
    /// Something reached the bow
    PlayerHurt,
    /// Out of arrows
    ReloadStart,
    /// Quiver refilled
    ReloadDone,
    /// Power-up collected
    PickupCollect,
    /// Bomb detonated
    Explosion,
    /// New wave
    WaveStart,
    /// Game over
    GameOver,
}

/// Oscillator shape for a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single swept tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Start frequency (Hz)
    pub start_hz: f32,
    /// End frequency (Hz), swept exponentially
    pub end_hz: f32,
    /// Seconds
    pub duration: f32,
    /// Peak gain before volume scaling (0-1)
    pub gain: f32,
}

const fn tone(waveform: Waveform, start_hz: f32, end_hz: f32, duration: f32, gain: f32) -> Tone {
    Tone {
        waveform,
        start_hz,
        end_hz,
        duration,
        gain,
    }
}

impl SoundCue {
    /// Tone recipe for this cue
    pub fn tone(&self) -> Tone {
        match self {
            SoundCue::Shoot => tone(Waveform::Triangle, 880.0, 440.0, 0.08, 0.25),
            SoundCue::EnemyHit => tone(Waveform::Square, 300.0, 220.0, 0.05, 0.15),
            SoundCue::EnemyKill => tone(Waveform::Sawtooth, 520.0, 130.0, 0.15, 0.3),
            SoundCue::Split => tone(Waveform::Square, 260.0, 520.0, 0.12, 0.2),
            SoundCue::Teleport => tone(Waveform::Sine, 200.0, 1200.0, 0.2, 0.2),
            SoundCue::PlayerHurt => tone(Waveform::Sawtooth, 160.0, 60.0, 0.25, 0.4),
            SoundCue::ReloadStart => tone(Waveform::Triangle, 330.0, 250.0, 0.1, 0.2),
            SoundCue::ReloadDone => tone(Waveform::Triangle, 440.0, 660.0, 0.1, 0.25),
            SoundCue::PickupCollect => tone(Waveform::Sine, 600.0, 1200.0, 0.15, 0.3),
            SoundCue::Explosion => tone(Waveform::Sawtooth, 120.0, 30.0, 0.5, 0.5),
            SoundCue::WaveStart => tone(Waveform::Sine, 523.0, 784.0, 0.3, 0.3),
            SoundCue::GameOver => tone(Waveform::Triangle, 392.0, 98.0, 0.8, 0.4),
        }
    }
}

/// Cue for a simulation event, if it has one
pub fn cue_for(event: &GameEvent) -> Option<SoundCue> {
    let cue = match event {
        GameEvent::ShotFired { .. } => SoundCue::Shoot,
        GameEvent::EnemyHit { .. } => SoundCue::EnemyHit,
        GameEvent::EnemyKilled { .. } => SoundCue::EnemyKill,
        GameEvent::EnemySplit { .. } => SoundCue::Split,
        GameEvent::Teleported { .. } => SoundCue::Teleport,
        GameEvent::PlayerDamaged { .. } => SoundCue::PlayerHurt,
        GameEvent::ReloadStarted => SoundCue::ReloadStart,
        GameEvent::ReloadComplete => SoundCue::ReloadDone,
        GameEvent::PowerUpCollected { .. } => SoundCue::PickupCollect,
        GameEvent::BombDetonated { .. } => SoundCue::Explosion,
        GameEvent::WaveStarted { .. } => SoundCue::WaveStart,
        GameEvent::GameOver { .. } => SoundCue::GameOver,
        GameEvent::PowerUpDropped { .. } | GameEvent::PowerUpExpired { .. } => return None,
    };
    Some(cue)
}

/// Receiver for sound cues
pub trait CueSink {
    fn play(&mut self, cue: SoundCue);
}

/// Sink that collects cues for a host to drain
#[derive(Debug, Default)]
pub struct CueQueue {
    pending: Vec<SoundCue>,
}

impl CueQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all cues queued since the last drain
    pub fn drain(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl CueSink for CueQueue {
    fn play(&mut self, cue: SoundCue) {
        self.pending.push(cue);
    }
}

impl<S: CueSink> CueSink for Rc<RefCell<S>> {
    fn play(&mut self, cue: SoundCue) {
        self.borrow_mut().play(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EnemyKind, EntityId, PowerUpKind};
    use glam::Vec2;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            cue_for(&GameEvent::ShotFired { projectiles: 3 }),
            Some(SoundCue::Shoot)
        );
        assert_eq!(
            cue_for(&GameEvent::EnemyKilled {
                id: EntityId(1),
                kind: EnemyKind::Grunt,
                pos: Vec2::ZERO,
                points: 10,
            }),
            Some(SoundCue::EnemyKill)
        );
        assert_eq!(
            cue_for(&GameEvent::GameOver { score: 5, wave: 2 }),
            Some(SoundCue::GameOver)
        );
    }

    #[test]
    fn test_silent_events() {
        assert_eq!(
            cue_for(&GameEvent::PowerUpDropped {
                kind: PowerUpKind::Bomb,
                pos: Vec2::ZERO,
            }),
            None
        );
        assert_eq!(
            cue_for(&GameEvent::PowerUpExpired {
                kind: PowerUpKind::RapidFire
            }),
            None
        );
    }

    #[test]
    fn test_tones_are_audible() {
        let cues = [
            SoundCue::Shoot,
            SoundCue::EnemyHit,
            SoundCue::EnemyKill,
            SoundCue::Split,
            SoundCue::Teleport,
            SoundCue::PlayerHurt,
            SoundCue::ReloadStart,
            SoundCue::ReloadDone,
            SoundCue::PickupCollect,
            SoundCue::Explosion,
            SoundCue::WaveStart,
            SoundCue::GameOver,
        ];
        for cue in cues {
            let t = cue.tone();
            assert!(t.start_hz > 20.0 && t.end_hz > 20.0, "{cue:?}");
            assert!(t.duration > 0.0 && t.gain > 0.0 && t.gain <= 1.0, "{cue:?}");
        }
    }

    #[test]
    fn test_queue_drain() {
        let mut queue = CueQueue::new();
        queue.play(SoundCue::Shoot);
        queue.play(SoundCue::EnemyHit);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain(), vec![SoundCue::Shoot, SoundCue::EnemyHit]);
        assert!(queue.is_empty());
    }
}
