//! Session host
//!
//! Owns one `GameState` and drives it from a display-rate frame loop:
//! - Input arrives at any time and waits in an inbox until the next step
//! - `advance` converts wall-clock time into fixed `SIM_DT` steps
//! - Snapshots, events and sound cues fan out to registered listeners
//! - Game over is reported once, after which the session stops

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::audio::{CueSink, cue_for};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;
use crate::sim::{Bounds, GameEvent, GamePhase, GameState, HudSnapshot, TickInput, tick};

/// Final result handed to the host when a match ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: u64,
    pub wave: u32,
}

/// Listener for session output. All methods default to no-ops.
pub trait SessionObserver {
    /// A HUD value changed
    fn on_snapshot(&mut self, _snapshot: &HudSnapshot) {}

    /// Something happened during a step
    fn on_event(&mut self, _event: &GameEvent) {}

    /// Called exactly once per match
    fn on_game_over(&mut self, _result: FinalScore) {}
}

impl<O: SessionObserver> SessionObserver for Rc<RefCell<O>> {
    fn on_snapshot(&mut self, snapshot: &HudSnapshot) {
        self.borrow_mut().on_snapshot(snapshot);
    }

    fn on_event(&mut self, event: &GameEvent) {
        self.borrow_mut().on_event(event);
    }

    fn on_game_over(&mut self, result: FinalScore) {
        self.borrow_mut().on_game_over(result);
    }
}

pub struct Session {
    state: GameState,
    settings: Settings,
    /// Unsimulated time carried between frames
    accumulator: f32,
    /// Input waiting for the next step
    input: TickInput,
    observers: Vec<Box<dyn SessionObserver>>,
    audio: Option<Box<dyn CueSink>>,
    running: bool,
    game_over_reported: bool,
}

impl Session {
    /// Start a match on the default board
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self::with_bounds(settings, seed, Bounds::default())
    }

    /// Start a match on a board of the given size
    pub fn with_bounds(settings: Settings, seed: u64, bounds: Bounds) -> Self {
        let state = GameState::new(seed, settings.game_config(bounds));
        log::info!(
            "Session started: seed={} difficulty={} board={}x{}",
            seed,
            settings.difficulty.as_str(),
            bounds.width,
            bounds.height
        );
        Self {
            state,
            settings,
            accumulator: 0.0,
            input: TickInput::default(),
            observers: Vec::new(),
            audio: None,
            running: true,
            game_over_reported: false,
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Route sound cues to `sink` (only while sound is enabled)
    pub fn set_audio(&mut self, sink: Box<dyn CueSink>) {
        self.audio = Some(sink);
    }

    /// Read-only view of the match, valid between steps
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current HUD values
    pub fn snapshot(&self) -> HudSnapshot {
        HudSnapshot::capture(&self.state)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Screen shake to render, zero when the player turned it off
    pub fn screen_shake(&self) -> f32 {
        if self.settings.effective_screen_shake() {
            self.state.screen_shake
        } else {
            0.0
        }
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.input.pointer = Some(pos);
    }

    /// Queue a shot; consumed by the next step
    pub fn trigger(&mut self) {
        self.input.trigger = true;
    }

    /// Stop stepping. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::info!("Session stopped at frame {}", self.state.frame);
        }
    }

    /// Throw away the current match and start a new one with the same settings
    pub fn restart(&mut self, seed: u64) {
        let bounds = self.state.config.bounds;
        self.state = GameState::new(seed, self.settings.game_config(bounds));
        self.accumulator = 0.0;
        self.input = TickInput::default();
        self.running = true;
        self.game_over_reported = false;
        log::info!("Session restarted: seed={}", seed);
    }

    /// Run as many fixed steps as `elapsed_secs` covers. Returns the number
    /// of steps taken.
    pub fn advance(&mut self, elapsed_secs: f32) -> u32 {
        if !self.running {
            return 0;
        }

        // Bad timestamps must not poison the accumulator
        let dt = if elapsed_secs.is_finite() {
            elapsed_secs.clamp(0.0, 0.1)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.running && self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = std::mem::take(&mut self.input);
            self.step(&input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Drop backlog the substep cap could not cover
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        substeps
    }

    fn step(&mut self, input: &TickInput) {
        let snapshot = tick(&mut self.state, input);

        for event in &self.state.events {
            for observer in &mut self.observers {
                observer.on_event(event);
            }
            if self.settings.sound_enabled {
                if let (Some(sink), Some(cue)) = (self.audio.as_mut(), cue_for(event)) {
                    sink.play(cue);
                }
            }
        }

        if let Some(snapshot) = snapshot {
            for observer in &mut self.observers {
                observer.on_snapshot(&snapshot);
            }
        }

        if self.state.phase == GamePhase::GameOver && !self.game_over_reported {
            self.game_over_reported = true;
            let result = FinalScore {
                score: self.state.score,
                wave: self.state.wave,
            };
            for observer in &mut self.observers {
                observer.on_game_over(result);
            }
            self.stop();
        }
    }
}
