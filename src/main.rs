//! Bow Defense - headless host
//!
//! Runs a match with an autopilot archer and records the result on the
//! leaderboard. Useful for balancing and soak testing.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, Result};
    use bow_defense::audio::CueQueue;
    use bow_defense::consts::SIM_DT;
    use bow_defense::highscores::{self, HighScores};
    use bow_defense::persistence::{Storage, now_ms};
    use bow_defense::sim::{Difficulty, GameState, HudSnapshot};
    use bow_defense::{FinalScore, Session, SessionObserver, Settings};
    use clap::{Parser, ValueEnum};
    use glam::Vec2;

    #[derive(Parser, Debug)]
    #[command(name = "bow-defense")]
    #[command(about = "Headless Bow Defense run with an autopilot archer")]
    pub struct Cli {
        /// Difficulty (defaults to the saved setting)
        #[arg(long, short, value_enum)]
        pub difficulty: Option<CliDifficulty>,
        /// Run seed (defaults to the current time)
        #[arg(long, short)]
        pub seed: Option<u64>,
        /// Maximum frames to simulate
        #[arg(long, short, default_value_t = 36_000)]
        pub frames: u64,
        /// Leaderboard name (defaults to the remembered name)
        #[arg(long, short)]
        pub name: Option<String>,
        /// Drop sound cues instead of queueing them
        #[arg(long)]
        pub no_sound: bool,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
    pub enum CliDifficulty {
        Easy,
        Normal,
        Hard,
    }

    impl From<CliDifficulty> for Difficulty {
        fn from(value: CliDifficulty) -> Self {
            match value {
                CliDifficulty::Easy => Difficulty::Easy,
                CliDifficulty::Normal => Difficulty::Normal,
                CliDifficulty::Hard => Difficulty::Hard,
            }
        }
    }

    #[derive(Default)]
    struct Console {
        result: Option<FinalScore>,
        last_wave: u32,
    }

    impl SessionObserver for Console {
        fn on_snapshot(&mut self, snapshot: &HudSnapshot) {
            if snapshot.wave != self.last_wave {
                self.last_wave = snapshot.wave;
                println!(
                    "wave {:>2}  score {:>7}  health {:>3.0}/{:.0}",
                    snapshot.wave, snapshot.score, snapshot.health, snapshot.max_health
                );
            }
        }

        fn on_game_over(&mut self, result: FinalScore) {
            self.result = Some(result);
        }
    }

    /// Aim at the nearest enemy, or collect a pickup when nothing threatens
    fn autopilot_target(state: &GameState) -> Option<Vec2> {
        let center = state.center();
        let nearest = state
            .enemies
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(center)
                    .total_cmp(&b.pos.distance_squared(center))
            })
            .map(|e| e.pos);
        nearest.or_else(|| state.power_ups.first().map(|p| p.pos))
    }

    pub fn run(cli: Cli) -> Result<()> {
        let storage = match Storage::platform() {
            Ok(storage) => storage,
            Err(e) => {
                log::warn!("Persistent storage unavailable, using memory: {}", e);
                Storage::memory()
            }
        };

        let mut settings = Settings::load(&storage);
        if let Some(difficulty) = cli.difficulty {
            settings.difficulty = difficulty.into();
        }
        settings.sound_enabled = !cli.no_sound;

        let seed = cli.seed.unwrap_or_else(|| now_ms() as u64);
        let mut session = Session::new(settings, seed);
        let console = Rc::new(RefCell::new(Console::default()));
        let cues = Rc::new(RefCell::new(CueQueue::new()));
        session.add_observer(Box::new(console.clone()));
        session.set_audio(Box::new(cues.clone()));

        let mut played_cues = 0;
        let mut audio_secs = 0.0f32;
        for _ in 0..cli.frames {
            if !session.is_running() {
                break;
            }
            if let Some(target) = autopilot_target(session.state()) {
                session.pointer_moved(target);
                session.trigger();
            }
            session.advance(SIM_DT);
            for cue in cues.borrow_mut().drain() {
                played_cues += 1;
                audio_secs += cue.tone().duration;
            }
        }
        session.stop();

        let state = session.state();
        let result = console.borrow().result.unwrap_or(FinalScore {
            score: state.score,
            wave: state.wave,
        });
        println!(
            "{} after {} frames (seed {}): score {} on wave {} ({} kills, {} sound cues, {:.1}s of tones)",
            if state.is_alive() { "Survived" } else { "Fell" },
            state.frame,
            seed,
            result.score,
            result.wave,
            state.total_kills,
            played_cues,
            audio_secs
        );

        let name = cli
            .name
            .or_else(|| highscores::load_player_name(&storage))
            .unwrap_or_else(|| "Autopilot".to_string());
        highscores::save_player_name(&storage, &name)
            .with_context(|| format!("failed to save player name `{name}`"))?;

        let mut board = HighScores::load(&storage);
        if let Some(rank) = board.add_score(&name, result.score, result.wave, now_ms()) {
            println!("New high score! Rank #{}", rank);
            board.save(&storage).context("failed to save high scores")?;
        }

        let now = now_ms();
        for (i, entry) in board.entries.iter().enumerate() {
            println!(
                "{:>2}. {:<16} {:>7}  wave {:>2}  {}",
                i + 1,
                entry.name,
                entry.score,
                entry.wave,
                highscores::format_date(entry.timestamp, now)
            );
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    let cli = headless::Cli::parse();
    log::info!("Bow Defense (headless) starting...");
    headless::run(cli)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web build embeds the library; this binary has nothing to do there
}
