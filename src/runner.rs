//! Headless autopilot runs
//!
//! Plays the game without a browser: the autopilot supplies input, events
//! are tallied instead of played, and game overs restart the level.

use serde::Serialize;

use crate::platform::{EventSink, dispatch};
use crate::sim::{
    CharacterId, GamePhase, GameState, SoundEffect, TickInput, Viewport, final_decision,
    restart_level, select_character, tick,
};
use crate::ui::UiCommand;

/// Parameters of one headless run
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub seed: u64,
    pub max_frames: u64,
    pub character: CharacterId,
    /// Screen aspect ratio (width / height)
    pub aspect: f32,
    /// Answer given on the victory screen
    pub fire_everyone: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_frames: 60 * 60 * 3,
            character: CharacterId::default(),
            aspect: 16.0 / 9.0,
            fire_everyone: true,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct RunMetrics {
    pub jumps: u32,
    pub shots: u32,
    pub hits: u32,
    pub bosses_defeated: u32,
    pub tones: u32,
    pub ui_commands: u32,
    pub host_closed: bool,
}

impl EventSink for RunMetrics {
    fn sound(&mut self, effect: SoundEffect) {
        match effect {
            SoundEffect::Jump => self.jumps += 1,
            SoundEffect::Shoot => self.shots += 1,
            SoundEffect::Hit => self.hits += 1,
            SoundEffect::BossDeath => self.bosses_defeated += 1,
        }
    }

    fn tone(&mut self, _freq_hz: f32, _duration_s: f32) {
        self.tones += 1;
    }

    fn ui(&mut self, _command: UiCommand) {
        self.ui_commands += 1;
    }

    fn close_host(&mut self) {
        self.host_closed = true;
    }
}

/// Outcome of a headless run
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub character: CharacterId,
    pub frames_run: u64,
    pub final_phase: GamePhase,
    pub final_level: u8,
    pub final_hp: u8,
    pub game_overs: u32,
    pub victory: bool,
    pub metrics: RunMetrics,
}

/// Play until victory or until `max_frames` driver ticks have passed
pub fn run(config: &RunConfig) -> RunSummary {
    let mut state = GameState::new(config.seed);
    state.resize(Viewport::from_aspect(config.aspect));
    select_character(&mut state, config.character);

    let mut input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let mut metrics = RunMetrics::default();
    let mut game_overs = 0;
    let mut victory = false;
    let mut frames_run = 0;

    while frames_run < config.max_frames {
        tick(&mut state, &mut input);
        frames_run += 1;

        match state.phase {
            GamePhase::GameOver => {
                game_overs += 1;
                log::debug!("Game over #{game_overs} on level {}", state.level);
                restart_level(&mut state);
            }
            GamePhase::Victory if !victory => {
                victory = true;
                final_decision(&mut state, config.fire_everyone);
            }
            _ => {}
        }
        dispatch(state.drain_events(), &mut metrics);

        if metrics.host_closed || (victory && config.fire_everyone) {
            break;
        }
    }

    log::info!(
        "Run finished after {frames_run} frames: level {}, {game_overs} game overs",
        state.level
    );

    RunSummary {
        seed: config.seed,
        character: config.character,
        frames_run,
        final_phase: state.phase,
        final_level: state.level,
        final_hp: state.hp,
        game_overs,
        victory,
        metrics,
    }
}
