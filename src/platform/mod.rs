//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input mapping (keyboard codes to intents)
//! - Delivering core events to sound, UI and host collaborators
//! - The browser shell itself (`web`, wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{GameEvent, SoundEffect, TickInput};
use crate::ui::UiCommand;

/// Fixed-timestep accumulator for the frame driver
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    /// Add elapsed wall time and return how many simulation ticks to run.
    ///
    /// Never more than `MAX_SUBSTEPS`; leftover backlog is capped so a slow
    /// tab drops time instead of falling further behind every frame.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        self.accumulator = self.accumulator.min(SIM_DT * MAX_SUBSTEPS as f32);
        steps
    }

    /// Time carried into the next frame
    pub fn backlog(&self) -> f32 {
        self.accumulator
    }
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Jump,
    Shoot,
}

impl Intent {
    /// Map a `KeyboardEvent.code` to an intent
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "Space" | "ArrowUp" => Some(Intent::Jump),
            "KeyZ" | "Enter" | "ShiftLeft" | "ShiftRight" | "AltLeft" => Some(Intent::Shoot),
            _ => None,
        }
    }

    /// Buffer the intent until the core consumes it
    pub fn apply(self, input: &mut TickInput) {
        match self {
            Intent::Jump => input.jump = true,
            Intent::Shoot => input.shoot = true,
        }
    }
}

/// Receives the core's outbound events
pub trait EventSink {
    fn sound(&mut self, effect: SoundEffect);
    fn tone(&mut self, freq_hz: f32, duration_s: f32);
    fn music_start(&mut self, _level: u8) {}
    fn music_stop(&mut self) {}
    fn ui(&mut self, command: UiCommand);
    fn close_host(&mut self);
}

/// Hand every event to the sink, in emission order
pub fn dispatch(events: Vec<GameEvent>, sink: &mut dyn EventSink) {
    for event in events {
        match event {
            GameEvent::Sound(effect) => sink.sound(effect),
            GameEvent::Tone {
                freq_hz,
                duration_s,
            } => sink.tone(freq_hz, duration_s),
            GameEvent::MusicStart { level } => sink.music_start(level),
            GameEvent::MusicStop => sink.music_stop(),
            GameEvent::Ui(command) => sink.ui(command),
            GameEvent::CloseHost => sink.close_host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Screen;

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
    }

    impl EventSink for Recorder {
        fn sound(&mut self, effect: SoundEffect) {
            self.log.push(format!("sound {effect:?}"));
        }
        fn tone(&mut self, freq_hz: f32, _duration_s: f32) {
            self.log.push(format!("tone {freq_hz}"));
        }
        fn ui(&mut self, command: UiCommand) {
            self.log.push(format!("ui {command:?}"));
        }
        fn close_host(&mut self) {
            self.log.push("close".into());
        }
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Intent::from_key_code("Space"), Some(Intent::Jump));
        assert_eq!(Intent::from_key_code("ArrowUp"), Some(Intent::Jump));
        assert_eq!(Intent::from_key_code("KeyZ"), Some(Intent::Shoot));
        assert_eq!(Intent::from_key_code("AltLeft"), Some(Intent::Shoot));
        assert_eq!(Intent::from_key_code("AltRight"), None);
        assert_eq!(Intent::from_key_code("KeyA"), None);
    }

    #[test]
    fn test_intent_buffers_input() {
        let mut input = TickInput::default();
        Intent::Shoot.apply(&mut input);
        assert!(input.shoot);
        assert!(!input.jump);
    }

    #[test]
    fn test_fixed_step_runs_whole_ticks() {
        let mut step = FixedStep::default();
        assert_eq!(step.advance(SIM_DT * 2.5), 2);
        assert!(step.backlog() < SIM_DT);
    }

    #[test]
    fn test_fixed_step_backlog_is_bounded() {
        let mut step = FixedStep::default();
        // Roughly 8 fps for a long while
        for _ in 0..1000 {
            assert_eq!(step.advance(0.125), MAX_SUBSTEPS);
            assert!(step.backlog() <= SIM_DT * MAX_SUBSTEPS as f32);
        }
        // Back to full speed: catches up within a few frames, then one tick per frame
        let mut frames = 0;
        while step.advance(SIM_DT) > 1 {
            frames += 1;
            assert!(frames < 10, "backlog never drained");
        }
        assert!(step.backlog() < 2.0 * SIM_DT);
    }

    #[test]
    fn test_dispatch_keeps_order() {
        let mut sink = Recorder::default();
        dispatch(
            vec![
                GameEvent::Sound(SoundEffect::Hit),
                GameEvent::MusicStop,
                GameEvent::Ui(UiCommand::Show(Screen::GameOver)),
                GameEvent::CloseHost,
            ],
            &mut sink,
        );
        assert_eq!(
            sink.log,
            vec!["sound Hit", "ui Show(GameOver)", "close"]
        );
    }
}
