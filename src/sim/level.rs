//! Level flow and session operations
//!
//! Everything that moves the game between phases lives here: level start,
//! boss defeat, victory, the two endings and the restart paths. The frame
//! driver and the UI buttons both call into these functions.

use glam::Vec2;

use super::entity::{CharacterId, Player};
use super::music::MusicPlayer;
use super::schedule::Deferred;
use super::state::{Ending, GameEvent, GamePhase, GameState, SoundEffect};
use crate::consts::*;
use crate::ui::{self, Screen, TextSlot, UiCommand};

/// Pick a hero from the menu and start the first level
pub fn select_character(state: &mut GameState, character: CharacterId) {
    log::info!("Selected {}", character.display_name());
    state.character = character;
    state.ui(UiCommand::Hide(Screen::CharacterSelect));
    start_level(state, 1);
}

/// Reset the world and begin level `level`
///
/// Hit points, level time, grace period and entities are all reset; any
/// deferred work from the previous level is invalidated.
pub fn start_level(state: &mut GameState, level: u8) {
    debug_assert!((1..=MAX_LEVEL).contains(&level), "level {level} out of range");

    state.advance_epoch();
    state.level = level;
    state.hp = MAX_HP;
    state.level_time = 0;
    state.grace_period = GRACE_PERIOD_FRAMES;
    state.entities.clear();
    state.boss = None;
    state.shake = Vec2::ZERO;
    state.phase = GamePhase::Play;

    state.ui(UiCommand::Show(Screen::Hud));
    if state.touch_controls {
        state.ui(UiCommand::Show(Screen::MobileControls));
    }
    state.ui(UiCommand::SetText(TextSlot::LevelLabel, ui::level_label(level)));
    state.ui(UiCommand::SetText(TextSlot::Hearts, ui::hearts(state.hp)));

    state.player = Some(Player::new(state.character, &state.viewport));
    start_music(state);

    log::info!("Level {} started ({})", level, ui::level_title(level));
}

/// Try the current level again after a game over
pub fn restart_level(state: &mut GameState) {
    state.ui(UiCommand::Hide(Screen::GameOver));
    let level = state.level;
    start_level(state, level);
}

/// Back to the character select menu
pub fn restart_game(state: &mut GameState) {
    for screen in Screen::ALL {
        if screen != Screen::CharacterSelect {
            state.ui(UiCommand::Hide(screen));
        }
    }
    state.ui(UiCommand::ResetOpacity);

    stop_music(state);
    state.advance_epoch();
    state.scheduler.clear();

    state.phase = GamePhase::Menu;
    state.ending = None;
    state.player = None;
    state.entities.clear();
    state.boss = None;
    state.shake = Vec2::ZERO;
    state.ui(UiCommand::Show(Screen::CharacterSelect));

    log::info!("Back to character select");
}

/// Begin the boss-defeat sequence: fade in the transition panel and wait
pub fn boss_defeated(state: &mut GameState) {
    log::info!("Boss of level {} defeated", state.level);
    state.phase = GamePhase::BossDead;
    state.boss = None;
    state.emit(GameEvent::Sound(SoundEffect::BossDeath));
    stop_music(state);
    state.ui(UiCommand::FadeIn(Screen::Transition));
    state.schedule(TRANSITION_FADE_FRAMES, Deferred::TransitionDwell);
}

/// All levels cleared
pub fn show_victory(state: &mut GameState) {
    log::info!("Victory as {}", state.character.display_name());
    state.phase = GamePhase::Victory;
    state.ui(UiCommand::Show(Screen::Victory));
    state.ui(UiCommand::Hide(Screen::Hud));
    state.ui(UiCommand::Hide(Screen::MobileControls));
    state.ui(UiCommand::SetVictoryPortrait(state.character));
}

/// Answer the question asked on the victory screen
///
/// `fired_everyone == true` leads to the resignation ending, `false` to the
/// punitive ending that shakes the page and closes the host application.
/// Ignored outside the victory phase.
pub fn final_decision(state: &mut GameState, fired_everyone: bool) {
    if state.phase != GamePhase::Victory || state.ending.is_some() {
        log::warn!("Final decision ignored in phase {:?}", state.phase);
        return;
    }

    state.ui(UiCommand::Hide(Screen::Victory));
    if fired_everyone {
        log::info!("Ending: resignation");
        state.ending = Some(Ending::Resignation);
        state.ui(UiCommand::Show(Screen::Resignation));
        let name = state.character.display_name().to_string();
        state.ui(UiCommand::SetText(TextSlot::ResignationName, name));
    } else {
        log::info!("Ending: fired");
        state.ending = Some(Ending::Fired);
        state.ui(UiCommand::Show(Screen::TerminalEnding));
        state.emit(GameEvent::Sound(SoundEffect::BossDeath));
        state.emit(GameEvent::Tone {
            freq_hz: 100.0,
            duration_s: 2.0,
        });
        state.emit(GameEvent::Tone {
            freq_hz: 900.0,
            duration_s: 0.5,
        });
        state.schedule(ENDING_JITTER_FRAMES, Deferred::EndingJitter);
        state.schedule(ENDING_CLOSE_FRAMES, Deferred::CloseHost);
    }
}

/// Start the current level's track, replacing whatever was playing
pub(crate) fn start_music(state: &mut GameState) {
    state.music_generation = state.music_generation.wrapping_add(1);
    let player = MusicPlayer::new(state.level, state.music_generation);
    let period = player.track.period_frames;
    state.music = Some(player);
    state.emit(GameEvent::MusicStart { level: state.level });
    state.schedule(
        period,
        Deferred::MusicNote {
            generation: state.music_generation,
        },
    );
}

pub(crate) fn stop_music(state: &mut GameState) {
    if state.music.take().is_some() {
        state.emit(GameEvent::MusicStop);
    }
}
