//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. One call
//! is one 60 Hz frame. Within a frame the order is fixed: deferred actions,
//! player, entities, boss, spawner, collisions, phase transitions.

use super::collision::resolve_collisions;
use super::entity::{Boss, BossPose, Entity};
use super::level::{self, show_victory};
use super::schedule::Deferred;
use super::spawner::spawn_obstacles;
use super::state::{Ending, GameEvent, GamePhase, GameState, SoundEffect};
use crate::consts::*;
use crate::ui::{Screen, TextSlot, UiCommand};

use glam::Vec2;
use rand::Rng;

/// Buffered input intents
///
/// Handlers set the flags; the core clears each one when it acts on it, so a
/// press is never lost between frames and never acted on twice.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump requested (keyboard, tap or jump button)
    pub jump: bool,
    /// Shoot requested
    pub shoot: bool,
    /// Demo mode - a simple autopilot plays the game
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &mut TickInput) {
    state.clock += 1;
    run_deferred(state);

    if !state.phase.is_active() {
        return;
    }

    if input.autopilot {
        autopilot(state, input);
    }

    // Player physics and buffered actions
    let update = match state.player.as_mut() {
        Some(player) => player.update(input, &state.viewport),
        None => Default::default(),
    };
    if update.jumped {
        state.emit(GameEvent::Sound(SoundEffect::Jump));
    }
    if let Some(shot) = update.fired {
        state.emit(GameEvent::Sound(SoundEffect::Shoot));
        state.entities.push(Entity::Projectile(shot));
    }

    let viewport = state.viewport;
    for entity in &mut state.entities {
        entity.update(&viewport);
    }

    let ticket = state.boss.as_mut().and_then(|b| b.update(&viewport));
    if let Some(ticket) = ticket {
        state.emit(GameEvent::Sound(SoundEffect::Shoot));
        state.entities.push(Entity::Projectile(ticket));
        state.schedule(BOSS_ATTACK_POSE_FRAMES, Deferred::BossIdle);
    }

    state.level_time += 1;
    state.grace_period = state.grace_period.saturating_sub(1);

    if state.boss.is_none() {
        spawn_obstacles(state);
    }

    resolve_collisions(state);
    check_boss_arrival(state);

    state.prune_entities();
    state.frame += 1;
}

/// Bring in the level boss once enough time has passed
fn check_boss_arrival(state: &mut GameState) {
    if state.phase != GamePhase::Play
        || state.boss.is_some()
        || state.level_time <= BOSS_TIME_THRESHOLD
    {
        return;
    }

    state.phase = GamePhase::Boss;
    state.entities.retain(Entity::is_player_projectile);
    let boss = Boss::new(state.level, &state.viewport);
    log::info!(
        "Boss {} arrives on level {} with {} hp",
        boss.name(),
        state.level,
        boss.hp
    );
    state.boss = Some(boss);
}

/// Run every deferred action that has come due, dropping stale ones
fn run_deferred(state: &mut GameState) {
    for due in state.scheduler.take_due(state.clock) {
        if due.epoch != state.epoch {
            log::trace!("Discarding stale {:?} from epoch {}", due.action, due.epoch);
            continue;
        }
        apply_deferred(state, due.action);
    }
}

fn apply_deferred(state: &mut GameState, action: Deferred) {
    match action {
        Deferred::BossIdle => {
            if let Some(boss) = state.boss.as_mut() {
                boss.pose = BossPose::Idle;
            }
        }
        Deferred::ShakeReset => state.shake = Vec2::ZERO,
        Deferred::MusicNote { generation } => play_music_note(state, generation),
        Deferred::TransitionDwell => {
            if state.level < MAX_LEVEL {
                let level = state.level;
                state.ui(UiCommand::SetText(
                    TextSlot::TransitionTitle,
                    "ОТЛИЧНАЯ РАБОТА!".into(),
                ));
                state.ui(UiCommand::SetText(
                    TextSlot::TransitionBody,
                    format!(
                        "Таски {level} линии разгребли,\nтеперь ты ротирован на {} линию",
                        level + 1
                    ),
                ));
                state.schedule(TRANSITION_DWELL_FRAMES, Deferred::LoadNextLevel);
            } else {
                state.ui(UiCommand::Hide(Screen::Transition));
                show_victory(state);
            }
        }
        Deferred::LoadNextLevel => {
            let next = state.level + 1;
            level::start_level(state, next);
            state.ui(UiCommand::FadeOut(Screen::Transition));
            state.schedule(TRANSITION_FADE_FRAMES, Deferred::HideTransition);
        }
        Deferred::HideTransition => state.ui(UiCommand::Hide(Screen::Transition)),
        Deferred::EndingJitter => {
            if state.ending != Some(Ending::Fired) {
                return;
            }
            state.jitter_flip = !state.jitter_flip;
            let x = if state.jitter_flip {
                SHAKE_OFFSET
            } else {
                -SHAKE_OFFSET
            };
            let rng = state.rng();
            let y = rng.random_range(0.0..ENDING_JITTER_Y);
            let red_background = rng.random_bool(0.5);
            let red_text = rng.random_bool(0.5);
            state.ui(UiCommand::EndingJitter {
                offset: Vec2::new(x, y),
                red_background,
                red_text,
            });
            state.schedule(ENDING_JITTER_FRAMES, Deferred::EndingJitter);
        }
        Deferred::CloseHost => {
            log::info!("Closing host application");
            // Stops the jitter loop
            state.ending = None;
            state.emit(GameEvent::CloseHost);
        }
    }
}

fn play_music_note(state: &mut GameState, generation: u32) {
    let active = state.phase.is_active();
    let Some(music) = state.music.as_mut() else {
        return;
    };
    if music.generation != generation {
        return;
    }

    let period = music.track.period_frames;
    if active {
        let duration_s = music.track.note_duration;
        let freq_hz = music.advance();
        state.emit(GameEvent::Tone {
            freq_hz,
            duration_s,
        });
    }
    state.schedule(period, Deferred::MusicNote { generation });
}

/// Distance ahead of the player at which the autopilot jumps an obstacle
const AUTOPILOT_OBSTACLE_LOOKAHEAD: f32 = 60.0;
/// Same for boss tickets, which close in faster
const AUTOPILOT_TICKET_LOOKAHEAD: f32 = 110.0;

/// Demo-mode input: jump hazards as they approach, keep firing
fn autopilot(state: &GameState, input: &mut TickInput) {
    let Some(player) = state.player.as_ref() else {
        return;
    };
    let front = player.pos.x + player.size.x;

    let threatened = state
        .entities
        .iter()
        .filter(|e| e.is_active() && !e.is_player_projectile())
        .any(|e| {
            let lookahead = match e {
                Entity::Obstacle(_) => AUTOPILOT_OBSTACLE_LOOKAHEAD,
                Entity::Projectile(_) => AUTOPILOT_TICKET_LOOKAHEAD,
            };
            let gap = e.pos().x - front;
            (0.0..=lookahead).contains(&gap)
        });

    if threatened && player.grounded {
        input.jump = true;
    }
    input.shoot = true;
}
