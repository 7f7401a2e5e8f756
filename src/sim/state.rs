//! Game state and core simulation types
//!
//! One [`GameState`] is owned by the frame driver. Every subsystem receives it
//! by mutable reference; nothing in the simulation is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Boss, CharacterId, Entity, Obstacle, Player};
use super::music::MusicPlayer;
use super::schedule::{Deferred, Scheduler};
use crate::consts::*;
use crate::ui::UiCommand;

/// Coarse phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Character select, nothing simulated
    Menu,
    /// Running, obstacles spawning
    Play,
    /// Boss fight
    Boss,
    /// Boss defeated, transition in progress
    BossDead,
    /// All levels cleared
    Victory,
    /// Out of hit points
    GameOver,
}

impl GamePhase {
    /// Phases in which the world is simulated and drawn
    pub fn is_active(&self) -> bool {
        matches!(self, GamePhase::Play | GamePhase::Boss)
    }
}

/// The two terminal endings offered after victory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ending {
    /// The hero resigns
    Resignation,
    /// The hero gets fired; the app shakes and closes
    Fired,
}

/// Named sound events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    Jump,
    Shoot,
    Hit,
    BossDeath,
}

/// Everything the core tells its collaborators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Sound(SoundEffect),
    /// A single synthesized square-wave tone
    Tone { freq_hz: f32, duration_s: f32 },
    MusicStart { level: u8 },
    MusicStop,
    Ui(UiCommand),
    /// Ask the host application to close
    CloseHost,
}

/// Virtual screen: fixed height, width follows the aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, VIRTUAL_HEIGHT)
    }
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Viewport for a screen aspect ratio (width / height)
    pub fn from_aspect(aspect: f32) -> Self {
        Self::new((VIRTUAL_HEIGHT * aspect).floor(), VIRTUAL_HEIGHT)
    }

    /// Y of the ground surface
    #[inline]
    pub fn ground_line(&self) -> f32 {
        self.height - GROUND_MARGIN
    }

    /// Top Y at which an object of height `h` stands on the ground
    #[inline]
    pub fn ground_y(&self, h: f32) -> f32 {
        self.ground_line() - h
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    rng: Pcg32,
    pub phase: GamePhase,
    /// Current level (1..=3)
    pub level: u8,
    /// Simulated frames (only advances in active phases)
    pub frame: u64,
    /// Frames spent in the current level
    pub level_time: u32,
    /// Frames left during which no obstacles spawn
    pub grace_period: u32,
    /// Player hit points
    pub hp: u8,
    pub character: CharacterId,
    pub player: Option<Player>,
    /// Obstacles and projectiles, in spawn order
    pub entities: Vec<Entity>,
    pub boss: Option<Boss>,
    pub viewport: Viewport,
    /// Whether on-screen touch controls are shown during play
    pub touch_controls: bool,
    /// Damage screen-shake translation
    pub shake: Vec2,
    pub ending: Option<Ending>,
    /// Scheduler clock (advances on every driver tick, in every phase)
    pub clock: u64,
    /// Bumped on level start / restart to invalidate deferred actions
    pub epoch: u32,
    #[serde(skip)]
    pub(crate) scheduler: Scheduler,
    #[serde(skip)]
    pub(crate) music: Option<MusicPlayer>,
    #[serde(skip)]
    pub(crate) music_generation: u32,
    #[serde(skip)]
    pub(crate) jitter_flip: bool,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game sitting at the character select menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            level: 1,
            frame: 0,
            level_time: 0,
            grace_period: 0,
            hp: MAX_HP,
            character: CharacterId::default(),
            player: None,
            entities: Vec::new(),
            boss: None,
            viewport: Viewport::default(),
            touch_controls: false,
            shake: Vec2::ZERO,
            ending: None,
            clock: 0,
            epoch: 0,
            scheduler: Scheduler::new(),
            music: None,
            music_generation: 0,
            jitter_flip: false,
            events: Vec::new(),
        }
    }

    /// Gameplay RNG
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn ui(&mut self, command: UiCommand) {
        self.events.push(GameEvent::Ui(command));
    }

    /// Events emitted since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand all pending events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queue a deferred action `delay` clock ticks from now, in the current epoch
    pub fn schedule(&mut self, delay: u64, action: Deferred) {
        let due = self.clock + delay.max(1);
        self.scheduler.schedule(due, self.epoch, action);
    }

    /// Number of deferred actions waiting
    pub fn pending_deferred(&self) -> usize {
        self.scheduler.len()
    }

    pub fn is_scheduled(&self, action: Deferred) -> bool {
        self.scheduler.contains(action)
    }

    /// Invalidate everything queued so far
    pub(crate) fn advance_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Active obstacles, in spawn order
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.entities
            .iter()
            .filter(|e| e.is_active())
            .filter_map(Entity::as_obstacle)
    }

    /// Change the virtual viewport, keeping grounded actors on the ground
    pub fn resize(&mut self, viewport: Viewport) {
        if self.viewport == viewport {
            return;
        }
        log::debug!(
            "Viewport {}x{} -> {}x{}",
            self.viewport.width,
            self.viewport.height,
            viewport.width,
            viewport.height
        );
        self.viewport = viewport;
        if let Some(player) = &mut self.player {
            player.reseat(&self.viewport);
            if let Some(boss) = &mut self.boss {
                boss.reseat(&self.viewport);
            }
        }
    }

    /// Drop inactive entities
    pub fn prune_entities(&mut self) {
        self.entities.retain(Entity::is_active);
    }
}
