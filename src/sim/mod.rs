//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Deferred work goes through the scheduler, never wall-clock timers
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod geometry;
pub mod level;
pub mod music;
pub mod schedule;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, resolve_collisions, take_damage};
pub use entity::{
    AnimState, Boss, BossPose, CharacterId, Entity, Obstacle, ObstacleKind, Player, Projectile,
    ProjectileSource, ProjectileVariant,
};
pub use geometry::Rect;
pub use level::{
    boss_defeated, final_decision, restart_game, restart_level, select_character, show_victory,
    start_level,
};
pub use music::{MusicPlayer, MusicTrack};
pub use schedule::{Deferred, Scheduler};
pub use spawner::{has_spawn_room, spawn_obstacles};
pub use state::{Ending, GameEvent, GamePhase, GameState, SoundEffect, Viewport};
pub use tick::{TickInput, tick};
