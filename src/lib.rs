//! Bank Runner - a side-scrolling office runner with boss fights
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, phases)
//! - `renderer`: Backend-agnostic draw lists plus the browser canvas backend
//! - `platform`: Browser shell (input, UI panels, host app) and collaborator traits
//! - `audio`: Web Audio sound effects and music tones
//! - `settings`: Player preferences supplied by the host page
//! - `runner`: Headless autopilot runs (native CLI and tests)
//! - `ui`: Panel and text intents emitted by the simulation

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod ui;

pub use settings::Settings;

/// Game configuration constants
///
/// All timings are in simulation frames (60 per second).
pub mod consts {
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation frames per second
    pub const FRAMES_PER_SECOND: u32 = 60;
    /// Maximum substeps per display refresh to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Virtual resolution: fixed height, width follows the screen aspect
    pub const VIRTUAL_HEIGHT: f32 = 720.0;
    pub const DEFAULT_WIDTH: f32 = 1280.0;

    /// World physics (per frame)
    pub const GRAVITY: f32 = 0.4;
    pub const JUMP_FORCE: f32 = -13.0;
    /// Distance from the bottom of the viewport to the ground line
    pub const GROUND_MARGIN: f32 = 100.0;
    /// Horizontal scroll speed of the world
    pub const SCROLL_SPEED: f32 = 4.0;
    /// Background scrolls at this fraction of the world speed
    pub const PARALLAX_FACTOR: f32 = 0.5;

    /// Player
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 80.0;
    pub const SHOOT_COOLDOWN_FRAMES: u32 = 15;
    pub const HIT_INVINCIBILITY_FRAMES: u32 = 60;
    pub const BLINK_CADENCE_FRAMES: u64 = 4;
    pub const BLINK_ALPHA: f32 = 0.5;
    pub const PLAYER_PROJECTILE_SPEED: f32 = 10.0;
    pub const MAX_HP: u8 = 3;

    /// Projectiles
    pub const PROJECTILE_SIZE: f32 = 30.0;
    /// Projectiles and obstacles live this far past the screen edges
    pub const OFFSCREEN_MARGIN: f32 = 100.0;

    /// Obstacles
    pub const OBSTACLE_SPAWN_OFFSET: f32 = 50.0;
    /// Obstacles sit slightly below the ground line so they don't float
    pub const OBSTACLE_SINK: f32 = 15.0;

    /// Spawner gates
    pub const MIN_SPAWN_GAP: f32 = 400.0;
    pub const SPAWN_INTERVAL_FRAMES: u64 = 60;
    pub const SPAWN_CHANCE: f64 = 0.4;

    /// Hitbox insets (left, top, right, bottom)
    pub const PLAYER_HITBOX_INSET: [f32; 4] = [20.0, 20.0, 20.0, 0.0];
    pub const ENTITY_HITBOX_INSET: f32 = 10.0;

    /// Boss
    pub const BOSS_SIZE: f32 = 150.0;
    pub const BOSS_RIGHT_OFFSET: f32 = 200.0;
    pub const BOSS_FLOAT_STEP: f32 = 0.05;
    pub const BOSS_FLOAT_AMPLITUDE: f32 = 50.0;
    pub const BOSS_BASE_COOLDOWN: i32 = 150;
    pub const BOSS_COOLDOWN_PER_LEVEL: i32 = 10;
    pub const BOSS_BASE_SHOT_SPEED: f32 = 5.0;
    pub const BOSS_SHOT_SPEED_PER_LEVEL: f32 = 1.5;
    pub const BOSS_ATTACK_POSE_FRAMES: u64 = 30;
    pub const BOSS_HP_BAR_HEIGHT: f32 = 10.0;
    pub const BOSS_HP_BAR_OFFSET: f32 = 20.0;

    /// Level flow
    pub const MAX_LEVEL: u8 = 3;
    pub const BOSS_TIME_THRESHOLD: u32 = 2000;
    pub const GRACE_PERIOD_FRAMES: u32 = 180;

    /// Feedback and transitions (scheduler clock frames)
    pub const SHAKE_OFFSET: f32 = 5.0;
    pub const SHAKE_FRAMES: u64 = 3;
    pub const TRANSITION_FADE_FRAMES: u64 = 30;
    pub const TRANSITION_DWELL_FRAMES: u64 = 180;
    pub const ENDING_JITTER_FRAMES: u64 = 3;
    pub const ENDING_CLOSE_FRAMES: u64 = 150;
    pub const ENDING_JITTER_Y: f32 = 10.0;
}
