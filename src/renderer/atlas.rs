//! Sprite sheet layout
//!
//! Cells are normalized so the sheets can be swapped for any resolution.

use super::draw::{SheetId, SubRect};
use crate::sim::{
    AnimState, BossPose, CharacterId, ObstacleKind, Projectile, ProjectileSource,
    ProjectileVariant,
};

/// Character sheet quadrants
pub const CHARACTER_RUN: SubRect = SubRect::new(0.0, 0.0, 0.5, 0.5);
pub const CHARACTER_JUMP: SubRect = SubRect::new(0.5, 0.0, 0.5, 0.5);
pub const CHARACTER_HIT: SubRect = SubRect::new(0.0, 0.5, 0.5, 0.5);
pub const CHARACTER_VICTORY: SubRect = SubRect::new(0.5, 0.5, 0.5, 0.5);

/// Boss rows, top to bottom
const BOSS_ROWS: [f32; 3] = [0.0, 0.33, 0.66];
const BOSS_CELL_W: f32 = 0.5;
const BOSS_CELL_H: f32 = 0.33;

// Projectiles share the bottom row of the obstacle sheet
const PROJECTILE_ROW_Y: f32 = 0.75;
const PROJECTILE_CELL: f32 = 0.2;

pub fn character(anim: AnimState) -> SubRect {
    match anim {
        AnimState::Run => CHARACTER_RUN,
        AnimState::Jump => CHARACTER_JUMP,
        AnimState::Hit => CHARACTER_HIT,
    }
}

/// Boss cell for a level (1..=3); out-of-range levels use the first row
pub fn boss(level: u8, pose: BossPose) -> SubRect {
    let row = BOSS_ROWS
        .get(usize::from(level.saturating_sub(1)))
        .copied()
        .unwrap_or(BOSS_ROWS[0]);
    let x = match pose {
        BossPose::Idle => 0.0,
        BossPose::Attack => 0.5,
    };
    SubRect::new(x, row, BOSS_CELL_W, BOSS_CELL_H)
}

pub fn obstacle(kind: ObstacleKind) -> SubRect {
    match kind {
        ObstacleKind::Atm => SubRect::new(0.1, 0.0, 0.8, 0.4),
        ObstacleKind::Chaos => SubRect::new(0.0, 0.4, 0.33, 0.3),
        ObstacleKind::Cone => SubRect::new(0.66, 0.4, 0.33, 0.3),
    }
}

fn projectile_cell(column: u8) -> SubRect {
    SubRect::new(
        f32::from(column) * PROJECTILE_CELL,
        PROJECTILE_ROW_Y,
        PROJECTILE_CELL,
        PROJECTILE_CELL,
    )
}

/// Cell for a projectile. Player shots are drawn per character; the ticket
/// reuses the last boss icon.
pub fn projectile(projectile: &Projectile) -> SubRect {
    let column = match (projectile.source, projectile.variant) {
        (ProjectileSource::Player, ProjectileVariant::Character(CharacterId::Dania)) => 0,
        (ProjectileSource::Player, ProjectileVariant::Character(CharacterId::Tatiana)) => 1,
        (ProjectileSource::Player, _) => 0,
        (ProjectileSource::Boss, ProjectileVariant::Boss(1)) => 2,
        (ProjectileSource::Boss, ProjectileVariant::Boss(2)) => 3,
        (ProjectileSource::Boss, _) => 4,
    };
    projectile_cell(column)
}

/// Sheet a background level draws from
pub fn background_sheet(level: u8) -> SheetId {
    SheetId::Background(level.clamp(1, 3))
}
