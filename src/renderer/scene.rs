//! Frame composition
//!
//! Turns a [`GameState`] into a [`DrawList`]. Draw order: background, ground,
//! player, entities, boss. Outside the play and boss phases the frame is
//! empty (the canvas is just cleared).

use super::atlas;
use super::draw::{Color, DrawList, SheetId, SheetSource, SubRect};
use crate::consts::*;
use crate::sim::{Entity, GameState, Rect};

/// Floor tile spacing in pixels
const GROUND_TILE: f32 = 100.0;
const GROUND_STRIP_WIDTH: f32 = 5.0;
const GROUND_BORDER: f32 = 4.0;

/// Ground base and accent colours per level
pub fn ground_palette(level: u8) -> (Color, Color) {
    match level {
        1 => (Color(0xdbe4eb), Color(0xbdc3c7)),
        2 => (Color(0x2c3e50), Color(0x34495e)),
        _ => (Color(0x0b1e16), Color(0x1e382b)),
    }
}

/// Build the draw list for the current frame
pub fn build_frame(state: &GameState, sheets: &dyn SheetSource) -> DrawList {
    if !state.phase.is_active() {
        return DrawList::default();
    }

    let mut list = DrawList::new(state.shake);
    draw_background(&mut list, state, sheets);
    draw_ground(&mut list, state);

    if let Some(player) = &state.player {
        let alpha = if player.is_blink_frame(state.frame) {
            BLINK_ALPHA
        } else {
            1.0
        };
        list.sprite_ex(
            SheetId::Character(player.character),
            atlas::character(player.anim),
            player.bounds(),
            alpha,
            false,
        );
    }

    for entity in state.entities.iter().filter(|e| e.is_active()) {
        match entity {
            Entity::Obstacle(o) => {
                list.sprite(SheetId::Obstacles, atlas::obstacle(o.kind), entity.bounds())
            }
            Entity::Projectile(p) => {
                list.sprite(SheetId::Obstacles, atlas::projectile(p), entity.bounds())
            }
        }
    }

    if let Some(boss) = &state.boss {
        let bar_y = boss.pos.y - BOSS_HP_BAR_OFFSET;
        list.fill(
            Rect::new(boss.pos.x, bar_y, boss.size.x, BOSS_HP_BAR_HEIGHT),
            Color::HP_BAR_BACK,
        );
        list.fill(
            Rect::new(
                boss.pos.x,
                bar_y,
                boss.size.x * boss.health_fraction(),
                BOSS_HP_BAR_HEIGHT,
            ),
            Color::HP_BAR_FILL,
        );
        list.sprite(
            SheetId::Bosses,
            atlas::boss(boss.level, boss.pose),
            boss.bounds(),
        );
    }

    list
}

/// Level background at half scroll speed, alternate tiles mirrored so the
/// seams line up
fn draw_background(list: &mut DrawList, state: &GameState, sheets: &dyn SheetSource) {
    let vp = state.viewport;
    let sheet = atlas::background_sheet(state.level);
    if !sheets.is_ready(sheet) {
        list.fill(Rect::new(0.0, 0.0, vp.width, vp.height), Color::FALLBACK_BACKGROUND);
        return;
    }

    let tile_w = vp.width;
    if tile_w <= 0.0 {
        return;
    }
    let scrolled = state.frame as f32 * SCROLL_SPEED * PARALLAX_FACTOR;
    let first_tile = (scrolled / tile_w).floor() as u64;
    let offset = scrolled % tile_w;

    for i in 0..2u64 {
        let draw_x = i as f32 * tile_w - offset;
        if draw_x > vp.width {
            continue;
        }
        let flipped = (first_tile + i) % 2 == 1;
        list.sprite_ex(
            sheet,
            SubRect::FULL,
            Rect::new(draw_x, 0.0, tile_w, vp.height),
            1.0,
            flipped,
        );
    }
}

/// Ground band with scrolling accent strips
fn draw_ground(list: &mut DrawList, state: &GameState) {
    let vp = state.viewport;
    let y = vp.ground_line();
    let (base, accent) = ground_palette(state.level);

    list.fill(Rect::new(0.0, y, vp.width, GROUND_MARGIN), base);

    let offset = (state.frame as f32 * SCROLL_SPEED) % GROUND_TILE;
    let mut x = -GROUND_TILE;
    while x < vp.width + GROUND_TILE {
        list.fill(
            Rect::new(x - offset, y, GROUND_STRIP_WIDTH, GROUND_MARGIN),
            accent,
        );
        x += GROUND_TILE;
    }

    list.fill(Rect::new(0.0, y, vp.width, GROUND_BORDER), accent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::draw::{AllSheetsReady, DrawCommand};
    use crate::sim::{Boss, CharacterId, GamePhase, select_character};
    use glam::Vec2;

    struct NothingReady;

    impl SheetSource for NothingReady {
        fn is_ready(&self, _sheet: SheetId) -> bool {
            false
        }
    }

    fn playing() -> GameState {
        let mut state = GameState::new(1);
        select_character(&mut state, CharacterId::Dania);
        state
    }

    fn sprites(list: &DrawList) -> Vec<SheetId> {
        list.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { sheet, .. } => Some(*sheet),
                DrawCommand::Fill { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_menu_draws_nothing() {
        let state = GameState::new(1);
        assert!(build_frame(&state, &AllSheetsReady).is_empty());
    }

    #[test]
    fn test_draw_order() {
        let mut state = playing();
        state.phase = GamePhase::Boss;
        state.boss = Some(Boss::new(1, &state.viewport));
        let list = build_frame(&state, &AllSheetsReady);

        let sheets = sprites(&list);
        assert_eq!(sheets.first(), Some(&SheetId::Background(1)));
        assert_eq!(sheets.last(), Some(&SheetId::Bosses));
        assert!(sheets.contains(&SheetId::Character(CharacterId::Dania)));
    }

    #[test]
    fn test_unready_background_falls_back_to_fill() {
        let state = playing();
        let list = build_frame(&state, &NothingReady);
        assert_eq!(
            list.commands[0],
            DrawCommand::Fill {
                rect: Rect::new(0.0, 0.0, state.viewport.width, state.viewport.height),
                color: Color::FALLBACK_BACKGROUND,
            }
        );
    }

    #[test]
    fn test_background_tiles_alternate() {
        let mut state = playing();
        // One full tile scrolled: the mirrored tile is now first
        state.frame = (state.viewport.width / (SCROLL_SPEED * PARALLAX_FACTOR)) as u64;
        let list = build_frame(&state, &AllSheetsReady);
        let flips: Vec<bool> = list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite {
                    sheet: SheetId::Background(_),
                    flip_x,
                    ..
                } => Some(*flip_x),
                _ => None,
            })
            .collect();
        assert_eq!(flips, vec![true, false]);
    }

    #[test]
    fn test_blinking_player_is_translucent() {
        let mut state = playing();
        state.frame = 0;
        state.player.as_mut().unwrap().hit_timer = 30;
        let list = build_frame(&state, &AllSheetsReady);
        let alpha = list.commands.iter().find_map(|c| match c {
            DrawCommand::Sprite {
                sheet: SheetId::Character(_),
                alpha,
                ..
            } => Some(*alpha),
            _ => None,
        });
        assert_eq!(alpha, Some(BLINK_ALPHA));
    }

    #[test]
    fn test_health_bar_tracks_boss_hp() {
        let mut state = playing();
        state.phase = GamePhase::Boss;
        let mut boss = Boss::new(1, &state.viewport);
        boss.hp = 1;
        let expected = boss.size.x * boss.health_fraction();
        assert!(expected < boss.size.x);
        state.boss = Some(boss);

        let list = build_frame(&state, &AllSheetsReady);
        let fill_w = list.commands.iter().rev().find_map(|c| match c {
            DrawCommand::Fill {
                rect,
                color: Color::HP_BAR_FILL,
            } => Some(rect.w),
            _ => None,
        });
        assert_eq!(fill_w, Some(expected));
    }

    #[test]
    fn test_shake_translates_frame() {
        let mut state = playing();
        state.shake = Vec2::new(SHAKE_OFFSET, 0.0);
        assert_eq!(build_frame(&state, &AllSheetsReady).translate.x, SHAKE_OFFSET);
    }
}
