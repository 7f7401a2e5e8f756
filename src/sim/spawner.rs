//! Obstacle spawning
//!
//! A periodic gate (every `SPAWN_INTERVAL_FRAMES`) combined with a coin flip
//! gives irregular but bounded spawn intervals; a spacing check against the
//! newest obstacle keeps every pair jumpable.

use rand::Rng;

use super::entity::{Entity, Obstacle, ObstacleKind};
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// True when the newest obstacle has moved far enough from the spawn edge
pub fn has_spawn_room(state: &GameState) -> bool {
    match state.obstacles().last() {
        Some(last) => last.pos.x <= state.viewport.width - MIN_SPAWN_GAP,
        None => true,
    }
}

/// Maybe add one obstacle this frame. Returns the kind spawned, if any.
pub fn spawn_obstacles(state: &mut GameState) -> Option<ObstacleKind> {
    if state.phase != GamePhase::Play || state.grace_period > 0 || state.boss.is_some() {
        return None;
    }

    if !has_spawn_room(state) {
        return None;
    }

    if !state.frame.is_multiple_of(SPAWN_INTERVAL_FRAMES) {
        return None;
    }

    let rng = state.rng();
    if !rng.random_bool(SPAWN_CHANCE) {
        return None;
    }
    let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];

    let obstacle = Obstacle::new(kind, &state.viewport);
    log::trace!("Spawned {:?} at frame {}", kind, state.frame);
    state.entities.push(Entity::Obstacle(obstacle));
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Boss, CharacterId, Player};

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.phase = GamePhase::Play;
        state.player = Some(Player::new(CharacterId::Dania, &state.viewport));
        state
    }

    #[test]
    fn test_no_spawn_outside_play() {
        let mut state = playing_state(1);
        state.phase = GamePhase::Menu;
        for frame in 0..600 {
            state.frame = frame;
            assert!(spawn_obstacles(&mut state).is_none());
        }
    }

    #[test]
    fn test_no_spawn_during_grace_period() {
        let mut state = playing_state(2);
        state.grace_period = 10;
        for frame in 0..600 {
            state.frame = frame;
            assert!(spawn_obstacles(&mut state).is_none());
        }
    }

    #[test]
    fn test_no_spawn_with_boss() {
        let mut state = playing_state(3);
        state.boss = Some(Boss::new(1, &state.viewport));
        for frame in 0..600 {
            state.frame = frame;
            assert!(spawn_obstacles(&mut state).is_none());
        }
    }

    #[test]
    fn test_spawns_only_on_interval_frames() {
        let mut state = playing_state(4);
        let mut spawned = 0;
        for frame in 0..6000 {
            state.frame = frame;
            state.entities.clear();
            if spawn_obstacles(&mut state).is_some() {
                assert_eq!(frame % SPAWN_INTERVAL_FRAMES, 0);
                spawned += 1;
            }
        }
        // 100 gate openings at 40% each
        assert!(spawned > 10 && spawned < 90, "spawned {spawned}");
    }

    #[test]
    fn test_spacing_blocks_spawn() {
        let mut state = playing_state(5);
        let mut near = Obstacle::new(ObstacleKind::Atm, &state.viewport);
        near.pos.x = state.viewport.width - MIN_SPAWN_GAP + 1.0;
        state.entities.push(Entity::Obstacle(near));
        assert!(!has_spawn_room(&state));
        for k in 0..200 {
            state.frame = k * SPAWN_INTERVAL_FRAMES;
            assert!(spawn_obstacles(&mut state).is_none());
        }

        if let Some(Entity::Obstacle(o)) = state.entities.last_mut() {
            o.pos.x = state.viewport.width - MIN_SPAWN_GAP;
        }
        assert!(has_spawn_room(&state));
    }

    #[test]
    fn test_projectiles_do_not_block_spawn() {
        use crate::sim::entity::{Projectile, ProjectileSource, ProjectileVariant};
        use glam::Vec2;

        let mut state = playing_state(6);
        state.entities.push(Entity::Projectile(Projectile::new(
            Vec2::new(state.viewport.width, 300.0),
            Vec2::new(10.0, 0.0),
            ProjectileSource::Player,
            ProjectileVariant::Character(CharacterId::Dania),
        )));
        assert!(has_spawn_room(&state));
    }
}
