//! Collision detection and damage resolution
//!
//! Two sweeps per frame:
//! - hazards (obstacles, boss projectiles) against the player's inset hitbox
//! - player projectiles against the boss
//!
//! Projectiles are consumed on contact. Obstacles are not: one obstacle can
//! hit again once the invincibility window has run out.

use glam::Vec2;

use super::entity::Entity;
use super::level::boss_defeated;
use super::schedule::Deferred;
use super::state::{GameEvent, GamePhase, GameState, SoundEffect};
use crate::consts::*;
use crate::ui::{self, Screen, TextSlot, UiCommand};

/// What a collision pass did (for tests and logging)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollisionReport {
    /// Hazard contacts with the player (including ignored ones)
    pub player_contacts: u32,
    /// Contacts that actually cost a hit point
    pub damage_taken: u32,
    /// Player projectiles that hit the boss
    pub boss_hits: u32,
    pub boss_defeated: bool,
}

/// Resolve all collisions for this frame
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();

    let Some(player_box) = state.player.as_ref().map(|p| p.hitbox()) else {
        return report;
    };

    // Hazards vs player. Reverse order so the newest entities resolve first.
    for i in (0..state.entities.len()).rev() {
        let entity = &state.entities[i];
        if !entity.is_active() || !entity.hitbox().intersects(&player_box) {
            continue;
        }
        if entity.is_player_projectile() {
            continue;
        }
        let consumed = matches!(entity, Entity::Projectile(_));
        if consumed {
            state.entities[i].deactivate();
        }
        report.player_contacts += 1;
        if take_damage(state) {
            report.damage_taken += 1;
        }
    }

    // Player projectiles vs boss
    if state.phase == GamePhase::Boss {
        for i in 0..state.entities.len() {
            let Some(boss_box) = state.boss.as_ref().map(|b| b.bounds()) else {
                break;
            };
            let entity = &state.entities[i];
            if !entity.is_active()
                || !entity.is_player_projectile()
                || !entity.bounds().intersects(&boss_box)
            {
                continue;
            }

            state.entities[i].deactivate();
            report.boss_hits += 1;
            state.emit(GameEvent::Sound(SoundEffect::Hit));

            let defeated = state.boss.as_mut().is_some_and(|b| b.take_hit());
            if defeated {
                report.boss_defeated = true;
                boss_defeated(state);
            }
        }
    }

    report
}

/// Apply one hit to the player. Returns true if a hit point was lost.
///
/// Ignored entirely while the invincibility window is open.
pub fn take_damage(state: &mut GameState) -> bool {
    if !state.phase.is_active() {
        return false;
    }
    let Some(player) = state.player.as_mut() else {
        return false;
    };
    if player.is_invincible() {
        return false;
    }

    player.hit_timer = HIT_INVINCIBILITY_FRAMES;
    state.hp = state.hp.saturating_sub(1);
    let hearts = ui::hearts(state.hp);
    state.ui(UiCommand::SetText(TextSlot::Hearts, hearts));
    state.emit(GameEvent::Sound(SoundEffect::Hit));

    state.shake = Vec2::new(SHAKE_OFFSET, 0.0);
    state.schedule(SHAKE_FRAMES, Deferred::ShakeReset);

    if state.hp == 0 {
        log::info!("Game over on level {}", state.level);
        state.phase = GamePhase::GameOver;
        state.ui(UiCommand::Show(Screen::GameOver));
        state.ui(UiCommand::Hide(Screen::Hud));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{
        Boss, CharacterId, Obstacle, ObstacleKind, Player, Projectile, ProjectileSource,
        ProjectileVariant,
    };

    fn playing_state() -> GameState {
        let mut state = GameState::new(7);
        state.phase = GamePhase::Play;
        state.player = Some(Player::new(CharacterId::Dania, &state.viewport));
        state
    }

    fn obstacle_on_player(state: &GameState) -> Entity {
        let mut o = Obstacle::new(ObstacleKind::Cone, &state.viewport);
        o.pos.x = state.player.as_ref().unwrap().pos.x + 10.0;
        Entity::Obstacle(o)
    }

    fn ticket_at(pos: Vec2) -> Entity {
        Entity::Projectile(Projectile::new(
            pos,
            Vec2::new(-6.5, 0.0),
            ProjectileSource::Boss,
            ProjectileVariant::Ticket,
        ))
    }

    fn player_shot_at(pos: Vec2) -> Entity {
        Entity::Projectile(Projectile::new(
            pos,
            Vec2::new(10.0, 0.0),
            ProjectileSource::Player,
            ProjectileVariant::Character(CharacterId::Dania),
        ))
    }

    #[test]
    fn test_obstacle_damages_but_persists() {
        let mut state = playing_state();
        let obstacle = obstacle_on_player(&state);
        state.entities.push(obstacle);

        let report = resolve_collisions(&mut state);
        assert_eq!(report.damage_taken, 1);
        assert_eq!(state.hp, MAX_HP - 1);
        assert!(state.entities[0].is_active(), "obstacles are not consumed");
        assert_eq!(state.player.as_ref().unwrap().hit_timer, HIT_INVINCIBILITY_FRAMES);
        assert!(state.events().contains(&GameEvent::Sound(SoundEffect::Hit)));
        assert!(
            state
                .events()
                .contains(&GameEvent::Ui(UiCommand::SetText(TextSlot::Hearts, "❤️❤️".into())))
        );
        assert_eq!(state.shake.x, SHAKE_OFFSET);
        assert!(state.is_scheduled(Deferred::ShakeReset));
    }

    #[test]
    fn test_invincibility_ignores_hits() {
        let mut state = playing_state();
        let obstacle = obstacle_on_player(&state);
        state.entities.push(obstacle);

        resolve_collisions(&mut state);
        let report = resolve_collisions(&mut state);
        assert_eq!(report.player_contacts, 1);
        assert_eq!(report.damage_taken, 0);
        assert_eq!(state.hp, MAX_HP - 1);
        assert_eq!(state.player.as_ref().unwrap().hit_timer, HIT_INVINCIBILITY_FRAMES);
    }

    #[test]
    fn test_obstacle_hits_again_after_invincibility() {
        let mut state = playing_state();
        let obstacle = obstacle_on_player(&state);
        state.entities.push(obstacle);

        resolve_collisions(&mut state);
        state.player.as_mut().unwrap().hit_timer = 0;
        resolve_collisions(&mut state);
        assert_eq!(state.hp, MAX_HP - 2);
    }

    #[test]
    fn test_boss_projectile_consumed_even_when_invincible() {
        let mut state = playing_state();
        state.player.as_mut().unwrap().hit_timer = 20;
        let center = state.player.as_ref().unwrap().pos + Vec2::new(25.0, 30.0);
        state.entities.push(ticket_at(center));

        let report = resolve_collisions(&mut state);
        assert_eq!(report.damage_taken, 0);
        assert!(!state.entities[0].is_active());
        assert_eq!(state.hp, MAX_HP);
    }

    #[test]
    fn test_own_projectile_is_harmless() {
        let mut state = playing_state();
        let center = state.player.as_ref().unwrap().pos + Vec2::new(25.0, 30.0);
        state.entities.push(player_shot_at(center));

        let report = resolve_collisions(&mut state);
        assert_eq!(report.player_contacts, 0);
        assert!(state.entities[0].is_active());
        assert_eq!(state.hp, MAX_HP);
    }

    #[test]
    fn test_inset_hitbox_forgives_edge_contact() {
        let mut state = playing_state();
        // Overlaps the raw sprite by 15px but not the inset hitboxes
        let player = state.player.as_ref().unwrap();
        let mut o = Obstacle::new(ObstacleKind::Cone, &state.viewport);
        o.pos.x = player.pos.x + player.size.x - 15.0;
        state.entities.push(Entity::Obstacle(o));

        let report = resolve_collisions(&mut state);
        assert_eq!(report.player_contacts, 0);
        assert_eq!(state.hp, MAX_HP);
    }

    #[test]
    fn test_last_hit_point_triggers_game_over() {
        let mut state = playing_state();
        state.hp = 1;
        let obstacle = obstacle_on_player(&state);
        state.entities.push(obstacle);

        resolve_collisions(&mut state);
        assert_eq!(state.hp, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events().contains(&GameEvent::Ui(UiCommand::Show(Screen::GameOver))));
        assert!(state.events().contains(&GameEvent::Ui(UiCommand::Hide(Screen::Hud))));

        // No further damage once the game is over
        state.player.as_mut().unwrap().hit_timer = 0;
        assert!(!take_damage(&mut state));
        assert_eq!(state.hp, 0);
    }

    #[test]
    fn test_player_shot_damages_boss() {
        let mut state = playing_state();
        state.phase = GamePhase::Boss;
        let boss = Boss::new(1, &state.viewport);
        let target = boss.pos + Vec2::new(10.0, 10.0);
        state.boss = Some(boss);
        state.entities.push(player_shot_at(target));

        let report = resolve_collisions(&mut state);
        assert_eq!(report.boss_hits, 1);
        assert!(!report.boss_defeated);
        assert_eq!(state.boss.as_ref().unwrap().hp, Boss::hp_for_level(1) - 1);
        assert!(!state.entities[0].is_active());
    }

    #[test]
    fn test_boss_defeat_is_idempotent_within_frame() {
        let mut state = playing_state();
        state.phase = GamePhase::Boss;
        let mut boss = Boss::new(1, &state.viewport);
        boss.hp = 1;
        let target = boss.pos + Vec2::new(10.0, 10.0);
        state.boss = Some(boss);
        state.entities.push(player_shot_at(target));
        state.entities.push(player_shot_at(target));

        let report = resolve_collisions(&mut state);
        assert_eq!(report.boss_hits, 1);
        assert!(report.boss_defeated);
        assert!(state.boss.is_none());
        assert_eq!(state.phase, GamePhase::BossDead);
        assert!(state.entities[1].is_active(), "second shot finds no boss");
        let deaths = state
            .events()
            .iter()
            .filter(|e| **e == GameEvent::Sound(SoundEffect::BossDeath))
            .count();
        assert_eq!(deaths, 1);
    }
}
