//! Entities that live in the scrolling world
//!
//! The player and the boss are owned directly by [`GameState`](super::GameState);
//! obstacles and projectiles share one ordered [`Entity`] list that the
//! collision resolver and the renderer walk uniformly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::state::Viewport;
use super::tick::TickInput;
use crate::consts::*;

/// Playable characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterId {
    #[default]
    Dania,
    Tatiana,
}

impl CharacterId {
    pub const ALL: [CharacterId; 2] = [CharacterId::Dania, CharacterId::Tatiana];

    /// Sprite sheet / DOM key
    pub fn id(&self) -> &'static str {
        match self {
            CharacterId::Dania => "dania",
            CharacterId::Tatiana => "tatiana",
        }
    }

    /// Name shown on the resignation screen
    pub fn display_name(&self) -> &'static str {
        match self {
            CharacterId::Dania => "Даня",
            CharacterId::Tatiana => "Татьяна",
        }
    }

    pub fn from_id(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dania" => Some(CharacterId::Dania),
            "tatiana" => Some(CharacterId::Tatiana),
            _ => None,
        }
    }
}

/// Player animation state (selects the sprite cell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimState {
    Run,
    Jump,
    Hit,
}

/// What the player did during one update
#[derive(Debug, Default)]
pub struct PlayerUpdate {
    pub jumped: bool,
    pub fired: Option<Projectile>,
}

/// The runner
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub character: CharacterId,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel_y: f32,
    pub grounded: bool,
    pub anim: AnimState,
    /// Frames of invincibility left after taking a hit
    pub hit_timer: u32,
    /// Frames until the next shot is allowed
    pub shoot_cooldown: u32,
}

impl Player {
    pub fn new(character: CharacterId, viewport: &Viewport) -> Self {
        Self {
            character,
            pos: Vec2::new(PLAYER_X, viewport.ground_y(PLAYER_SIZE)),
            size: Vec2::splat(PLAYER_SIZE),
            vel_y: 0.0,
            grounded: true,
            anim: AnimState::Run,
            hit_timer: 0,
            shoot_cooldown: 0,
        }
    }

    /// Advance physics, consume buffered input and tick timers.
    ///
    /// Jump and shoot flags are only cleared when acted upon, so a jump
    /// pressed mid-air fires on landing and a shot pressed during cooldown
    /// fires as soon as the cooldown expires.
    pub fn update(&mut self, input: &mut TickInput, viewport: &Viewport) -> PlayerUpdate {
        let mut out = PlayerUpdate::default();

        self.vel_y += GRAVITY;
        self.pos.y += self.vel_y;

        let ground = viewport.ground_y(self.size.y);
        if self.pos.y > ground {
            self.pos.y = ground;
            self.vel_y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }

        if input.jump && self.grounded {
            self.vel_y = JUMP_FORCE;
            self.grounded = false;
            self.anim = AnimState::Jump;
            input.jump = false;
            out.jumped = true;
        }

        if input.shoot && self.shoot_cooldown == 0 {
            out.fired = Some(self.shoot());
            input.shoot = false;
        }

        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        self.hit_timer = self.hit_timer.saturating_sub(1);

        self.anim = if self.hit_timer > 0 {
            AnimState::Hit
        } else if !self.grounded {
            AnimState::Jump
        } else {
            AnimState::Run
        };

        out
    }

    /// Fire one projectile from the leading edge
    fn shoot(&mut self) -> Projectile {
        self.shoot_cooldown = SHOOT_COOLDOWN_FRAMES;
        Projectile::new(
            Vec2::new(self.pos.x + self.size.x, self.pos.y + self.size.y / 2.0),
            Vec2::new(PLAYER_PROJECTILE_SPEED, 0.0),
            ProjectileSource::Player,
            ProjectileVariant::Character(self.character),
        )
    }

    pub fn is_invincible(&self) -> bool {
        self.hit_timer > 0
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Forgiving hitbox used for all damage checks
    pub fn hitbox(&self) -> Rect {
        let [l, t, r, b] = PLAYER_HITBOX_INSET;
        self.bounds().inset(l, t, r, b)
    }

    /// Rendered at reduced opacity on alternating frame groups while invincible
    pub fn is_blink_frame(&self, frame: u64) -> bool {
        self.hit_timer > 0 && (frame / BLINK_CADENCE_FRAMES) % 2 == 0
    }

    /// Snap back onto the ground (after a viewport resize)
    pub fn reseat(&mut self, viewport: &Viewport) {
        self.pos.y = viewport.ground_y(self.size.y);
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Atm,
    Chaos,
    Cone,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Atm, ObstacleKind::Chaos, ObstacleKind::Cone];

    /// Fixed size per type
    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::Atm => Vec2::new(70.0, 80.0),
            ObstacleKind::Chaos | ObstacleKind::Cone => Vec2::new(50.0, 50.0),
        }
    }
}

/// A ground hazard scrolling toward the player
#[derive(Debug, Clone, Serialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub active: bool,
}

impl Obstacle {
    /// Spawn just past the right edge, resting on the ground
    pub fn new(kind: ObstacleKind, viewport: &Viewport) -> Self {
        let size = kind.size();
        Self {
            kind,
            pos: Vec2::new(
                viewport.width + OBSTACLE_SPAWN_OFFSET,
                viewport.ground_y(size.y) + OBSTACLE_SINK,
            ),
            size,
            active: true,
        }
    }

    pub fn update(&mut self) {
        self.pos.x -= SCROLL_SPEED;
        if self.pos.x < -OFFSCREEN_MARGIN {
            self.active = false;
        }
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileSource {
    Player,
    Boss,
}

/// Visual flavour of a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileVariant {
    /// Player shot, drawn per character
    Character(CharacterId),
    /// Plain boss bolt for the given boss level. Drawable, but bosses
    /// currently only throw [`ProjectileVariant::Ticket`].
    Boss(u8),
    /// The boss "ticket" attack
    Ticket,
}

/// A shot travelling in a straight line
#[derive(Debug, Clone, Serialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub source: ProjectileSource,
    pub variant: ProjectileVariant,
    pub active: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, source: ProjectileSource, variant: ProjectileVariant) -> Self {
        Self {
            pos,
            vel,
            size: Vec2::splat(PROJECTILE_SIZE),
            source,
            variant,
            active: true,
        }
    }

    pub fn update(&mut self, viewport: &Viewport) {
        self.pos += self.vel;
        if self.pos.x > viewport.width + OFFSCREEN_MARGIN || self.pos.x < -OFFSCREEN_MARGIN {
            self.active = false;
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Boss animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPose {
    Idle,
    Attack,
}

/// End-of-level boss
#[derive(Debug, Clone, Serialize)]
pub struct Boss {
    pub level: u8,
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    pub pose: BossPose,
    /// Frames until the next attack (attacks when <= 0)
    pub attack_cooldown: i32,
    /// Hover phase accumulator
    pub float_phase: f32,
}

impl Boss {
    pub fn new(level: u8, viewport: &Viewport) -> Self {
        debug_assert!((1..=MAX_LEVEL).contains(&level), "invalid level {level}");
        let hp = Self::hp_for_level(level);
        Self {
            level,
            pos: Vec2::new(
                viewport.width - BOSS_RIGHT_OFFSET,
                viewport.ground_y(BOSS_SIZE),
            ),
            size: Vec2::splat(BOSS_SIZE),
            hp,
            max_hp: hp,
            pose: BossPose::Idle,
            attack_cooldown: 0,
            float_phase: 0.0,
        }
    }

    pub fn hp_for_level(level: u8) -> u32 {
        3 + 2 * level as u32
    }

    /// Faster attacks at higher levels
    pub fn cooldown_for_level(level: u8) -> i32 {
        BOSS_BASE_COOLDOWN - BOSS_COOLDOWN_PER_LEVEL * level as i32
    }

    /// Faster tickets at higher levels
    pub fn shot_speed_for_level(level: u8) -> f32 {
        BOSS_BASE_SHOT_SPEED + BOSS_SHOT_SPEED_PER_LEVEL * level as f32
    }

    pub fn name(&self) -> &'static str {
        match self.level {
            1 => "Pasha",
            2 => "Misha",
            _ => "Nadya",
        }
    }

    /// Hover and count down to the next attack. Returns the ticket if one was thrown.
    pub fn update(&mut self, viewport: &Viewport) -> Option<Projectile> {
        self.float_phase += BOSS_FLOAT_STEP;
        self.pos.y = viewport.ground_y(self.size.y) + self.float_phase.sin() * BOSS_FLOAT_AMPLITUDE;

        let mut shot = None;
        if self.attack_cooldown <= 0 {
            shot = Some(self.attack());
            self.attack_cooldown = Self::cooldown_for_level(self.level);
        }
        self.attack_cooldown -= 1;
        shot
    }

    /// Switch to the attack pose and throw a ticket at the player
    fn attack(&mut self) -> Projectile {
        self.pose = BossPose::Attack;
        Projectile::new(
            Vec2::new(self.pos.x, self.pos.y + self.size.y / 2.0),
            Vec2::new(-Self::shot_speed_for_level(self.level), 0.0),
            ProjectileSource::Boss,
            ProjectileVariant::Ticket,
        )
    }

    /// Apply one hit. Returns true when this hit defeated the boss.
    pub fn take_hit(&mut self) -> bool {
        if self.hp == 0 {
            return false;
        }
        self.hp -= 1;
        self.hp == 0
    }

    /// Remaining health in 0..=1 (drives the health bar)
    pub fn health_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn reseat(&mut self, viewport: &Viewport) {
        self.pos.y = viewport.ground_y(self.size.y);
    }
}

/// Anything in the shared entity list
#[derive(Debug, Clone, Serialize)]
pub enum Entity {
    Obstacle(Obstacle),
    Projectile(Projectile),
}

impl Entity {
    /// Advance one frame. A non-finite position retires the entity instead of
    /// poisoning collision checks for everything else.
    pub fn update(&mut self, viewport: &Viewport) {
        match self {
            Entity::Obstacle(o) => o.update(),
            Entity::Projectile(p) => p.update(viewport),
        }
        let pos = self.pos();
        if !pos.is_finite() {
            log::warn!("Retiring entity with invalid position {pos:?}");
            self.deactivate();
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Entity::Obstacle(o) => o.active,
            Entity::Projectile(p) => p.active,
        }
    }

    pub fn deactivate(&mut self) {
        match self {
            Entity::Obstacle(o) => o.active = false,
            Entity::Projectile(p) => p.active = false,
        }
    }

    pub fn pos(&self) -> Vec2 {
        match self {
            Entity::Obstacle(o) => o.pos,
            Entity::Projectile(p) => p.pos,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Entity::Obstacle(o) => Rect::from_pos_size(o.pos, o.size),
            Entity::Projectile(p) => p.bounds(),
        }
    }

    /// Inset hitbox used against the player
    pub fn hitbox(&self) -> Rect {
        self.bounds().inset_uniform(ENTITY_HITBOX_INSET)
    }

    pub fn as_obstacle(&self) -> Option<&Obstacle> {
        match self {
            Entity::Obstacle(o) => Some(o),
            Entity::Projectile(_) => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match self {
            Entity::Projectile(p) => Some(p),
            Entity::Obstacle(_) => None,
        }
    }

    pub fn is_player_projectile(&self) -> bool {
        matches!(self, Entity::Projectile(p) if p.source == ProjectileSource::Player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 720.0)
    }

    #[test]
    fn test_player_starts_grounded() {
        let vp = viewport();
        let player = Player::new(CharacterId::Dania, &vp);
        assert!(player.grounded);
        assert_eq!(player.pos.y, 720.0 - GROUND_MARGIN - PLAYER_SIZE);
    }

    #[test]
    fn test_player_jump_from_ground() {
        let vp = viewport();
        let mut player = Player::new(CharacterId::Dania, &vp);
        let mut input = TickInput {
            jump: true,
            ..Default::default()
        };

        let out = player.update(&mut input, &vp);
        assert!(out.jumped);
        assert_eq!(player.vel_y, JUMP_FORCE);
        assert!(!player.grounded);
        assert_eq!(player.anim, AnimState::Jump);
        assert!(!input.jump, "jump input should be consumed");
    }

    #[test]
    fn test_jump_is_buffered_until_landing() {
        let vp = viewport();
        let mut player = Player::new(CharacterId::Dania, &vp);
        let mut input = TickInput {
            jump: true,
            ..Default::default()
        };
        player.update(&mut input, &vp);

        // Press again mid-air: stays buffered
        input.jump = true;
        player.update(&mut input, &vp);
        assert!(input.jump);

        let mut frames = 0;
        while input.jump && frames < 200 {
            player.update(&mut input, &vp);
            frames += 1;
        }
        assert!(!input.jump, "buffered jump should fire after landing");
        assert_eq!(player.vel_y, JUMP_FORCE);
    }

    #[test]
    fn test_shoot_cooldown() {
        let vp = viewport();
        let mut player = Player::new(CharacterId::Tatiana, &vp);
        let mut input = TickInput {
            shoot: true,
            ..Default::default()
        };

        let out = player.update(&mut input, &vp);
        let shot = out.fired.expect("first shot should fire");
        assert_eq!(shot.source, ProjectileSource::Player);
        assert_eq!(shot.variant, ProjectileVariant::Character(CharacterId::Tatiana));
        assert_eq!(shot.pos.x, PLAYER_X + PLAYER_SIZE);
        assert!(shot.vel.x > 0.0);
        assert!(!input.shoot);

        // Cooldown blocks the next shot and keeps it buffered
        input.shoot = true;
        let out = player.update(&mut input, &vp);
        assert!(out.fired.is_none());
        assert!(input.shoot);

        let mut fired_after = None;
        for frame in 0..30 {
            if player.update(&mut input, &vp).fired.is_some() {
                fired_after = Some(frame);
                break;
            }
        }
        assert!(fired_after.is_some());
    }

    #[test]
    fn test_hit_timer_forces_hit_animation() {
        let vp = viewport();
        let mut player = Player::new(CharacterId::Dania, &vp);
        player.hit_timer = 10;
        player.update(&mut TickInput::default(), &vp);
        assert_eq!(player.anim, AnimState::Hit);
        assert_eq!(player.hit_timer, 9);

        player.hit_timer = 1;
        player.update(&mut TickInput::default(), &vp);
        assert_eq!(player.hit_timer, 0);
        assert_eq!(player.anim, AnimState::Run);
    }

    #[test]
    fn test_blink_cadence() {
        let vp = viewport();
        let mut player = Player::new(CharacterId::Dania, &vp);
        assert!(!player.is_blink_frame(0));
        player.hit_timer = 30;
        assert!(player.is_blink_frame(0));
        assert!(player.is_blink_frame(3));
        assert!(!player.is_blink_frame(4));
        assert!(player.is_blink_frame(8));
    }

    #[test]
    fn test_obstacle_scrolls_and_retires() {
        let vp = viewport();
        let mut obstacle = Obstacle::new(ObstacleKind::Cone, &vp);
        assert_eq!(obstacle.pos.x, 1280.0 + OBSTACLE_SPAWN_OFFSET);
        assert_eq!(obstacle.pos.y, vp.ground_y(50.0) + OBSTACLE_SINK);

        obstacle.update();
        assert_eq!(obstacle.pos.x, 1280.0 + OBSTACLE_SPAWN_OFFSET - SCROLL_SPEED);

        obstacle.pos.x = -OFFSCREEN_MARGIN + 1.0;
        obstacle.update();
        assert!(!obstacle.active);
    }

    #[test]
    fn test_obstacle_sizes() {
        assert_eq!(ObstacleKind::Atm.size(), Vec2::new(70.0, 80.0));
        assert_eq!(ObstacleKind::Chaos.size(), Vec2::new(50.0, 50.0));
        assert_eq!(ObstacleKind::Cone.size(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_projectile_leaves_either_bound() {
        let vp = viewport();
        let mut right = Projectile::new(
            Vec2::new(1375.0, 300.0),
            Vec2::new(10.0, 0.0),
            ProjectileSource::Player,
            ProjectileVariant::Character(CharacterId::Dania),
        );
        right.update(&vp);
        assert!(!right.active);

        let mut left = Projectile::new(
            Vec2::new(-95.0, 300.0),
            Vec2::new(-10.0, 0.0),
            ProjectileSource::Boss,
            ProjectileVariant::Ticket,
        );
        left.update(&vp);
        assert!(!left.active);
    }

    #[test]
    fn test_boss_stats_scale_with_level() {
        assert_eq!(Boss::hp_for_level(1), 5);
        assert_eq!(Boss::hp_for_level(3), 9);
        assert!(Boss::cooldown_for_level(3) < Boss::cooldown_for_level(1));
        assert!(Boss::shot_speed_for_level(3) > Boss::shot_speed_for_level(1));
    }

    #[test]
    fn test_boss_attacks_on_first_update() {
        let vp = viewport();
        let mut boss = Boss::new(2, &vp);
        let shot = boss.update(&vp).expect("boss attacks immediately");
        assert_eq!(boss.pose, BossPose::Attack);
        assert_eq!(shot.variant, ProjectileVariant::Ticket);
        assert_eq!(shot.source, ProjectileSource::Boss);
        assert_eq!(shot.vel.x, -8.0);
        assert_eq!(boss.attack_cooldown, Boss::cooldown_for_level(2) - 1);

        // Next attack only after the full cooldown
        let mut frames = 1;
        while boss.update(&vp).is_none() {
            frames += 1;
        }
        assert_eq!(frames, Boss::cooldown_for_level(2));
    }

    #[test]
    fn test_boss_hover_stays_within_amplitude() {
        let vp = viewport();
        let mut boss = Boss::new(1, &vp);
        let base = vp.ground_y(BOSS_SIZE);
        for _ in 0..500 {
            boss.update(&vp);
            assert!((boss.pos.y - base).abs() <= BOSS_FLOAT_AMPLITUDE + 0.001);
        }
    }

    #[test]
    fn test_boss_take_hit_reports_defeat_once() {
        let vp = viewport();
        let mut boss = Boss::new(1, &vp);
        boss.hp = 1;
        assert!(boss.take_hit());
        assert_eq!(boss.hp, 0);
        assert!(!boss.take_hit());
        assert_eq!(boss.hp, 0);
    }

    #[test]
    fn test_entity_retires_non_finite_position() {
        let vp = viewport();
        let mut entity = Entity::Projectile(Projectile::new(
            Vec2::new(100.0, 100.0),
            Vec2::new(f32::NAN, 0.0),
            ProjectileSource::Player,
            ProjectileVariant::Character(CharacterId::Dania),
        ));
        entity.update(&vp);
        assert!(!entity.is_active());
    }

    #[test]
    fn test_character_ids() {
        assert_eq!(CharacterId::from_id("Dania"), Some(CharacterId::Dania));
        assert_eq!(CharacterId::from_id("tatiana"), Some(CharacterId::Tatiana));
        assert_eq!(CharacterId::from_id("nobody"), None);
        assert_eq!(CharacterId::Tatiana.display_name(), "Татьяна");
    }
}
