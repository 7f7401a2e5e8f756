//! Backend-agnostic draw commands
//!
//! A frame is a flat list of fills and sprite blits in painter's order. The
//! scene builder produces it from the game state; a backend executes it.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{CharacterId, Rect};

/// Packed 0xRRGGBB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color(pub u32);

impl Color {
    pub const FALLBACK_BACKGROUND: Color = Color(0x333333);
    pub const HP_BAR_BACK: Color = Color(0xff0000);
    pub const HP_BAR_FILL: Color = Color(0x008000);

    /// CSS hex notation, e.g. `#dbe4eb`
    pub fn css(&self) -> String {
        format!("#{:06x}", self.0 & 0xff_ffff)
    }
}

/// Normalized (0..1) region of a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl SubRect {
    pub const FULL: SubRect = SubRect::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Pixel rectangle within an image of the given natural size
    pub fn to_pixels(&self, image_w: f32, image_h: f32) -> Rect {
        Rect::new(
            self.x * image_w,
            self.y * image_h,
            self.w * image_w,
            self.h * image_h,
        )
    }
}

/// Logical sprite sheet keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SheetId {
    Character(CharacterId),
    Bosses,
    /// Obstacles and every projectile
    Obstacles,
    /// Level background (1..=3)
    Background(u8),
}

impl SheetId {
    pub fn all() -> Vec<SheetId> {
        let mut sheets: Vec<SheetId> = CharacterId::ALL
            .iter()
            .map(|c| SheetId::Character(*c))
            .collect();
        sheets.push(SheetId::Bosses);
        sheets.push(SheetId::Obstacles);
        sheets.extend((1..=3).map(SheetId::Background));
        sheets
    }

    /// Key used for the asset element / file name
    pub fn key(&self) -> String {
        match self {
            SheetId::Character(c) => c.id().to_string(),
            SheetId::Bosses => "bosses".to_string(),
            SheetId::Obstacles => "obstacles".to_string(),
            SheetId::Background(level) => format!("bg{level}"),
        }
    }
}

/// Tells the scene builder which sheets can be drawn right now
pub trait SheetSource {
    fn is_ready(&self, sheet: SheetId) -> bool;
}

/// Every sheet ready (tests, headless runs)
pub struct AllSheetsReady;

impl SheetSource for AllSheetsReady {
    fn is_ready(&self, _sheet: SheetId) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Fill {
        rect: Rect,
        color: Color,
    },
    Sprite {
        sheet: SheetId,
        src: SubRect,
        dst: Rect,
        alpha: f32,
        /// Mirror horizontally within `dst`
        flip_x: bool,
    },
}

/// One frame's worth of commands
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawList {
    /// Whole-frame translation (damage screen shake)
    pub translate: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(translate: Vec2) -> Self {
        Self {
            translate,
            commands: Vec::new(),
        }
    }

    pub fn fill(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    pub fn sprite(&mut self, sheet: SheetId, src: SubRect, dst: Rect) {
        self.sprite_ex(sheet, src, dst, 1.0, false);
    }

    pub fn sprite_ex(&mut self, sheet: SheetId, src: SubRect, dst: Rect, alpha: f32, flip_x: bool) {
        self.commands.push(DrawCommand::Sprite {
            sheet,
            src,
            dst,
            alpha,
            flip_x,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}
