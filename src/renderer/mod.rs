//! Rendering module
//!
//! The scene builder turns game state into a backend-agnostic draw list; the
//! canvas backend (browser only) executes it.

pub mod atlas;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod draw;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasRenderer, SpriteSheets};
pub use draw::{AllSheetsReady, Color, DrawCommand, DrawList, SheetId, SheetSource, SubRect};
pub use scene::build_frame;
