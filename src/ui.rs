//! UI panel intents
//!
//! The simulation never touches the DOM. It emits [`UiCommand`]s and the
//! platform shell applies them to whatever panels it owns.

use glam::Vec2;
use serde::Serialize;

use crate::sim::CharacterId;

/// Overlay panels controlled by the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Screen {
    CharacterSelect,
    Hud,
    MobileControls,
    GameOver,
    Victory,
    Transition,
    Resignation,
    TerminalEnding,
}

impl Screen {
    pub const ALL: [Screen; 8] = [
        Screen::CharacterSelect,
        Screen::Hud,
        Screen::MobileControls,
        Screen::GameOver,
        Screen::Victory,
        Screen::Transition,
        Screen::Resignation,
        Screen::TerminalEnding,
    ];

    /// DOM element id of the panel
    pub fn element_id(&self) -> &'static str {
        match self {
            Screen::CharacterSelect => "screen-character-select",
            Screen::Hud => "hud",
            Screen::MobileControls => "mobile-controls",
            Screen::GameOver => "screen-game-over",
            Screen::Victory => "screen-victory",
            Screen::Transition => "screen-transition",
            Screen::Resignation => "screen-resignation",
            Screen::TerminalEnding => "screen-screamer",
        }
    }
}

/// Text fields the game writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TextSlot {
    LevelLabel,
    Hearts,
    ResignationName,
    TransitionTitle,
    TransitionBody,
}

impl TextSlot {
    pub fn element_id(&self) -> &'static str {
        match self {
            TextSlot::LevelLabel => "level-display",
            TextSlot::Hearts => "hp-display",
            TextSlot::ResignationName => "resign-name",
            TextSlot::TransitionTitle => "trans-title",
            TextSlot::TransitionBody => "trans-next",
        }
    }
}

/// A visibility or content change for the UI collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum UiCommand {
    Show(Screen),
    Hide(Screen),
    SetText(TextSlot, String),
    /// Show a panel starting transparent and fade it in
    FadeIn(Screen),
    /// Fade a panel out (it stays in the layout until hidden)
    FadeOut(Screen),
    SetVictoryPortrait(CharacterId),
    /// One frame of the punitive ending's shaking
    EndingJitter {
        offset: Vec2,
        red_background: bool,
        red_text: bool,
    },
    /// Restore full page opacity after the endings
    ResetOpacity,
}

/// Heart string for the HUD (one heart per hit point)
pub fn hearts(hp: u8) -> String {
    "❤️".repeat(hp as usize)
}

/// HUD level label
pub fn level_label(level: u8) -> String {
    format!("Уровень {level}: {}", level_title(level))
}

/// Title of each level's boss line
pub fn level_title(level: u8) -> &'static str {
    match level {
        1 => "Taskbar Primary",
        2 => "Taskbar 2 Line",
        _ => "Taskbar 3 Line",
    }
}
