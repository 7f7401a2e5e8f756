//! Browser shell pieces: DOM panels, host app bridge, event delivery
//!
//! Panels are toggled with the `hidden` class. Missing elements are logged
//! and skipped so a trimmed-down page still runs.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use super::EventSink;
use crate::audio::AudioManager;
use crate::sim::{CharacterId, SoundEffect};
use crate::ui::{Screen, UiCommand};

const HIDDEN_CLASS: &str = "hidden";
const FADE_TRANSITION: &str = "opacity 0.5s ease-in";
const VICTORY_PORTRAIT_ID: &str = "victory-pose";

// Telegram WebApp bridge. Every call is a no-op outside Telegram.
#[wasm_bindgen(inline_js = "
    function webapp() {
        return (window.Telegram && window.Telegram.WebApp) || null;
    }
    export function host_ready() {
        const app = webapp();
        if (app) { app.ready(); app.expand(); }
    }
    export function host_close() {
        const app = webapp();
        if (app) { app.close(); } else { window.close(); }
    }
")]
extern "C" {
    fn host_ready();
    fn host_close();
}

/// Tell the host app the game is ready and take the full viewport
pub fn notify_host_ready() {
    host_ready();
}

/// True when the browser reports touch support
pub fn is_touch_device() -> bool {
    web_sys::window()
        .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str("ontouchstart")).unwrap_or(false))
        .unwrap_or(false)
}

/// Applies [`UiCommand`]s to the page
pub struct DomUi {
    document: Document,
}

impl DomUi {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: &str) -> Option<HtmlElement> {
        let el = self
            .document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if el.is_none() {
            log::debug!("UI element #{id} not found");
        }
        el
    }

    fn set_hidden(&self, screen: Screen, hidden: bool) -> Result<(), JsValue> {
        let Some(el) = self.element(screen.element_id()) else {
            return Ok(());
        };
        if hidden {
            el.class_list().add_1(HIDDEN_CLASS)
        } else {
            el.class_list().remove_1(HIDDEN_CLASS)
        }
    }

    pub fn apply(&self, command: &UiCommand) {
        if let Err(e) = self.try_apply(command) {
            log::warn!("UI command {command:?} failed: {e:?}");
        }
    }

    fn try_apply(&self, command: &UiCommand) -> Result<(), JsValue> {
        match command {
            UiCommand::Show(screen) => self.set_hidden(*screen, false),
            UiCommand::Hide(screen) => self.set_hidden(*screen, true),
            UiCommand::SetText(slot, text) => {
                if let Some(el) = self.element(slot.element_id()) {
                    // inner_text turns newlines into line breaks
                    el.set_inner_text(text);
                }
                Ok(())
            }
            UiCommand::FadeIn(screen) => {
                self.set_hidden(*screen, false)?;
                let Some(el) = self.element(screen.element_id()) else {
                    return Ok(());
                };
                let style = el.style();
                style.set_property("transition", "none")?;
                style.set_property("opacity", "0")?;
                // Force a layout so the transition starts from 0
                let _ = el.offset_height();
                style.set_property("transition", FADE_TRANSITION)?;
                style.set_property("opacity", "1")
            }
            UiCommand::FadeOut(screen) => match self.element(screen.element_id()) {
                Some(el) => el.style().set_property("opacity", "0"),
                None => Ok(()),
            },
            UiCommand::SetVictoryPortrait(character) => self.set_victory_portrait(*character),
            UiCommand::EndingJitter {
                offset,
                red_background,
                red_text,
            } => {
                let Some(el) = self.element(Screen::TerminalEnding.element_id()) else {
                    return Ok(());
                };
                let style = el.style();
                style.set_property(
                    "transform",
                    &format!("translate({}px, {}px)", offset.x, offset.y),
                )?;
                style.set_property(
                    "background-color",
                    if *red_background { "red" } else { "black" },
                )?;
                if let Some(heading) = el
                    .query_selector("h1")?
                    .and_then(|h| h.dyn_into::<HtmlElement>().ok())
                {
                    heading
                        .style()
                        .set_property("color", if *red_text { "red" } else { "black" })?;
                }
                Ok(())
            }
            UiCommand::ResetOpacity => match self.document.body() {
                Some(body) => body.style().set_property("opacity", "1"),
                None => Ok(()),
            },
        }
    }

    /// Victory cell is the bottom-right quadrant of the character sheet
    fn set_victory_portrait(&self, character: CharacterId) -> Result<(), JsValue> {
        let Some(el) = self.element(VICTORY_PORTRAIT_ID) else {
            return Ok(());
        };
        el.set_class_name(&format!("victory-image {}-portrait", character.id()));
        el.style().set_property("background-position", "100% 100%")
    }
}

/// Routes core events to Web Audio, the DOM and the host app
pub struct WebShell {
    pub ui: DomUi,
    pub audio: AudioManager,
}

impl EventSink for WebShell {
    fn sound(&mut self, effect: SoundEffect) {
        self.audio.play(effect);
    }

    fn tone(&mut self, freq_hz: f32, duration_s: f32) {
        self.audio.play_tone(freq_hz, duration_s);
    }

    fn music_start(&mut self, level: u8) {
        log::debug!("Music for level {level}");
        self.audio.resume();
    }

    fn ui(&mut self, command: UiCommand) {
        self.ui.apply(&command);
    }

    fn close_host(&mut self) {
        host_close();
    }
}
