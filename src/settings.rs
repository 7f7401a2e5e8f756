//! Game settings and preferences
//!
//! Supplied by the host page as JSON; there is no save system. Unknown or
//! missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Start with all audio muted
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Visual Effects ===
    /// Damage screen shake
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    // === Input ===
    /// Show on-screen jump/shoot buttons. `None` = detect touch support.
    pub touch_controls: Option<bool>,

    /// Fixed run seed (random when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,

            screen_shake: true,
            reduced_motion: false,

            touch_controls: None,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Parse settings JSON, falling back to defaults on error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Invalid settings ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Whether touch controls should be shown given the detected capability
    pub fn touch_controls_enabled(&self, touch_detected: bool) -> bool {
        self.touch_controls.unwrap_or(touch_detected)
    }

    /// Element holding the page-supplied settings
    #[cfg(target_arch = "wasm32")]
    const CONFIG_ELEMENT_ID: &'static str = "game-config";

    /// Load settings from the page's `<script id="game-config">` (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match json {
            Some(json) if !json.trim().is_empty() => {
                log::info!("Loaded settings from #{}", Self::CONFIG_ELEMENT_ID);
                Self::from_json_or_default(&json)
            }
            _ => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parsing settings in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "muted": true, "seed": 42 }"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.master_volume, Settings::default().master_volume);
        assert_eq!(settings.touch_controls, None);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        assert_eq!(Settings::from_json_or_default("{ not json"), Settings::default());
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_touch_controls_override() {
        let auto = Settings::default();
        assert!(auto.touch_controls_enabled(true));
        assert!(!auto.touch_controls_enabled(false));

        let forced = Settings {
            touch_controls: Some(false),
            ..Default::default()
        };
        assert!(!forced.touch_controls_enabled(true));
    }
}
