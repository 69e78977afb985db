//! Application configuration.
//!
//! Settings live in ~/.climpt/config.json as nested sections. Defaults are
//! written on first run so the file is discoverable and editable; a corrupt
//! file is logged and left alone, with defaults used for the session.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{ClimptError, Result};
use crate::shortcuts::Shortcut;

/// Default hotkey strings
pub const DEFAULT_OVERLAY_HOTKEY: &str = "alt+p";
pub const DEFAULT_TAGS_HOTKEY: &str = "alt+t";

/// Default width of the collapsed side strip, in points
pub const DEFAULT_STRIP_WIDTH: f32 = 40.0;

/// Screen corner the overlay window is pinned to.
///
/// `Leave` keeps whatever position the window currently has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlayCorner {
    #[serde(rename = "Top Left")]
    TopLeft,
    #[default]
    #[serde(rename = "Top Right")]
    TopRight,
    #[serde(rename = "Bottom Left")]
    BottomLeft,
    #[serde(rename = "Bottom Right")]
    BottomRight,
    #[serde(rename = "Leave")]
    Leave,
}

impl OverlayCorner {
    pub const ALL: [OverlayCorner; 5] = [
        OverlayCorner::TopLeft,
        OverlayCorner::TopRight,
        OverlayCorner::BottomLeft,
        OverlayCorner::BottomRight,
        OverlayCorner::Leave,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OverlayCorner::TopLeft => "Top Left",
            OverlayCorner::TopRight => "Top Right",
            OverlayCorner::BottomLeft => "Bottom Left",
            OverlayCorner::BottomRight => "Bottom Right",
            OverlayCorner::Leave => "Leave",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeysConfig {
    #[serde(default = "default_overlay_hotkey")]
    pub overlay: String,
    #[serde(default = "default_tags_hotkey")]
    pub tags: String,
}

fn default_overlay_hotkey() -> String {
    DEFAULT_OVERLAY_HOTKEY.to_string()
}

fn default_tags_hotkey() -> String {
    DEFAULT_TAGS_HOTKEY.to_string()
}

impl Default for HotkeysConfig {
    fn default() -> Self {
        HotkeysConfig {
            overlay: default_overlay_hotkey(),
            tags: default_tags_hotkey(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default)]
    pub corner: OverlayCorner,
}

/// Side-panel transform flags: whether the overlay may collapse into a thin
/// strip, and how wide that strip is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidePanelConfig {
    #[serde(default = "default_true")]
    pub collapsible: bool,
    #[serde(default = "default_strip_width")]
    pub strip_width: f32,
}

fn default_true() -> bool {
    true
}

fn default_strip_width() -> f32 {
    DEFAULT_STRIP_WIDTH
}

impl Default for SidePanelConfig {
    fn default() -> Self {
        SidePanelConfig {
            collapsible: true,
            strip_width: DEFAULT_STRIP_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hotkeys: HotkeysConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub side_panel: SidePanelConfig,
}

impl Config {
    /// Parsed overlay hotkey, falling back to the default on a bad string.
    pub fn overlay_shortcut(&self) -> Shortcut {
        parse_with_fallback(&self.hotkeys.overlay, DEFAULT_OVERLAY_HOTKEY)
    }

    /// Parsed tag-panel hotkey, falling back to the default on a bad string.
    pub fn tags_shortcut(&self) -> Shortcut {
        parse_with_fallback(&self.hotkeys.tags, DEFAULT_TAGS_HOTKEY)
    }

    /// Width of the collapsed strip, kept to a sane minimum.
    pub fn strip_width(&self) -> f32 {
        self.side_panel.strip_width.max(24.0)
    }
}

fn parse_with_fallback(raw: &str, fallback: &str) -> Shortcut {
    match Shortcut::parse(raw) {
        Ok(shortcut) => shortcut,
        Err(e) => {
            warn!(shortcut = raw, error = %e, "Invalid hotkey in config, using default");
            Shortcut::parse(fallback).expect("default shortcut must parse")
        }
    }
}

/// Directory holding all user-visible Climpt files (~/.climpt/), with a
/// temp-dir fallback when no home directory is available.
pub fn climpt_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".climpt"))
        .unwrap_or_else(|| std::env::temp_dir().join("climpt"))
}

/// Path of the config file (~/.climpt/config.json).
pub fn default_config_path() -> PathBuf {
    climpt_dir().join("config.json")
}

/// Load configuration from `path`.
///
/// A missing file gets defaults written to disk; an unreadable or corrupt
/// file is logged and left alone, and defaults are used for the session.
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        info!(path = %path.display(), "Config file not found, writing defaults");
        let config = Config::default();
        if let Err(e) = save_config(path, &config) {
            warn!(error = %e, "Failed to write default config");
        }
        return config;
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read config, using defaults");
            return Config::default();
        }
    };

    match serde_json::from_str::<Config>(&raw) {
        Ok(config) => {
            info!(path = %path.display(), "Loaded config");
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Config is corrupt, using defaults");
            Config::default()
        }
    }
}

/// Write the full configuration document to `path`.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| ClimptError::Config(format!("serialize failed: {}", e)))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ClimptError::Config(format!("create {}: {}", parent.display(), e)))?;
    }
    std::fs::write(path, json)
        .map_err(|e| ClimptError::Config(format!("write {}: {}", path.display(), e)))?;
    Ok(())
}
