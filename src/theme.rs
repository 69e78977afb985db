//! Theme - colors and opacities.
//!
//! The theme is a JSON document of `#rrggbb` hex colors plus opacity floats,
//! loaded from ~/.climpt/theme.json and live-reloaded when the file changes.
//! A missing file means the built-in dark theme; a corrupt file is logged
//! and ignored.

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Serde adapter storing a [`Color32`] as a `"#rrggbb"` string.
pub mod hex_color_serde {
    use super::*;
    use serde::de::Error as DeError;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!(
            "#{:02x}{:02x}{:02x}",
            color.r(),
            color.g(),
            color.b()
        ))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color32, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_hex(&raw).map_err(D::Error::custom)
    }

    pub fn parse_hex(raw: &str) -> Result<Color32, String> {
        let hex = raw
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{}' must start with '#'", raw))?;
        if hex.len() != 6 {
            return Err(format!("color '{}' must be #rrggbb", raw));
        }
        let parse =
            |s: &str| u8::from_str_radix(s, 16).map_err(|_| format!("bad hex digits in '{}'", raw));
        Ok(Color32::from_rgb(
            parse(&hex[0..2])?,
            parse(&hex[2..4])?,
            parse(&hex[4..6])?,
        ))
    }
}

/// Overlay window translucency. 0.0 is fully transparent, 1.0 opaque.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OverlayOpacity {
    #[serde(default = "default_idle_opacity")]
    pub idle: f32,
    #[serde(default = "default_hover_opacity")]
    pub hover: f32,
}

fn default_idle_opacity() -> f32 {
    0.86
}

fn default_hover_opacity() -> f32 {
    0.95
}

impl Default for OverlayOpacity {
    fn default() -> Self {
        OverlayOpacity {
            idle: default_idle_opacity(),
            hover: default_hover_opacity(),
        }
    }
}

impl OverlayOpacity {
    pub fn clamped(self) -> Self {
        OverlayOpacity {
            idle: self.idle.clamp(0.0, 1.0),
            hover: self.hover.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_window_background", with = "hex_color_serde")]
    pub window_background: Color32,
    #[serde(default = "default_card_background", with = "hex_color_serde")]
    pub card_background: Color32,
    #[serde(default = "default_card_border", with = "hex_color_serde")]
    pub card_border: Color32,
    #[serde(default = "default_card_border_hover", with = "hex_color_serde")]
    pub card_border_hover: Color32,
    #[serde(default = "default_accent", with = "hex_color_serde")]
    pub accent: Color32,
    #[serde(default = "default_text_primary", with = "hex_color_serde")]
    pub text_primary: Color32,
    #[serde(default = "default_text_muted", with = "hex_color_serde")]
    pub text_muted: Color32,
    #[serde(default = "default_chip_background", with = "hex_color_serde")]
    pub chip_background: Color32,
    #[serde(default = "default_toast_background", with = "hex_color_serde")]
    pub toast_background: Color32,
    #[serde(default)]
    pub overlay: OverlayOpacity,
}

fn default_window_background() -> Color32 {
    Color32::from_rgb(0x1e, 0x1e, 0x1e)
}

fn default_card_background() -> Color32 {
    Color32::from_rgb(0x2b, 0x2b, 0x2b)
}

fn default_card_border() -> Color32 {
    Color32::from_rgb(0x44, 0x44, 0x44)
}

fn default_card_border_hover() -> Color32 {
    Color32::from_rgb(0x6a, 0x6a, 0x6a)
}

fn default_accent() -> Color32 {
    // Steel blue, used for prompt names and selected controls
    Color32::from_rgb(0x46, 0x82, 0xb4)
}

fn default_text_primary() -> Color32 {
    Color32::from_rgb(0xe6, 0xe6, 0xe6)
}

fn default_text_muted() -> Color32 {
    Color32::from_rgb(0x9a, 0x9a, 0x9a)
}

fn default_chip_background() -> Color32 {
    Color32::from_rgb(0x3a, 0x3a, 0x3a)
}

fn default_toast_background() -> Color32 {
    Color32::from_rgb(0x2e, 0xcc, 0x71)
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            window_background: default_window_background(),
            card_background: default_card_background(),
            card_border: default_card_border(),
            card_border_hover: default_card_border_hover(),
            accent: default_accent(),
            text_primary: default_text_primary(),
            text_muted: default_text_muted(),
            chip_background: default_chip_background(),
            toast_background: default_toast_background(),
            overlay: OverlayOpacity::default(),
        }
    }
}

impl Theme {
    /// Deterministic chip color for a tag: the same tag always renders the
    /// same hue, saturated and dark enough for white text.
    pub fn tag_color(&self, tag: &str) -> Color32 {
        let digest = Sha256::digest(tag.as_bytes());
        let hue_seed = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
        let hue = (hue_seed % 360) as f32;
        let saturation = 0.70 + (digest[4] % 30) as f32 / 100.0;
        let value = 0.60 + (digest[5] % 40) as f32 / 100.0;
        hsv_to_color(hue, saturation, value)
    }
}

/// Convert HSV (h in degrees, s/v in 0..=1) to a Color32.
fn hsv_to_color(h: f32, s: f32, v: f32) -> Color32 {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    let c = v * s;
    let hp = (h.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    Color32::from_rgb(
        ((r1 + m) * 255.0).round() as u8,
        ((g1 + m) * 255.0).round() as u8,
        ((b1 + m) * 255.0).round() as u8,
    )
}

/// Path of the theme file (~/.climpt/theme.json).
pub fn default_theme_path() -> PathBuf {
    crate::config::climpt_dir().join("theme.json")
}

/// Load the theme from `path`, falling back to the built-in dark theme when
/// the file is missing or corrupt. Opacities are clamped on the way in.
pub fn load_theme(path: &Path) -> Theme {
    if !path.exists() {
        debug!(path = %path.display(), "No theme file, using built-in theme");
        return Theme::default();
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read theme, using built-in");
            return Theme::default();
        }
    };

    match serde_json::from_str::<Theme>(&raw) {
        Ok(mut theme) => {
            theme.overlay = theme.overlay.clamped();
            info!(path = %path.display(), "Loaded theme");
            theme
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Theme file is corrupt, using built-in");
            Theme::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(
            hex_color_serde::parse_hex("#4682b4").unwrap(),
            Color32::from_rgb(0x46, 0x82, 0xb4)
        );
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(hex_color_serde::parse_hex("4682b4").is_err());
        assert!(hex_color_serde::parse_hex("#46").is_err());
        assert!(hex_color_serde::parse_hex("#zzzzzz").is_err());
    }

    #[test]
    fn theme_round_trips_through_json() {
        let theme = Theme::default();
        let json = serde_json::to_string(&theme).unwrap();
        assert!(json.contains("#1e1e1e"));

        let back: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(back.window_background, theme.window_background);
        assert_eq!(back.accent, theme.accent);
    }

    #[test]
    fn partial_theme_uses_defaults_for_missing_fields() {
        let theme: Theme = serde_json::from_str(r##"{"accent": "#ff0000"}"##).unwrap();
        assert_eq!(theme.accent, Color32::from_rgb(0xff, 0, 0));
        assert_eq!(theme.window_background, default_window_background());
        assert_eq!(theme.overlay.idle, 0.86);
    }

    #[test]
    fn load_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let theme = load_theme(&dir.path().join("theme.json"));
        assert_eq!(theme.accent, default_accent());
    }

    #[test]
    fn load_corrupt_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        std::fs::write(&path, "{oops").unwrap();
        let theme = load_theme(&path);
        assert_eq!(theme.window_background, default_window_background());
    }

    #[test]
    fn load_clamps_opacities() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        std::fs::write(&path, r#"{"overlay": {"idle": 3.0, "hover": -1.0}}"#).unwrap();
        let theme = load_theme(&path);
        assert_eq!(theme.overlay.idle, 1.0);
        assert_eq!(theme.overlay.hover, 0.0);
    }

    #[test]
    fn tag_colors_are_deterministic() {
        let theme = Theme::default();
        assert_eq!(theme.tag_color("chat"), theme.tag_color("chat"));
    }

    #[test]
    fn different_tags_usually_get_different_colors() {
        let theme = Theme::default();
        assert_ne!(theme.tag_color("chat"), theme.tag_color("work"));
    }

    #[test]
    fn hsv_conversion_hits_primaries() {
        assert_eq!(hsv_to_color(0.0, 1.0, 1.0), Color32::from_rgb(255, 0, 0));
        assert_eq!(hsv_to_color(120.0, 1.0, 1.0), Color32::from_rgb(0, 255, 0));
        assert_eq!(hsv_to_color(240.0, 1.0, 1.0), Color32::from_rgb(0, 0, 255));
    }
}
