//! Hotkey strings.
//!
//! Config files describe hotkeys as `"alt+p"`-style strings. This module
//! parses them into a typed [`Shortcut`] and converts that one value into
//! both the OS-global registration types (`global_hotkey`) and the in-window
//! accelerator types (`egui`), so a single config entry drives both paths.

use eframe::egui;
use global_hotkey::hotkey::{Code, Modifiers as HotkeyModifiers};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing a shortcut string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortcutParseError {
    #[error("shortcut string is empty")]
    Empty,
    #[error("shortcut has no key, only modifiers")]
    MissingKey,
    #[error("unknown token '{0}' in shortcut")]
    UnknownToken(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
}

/// Modifier keys for a shortcut.
///
/// `cmd` is the platform accelerator: Command on macOS, Super elsewhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub cmd: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.cmd || self.ctrl || self.alt || self.shift
    }
}

/// A keyboard shortcut consisting of modifier keys and a main key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shortcut {
    pub key: String,
    pub modifiers: Modifiers,
}

impl Shortcut {
    pub fn parse(s: &str) -> Result<Self, ShortcutParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ShortcutParseError::Empty);
        }

        let normalized = s.replace('+', " ");
        let parts: Vec<&str> = normalized.split_whitespace().collect();
        if parts.is_empty() {
            return Err(ShortcutParseError::Empty);
        }

        let mut modifiers = Modifiers::default();
        let mut key_part: Option<&str> = None;

        for part in &parts {
            let part_lower = part.to_lowercase();
            match part_lower.as_str() {
                "cmd" | "command" | "meta" | "super" | "win" => modifiers.cmd = true,
                "ctrl" | "control" | "ctl" => modifiers.ctrl = true,
                "alt" | "opt" | "option" => modifiers.alt = true,
                "shift" | "shft" => modifiers.shift = true,
                _ => {
                    if key_part.is_some() {
                        return Err(ShortcutParseError::UnknownToken(part.to_string()));
                    }
                    key_part = Some(part);
                }
            }
        }

        let key = key_part.ok_or(ShortcutParseError::MissingKey)?;
        let canonical = canonicalize_key(key);
        if to_code(&canonical).is_none() {
            return Err(ShortcutParseError::UnknownKey(key.to_string()));
        }

        Ok(Self {
            key: canonical,
            modifiers,
        })
    }

    /// (Modifiers, Code) pair for registration with `global_hotkey`.
    pub fn to_global_hotkey(&self) -> Option<(HotkeyModifiers, Code)> {
        let code = to_code(&self.key)?;
        let mut mods = HotkeyModifiers::empty();
        if self.modifiers.cmd {
            mods |= HotkeyModifiers::META;
        }
        if self.modifiers.ctrl {
            mods |= HotkeyModifiers::CONTROL;
        }
        if self.modifiers.alt {
            mods |= HotkeyModifiers::ALT;
        }
        if self.modifiers.shift {
            mods |= HotkeyModifiers::SHIFT;
        }
        Some((mods, code))
    }

    /// (Modifiers, Key) pair for the in-window egui accelerator.
    pub fn to_egui(&self) -> Option<(egui::Modifiers, egui::Key)> {
        let key = to_egui_key(&self.key)?;
        let mods = egui::Modifiers {
            alt: self.modifiers.alt,
            ctrl: self.modifiers.ctrl,
            shift: self.modifiers.shift,
            mac_cmd: false,
            command: self.modifiers.cmd,
        };
        Some((mods, key))
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::new();
        if self.modifiers.ctrl {
            parts.push("Ctrl");
        }
        if self.modifiers.alt {
            parts.push("Alt");
        }
        if self.modifiers.shift {
            parts.push("Shift");
        }
        if self.modifiers.cmd {
            parts.push("Cmd");
        }
        let key_display = display_key(&self.key);
        for part in parts {
            write!(f, "{}+", part)?;
        }
        write!(f, "{}", key_display)
    }
}

/// Normalize key aliases to one canonical lowercase spelling.
fn canonicalize_key(key: &str) -> String {
    let lower = key.to_lowercase();
    match lower.as_str() {
        "return" => "enter".to_string(),
        "esc" => "escape".to_string(),
        ";" => "semicolon".to_string(),
        "," => "comma".to_string(),
        "." => "period".to_string(),
        "-" => "minus".to_string(),
        "/" => "slash".to_string(),
        "arrowup" => "up".to_string(),
        "arrowdown" => "down".to_string(),
        "arrowleft" => "left".to_string(),
        "arrowright" => "right".to_string(),
        _ => lower,
    }
}

fn display_key(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn to_code(key: &str) -> Option<Code> {
    let code = match key {
        "a" => Code::KeyA,
        "b" => Code::KeyB,
        "c" => Code::KeyC,
        "d" => Code::KeyD,
        "e" => Code::KeyE,
        "f" => Code::KeyF,
        "g" => Code::KeyG,
        "h" => Code::KeyH,
        "i" => Code::KeyI,
        "j" => Code::KeyJ,
        "k" => Code::KeyK,
        "l" => Code::KeyL,
        "m" => Code::KeyM,
        "n" => Code::KeyN,
        "o" => Code::KeyO,
        "p" => Code::KeyP,
        "q" => Code::KeyQ,
        "r" => Code::KeyR,
        "s" => Code::KeyS,
        "t" => Code::KeyT,
        "u" => Code::KeyU,
        "v" => Code::KeyV,
        "w" => Code::KeyW,
        "x" => Code::KeyX,
        "y" => Code::KeyY,
        "z" => Code::KeyZ,
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,
        "f1" => Code::F1,
        "f2" => Code::F2,
        "f3" => Code::F3,
        "f4" => Code::F4,
        "f5" => Code::F5,
        "f6" => Code::F6,
        "f7" => Code::F7,
        "f8" => Code::F8,
        "f9" => Code::F9,
        "f10" => Code::F10,
        "f11" => Code::F11,
        "f12" => Code::F12,
        "space" => Code::Space,
        "enter" => Code::Enter,
        "tab" => Code::Tab,
        "escape" => Code::Escape,
        "backspace" => Code::Backspace,
        "delete" => Code::Delete,
        "home" => Code::Home,
        "end" => Code::End,
        "pageup" => Code::PageUp,
        "pagedown" => Code::PageDown,
        "up" => Code::ArrowUp,
        "down" => Code::ArrowDown,
        "left" => Code::ArrowLeft,
        "right" => Code::ArrowRight,
        "semicolon" => Code::Semicolon,
        "comma" => Code::Comma,
        "period" => Code::Period,
        "slash" => Code::Slash,
        "minus" => Code::Minus,
        _ => return None,
    };
    Some(code)
}

fn to_egui_key(key: &str) -> Option<egui::Key> {
    use egui::Key;
    let key = match key {
        "a" => Key::A,
        "b" => Key::B,
        "c" => Key::C,
        "d" => Key::D,
        "e" => Key::E,
        "f" => Key::F,
        "g" => Key::G,
        "h" => Key::H,
        "i" => Key::I,
        "j" => Key::J,
        "k" => Key::K,
        "l" => Key::L,
        "m" => Key::M,
        "n" => Key::N,
        "o" => Key::O,
        "p" => Key::P,
        "q" => Key::Q,
        "r" => Key::R,
        "s" => Key::S,
        "t" => Key::T,
        "u" => Key::U,
        "v" => Key::V,
        "w" => Key::W,
        "x" => Key::X,
        "y" => Key::Y,
        "z" => Key::Z,
        "0" => Key::Num0,
        "1" => Key::Num1,
        "2" => Key::Num2,
        "3" => Key::Num3,
        "4" => Key::Num4,
        "5" => Key::Num5,
        "6" => Key::Num6,
        "7" => Key::Num7,
        "8" => Key::Num8,
        "9" => Key::Num9,
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        "space" => Key::Space,
        "enter" => Key::Enter,
        "tab" => Key::Tab,
        "escape" => Key::Escape,
        "backspace" => Key::Backspace,
        "delete" => Key::Delete,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "up" => Key::ArrowUp,
        "down" => Key::ArrowDown,
        "left" => Key::ArrowLeft,
        "right" => Key::ArrowRight,
        "semicolon" => Key::Semicolon,
        "comma" => Key::Comma,
        "period" => Key::Period,
        "slash" => Key::Slash,
        "minus" => Key::Minus,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_overlay_hotkey() {
        let shortcut = Shortcut::parse("alt+p").unwrap();
        assert!(shortcut.modifiers.alt);
        assert!(!shortcut.modifiers.ctrl);
        assert_eq!(shortcut.key, "p");
    }

    #[test]
    fn parses_multiple_modifiers() {
        let shortcut = Shortcut::parse("ctrl+shift+t").unwrap();
        assert!(shortcut.modifiers.ctrl);
        assert!(shortcut.modifiers.shift);
        assert_eq!(shortcut.key, "t");
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(
            Shortcut::parse("Alt+P").unwrap(),
            Shortcut::parse("alt+p").unwrap()
        );
    }

    #[test]
    fn accepts_modifier_aliases() {
        let a = Shortcut::parse("meta+k").unwrap();
        let b = Shortcut::parse("cmd+k").unwrap();
        let c = Shortcut::parse("super+k").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert!(a.modifiers.cmd);
    }

    #[test]
    fn accepts_key_aliases() {
        assert_eq!(Shortcut::parse("alt+return").unwrap().key, "enter");
        assert_eq!(Shortcut::parse("alt+esc").unwrap().key, "escape");
    }

    #[test]
    fn rejects_empty_string() {
        assert_eq!(Shortcut::parse(""), Err(ShortcutParseError::Empty));
        assert_eq!(Shortcut::parse("   "), Err(ShortcutParseError::Empty));
    }

    #[test]
    fn rejects_modifiers_without_key() {
        assert_eq!(
            Shortcut::parse("ctrl+shift"),
            Err(ShortcutParseError::MissingKey)
        );
    }

    #[test]
    fn rejects_two_keys() {
        assert_eq!(
            Shortcut::parse("a+b"),
            Err(ShortcutParseError::UnknownToken("b".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_key() {
        assert!(matches!(
            Shortcut::parse("alt+banana"),
            Err(ShortcutParseError::UnknownKey(_))
        ));
    }

    #[test]
    fn key_without_modifiers_is_allowed() {
        let shortcut = Shortcut::parse("f5").unwrap();
        assert!(!shortcut.modifiers.any());
        assert_eq!(shortcut.key, "f5");
    }

    #[test]
    fn converts_to_global_hotkey_types() {
        let (mods, code) = Shortcut::parse("alt+p").unwrap().to_global_hotkey().unwrap();
        assert_eq!(code, Code::KeyP);
        assert!(mods.contains(HotkeyModifiers::ALT));
        assert!(!mods.contains(HotkeyModifiers::SHIFT));
    }

    #[test]
    fn converts_digits_and_function_keys() {
        let (_, code) = Shortcut::parse("ctrl+3").unwrap().to_global_hotkey().unwrap();
        assert_eq!(code, Code::Digit3);
        let (_, code) = Shortcut::parse("f11").unwrap().to_global_hotkey().unwrap();
        assert_eq!(code, Code::F11);
    }

    #[test]
    fn converts_to_egui_types() {
        let (mods, key) = Shortcut::parse("alt+t").unwrap().to_egui().unwrap();
        assert_eq!(key, egui::Key::T);
        assert!(mods.alt);
        assert!(!mods.command);
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(Shortcut::parse("alt+p").unwrap().to_string(), "Alt+P");
        assert_eq!(
            Shortcut::parse("ctrl+shift+t").unwrap().to_string(),
            "Ctrl+Shift+T"
        );
        assert_eq!(Shortcut::parse("alt+space").unwrap().to_string(), "Alt+Space");
    }

    #[test]
    fn round_trips_through_serde() {
        let shortcut = Shortcut::parse("ctrl+alt+delete").unwrap();
        let json = serde_json::to_string(&shortcut).unwrap();
        let back: Shortcut = serde_json::from_str(&json).unwrap();
        assert_eq!(shortcut, back);
    }
}
