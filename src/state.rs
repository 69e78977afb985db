//! View state machine.
//!
//! All window/UI state transitions go through one typed event enum and a
//! pure reducer, decoupled from rendering: hotkeys, buttons, and the tag
//! panel all dispatch [`AppEvent`]s, and [`reduce`] is the single place
//! deciding what they mean. Rendering reads the resulting [`ViewState`].

use crate::prompts::NO_TAGS_LABEL;

/// Window display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowMode {
    /// Regular decorated window.
    #[default]
    Normal,
    /// Frameless, semi-transparent, always-on-top window pinned to a corner.
    Overlay,
    /// Overlay shrunk to a thin side strip exposing only an expand control.
    Collapsed,
}

/// UI state that is never persisted. The filtered prompt subset is
/// deliberately absent: it is recomputed from (prompts, query) every frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub mode: WindowMode,
    pub tag_panel_shown: bool,
    pub query: String,
}

/// Typed UI events. Hotkey triggers and button clicks produce the same
/// events and flow through the same reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ToggleOverlay,
    ToggleTagPanel,
    Collapse,
    Expand,
    SetQuery(String),
    SelectTag(String),
    ClearQuery,
}

/// Pure reducer from (state, event) to the next state.
pub fn reduce(state: &ViewState, event: &AppEvent) -> ViewState {
    let mut next = state.clone();
    match event {
        AppEvent::ToggleOverlay => {
            next.mode = match state.mode {
                WindowMode::Normal => WindowMode::Overlay,
                // Toggling out of overlay always lands back in a normal
                // window, even from the collapsed strip.
                WindowMode::Overlay | WindowMode::Collapsed => WindowMode::Normal,
            };
        }
        AppEvent::ToggleTagPanel => {
            next.tag_panel_shown = !state.tag_panel_shown;
        }
        AppEvent::Collapse => {
            if state.mode == WindowMode::Overlay {
                next.mode = WindowMode::Collapsed;
            }
        }
        AppEvent::Expand => {
            if state.mode == WindowMode::Collapsed {
                next.mode = WindowMode::Overlay;
            }
        }
        AppEvent::SetQuery(query) => {
            next.query = query.clone();
        }
        AppEvent::SelectTag(tag) => {
            next.query = format!("#{}", tag);
        }
        AppEvent::ClearQuery => {
            next.query.clear();
        }
    }
    next
}

impl ViewState {
    /// Whether the window currently has native decorations.
    pub fn decorated(&self) -> bool {
        self.mode == WindowMode::Normal
    }

    /// Whether the window floats above everything else.
    pub fn always_on_top(&self) -> bool {
        matches!(self.mode, WindowMode::Overlay | WindowMode::Collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_overlay_from_normal_enters_overlay() {
        let state = ViewState::default();
        let next = reduce(&state, &AppEvent::ToggleOverlay);
        assert_eq!(next.mode, WindowMode::Overlay);
    }

    #[test]
    fn toggle_overlay_twice_is_identity() {
        let state = ViewState::default();
        let once = reduce(&state, &AppEvent::ToggleOverlay);
        let twice = reduce(&once, &AppEvent::ToggleOverlay);
        assert_eq!(twice, state);
    }

    #[test]
    fn toggle_overlay_from_collapsed_returns_to_normal() {
        let state = ViewState {
            mode: WindowMode::Collapsed,
            ..Default::default()
        };
        let next = reduce(&state, &AppEvent::ToggleOverlay);
        assert_eq!(next.mode, WindowMode::Normal);
    }

    #[test]
    fn collapse_only_applies_in_overlay() {
        let normal = ViewState::default();
        assert_eq!(reduce(&normal, &AppEvent::Collapse).mode, WindowMode::Normal);

        let overlay = ViewState {
            mode: WindowMode::Overlay,
            ..Default::default()
        };
        assert_eq!(
            reduce(&overlay, &AppEvent::Collapse).mode,
            WindowMode::Collapsed
        );
    }

    #[test]
    fn expand_only_applies_when_collapsed() {
        let overlay = ViewState {
            mode: WindowMode::Overlay,
            ..Default::default()
        };
        assert_eq!(reduce(&overlay, &AppEvent::Expand).mode, WindowMode::Overlay);

        let collapsed = ViewState {
            mode: WindowMode::Collapsed,
            ..Default::default()
        };
        assert_eq!(
            reduce(&collapsed, &AppEvent::Expand).mode,
            WindowMode::Overlay
        );
    }

    #[test]
    fn tag_panel_toggles() {
        let state = ViewState::default();
        let shown = reduce(&state, &AppEvent::ToggleTagPanel);
        assert!(shown.tag_panel_shown);
        let hidden = reduce(&shown, &AppEvent::ToggleTagPanel);
        assert!(!hidden.tag_panel_shown);
    }

    #[test]
    fn select_tag_sets_hash_query() {
        let state = ViewState::default();
        let next = reduce(&state, &AppEvent::SelectTag("chat".to_string()));
        assert_eq!(next.query, "#chat");

        let next = reduce(&state, &AppEvent::SelectTag(NO_TAGS_LABEL.to_string()));
        assert_eq!(next.query, "#No tags");
    }

    #[test]
    fn set_and_clear_query() {
        let state = ViewState::default();
        let typed = reduce(&state, &AppEvent::SetQuery("hello".to_string()));
        assert_eq!(typed.query, "hello");
        let cleared = reduce(&typed, &AppEvent::ClearQuery);
        assert_eq!(cleared.query, "");
    }

    #[test]
    fn reducer_does_not_mutate_input() {
        let state = ViewState::default();
        let _ = reduce(&state, &AppEvent::ToggleOverlay);
        assert_eq!(state.mode, WindowMode::Normal);
    }

    #[test]
    fn decoration_flags_follow_mode() {
        let normal = ViewState::default();
        assert!(normal.decorated());
        assert!(!normal.always_on_top());

        let overlay = ViewState {
            mode: WindowMode::Overlay,
            ..Default::default()
        };
        assert!(!overlay.decorated());
        assert!(overlay.always_on_top());
    }
}
