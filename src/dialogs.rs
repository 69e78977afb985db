//! Modal dialogs: edit prompt, settings, about, delete confirmation, and the
//! error box. Each dialog is a small state struct owning its text buffers;
//! `show` renders it and reports what the user decided.

use eframe::egui::{self, Align2};

use crate::config::{Config, OverlayCorner};
use crate::prompts::Prompt;
use crate::shortcuts::Shortcut;

/// What a dialog did this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Still open.
    Open,
    /// Confirmed; the caller should apply the dialog's data.
    Submitted,
    Cancelled,
}

// ---------------------------------------------------------------------------
// Edit / add prompt
// ---------------------------------------------------------------------------

pub struct EditDialog {
    /// None while creating a new prompt.
    pub id: Option<u64>,
    pub name: String,
    pub content: String,
    pub tags_text: String,
}

impl EditDialog {
    pub fn new_prompt() -> Self {
        EditDialog {
            id: None,
            name: String::new(),
            content: String::new(),
            tags_text: String::new(),
        }
    }

    pub fn for_prompt(prompt: &Prompt) -> Self {
        EditDialog {
            id: Some(prompt.id),
            name: prompt.name.clone(),
            content: prompt.content.clone(),
            tags_text: prompt.tags.join(", "),
        }
    }

    /// Comma-separated tags, trimmed, empties dropped.
    pub fn parsed_tags(&self) -> Vec<String> {
        self.tags_text
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn show(&mut self, ctx: &egui::Context) -> DialogOutcome {
        let title = if self.id.is_some() {
            "Edit Prompt"
        } else {
            "Add New Prompt"
        };
        let mut outcome = DialogOutcome::Open;

        egui::Window::new(title)
            .collapsible(false)
            .resizable(true)
            .default_width(420.0)
            .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Name:");
                ui.text_edit_singleline(&mut self.name);
                ui.add_space(6.0);

                ui.label("Content:");
                ui.add(
                    egui::TextEdit::multiline(&mut self.content)
                        .desired_rows(8)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);

                ui.label("Tags (comma separated):");
                ui.text_edit_singleline(&mut self.tags_text);
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Cancel").clicked() {
                            outcome = DialogOutcome::Cancelled;
                        }
                        let ok = egui::Button::new("OK");
                        if ui.add_enabled(!self.name.trim().is_empty(), ok).clicked() {
                            outcome = DialogOutcome::Submitted;
                        }
                    });
                });
            });

        outcome
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

pub struct SettingsDialog {
    pub overlay_hotkey: String,
    pub tags_hotkey: String,
    pub corner: OverlayCorner,
    pub collapsible: bool,
    error: Option<String>,
}

impl SettingsDialog {
    pub fn from_config(config: &Config) -> Self {
        SettingsDialog {
            overlay_hotkey: config.hotkeys.overlay.clone(),
            tags_hotkey: config.hotkeys.tags.clone(),
            corner: config.overlay.corner,
            collapsible: config.side_panel.collapsible,
            error: None,
        }
    }

    /// Both hotkey strings must parse before the dialog may submit.
    pub fn validate(&self) -> Result<(), String> {
        Shortcut::parse(&self.overlay_hotkey)
            .map_err(|e| format!("Overlay hotkey: {}", e))?;
        Shortcut::parse(&self.tags_hotkey).map_err(|e| format!("Tags hotkey: {}", e))?;
        Ok(())
    }

    /// Write the dialog's values into `config`. Call only after `validate`.
    pub fn apply_to(&self, config: &mut Config) {
        config.hotkeys.overlay = self.overlay_hotkey.trim().to_string();
        config.hotkeys.tags = self.tags_hotkey.trim().to_string();
        config.overlay.corner = self.corner;
        config.side_panel.collapsible = self.collapsible;
    }

    pub fn show(&mut self, ctx: &egui::Context) -> DialogOutcome {
        let mut outcome = DialogOutcome::Open;

        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .default_width(360.0)
            .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.strong("Hotkeys");
                egui::Grid::new("hotkeys_grid")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Toggle Overlay:");
                        ui.text_edit_singleline(&mut self.overlay_hotkey);
                        ui.end_row();
                        ui.label("Toggle Tags:");
                        ui.text_edit_singleline(&mut self.tags_hotkey);
                        ui.end_row();
                    });

                ui.add_space(10.0);
                ui.strong("Overlay Position");
                egui::ComboBox::from_label("Corner")
                    .selected_text(self.corner.label())
                    .show_ui(ui, |ui| {
                        for corner in OverlayCorner::ALL {
                            ui.selectable_value(&mut self.corner, corner, corner.label());
                        }
                    });

                ui.add_space(10.0);
                ui.strong("Side Panel");
                ui.checkbox(&mut self.collapsible, "Allow collapsing overlay to a strip");

                if let Some(error) = &self.error {
                    ui.add_space(6.0);
                    ui.colored_label(egui::Color32::from_rgb(0xe0, 0x60, 0x60), error);
                }

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Cancel").clicked() {
                            outcome = DialogOutcome::Cancelled;
                        }
                        if ui.button("OK").clicked() {
                            match self.validate() {
                                Ok(()) => outcome = DialogOutcome::Submitted,
                                Err(e) => self.error = Some(e),
                            }
                        }
                    });
                });
            });

        outcome
    }
}

// ---------------------------------------------------------------------------
// Delete confirmation
// ---------------------------------------------------------------------------

pub struct ConfirmDelete {
    pub id: u64,
    pub name: String,
}

impl ConfirmDelete {
    pub fn show(&self, ctx: &egui::Context) -> DialogOutcome {
        let mut outcome = DialogOutcome::Open;

        egui::Window::new("Confirm Delete")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!("Are you sure you want to delete '{}'?", self.name));
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("No").clicked() {
                            outcome = DialogOutcome::Cancelled;
                        }
                        if ui.button("Yes").clicked() {
                            outcome = DialogOutcome::Submitted;
                        }
                    });
                });
            });

        outcome
    }
}

// ---------------------------------------------------------------------------
// About & error boxes
// ---------------------------------------------------------------------------

/// Returns false once dismissed.
pub fn show_about(ctx: &egui::Context) -> bool {
    let mut open = true;

    egui::Window::new("About Climpt")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(format!(
                "Climpt - Clipboard Prompt Manager\nVersion {}",
                env!("CARGO_PKG_VERSION")
            ));
            ui.add_space(4.0);
            ui.label("A lightweight tool for managing and inserting text prompts.");
            ui.add_space(10.0);
            if ui.button("Close").clicked() {
                open = false;
            }
        });

    open
}

/// Modal error box; returns false once dismissed.
pub fn show_error(ctx: &egui::Context, message: &str) -> bool {
    let mut open = true;

    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(message);
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                open = false;
            }
        });

    open
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_tags_trims_and_drops_empties() {
        let dialog = EditDialog {
            id: None,
            name: "x".to_string(),
            content: String::new(),
            tags_text: " chat , work ,, ,rust ".to_string(),
        };
        assert_eq!(dialog.parsed_tags(), vec!["chat", "work", "rust"]);
    }

    #[test]
    fn parsed_tags_of_empty_string_is_empty() {
        let dialog = EditDialog::new_prompt();
        assert!(dialog.parsed_tags().is_empty());
    }

    #[test]
    fn for_prompt_round_trips_tags() {
        let prompt = Prompt {
            id: 3,
            name: "Greet".to_string(),
            content: "Hello".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
        };
        let dialog = EditDialog::for_prompt(&prompt);
        assert_eq!(dialog.id, Some(3));
        assert_eq!(dialog.tags_text, "a, b");
        assert_eq!(dialog.parsed_tags(), prompt.tags);
    }

    #[test]
    fn settings_validation_rejects_bad_hotkeys() {
        let mut dialog = SettingsDialog::from_config(&Config::default());
        assert!(dialog.validate().is_ok());

        dialog.overlay_hotkey = "ctrl+".to_string();
        let err = dialog.validate().unwrap_err();
        assert!(err.starts_with("Overlay hotkey"));
    }

    #[test]
    fn settings_apply_writes_back_to_config() {
        let mut config = Config::default();
        let mut dialog = SettingsDialog::from_config(&config);
        dialog.overlay_hotkey = "ctrl+shift+p".to_string();
        dialog.corner = OverlayCorner::BottomLeft;
        dialog.collapsible = false;

        dialog.validate().unwrap();
        dialog.apply_to(&mut config);

        assert_eq!(config.hotkeys.overlay, "ctrl+shift+p");
        assert_eq!(config.overlay.corner, OverlayCorner::BottomLeft);
        assert!(!config.side_panel.collapsible);
    }
}
