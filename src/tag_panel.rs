//! Tag panel: a side list of tag chips with usage counts, used as a filter
//! shortcut. Tags are ordered by count descending with the `No tags`
//! pseudo-entry last.

use eframe::egui::{self, Color32, Rounding, Stroke};

use crate::prompts::NO_TAGS_LABEL;
use crate::theme::Theme;

/// Draw the tag list; returns the tag that was clicked, if any.
pub fn show_tag_panel(
    ui: &mut egui::Ui,
    tag_counts: &[(String, usize)],
    theme: &Theme,
) -> Option<String> {
    let mut clicked = None;

    ui.label(
        egui::RichText::new("TAGS")
            .color(theme.text_muted)
            .strong()
            .size(12.0),
    );
    ui.add_space(4.0);

    if tag_counts.is_empty() {
        ui.label(
            egui::RichText::new("No tags yet")
                .color(theme.text_muted)
                .italics()
                .size(11.0),
        );
        return None;
    }

    egui::ScrollArea::vertical()
        .id_salt("tag_panel_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.spacing_mut().item_spacing.y = 4.0;
            for (tag, count) in tag_counts {
                let color = if tag == NO_TAGS_LABEL {
                    theme.chip_background
                } else {
                    theme.tag_color(tag)
                };
                let text = egui::RichText::new(format!("#{} ({})", tag, count))
                    .color(Color32::WHITE)
                    .size(11.0);
                let button = egui::Button::new(text)
                    .fill(color)
                    .stroke(Stroke::NONE)
                    .rounding(Rounding::same(10.0))
                    .min_size(egui::vec2(ui.available_width(), 24.0));
                if ui.add(button).clicked() {
                    clicked = Some(tag.clone());
                }
            }
        });

    clicked
}
