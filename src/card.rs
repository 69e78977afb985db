//! Prompt card rendering.
//!
//! Each card shows the prompt name, a one-line content preview, and its tag
//! chips. The card body is allocated before its children so chip clicks stay
//! with the chips while clicks and drags on the rest of the card belong to
//! the card itself.

use eframe::egui::{
    self, Align, Color32, Layout, Rounding, Sense, Stroke, UiBuilder, Vec2,
};

use crate::prompts::Prompt;
use crate::theme::Theme;
use crate::utils::content_preview;

/// Fixed card height; keeps drag-target math trivial.
pub const CARD_HEIGHT: f32 = 92.0;

/// Vertical gap between cards in the list.
pub const CARD_SPACING: f32 = 6.0;

const PREVIEW_MAX_CHARS: usize = 90;

/// What the user did to a card this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    /// Copy the prompt body to the clipboard.
    Copy,
    Edit,
    Delete,
    /// A tag chip was clicked; load `#tag` into the search field.
    TagClicked(String),
}

pub struct CardResponse {
    pub response: egui::Response,
    pub action: Option<CardAction>,
}

/// Draw one prompt card and report interactions.
pub fn show_prompt_card(
    ui: &mut egui::Ui,
    prompt: &Prompt,
    theme: &Theme,
    highlighted: bool,
) -> CardResponse {
    let desired = Vec2::new(ui.available_width(), CARD_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(desired, Sense::click_and_drag());
    let mut action = None;

    if ui.is_rect_visible(rect) {
        let border = if highlighted || response.hovered() {
            theme.card_border_hover
        } else {
            theme.card_border
        };
        ui.painter().rect(
            rect,
            Rounding::same(4.0),
            theme.card_background,
            Stroke::new(1.0, border),
        );

        let content_rect = rect.shrink(8.0);
        let builder = UiBuilder::new()
            .max_rect(content_rect)
            .layout(Layout::top_down(Align::Min));
        let mut content = ui.new_child(builder);
        content.spacing_mut().item_spacing.y = 4.0;

        content.label(
            egui::RichText::new(&prompt.name)
                .color(theme.accent)
                .strong()
                .size(14.0),
        );
        content.label(
            egui::RichText::new(content_preview(&prompt.content, PREVIEW_MAX_CHARS))
                .color(theme.text_muted)
                .size(12.0),
        );

        if !prompt.tags.is_empty() {
            content.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;
                for tag in &prompt.tags {
                    if show_tag_chip(ui, tag, theme.tag_color(tag)).clicked() {
                        action = Some(CardAction::TagClicked(tag.clone()));
                    }
                }
            });
        }
    }

    if response.clicked() && action.is_none() {
        action = Some(CardAction::Copy);
    }

    response.clone().context_menu(|ui| {
        if ui.button("Edit Prompt").clicked() {
            action = Some(CardAction::Edit);
            ui.close_menu();
        }
        if ui.button("Delete Prompt").clicked() {
            action = Some(CardAction::Delete);
            ui.close_menu();
        }
        ui.separator();
        if ui.button("Copy Content").clicked() {
            action = Some(CardAction::Copy);
            ui.close_menu();
        }
    });

    CardResponse { response, action }
}

/// A rounded tag chip (`#name`) with the tag's deterministic color.
pub fn show_tag_chip(ui: &mut egui::Ui, tag: &str, color: Color32) -> egui::Response {
    let text = egui::RichText::new(format!("#{}", tag))
        .color(Color32::WHITE)
        .size(11.0);
    ui.add(
        egui::Button::new(text)
            .fill(color)
            .stroke(Stroke::NONE)
            .rounding(Rounding::same(10.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_constants_leave_room_for_content() {
        // Name + preview + chip row at the chosen font sizes need this much.
        assert!(CARD_HEIGHT >= 80.0);
        assert!(CARD_SPACING > 0.0);
    }

    #[test]
    fn actions_compare_by_value() {
        assert_eq!(
            CardAction::TagClicked("chat".to_string()),
            CardAction::TagClicked("chat".to_string())
        );
        assert_ne!(CardAction::Copy, CardAction::Edit);
    }
}
