//! Application shell.
//!
//! `ClimptApp` owns the prompt list, configuration, theme, and view state.
//! Every frame it drains the hotkey and watcher channels, folds the
//! resulting events through the pure reducer in [`crate::state`], applies
//! window-mode changes as viewport commands, and renders the current state.
//! Data mutations (add/edit/delete/reorder) persist immediately; failures
//! surface as a modal error box and never touch the event loop.

use eframe::egui::{
    self, Align2, Color32, CursorIcon, Margin, Rounding, Sense, Stroke, ViewportCommand,
};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::card::{show_prompt_card, CardAction, CARD_HEIGHT, CARD_SPACING};
use crate::clipboard;
use crate::config::{load_config, save_config, Config, OverlayCorner};
use crate::dialogs::{
    show_about, show_error, ConfirmDelete, DialogOutcome, EditDialog, SettingsDialog,
};
use crate::error::ResultExt;
use crate::hotkeys::HotkeyService;
use crate::prompts::{
    filter_prompts, load_prompts, next_prompt_id, save_prompts, tag_counts, Prompt,
};
use crate::state::{reduce, AppEvent, ViewState, WindowMode};
use crate::tag_panel::show_tag_panel;
use crate::theme::{load_theme, Theme};
use crate::watcher::{ReloadEvent, SettingsWatcher};

/// Window sizes per mode, in points.
pub const NORMAL_SIZE: egui::Vec2 = egui::vec2(500.0, 600.0);
pub const OVERLAY_SIZE: egui::Vec2 = egui::vec2(400.0, 500.0);

/// Gap kept between the overlay and the screen edge.
const CORNER_MARGIN: f32 = 20.0;

const TOAST_DURATION: Duration = Duration::from_millis(1500);

/// At most one modal is open at a time.
enum Modal {
    Edit(EditDialog),
    Settings(SettingsDialog),
    ConfirmDelete(ConfirmDelete),
    About,
    Error(String),
}

/// In-flight card drag: which visible slot it started from.
#[derive(Clone, Copy)]
struct DragState {
    slot: usize,
}

pub struct ClimptApp {
    config: Config,
    config_path: PathBuf,
    prompts_path: PathBuf,
    theme_path: PathBuf,

    prompts: Vec<Prompt>,
    theme: Theme,
    view: ViewState,

    hotkeys: Option<HotkeyService>,
    event_tx: Sender<AppEvent>,
    event_rx: Receiver<AppEvent>,
    watcher: Option<SettingsWatcher>,
    reload_rx: Receiver<ReloadEvent>,

    modal: Option<Modal>,
    toast: Option<Instant>,
    drag: Option<DragState>,
}

impl ClimptApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config_path = crate::config::default_config_path();
        let prompts_path = crate::prompts::default_prompts_path();
        let theme_path = crate::theme::default_theme_path();

        let config = load_config(&config_path);
        let prompts = load_prompts(&prompts_path);
        let theme = load_theme(&theme_path);

        let (event_tx, event_rx) = channel();
        let hotkeys = HotkeyService::start(&config, event_tx.clone(), cc.egui_ctx.clone());
        let (watcher, reload_rx) =
            SettingsWatcher::start(crate::config::climpt_dir(), cc.egui_ctx.clone());

        let app = ClimptApp {
            config,
            config_path,
            prompts_path,
            theme_path,
            prompts,
            theme,
            view: ViewState::default(),
            hotkeys: Some(hotkeys),
            event_tx,
            event_rx,
            watcher: Some(watcher),
            reload_rx,
            modal: None,
            toast: None,
            drag: None,
        };
        app.apply_theme(&cc.egui_ctx);
        app
    }

    // ------------------------------------------------------------------
    // Events and window-state machine
    // ------------------------------------------------------------------

    /// Single entry point for every typed UI event.
    fn dispatch(&mut self, ctx: &egui::Context, event: AppEvent) {
        debug!(event_type = "ui_event", event = ?event, "Dispatch");
        let next = reduce(&self.view, &event);
        let mode_changed = next.mode != self.view.mode;
        self.view = next;
        if mode_changed {
            self.apply_window_mode(ctx);
        }
    }

    /// Push the current mode to the OS window: decorations, stacking level,
    /// size, and corner position.
    fn apply_window_mode(&mut self, ctx: &egui::Context) {
        let mode = self.view.mode;
        info!(event_type = "window_mode", mode = ?mode, "Applying window mode");

        ctx.send_viewport_cmd(ViewportCommand::Decorations(self.view.decorated()));
        let level = if self.view.always_on_top() {
            egui::WindowLevel::AlwaysOnTop
        } else {
            egui::WindowLevel::Normal
        };
        ctx.send_viewport_cmd(ViewportCommand::WindowLevel(level));

        let size = self.window_size_for(mode);
        ctx.send_viewport_cmd(ViewportCommand::InnerSize(size));

        if mode != WindowMode::Normal {
            self.move_to_corner(ctx, size);
        }
    }

    fn window_size_for(&self, mode: WindowMode) -> egui::Vec2 {
        match mode {
            WindowMode::Normal => NORMAL_SIZE,
            WindowMode::Overlay => OVERLAY_SIZE,
            WindowMode::Collapsed => egui::vec2(self.config.strip_width(), OVERLAY_SIZE.y),
        }
    }

    /// Pin the window to the configured corner. `Leave` keeps the current
    /// position.
    fn move_to_corner(&self, ctx: &egui::Context, size: egui::Vec2) {
        let corner = self.config.overlay.corner;
        if corner == OverlayCorner::Leave {
            return;
        }
        let Some(monitor) = ctx.input(|i| i.viewport().monitor_size) else {
            warn!("Monitor size unknown, leaving overlay where it is");
            return;
        };

        let max_x = (monitor.x - size.x - CORNER_MARGIN).max(0.0);
        let max_y = (monitor.y - size.y - CORNER_MARGIN).max(0.0);
        let pos = match corner {
            OverlayCorner::TopLeft => egui::pos2(CORNER_MARGIN, CORNER_MARGIN),
            OverlayCorner::TopRight => egui::pos2(max_x, CORNER_MARGIN),
            OverlayCorner::BottomLeft => egui::pos2(CORNER_MARGIN, max_y),
            OverlayCorner::BottomRight => egui::pos2(max_x, max_y),
            OverlayCorner::Leave => unreachable!(),
        };
        ctx.send_viewport_cmd(ViewportCommand::OuterPosition(pos));
    }

    fn drain_channels(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.dispatch(ctx, event);
        }
        while let Ok(reload) = self.reload_rx.try_recv() {
            match reload {
                ReloadEvent::Theme => {
                    self.theme = load_theme(&self.theme_path);
                    self.apply_theme(ctx);
                    info!(event_type = "reload", what = "theme", "Theme reloaded");
                }
                ReloadEvent::Config => {
                    self.config = load_config(&self.config_path);
                    self.restart_hotkeys(ctx);
                    if self.view.mode != WindowMode::Normal {
                        self.apply_window_mode(ctx);
                    }
                    info!(event_type = "reload", what = "config", "Config reloaded");
                }
            }
        }
    }

    /// The same config strings that drive the global hotkeys also work as
    /// in-window accelerators.
    fn handle_accelerators(&mut self, ctx: &egui::Context) {
        let pairs = [
            (self.config.overlay_shortcut(), AppEvent::ToggleOverlay),
            (self.config.tags_shortcut(), AppEvent::ToggleTagPanel),
        ];
        for (shortcut, event) in pairs {
            if let Some((mods, key)) = shortcut.to_egui() {
                if ctx.input_mut(|i| i.consume_key(mods, key)) {
                    self.dispatch(ctx, event);
                }
            }
        }
    }

    fn restart_hotkeys(&mut self, ctx: &egui::Context) {
        if let Some(hotkeys) = self.hotkeys.as_mut() {
            hotkeys.restart(&self.config, self.event_tx.clone(), ctx.clone());
        }
    }

    // ------------------------------------------------------------------
    // Data operations
    // ------------------------------------------------------------------

    fn persist(&mut self) {
        if let Err(e) = save_prompts(&self.prompts_path, &self.prompts) {
            warn!(error = %e, "Failed to save prompts");
            self.modal = Some(Modal::Error(e.user_message()));
        }
    }

    fn copy_prompt(&mut self, index: usize) {
        let Some(prompt) = self.prompts.get(index) else {
            return;
        };
        match clipboard::copy_text(&prompt.content) {
            Ok(()) => {
                info!(event_type = "clipboard", prompt_id = prompt.id, "Prompt copied");
                self.toast = Some(Instant::now());
            }
            Err(e) => {
                self.modal = Some(Modal::Error(e.user_message()));
            }
        }
    }

    fn apply_edit(&mut self, ctx: &egui::Context, dialog: &EditDialog) {
        let tags = dialog.parsed_tags();
        match dialog.id {
            None => {
                let id = next_prompt_id(&self.prompts);
                self.prompts.push(Prompt {
                    id,
                    name: dialog.name.trim().to_string(),
                    content: dialog.content.clone(),
                    tags,
                });
                info!(event_type = "prompt", action = "added", id, "Prompt added");
            }
            Some(id) => {
                if let Some(prompt) = self.prompts.iter_mut().find(|p| p.id == id) {
                    prompt.name = dialog.name.trim().to_string();
                    prompt.content = dialog.content.clone();
                    prompt.tags = tags;
                    info!(event_type = "prompt", action = "edited", id, "Prompt edited");
                }
            }
        }
        self.persist();
        // Mirror the original flow: a save resets the filter.
        self.dispatch(ctx, AppEvent::ClearQuery);
    }

    fn delete_prompt(&mut self, id: u64) {
        self.prompts.retain(|p| p.id != id);
        info!(event_type = "prompt", action = "deleted", id, "Prompt deleted");
        self.persist();
    }

    /// Move the prompt shown at `from_slot` so it occupies `to_slot`,
    /// where slots index the currently filtered view.
    fn reorder(&mut self, filtered: &[usize], from_slot: usize, to_slot: usize) {
        if from_slot == to_slot || from_slot >= filtered.len() || to_slot >= filtered.len() {
            return;
        }
        let from = filtered[from_slot];
        let to = filtered[to_slot];
        let prompt = self.prompts.remove(from);
        // Inserting at the (pre-removal) target index makes the dragged card
        // land on the slot the pointer was over, both directions.
        self.prompts.insert(to.min(self.prompts.len()), prompt);
        debug!(event_type = "prompt", action = "reordered", from, to, "Prompt reordered");
        self.persist();
    }

    // ------------------------------------------------------------------
    // Theme
    // ------------------------------------------------------------------

    fn apply_theme(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.theme.window_background;
        visuals.window_fill = self.theme.card_background;
        visuals.override_text_color = Some(self.theme.text_primary);
        visuals.selection.bg_fill = self.theme.accent.gamma_multiply(0.6);
        visuals.hyperlink_color = self.theme.accent;
        ctx.set_visuals(visuals);
    }

    /// Background fill for the current mode; overlay modes are translucent
    /// and firm up a little while hovered.
    fn background_fill(&self, ctx: &egui::Context) -> Color32 {
        match self.view.mode {
            WindowMode::Normal => self.theme.window_background,
            WindowMode::Overlay | WindowMode::Collapsed => {
                let hovered = ctx.input(|i| i.pointer.has_pointer());
                let opacity = if hovered {
                    self.theme.overlay.hover
                } else {
                    self.theme.overlay.idle
                };
                self.theme.window_background.gamma_multiply(opacity)
            }
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn show_collapsed_strip(&mut self, ctx: &egui::Context) {
        let fill = self.background_fill(ctx);
        let mut expand = false;

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(fill).inner_margin(Margin::same(4.0)))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    if ui
                        .button(egui::RichText::new("«").size(16.0))
                        .on_hover_text("Expand")
                        .clicked()
                    {
                        expand = true;
                    }
                });
                // The rest of the strip drags the window.
                let remainder = ui.available_rect_before_wrap();
                let response = ui.interact(remainder, ui.id().with("strip_drag"), Sense::drag());
                if response.drag_started() {
                    ctx.send_viewport_cmd(ViewportCommand::StartDrag);
                }
            });

        if expand {
            self.dispatch(ctx, AppEvent::Expand);
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        let fill = self.background_fill(ctx);
        let overlay = self.view.mode != WindowMode::Normal;
        let mut events: Vec<AppEvent> = Vec::new();
        let mut open_modal: Option<Modal> = None;

        egui::TopBottomPanel::top("top_bar")
            .frame(
                egui::Frame::none()
                    .fill(fill)
                    .inner_margin(Margin::symmetric(8.0, 6.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if overlay {
                        // Frameless window: the title doubles as a drag handle.
                        let handle = ui.add(
                            egui::Label::new(
                                egui::RichText::new("Climpt").strong().color(self.theme.accent),
                            )
                            .sense(Sense::drag()),
                        );
                        if handle.drag_started() {
                            ctx.send_viewport_cmd(ViewportCommand::StartDrag);
                        }
                        ui.separator();
                    }

                    let tags_label = if self.view.tag_panel_shown {
                        "Hide Tags"
                    } else {
                        "Tags"
                    };
                    if ui.button(tags_label).clicked() {
                        events.push(AppEvent::ToggleTagPanel);
                    }
                    if ui.button("Settings").clicked() {
                        open_modal = Some(Modal::Settings(SettingsDialog::from_config(
                            &self.config,
                        )));
                    }
                    if ui.button("About").clicked() {
                        open_modal = Some(Modal::About);
                    }
                    let overlay_label = if overlay { "Normal" } else { "Overlay" };
                    if ui.button(overlay_label).clicked() {
                        events.push(AppEvent::ToggleOverlay);
                    }
                    if ui.button("+ Add Prompt").clicked() {
                        open_modal = Some(Modal::Edit(EditDialog::new_prompt()));
                    }

                    if overlay && self.config.side_panel.collapsible {
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if ui
                                    .button("»")
                                    .on_hover_text("Collapse to strip")
                                    .clicked()
                                {
                                    events.push(AppEvent::Collapse);
                                }
                            },
                        );
                    }
                });
            });

        for event in events {
            self.dispatch(ctx, event);
        }
        if let Some(modal) = open_modal {
            self.modal = Some(modal);
        }
    }

    fn show_search_bar(&mut self, ctx: &egui::Context) {
        let fill = self.background_fill(ctx);
        let mut new_query: Option<String> = None;

        egui::TopBottomPanel::top("search_bar")
            .frame(
                egui::Frame::none()
                    .fill(fill)
                    .inner_margin(Margin::symmetric(8.0, 4.0)),
            )
            .show(ctx, |ui| {
                let mut buf = self.view.query.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut buf)
                        .hint_text("Search prompts or #tags...")
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    new_query = Some(buf);
                }
            });

        if let Some(query) = new_query {
            self.dispatch(ctx, AppEvent::SetQuery(query));
        }
    }

    fn show_tag_panel_side(&mut self, ctx: &egui::Context) {
        if !self.view.tag_panel_shown {
            return;
        }
        let fill = self.background_fill(ctx);
        let counts = tag_counts(&self.prompts);
        let mut selected: Option<String> = None;

        egui::SidePanel::left("tag_panel")
            .frame(
                egui::Frame::none()
                    .fill(fill)
                    .inner_margin(Margin::same(8.0)),
            )
            .default_width(140.0)
            .resizable(false)
            .show(ctx, |ui| {
                selected = show_tag_panel(ui, &counts, &self.theme);
            });

        if let Some(tag) = selected {
            self.dispatch(ctx, AppEvent::SelectTag(tag));
        }
    }

    fn show_prompt_list(&mut self, ctx: &egui::Context) {
        let fill = self.background_fill(ctx);
        let filtered = filter_prompts(&self.prompts, &self.view.query);

        let mut actions: Vec<(usize, CardAction)> = Vec::new();
        let mut drag_started: Option<usize> = None;
        let mut reorder_to: Option<(usize, usize)> = None;
        let mut drag_ended = false;

        let prompts = &self.prompts;
        let theme = &self.theme;
        let drag = self.drag;
        let row = CARD_HEIGHT + CARD_SPACING;

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(fill)
                    .inner_margin(Margin::same(8.0)),
            )
            .show(ctx, |ui| {
                if prompts.is_empty() {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            egui::RichText::new("No prompts yet - click '+ Add Prompt'")
                                .color(theme.text_muted),
                        );
                    });
                    return;
                }
                if filtered.is_empty() {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            egui::RichText::new("No prompts match the search")
                                .color(theme.text_muted),
                        );
                    });
                    return;
                }

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.spacing_mut().item_spacing.y = CARD_SPACING;
                        let list_top = ui.cursor().top();

                        for (slot, &index) in filtered.iter().enumerate() {
                            let highlighted = drag.map(|d| d.slot) == Some(slot);
                            let card = show_prompt_card(ui, &prompts[index], theme, highlighted);

                            if let Some(action) = card.action {
                                actions.push((index, action));
                            }
                            if card.response.drag_started() {
                                drag_started = Some(slot);
                            }
                            if card.response.drag_stopped() {
                                drag_ended = true;
                                if let (Some(state), Some(pos)) =
                                    (drag, card.response.interact_pointer_pos())
                                {
                                    let target = ((pos.y - list_top) / row)
                                        .floor()
                                        .clamp(0.0, filtered.len() as f32 - 1.0)
                                        as usize;
                                    reorder_to = Some((state.slot, target));
                                }
                            }
                        }

                        // Insertion marker while a drag is in flight.
                        if let Some(state) = drag {
                            if let Some(pos) = ui.ctx().pointer_interact_pos() {
                                ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
                                let target = ((pos.y - list_top) / row)
                                    .floor()
                                    .clamp(0.0, filtered.len() as f32 - 1.0)
                                    as usize;
                                if target != state.slot {
                                    let y = list_top + target as f32 * row - CARD_SPACING / 2.0;
                                    let rect = ui.max_rect();
                                    ui.painter().line_segment(
                                        [
                                            egui::pos2(rect.left(), y),
                                            egui::pos2(rect.right(), y),
                                        ],
                                        Stroke::new(2.0, theme.accent),
                                    );
                                }
                            }
                        }
                    });
            });

        if let Some(slot) = drag_started {
            self.drag = Some(DragState { slot });
        }
        if let Some((from, to)) = reorder_to {
            self.reorder(&filtered, from, to);
        }
        if drag_ended {
            self.drag = None;
        }

        for (index, action) in actions {
            match action {
                CardAction::Copy => self.copy_prompt(index),
                CardAction::Edit => {
                    if let Some(prompt) = self.prompts.get(index) {
                        self.modal = Some(Modal::Edit(EditDialog::for_prompt(prompt)));
                    }
                }
                CardAction::Delete => {
                    if let Some(prompt) = self.prompts.get(index) {
                        self.modal = Some(Modal::ConfirmDelete(ConfirmDelete {
                            id: prompt.id,
                            name: prompt.name.clone(),
                        }));
                    }
                }
                CardAction::TagClicked(tag) => {
                    self.dispatch(ctx, AppEvent::SelectTag(tag));
                }
            }
        }
    }

    fn show_toast(&mut self, ctx: &egui::Context) {
        let Some(shown_at) = self.toast else {
            return;
        };
        if shown_at.elapsed() >= TOAST_DURATION {
            self.toast = None;
            return;
        }

        egui::Area::new(egui::Id::new("copied_toast"))
            .anchor(Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(self.theme.toast_background)
                    .rounding(Rounding::same(6.0))
                    .inner_margin(Margin::symmetric(16.0, 8.0))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new("Copied!")
                                .color(Color32::WHITE)
                                .strong(),
                        );
                    });
            });
        // Keep repainting so the toast disappears on time even when idle.
        ctx.request_repaint_after(Duration::from_millis(100));
    }

    fn show_modal(&mut self, ctx: &egui::Context) {
        let Some(mut modal) = self.modal.take() else {
            return;
        };

        let keep = match &mut modal {
            Modal::Edit(dialog) => match dialog.show(ctx) {
                DialogOutcome::Open => true,
                DialogOutcome::Cancelled => false,
                DialogOutcome::Submitted => {
                    self.apply_edit(ctx, dialog);
                    false
                }
            },
            Modal::Settings(dialog) => match dialog.show(ctx) {
                DialogOutcome::Open => true,
                DialogOutcome::Cancelled => false,
                DialogOutcome::Submitted => {
                    dialog.apply_to(&mut self.config);
                    if let Err(e) = save_config(&self.config_path, &self.config) {
                        warn!(error = %e, "Failed to save config");
                        self.modal = Some(Modal::Error(e.user_message()));
                    }
                    self.restart_hotkeys(ctx);
                    if self.view.mode != WindowMode::Normal {
                        self.apply_window_mode(ctx);
                    }
                    if !self.config.side_panel.collapsible
                        && self.view.mode == WindowMode::Collapsed
                    {
                        self.dispatch(ctx, AppEvent::Expand);
                    }
                    false
                }
            },
            Modal::ConfirmDelete(confirm) => match confirm.show(ctx) {
                DialogOutcome::Open => true,
                DialogOutcome::Cancelled => false,
                DialogOutcome::Submitted => {
                    let id = confirm.id;
                    self.delete_prompt(id);
                    false
                }
            },
            Modal::About => show_about(ctx),
            Modal::Error(message) => show_error(ctx, message),
        };

        // A submit handler may have queued a follow-up modal (e.g. an error
        // box); don't clobber it.
        if keep && self.modal.is_none() {
            self.modal = Some(modal);
        }
    }

    fn shutdown(&mut self) {
        if let Some(mut hotkeys) = self.hotkeys.take() {
            hotkeys.stop();
        }
        if let Some(mut watcher) = self.watcher.take() {
            watcher.stop();
        }
        save_config(&self.config_path, &self.config).log_err();
        info!(event_type = "app_lifecycle", action = "stopped", "Shutdown complete");
    }
}

impl eframe::App for ClimptApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_channels(ctx);
        self.handle_accelerators(ctx);

        if self.view.mode == WindowMode::Collapsed {
            self.show_collapsed_strip(ctx);
        } else {
            self.show_top_bar(ctx);
            self.show_search_bar(ctx);
            self.show_tag_panel_side(ctx);
            self.show_prompt_list(ctx);
        }

        self.show_toast(ctx);
        self.show_modal(ctx);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        // The window itself stays transparent; panels paint the (possibly
        // translucent) background.
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shutdown();
    }
}
