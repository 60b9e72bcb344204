//! App shell for the commission desk: roster screen, reference-price picker,
//! settings window, and the status banner.

use std::collections::HashMap;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};

use shared::domain::{Commission, MemberId, MemberProfile, ServiceItem, ServiceItemId};
use shared::locale;
use shared::protocol::MemberRow;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    classify_startup_failure, UiError, UiErrorCategory, UiErrorContext, UiEvent,
};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::CommissionEditor;
use crate::ui::theme::{
    boutique_dark_fallback_palette, scaled_text_styles, theme_boutique_dark_palette,
    visuals_for_theme, ThemePreset, ThemeSettings, UiReadabilitySettings,
};
use crate::ui::widgets::{commission_row, CommissionRowOutcome, RowStyle};

enum AvatarState {
    NotRequested,
    Loading,
    Ready(egui::TextureHandle),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Auth => "Access",
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Validation => "Invalid value",
        UiErrorCategory::Unknown => "Error",
    }
}

fn server_environment_label(project_url: &str) -> &'static str {
    if project_url.trim().is_empty() {
        "Unconfigured"
    } else if project_url.contains("127.0.0.1") || project_url.contains("localhost") {
        "Local"
    } else if project_url.contains("staging") {
        "Staging"
    } else if project_url.contains("dev") {
        "Development"
    } else {
        "Production"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum PersistedThemePreset {
    BoutiqueDark,
    SlateDark,
    EguiLight,
}

impl From<ThemePreset> for PersistedThemePreset {
    fn from(value: ThemePreset) -> Self {
        match value {
            ThemePreset::BoutiqueDark => Self::BoutiqueDark,
            ThemePreset::SlateDark => Self::SlateDark,
            ThemePreset::EguiLight => Self::EguiLight,
        }
    }
}

impl From<PersistedThemePreset> for ThemePreset {
    fn from(value: PersistedThemePreset) -> Self {
        match value {
            PersistedThemePreset::BoutiqueDark => Self::BoutiqueDark,
            PersistedThemePreset::SlateDark => Self::SlateDark,
            PersistedThemePreset::EguiLight => Self::EguiLight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct PersistedDesktopSettings {
    theme_preset: PersistedThemePreset,
    accent_color: [u8; 4],
    panel_rounding: u8,
    list_row_shading: bool,
    text_scale: f32,
    compact_density: bool,
    show_avatars: bool,
}

impl Default for PersistedDesktopSettings {
    fn default() -> Self {
        Self::from_runtime(
            ThemeSettings::boutique_default(),
            UiReadabilitySettings::defaults(),
        )
    }
}

impl PersistedDesktopSettings {
    fn into_runtime(self) -> (ThemeSettings, UiReadabilitySettings) {
        (
            ThemeSettings {
                preset: self.theme_preset.into(),
                accent_color: egui::Color32::from_rgba_unmultiplied(
                    self.accent_color[0],
                    self.accent_color[1],
                    self.accent_color[2],
                    self.accent_color[3],
                ),
                panel_rounding: self.panel_rounding.min(16),
                list_row_shading: self.list_row_shading,
            },
            UiReadabilitySettings {
                text_scale: self.text_scale.clamp(0.8, 1.4),
                compact_density: self.compact_density,
                show_avatars: self.show_avatars,
            },
        )
    }

    fn from_runtime(theme: ThemeSettings, readability: UiReadabilitySettings) -> Self {
        Self {
            theme_preset: theme.preset.into(),
            accent_color: theme.accent_color.to_srgba_unmultiplied(),
            panel_rounding: theme.panel_rounding,
            list_row_shading: theme.list_row_shading,
            text_scale: readability.text_scale,
            compact_density: readability.compact_density,
            show_avatars: readability.show_avatars,
        }
    }
}

const SETTINGS_STORAGE_KEY: &str = "commission_desk.settings";

struct RosterRow {
    profile: MemberProfile,
    editor: CommissionEditor,
    avatar: AvatarState,
}

pub struct CommissionDeskApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    project_url: String,

    rows: Vec<RosterRow>,
    service_items: Vec<ServiceItem>,
    selected_item: Option<ServiceItemId>,
    roster_loaded: bool,
    pending_focus: Option<MemberId>,

    status: String,
    status_banner: Option<StatusBanner>,

    settings_open: bool,

    theme: ThemeSettings,
    applied_theme: Option<ThemeSettings>,
    readability: UiReadabilitySettings,
    applied_readability: Option<UiReadabilitySettings>,
}

impl CommissionDeskApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted_settings: Option<PersistedDesktopSettings>,
        project_url: String,
    ) -> Self {
        let (theme, readability) = persisted_settings.unwrap_or_default().into_runtime();
        let mut status = "Loading roster...".to_string();
        dispatch_backend_command(&cmd_tx, BackendCommand::LoadRoster, &mut status);
        Self {
            cmd_tx,
            ui_rx,
            project_url,
            rows: Vec::new(),
            service_items: Vec::new(),
            selected_item: None,
            roster_loaded: false,
            pending_focus: None,
            status,
            status_banner: None,
            settings_open: false,
            theme,
            applied_theme: None,
            readability,
            applied_readability: None,
        }
    }

    fn row_mut(&mut self, member_id: MemberId) -> Option<&mut RosterRow> {
        self.rows
            .iter_mut()
            .find(|row| row.profile.member_id == member_id)
    }

    fn selected_reference_price(&self) -> Option<f64> {
        self.selected_item
            .and_then(|id| {
                self.service_items
                    .iter()
                    .find(|item| item.service_item_id == id)
            })
            .and_then(|item| item.reference_price())
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::RosterLoaded(rows) => {
                    self.roster_loaded = true;
                    self.status_banner = None;
                    self.status = format!("Loaded {} staff members", rows.len());
                    self.adopt_roster(rows);
                }
                UiEvent::ServiceItemsLoaded(rows) => {
                    self.service_items = rows.into_iter().map(|row| row.item()).collect();
                    if let Some(selected) = self.selected_item {
                        let still_present = self
                            .service_items
                            .iter()
                            .any(|item| item.service_item_id == selected);
                        if !still_present {
                            self.selected_item = None;
                        }
                    }
                }
                UiEvent::CommissionSaved {
                    member_id,
                    commission,
                } => {
                    if let Some(row) = self.row_mut(member_id) {
                        row.editor.sync_external(commission);
                    }
                    self.status = "Commission saved".to_string();
                }
                UiEvent::CommissionCleared { member_id } => {
                    if let Some(row) = self.row_mut(member_id) {
                        row.editor.sync_external(Commission::zero());
                    }
                    self.status = "Commission cleared".to_string();
                }
                UiEvent::AvatarReady { member_id, image } => {
                    let texture = ctx.load_texture(
                        format!("avatar-{}", member_id.0),
                        egui::ColorImage::from_rgba_unmultiplied(image.size, &image.rgba),
                        egui::TextureOptions::LINEAR,
                    );
                    if let Some(row) = self.row_mut(member_id) {
                        row.avatar = AvatarState::Ready(texture);
                    }
                }
                UiEvent::AvatarFailed { member_id, reason } => {
                    tracing::debug!(
                        member_id = member_id.0,
                        reason = %reason,
                        "avatar fetch failed; falling back to initial badge"
                    );
                    if let Some(row) = self.row_mut(member_id) {
                        row.avatar = AvatarState::Failed;
                    }
                }
                UiEvent::Error(err) => self.handle_ui_error(err),
            }
        }
    }

    /// Replaces the roster with freshly fetched rows. Rows that are mid-edit
    /// keep their draft: `sync_external` drops updates while editing.
    fn adopt_roster(&mut self, rows: Vec<MemberRow>) {
        let mut previous: HashMap<MemberId, RosterRow> = self
            .rows
            .drain(..)
            .map(|row| (row.profile.member_id, row))
            .collect();

        for row in rows {
            let commission = row.commission();
            let profile = row.profile();
            let entry = match previous.remove(&profile.member_id) {
                Some(mut existing) => {
                    if existing.profile.avatar_url != profile.avatar_url {
                        existing.avatar = AvatarState::NotRequested;
                    }
                    existing.profile = profile;
                    existing.editor.sync_external(commission);
                    existing
                }
                None => RosterRow {
                    profile,
                    editor: CommissionEditor::new(commission),
                    avatar: AvatarState::NotRequested,
                },
            };
            self.rows.push(entry);
        }
    }

    fn handle_ui_error(&mut self, err: UiError) {
        tracing::warn!(
            category = ?err.category(),
            context = ?err.context(),
            message = err.message(),
            "backend reported an error"
        );

        let headline = match err.context() {
            UiErrorContext::BackendStartup => classify_startup_failure(err.message()),
            UiErrorContext::LoadRoster => {
                format!("Could not load the roster: {}", err.message())
            }
            UiErrorContext::SaveCommission => {
                format!("Commission was not saved: {}", err.message())
            }
            UiErrorContext::ClearCommission => {
                format!("Commission was not cleared: {}", err.message())
            }
            UiErrorContext::FetchAvatar | UiErrorContext::General => err.message().to_string(),
        };

        self.status = headline.clone();
        if err.context() != UiErrorContext::FetchAvatar {
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Error,
                message: format!("{}: {}", err_label(err.category()), headline),
            });
        }

        // A failed write leaves the optimistic commit stale; pull the server
        // state back in.
        if matches!(
            err.context(),
            UiErrorContext::SaveCommission | UiErrorContext::ClearCommission
        ) {
            dispatch_backend_command(&self.cmd_tx, BackendCommand::LoadRoster, &mut self.status);
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_theme == Some(self.theme)
            && self.applied_readability == Some(self.readability)
        {
            return;
        }

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals_for_theme(self.theme);
        style.text_styles = scaled_text_styles(self.readability.text_scale);

        if self.readability.compact_density {
            style.spacing.item_spacing = egui::vec2(6.0, 3.0);
            style.spacing.button_padding = egui::vec2(8.0, 4.0);
            style.spacing.interact_size = egui::vec2(36.0, 22.0);
        } else {
            style.spacing.item_spacing = egui::vec2(8.0, 5.0);
            style.spacing.button_padding = egui::vec2(10.0, 6.0);
            style.spacing.interact_size = egui::vec2(36.0, 28.0);
        }
        ctx.set_style(style);
        self.applied_theme = Some(self.theme);
        self.applied_readability = Some(self.readability);
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        let palette =
            theme_boutique_dark_palette(self.theme).unwrap_or_else(boutique_dark_fallback_palette);
        let scale = self.readability.text_scale;

        egui::TopBottomPanel::top("top_bar")
            .frame(
                egui::Frame::new()
                    .fill(palette.panel_background)
                    .inner_margin(egui::Margin::symmetric(10, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("Commission Desk")
                            .strong()
                            .size(15.0 * scale)
                            .color(palette.title_text),
                    );
                    ui.add_space(4.0);
                    ui.label(
                        egui::RichText::new(server_environment_label(&self.project_url))
                            .size(11.0 * scale)
                            .color(palette.hint_text),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .button(egui::RichText::new("⚙").size(14.0))
                            .on_hover_text("Settings")
                            .clicked()
                        {
                            self.settings_open = !self.settings_open;
                        }
                        if ui
                            .button(egui::RichText::new("🔄").size(14.0))
                            .on_hover_text("Reload roster")
                            .clicked()
                        {
                            dispatch_backend_command(
                                &self.cmd_tx,
                                BackendCommand::LoadRoster,
                                &mut self.status,
                            );
                        }
                        ui.label(
                            egui::RichText::new(&self.status)
                                .size(11.0 * scale)
                                .color(palette.hint_text),
                        );
                    });
                });
            });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::new()
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(6.0);
        }
    }

    fn show_reference_picker(&mut self, ui: &mut egui::Ui) {
        let palette =
            theme_boutique_dark_palette(self.theme).unwrap_or_else(boutique_dark_fallback_palette);
        let scale = self.readability.text_scale;

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("Dịch vụ tham chiếu")
                    .color(palette.body_text)
                    .size(12.0 * scale),
            );

            let selected_label = self
                .selected_item
                .and_then(|id| {
                    self.service_items
                        .iter()
                        .find(|item| item.service_item_id == id)
                })
                .map(|item| item.name.clone())
                .unwrap_or_else(|| "Không theo dịch vụ".to_string());

            egui::ComboBox::from_id_salt("reference_item")
                .selected_text(selected_label)
                .width(240.0)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.selected_item, None, "Không theo dịch vụ");
                    for item in &self.service_items {
                        let label = match item.reference_price() {
                            Some(price) => {
                                format!("{} ({} ₫)", item.name, locale::format_grouped(price))
                            }
                            None => format!("{} (chưa có giá)", item.name),
                        };
                        ui.selectable_value(
                            &mut self.selected_item,
                            Some(item.service_item_id),
                            label,
                        );
                    }
                });

            match self.selected_reference_price() {
                Some(price) => {
                    ui.label(
                        egui::RichText::new(format!(
                            "Giá tham chiếu: {} ₫",
                            locale::format_grouped(price)
                        ))
                        .color(palette.hint_text)
                        .size(11.0 * scale),
                    );
                }
                None => {
                    ui.label(
                        egui::RichText::new("Đổi ₫/% sẽ xóa giá trị khi chưa chọn dịch vụ")
                            .color(palette.hint_text)
                            .size(11.0 * scale),
                    );
                }
            }
        });
    }

    fn show_roster(&mut self, ui: &mut egui::Ui) {
        let palette =
            theme_boutique_dark_palette(self.theme).unwrap_or_else(boutique_dark_fallback_palette);
        let scale = self.readability.text_scale;
        let accent = self.theme.accent_color;
        let compact = self.readability.compact_density;
        let rounding = self.theme.panel_rounding.min(10);
        let shading = self.theme.list_row_shading;
        let show_avatars = self.readability.show_avatars;
        let reference_price = self.selected_reference_price();

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("Hoa hồng nhân viên")
                    .strong()
                    .size(14.0 * scale)
                    .color(palette.title_text),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!("{} nhân viên", self.rows.len()))
                        .size(11.0 * scale)
                        .color(palette.hint_text),
                );
            });
        });
        ui.add_space(4.0);

        if !self.roster_loaded {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Đang tải danh sách nhân viên...");
            });
            return;
        }
        if self.rows.is_empty() {
            ui.label("Chưa có nhân viên nào.");
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (idx, row) in self.rows.iter_mut().enumerate() {
                    if show_avatars && matches!(row.avatar, AvatarState::NotRequested) {
                        match row.profile.avatar_url.clone() {
                            Some(url) => {
                                row.avatar = AvatarState::Loading;
                                dispatch_backend_command(
                                    &self.cmd_tx,
                                    BackendCommand::FetchAvatar {
                                        member_id: row.profile.member_id,
                                        url,
                                    },
                                    &mut self.status,
                                );
                            }
                            None => row.avatar = AvatarState::Failed,
                        }
                    }

                    let member_id = row.profile.member_id;
                    let focus_input = self.pending_focus == Some(member_id);
                    if focus_input {
                        self.pending_focus = None;
                    }

                    let style = RowStyle {
                        palette,
                        accent,
                        text_scale: scale,
                        compact,
                        rounding,
                        shade_row: shading && idx % 2 == 1,
                    };
                    let texture = if show_avatars {
                        match &row.avatar {
                            AvatarState::Ready(texture) => Some(texture),
                            _ => None,
                        }
                    } else {
                        None
                    };

                    let outcome = commission_row(
                        ui,
                        &row.profile,
                        &mut row.editor,
                        reference_price,
                        texture,
                        focus_input,
                        &style,
                    );

                    if outcome.edit_started {
                        self.pending_focus = Some(member_id);
                    }
                    if outcome.saved.is_some() {
                        self.status = format!("Saving commission for {}...", row.profile.name);
                    }
                    if outcome.delete_requested {
                        self.status = format!("Clearing commission for {}...", row.profile.name);
                    }
                    for command in commands_for_outcome(member_id, &outcome) {
                        dispatch_backend_command(&self.cmd_tx, command, &mut self.status);
                    }
                }
            });
    }

    fn show_settings_window(&mut self, ctx: &egui::Context) {
        if !self.settings_open {
            return;
        }

        let window_frame = egui::Frame::new()
            .fill(ctx.style().visuals.window_fill)
            .stroke(egui::Stroke::new(
                1.0,
                ctx.style().visuals.window_stroke().color,
            ))
            .corner_radius(self.popup_corner_radius())
            .inner_margin(egui::Margin::symmetric(12, 10));

        let mut settings_open = self.settings_open;
        let mut close_requested = false;

        egui::Window::new("settings_window")
            .title_bar(false)
            .frame(window_frame)
            .open(&mut settings_open)
            .resizable(false)
            .show(ctx, |ui| {
                self.apply_popup_menu_style(ui);
                ui.horizontal(|ui| {
                    self.show_popup_section_title(ui, "Settings");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").clicked() {
                            close_requested = true;
                        }
                    });
                });
                ui.separator();
                self.show_popup_section_title(ui, "Theme");
                egui::ComboBox::from_id_salt("theme_preset")
                    .selected_text(self.theme.preset.label())
                    .show_ui(ui, |ui| {
                        for preset in [
                            ThemePreset::BoutiqueDark,
                            ThemePreset::SlateDark,
                            ThemePreset::EguiLight,
                        ] {
                            ui.selectable_value(&mut self.theme.preset, preset, preset.label());
                        }
                    });
                ui.label("Accent color");
                ui.color_edit_button_srgba(&mut self.theme.accent_color);
                ui.add(
                    egui::Slider::new(&mut self.theme.panel_rounding, 0..=16)
                        .text("Panel rounding"),
                );
                ui.checkbox(
                    &mut self.theme.list_row_shading,
                    "Shade alternating roster rows",
                );

                ui.separator();
                self.show_popup_section_title(ui, "Readability");
                ui.add(
                    egui::Slider::new(&mut self.readability.text_scale, 0.8..=1.4)
                        .text("Text scale")
                        .step_by(0.05),
                );
                ui.checkbox(&mut self.readability.compact_density, "Compact row spacing");
                ui.checkbox(&mut self.readability.show_avatars, "Show avatar images");

                if ui.button("Reset to defaults").clicked() {
                    self.theme = ThemeSettings::boutique_default();
                    self.readability = UiReadabilitySettings::defaults();
                }
            });

        self.settings_open = settings_open && !close_requested;
    }

    fn popup_corner_radius(&self) -> egui::CornerRadius {
        egui::CornerRadius::same(self.theme.panel_rounding)
    }

    fn apply_popup_menu_style(&self, ui: &mut egui::Ui) {
        let s = ui.style_mut();
        let radius = self.popup_corner_radius();
        s.spacing.button_padding = egui::vec2(8.0, 3.0);
        s.spacing.item_spacing = egui::vec2(6.0, 3.0);
        s.visuals.widgets.inactive.corner_radius = radius;
        s.visuals.widgets.hovered.corner_radius = radius;
        s.visuals.widgets.active.corner_radius = radius;
        s.visuals.widgets.open.corner_radius = radius;
        s.visuals.widgets.noninteractive.corner_radius = radius;
    }

    fn show_popup_section_title(&self, ui: &mut egui::Ui, title: &str) {
        ui.label(
            egui::RichText::new(title)
                .strong()
                .size(13.0 * self.readability.text_scale),
        );
    }
}

/// Maps a row outcome to backend commands. Each user action produces at most
/// one command, which is what keeps save and delete single-shot.
fn commands_for_outcome(member_id: MemberId, outcome: &CommissionRowOutcome) -> Vec<BackendCommand> {
    let mut commands = Vec::new();
    if let Some(commission) = outcome.saved {
        commands.push(BackendCommand::UpdateCommission {
            member_id,
            commission,
        });
    }
    if outcome.delete_requested {
        commands.push(BackendCommand::ClearCommission { member_id });
    }
    commands
}

impl eframe::App for CommissionDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);
        self.apply_theme_if_needed(ctx);

        self.show_top_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            self.show_reference_picker(ui);
            ui.add_space(6.0);
            self.show_roster(ui);
        });
        self.show_settings_window(ctx);

        // Events from the worker arrive between frames.
        ctx.request_repaint_after(Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedDesktopSettings::from_runtime(self.theme, self.readability);
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

pub(crate) fn load_persisted_settings(
    storage: Option<&dyn eframe::Storage>,
) -> Option<PersistedDesktopSettings> {
    storage.and_then(|storage| {
        storage
            .get_string(SETTINGS_STORAGE_KEY)
            .and_then(|text| serde_json::from_str::<PersistedDesktopSettings>(&text).ok())
    })
}
