//! Roster row widgets: avatar badge and the inline commission editor.

use shared::domain::{CommissionKind, MemberProfile};

use crate::controller::reducer::CommissionEditor;
use crate::ui::theme::BoutiquePalette;

/// Per-frame styling for a roster row, derived from the active theme.
#[derive(Debug, Clone, Copy)]
pub struct RowStyle {
    pub palette: BoutiquePalette,
    pub accent: egui::Color32,
    pub text_scale: f32,
    pub compact: bool,
    pub rounding: u8,
    pub shade_row: bool,
}

impl RowStyle {
    pub fn avatar_size(&self) -> f32 {
        (if self.compact { 18.0 } else { 22.0 }) * self.text_scale
    }
}

/// What the user did to a row this frame. `saved` and `delete_requested` are
/// produced by single click events, so each maps to one backend action.
#[derive(Debug, Clone, Default)]
pub struct CommissionRowOutcome {
    pub saved: Option<shared::domain::Commission>,
    pub delete_requested: bool,
    pub edit_started: bool,
}

pub fn commission_row(
    ui: &mut egui::Ui,
    profile: &MemberProfile,
    editor: &mut CommissionEditor,
    reference_price: Option<f64>,
    avatar: Option<&egui::TextureHandle>,
    focus_input: bool,
    style: &RowStyle,
) -> CommissionRowOutcome {
    let mut outcome = CommissionRowOutcome::default();

    let (fill, stroke) = if editor.is_editing() {
        (
            style.palette.panel_background,
            egui::Stroke::new(1.0, style.palette.row_stroke),
        )
    } else if style.shade_row {
        (
            style.palette.row_hover.gamma_multiply(0.35),
            egui::Stroke::NONE,
        )
    } else {
        (egui::Color32::TRANSPARENT, egui::Stroke::NONE)
    };

    egui::Frame::new()
        .fill(fill)
        .stroke(stroke)
        .corner_radius(style.rounding)
        .inner_margin(egui::Margin::symmetric(8, 6))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                avatar_badge(ui, profile, avatar, style.avatar_size(), &style.palette);

                if editor.is_editing() {
                    outcome = show_edit_controls(
                        ui,
                        profile,
                        editor,
                        reference_price,
                        focus_input,
                        style,
                    );
                } else {
                    show_view_row(ui, profile, editor, style, &mut outcome);
                }
            });
        });

    outcome
}

fn show_view_row(
    ui: &mut egui::Ui,
    profile: &MemberProfile,
    editor: &mut CommissionEditor,
    style: &RowStyle,
    outcome: &mut CommissionRowOutcome,
) {
    ui.scope(|ui| {
        ui.set_max_width(150.0 * style.text_scale);
        ui.add(
            egui::Label::new(
                egui::RichText::new(&profile.name)
                    .color(style.palette.body_text)
                    .size(12.0 * style.text_scale),
            )
            .truncate(),
        );
    });

    let value_color = if editor.committed().is_zero() {
        style.palette.hint_text
    } else {
        style.accent
    };
    let display = editor.display_value();

    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        if ui
            .add(icon_btn("🗑", style.palette.danger_text))
            .on_hover_text("Xóa hoa hồng")
            .clicked()
        {
            outcome.delete_requested = true;
        }
        if ui
            .add(icon_btn("✏", style.palette.action_text))
            .on_hover_text("Sửa hoa hồng")
            .clicked()
        {
            editor.begin_edit();
            outcome.edit_started = true;
        }
        ui.label(
            egui::RichText::new(display)
                .color(value_color)
                .strong()
                .size(12.0 * style.text_scale),
        );
    });
}

fn show_edit_controls(
    ui: &mut egui::Ui,
    profile: &MemberProfile,
    editor: &mut CommissionEditor,
    reference_price: Option<f64>,
    focus_input: bool,
    style: &RowStyle,
) -> CommissionRowOutcome {
    let mut outcome = CommissionRowOutcome::default();

    kind_toggle(ui, editor, reference_price, style);

    let mut text = editor.draft_text().to_string();
    let response = ui.add(
        egui::TextEdit::singleline(&mut text)
            .id_salt(("commission_input", profile.member_id.0))
            .hint_text("0")
            .text_color(style.accent)
            .desired_width(86.0 * style.text_scale),
    );
    if focus_input {
        response.request_focus();
    }
    if response.changed() {
        editor.apply_input(&text);
    }
    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
    let dismissed = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Escape));

    let save_clicked = ui
        .add(icon_btn("✔", style.palette.positive_text))
        .on_hover_text("Lưu")
        .clicked();
    let cancel_clicked = ui
        .add(icon_btn("✕", style.palette.hint_text))
        .on_hover_text("Hủy")
        .clicked();

    if save_clicked || submitted {
        outcome.saved = Some(editor.save());
    } else if cancel_clicked || dismissed {
        editor.cancel_edit();
    }

    outcome
}

fn kind_toggle(
    ui: &mut egui::Ui,
    editor: &mut CommissionEditor,
    reference_price: Option<f64>,
    style: &RowStyle,
) {
    egui::Frame::new()
        .fill(style.palette.field_background)
        .stroke(egui::Stroke::new(1.0, style.palette.row_stroke))
        .corner_radius(style.rounding.min(6))
        .inner_margin(egui::Margin::symmetric(2, 2))
        .show(ui, |ui| {
            ui.spacing_mut().item_spacing.x = 2.0;
            for kind in [CommissionKind::Money, CommissionKind::Percent] {
                let active = editor.draft_kind() == kind;
                let (text_color, fill) = if active {
                    (egui::Color32::BLACK, style.accent)
                } else {
                    (style.palette.hint_text, egui::Color32::TRANSPARENT)
                };
                let mut label = egui::RichText::new(kind.symbol())
                    .color(text_color)
                    .size(11.0 * style.text_scale);
                if active {
                    label = label.strong();
                }
                let response = ui.add(
                    egui::Button::new(label)
                        .fill(fill)
                        .stroke(egui::Stroke::NONE)
                        .min_size(egui::vec2(22.0, 18.0)),
                );
                if response.clicked() {
                    editor.toggle_kind(kind, reference_price);
                }
            }
        });
}

/// Small borderless icon button used by the row action cluster.
fn icon_btn(icon: &str, color: egui::Color32) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(icon.to_owned()).color(color).size(14.0))
        .min_size(egui::vec2(24.0, 24.0))
        .stroke(egui::Stroke::NONE)
        .fill(egui::Color32::TRANSPARENT)
}

pub fn avatar_badge(
    ui: &mut egui::Ui,
    profile: &MemberProfile,
    texture: Option<&egui::TextureHandle>,
    size: f32,
    palette: &BoutiquePalette,
) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    if ui.is_rect_visible(rect) {
        match texture {
            Some(texture) => {
                egui::Image::from_texture(texture)
                    .corner_radius(size * 0.5)
                    .paint_at(ui, rect);
            }
            None => {
                ui.painter()
                    .circle_filled(rect.center(), size * 0.5, palette.badge_background);
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    profile.initial(),
                    egui::FontId::proportional(size * 0.45),
                    palette.body_text,
                );
            }
        }
    }
    response.on_hover_text(profile.name.clone())
}
