//! Theme presets, palette, and egui visuals for the desktop app.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePreset {
    BoutiqueDark,
    SlateDark,
    EguiLight,
}

impl ThemePreset {
    pub fn label(self) -> &'static str {
        match self {
            ThemePreset::BoutiqueDark => "Boutique Dark",
            ThemePreset::SlateDark => "Slate Dark",
            ThemePreset::EguiLight => "egui Light",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeSettings {
    pub preset: ThemePreset,
    pub accent_color: egui::Color32,
    pub panel_rounding: u8,
    pub list_row_shading: bool,
}

impl ThemeSettings {
    pub fn boutique_default() -> Self {
        Self {
            preset: ThemePreset::BoutiqueDark,
            accent_color: egui::Color32::from_rgb(212, 175, 55),
            panel_rounding: 8,
            list_row_shading: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiReadabilitySettings {
    pub text_scale: f32,
    pub compact_density: bool,
    pub show_avatars: bool,
}

impl UiReadabilitySettings {
    pub fn defaults() -> Self {
        Self {
            text_scale: 1.0,
            compact_density: false,
            show_avatars: true,
        }
    }
}

/// Colors for the dark boutique look. Accent-derived colors are not included;
/// they come from [`ThemeSettings::accent_color`].
#[derive(Debug, Clone, Copy)]
pub struct BoutiquePalette {
    pub app_background: egui::Color32,
    pub panel_background: egui::Color32,
    pub field_background: egui::Color32,
    pub row_hover: egui::Color32,
    pub row_stroke: egui::Color32,
    pub title_text: egui::Color32,
    pub body_text: egui::Color32,
    pub hint_text: egui::Color32,
    pub positive_text: egui::Color32,
    pub danger_text: egui::Color32,
    pub action_text: egui::Color32,
    pub badge_background: egui::Color32,
}

pub fn theme_boutique_dark_palette(theme: ThemeSettings) -> Option<BoutiquePalette> {
    (theme.preset == ThemePreset::BoutiqueDark).then_some(BoutiquePalette {
        app_background: egui::Color32::from_rgb(23, 23, 25),
        panel_background: egui::Color32::from_rgb(14, 14, 16),
        field_background: egui::Color32::from_rgb(10, 10, 12),
        row_hover: egui::Color32::from_rgb(34, 34, 38),
        row_stroke: egui::Color32::from_rgb(46, 46, 52),
        title_text: egui::Color32::from_rgb(226, 232, 240),
        body_text: egui::Color32::from_rgb(203, 213, 225),
        hint_text: egui::Color32::from_rgb(100, 116, 139),
        positive_text: egui::Color32::from_rgb(16, 185, 129),
        danger_text: egui::Color32::from_rgb(248, 113, 113),
        action_text: egui::Color32::from_rgb(96, 165, 250),
        badge_background: egui::Color32::from_rgb(64, 64, 70),
    })
}

pub fn boutique_dark_fallback_palette() -> BoutiquePalette {
    theme_boutique_dark_palette(ThemeSettings::boutique_default())
        .expect("BoutiqueDark fallback palette should always exist")
}

pub fn visuals_for_theme(theme: ThemeSettings) -> egui::Visuals {
    let mut visuals = match theme.preset {
        ThemePreset::BoutiqueDark => {
            let mut v = egui::Visuals::dark();
            let palette = theme_boutique_dark_palette(theme)
                .expect("BoutiqueDark palette should exist for BoutiqueDark preset");
            v.override_text_color = None;
            v.window_fill = palette.app_background;
            v.panel_fill = palette.app_background;
            v.extreme_bg_color = palette.field_background;
            v.faint_bg_color = palette.row_hover;
            v
        }
        ThemePreset::SlateDark => {
            let mut v = egui::Visuals::dark();
            v.override_text_color = Some(egui::Color32::from_rgb(203, 213, 225));
            v.window_fill = egui::Color32::from_rgb(30, 41, 59);
            v.panel_fill = egui::Color32::from_rgb(15, 23, 42);
            v.extreme_bg_color = egui::Color32::from_rgb(2, 6, 23);
            v.faint_bg_color = egui::Color32::from_rgb(51, 65, 85);
            v
        }
        ThemePreset::EguiLight => egui::Visuals::light(),
    };

    visuals.hyperlink_color = theme.accent_color;
    visuals.selection.bg_fill = theme.accent_color;
    visuals.widgets.active.bg_fill = theme.accent_color;
    visuals.widgets.hovered.bg_fill = lighten_color(theme.accent_color, 0.12);

    let popup_radius = theme.panel_rounding.clamp(4, 16);
    visuals.menu_corner_radius = egui::CornerRadius::same(popup_radius);
    visuals.window_corner_radius = egui::CornerRadius::same(popup_radius.saturating_add(2));

    if let Some(palette) = theme_boutique_dark_palette(theme) {
        visuals.window_fill = palette.panel_background;
        visuals.panel_fill = palette.app_background;
        visuals.window_stroke = egui::Stroke::new(1.0, palette.row_stroke);
        visuals.widgets.noninteractive.bg_fill = palette.panel_background;
        visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, palette.row_stroke);
        visuals.widgets.inactive.bg_fill = palette.row_hover;
        visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, palette.row_stroke);
        visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, palette.row_stroke);
    }

    visuals
}

pub fn scaled_text_styles(text_scale: f32) -> BTreeMap<egui::TextStyle, egui::FontId> {
    let mut styles = egui::Style::default().text_styles;
    for font in styles.values_mut() {
        font.size *= text_scale;
    }
    styles
}

pub fn lighten_color(color: egui::Color32, amount: f32) -> egui::Color32 {
    let t = amount.clamp(0.0, 1.0);
    let mix = |channel: u8| -> u8 {
        let c = channel as f32;
        (c + (255.0 - c) * t).round().clamp(0.0, 255.0) as u8
    };
    egui::Color32::from_rgba_unmultiplied(
        mix(color.r()),
        mix(color.g()),
        mix(color.b()),
        color.a(),
    )
}
