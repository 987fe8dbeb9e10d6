use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

/// Primary accent, the university purple of the original site
pub fn accent_color() -> Color32 {
    Color32::from_rgb(0x8a, 0x63, 0xd2)
}

pub fn setup_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    // Add Phosphor icons as fallback in the Proportional family
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    ctx.set_fonts(fonts);
}

pub fn setup_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    // Dark visuals with purple accents
    let mut visuals = Visuals::dark();

    // Background colors - near black
    let bg = Color32::from_rgb(12, 12, 14);
    visuals.panel_fill = bg;
    visuals.window_fill = bg;
    visuals.faint_bg_color = Color32::from_rgb(22, 22, 26);
    visuals.extreme_bg_color = bg;

    // Widget colors - cool grays
    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(38, 38, 44);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(172, 172, 180));

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(52, 52, 60);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(198, 198, 206));

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(74, 74, 86);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    // Accent color for active/pressed buttons
    let accent = accent_color();
    visuals.widgets.active.bg_fill = accent;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    // Selection color (accent background, white text)
    visuals.selection.bg_fill = accent;
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);

    // Hyperlink color (accent)
    visuals.hyperlink_color = accent;

    // Rounded corners
    visuals.widgets.noninteractive.rounding = Rounding::same(6.0);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);
    visuals.widgets.active.rounding = Rounding::same(6.0);
    visuals.window_rounding = Rounding::same(8.0);

    style.visuals = visuals;

    // Font sizes - standardized at 14pt
    style.text_styles = [
        (TextStyle::Small, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
    ]
    .into();

    // Spacing (scaled up)
    style.spacing.item_spacing = egui::vec2(12.0, 10.0);
    style.spacing.button_padding = egui::vec2(18.0, 10.0);
    style.spacing.window_margin = egui::Margin::same(24.0);

    ctx.set_style(style);
}

/// Returns (closed_bg, open_bg, text) for the weekday header cells
pub fn weekday_header_colors() -> (Color32, Color32, Color32) {
    (
        Color32::from_rgb(52, 52, 60),     // closed - cool gray
        accent_color(),                    // open - accent purple
        Color32::from_rgb(230, 230, 236),  // text
    )
}

/// Returns (bg_color, text_color, secondary_text_color) for comment cards
pub fn card_colors() -> (Color32, Color32, Color32) {
    (
        Color32::from_rgb(22, 22, 26),     // bg
        Color32::WHITE,                    // text
        Color32::from_rgb(166, 166, 176),  // secondary text
    )
}

/// Red used for inline form errors
pub fn error_color() -> Color32 {
    Color32::from_rgb(224, 108, 117)
}

/// Green used for confirmations
pub fn ok_color() -> Color32 {
    Color32::from_rgb(152, 195, 121)
}
