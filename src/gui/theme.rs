use crate::gui::fonts;
use eframe::egui;
use egui::{Color32, Rounding, Stroke};

pub const STATUS_COLOR: Color32 = Color32::from_rgb(178, 229, 178);
pub const ERROR_COLOR: Color32 = Color32::from_rgb(255, 102, 102);

fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color32 {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(to_u8(r), to_u8(g), to_u8(b), to_u8(a))
}

/// Scale the RGB channels by `factor`, keeping alpha.
pub fn darken(color: Color32, factor: f32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let scale = |c: u8| ((c as f32 / 255.0 * factor).clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(scale(r), scale(g), scale(b), a)
}

/// Fill used behind headers and product cards.
pub fn child_fill() -> Color32 {
    rgba(0.12, 0.12, 0.12, 0.90)
}

pub fn base_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    let text = rgba(0.95, 0.95, 0.95, 1.0);
    let accent = rgba(0.26, 0.59, 0.98, 1.0);
    let border = rgba(0.43, 0.43, 0.50, 0.50);

    visuals.override_text_color = Some(text);
    visuals.window_fill = rgba(0.08, 0.08, 0.08, 0.95);
    visuals.panel_fill = Color32::TRANSPARENT;
    visuals.faint_bg_color = child_fill();
    visuals.extreme_bg_color = rgba(0.20, 0.20, 0.20, 0.80);
    visuals.window_stroke = Stroke::new(1.0, border);
    visuals.window_rounding = Rounding::same(12.0);
    visuals.hyperlink_color = accent;
    visuals.error_fg_color = ERROR_COLOR;
    visuals.warn_fg_color = rgba(0.90, 0.70, 0.00, 1.0);

    visuals.widgets.noninteractive.bg_fill = child_fill();
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, border);

    let button = rgba(0.16, 0.16, 0.16, 1.0);
    let hovered = rgba(0.25, 0.25, 0.25, 1.0);
    let active = rgba(0.28, 0.28, 0.28, 1.0);
    for (widget, fill) in [
        (&mut visuals.widgets.inactive, button),
        (&mut visuals.widgets.hovered, hovered),
        (&mut visuals.widgets.active, active),
        (&mut visuals.widgets.open, active),
    ] {
        widget.bg_fill = fill;
        widget.weak_bg_fill = fill;
        widget.bg_stroke = Stroke::NONE;
        widget.rounding = Rounding::same(6.0);
    }

    visuals.selection.bg_fill = rgba(0.26, 0.59, 0.98, 0.35);
    visuals.selection.stroke = Stroke::new(1.0, accent);
    visuals
}

/// Dark launcher style on top of `defaults`, including the named text styles
/// the views rely on.
pub fn base_style(defaults: &egui::Style) -> egui::Style {
    let mut style = defaults.clone();
    style.visuals = base_visuals();
    style.spacing.window_margin = egui::Margin::same(15.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.scroll.bar_width = 2.0;
    for (text_style, font) in fonts::named_text_styles() {
        style.text_styles.insert(text_style, font);
    }
    style
}

pub fn apply_base_theme(ctx: &egui::Context) {
    let style = base_style(&ctx.style());
    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::{base_style, darken, ERROR_COLOR};
    use crate::gui::fonts;
    use eframe::egui;
    use egui::Color32;

    #[test]
    fn darken_scales_rgb() {
        let d = darken(Color32::from_rgb(200, 100, 50), 0.5);
        assert_eq!(d, Color32::from_rgb(100, 50, 25));
    }

    #[test]
    fn darken_keeps_alpha() {
        let d = darken(Color32::from_rgba_unmultiplied(200, 100, 50, 128), 0.5);
        assert_eq!(d.a(), 128);
    }

    #[test]
    fn darken_clamps_brightening_factors() {
        let c = Color32::from_rgb(200, 200, 200);
        assert_eq!(darken(c, 2.0), Color32::from_rgb(255, 255, 255));
    }

    #[test]
    fn style_registers_named_fonts() {
        let style = base_style(&egui::Style::default());
        for name in [fonts::NORMAL, fonts::TITLE, fonts::SMALL_TITLE, fonts::SUBTITLE] {
            assert!(style
                .text_styles
                .contains_key(&egui::TextStyle::Name(name.into())));
        }
        assert_eq!(style.visuals.error_fg_color, ERROR_COLOR);
        assert!(style.visuals.dark_mode);
    }
}
