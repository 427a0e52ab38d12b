use eframe::egui;
use egui::{FontFamily, FontId, TextStyle};
use std::path::Path;

pub const NORMAL: &str = "normal";
pub const TITLE: &str = "title";
pub const SMALL_TITLE: &str = "smalltitle";
pub const SUBTITLE: &str = "subtitle";

const CUSTOM_FONT: &str = "loader_primary";

/// Named text styles and their sizes. The first entry is the body font.
pub fn named_text_styles() -> Vec<(TextStyle, FontId)> {
    [(NORMAL, 14.0), (TITLE, 22.0), (SMALL_TITLE, 18.0), (SUBTITLE, 10.0)]
        .into_iter()
        .map(|(name, size)| {
            (
                TextStyle::Name(name.into()),
                FontId::new(size, FontFamily::Proportional),
            )
        })
        .collect()
}

pub fn style(name: &str) -> TextStyle {
    TextStyle::Name(name.into())
}

/// Register the font at `path` as the primary proportional font. Returns
/// `false` and keeps the bundled fonts when it cannot be read.
pub fn install_fonts(ctx: &egui::Context, path: Option<&Path>) -> bool {
    let Some(path) = path else {
        return false;
    };
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(path = %path.display(), "font not loaded, using defaults: {err}");
            return false;
        }
    };
    let mut definitions = egui::FontDefinitions::default();
    definitions
        .font_data
        .insert(CUSTOM_FONT.to_owned(), egui::FontData::from_owned(bytes));
    definitions
        .families
        .entry(FontFamily::Proportional)
        .or_default()
        .insert(0, CUSTOM_FONT.to_owned());
    ctx.set_fonts(definitions);
    tracing::debug!(path = %path.display(), "custom font installed");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_header_hierarchy() {
        let styles = named_text_styles();
        let size = |name: &str| {
            styles
                .iter()
                .find(|(s, _)| *s == style(name))
                .map(|(_, f)| f.size)
                .unwrap()
        };
        assert!(size(TITLE) > size(SMALL_TITLE));
        assert!(size(SMALL_TITLE) > size(NORMAL));
        assert!(size(NORMAL) > size(SUBTITLE));
    }

    #[test]
    fn missing_font_file_keeps_defaults() {
        let ctx = egui::Context::default();
        assert!(!install_fonts(&ctx, Some(Path::new("/definitely/not/here.ttf"))));
        assert!(!install_fonts(&ctx, None));
    }
}
