use crate::profile::Subscription;
use eframe::egui;
use image::imageops::FilterType;
use std::collections::HashMap;

const ICON_EDGE: u32 = 64;

/// Decode an encoded product image into an icon-sized `ColorImage`.
pub fn decode_icon(bytes: &[u8]) -> anyhow::Result<egui::ColorImage> {
    let mut img = image::load_from_memory(bytes)?;
    if img.width() > ICON_EDGE || img.height() > ICON_EDGE {
        img = img.resize(ICON_EDGE, ICON_EDGE, FilterType::Triangle);
    }
    let size = [img.width() as usize, img.height() as usize];
    let rgba = img.to_rgba8();
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Icon textures for the subscription cards. Rebuilt lazily after the
/// profile changes; cards without a usable image get a letter placeholder.
#[derive(Default)]
pub struct ProductViews {
    icons: HashMap<String, egui::TextureHandle>,
    dirty: bool,
}

impl ProductViews {
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Drop every texture. egui frees them once the handles are gone.
    pub fn release(&mut self) {
        self.icons.clear();
        self.dirty = false;
    }

    pub fn rebuild_if_dirty(&mut self, ctx: &egui::Context, subscriptions: &[Subscription]) {
        if !self.dirty {
            return;
        }
        self.icons.clear();
        for sub in subscriptions {
            let Some(bytes) = sub.image.as_deref() else {
                continue;
            };
            match decode_icon(bytes) {
                Ok(image) => {
                    let key = sub.view_key().to_string();
                    let tex = ctx.load_texture(
                        format!("product-{key}"),
                        image,
                        egui::TextureOptions::LINEAR,
                    );
                    self.icons.insert(key, tex);
                }
                Err(err) => tracing::warn!(plan = %sub.plan, "product image not decoded: {err}"),
            }
        }
        self.dirty = false;
        tracing::debug!(icons = self.icons.len(), "product views rebuilt");
    }

    pub fn icon(&self, sub: &Subscription) -> Option<&egui::TextureHandle> {
        self.icons.get(sub.view_key())
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Rounded square with the plan's initial, used when there is no icon.
pub fn placeholder_icon(ui: &mut egui::Ui, plan: &str, size: f32) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(rect, egui::Rounding::same(6.0), ui.visuals().selection.bg_fill);
    let initial = plan
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initial,
        egui::FontId::proportional(size * 0.55),
        ui.visuals().text_color(),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn sub_with_image(plan: &str, image: Option<Vec<u8>>) -> Subscription {
        Subscription {
            plan: plan.into(),
            plan_id: format!("{plan}-id"),
            image,
            ..Default::default()
        }
    }

    #[test]
    fn large_images_are_downscaled() {
        let icon = decode_icon(&png(256, 128)).unwrap();
        assert_eq!(icon.size, [64, 32]);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode_icon(b"not an image").is_err());
    }

    #[test]
    fn rebuild_only_when_dirty_and_skips_bad_images() {
        let ctx = egui::Context::default();
        let subs = vec![
            sub_with_image("Rust", Some(png(8, 8))),
            sub_with_image("Broken", Some(b"junk".to_vec())),
            sub_with_image("Plain", None),
        ];
        let mut views = ProductViews::default();
        views.rebuild_if_dirty(&ctx, &subs);
        assert!(views.is_empty());

        views.mark_dirty();
        views.rebuild_if_dirty(&ctx, &subs);
        assert_eq!(views.len(), 1);
        assert!(views.icon(&subs[0]).is_some());
        assert!(views.icon(&subs[2]).is_none());
        assert!(!views.is_dirty());

        views.release();
        assert!(views.is_empty());
    }
}
