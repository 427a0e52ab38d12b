use super::{fonts, LoaderApp};
use eframe::egui;
use std::time::Instant;

impl LoaderApp {
    pub(super) fn load_complete_popup(&mut self, ctx: &egui::Context, now: Instant) {
        egui::Window::new("Ready")
            .id(egui::Id::new("load_complete_popup"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(format!("{} is ready", self.timer.product()))
                        .text_style(fonts::style(fonts::SMALL_TITLE)),
                );
                ui.label("Press Continue to download and start it.");
                ui.vertical_centered(|ui| {
                    if ui.button("Continue").clicked() {
                        self.dismiss_popup(now);
                    }
                });
            });
    }

    /// Dims the whole viewport and swallows input while the host is busy.
    pub(super) fn busy_overlay(&mut self, ctx: &egui::Context) {
        let screen = ctx.screen_rect();
        let progress = self.busy.progress;
        egui::Area::new(egui::Id::new("busy_overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                let (rect, _) = ui.allocate_exact_size(screen.size(), egui::Sense::click_and_drag());
                ui.painter()
                    .rect_filled(rect, 0.0, egui::Color32::from_black_alpha(160));

                let panel = egui::Rect::from_center_size(rect.center(), egui::vec2(220.0, 70.0));
                ui.allocate_ui_at_rect(panel, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add(egui::Spinner::new().size(24.0));
                        if let Some(progress) = progress {
                            ui.add(egui::ProgressBar::new(progress).show_percentage());
                        }
                    });
                });
            });
    }
}
