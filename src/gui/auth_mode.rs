use super::LoaderApp;
use eframe::egui;

impl LoaderApp {
    /// Small always-visible panel in the top-right corner that switches
    /// between password login and license-only login.
    pub(super) fn auth_mode_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("Authentication Mode")
            .id(egui::Id::new("auth_mode_window"))
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
            .resizable(false)
            .collapsible(false)
            .auto_sized()
            .show(ctx, |ui| {
                let mut mode = self.state.license_only_mode();
                if ui.checkbox(&mut mode, "License-only login").changed() {
                    self.set_license_only_mode(mode);
                }
                ui.label(if mode {
                    "Uses stored local account"
                } else {
                    "Manual username/password"
                });
            });
    }
}
