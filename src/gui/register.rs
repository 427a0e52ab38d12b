use super::{widgets, LoaderApp};
use eframe::egui;

impl LoaderApp {
    pub(super) fn register_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("Bootstrapper")
            .id(egui::Id::new("register_window"))
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .fixed_size([300.0, 400.0])
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                if widgets::header(ui, "Join Us Today", 35.0) {
                    self.request_exit();
                }
                ui.add_space(8.0);

                let width = ui.available_width() * 0.75;
                ui.vertical_centered(|ui| {
                    ui.add_space(15.0);
                    let form = &mut self.register;
                    widgets::hinted_field(ui, &mut form.username, "Login", width, false);
                    widgets::hinted_field(ui, &mut form.password, "Password", width, true);
                    widgets::hinted_field(ui, &mut form.license, "License", width, false);

                    ui.add_space(ui.available_height() / 3.5);
                    if widgets::wide_button(ui, width, "Create Account") {
                        self.submit_register();
                    }
                    if widgets::wide_button(ui, width, "Back To Login") {
                        self.show_login();
                    }
                });

                widgets::message_lines(ui, &self.state);
            });
    }
}
