use super::{widgets, LoaderApp};
use eframe::egui;

impl LoaderApp {
    pub(super) fn login_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("Bootstrapper")
            .id(egui::Id::new("login_window"))
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .fixed_size([300.0, 400.0])
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                if widgets::header(ui, "Welcome Back", 35.0) {
                    self.request_exit();
                }
                ui.add_space(8.0);

                let width = ui.available_width() * 0.75;
                ui.vertical_centered(|ui| {
                    ui.add_space(15.0);
                    let user = widgets::hinted_field(ui, &mut self.login.username, "Login", width, false);
                    let pass =
                        widgets::hinted_field(ui, &mut self.login.password, "Password", width, true);
                    let submitted = (user.lost_focus() || pass.lost_focus())
                        && ui.input(|i| i.key_pressed(egui::Key::Enter));

                    ui.add_space(ui.available_height() / 2.5);
                    if widgets::wide_button(ui, width, "Login") || submitted {
                        self.submit_login();
                    }
                    if widgets::wide_button(ui, width, "Register") {
                        self.show_register();
                    }
                });

                widgets::message_lines(ui, &self.state);
            });
    }
}
