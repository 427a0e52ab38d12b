use super::product_views::placeholder_icon;
use super::{fonts, theme, widgets, LoaderApp};
use eframe::egui;
use std::time::Instant;

const CARD_HEIGHT: f32 = 40.0;
const ICON_SIZE: f32 = 32.0;

impl LoaderApp {
    pub(super) fn main_window(&mut self, ctx: &egui::Context, now: Instant) {
        egui::Window::new("Bootstrapper")
            .id(egui::Id::new("main_window"))
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .fixed_size([600.0, 400.0])
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                self.main_header(ui);
                ui.add_space(8.0);

                let list_height = (ui.available_height() - 110.0).max(CARD_HEIGHT);
                let clicked = egui::ScrollArea::vertical()
                    .max_height(list_height)
                    .auto_shrink([false, true])
                    .show(ui, |ui| self.subscription_cards(ui))
                    .inner;
                if let Some(index) = clicked {
                    self.select(index);
                }
                ui.separator();

                ui.horizontal(|ui| {
                    let loading = !self.timer.is_idle();
                    let load = ui.add_enabled(
                        !loading,
                        egui::Button::new("Load").min_size(egui::vec2(100.0, 25.0)),
                    );
                    if load.clicked() {
                        self.request_load(now);
                    }
                    let progress = self.load_progress(now);
                    let mut bar = egui::ProgressBar::new(progress);
                    if loading {
                        bar = bar.show_percentage().animate(self.timer.is_loading());
                    }
                    ui.add(bar);
                });

                ui.horizontal(|ui| {
                    let width = ui.available_width();
                    ui.add(
                        egui::TextEdit::singleline(&mut self.redeem_license)
                            .hint_text("License")
                            .desired_width(width * 0.75),
                    );
                    if ui
                        .add_sized([width * 0.225, 25.0], egui::Button::new("Redeem"))
                        .clicked()
                    {
                        self.submit_redeem();
                    }
                });

                widgets::message_lines(ui, &self.state);
            });
    }

    fn main_header(&mut self, ui: &mut egui::Ui) {
        let width = ui.available_width();
        let (rect, drag) = ui.allocate_exact_size(egui::vec2(width, 45.0), egui::Sense::drag());
        let fill = theme::child_fill();
        widgets::gradient_rect(ui.painter(), rect, fill, theme::darken(fill, 0.8));
        if drag.drag_started() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::StartDrag);
        }

        let text_color = ui.visuals().text_color();
        let title_font = fonts::style(fonts::TITLE).resolve(ui.style());
        let subtitle_font = fonts::style(fonts::SUBTITLE).resolve(ui.style());
        ui.painter().text(
            rect.left_top() + egui::vec2(5.0, 3.0),
            egui::Align2::LEFT_TOP,
            &self.config.application_name,
            title_font,
            text_color,
        );
        ui.painter().text(
            rect.left_bottom() + egui::vec2(15.0, -4.0),
            egui::Align2::LEFT_BOTTOM,
            format!("Welcome {}", self.user.username),
            subtitle_font,
            text_color,
        );

        let close = egui::Rect::from_min_size(
            egui::pos2(rect.right() - 30.0, rect.center().y - 12.5),
            egui::vec2(25.0, 25.0),
        );
        if ui.put(close, egui::Button::new("X")).clicked() {
            self.request_exit();
        }
    }

    /// One card per subscription. Returns the index of a clicked card.
    fn subscription_cards(&self, ui: &mut egui::Ui) -> Option<usize> {
        if self.user.subscriptions.is_empty() {
            ui.weak("No active subscriptions");
            return None;
        }
        let today = chrono::Local::now();
        let mut clicked = None;
        for (index, sub) in self.user.subscriptions.iter().enumerate() {
            let selected = self.selected == Some(index);
            let stroke = if selected {
                ui.visuals().selection.stroke
            } else {
                egui::Stroke::NONE
            };
            let card = egui::Frame::none()
                .fill(theme::darken(theme::child_fill(), 0.75))
                .rounding(egui::Rounding::same(6.0))
                .stroke(stroke)
                .inner_margin(egui::Margin::symmetric(10.0, 4.0))
                .show(ui, |ui| {
                    ui.set_min_size(egui::vec2(ui.available_width(), CARD_HEIGHT));
                    ui.horizontal(|ui| {
                        match self.products.icon(sub) {
                            Some(tex) => {
                                ui.add(
                                    egui::Image::new(tex)
                                        .fit_to_exact_size(egui::vec2(ICON_SIZE, ICON_SIZE)),
                                );
                            }
                            None => {
                                placeholder_icon(ui, &sub.plan, ICON_SIZE);
                            }
                        }
                        ui.vertical(|ui| {
                            ui.label(
                                egui::RichText::new(&sub.plan)
                                    .text_style(fonts::style(fonts::SMALL_TITLE)),
                            );
                            ui.label(
                                egui::RichText::new(format!(
                                    "Expires {}  Status: {}",
                                    sub.expiry_label(today),
                                    sub.status
                                ))
                                .text_style(fonts::style(fonts::SUBTITLE)),
                            );
                        });
                    });
                });
            let response = ui.interact(
                card.response.rect,
                ui.id().with(("subscription", index)),
                egui::Sense::click(),
            );
            if response.clicked() {
                clicked = Some(index);
            }
        }
        clicked
    }
}
