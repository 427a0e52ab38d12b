use crate::gui::{fonts, theme};
use crate::state::{Message, ViewState};
use eframe::egui;
use egui::{Color32, Pos2, Rect};

/// Vertical gradient fill, `top` to `bottom`.
pub fn gradient_rect(painter: &egui::Painter, rect: Rect, top: Color32, bottom: Color32) {
    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(rect.left_top(), top);
    mesh.colored_vertex(rect.right_top(), top);
    mesh.colored_vertex(rect.right_bottom(), bottom);
    mesh.colored_vertex(rect.left_bottom(), bottom);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(egui::Shape::mesh(mesh));
}

/// Window header: gradient strip, centered title, close button on the left.
/// Dragging the strip moves the native window. Returns `true` when the close
/// button was clicked.
pub fn header(ui: &mut egui::Ui, title: &str, height: f32) -> bool {
    let width = ui.available_width();
    let (rect, drag) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::drag());
    let fill = theme::child_fill();
    gradient_rect(ui.painter(), rect, fill, theme::darken(fill, 0.8));

    if drag.drag_started() {
        ui.ctx().send_viewport_cmd(egui::ViewportCommand::StartDrag);
    }

    let font = fonts::style(fonts::TITLE).resolve(ui.style());
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        title,
        font,
        ui.visuals().text_color(),
    );

    let button_rect = Rect::from_min_size(
        Pos2::new(rect.left() + 5.0, rect.center().y - 12.5),
        egui::vec2(25.0, 25.0),
    );
    ui.put(button_rect, egui::Button::new("X"))
        .on_hover_text("Close")
        .clicked()
}

/// Green status line and red error line, centered.
pub fn message_lines(ui: &mut egui::Ui, state: &ViewState) {
    let (text, color) = match state.message() {
        Some(Message::Status(text)) if !text.is_empty() => (text, theme::STATUS_COLOR),
        Some(Message::Error(text)) if !text.is_empty() => (text, theme::ERROR_COLOR),
        _ => return,
    };
    ui.vertical_centered(|ui| {
        ui.colored_label(color, text.as_str());
    });
}

/// Full-width button sized like the login form buttons.
pub fn wide_button(ui: &mut egui::Ui, width: f32, label: &str) -> bool {
    ui.add_sized([width, 35.0], egui::Button::new(label)).clicked()
}

pub fn hinted_field(
    ui: &mut egui::Ui,
    value: &mut String,
    hint: &str,
    width: f32,
    password: bool,
) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .password(password)
            .font(fonts::style(fonts::SMALL_TITLE))
            .desired_width(width),
    )
}
