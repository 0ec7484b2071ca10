//! Reusable UI components
//!
//! This module contains standalone UI components that can be used
//! throughout the application.

use crate::theme;
use eframe::egui;

/// Dimmed uppercase section header used in the sidebar
pub fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.add(
        egui::Label::new(egui::RichText::new(text).color(theme::TEXT_DIM).size(11.0))
            .selectable(false),
    );
}

/// Full-width painted button with hover/press effects. Returns true if clicked.
pub fn wide_button(
    ui: &mut egui::Ui,
    label: &str,
    base_fill: egui::Color32,
    text_color: egui::Color32,
    height: f32,
    enabled: bool,
) -> bool {
    let rect = ui.available_rect_before_wrap();
    let rect = egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), height));
    let response = ui.allocate_rect(rect, egui::Sense::click());

    let fill = if enabled { base_fill } else { theme::BTN_DISABLED };
    let (fill, draw_rect) = if enabled {
        theme::button_visual(&response, fill, rect)
    } else {
        (fill, rect)
    };
    ui.painter().rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);

    let color = if enabled { text_color } else { theme::TEXT_DIM };
    ui.painter().text(
        draw_rect.center(),
        egui::Align2::CENTER_CENTER,
        label,
        egui::FontId::proportional(14.0),
        color,
    );

    if response.hovered() {
        ui.ctx().set_cursor_icon(if enabled {
            egui::CursorIcon::PointingHand
        } else {
            egui::CursorIcon::NotAllowed
        });
    }
    enabled && response.clicked()
}

/// Fixed-size painted button, same visuals as `wide_button`. Returns true if clicked.
pub fn fixed_button(
    ui: &mut egui::Ui,
    label: &str,
    base_fill: egui::Color32,
    text_color: egui::Color32,
    size: egui::Vec2,
    enabled: bool,
) -> bool {
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());

    let fill = if enabled { base_fill } else { theme::BTN_DISABLED };
    let (fill, draw_rect) = if enabled {
        theme::button_visual(&response, fill, rect)
    } else {
        (fill, rect)
    };
    ui.painter().rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);

    let color = if enabled { text_color } else { theme::TEXT_DIM };
    ui.painter().text(
        draw_rect.center(),
        egui::Align2::CENTER_CENTER,
        label,
        egui::FontId::proportional(13.0),
        color,
    );

    if response.hovered() {
        ui.ctx().set_cursor_icon(if enabled {
            egui::CursorIcon::PointingHand
        } else {
            egui::CursorIcon::NotAllowed
        });
    }
    enabled && response.clicked()
}

/// Format image dimensions and file name for the preview caption
pub fn format_image_caption(file_name: &str, width: u32, height: u32) -> String {
    format!("{} ({}x{})", file_name, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_includes_name_and_dimensions() {
        let caption = format_image_caption("chest.png", 1024, 768);
        assert!(caption.contains("chest.png"));
        assert!(caption.contains("1024x768"));
    }
}
