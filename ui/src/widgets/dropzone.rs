use egui::{Align2, FontId, Response, Sense, StrokeKind, vec2};

/// The drop target. Highlights while files hover over the window and acts
/// as a click target for the file picker; the caller handles the click.
pub fn dropzone(ui: &mut egui::Ui, files_hovering: bool) -> Response {
    let desired = vec2(ui.available_width(), 110.0);
    let (rect, response) = ui.allocate_exact_size(desired, Sense::click());

    if ui.is_rect_visible(rect) {
        let visuals = ui.visuals();
        let style = if files_hovering || response.hovered() {
            &visuals.widgets.hovered
        } else {
            &visuals.widgets.inactive
        };
        ui.painter()
            .rect(rect, 8.0, style.bg_fill, style.bg_stroke, StrokeKind::Inside);

        let text_color = visuals.text_color();
        ui.painter().text(
            rect.center() - vec2(0.0, 10.0),
            Align2::CENTER_CENTER,
            "Drop images here",
            FontId::proportional(18.0),
            text_color,
        );
        ui.painter().text(
            rect.center() + vec2(0.0, 14.0),
            Align2::CENTER_CENTER,
            "or click to browse (Ctrl+O)",
            FontId::proportional(13.0),
            visuals.weak_text_color(),
        );
    }

    response.on_hover_cursor(egui::CursorIcon::PointingHand)
}
