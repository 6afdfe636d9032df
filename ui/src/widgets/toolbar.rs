use egui::{Align, Layout, RichText};

use super::env_version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    RotateNow,
    OpenTimerForm,
    OpenDirectory,
    DeleteAll,
}

/// The top toolbar: rotation controls on the left, the destructive action
/// and version footer on the right.
pub fn toolbar(ui: &mut egui::Ui) -> Option<ToolbarAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        if ui.button("Change wallpaper now").clicked() {
            action = Some(ToolbarAction::RotateNow);
        }
        if ui.button("Rotation timer…").clicked() {
            action = Some(ToolbarAction::OpenTimerForm);
        }
        if ui.button("Open image folder").clicked() {
            action = Some(ToolbarAction::OpenDirectory);
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let label = RichText::new("Delete all images").color(ui.visuals().error_fg_color);
            if ui.button(label).clicked() {
                action = Some(ToolbarAction::DeleteAll);
            }
            env_version(ui);
        });
    });

    action
}
