//! The blocking busy overlay and the alert dialog.

use egui::{Id, Key, Modal, RichText};
use wallshell_states::AlertDialogState;

/// The busy overlay: a modal spinner that swallows background input.
///
/// Deliberately ignores Escape and backdrop clicks — it only disappears
/// when the in-flight operation settles and the controller hides it.
pub fn busy_overlay(ctx: &egui::Context) {
    let _ = Modal::new(Id::new("busy-overlay")).show(ctx, |ui| {
        ui.set_min_width(160.0);
        ui.vertical_centered(|ui| {
            ui.add_space(12.0);
            ui.spinner();
            ui.add_space(8.0);
            ui.label("Working…");
            ui.add_space(12.0);
        });
    });
}

/// The current alert dialog, if one is open.
///
/// Activating a button runs its callback and closes; Escape, Space, or a
/// backdrop click dismisses without running anything.
pub fn alert_dialog(ctx: &egui::Context, alerts: &mut AlertDialogState) {
    if !alerts.is_open() {
        return;
    }

    let modal = Modal::new(Id::new("alert-dialog")).show(ctx, |ui| {
        ui.set_max_width(380.0);

        if let Some(title) = alerts.title() {
            ui.heading(title);
        }
        ui.add_space(6.0);
        if let Some(message) = alerts.message() {
            ui.label(message);
        }
        ui.add_space(12.0);

        let mut clicked = None;
        ui.horizontal(|ui| {
            for (index, button) in alerts.buttons().iter().enumerate() {
                let text = if button.primary {
                    RichText::new(&button.label).strong()
                } else {
                    RichText::new(&button.label)
                };
                if ui.button(text).clicked() {
                    clicked = Some(index);
                }
            }
        });
        clicked
    });

    if let Some(index) = modal.inner {
        alerts.activate(index);
    } else if modal.should_close() || ctx.input(|i| i.key_pressed(Key::Space)) {
        alerts.dismiss();
    }
}
