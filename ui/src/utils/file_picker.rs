//! File picker handler for selecting image files via native dialogs.
//!
//! Trait-based so tests can inject selections without opening system
//! dialogs. The picker is reachable two ways: clicking the dropzone and
//! the Ctrl+O / Cmd+O shortcut.

use wallshell_business::PickedFile;

/// Source of picked-file selections, mockable for tests.
pub trait FilePickerHandler {
    /// Open the native multi-file dialog. `None` when the user cancels.
    fn pick_files(&self) -> Option<Vec<PickedFile>>;

    /// Open the dialog when the open shortcut (Ctrl+O / Cmd+O) was pressed
    /// this frame.
    fn handle_shortcut(&self, ctx: &egui::Context) -> Option<Vec<PickedFile>> {
        let pressed = ctx.input(|i| i.key_pressed(egui::Key::O) && i.modifiers.command_only());
        if !pressed {
            return None;
        }
        log::debug!(target: "wallshell_ui::picker", "open shortcut detected");
        self.pick_files()
    }
}

/// Default picker using the system file dialog.
#[derive(Default)]
pub struct SystemFilePickerHandler;

impl FilePickerHandler for SystemFilePickerHandler {
    fn pick_files(&self) -> Option<Vec<PickedFile>> {
        let paths = rfd::FileDialog::new()
            .add_filter(
                "Image",
                &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff", "tif"],
            )
            .set_title("Select wallpaper images")
            .pick_files()?;

        log::info!(
            target: "wallshell_ui::picker",
            "user selected {} file(s)",
            paths.len()
        );

        Some(
            paths
                .into_iter()
                .filter_map(PickedFile::from_path)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock picker that simulates a cancelled dialog.
    struct MockPickerCancelled;

    impl FilePickerHandler for MockPickerCancelled {
        fn pick_files(&self) -> Option<Vec<PickedFile>> {
            None
        }
    }

    /// Mock picker that returns a predefined selection.
    struct MockPickerWithFiles;

    impl FilePickerHandler for MockPickerWithFiles {
        fn pick_files(&self) -> Option<Vec<PickedFile>> {
            Some(vec![PickedFile::from_bytes("picked.png", vec![0])])
        }
    }

    #[test]
    fn cancelled_dialog_yields_nothing() {
        assert!(MockPickerCancelled.pick_files().is_none());
    }

    #[test]
    fn selection_comes_back_in_order() {
        let selection = MockPickerWithFiles.pick_files().unwrap();
        assert_eq!(selection.len(), 1);
        assert_eq!(selection[0].name, "picked.png");
    }

    #[test]
    fn shortcut_does_not_fire_on_a_fresh_context() {
        let ctx = egui::Context::default();
        // No key input at all: the default implementation must not open
        // the (mock) dialog.
        assert!(MockPickerWithFiles.handle_shortcut(&ctx).is_none());
    }

    #[test]
    fn picker_handler_is_object_safe() {
        fn _accepts(_handler: &dyn FilePickerHandler) {}
        _accepts(&MockPickerCancelled);
    }
}
