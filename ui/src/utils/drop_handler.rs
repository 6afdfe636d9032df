//! Drop handler abstractions for drag-and-drop file support.
//!
//! Trait-based so tests can inject selections without synthesizing window
//! events. The system implementation reads egui's per-frame dropped-file
//! list and turns it into an ordered [`PickedFile`] selection; the files
//! are not read from disk here — encoding happens inside the upload
//! pipeline.

use wallshell_business::PickedFile;

/// Source of dropped-file selections, mockable for tests.
pub trait DropHandler {
    /// The files dropped this frame, in drop order. `None` when nothing
    /// was dropped.
    fn collect_dropped(&self, ctx: &egui::Context) -> Option<Vec<PickedFile>>;
}

/// Default drop handler using egui's input events.
#[derive(Default)]
pub struct SystemDropHandler;

impl DropHandler for SystemDropHandler {
    fn collect_dropped(&self, ctx: &egui::Context) -> Option<Vec<PickedFile>> {
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped_files.is_empty() {
            return None;
        }

        log::trace!(
            target: "wallshell_ui::drop",
            "dropped_files={}",
            dropped_files.len()
        );

        let mut selection = Vec::with_capacity(dropped_files.len());
        for file in dropped_files {
            if let Some(path) = file.path {
                if let Some(picked) = PickedFile::from_path(path) {
                    selection.push(picked);
                    continue;
                }
            } else if let Some(bytes) = file.bytes {
                selection.push(PickedFile::from_bytes(file.name.clone(), bytes.to_vec()));
                continue;
            }
            // The common failure mode when the backend reports a drop but
            // provides neither a filesystem path nor file contents.
            log::warn!(
                target: "wallshell_ui::drop",
                "dropped_file_missing_path_and_bytes name={}",
                file.name
            );
        }

        // An empty selection still flows through the upload pipeline so the
        // "no files selected" notice comes from exactly one place.
        Some(selection)
    }
}
