use std::time::Duration;

use wallshell_business::GalleryCompute;
use wallshell_states::OverlayKind;

use crate::controller::ShellController;
use crate::state::AppState;
use crate::utils::drop_handler::{DropHandler, SystemDropHandler};
use crate::utils::file_picker::{FilePickerHandler, SystemFilePickerHandler};
use crate::widgets::{self, GalleryAction, IntervalFormAction, ToolbarAction};

pub struct ShellApp {
    state: AppState,
    controller: ShellController,
    drop_handler: Box<dyn DropHandler>,
    file_picker: Box<dyn FilePickerHandler>,
}

impl ShellApp {
    pub fn new(state: AppState) -> Self {
        Self::with_handlers(
            state,
            Box::new(SystemDropHandler),
            Box::new(SystemFilePickerHandler),
        )
    }

    /// Constructor with injectable drop/picker handlers for tests.
    pub fn with_handlers(
        mut state: AppState,
        drop_handler: Box<dyn DropHandler>,
        file_picker: Box<dyn FilePickerHandler>,
    ) -> Self {
        let mut controller = ShellController::new();

        // All state is daemon-derived: mirror it immediately on launch.
        controller.begin_sync(&mut state.ctx);
        controller.alerts_mut().info(
            "General Information",
            "For very large uploads, open the image folder and copy files in directly, then \
             restart the application.",
        );

        Self {
            state,
            controller,
            drop_handler,
            file_picker,
        }
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn controller(&self) -> &ShellController {
        &self.controller
    }

    fn handle_toolbar(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::RotateNow => {
                self.controller.rotate_now(&mut self.state.ctx);
            }
            ToolbarAction::OpenTimerForm => {
                self.controller
                    .open_timer_form(&mut self.state.ctx, &mut self.state.interval_form);
            }
            ToolbarAction::OpenDirectory => self.controller.open_directory(&mut self.state.ctx),
            ToolbarAction::DeleteAll => self.controller.confirm_delete_all(),
        }
    }
}

impl eframe::App for ShellApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply results produced by background commands, then settle them.
        self.state.ctx.sync_computes();
        self.controller.process_actions(&mut self.state.ctx);
        self.controller
            .reconcile(&mut self.state.ctx, &mut self.state.interval_form);

        let input_allowed = self.controller.input_allowed();

        // Global file inputs. Suppressed outright while an overlay, alert,
        // or operation is active: the gate, not just grayed-out widgets.
        if input_allowed {
            if let Some(files) = self.drop_handler.collect_dropped(ctx) {
                self.controller.begin_upload(&mut self.state.ctx, files);
            } else if let Some(files) = self.file_picker.handle_shortcut(ctx) {
                self.controller.begin_upload(&mut self.state.ctx, files);
            }
        }

        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| widgets::toolbar(ui))
            .inner;

        let (dropzone_clicked, gallery_action) = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let files_hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
                let dropzone_clicked = widgets::dropzone(ui, files_hovering).clicked();
                ui.add_space(12.0);

                let gallery_action = widgets::gallery(
                    ui,
                    self.state.ctx.state::<GalleryCompute>(),
                    &mut self.state.thumbnails,
                    input_allowed,
                );
                (dropzone_clicked, gallery_action)
            })
            .inner;

        if input_allowed {
            if let Some(action) = toolbar_action {
                self.handle_toolbar(action);
            }
            if dropzone_clicked
                && let Some(files) = self.file_picker.pick_files()
            {
                self.controller.begin_upload(&mut self.state.ctx, files);
            }
            match gallery_action {
                Some(GalleryAction::Delete(name)) => {
                    self.controller.request_delete(&mut self.state.ctx, name);
                }
                Some(GalleryAction::OpenDirectory) => {
                    self.controller.open_directory(&mut self.state.ctx);
                }
                None => {}
            }
        }

        // Overlays paint last so they sit on top of everything.
        match self.controller.overlay().active() {
            Some(OverlayKind::Busy) => widgets::busy_overlay(ctx),
            Some(OverlayKind::Form) => {
                if let Some(action) = widgets::interval_form(ctx, &mut self.state.interval_form) {
                    match action {
                        IntervalFormAction::Save(seconds) => {
                            self.controller.submit_interval(&mut self.state.ctx, seconds);
                        }
                        IntervalFormAction::Close => self.controller.close_timer_form(),
                    }
                }
            }
            None => {}
        }
        widgets::alert_dialog(ctx, self.controller.alerts_mut());

        // Spawn whatever this frame queued.
        self.state.ctx.flush_commands();

        // Keep frames coming while background work can still change state.
        if self.state.ctx.task_count() > 0 {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

#[cfg(test)]
mod tests {
    use wallshell_business::PickedFile;

    use super::*;

    /// Drop handler that reports a fixed selection exactly once.
    struct OneShotDrop {
        files: std::cell::RefCell<Option<Vec<PickedFile>>>,
    }

    impl DropHandler for OneShotDrop {
        fn collect_dropped(&self, _ctx: &egui::Context) -> Option<Vec<PickedFile>> {
            self.files.borrow_mut().take()
        }
    }

    /// Picker that always cancels.
    struct NeverPick;

    impl FilePickerHandler for NeverPick {
        fn pick_files(&self) -> Option<Vec<PickedFile>> {
            None
        }
    }

    fn app_with_drop(files: Option<Vec<PickedFile>>) -> ShellApp {
        ShellApp::with_handlers(
            AppState::test("http://127.0.0.1:1".to_owned()),
            Box::new(OneShotDrop {
                files: std::cell::RefCell::new(files),
            }),
            Box::new(NeverPick),
        )
    }

    #[test]
    fn startup_syncs_and_shows_the_general_notice() {
        let app = app_with_drop(None);
        assert_eq!(app.controller().alerts().title(), Some("General Information"));
        assert!(!app.controller().overlay().is_idle(), "initial sync is busy");
    }

    #[test]
    fn app_renders_a_frame_headlessly() {
        let mut harness = egui_kittest::Harness::new_eframe(|_cc| app_with_drop(None));
        // A few frames: startup sync spawns, panels and overlays draw.
        for _ in 0..5 {
            harness.step();
        }
    }

    #[test]
    fn dropped_files_are_ignored_while_blocked() {
        // Startup leaves the app busy (initial sync) with an alert queued,
        // so a drop in the very first frame must not start an upload.
        let mut harness = egui_kittest::Harness::new_eframe(|_cc| {
            app_with_drop(Some(vec![PickedFile::from_bytes("late.png", vec![1])]))
        });
        harness.step();
        let app = harness.state_mut();
        assert_eq!(
            app.controller().in_flight(),
            Some(crate::controller::Operation::Sync),
            "the drop must not have displaced the initial sync"
        );
    }
}
