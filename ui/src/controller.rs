//! The single UI controller.
//!
//! Owns the overlay state machine, the alert queue, and the in-flight
//! operation tag. Every mutating operation starts here and nowhere else, so
//! the "one operation at a time" rule is enforced in code: a conflicting
//! start is rejected outright, not merely hidden behind disabled input.
//! `reconcile` runs once per frame and is the only place settled operation
//! statuses are turned into overlay releases and user notices, which keeps
//! each settlement handled exactly once.

use flume::{Receiver, Sender};
use ustr::Ustr;
use wallshell_business::{
    DeleteAllCompute, DeleteAllImagesCommand, DeleteAllStatus, DeleteCompute, DeleteImageCommand,
    DeleteImageInput, DeleteStatus, FetchIntervalCommand, GalleryCompute, GalleryStatus,
    IntervalCompute, IntervalInput, IntervalStatus, ModifyIntervalCommand, OpenDirectoryCommand,
    PickedFile, RotateCompute, RotateStatus, RotateWallpaperCommand, SyncGalleryCommand,
    UploadCompute, UploadImagesCommand, UploadSelection, UploadStatus,
};
use wallshell_states::{AlertButton, AlertDialogState, OverlayState, StateCtx};

use crate::widgets::IntervalFormState;

/// The mutating operations the gate arbitrates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Sync,
    DeleteOne,
    DeleteAll,
    Interval,
    Rotate,
}

/// Deferred work produced by alert-dialog buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    ConfirmDeleteAll,
}

pub struct ShellController {
    overlay: OverlayState,
    alerts: AlertDialogState,
    in_flight: Option<Operation>,
    action_tx: Sender<UiAction>,
    action_rx: Receiver<UiAction>,
}

impl Default for ShellController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellController {
    pub fn new() -> Self {
        let (action_tx, action_rx) = flume::unbounded();
        Self {
            overlay: OverlayState::default(),
            alerts: AlertDialogState::default(),
            in_flight: None,
            action_tx,
            action_rx,
        }
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn alerts(&self) -> &AlertDialogState {
        &self.alerts
    }

    pub fn alerts_mut(&mut self) -> &mut AlertDialogState {
        &mut self.alerts
    }

    pub fn in_flight(&self) -> Option<Operation> {
        self.in_flight
    }

    /// Whether background input (drops, clicks, shortcuts) may be acted on.
    pub fn input_allowed(&self) -> bool {
        self.overlay.is_idle() && !self.alerts.is_open() && self.in_flight.is_none()
    }

    fn can_start(&self, op: Operation) -> bool {
        if let Some(current) = self.in_flight {
            log::debug!(
                target: "wallshell_ui::controller",
                "{op:?} rejected, {current:?} is still in flight"
            );
            return false;
        }
        true
    }

    /// Full gallery re-sync behind the busy overlay.
    pub fn begin_sync(&mut self, ctx: &mut StateCtx) -> bool {
        if !self.can_start(Operation::Sync) || !self.overlay.try_show() {
            return false;
        }
        self.in_flight = Some(Operation::Sync);
        // Mark loading synchronously so the release check below cannot
        // mistake the previous gallery for this sync's result.
        ctx.state_mut::<GalleryCompute>().status = GalleryStatus::Loading;
        ctx.enqueue_command::<SyncGalleryCommand>();
        true
    }

    /// Upload a dropped or picked selection behind the busy overlay.
    pub fn begin_upload(&mut self, ctx: &mut StateCtx, files: Vec<PickedFile>) -> bool {
        if !self.can_start(Operation::Upload) || !self.overlay.try_show() {
            return false;
        }
        self.in_flight = Some(Operation::Upload);
        ctx.state_mut::<UploadSelection>().files = files;
        ctx.enqueue_command::<UploadImagesCommand>();
        true
    }

    /// Delete one image. No busy overlay: the gallery stays visible and the
    /// tile disappears on confirmation, but the gate still holds.
    pub fn request_delete(&mut self, ctx: &mut StateCtx, name: Ustr) -> bool {
        if !self.can_start(Operation::DeleteOne) || !self.overlay.is_idle() {
            return false;
        }
        self.in_flight = Some(Operation::DeleteOne);
        ctx.state_mut::<DeleteImageInput>().name = name;
        ctx.enqueue_command::<DeleteImageCommand>();
        true
    }

    /// Ask before clearing the store; the actual delete runs through
    /// [`UiAction::ConfirmDeleteAll`].
    pub fn confirm_delete_all(&mut self) {
        let tx = self.action_tx.clone();
        self.alerts.open(
            "Delete All Images",
            "Every stored image will be removed and wallpaper rotation will have nothing to show. This cannot be undone.",
            vec![
                AlertButton::new("Cancel"),
                AlertButton::primary("Delete everything").on_activate(move || {
                    let _ = tx.send(UiAction::ConfirmDeleteAll);
                }),
            ],
        );
    }

    pub fn rotate_now(&mut self, ctx: &mut StateCtx) -> bool {
        if !self.can_start(Operation::Rotate) || !self.overlay.is_idle() {
            return false;
        }
        self.in_flight = Some(Operation::Rotate);
        ctx.enqueue_command::<RotateWallpaperCommand>();
        true
    }

    /// Fire-and-forget; deliberately outside the gate since it mutates
    /// nothing the gallery mirrors.
    pub fn open_directory(&mut self, ctx: &mut StateCtx) {
        ctx.enqueue_command::<OpenDirectoryCommand>();
    }

    pub fn open_timer_form(&mut self, ctx: &mut StateCtx, form: &mut IntervalFormState) -> bool {
        if !self.can_start(Operation::Interval) || !self.overlay.open_form() {
            return false;
        }
        form.reset();
        // Prefill with the daemon's current value; best-effort.
        ctx.enqueue_command::<FetchIntervalCommand>();
        true
    }

    pub fn close_timer_form(&mut self) {
        self.overlay.close_form();
    }

    /// Save the form value: write the interval, read it back, confirm.
    pub fn submit_interval(&mut self, ctx: &mut StateCtx, seconds: u64) -> bool {
        self.overlay.close_form();
        if !self.can_start(Operation::Interval) || !self.overlay.try_show() {
            return false;
        }
        self.in_flight = Some(Operation::Interval);
        ctx.state_mut::<IntervalInput>().seconds = seconds;
        ctx.enqueue_command::<ModifyIntervalCommand>();
        true
    }

    /// Run work deferred by alert buttons.
    pub fn process_actions(&mut self, ctx: &mut StateCtx) {
        for action in self.action_rx.clone().try_iter() {
            match action {
                UiAction::ConfirmDeleteAll => {
                    if self.can_start(Operation::DeleteAll) && self.overlay.try_show() {
                        self.in_flight = Some(Operation::DeleteAll);
                        ctx.enqueue_command::<DeleteAllImagesCommand>();
                    }
                }
            }
        }
    }

    /// Per-frame settlement pass, run right after `sync_computes`.
    ///
    /// Releases the overlay on success and failure alike (the show/hide
    /// pairing the whole UI depends on), surfaces notices, and resets
    /// settled statuses to `Idle` so none is handled twice.
    pub fn reconcile(&mut self, ctx: &mut StateCtx, form: &mut IntervalFormState) {
        self.reconcile_upload(ctx);
        self.reconcile_sync(ctx);
        self.reconcile_delete(ctx);
        self.reconcile_delete_all(ctx);
        self.reconcile_interval(ctx, form);
        self.reconcile_rotate(ctx);
    }

    fn finish(&mut self, op: Operation) {
        if self.in_flight == Some(op) {
            self.in_flight = None;
        }
        self.overlay.hide();
    }

    fn reconcile_upload(&mut self, ctx: &mut StateCtx) {
        let status = ctx.state::<UploadCompute>().status.clone();
        if !status.is_settled() {
            return;
        }
        self.finish(Operation::Upload);
        match &status {
            UploadStatus::NoFilesSelected => self.alerts.info(
                "No Files Selected",
                "Please select at least one image file to upload.",
            ),
            UploadStatus::Completed { uploaded } => self
                .alerts
                .info("Upload Complete", format!("Stored {uploaded} image(s).")),
            UploadStatus::Failed {
                batch,
                committed,
                error,
            } => self.alerts.info(
                "Error Uploading Files",
                format!(
                    "Batch {batch} failed: {error}. {committed} earlier batch(es) were already \
                     stored and remain on disk."
                ),
            ),
            UploadStatus::Idle | UploadStatus::Uploading { .. } => {}
        }
        ctx.state_mut::<UploadCompute>().status = UploadStatus::Idle;
    }

    fn reconcile_sync(&mut self, ctx: &mut StateCtx) {
        if self.in_flight != Some(Operation::Sync) {
            return;
        }
        // A sync settles into Ready, Overflow, or Error; errors render
        // inline in the gallery rather than as a dialog.
        let settled = !matches!(
            ctx.state::<GalleryCompute>().status,
            GalleryStatus::Idle | GalleryStatus::Loading
        );
        if settled {
            self.finish(Operation::Sync);
        }
    }

    fn reconcile_delete(&mut self, ctx: &mut StateCtx) {
        let status = ctx.state::<DeleteCompute>().status.clone();
        if !status.is_settled() {
            return;
        }
        self.finish(Operation::DeleteOne);
        match &status {
            DeleteStatus::Deleted(name) => self
                .alerts
                .info("Image Deleted", format!("Image {name} was deleted.")),
            DeleteStatus::NotFound(name) => self.alerts.info(
                "Image Not Found",
                format!("{name} is no longer stored; it may have been removed outside wallshell."),
            ),
            DeleteStatus::Error { name, error } => self
                .alerts
                .info("Error Deleting Image", format!("{name}: {error}")),
            DeleteStatus::Idle | DeleteStatus::Deleting => {}
        }
        ctx.state_mut::<DeleteCompute>().status = DeleteStatus::Idle;
    }

    fn reconcile_delete_all(&mut self, ctx: &mut StateCtx) {
        let status = ctx.state::<DeleteAllCompute>().status.clone();
        if !status.is_settled() {
            return;
        }
        self.finish(Operation::DeleteAll);
        if let DeleteAllStatus::Error(error) = &status {
            self.alerts
                .info("Error Deleting Images", error.clone());
        }
        ctx.state_mut::<DeleteAllCompute>().status = DeleteAllStatus::Idle;
    }

    fn reconcile_interval(&mut self, ctx: &mut StateCtx, form: &mut IntervalFormState) {
        let status = ctx.state::<IntervalCompute>().status.clone();
        match &status {
            IntervalStatus::Current(seconds) => {
                form.prefill(*seconds);
                ctx.state_mut::<IntervalCompute>().status = IntervalStatus::Idle;
            }
            IntervalStatus::Confirmed(seconds) => {
                self.finish(Operation::Interval);
                self.alerts.info(
                    "Wallpaper Interval Changed",
                    format!("The desktop wallpaper will now switch every {seconds} seconds."),
                );
                ctx.state_mut::<IntervalCompute>().status = IntervalStatus::Idle;
            }
            IntervalStatus::Error(error) => {
                self.finish(Operation::Interval);
                self.alerts.info("Error Changing Interval", error.clone());
                ctx.state_mut::<IntervalCompute>().status = IntervalStatus::Idle;
            }
            IntervalStatus::Idle | IntervalStatus::Loading | IntervalStatus::Saving => {}
        }
    }

    fn reconcile_rotate(&mut self, ctx: &mut StateCtx) {
        let status = ctx.state::<RotateCompute>().status.clone();
        if !status.is_settled() {
            return;
        }
        self.finish(Operation::Rotate);
        if let RotateStatus::Error(error) = &status {
            self.alerts.info("Error Changing Wallpaper", error.clone());
        }
        ctx.state_mut::<RotateCompute>().status = RotateStatus::Idle;
    }
}
