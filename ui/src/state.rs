use wallshell_business::{
    DeleteAllCompute, DeleteCompute, DeleteImageInput, GalleryCompute, IntervalCompute,
    IntervalInput, RotateCompute, ShellConfig, UploadCompute, UploadSelection,
};
use wallshell_states::StateCtx;

use crate::utils::thumbnails::ThumbnailCache;
use crate::widgets::IntervalFormState;

/// Everything the application owns besides the controller: the state
/// context with every business state registered, plus per-widget UI state.
pub struct AppState {
    pub ctx: StateCtx,
    pub interval_form: IntervalFormState,
    pub thumbnails: ThumbnailCache,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(ShellConfig::from_env())
    }
}

impl AppState {
    pub fn with_config(config: ShellConfig) -> Self {
        let mut ctx = StateCtx::new();

        ctx.add_state(config);
        ctx.add_state(UploadSelection::default());
        ctx.add_state(UploadCompute::default());
        ctx.add_state(GalleryCompute::default());
        ctx.add_state(DeleteImageInput::default());
        ctx.add_state(DeleteCompute::default());
        ctx.add_state(DeleteAllCompute::default());
        ctx.add_state(IntervalInput::default());
        ctx.add_state(IntervalCompute::default());
        ctx.add_state(RotateCompute::default());

        Self {
            ctx,
            interval_form: IntervalFormState::default(),
            thumbnails: ThumbnailCache::default(),
        }
    }

    /// State wired at a test daemon address. Nothing touches the network
    /// until commands are flushed.
    pub fn test(base_url: String) -> Self {
        Self::with_config(ShellConfig::new(base_url))
    }
}
