mod dropzone;
mod env_version;
mod gallery;
mod interval_form;
mod overlay;
mod toolbar;

pub use dropzone::dropzone;
pub use env_version::env_version;
pub use gallery::{GalleryAction, gallery};
pub use interval_form::{IntervalFormAction, IntervalFormState, interval_form};
pub use overlay::{alert_dialog, busy_overlay};
pub use toolbar::{ToolbarAction, toolbar};
