//! State runtime for the wallshell front-end.
//!
//! The UI thread owns a [`StateCtx`] holding every piece of application
//! state. Asynchronous work is expressed as [`Command`]s: a command receives
//! a cloned [`CommandSnapshot`] of the states it needs, runs on the
//! background runtime, and publishes results through an [`Updater`]. The UI
//! applies pending updates between frames with [`StateCtx::sync_computes`],
//! so state never mutates mid-render.
//!
//! The crate also hosts the two pure UI state machines that gate user input:
//! [`OverlayState`] (blocking busy/form overlays, the cooperative mutex for
//! mutating operations) and [`AlertDialogState`] (dismissable alert dialog
//! with caller-supplied buttons).

mod alert;
mod command;
mod ctx;
mod overlay;
mod snapshot;
mod state;
mod task;

pub use alert::{AlertButton, AlertDialogState};
pub use command::Command;
pub use ctx::{StateCtx, Updater};
pub use overlay::{OverlayKind, OverlayState, ScreenLocks};
pub use snapshot::CommandSnapshot;
pub use state::{State, state_assign_impl};
pub use task::{TaskHandle, TaskId};
