//! Business layer of the wallshell front-end.
//!
//! Talks to the local wallpaper daemon over its loopback HTTP API and hosts
//! the pipelines behind every user-visible operation: batched uploads,
//! gallery synchronization, deletions, rotation-interval management, and
//! the fire-and-forget rotate/open-directory calls. All asynchronous work
//! is expressed as [`wallshell_states::Command`]s whose results land in
//! status-carrying compute states.

mod config;
mod daemon;
mod delete;
mod encode;
mod gallery;
pub mod http;
mod interval;
mod test_utils;
mod upload;
mod wallpaper;

pub use config::{DEFAULT_CHUNK_SIZE, DEFAULT_DAEMON_URL, DEFAULT_RENDER_CAP, ShellConfig};
pub use daemon::{DaemonError, DeleteOutcome, StoredImage, UploadRecord, parse_legacy_delete_text};
pub use delete::{
    DeleteAllCompute, DeleteAllImagesCommand, DeleteAllStatus, DeleteCompute, DeleteImageCommand,
    DeleteImageInput, DeleteStatus,
};
pub use encode::{EncodeError, FileSource, PickedFile, encode_file, normalize_file_name};
pub use gallery::{GalleryCompute, GalleryEntry, GalleryStatus, SyncGalleryCommand};
pub use interval::{
    FetchIntervalCommand, IntervalCompute, IntervalInput, IntervalStatus, ModifyIntervalCommand,
};
pub use upload::{UploadCompute, UploadImagesCommand, UploadSelection, UploadStatus};
pub use wallpaper::{OpenDirectoryCommand, RotateCompute, RotateStatus, RotateWallpaperCommand};
