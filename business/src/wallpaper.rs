//! Immediate rotation and the open-directory call.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;
use wallshell_states::{Command, CommandSnapshot, State, Updater, state_assign_impl};

use crate::{ShellConfig, daemon};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RotateStatus {
    #[default]
    Idle,
    Rotating,
    Rotated,
    Error(String),
}

impl RotateStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Rotated | Self::Error(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RotateCompute {
    pub status: RotateStatus,
}

impl State for RotateCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// Ask the daemon to apply a random wallpaper right now.
#[derive(Debug, Default)]
pub struct RotateWallpaperCommand;

impl Command for RotateWallpaperCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let config: ShellConfig = snap.state();
        Box::pin(async move {
            updater.set(RotateCompute {
                status: RotateStatus::Rotating,
            });
            match daemon::rotate_wallpaper(&config).await {
                Ok(()) => updater.set(RotateCompute {
                    status: RotateStatus::Rotated,
                }),
                Err(err) => updater.set(RotateCompute {
                    status: RotateStatus::Error(err.to_string()),
                }),
            }
        })
    }
}

/// Open the image directory in the system file manager. Fire-and-forget:
/// failures are logged, never surfaced as a dialog.
#[derive(Debug, Default)]
pub struct OpenDirectoryCommand;

impl Command for OpenDirectoryCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        _updater: Updater,
        _cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let config: ShellConfig = snap.state();
        Box::pin(async move {
            if let Err(err) = daemon::open_images_directory(&config).await {
                log::warn!(
                    target: "wallshell_business::wallpaper",
                    "open-directory failed: {err}"
                );
            }
        })
    }
}
