use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::{CommandSnapshot, Updater};

/// An asynchronous unit of work spawned by [`crate::StateCtx::flush_commands`].
///
/// A command reads its inputs from the snapshot, talks to the outside world,
/// and publishes every result through the updater. Nothing in wallshell
/// cancels a command once it has started; the token only fires when the
/// owning context is torn down.
pub trait Command: Send + 'static {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>>;
}
