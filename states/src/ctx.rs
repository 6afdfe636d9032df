use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

use flume::{Receiver, Sender};
use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{Command, CommandSnapshot, State, TaskHandle, TaskId};

type UpdatePayload = (TypeId, Box<dyn Any + Send>);

/// Sender half of the state update channel, handed to commands.
///
/// Updates are applied latest-wins per state type the next time the UI
/// thread calls [`StateCtx::sync_computes`].
#[derive(Clone)]
pub struct Updater {
    send: Sender<UpdatePayload>,
}

impl Updater {
    pub fn set<T: State>(&self, value: T) {
        if self.send.send((TypeId::of::<T>(), Box::new(value))).is_err() {
            log::warn!(
                "state context dropped before a {} update was applied",
                type_name::<T>()
            );
        }
    }
}

/// Where command futures run: a runtime owned by the context (the UI
/// process case) or the ambient one (tests running under `#[tokio::test]`).
enum Executor {
    Owned(Runtime),
    Ambient(Handle),
}

impl Executor {
    fn acquire() -> Self {
        match Handle::try_current() {
            Ok(handle) => Self::Ambient(handle),
            Err(_) => Self::Owned(
                tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                    .expect("failed to start the background runtime"),
            ),
        }
    }

    fn handle(&self) -> &Handle {
        match self {
            Self::Owned(runtime) => runtime.handle(),
            Self::Ambient(handle) => handle,
        }
    }
}

/// Owner of all application state plus the machinery that runs commands.
///
/// Lives on the UI thread. The per-frame protocol is:
/// `sync_computes()` (apply pending updates) → read state, enqueue
/// commands → `flush_commands()` (spawn queued commands).
pub struct StateCtx {
    storage: BTreeMap<TypeId, Box<dyn State>>,
    update_send: Sender<UpdatePayload>,
    update_recv: Receiver<UpdatePayload>,
    queued: Vec<(TypeId, Box<dyn Command>)>,
    tasks: Vec<(TaskHandle, JoinHandle<()>)>,
    executor: Executor,
    shutdown: CancellationToken,
    generation: u64,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (update_send, update_recv) = flume::unbounded();
        Self {
            storage: BTreeMap::new(),
            update_send,
            update_recv,
            queued: Vec::new(),
            tasks: Vec::new(),
            executor: Executor::acquire(),
            shutdown: CancellationToken::new(),
            generation: 0,
        }
    }

    pub fn add_state<T: State>(&mut self, value: T) {
        if self
            .storage
            .insert(TypeId::of::<T>(), Box::new(value))
            .is_some()
        {
            log::warn!("state {} registered twice, replacing", type_name::<T>());
        }
    }

    /// Borrow a registered state.
    ///
    /// # Panics
    /// Panics when the type was never registered; registration happens once
    /// at startup, so a miss is a wiring bug.
    pub fn state<T: State>(&self) -> &T {
        self.storage
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.as_any().downcast_ref::<T>())
            .unwrap_or_else(|| panic!("state {} is not registered", type_name::<T>()))
    }

    pub fn state_mut<T: State>(&mut self) -> &mut T {
        self.storage
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.as_any_mut().downcast_mut::<T>())
            .unwrap_or_else(|| panic!("state {} is not registered", type_name::<T>()))
    }

    pub fn updater(&self) -> Updater {
        Updater {
            send: self.update_send.clone(),
        }
    }

    /// Queue a command; it starts on the next [`Self::flush_commands`].
    pub fn enqueue_command<C: Command + Default>(&mut self) {
        self.queued.push((TypeId::of::<C>(), Box::new(C::default())));
    }

    /// Commands queued but not yet spawned.
    pub fn pending_commands(&self) -> usize {
        self.queued.len()
    }

    /// Spawn every queued command on the background runtime. Each command
    /// gets a snapshot of the current state storage, an updater, and a
    /// child of the shutdown token.
    pub fn flush_commands(&mut self) {
        for (type_id, command) in std::mem::take(&mut self.queued) {
            let mut snap = CommandSnapshot::new();
            for (id, state) in &self.storage {
                if let Some(boxed) = state.snapshot() {
                    snap.insert(*id, boxed);
                }
            }

            self.generation += 1;
            let handle = TaskHandle::new(
                TaskId::new(type_id, self.generation),
                self.shutdown.child_token(),
            );
            let future = command.run(snap, self.updater(), handle.cancellation_token());
            let join = self.executor.handle().spawn(future);
            self.tasks.push((handle, join));
        }
    }

    /// Apply pending updates, latest-wins per state type, and drop
    /// bookkeeping for finished tasks.
    pub fn sync_computes(&mut self) {
        self.tasks.retain(|(handle, join)| {
            let finished = join.is_finished();
            if finished {
                log::trace!(
                    target: "wallshell_states::ctx",
                    "command task gen={} finished",
                    handle.id().generation()
                );
            }
            !finished
        });

        let mut latest: BTreeMap<TypeId, Box<dyn Any + Send>> = BTreeMap::new();
        for (type_id, payload) in self.update_recv.try_iter() {
            latest.insert(type_id, payload);
        }
        for (type_id, payload) in latest {
            match self.storage.get_mut(&type_id) {
                Some(state) => state.assign_box(payload),
                None => log::warn!("update for an unregistered state {type_id:?}, dropping it"),
            }
        }
    }

    /// Command tasks still running.
    pub fn task_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|(_, join)| !join.is_finished())
            .count()
    }
}

impl Drop for StateCtx {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
