use std::any::TypeId;

use tokio_util::sync::CancellationToken;

/// Identifier for a spawned command task: the command's type plus a
/// generation counter distinguishing repeated runs of the same command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self {
            type_id,
            generation,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Higher generations were spawned later.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Bookkeeping handle for a spawned command task.
///
/// The token is a child of the context's shutdown token. In-flight
/// operations are deliberately not user-cancellable; `cancel` exists for
/// context teardown and for tests.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_distinguishes_generations() {
        let type_id = TypeId::of::<String>();
        let first = TaskId::new(type_id, 1);
        let second = TaskId::new(type_id, 2);
        let other = TaskId::new(TypeId::of::<u32>(), 1);

        assert_eq!(first, TaskId::new(type_id, 1));
        assert_ne!(first, second);
        assert_ne!(first, other);
        assert_eq!(first.type_id(), second.type_id());
    }

    #[test]
    fn handle_shares_cancellation() {
        let handle = TaskHandle::new(TaskId::new(TypeId::of::<String>(), 1), CancellationToken::new());
        let clone = handle.clone();

        assert!(!clone.is_cancelled());
        handle.cancel();
        assert!(clone.is_cancelled());
        assert!(handle.cancellation_token().is_cancelled());
    }
}
