//! Session-scoped state owned by the transaction orchestrator.
//!
//! The snapshot store and the in-flight tracker live and die with the
//! wallet connection: they are created when the orchestrator is built and
//! emptied on disconnect. External readers receive shared handles and
//! copies; only the orchestrator mutates either structure.

use crate::task::domain::{MutationKey, Task, TaskId};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Holder of the last-fetched authoritative task collection.
///
/// The snapshot is replaced wholesale on every successful refresh; readers
/// hold an [`Arc`] to an immutable sequence, so a replacement can never be
/// observed partially.
#[derive(Debug, Default)]
pub struct TaskSnapshotStore {
    tasks: RwLock<Arc<Vec<Task>>>,
}

impl TaskSnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot with a freshly fetched collection.
    ///
    /// Deleted tasks are filtered out; the read path's order is preserved
    /// otherwise.
    pub(crate) fn replace(&self, tasks: Vec<Task>) {
        let visible: Vec<Task> = tasks.into_iter().filter(Task::is_visible).collect();
        *self.write_guard() = Arc::new(visible);
    }

    /// Empties the snapshot.
    pub(crate) fn clear(&self) {
        *self.write_guard() = Arc::new(Vec::new());
    }

    /// Returns a handle to the current snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<Vec<Task>> {
        Arc::clone(&self.read_guard())
    }

    /// Looks up a task by id in the current snapshot.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.read_guard().iter().find(|task| task.id() == id).cloned()
    }

    /// Returns the not-yet-completed tasks, in snapshot order.
    #[must_use]
    pub fn active(&self) -> Vec<Task> {
        self.read_guard()
            .iter()
            .filter(|task| !task.is_completed())
            .cloned()
            .collect()
    }

    /// Returns the completed tasks, in snapshot order.
    #[must_use]
    pub fn completed(&self) -> Vec<Task> {
        self.read_guard()
            .iter()
            .filter(|task| task.is_completed())
            .cloned()
            .collect()
    }

    fn read_guard(&self) -> std::sync::RwLockReadGuard<'_, Arc<Vec<Task>>> {
        self.tasks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> std::sync::RwLockWriteGuard<'_, Arc<Vec<Task>>> {
        self.tasks.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Per-`(task, action)` in-flight marker set.
///
/// Acquisition hands out a guard whose drop releases the key, so no exit
/// path can leak a marker. A poisoned lock recovers the inner set: a
/// panicking holder must not wedge every task's controls.
#[derive(Debug, Default)]
pub struct MutationTracker {
    in_flight: Mutex<HashSet<MutationKey>>,
}

impl MutationTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to mark a key as in flight.
    ///
    /// Returns `None` when the key is already held. The returned guard
    /// releases the key on drop.
    pub(crate) fn acquire(&self, key: MutationKey) -> Option<InFlightGuard<'_>> {
        let mut held = self.lock();
        if !held.insert(key) {
            return None;
        }
        Some(InFlightGuard { tracker: self, key })
    }

    /// Returns `true` when the key is currently in flight.
    #[must_use]
    pub fn is_in_flight(&self, key: MutationKey) -> bool {
        self.lock().contains(&key)
    }

    /// Returns the currently held keys, in no particular order.
    #[must_use]
    pub fn in_flight(&self) -> Vec<MutationKey> {
        self.lock().iter().copied().collect()
    }

    /// Releases every held key.
    pub(crate) fn clear(&self) {
        self.lock().clear();
    }

    fn release(&self, key: MutationKey) {
        self.lock().remove(&key);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<MutationKey>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Guard marking one mutation as in flight; releases its key on drop.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    tracker: &'a MutationTracker,
    key: MutationKey,
}

impl InFlightGuard<'_> {
    /// Returns the held key.
    #[must_use]
    pub const fn key(&self) -> MutationKey {
        self.key
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.tracker.release(self.key);
    }
}

/// The orchestrator's session-scoped state, torn down on disconnect.
#[derive(Debug, Default)]
pub struct SessionState {
    snapshot: TaskSnapshotStore,
    tracker: MutationTracker,
}

impl SessionState {
    /// Creates empty session state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the snapshot store.
    #[must_use]
    pub const fn snapshot(&self) -> &TaskSnapshotStore {
        &self.snapshot
    }

    /// Returns the in-flight tracker.
    #[must_use]
    pub const fn tracker(&self) -> &MutationTracker {
        &self.tracker
    }

    /// Empties both the snapshot and the marker set.
    pub(crate) fn teardown(&self) {
        self.tracker.clear();
        self.snapshot.clear();
    }
}
