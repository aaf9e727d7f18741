//! Mutation vocabulary: actions, in-flight keys, phases, and events.

use super::{TaskId, TaskName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A state-changing intent against the task contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Create a new task with the given name.
    Create {
        /// Name of the task to create.
        name: TaskName,
    },
    /// Mark an existing task as completed.
    Complete {
        /// Identifier of the task to complete.
        id: TaskId,
    },
    /// Delete an existing task.
    Delete {
        /// Identifier of the task to delete.
        id: TaskId,
    },
    /// Rename an existing task.
    Update {
        /// Identifier of the task to rename.
        id: TaskId,
        /// Replacement name.
        name: TaskName,
    },
}

impl TaskAction {
    /// Returns the action class.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Create { .. } => ActionKind::Create,
            Self::Complete { .. } => ActionKind::Complete,
            Self::Delete { .. } => ActionKind::Delete,
            Self::Update { .. } => ActionKind::Update,
        }
    }

    /// Returns the slot this action competes for.
    #[must_use]
    pub const fn target(&self) -> MutationTarget {
        match self {
            Self::Create { .. } => MutationTarget::NewTask,
            Self::Complete { id } | Self::Delete { id } | Self::Update { id, .. } => {
                MutationTarget::Existing(*id)
            }
        }
    }

    /// Returns the in-flight key for this action.
    #[must_use]
    pub const fn key(&self) -> MutationKey {
        MutationKey {
            target: self.target(),
            kind: self.kind(),
        }
    }
}

/// Action class of a mutation, independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Task creation.
    Create,
    /// Task completion.
    Complete,
    /// Task deletion.
    Delete,
    /// Task rename.
    Update,
}

impl ActionKind {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Complete => "complete",
            Self::Delete => "delete",
            Self::Update => "update",
        }
    }

    /// Returns the deployed contract's entry point for this action class.
    #[must_use]
    pub const fn contract_method(self) -> &'static str {
        match self {
            Self::Create => "createTask",
            Self::Complete => "markTaskAsCompleted",
            Self::Delete => "deleteTask",
            Self::Update => "updateTask",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The logical slot a mutation locks while in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationTarget {
    /// The synthetic slot for creations, which have no contract id yet.
    NewTask,
    /// An existing task, addressed by its contract id.
    Existing(TaskId),
}

impl MutationTarget {
    /// Returns the task id for existing-task targets.
    #[must_use]
    pub const fn task_id(self) -> Option<TaskId> {
        match self {
            Self::NewTask => None,
            Self::Existing(id) => Some(id),
        }
    }
}

/// Key identifying one in-flight mutation: a target slot plus an action
/// class.
///
/// Keys for distinct tasks are independent; the same task may carry
/// different action classes concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MutationKey {
    /// Slot the mutation locks.
    pub target: MutationTarget,
    /// Action class of the mutation.
    pub kind: ActionKind,
}

impl fmt::Display for MutationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            MutationTarget::NewTask => write!(f, "{} (new task)", self.kind),
            MutationTarget::Existing(id) => write!(f, "{} task {id}", self.kind),
        }
    }
}

/// Lifecycle phase of a submitted mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationPhase {
    /// Submitted, awaiting confirmation.
    Pending,
    /// Confirmed; the snapshot has been refreshed.
    Settled,
    /// Rejected, reverted, or timed out.
    Failed,
}

/// Event published to the presentation layer on each phase transition.
///
/// Drives per-row loading indicators and outcome notifications; the payload
/// serializes to the documented JSON shape for transport out of process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationEvent {
    /// Target task id; `None` for creations.
    pub task_id: Option<TaskId>,
    /// Action class the event describes.
    pub action: ActionKind,
    /// Phase reached.
    pub phase: MutationPhase,
    /// Failure reason text, present only on [`MutationPhase::Failed`].
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
}

impl MutationEvent {
    /// Builds the pending-phase event for a key.
    #[must_use]
    pub const fn pending(key: MutationKey) -> Self {
        Self {
            task_id: key.target.task_id(),
            action: key.kind,
            phase: MutationPhase::Pending,
            reason: None,
        }
    }

    /// Builds the settled-phase event for a key.
    #[must_use]
    pub const fn settled(key: MutationKey) -> Self {
        Self {
            task_id: key.target.task_id(),
            action: key.kind,
            phase: MutationPhase::Settled,
            reason: None,
        }
    }

    /// Builds the failed-phase event for a key.
    #[must_use]
    pub fn failed(key: MutationKey, reason: impl Into<String>) -> Self {
        Self {
            task_id: key.target.task_id(),
            action: key.kind,
            phase: MutationPhase::Failed,
            reason: Some(reason.into()),
        }
    }
}
