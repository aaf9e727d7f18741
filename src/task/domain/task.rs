//! Task record type and chain timestamp handling.

use super::{TaskDomainError, TaskId, TaskName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unix-seconds timestamp as stored by the contract.
///
/// The contract uses `0` as the sentinel for "not yet occurred"; this type
/// preserves that representation and converts to [`DateTime`] only at the
/// presentation boundary.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChainTimestamp(u64);

impl ChainTimestamp {
    /// The "not yet occurred" sentinel.
    pub const UNSET: Self = Self(0);

    /// Creates a timestamp from Unix seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Creates a timestamp from a wall-clock instant.
    ///
    /// Instants before the Unix epoch clamp to the unset sentinel.
    #[must_use]
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(u64::try_from(at.timestamp()).unwrap_or_default())
    }

    /// Returns `true` when the timestamp marks an occurred event.
    #[must_use]
    pub const fn is_set(self) -> bool {
        self.0 != 0
    }

    /// Returns the raw Unix seconds value.
    #[must_use]
    pub const fn secs(self) -> u64 {
        self.0
    }

    /// Converts to a wall-clock instant.
    ///
    /// Returns `None` for the unset sentinel or for values outside the
    /// representable range.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        if !self.is_set() {
            return None;
        }
        i64::try_from(self.0)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

impl fmt::Display for ChainTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameter object for building a task from a contract record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// Contract-assigned task identifier.
    pub id: TaskId,
    /// Task name.
    pub name: TaskName,
    /// Creation timestamp.
    pub created_at: ChainTimestamp,
    /// Latest mutation timestamp.
    pub updated_at: ChainTimestamp,
    /// Completion timestamp, unset while the task is active.
    pub completed_at: ChainTimestamp,
    /// Deletion timestamp, unset while the task is live.
    pub deleted_at: ChainTimestamp,
}

/// A task as read from the contract for the connected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: TaskName,
    created_at: ChainTimestamp,
    updated_at: ChainTimestamp,
    completed_at: ChainTimestamp,
    deleted_at: ChainTimestamp,
}

impl Task {
    /// Builds a task from a contract record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TimestampOrder`] when the record's update
    /// timestamp precedes its creation timestamp while both are set.
    pub fn from_record(record: TaskRecord) -> Result<Self, TaskDomainError> {
        if record.updated_at.is_set()
            && record.created_at.is_set()
            && record.updated_at < record.created_at
        {
            return Err(TaskDomainError::TimestampOrder {
                id: record.id,
                created_at: record.created_at,
                updated_at: record.updated_at,
            });
        }

        Ok(Self {
            id: record.id,
            name: record.name,
            created_at: record.created_at,
            updated_at: record.updated_at,
            completed_at: record.completed_at,
            deleted_at: record.deleted_at,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> ChainTimestamp {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> ChainTimestamp {
        self.updated_at
    }

    /// Returns the completion timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> ChainTimestamp {
        self.completed_at
    }

    /// Returns the deletion timestamp.
    #[must_use]
    pub const fn deleted_at(&self) -> ChainTimestamp {
        self.deleted_at
    }

    /// Returns `true` when the task has been completed.
    ///
    /// Completion is terminal: a completed task can never be completed
    /// again.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_set()
    }

    /// Returns `true` when the task has been deleted on chain.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_set()
    }

    /// Returns `true` when the task belongs in the visible snapshot.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        !self.is_deleted()
    }
}
