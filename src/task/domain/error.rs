//! Error types for task domain validation.

use super::{ChainTimestamp, TaskId};
use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is not a positive integer.
    #[error("invalid task id {0}, expected a positive integer")]
    InvalidTaskId(u64),

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The address is not a `0x`-prefixed 40-digit hex string.
    #[error("invalid address '{0}', expected 0x followed by 40 hex digits")]
    InvalidAddress(String),

    /// The network id is not a positive integer.
    #[error("invalid network id {0}, expected a positive integer")]
    InvalidNetworkId(u64),

    /// A task record carries an update timestamp earlier than its creation
    /// timestamp.
    #[error("task {id} updated at {updated_at} before its creation at {created_at}")]
    TimestampOrder {
        /// Identifier of the offending record.
        id: TaskId,
        /// Creation timestamp of the record.
        created_at: ChainTimestamp,
        /// Update timestamp of the record.
        updated_at: ChainTimestamp,
    },
}
