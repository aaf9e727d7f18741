//! Domain model for on-chain task management.
//!
//! The task domain models the contract's task records, the validated
//! scalars that cross the chain boundary, and the mutation vocabulary
//! (actions, in-flight keys, lifecycle phases, and the event payloads the
//! presentation layer consumes) while keeping all infrastructure concerns
//! outside of the domain boundary.

mod error;
mod ids;
mod mutation;
mod task;

pub use error::TaskDomainError;
pub use ids::{Address, NetworkId, TaskId, TaskName};
pub use mutation::{
    ActionKind, MutationEvent, MutationKey, MutationPhase, MutationTarget, TaskAction,
};
pub use task::{ChainTimestamp, Task, TaskRecord};
