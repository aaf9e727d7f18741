//! Application services for on-chain mutation orchestration.

mod orchestrator;
mod session;
mod supervisor;

pub use orchestrator::{
    MutationError, MutationOutcome, MutationSuccess, TransactionOrchestrator,
};
pub use session::{InFlightGuard, MutationTracker, SessionState, TaskSnapshotStore};
pub use supervisor::{ConnectionStatus, ConnectionSupervisor};
