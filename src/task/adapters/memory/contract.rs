//! In-memory task contract simulating the deployed contract.
//!
//! Mirrors the on-chain behaviour closely enough for orchestrated lifecycle
//! tests: contract-assigned ids, clock-stamped timestamps, revert rules for
//! missing, deleted, and already-completed targets, and receipt events.
//! Failure-injection knobs script the next submission or confirmation, and
//! a confirmation gate lets tests hold transactions in the pending phase.

use async_trait::async_trait;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

use crate::task::domain::{Address, ChainTimestamp, Task, TaskAction, TaskId, TaskName, TaskRecord};
use crate::task::ports::{
    ContractEvent, TASK_CREATED_EVENT, TaskContract, TaskContractError, TaskContractResult,
    TxHandle, TxReceipt,
};

const TASK_COMPLETED_EVENT: &str = "TaskCompleted";
const TASK_DELETED_EVENT: &str = "TaskDeleted";
const TASK_UPDATED_EVENT: &str = "TaskUpdated";

const MISSING_TASK_REASON: &str = "task does not exist";
const COMPLETED_TASK_REASON: &str = "task already completed";

/// Scripted outcome attached to a pending submission at submit time.
#[derive(Debug, Clone)]
enum PendingOutcome {
    Confirm,
    Revert(Option<String>),
}

#[derive(Debug, Clone)]
struct PendingSubmission {
    signer: Address,
    action: TaskAction,
    outcome: PendingOutcome,
}

#[derive(Debug, Default)]
struct LedgerState {
    tasks: HashMap<Address, Vec<TaskRecord>>,
    next_id: u64,
    next_handle: u64,
    pending: HashMap<TxHandle, PendingSubmission>,
    submissions: u64,
    reject_next: Option<String>,
    revert_next: Option<String>,
}

/// Gate that can hold confirmations open until released.
#[derive(Debug, Default)]
struct ConfirmationGate {
    held: AtomicBool,
    released: Notify,
}

impl ConfirmationGate {
    fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    fn release(&self) {
        self.held.store(false, Ordering::SeqCst);
        self.released.notify_waiters();
    }

    async fn wait(&self) {
        while self.held.load(Ordering::SeqCst) {
            let mut released = std::pin::pin!(self.released.notified());
            // Register interest before the re-check so a release landing
            // between the check and the await cannot be missed.
            released.as_mut().enable();
            if !self.held.load(Ordering::SeqCst) {
                break;
            }
            released.await;
        }
    }
}

/// In-memory [`TaskContract`] implementation.
pub struct InMemoryTaskContract<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
    state: Arc<Mutex<LedgerState>>,
    gate: Arc<ConfirmationGate>,
}

impl<C> InMemoryTaskContract<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty contract stamping timestamps from the given clock.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            clock,
            state: Arc::new(Mutex::new(LedgerState::default())),
            gate: Arc::new(ConfirmationGate::default()),
        }
    }

    /// Inserts a task directly into contract storage, bypassing the
    /// transaction path. Test setup only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskContractError::Transport`] when the generated id is
    /// rejected by domain validation, which cannot happen for a healthy
    /// counter.
    pub fn seed_task(&self, account: &Address, name: TaskName) -> TaskContractResult<TaskId> {
        let mut state = self.lock_state();
        let now = self.now();
        let id = next_task_id(&mut state)?;
        state.tasks.entry(account.clone()).or_default().push(TaskRecord {
            id,
            name,
            created_at: now,
            updated_at: now,
            completed_at: ChainTimestamp::UNSET,
            deleted_at: ChainTimestamp::UNSET,
        });
        Ok(id)
    }

    /// Scripts the next submission to be declined by the signer.
    pub fn reject_next_submission(&self, message: impl Into<String>) {
        self.lock_state().reject_next = Some(message.into());
    }

    /// Scripts the next confirmation to revert with the given reason.
    pub fn revert_next_confirmation(&self, reason: impl Into<String>) {
        self.lock_state().revert_next = Some(reason.into());
    }

    /// Holds every confirmation open until
    /// [`release_confirmations`](Self::release_confirmations).
    pub fn hold_confirmations(&self) {
        self.gate.hold();
    }

    /// Releases confirmations previously held open.
    pub fn release_confirmations(&self) {
        self.gate.release();
    }

    /// Returns how many submissions reached the contract.
    #[must_use]
    pub fn submission_count(&self) -> u64 {
        self.lock_state().submissions
    }

    fn now(&self) -> ChainTimestamp {
        ChainTimestamp::from_datetime(self.clock.utc())
    }

    fn lock_state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies a confirmed mutation to contract storage.
    fn apply(
        &self,
        handle: &TxHandle,
        signer: Address,
        action: TaskAction,
    ) -> TaskContractResult<TxReceipt> {
        let now = self.now();
        let mut state = self.lock_state();
        let event = match action {
            TaskAction::Create { name } => {
                let id = next_task_id(&mut state)?;
                state.tasks.entry(signer).or_default().push(TaskRecord {
                    id,
                    name,
                    created_at: now,
                    updated_at: now,
                    completed_at: ChainTimestamp::UNSET,
                    deleted_at: ChainTimestamp::UNSET,
                });
                ContractEvent::new(TASK_CREATED_EVENT, Some(id))
            }
            TaskAction::Complete { id } => {
                let record = live_record(&mut state, &signer, id)?;
                if record.completed_at.is_set() {
                    return Err(TaskContractError::Reverted {
                        reason: Some(COMPLETED_TASK_REASON.to_owned()),
                    });
                }
                record.completed_at = now;
                record.updated_at = now;
                ContractEvent::new(TASK_COMPLETED_EVENT, Some(id))
            }
            TaskAction::Delete { id } => {
                let record = live_record(&mut state, &signer, id)?;
                record.deleted_at = now;
                record.updated_at = now;
                ContractEvent::new(TASK_DELETED_EVENT, Some(id))
            }
            TaskAction::Update { id, name } => {
                let record = live_record(&mut state, &signer, id)?;
                record.name = name;
                record.updated_at = now;
                ContractEvent::new(TASK_UPDATED_EVENT, Some(id))
            }
        };
        Ok(TxReceipt::new(handle.clone(), vec![event]))
    }
}

/// Issues the next contract-assigned task id.
fn next_task_id(state: &mut LedgerState) -> TaskContractResult<TaskId> {
    state.next_id += 1;
    TaskId::new(state.next_id).map_err(TaskContractError::transport)
}

/// Finds a live (not deleted) record owned by the signer, or reverts.
fn live_record<'a>(
    state: &'a mut LedgerState,
    signer: &Address,
    id: TaskId,
) -> Result<&'a mut TaskRecord, TaskContractError> {
    state
        .tasks
        .get_mut(signer)
        .and_then(|records| {
            records
                .iter_mut()
                .find(|record| record.id == id && !record.deleted_at.is_set())
        })
        .ok_or(TaskContractError::Reverted {
            reason: Some(MISSING_TASK_REASON.to_owned()),
        })
}

#[async_trait]
impl<C> TaskContract for InMemoryTaskContract<C>
where
    C: Clock + Send + Sync,
{
    async fn fetch_tasks(&self, account: &Address) -> TaskContractResult<Vec<Task>> {
        let state = self.lock_state();
        state
            .tasks
            .get(account)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| !record.deleted_at.is_set())
                    .map(|record| {
                        Task::from_record(record.clone()).map_err(TaskContractError::transport)
                    })
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn submit(&self, action: &TaskAction, signer: &Address) -> TaskContractResult<TxHandle> {
        let mut state = self.lock_state();
        state.submissions += 1;

        if let Some(message) = state.reject_next.take() {
            return Err(TaskContractError::Rejected { message });
        }

        state.next_handle += 1;
        let handle = TxHandle::new(format!("0x{:064x}", state.next_handle));
        let outcome = state
            .revert_next
            .take()
            .map_or(PendingOutcome::Confirm, |reason| {
                PendingOutcome::Revert(Some(reason))
            });
        state.pending.insert(
            handle.clone(),
            PendingSubmission {
                signer: signer.clone(),
                action: action.clone(),
                outcome,
            },
        );
        Ok(handle)
    }

    async fn await_confirmation(&self, handle: &TxHandle) -> TaskContractResult<TxReceipt> {
        if !self.lock_state().pending.contains_key(handle) {
            return Err(TaskContractError::UnknownHandle(handle.clone()));
        }

        self.gate.wait().await;

        let PendingSubmission {
            signer,
            action,
            outcome,
        } = self
            .lock_state()
            .pending
            .remove(handle)
            .ok_or_else(|| TaskContractError::UnknownHandle(handle.clone()))?;
        match outcome {
            PendingOutcome::Revert(reason) => Err(TaskContractError::Reverted { reason }),
            PendingOutcome::Confirm => self.apply(handle, signer, action),
        }
    }
}
