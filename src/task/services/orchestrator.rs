//! The transaction orchestrator: submit, confirm, reconcile.

use crate::config::ChainConfig;
use crate::task::domain::{
    ActionKind, Address, MutationEvent, MutationKey, NetworkId, Task, TaskAction, TaskId,
};
use crate::task::ports::{
    TaskContract, TaskContractError, TxHandle, TxReceipt, WalletSession, WalletSessionResult,
};
use crate::task::services::session::SessionState;
use crate::task::services::supervisor::{ConnectionStatus, ConnectionSupervisor};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;

/// Capacity of the mutation event broadcast channel.
///
/// Slow subscribers that fall further behind than this lose the oldest
/// events; the snapshot and in-flight views remain authoritative.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Result type for orchestrated mutations.
pub type MutationOutcome = Result<MutationSuccess, MutationError>;

/// Outcome of a confirmed and reconciled mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationSuccess {
    tx: TxHandle,
    action: ActionKind,
    created_task_id: Option<TaskId>,
}

impl MutationSuccess {
    pub(crate) const fn new(tx: TxHandle, action: ActionKind, created_task_id: Option<TaskId>) -> Self {
        Self {
            tx,
            action,
            created_task_id,
        }
    }

    /// Returns the confirmed transaction's handle.
    #[must_use]
    pub const fn tx(&self) -> &TxHandle {
        &self.tx
    }

    /// Returns the action class that settled.
    #[must_use]
    pub const fn action(&self) -> ActionKind {
        self.action
    }

    /// Returns the id the contract assigned to a created task, when the
    /// receipt carried a decodable creation event.
    #[must_use]
    pub const fn created_task_id(&self) -> Option<TaskId> {
        self.created_task_id
    }
}

/// Failure taxonomy for orchestrated mutations.
///
/// The first four variants are local precondition failures detected before
/// anything reaches the contract; the rest terminate a submitted request.
/// No failure is retried automatically.
#[derive(Debug, Clone, Error)]
pub enum MutationError {
    /// No wallet account is connected.
    #[error("no wallet account is connected")]
    NotConnected,

    /// The wallet is connected to an unsupported network.
    #[error("connected to network {connected}, expected {expected}")]
    WrongNetwork {
        /// Network the wallet is currently on.
        connected: NetworkId,
        /// The single supported network.
        expected: NetworkId,
    },

    /// An equivalent mutation is already in flight; the request was
    /// dropped, not queued.
    #[error("mutation already in flight: {key}")]
    AlreadyInProgress {
        /// The contested in-flight key.
        key: MutationKey,
    },

    /// The task is already completed; completion is terminal.
    #[error("task {0} is already completed")]
    AlreadyCompleted(TaskId),

    /// The wallet user declined the approval prompt before broadcast.
    #[error("wallet rejected the transaction: {message}")]
    UserRejected {
        /// Wallet-provided decline message.
        message: String,
    },

    /// The transaction was included but reverted on chain.
    #[error("transaction reverted: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Reverted {
        /// Contract-provided revert reason, when available.
        reason: Option<String>,
    },

    /// Confirmation did not arrive within the configured bound.
    ///
    /// The in-flight marker is released, but the broadcast transaction may
    /// still confirm later; the next successful refresh reconciles.
    #[error("confirmation not received within {limit:?}")]
    TimedOut {
        /// The configured confirmation bound.
        limit: Duration,
    },

    /// Transport-layer failure while submitting or awaiting confirmation.
    #[error("chain transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The transaction confirmed but the reconciling read failed, so the
    /// snapshot could not be refreshed.
    #[error("snapshot refresh failed: {0}")]
    SnapshotRefresh(TaskContractError),
}

impl MutationError {
    /// Returns `true` for failures detected before submission.
    ///
    /// Precondition failures never reach the contract and are always
    /// retryable once the precondition is fixed.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NotConnected
                | Self::WrongNetwork { .. }
                | Self::AlreadyInProgress { .. }
                | Self::AlreadyCompleted(_)
        )
    }
}

/// Drives each mutation from intent to settled outcome.
///
/// One orchestrator instance owns the session state for one wallet
/// connection: the authoritative snapshot, the in-flight markers, and the
/// event stream the presentation layer subscribes to. All orchestration is
/// cooperative async; the only suspension points are the port awaits.
pub struct TransactionOrchestrator<C, W>
where
    C: TaskContract,
    W: WalletSession,
{
    contract: Arc<C>,
    supervisor: ConnectionSupervisor<W>,
    session: SessionState,
    events: broadcast::Sender<MutationEvent>,
    confirmation_timeout: Option<Duration>,
}

impl<C, W> TransactionOrchestrator<C, W>
where
    C: TaskContract,
    W: WalletSession,
{
    /// Creates an orchestrator bound to one contract and one wallet.
    #[must_use]
    pub fn new(contract: Arc<C>, wallet: Arc<W>, config: &ChainConfig) -> Self {
        let (events, _initial_receiver) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            contract,
            supervisor: ConnectionSupervisor::new(wallet, config.supported_network()),
            session: SessionState::new(),
            events,
            confirmation_timeout: config.confirmation_timeout(),
        }
    }

    /// Subscribes to mutation phase events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MutationEvent> {
        self.events.subscribe()
    }

    /// Returns a handle to the current task snapshot.
    #[must_use]
    pub fn tasks(&self) -> Arc<Vec<Task>> {
        self.session.snapshot().current()
    }

    /// Returns the session state (snapshot and in-flight views).
    #[must_use]
    pub const fn session(&self) -> &SessionState {
        &self.session
    }

    /// Returns the currently in-flight mutation keys.
    #[must_use]
    pub fn in_flight(&self) -> Vec<MutationKey> {
        self.session.tracker().in_flight()
    }

    /// Returns `true` when the key is currently in flight.
    #[must_use]
    pub fn is_in_flight(&self, key: MutationKey) -> bool {
        self.session.tracker().is_in_flight(key)
    }

    /// Returns the current connection readiness.
    #[must_use]
    pub fn connection(&self) -> ConnectionStatus {
        self.supervisor.status()
    }

    /// Asks the wallet to switch to the supported network.
    ///
    /// # Errors
    ///
    /// Propagates the wallet's refusal or failure; the orchestrator stays
    /// gated either way.
    pub async fn switch_to_supported_network(&self) -> WalletSessionResult<()> {
        self.supervisor.switch_to_supported_network().await
    }

    /// Tears down session state after a wallet disconnect.
    ///
    /// Clears the snapshot and every in-flight marker.
    pub fn handle_disconnect(&self) {
        tracing::debug!("wallet disconnected, tearing down session state");
        self.session.teardown();
    }

    /// Reloads the snapshot from the contract's read path.
    ///
    /// # Errors
    ///
    /// Returns a connection-gate error when the wallet is not ready, or
    /// [`MutationError::SnapshotRefresh`] when the read fails.
    pub async fn refresh(&self) -> Result<(), MutationError> {
        let account = self.gated_account()?;
        let tasks = self
            .contract
            .fetch_tasks(&account)
            .await
            .map_err(MutationError::SnapshotRefresh)?;
        self.session.snapshot().replace(tasks);
        Ok(())
    }

    /// Submits a mutation and drives it to a settled outcome.
    ///
    /// Preconditions are checked before anything reaches the contract:
    /// connection readiness, completion idempotence, and the per-key
    /// in-flight gate. Duplicate requests for a held key are dropped with
    /// [`MutationError::AlreadyInProgress`], not queued.
    ///
    /// On success the snapshot has been replaced from the authoritative
    /// read path. On any failure the in-flight marker has been released.
    /// [`MutationEvent`]s mark the pending and terminal phases for every
    /// request that passed the preconditions.
    ///
    /// # Errors
    ///
    /// Returns a [`MutationError`] naming the failure surface; no failure
    /// is retried automatically.
    pub async fn submit(&self, action: TaskAction) -> MutationOutcome {
        let account = self.gated_account()?;
        self.check_completion_idempotence(&action)?;

        let key = action.key();
        let Some(guard) = self.session.tracker().acquire(key) else {
            return Err(MutationError::AlreadyInProgress { key });
        };
        self.publish(MutationEvent::pending(key));

        let result = self.drive(&action, &account).await;
        match &result {
            Ok(success) => tracing::debug!(
                method = action.kind().contract_method(),
                tx = success.tx().as_str(),
                "mutation settled"
            ),
            Err(err) => log_failure(&action, err),
        }

        // Marker release precedes the terminal event so a subscriber
        // reacting to the event can immediately resubmit.
        drop(guard);
        match result {
            Ok(success) => {
                self.publish(MutationEvent::settled(key));
                Ok(success)
            }
            Err(err) => {
                self.publish(MutationEvent::failed(key, err.to_string()));
                Err(err)
            }
        }
    }

    /// Runs submit, confirmation, receipt parse, and snapshot refresh.
    async fn drive(&self, action: &TaskAction, account: &Address) -> MutationOutcome {
        let handle = self
            .contract
            .submit(action, account)
            .await
            .map_err(map_contract_error)?;
        tracing::debug!(
            method = action.kind().contract_method(),
            tx = handle.as_str(),
            "transaction submitted, awaiting confirmation"
        );

        let receipt = self.await_confirmation(&handle).await?;
        let created_task_id = receipt.created_task_id();
        if matches!(action, TaskAction::Create { .. }) && created_task_id.is_none() {
            tracing::debug!(
                tx = handle.as_str(),
                "no creation event in receipt, relying on snapshot refresh"
            );
        }

        let tasks = self
            .contract
            .fetch_tasks(account)
            .await
            .map_err(MutationError::SnapshotRefresh)?;
        self.session.snapshot().replace(tasks);

        Ok(MutationSuccess::new(handle, action.kind(), created_task_id))
    }

    /// Awaits confirmation, bounded by the configured timeout when set.
    async fn await_confirmation(&self, handle: &TxHandle) -> Result<TxReceipt, MutationError> {
        let confirmation = self.contract.await_confirmation(handle);
        match self.confirmation_timeout {
            Some(limit) => match tokio::time::timeout(limit, confirmation).await {
                Ok(result) => result.map_err(map_contract_error),
                Err(_elapsed) => Err(MutationError::TimedOut { limit }),
            },
            None => confirmation.await.map_err(map_contract_error),
        }
    }

    /// Resolves the connected account or the gate failure.
    fn gated_account(&self) -> Result<Address, MutationError> {
        match self.supervisor.status() {
            ConnectionStatus::Ready { account } => Ok(account),
            ConnectionStatus::Disconnected => Err(MutationError::NotConnected),
            ConnectionStatus::WrongNetwork { connected } => Err(MutationError::WrongNetwork {
                connected,
                expected: self.supervisor.supported_network(),
            }),
        }
    }

    /// Rejects completion of a task the snapshot already shows completed.
    fn check_completion_idempotence(&self, action: &TaskAction) -> Result<(), MutationError> {
        if let TaskAction::Complete { id } = action {
            let already_completed = self
                .session
                .snapshot()
                .task(*id)
                .is_some_and(|task| task.is_completed());
            if already_completed {
                return Err(MutationError::AlreadyCompleted(*id));
            }
        }
        Ok(())
    }

    fn publish(&self, event: MutationEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("no mutation event subscribers");
        }
    }
}

/// Maps port errors onto the orchestrator taxonomy.
///
/// Wallet-level rejection and on-chain revert both terminate the request;
/// they are distinguished only in the log record.
fn map_contract_error(err: TaskContractError) -> MutationError {
    match err {
        TaskContractError::Rejected { message } => MutationError::UserRejected { message },
        TaskContractError::Reverted { reason } => MutationError::Reverted { reason },
        TaskContractError::Transport(source) => MutationError::Transport(source),
        other @ TaskContractError::UnknownHandle(_) => MutationError::Transport(Arc::new(other)),
    }
}

/// Records a failed mutation at a severity matching its surface.
fn log_failure(action: &TaskAction, err: &MutationError) {
    let method = action.kind().contract_method();
    match err {
        MutationError::UserRejected { .. } => {
            tracing::debug!(method, error = %err, "wallet declined before broadcast");
        }
        MutationError::Reverted { .. } => {
            tracing::warn!(method, error = %err, "transaction reverted on chain");
        }
        MutationError::TimedOut { .. } => {
            tracing::warn!(method, error = %err, "confirmation wait exceeded the bound");
        }
        _ => {
            tracing::warn!(method, error = %err, "mutation failed");
        }
    }
}
