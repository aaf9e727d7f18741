//! Domain-focused tests for task values and the mutation vocabulary.

use crate::task::domain::{
    ActionKind, Address, ChainTimestamp, MutationEvent, MutationKey, MutationPhase,
    MutationTarget, NetworkId, Task, TaskAction, TaskDomainError, TaskId, TaskName, TaskRecord,
};
use eyre::{OptionExt, ensure};
use rstest::rstest;
use serde_json::json;

fn task_id(value: u64) -> TaskId {
    TaskId::new(value).expect("valid task id")
}

fn task_name(value: &str) -> TaskName {
    TaskName::new(value).expect("valid task name")
}

fn record(id: u64, name: &str) -> TaskRecord {
    TaskRecord {
        id: task_id(id),
        name: task_name(name),
        created_at: ChainTimestamp::from_secs(1_700_000_000),
        updated_at: ChainTimestamp::from_secs(1_700_000_000),
        completed_at: ChainTimestamp::UNSET,
        deleted_at: ChainTimestamp::UNSET,
    }
}

// ── Identifier and scalar validation ────────────────────────────────

#[rstest]
fn task_id_rejects_zero() {
    assert_eq!(TaskId::new(0), Err(TaskDomainError::InvalidTaskId(0)));
}

#[rstest]
fn task_id_preserves_value() {
    assert_eq!(task_id(42).value(), 42);
    assert_eq!(task_id(42).to_string(), "42");
}

#[rstest]
fn address_normalizes_to_lowercase() {
    let address = Address::new("0x689E4E0D141Fac9034fFaDdC9f1d83035F88f9aC")
        .expect("valid checksummed address");
    assert_eq!(address.as_str(), "0x689e4e0d141fac9034ffaddc9f1d83035f88f9ac");
}

#[rstest]
#[case::missing_prefix("689e4e0d141fac9034ffaddc9f1d83035f88f9ac")]
#[case::too_short("0x689e4e0d")]
#[case::non_hex("0x689e4e0d141fac9034ffaddc9f1d83035f88f9zz")]
#[case::empty("")]
fn address_rejects_malformed_values(#[case] raw: &str) {
    assert!(matches!(
        Address::new(raw),
        Err(TaskDomainError::InvalidAddress(_))
    ));
}

#[rstest]
fn task_name_trims_surrounding_whitespace() {
    assert_eq!(task_name("  Buy milk  ").as_str(), "Buy milk");
}

#[rstest]
#[case::empty("")]
#[case::whitespace_only("   ")]
fn task_name_rejects_empty_values(#[case] raw: &str) {
    assert_eq!(TaskName::new(raw), Err(TaskDomainError::EmptyTaskName));
}

#[rstest]
fn network_id_rejects_zero() {
    assert_eq!(NetworkId::new(0), Err(TaskDomainError::InvalidNetworkId(0)));
}

// ── Chain timestamps ────────────────────────────────────────────────

#[rstest]
fn unset_timestamp_is_the_zero_sentinel() {
    assert!(!ChainTimestamp::UNSET.is_set());
    assert_eq!(ChainTimestamp::from_secs(0), ChainTimestamp::UNSET);
    assert!(ChainTimestamp::UNSET.to_datetime().is_none());
}

#[rstest]
fn set_timestamp_converts_to_wall_clock() -> eyre::Result<()> {
    let at = ChainTimestamp::from_secs(1_700_000_000);
    ensure!(at.is_set(), "a nonzero timestamp should be set");
    let wall_clock = at.to_datetime().ok_or_eyre("representable instant")?;
    ensure!(
        ChainTimestamp::from_datetime(wall_clock) == at,
        "wall-clock conversion should round-trip"
    );
    Ok(())
}

// ── Task records ────────────────────────────────────────────────────

#[rstest]
fn task_from_record_exposes_fields() {
    let task = Task::from_record(record(7, "Water plants")).expect("valid record");
    assert_eq!(task.id(), task_id(7));
    assert_eq!(task.name().as_str(), "Water plants");
    assert!(!task.is_completed());
    assert!(task.is_visible());
}

#[rstest]
fn task_from_record_rejects_update_before_creation() {
    let mut bad = record(7, "Water plants");
    bad.updated_at = ChainTimestamp::from_secs(1);
    let result = Task::from_record(bad);
    assert!(matches!(
        result,
        Err(TaskDomainError::TimestampOrder { id, .. }) if id == task_id(7)
    ));
}

#[rstest]
fn completed_task_is_terminal_and_visible() {
    let mut completed = record(3, "Ship release");
    completed.completed_at = ChainTimestamp::from_secs(1_700_000_100);
    let task = Task::from_record(completed).expect("valid record");
    assert!(task.is_completed());
    assert!(task.is_visible());
}

#[rstest]
fn deleted_task_is_not_visible() {
    let mut deleted = record(4, "Old errand");
    deleted.deleted_at = ChainTimestamp::from_secs(1_700_000_200);
    let task = Task::from_record(deleted).expect("valid record");
    assert!(task.is_deleted());
    assert!(!task.is_visible());
}

// ── Mutation vocabulary ─────────────────────────────────────────────

#[rstest]
fn create_actions_share_the_new_task_slot() {
    let first = TaskAction::Create {
        name: task_name("One"),
    };
    let second = TaskAction::Create {
        name: task_name("Two"),
    };
    assert_eq!(first.key(), second.key());
    assert_eq!(first.target(), MutationTarget::NewTask);
    assert!(first.key().target.task_id().is_none());
}

#[rstest]
fn keys_are_independent_across_tasks_and_actions() {
    let complete_five = TaskAction::Complete { id: task_id(5) }.key();
    let complete_six = TaskAction::Complete { id: task_id(6) }.key();
    let delete_five = TaskAction::Delete { id: task_id(5) }.key();
    assert_ne!(complete_five, complete_six);
    assert_ne!(complete_five, delete_five);
    assert_eq!(complete_five.target.task_id(), Some(task_id(5)));
}

#[rstest]
#[case(ActionKind::Create, "createTask")]
#[case(ActionKind::Complete, "markTaskAsCompleted")]
#[case(ActionKind::Delete, "deleteTask")]
#[case(ActionKind::Update, "updateTask")]
fn action_kinds_name_their_contract_entry_points(
    #[case] kind: ActionKind,
    #[case] method: &str,
) {
    assert_eq!(kind.contract_method(), method);
}

#[rstest]
fn mutation_keys_render_for_diagnostics() {
    let update = TaskAction::Update {
        id: task_id(9),
        name: task_name("Renamed"),
    };
    assert_eq!(update.key().to_string(), "update task 9");

    let create = TaskAction::Create {
        name: task_name("Fresh"),
    };
    assert_eq!(create.key().to_string(), "create (new task)");
}

// ── Event payloads ──────────────────────────────────────────────────

#[rstest]
fn pending_event_serializes_without_reason() {
    let key = TaskAction::Complete { id: task_id(5) }.key();
    let event = MutationEvent::pending(key);
    assert_eq!(event.phase, MutationPhase::Pending);
    assert_eq!(
        serde_json::to_value(&event).expect("serializable event"),
        json!({ "task_id": 5, "action": "complete", "phase": "pending" })
    );
}

#[rstest]
fn failed_event_carries_the_reason_text() {
    let key = MutationKey {
        target: MutationTarget::NewTask,
        kind: ActionKind::Create,
    };
    let event = MutationEvent::failed(key, "wallet rejected the transaction");
    assert_eq!(
        serde_json::to_value(&event).expect("serializable event"),
        json!({
            "task_id": null,
            "action": "create",
            "phase": "failed",
            "reason": "wallet rejected the transaction"
        })
    );
}
