//! Full mutation journeys through the orchestrator.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use super::helpers::{create_task, ready_board};
use chainboard::task::domain::{ActionKind, MutationPhase, TaskAction, TaskName};

#[tokio::test(flavor = "multi_thread")]
async fn a_board_fills_completes_and_empties() {
    let board = ready_board();
    board
        .orchestrator
        .refresh()
        .await
        .expect("initial refresh succeeds");
    assert!(board.orchestrator.tasks().is_empty());

    let groceries = create_task(&board, "Buy milk").await;
    let release = create_task(&board, "Ship release").await;
    assert_eq!(board.orchestrator.tasks().len(), 2);

    board
        .orchestrator
        .submit(TaskAction::Complete { id: release })
        .await
        .expect("complete should settle");

    let snapshot = board.orchestrator.session().snapshot();
    assert_eq!(snapshot.active().len(), 1);
    assert_eq!(snapshot.completed().len(), 1);
    assert!(
        snapshot
            .task(release)
            .is_some_and(|task| task.is_completed())
    );

    board
        .orchestrator
        .submit(TaskAction::Delete { id: release })
        .await
        .expect("delete should settle");
    board
        .orchestrator
        .submit(TaskAction::Delete { id: groceries })
        .await
        .expect("delete should settle");

    assert!(board.orchestrator.tasks().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn renaming_keeps_identity_and_orders_timestamps() {
    let board = ready_board();
    let id = create_task(&board, "Watr plants").await;

    board
        .orchestrator
        .submit(TaskAction::Update {
            id,
            name: TaskName::new("Water plants").expect("valid task name"),
        })
        .await
        .expect("update should settle");

    let task = board
        .orchestrator
        .session()
        .snapshot()
        .task(id)
        .expect("task survives a rename");
    assert_eq!(task.name().as_str(), "Water plants");
    assert!(task.created_at().is_set());
    assert!(task.updated_at() >= task.created_at());
    assert!(!task.is_completed());
}

#[tokio::test(flavor = "multi_thread")]
async fn the_event_stream_narrates_each_mutation_in_order() {
    let board = ready_board();
    let mut events = board.orchestrator.subscribe();

    let id = create_task(&board, "Buy milk").await;
    board
        .orchestrator
        .submit(TaskAction::Complete { id })
        .await
        .expect("complete should settle");

    let phases: Vec<(ActionKind, MutationPhase)> = [
        events.recv().await.expect("create pending"),
        events.recv().await.expect("create settled"),
        events.recv().await.expect("complete pending"),
        events.recv().await.expect("complete settled"),
    ]
    .into_iter()
    .map(|event| (event.action, event.phase))
    .collect();

    assert_eq!(
        phases,
        vec![
            (ActionKind::Create, MutationPhase::Pending),
            (ActionKind::Create, MutationPhase::Settled),
            (ActionKind::Complete, MutationPhase::Pending),
            (ActionKind::Complete, MutationPhase::Settled),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn unrelated_tasks_mutate_concurrently() {
    let board = ready_board();
    let first = create_task(&board, "First errand").await;
    let second = create_task(&board, "Second errand").await;
    board.contract.hold_confirmations();

    let complete_first = tokio::spawn({
        let orchestrator = std::sync::Arc::clone(&board.orchestrator);
        async move { orchestrator.submit(TaskAction::Complete { id: first }).await }
    });
    let complete_second = tokio::spawn({
        let orchestrator = std::sync::Arc::clone(&board.orchestrator);
        async move { orchestrator.submit(TaskAction::Complete { id: second }).await }
    });

    // Both submissions reach the pending phase; neither blocks the other.
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);
    while board.orchestrator.in_flight().len() < 2 {
        assert!(
            tokio::time::Instant::now() < deadline,
            "both mutations should go pending"
        );
        tokio::task::yield_now().await;
    }

    board.contract.release_confirmations();
    complete_first
        .await
        .expect("task join")
        .expect("first completion settles");
    complete_second
        .await
        .expect("task join")
        .expect("second completion settles");

    // The two settling refreshes may land in either order; a final refresh
    // observes the contract state both confirmations produced.
    board
        .orchestrator
        .refresh()
        .await
        .expect("final refresh succeeds");
    let snapshot = board.orchestrator.session().snapshot();
    assert_eq!(snapshot.completed().len(), 2);
    assert!(board.orchestrator.in_flight().is_empty());
}
