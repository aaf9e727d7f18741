//! Network gating, switching, and session teardown flows.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use super::helpers::{board_on_network, create_task, other_network, ready_board};
use chainboard::task::domain::{TaskAction, TaskName};
use chainboard::task::services::{ConnectionStatus, MutationError};

fn buy_milk() -> TaskAction {
    TaskAction::Create {
        name: TaskName::new("Buy milk").expect("valid task name"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn a_granted_switch_unblocks_mutations() {
    let board = board_on_network(other_network());

    let gated = board.orchestrator.submit(buy_milk()).await;
    assert!(matches!(gated, Err(MutationError::WrongNetwork { .. })));
    assert_eq!(board.contract.submission_count(), 0);

    board
        .orchestrator
        .switch_to_supported_network()
        .await
        .expect("switch should be granted");
    assert!(board.orchestrator.connection().is_ready());

    board
        .orchestrator
        .submit(buy_milk())
        .await
        .expect("create should settle after the switch");
    assert_eq!(board.orchestrator.tasks().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn a_denied_switch_leaves_the_gate_closed() {
    let board = board_on_network(other_network());
    board.wallet.deny_network_switch("user dismissed the prompt");

    let switch = board.orchestrator.switch_to_supported_network().await;
    assert!(switch.is_err());

    let still_gated = board.orchestrator.submit(buy_milk()).await;
    assert!(matches!(
        still_gated,
        Err(MutationError::WrongNetwork { .. })
    ));
    assert_eq!(board.contract.submission_count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn disconnect_clears_the_session_and_reconnect_repopulates() {
    let board = ready_board();
    create_task(&board, "Buy milk").await;
    create_task(&board, "Ship release").await;
    assert_eq!(board.orchestrator.tasks().len(), 2);

    board.wallet.disconnect();
    board.orchestrator.handle_disconnect();
    assert_eq!(
        board.orchestrator.connection(),
        ConnectionStatus::Disconnected
    );
    assert!(board.orchestrator.tasks().is_empty());

    // Contract storage is canonical: reconnecting restores the tasks.
    board
        .wallet
        .connect(super::helpers::account(), super::helpers::supported_network());
    board
        .orchestrator
        .refresh()
        .await
        .expect("refresh after reconnect succeeds");
    assert_eq!(board.orchestrator.tasks().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn mid_session_network_change_gates_the_next_mutation() {
    let board = ready_board();
    create_task(&board, "Buy milk").await;

    board.wallet.set_network(other_network());

    let gated = board.orchestrator.submit(buy_milk()).await;
    assert!(matches!(gated, Err(MutationError::WrongNetwork { .. })));
    // The stale snapshot is still readable while gated.
    assert_eq!(board.orchestrator.tasks().len(), 1);
}
