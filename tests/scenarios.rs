// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use txnsim::dcl::{AccessControlState, QueryAttempt, ACCESS_DENIED, PRODUCTS};
use txnsim::dirty::{self, Advance, TxId, TxStatus, SCRIPT};
use txnsim::fsm::{describe, transition, Action, TransactionMachine, TransactionState};

#[test]
fn failure_path_end_to_end() {
    use Action as A;
    use TransactionState as S;
    let mut m = TransactionMachine::new();
    let mut visited = vec![m.state()];
    let actions = [
        A::BeginTransaction,
        A::ExecuteOperation,
        A::EndTransaction,
        A::SimulateFailure,
        A::Rollback,
    ];
    for action in actions {
        visited.push(m.apply(action).unwrap());
    }
    assert_eq!(
        m.log(),
        [
            "Simulator initialized.",
            "Action: \"Begin Transaction\" -> State: Active",
            "Action: \"Execute Operation\" -> State: Active",
            "Action: \"End Transaction\" -> State: Partially Committed",
            "Action: \"Simulate Failure\" -> State: Failed",
            "Action: \"Rollback\" -> State: Aborted",
        ]
    );
    visited.push(m.apply(A::StartNew).unwrap());
    assert_eq!(
        visited,
        [
            S::Idle,
            S::Active,
            S::Active,
            S::PartiallyCommitted,
            S::Failed,
            S::Aborted,
            S::Idle
        ]
    );
    assert_eq!(m.log(), ["Simulator reset."]);
}

#[test]
fn allowed_actions_agree_with_transition() {
    for state in TransactionState::ALL {
        for edge in describe(state).allowed_actions.iter() {
            assert_eq!(transition(state, edge.action), Ok(edge.next));
        }
    }
}

#[test]
fn only_reset_reaches_idle() {
    for state in TransactionState::ALL {
        for edge in describe(state).allowed_actions.iter() {
            if edge.next == TransactionState::Idle {
                assert_eq!(edge.action, Action::StartNew);
                assert!(matches!(
                    state,
                    TransactionState::Committed | TransactionState::Aborted
                ));
            }
        }
    }
    // Active can only be entered from Idle or from itself
    for state in TransactionState::ALL {
        let enters_active = describe(state)
            .allowed_actions
            .iter()
            .any(|e| e.next == TransactionState::Active);
        assert_eq!(
            enters_active,
            matches!(state, TransactionState::Idle | TransactionState::Active),
            "{state}"
        );
    }
}

#[test]
fn dirty_read_checkpoints() {
    let mut s = dirty::reset();
    let mut seen = Vec::new();
    loop {
        match dirty::advance(&mut s) {
            Advance::Finished => break,
            Advance::Stepped(index) => {
                seen.push(index);
                match index + 1 {
                    4 => {
                        assert_eq!(s.shared_balance(), 900);
                        assert!(s.is_uncommitted());
                    }
                    6 => {
                        assert_eq!(s.tx(TxId::T2).local_balance, Some(900));
                        assert!(SCRIPT[index].is_dirty);
                        assert!(s.tx(TxId::T2).log.last().unwrap().is_dirty);
                    }
                    7 => {
                        assert_eq!(s.shared_balance(), 1000);
                        assert!(!s.is_uncommitted());
                    }
                    _ => {}
                }
            }
        }
    }
    assert_eq!(seen, (0..SCRIPT.len()).collect::<Vec<_>>());
    assert_eq!(s.tx(TxId::T1).status, TxStatus::RolledBack);
    assert_eq!(s.tx(TxId::T2).status, TxStatus::Committed);

    let done = s.clone();
    assert_eq!(dirty::advance(&mut s), Advance::Finished);
    assert_eq!(s, done);

    s.reset();
    assert_eq!(s.shared_balance(), 1000);
    assert!(s.tx(TxId::T1).log.is_empty() && s.tx(TxId::T2).log.is_empty());
}

#[test]
fn grant_and_revoke() {
    let granted = AccessControlState::default().grant().attempt_query();
    assert_eq!(granted.last_attempt(), QueryAttempt::Success(&PRODUCTS));
    let revoked = granted.revoke();
    assert_eq!(revoked.last_attempt(), QueryAttempt::None);
    assert_eq!(
        revoked.attempt_query().last_attempt(),
        QueryAttempt::Denied(ACCESS_DENIED)
    );
}
