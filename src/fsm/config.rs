// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use super::{Action, TransactionState};
use crate::error::{Result, SimError};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use smallvec::{smallvec, SmallVec};

/// An action offered in a state together with the state it leads to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Edge {
    pub action: Action,
    pub next: TransactionState,
}

/// No state offers more than three actions.
pub type Edges = SmallVec<[Edge; 3]>;

#[derive(Debug, Clone)]
pub struct StateInfo {
    pub label: &'static str,
    pub description: &'static str,
    pub allowed_actions: Edges,
}

impl StateInfo {
    pub fn next_state(&self, action: Action) -> Option<TransactionState> {
        self.allowed_actions
            .iter()
            .find(|e| e.action == action)
            .map(|e| e.next)
    }
}

fn edge(action: Action, next: TransactionState) -> Edge {
    Edge { action, next }
}

fn build_state_table() -> IndexMap<TransactionState, StateInfo> {
    use Action as A;
    use TransactionState as S;
    let mut table = IndexMap::with_capacity(S::ALL.len());
    table.insert(
        S::Idle,
        StateInfo {
            label: S::Idle.label(),
            description: "The system is ready to begin a new transaction. No operations are currently in progress.",
            allowed_actions: smallvec![edge(A::BeginTransaction, S::Active)],
        },
    );
    table.insert(
        S::Active,
        StateInfo {
            label: S::Active.label(),
            description: "The transaction is in progress. Operations (read, write, update) are being executed. Changes are not yet permanent.",
            allowed_actions: smallvec![
                edge(A::ExecuteOperation, S::Active),
                edge(A::EndTransaction, S::PartiallyCommitted),
                edge(A::SimulateFailure, S::Failed),
            ],
        },
    );
    table.insert(
        S::PartiallyCommitted,
        StateInfo {
            label: S::PartiallyCommitted.label(),
            description: "All operations have finished successfully. Changes are saved to a temporary log, awaiting final commit to the database.",
            allowed_actions: smallvec![
                edge(A::Commit, S::Committed),
                edge(A::SimulateFailure, S::Failed),
            ],
        },
    );
    table.insert(
        S::Committed,
        StateInfo {
            label: S::Committed.label(),
            description: "The transaction has completed successfully. All changes are now permanently saved to the database.",
            allowed_actions: smallvec![edge(A::StartNew, S::Idle)],
        },
    );
    table.insert(
        S::Failed,
        StateInfo {
            label: S::Failed.label(),
            description: "An error occurred during the Active or Partially Committed state. The transaction must be rolled back.",
            allowed_actions: smallvec![edge(A::Rollback, S::Aborted)],
        },
    );
    table.insert(
        S::Aborted,
        StateInfo {
            label: S::Aborted.label(),
            description: "The transaction has been rolled back. The database is restored to its state before the transaction began.",
            allowed_actions: smallvec![edge(A::StartNew, S::Idle)],
        },
    );
    table
}

lazy_static! {
    static ref STATE_TABLE: IndexMap<TransactionState, StateInfo> = build_state_table();
}

/// Returns the label, description and allowed actions of a state.
pub fn describe(state: TransactionState) -> &'static StateInfo {
    // every state is inserted by `build_state_table`
    &STATE_TABLE[&state]
}

/// All states in lifecycle order together with their description.
pub fn states() -> impl Iterator<Item = (TransactionState, &'static StateInfo)> {
    STATE_TABLE.iter().map(|(s, info)| (*s, info))
}

/// Computes the state reached by taking `action` in `current`.
pub fn transition(current: TransactionState, action: Action) -> Result<TransactionState> {
    describe(current)
        .next_state(action)
        .ok_or(SimError::InvalidTransition {
            from: current,
            action,
        })
}
