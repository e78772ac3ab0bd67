// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::error::SimError;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Lifecycle state of a single transaction.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TransactionState {
    Idle,
    Active,
    PartiallyCommitted,
    Committed,
    Failed,
    Aborted,
}

impl TransactionState {
    pub const ALL: [TransactionState; 6] = [
        TransactionState::Idle,
        TransactionState::Active,
        TransactionState::PartiallyCommitted,
        TransactionState::Committed,
        TransactionState::Failed,
        TransactionState::Aborted,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TransactionState::Idle => "Idle",
            TransactionState::Active => "Active",
            TransactionState::PartiallyCommitted => "Partially Committed",
            TransactionState::Committed => "Committed",
            TransactionState::Failed => "Failed",
            TransactionState::Aborted => "Aborted",
        }
    }
}

impl Display for TransactionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// User triggered actions that move a transaction through its lifecycle.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Action {
    BeginTransaction,
    ExecuteOperation,
    EndTransaction,
    SimulateFailure,
    Commit,
    Rollback,
    StartNew,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::BeginTransaction,
        Action::ExecuteOperation,
        Action::EndTransaction,
        Action::SimulateFailure,
        Action::Commit,
        Action::Rollback,
        Action::StartNew,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Action::BeginTransaction => "Begin Transaction",
            Action::ExecuteOperation => "Execute Operation",
            Action::EndTransaction => "End Transaction",
            Action::SimulateFailure => "Simulate Failure",
            Action::Commit => "Commit",
            Action::Rollback => "Rollback",
            Action::StartNew => "Start New",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

lazy_static! {
    /// lower case label with single spaces -> action
    static ref ACTION_BY_LABEL: HashMap<String, Action> = Action::ALL
        .iter()
        .map(|a| (a.label().to_ascii_lowercase(), *a))
        .collect();
}

/// Lower cases a label and collapses runs of whitespace.
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

impl FromStr for Action {
    type Err = SimError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        ACTION_BY_LABEL
            .get(&normalize_label(label))
            .copied()
            .ok_or_else(|| SimError::UnknownAction(label.trim().to_string()))
    }
}
