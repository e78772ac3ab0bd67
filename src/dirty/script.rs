// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use std::fmt::{Display, Formatter};

pub const INITIAL_BALANCE: i64 = 1000;
/// Amount that T1 tries to withdraw before it rolls back.
pub const WITHDRAWAL: i64 = 100;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TxId {
    T1,
    T2,
}

impl TxId {
    pub fn number(&self) -> u8 {
        match self {
            TxId::T1 => 1,
            TxId::T2 => 2,
        }
    }
}

impl Display for TxId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{}", self.number())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum StepAction {
    Begin,
    Read,
    UpdateLocal,
    Write,
    Rollback,
    UseValue,
}

impl StepAction {
    /// Name as it appears in the transaction logs.
    pub fn name(&self) -> &'static str {
        match self {
            StepAction::Begin => "BEGIN TRANSACTION",
            StepAction::Read => "READ",
            StepAction::UpdateLocal => "UPDATE_LOCAL",
            StepAction::Write => "WRITE",
            StepAction::Rollback => "ROLLBACK",
            StepAction::UseValue => "USE_VALUE",
        }
    }
}

impl Display for StepAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DirtySimStep {
    pub tx: TxId,
    pub action: StepAction,
    /// Marks the read of uncommitted data.
    pub is_dirty: bool,
    pub description: &'static str,
}

const fn step(tx: TxId, action: StepAction, description: &'static str) -> DirtySimStep {
    DirtySimStep {
        tx,
        action,
        is_dirty: false,
        description,
    }
}

/// T1 writes a balance it later rolls back. T2 reads that write in between.
/// Steps must stay in this order: write, dirty read, rollback.
pub static SCRIPT: [DirtySimStep; 8] = [
    step(
        TxId::T1,
        StepAction::Begin,
        "T1 starts and intends to withdraw $100.",
    ),
    step(
        TxId::T1,
        StepAction::Read,
        "T1 reads the account balance: $1000.",
    ),
    step(
        TxId::T1,
        StepAction::UpdateLocal,
        "T1 calculates the new balance locally: $1000 - $100 = $900.",
    ),
    step(
        TxId::T1,
        StepAction::Write,
        "T1 writes the new, uncommitted balance ($900) to the database.",
    ),
    step(
        TxId::T2,
        StepAction::Begin,
        "T2 starts, intending to read the balance for a report.",
    ),
    DirtySimStep {
        tx: TxId::T2,
        action: StepAction::Read,
        is_dirty: true,
        description: "T2 reads the balance. It sees $900, which is uncommitted data from T1.",
    },
    step(
        TxId::T1,
        StepAction::Rollback,
        "T1 encounters an error and rolls back. The original balance of $1000 is restored.",
    ),
    step(
        TxId::T2,
        StepAction::UseValue,
        "T2 proceeds, using the incorrect value of $900 for its report, leading to data inconsistency.",
    ),
];

pub const FINISHED_DESCRIPTION: &str = "Simulation finished. T2 has used inconsistent data.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_dirty_step_between_write_and_rollback() {
        let dirty: Vec<_> = SCRIPT
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_dirty)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(dirty, [5]);
        let write = SCRIPT
            .iter()
            .position(|s| s.action == StepAction::Write)
            .unwrap();
        let rollback = SCRIPT
            .iter()
            .position(|s| s.action == StepAction::Rollback)
            .unwrap();
        assert!(write < dirty[0] && dirty[0] < rollback);
        assert_eq!(SCRIPT[dirty[0]].tx, TxId::T2);
        assert_eq!(SCRIPT[write].tx, TxId::T1);
    }
}
