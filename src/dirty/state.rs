// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use super::script::*;
use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TxStatus {
    Idle,
    Active,
    Committed,
    RolledBack,
}

impl Display for TxStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TxStatus::Idle => "Idle",
            TxStatus::Active => "Active",
            TxStatus::Committed => "Committed",
            TxStatus::RolledBack => "Rolled Back",
        };
        write!(f, "{name}")
    }
}

/// A log line of one transaction. The dirty flag is copied from the step that produced it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct LogEntry {
    pub text: String,
    pub is_dirty: bool,
}

/// What a single transaction has done and seen so far.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TxView {
    pub log: Vec<LogEntry>,
    /// Balance as last read or computed by this transaction.
    pub local_balance: Option<i64>,
    pub status: TxStatus,
}

impl Default for TxView {
    fn default() -> Self {
        Self {
            log: Vec::new(),
            local_balance: None,
            status: TxStatus::Idle,
        }
    }
}

/// Result of asking the simulation for one more step.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Advance {
    /// Executed the step with this zero-based index.
    Stepped(usize),
    /// The script is exhausted. Nothing was changed.
    Finished,
}

/// Shared balance plus the view of both transactions, replayed one step at a time.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DirtySimState {
    shared_balance: i64,
    is_uncommitted: bool,
    t1: TxView,
    t2: TxView,
    cursor: usize,
}

impl Default for DirtySimState {
    fn default() -> Self {
        reset()
    }
}

/// The state before the first step.
pub fn reset() -> DirtySimState {
    DirtySimState {
        shared_balance: INITIAL_BALANCE,
        is_uncommitted: false,
        t1: TxView::default(),
        t2: TxView::default(),
        cursor: 0,
    }
}

impl DirtySimState {
    pub fn shared_balance(&self) -> i64 {
        self.shared_balance
    }

    /// True while T1's write has neither been rolled back nor committed.
    pub fn is_uncommitted(&self) -> bool {
        self.is_uncommitted
    }

    pub fn tx(&self, id: TxId) -> &TxView {
        match id {
            TxId::T1 => &self.t1,
            TxId::T2 => &self.t2,
        }
    }

    fn tx_mut(&mut self, id: TxId) -> &mut TxView {
        match id {
            TxId::T1 => &mut self.t1,
            TxId::T2 => &mut self.t2,
        }
    }

    /// Number of steps executed so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= SCRIPT.len()
    }

    pub fn next_step(&self) -> Option<&'static DirtySimStep> {
        SCRIPT.get(self.cursor)
    }

    /// Narration of the step that will execute next.
    pub fn current_description(&self) -> &'static str {
        self.next_step()
            .map(|s| s.description)
            .unwrap_or(FINISHED_DESCRIPTION)
    }

    /// Discards all progress and returns to the state before the first step.
    pub fn reset(&mut self) {
        tracing::debug!(target: "txnsim::dirty", cursor = self.cursor, "reset");
        *self = reset();
    }

    /// Executes exactly one step of the script.
    pub fn advance(&mut self) -> Advance {
        let Some(step) = self.next_step() else {
            tracing::debug!(target: "txnsim::dirty", "script exhausted");
            return Advance::Finished;
        };
        let index = self.cursor;
        let shared = self.shared_balance;
        let tx = self.tx_mut(step.tx);
        tx.log.push(LogEntry {
            text: format!("[Step {}] {}", index + 1, step.action),
            is_dirty: step.is_dirty,
        });
        match step.action {
            StepAction::Begin => tx.status = TxStatus::Active,
            StepAction::Read => tx.local_balance = Some(shared),
            // computed from the initial balance, not re-read
            StepAction::UpdateLocal => tx.local_balance = Some(INITIAL_BALANCE - WITHDRAWAL),
            StepAction::Write => {
                self.shared_balance = INITIAL_BALANCE - WITHDRAWAL;
                self.is_uncommitted = true;
            }
            StepAction::Rollback => {
                tx.status = TxStatus::RolledBack;
                self.shared_balance = INITIAL_BALANCE;
                self.is_uncommitted = false;
            }
            StepAction::UseValue => tx.status = TxStatus::Committed,
        }
        self.cursor += 1;
        tracing::debug!(
            target: "txnsim::dirty",
            step = index + 1,
            tx = %step.tx,
            action = %step.action,
            dirty = step.is_dirty,
            balance = self.shared_balance,
            "advance"
        );
        Advance::Stepped(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(steps: usize) -> DirtySimState {
        let mut s = reset();
        for _ in 0..steps {
            s.advance();
        }
        s
    }

    #[test]
    fn write_is_uncommitted() {
        let s = run(4);
        assert_eq!(s.shared_balance(), 900);
        assert!(s.is_uncommitted());
        assert_eq!(s.tx(TxId::T1).local_balance, Some(900));
        assert_eq!(s.tx(TxId::T2).status, TxStatus::Idle);
    }

    #[test]
    fn update_local_does_not_touch_shared_balance() {
        let s = run(3);
        assert_eq!(s.shared_balance(), INITIAL_BALANCE);
        assert!(!s.is_uncommitted());
        assert_eq!(s.tx(TxId::T1).local_balance, Some(900));
    }

    #[test]
    fn dirty_read_sees_uncommitted_write() {
        let s = run(6);
        let t2 = s.tx(TxId::T2);
        assert_eq!(t2.local_balance, Some(900));
        let last = t2.log.last().unwrap();
        assert_eq!(last.text, "[Step 6] READ");
        assert!(last.is_dirty);
        assert_eq!(t2.log.iter().filter(|e| e.is_dirty).count(), 1);
    }

    #[test]
    fn rollback_restores_balance() {
        let s = run(7);
        assert_eq!(s.shared_balance(), 1000);
        assert!(!s.is_uncommitted());
        assert_eq!(s.tx(TxId::T1).status, TxStatus::RolledBack);
        // the stale value survives in T2
        assert_eq!(s.tx(TxId::T2).local_balance, Some(900));
    }

    #[test]
    fn finished_is_idempotent() {
        let mut s = run(7);
        assert_eq!(s.advance(), Advance::Stepped(7));
        assert!(s.is_finished());
        assert_eq!(s.tx(TxId::T2).status, TxStatus::Committed);
        let done = s.clone();
        for _ in 0..3 {
            assert_eq!(s.advance(), Advance::Finished);
            assert_eq!(s, done);
        }
        assert_eq!(s.cursor(), SCRIPT.len());
        assert_eq!(s.current_description(), FINISHED_DESCRIPTION);
    }

    #[test]
    fn logs_are_split_by_transaction() {
        let s = run(SCRIPT.len());
        let t1: Vec<_> = s.tx(TxId::T1).log.iter().map(|e| e.text.as_str()).collect();
        let t2: Vec<_> = s.tx(TxId::T2).log.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(
            t1,
            [
                "[Step 1] BEGIN TRANSACTION",
                "[Step 2] READ",
                "[Step 3] UPDATE_LOCAL",
                "[Step 4] WRITE",
                "[Step 7] ROLLBACK",
            ]
        );
        assert_eq!(
            t2,
            [
                "[Step 5] BEGIN TRANSACTION",
                "[Step 6] READ",
                "[Step 8] USE_VALUE",
            ]
        );
    }

    #[test]
    fn reset_from_any_point() {
        for steps in 0..=SCRIPT.len() + 2 {
            let mut s = run(steps);
            s.reset();
            assert_eq!(s.shared_balance(), 1000);
            assert!(s.tx(TxId::T1).log.is_empty());
            assert!(s.tx(TxId::T2).log.is_empty());
            assert_eq!(s.cursor(), 0);
            assert_eq!(s, DirtySimState::default());
        }
    }
}
