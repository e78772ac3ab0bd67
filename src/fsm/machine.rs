// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use super::{transition, Action, TransactionState};
use crate::error::Result;

pub const INIT_LOG_ENTRY: &str = "Simulator initialized.";
pub const RESET_LOG_ENTRY: &str = "Simulator reset.";

/// A transaction together with the log of all actions taken since the last reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionMachine {
    state: TransactionState,
    log: Vec<String>,
}

impl Default for TransactionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionMachine {
    pub fn new() -> Self {
        Self {
            state: TransactionState::Idle,
            log: vec![INIT_LOG_ENTRY.to_string()],
        }
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Takes `action` and records it in the log. Returns the new state.
    /// Disallowed actions leave the machine untouched.
    pub fn apply(&mut self, action: Action) -> Result<TransactionState> {
        let next = match transition(self.state, action) {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(target: "txnsim::fsm", from = %self.state, %action, "rejected transition");
                return Err(e);
            }
        };
        if next == TransactionState::Idle {
            self.log.clear();
            self.log.push(RESET_LOG_ENTRY.to_string());
        } else {
            self.log
                .push(format!("Action: \"{action}\" -> State: {}", next.label()));
        }
        tracing::debug!(target: "txnsim::fsm", from = %self.state, %action, to = %next, "transition");
        self.state = next;
        Ok(next)
    }

    /// Returns to `Idle` with a fresh log, whatever the current state.
    pub fn reset(&mut self) {
        tracing::debug!(target: "txnsim::fsm", from = %self.state, "reset");
        *self = Self::new();
    }
}
