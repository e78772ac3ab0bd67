// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

//! Step by step replay of a dirty read: T2 reads a balance that T1 wrote but later rolls back.

mod script;
mod state;

pub use script::{
    DirtySimStep, StepAction, TxId, FINISHED_DESCRIPTION, INITIAL_BALANCE, SCRIPT, WITHDRAWAL,
};
pub use state::{reset, Advance, DirtySimState, LogEntry, TxStatus, TxView};

/// Executes the next step of `state`, see [`DirtySimState::advance`].
pub fn advance(state: &mut DirtySimState) -> Advance {
    state.advance()
}
