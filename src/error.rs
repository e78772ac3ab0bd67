// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::fsm::{Action, TransactionState};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// The action is not offered by the current state.
    #[error("cannot \"{action}\" while the transaction is {from}")]
    InvalidTransition {
        from: TransactionState,
        action: Action,
    },
    /// The label does not name any transaction action.
    #[error("unknown action: \"{0}\"")]
    UnknownAction(String),
    /// Session tab name that does not exist.
    #[error("unknown tab: \"{0}\"")]
    UnknownTab(String),
    #[error("unknown ACID property: \"{0}\"")]
    UnknownAcidProperty(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
