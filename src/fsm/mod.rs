// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

//! Lifecycle of a single database transaction: Idle, Active, Partially Committed and Committed,
//! with a Failed and Aborted branch.

mod config;
mod machine;
mod state;
mod walk;

pub use config::{describe, states, transition, Edge, Edges, StateInfo};
pub use machine::{TransactionMachine, INIT_LOG_ENTRY, RESET_LOG_ENTRY};
pub use state::{Action, TransactionState};
pub use walk::random_walk;
