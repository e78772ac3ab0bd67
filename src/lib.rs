// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

pub mod acid;
pub mod app;
pub mod dcl;
pub mod dirty;
pub mod error;
pub mod fsm;
pub mod render;
pub mod session;

pub use app::{App, Command, Tab};
pub use error::SimError;
pub use render::Render;
