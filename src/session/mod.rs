// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

//! Line based command language that drives all simulators, one command per line.

mod parse;

pub use parse::{parse_file, parse_line, parse_str, report_errors, Errors, ParseError};

use crate::app::{App, Command};
use crate::error::SimError;

/// Executes `commands` in order and calls `show` for every `show` command. Rejected
/// transitions are skipped and returned together with the index of the offending command.
pub fn run(
    app: &mut App,
    commands: &[Command],
    mut show: impl FnMut(&App),
) -> Vec<(usize, SimError)> {
    let mut rejected = Vec::new();
    for (ii, cmd) in commands.iter().enumerate() {
        match app.execute(cmd) {
            Ok(()) if *cmd == Command::Show => show(app),
            Ok(()) => {}
            Err(e) => rejected.push((ii, e)),
        }
    }
    rejected
}
