// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

//! Plain text views of the simulator states.

use crate::acid::{AcidAccordion, AcidProperty};
use crate::dcl::{
    rows_json, AccessControlState, QueryAttempt, GRANT_SQL, REVOKE_SQL, SELECT_SQL, TABLE, USER,
};
use crate::dirty::{DirtySimState, TxId, TxView};
use crate::fsm::{describe, TransactionMachine, TransactionState};
use std::io::Write;

pub trait Render {
    fn render<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;
    fn render_to_str(&self) -> String {
        let mut buf = Vec::new();
        self.render(&mut buf).expect("Failed to write to string!");
        String::from_utf8(buf).expect("Failed to read string we wrote!")
    }
}

const HAPPY_PATH: [TransactionState; 3] = [
    TransactionState::Active,
    TransactionState::PartiallyCommitted,
    TransactionState::Committed,
];
const FAILURE_PATH: [TransactionState; 2] = [TransactionState::Failed, TransactionState::Aborted];

fn render_path<W: Write>(
    writer: &mut W,
    path: &[TransactionState],
    current: TransactionState,
) -> std::io::Result<()> {
    for (ii, state) in path.iter().enumerate() {
        if ii > 0 {
            write!(writer, " -> ")?;
        }
        if *state == current {
            write!(writer, "*{}*", state.label())?;
        } else {
            write!(writer, "{}", state.label())?;
        }
    }
    Ok(())
}

fn log_marker(entry: &str) -> &'static str {
    // "Partially Committed" must not count as committed
    if entry.ends_with("State: Committed") {
        "✔"
    } else if entry.ends_with("State: Aborted") {
        "✖"
    } else {
        ">"
    }
}

impl Render for TransactionMachine {
    fn render<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let current = self.state();
        let info = describe(current);
        write!(writer, "Lifecycle: ")?;
        render_path(writer, &HAPPY_PATH, current)?;
        write!(writer, " | on failure: ")?;
        render_path(writer, &FAILURE_PATH, current)?;
        writeln!(writer)?;
        writeln!(writer, "Current State: {}", info.label)?;
        writeln!(writer, "{}", info.description)?;
        write!(writer, "Actions:")?;
        for edge in info.allowed_actions.iter() {
            write!(writer, " [{}]", edge.action)?;
        }
        writeln!(writer)?;
        writeln!(writer, "Transaction Log:")?;
        for entry in self.log() {
            writeln!(writer, "  {} {entry}", log_marker(entry))?;
        }
        Ok(())
    }
}

fn render_balance(balance: Option<i64>) -> String {
    match balance {
        Some(value) => format!("${value}"),
        None => "N/A".to_string(),
    }
}

fn render_tx<W: Write>(writer: &mut W, id: TxId, tx: &TxView) -> std::io::Result<()> {
    writeln!(writer, "Transaction {} ({id})", id.number())?;
    writeln!(writer, "  Status: {}", tx.status)?;
    writeln!(
        writer,
        "  Local View of Balance: {}",
        render_balance(tx.local_balance)
    )?;
    for entry in tx.log.iter() {
        if entry.is_dirty {
            writeln!(writer, "  {} (DIRTY READ!)", entry.text)?;
        } else {
            writeln!(writer, "  {}", entry.text)?;
        }
    }
    Ok(())
}

impl Render for DirtySimState {
    fn render<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        if self.is_finished() {
            writeln!(writer, "Finished")?;
        } else {
            writeln!(writer, "Execute Step {}", self.cursor() + 1)?;
        }
        writeln!(writer, "{}", self.current_description())?;
        write!(writer, "Shared Account Balance: ${}", self.shared_balance())?;
        if self.is_uncommitted() {
            write!(writer, " (UNCOMMITTED)")?;
        }
        writeln!(writer)?;
        render_tx(writer, TxId::T1, self.tx(TxId::T1))?;
        render_tx(writer, TxId::T2, self.tx(TxId::T2))
    }
}

impl Render for QueryAttempt {
    fn render<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            QueryAttempt::None => Ok(()),
            QueryAttempt::Success(rows) => {
                let json = rows_json(rows)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
                writeln!(writer, "Query Result:")?;
                writeln!(writer, "{json}")
            }
            QueryAttempt::Denied(msg) => {
                writeln!(writer, "Query Result:")?;
                writeln!(writer, "{msg}")
            }
        }
    }
}

impl Render for AccessControlState {
    fn render<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let status = if self.granted() { "GRANTED" } else { "REVOKED" };
        writeln!(writer, "Admin (DBA) Control Panel")?;
        writeln!(writer, "  SELECT on {TABLE}: {status}")?;
        writeln!(writer, "  {GRANT_SQL}")?;
        writeln!(writer, "  {REVOKE_SQL}")?;
        writeln!(writer, "User \"{USER}\" Session")?;
        writeln!(writer, "  {SELECT_SQL}")?;
        self.last_attempt().render(writer)
    }
}

impl Render for AcidAccordion {
    fn render<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for property in AcidProperty::ALL {
            let info = property.info();
            let arrow = if self.is_open(property) { "v" } else { ">" };
            writeln!(
                writer,
                "{arrow} {} {} - {}",
                property.letter(),
                info.name,
                info.tagline
            )?;
            if self.is_open(property) {
                writeln!(writer, "    {}", info.description)?;
                for line in info.example.lines() {
                    if line.is_empty() {
                        writeln!(writer)?;
                    } else {
                        writeln!(writer, "    | {line}")?;
                    }
                }
                writeln!(writer, "    {}", info.explanation)?;
            }
        }
        Ok(())
    }
}
