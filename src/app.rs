// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::acid::{AcidAccordion, AcidProperty};
use crate::dcl::AccessControlState;
use crate::dirty::{Advance, DirtySimState};
use crate::error::{Result, SimError};
use crate::fsm::{Action, TransactionMachine, TransactionState};
use crate::render::Render;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub enum Tab {
    #[default]
    States,
    Acid,
    Dirty,
    Dcl,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::States, Tab::Acid, Tab::Dirty, Tab::Dcl];

    /// Short name used in session files.
    pub fn id(&self) -> &'static str {
        match self {
            Tab::States => "states",
            Tab::Acid => "acid",
            Tab::Dirty => "dirty",
            Tab::Dcl => "dcl",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::States => "Transaction States",
            Tab::Acid => "ACID Properties",
            Tab::Dirty => "Dirty Read Scenario",
            Tab::Dcl => "GRANT & REVOKE",
        }
    }
}

impl Display for Tab {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Tab {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Tab::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| SimError::UnknownTab(s.to_string()))
    }
}

/// A discrete user intent, as produced by a click or a line in a session file.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Command {
    SelectTab(Tab),
    Fsm(Action),
    FsmReset,
    DirtyNext,
    DirtyReset,
    Grant,
    Revoke,
    Select,
    ToggleAcid(AcidProperty),
    /// Only asks the host to display the active tab.
    Show,
}

impl Command {
    /// The tab whose state this command changes.
    pub fn tab(&self) -> Option<Tab> {
        match self {
            Command::SelectTab(tab) => Some(*tab),
            Command::Fsm(_) | Command::FsmReset => Some(Tab::States),
            Command::DirtyNext | Command::DirtyReset => Some(Tab::Dirty),
            Command::Grant | Command::Revoke | Command::Select => Some(Tab::Dcl),
            Command::ToggleAcid(_) => Some(Tab::Acid),
            Command::Show => None,
        }
    }
}

/// Holds the latest state of every simulator. Commands are applied one at a time in the order
/// they arrive.
#[derive(Debug, Clone, Default)]
pub struct App {
    tab: Tab,
    machine: TransactionMachine,
    dirty: DirtySimState,
    access: AccessControlState,
    acid: AcidAccordion,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn machine(&self) -> &TransactionMachine {
        &self.machine
    }

    pub fn dirty(&self) -> &DirtySimState {
        &self.dirty
    }

    pub fn access(&self) -> &AccessControlState {
        &self.access
    }

    pub fn acid(&self) -> &AcidAccordion {
        &self.acid
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn begin_transaction_fsm(&mut self, action: Action) -> Result<TransactionState> {
        self.machine.apply(action)
    }

    pub fn reset_fsm(&mut self) {
        self.machine.reset();
    }

    pub fn advance_dirty_script(&mut self) -> Advance {
        self.dirty.advance()
    }

    pub fn reset_dirty_script(&mut self) {
        self.dirty.reset();
    }

    pub fn grant_access(&mut self) {
        self.access = self.access.grant();
    }

    pub fn revoke_access(&mut self) {
        self.access = self.access.revoke();
    }

    pub fn attempt_query(&mut self) {
        self.access = self.access.attempt_query();
    }

    pub fn toggle_acid(&mut self, property: AcidProperty) {
        self.acid.toggle(property);
    }

    /// Applies `cmd` and switches to the tab it targets. A rejected transition leaves every
    /// state, including the active tab, as it was.
    pub fn execute(&mut self, cmd: &Command) -> Result<()> {
        match *cmd {
            Command::SelectTab(_) | Command::Show => {}
            Command::Fsm(action) => {
                self.begin_transaction_fsm(action)?;
            }
            Command::FsmReset => self.reset_fsm(),
            Command::DirtyNext => {
                self.advance_dirty_script();
            }
            Command::DirtyReset => self.reset_dirty_script(),
            Command::Grant => self.grant_access(),
            Command::Revoke => self.revoke_access(),
            Command::Select => self.attempt_query(),
            Command::ToggleAcid(property) => self.toggle_acid(property),
        }
        if let Some(tab) = cmd.tab() {
            self.select_tab(tab);
        }
        Ok(())
    }

    /// Text view of the active tab.
    pub fn render_active(&self) -> String {
        let body = match self.tab {
            Tab::States => self.machine.render_to_str(),
            Tab::Acid => self.acid.render_to_str(),
            Tab::Dirty => self.dirty.render_to_str(),
            Tab::Dcl => self.access.render_to_str(),
        };
        format!("== {} ==\n{body}", self.tab)
    }
}
