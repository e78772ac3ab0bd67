// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

//! Reference text for the four ACID properties and an accordion that shows at most one of them.

use crate::error::SimError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum AcidProperty {
    Atomicity,
    Consistency,
    Isolation,
    Durability,
}

impl AcidProperty {
    pub const ALL: [AcidProperty; 4] = [
        AcidProperty::Atomicity,
        AcidProperty::Consistency,
        AcidProperty::Isolation,
        AcidProperty::Durability,
    ];

    pub fn letter(&self) -> char {
        match self {
            AcidProperty::Atomicity => 'A',
            AcidProperty::Consistency => 'C',
            AcidProperty::Isolation => 'I',
            AcidProperty::Durability => 'D',
        }
    }

    pub fn info(&self) -> &'static AcidInfo {
        match self {
            AcidProperty::Atomicity => &ATOMICITY,
            AcidProperty::Consistency => &CONSISTENCY,
            AcidProperty::Isolation => &ISOLATION,
            AcidProperty::Durability => &DURABILITY,
        }
    }
}

impl Display for AcidProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.info().name)
    }
}

impl FromStr for AcidProperty {
    type Err = SimError;

    /// Accepts the letter or the full name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AcidProperty::ALL
            .into_iter()
            .find(|p| {
                s.eq_ignore_ascii_case(p.info().name)
                    || (s.len() == 1 && s.eq_ignore_ascii_case(&p.letter().to_string()))
            })
            .ok_or_else(|| SimError::UnknownAcidProperty(s.to_string()))
    }
}

#[derive(Debug)]
pub struct AcidInfo {
    pub name: &'static str,
    pub tagline: &'static str,
    pub description: &'static str,
    pub example: &'static str,
    pub explanation: &'static str,
}

pub static ATOMICITY: AcidInfo = AcidInfo {
    name: "Atomicity",
    tagline: "All or nothing.",
    description: "An atomic transaction is an indivisible and irreducible series of database operations such that either all occurs, or nothing occurs. It ensures that any transaction is treated as a single \"unit\" which cannot be partially completed.",
    example: r#"BEGIN TRANSACTION;

-- Step 1: Debit $100 from Alice's account
UPDATE Accounts SET balance = balance - 100 WHERE name = 'Alice';

-- Imagine a system crash happens here!

-- Step 2: Credit $100 to Bob's account
UPDATE Accounts SET balance = balance + 100 WHERE name = 'Bob';

COMMIT;"#,
    explanation: "With atomicity, if the system crashes after step 1, the entire transaction is rolled back. Alice's account is not debited. The database state remains unchanged, preventing inconsistencies.",
};

pub static CONSISTENCY: AcidInfo = AcidInfo {
    name: "Consistency",
    tagline: "Data stays valid.",
    description: "Consistency ensures that a transaction brings the database from one valid state to another. Any data written to the database must be valid according to all defined rules, including constraints, cascades, triggers, and any combination thereof.",
    example: r#"-- Rule: An account balance cannot be negative.
-- Initial State: Alice has $50, Bob has $100.
BEGIN TRANSACTION;

-- Attempt to transfer $70 from Alice to Bob
UPDATE Accounts SET balance = balance - 70 WHERE name = 'Alice'; -- This would make Alice's balance -$20
UPDATE Accounts SET balance = balance + 70 WHERE name = 'Bob';

COMMIT;"#,
    explanation: "With consistency, this transaction would fail and be rolled back because it violates the business rule (balance >= 0). The database state is preserved, remaining consistent.",
};

pub static ISOLATION: AcidInfo = AcidInfo {
    name: "Isolation",
    tagline: "Transactions don’t interfere.",
    description: "Isolation ensures that the concurrent execution of transactions results in a system state that would be obtained if transactions were executed sequentially. Each transaction is in a 'bubble', unaware of other ongoing transactions.",
    example: r#"-- Transaction 1
BEGIN TRANSACTION;
SELECT SUM(balance) FROM Accounts;
-- (sees total: $1500)

-- Meanwhile, Transaction 2 runs
BEGIN TRANSACTION;
UPDATE Accounts SET balance = balance - 100 WHERE name = 'Charlie';
COMMIT;

-- Back to Transaction 1
SELECT SUM(balance) FROM Accounts;
-- (still sees total: $1500, not $1400)
COMMIT;"#,
    explanation: "Because of isolation, T1's view of the database is a consistent snapshot from when it began. It doesn't see T2's uncommitted (or even committed) changes, preventing confusion and ensuring predictable results. The 'Dirty Read' tab demonstrates a failure of isolation.",
};

pub static DURABILITY: AcidInfo = AcidInfo {
    name: "Durability",
    tagline: "Once committed, it stays committed.",
    description: "Durability guarantees that once a transaction has been committed, it will remain so, even in the event of power loss, crashes, or errors. In a relational database, for instance, once a group of SQL statements execute, the results need to be stored permanently.",
    example: r#"BEGIN TRANSACTION;

-- Register a new user
INSERT INTO Users (username, password_hash) VALUES ('dave', 'xyz123');

COMMIT; -- This call blocks until the data is written to permanent storage (e.g., disk)."#,
    explanation: "After the COMMIT returns success, the new user 'dave' is guaranteed to exist in the database, even if the server loses power a millisecond later. This is typically achieved through mechanisms like write-ahead logging.",
};

/// Which property is expanded. Atomicity starts out open.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AcidAccordion {
    open: Option<AcidProperty>,
}

impl Default for AcidAccordion {
    fn default() -> Self {
        Self {
            open: Some(AcidProperty::Atomicity),
        }
    }
}

impl AcidAccordion {
    pub fn open(&self) -> Option<AcidProperty> {
        self.open
    }

    pub fn is_open(&self, property: AcidProperty) -> bool {
        self.open == Some(property)
    }

    /// Closes `property` if it is open, otherwise opens it in place of the current one.
    pub fn toggle(&mut self, property: AcidProperty) {
        self.open = if self.is_open(property) {
            None
        } else {
            Some(property)
        };
    }
}
