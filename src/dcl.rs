// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

//! GRANT and REVOKE of the SELECT privilege for a single user on a single table.

use serde::Serialize;

pub const USER: &str = "Bob";
pub const TABLE: &str = "Products";

pub const GRANT_SQL: &str = "GRANT SELECT ON Products TO Bob;";
pub const REVOKE_SQL: &str = "REVOKE SELECT ON Products FROM Bob;";
pub const SELECT_SQL: &str = "SELECT * FROM Products;";

pub const ACCESS_DENIED: &str =
    "Error: Access denied. User \"Bob\" does not have SELECT privilege on table \"Products\".";

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: &'static str,
    pub price: u32,
}

pub static PRODUCTS: [Product; 3] = [
    Product {
        id: 1,
        name: "Laptop",
        price: 1200,
    },
    Product {
        id: 2,
        name: "Mouse",
        price: 25,
    },
    Product {
        id: 3,
        name: "Keyboard",
        price: 75,
    },
];

/// `rows` as pretty printed JSON with two space indentation.
pub fn rows_json(rows: &[Product]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

pub fn products_json() -> serde_json::Result<String> {
    rows_json(&PRODUCTS)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum QueryAttempt {
    #[default]
    None,
    Success(&'static [Product]),
    Denied(&'static str),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct AccessControlState {
    granted: bool,
    last_attempt: QueryAttempt,
}

impl AccessControlState {
    pub fn granted(&self) -> bool {
        self.granted
    }

    pub fn last_attempt(&self) -> QueryAttempt {
        self.last_attempt
    }

    pub fn grant(self) -> Self {
        tracing::debug!(target: "txnsim::dcl", user = USER, table = TABLE, "grant select");
        Self {
            granted: true,
            last_attempt: QueryAttempt::None,
        }
    }

    pub fn revoke(self) -> Self {
        tracing::debug!(target: "txnsim::dcl", user = USER, table = TABLE, "revoke select");
        Self {
            granted: false,
            last_attempt: QueryAttempt::None,
        }
    }

    /// Runs `SELECT * FROM Products` as the user.
    pub fn attempt_query(self) -> Self {
        let last_attempt = if self.granted {
            QueryAttempt::Success(&PRODUCTS)
        } else {
            QueryAttempt::Denied(ACCESS_DENIED)
        };
        tracing::debug!(target: "txnsim::dcl", granted = self.granted, "select");
        Self {
            last_attempt,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_privilege() {
        let s = AccessControlState::default();
        assert!(!s.granted());
        assert_eq!(s.last_attempt(), QueryAttempt::None);
        assert_eq!(
            s.attempt_query().last_attempt(),
            QueryAttempt::Denied(ACCESS_DENIED)
        );
    }

    #[test]
    fn grant_then_select() {
        let s = AccessControlState::default().grant().attempt_query();
        let QueryAttempt::Success(rows) = s.last_attempt() else {
            panic!("expected rows, got {:?}", s.last_attempt());
        };
        let summary: Vec<_> = rows.iter().map(|p| (p.id, p.name, p.price)).collect();
        assert_eq!(
            summary,
            [(1, "Laptop", 1200), (2, "Mouse", 25), (3, "Keyboard", 75)]
        );
    }

    #[test]
    fn revoke_then_select() {
        let s = AccessControlState::default()
            .grant()
            .revoke()
            .attempt_query();
        assert_eq!(
            s.last_attempt(),
            QueryAttempt::Denied(
                r#"Error: Access denied. User "Bob" does not have SELECT privilege on table "Products"."#
            )
        );
    }

    #[test]
    fn toggling_clears_last_attempt() {
        let denied = AccessControlState::default().attempt_query();
        assert_eq!(denied.grant().last_attempt(), QueryAttempt::None);
        assert_eq!(denied.revoke().last_attempt(), QueryAttempt::None);
        let ok = denied.grant().attempt_query();
        assert!(matches!(ok.last_attempt(), QueryAttempt::Success(_)));
        assert_eq!(ok.grant().last_attempt(), QueryAttempt::None);
        assert_eq!(ok.revoke().last_attempt(), QueryAttempt::None);
    }

    #[test]
    fn products_as_json() {
        insta::assert_snapshot!(products_json().unwrap(), @r###"
        [
          {
            "id": 1,
            "name": "Laptop",
            "price": 1200
          },
          {
            "id": 2,
            "name": "Mouse",
            "price": 25
          },
          {
            "id": 3,
            "name": "Keyboard",
            "price": 75
          }
        ]
        "###);
    }
}
