// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use txnsim::dirty::TxId;
use txnsim::fsm::TransactionState;
use txnsim::{session, App, Render, Tab};

fn replay(filename: &str) -> (App, Vec<String>) {
    let commands = session::parse_file(filename)
        .expect("failed to read session")
        .expect("failed to parse session");
    let mut app = App::new();
    let mut shown = Vec::new();
    let rejected = session::run(&mut app, &commands, |app| shown.push(app.render_active()));
    assert!(rejected.is_empty(), "{rejected:?}");
    (app, shown)
}

#[test]
fn replay_lifecycle() {
    let (app, shown) = replay("inputs/sessions/lifecycle.session");
    assert_eq!(app.tab(), Tab::States);
    assert_eq!(app.machine().state(), TransactionState::Idle);
    assert_eq!(shown.len(), 2);
    insta::assert_snapshot!(shown[0].trim_end(), @r###"
    == Transaction States ==
    Lifecycle: Active -> Partially Committed -> Committed | on failure: Failed -> *Aborted*
    Current State: Aborted
    The transaction has been rolled back. The database is restored to its state before the transaction began.
    Actions: [Start New]
    Transaction Log:
      > Simulator initialized.
      > Action: "Begin Transaction" -> State: Active
      > Action: "Execute Operation" -> State: Active
      > Action: "End Transaction" -> State: Partially Committed
      > Action: "Simulate Failure" -> State: Failed
      ✖ Action: "Rollback" -> State: Aborted
    "###);
    assert!(shown[1].ends_with("Transaction Log:\n  > Simulator reset.\n"));
}

#[test]
fn replay_dirty_read() {
    let (app, shown) = replay("inputs/sessions/dirty_read.session");
    assert_eq!(app.tab(), Tab::Dirty);
    assert!(shown[0].contains("Shared Account Balance: $900 (UNCOMMITTED)\n"));
    assert!(shown[0].contains("  [Step 6] READ (DIRTY READ!)\n"));
    assert_eq!(app.dirty().shared_balance(), 1000);
    assert_eq!(app.dirty().tx(TxId::T2).local_balance, Some(900));
    insta::assert_snapshot!(shown[1].trim_end(), @r###"
    == Dirty Read Scenario ==
    Finished
    Simulation finished. T2 has used inconsistent data.
    Shared Account Balance: $1000
    Transaction 1 (T1)
      Status: Rolled Back
      Local View of Balance: $900
      [Step 1] BEGIN TRANSACTION
      [Step 2] READ
      [Step 3] UPDATE_LOCAL
      [Step 4] WRITE
      [Step 7] ROLLBACK
    Transaction 2 (T2)
      Status: Committed
      Local View of Balance: $900
      [Step 5] BEGIN TRANSACTION
      [Step 6] READ (DIRTY READ!)
      [Step 8] USE_VALUE
    "###);
}

#[test]
fn replay_grant_revoke() {
    let (app, shown) = replay("inputs/sessions/grant_revoke.session");
    assert!(!app.access().granted());
    assert!(shown[0].contains("  SELECT on Products: GRANTED\n"));
    assert!(shown[0].contains("  SELECT * FROM Products;\nQuery Result:\n[\n"));
    assert!(shown[0].contains("\"name\": \"Keyboard\""));
    insta::assert_snapshot!(shown[1].trim_end(), @r###"
    == GRANT & REVOKE ==
    Admin (DBA) Control Panel
      SELECT on Products: REVOKED
      GRANT SELECT ON Products TO Bob;
      REVOKE SELECT ON Products FROM Bob;
    User "Bob" Session
      SELECT * FROM Products;
    Query Result:
    Error: Access denied. User "Bob" does not have SELECT privilege on table "Products".
    "###);
}

#[test]
fn typos_are_reported_together() {
    let source = std::fs::read_to_string("inputs/sessions/typos.session").unwrap();
    let errors = session::parse_str(&source).unwrap_err();
    let words: Vec<_> = errors.iter().map(|e| &source[e.start..e.end]).collect();
    assert_eq!(words, ["Comit", "nxt", "tabb"]);
    assert_eq!(errors[1].explain, "did you mean: next?");
    // the session is not executed at all
    assert_eq!(session::parse_file("inputs/sessions/typos.session").unwrap(), None);
}

#[test]
fn rejected_commands_are_skipped() {
    let commands = session::parse_str("fsm Commit\nfsm Begin Transaction\nfsm Rollback\n").unwrap();
    let mut app = App::new();
    let rejected = session::run(&mut app, &commands, |_| {});
    let indices: Vec<_> = rejected.iter().map(|(ii, _)| *ii).collect();
    assert_eq!(indices, [0, 2]);
    assert_eq!(app.machine().state(), TransactionState::Active);
    assert_eq!(app.machine().render_to_str().lines().count(), 7);
}
