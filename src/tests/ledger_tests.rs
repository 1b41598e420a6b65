// src/tests/ledger_tests.rs

//! Tests for `store/ledger.rs`.

#![allow(non_snake_case)]

use crate::data::cursor::Cursor;
use crate::data::fields::{line_to_fieldset, FieldSet};
use crate::store::ledger::TransactionLedger;
use crate::tests::common::{
    new_store,
    LINE_STATUS,
    LINE_TO,
    TZ_UTC,
    YEAR_2024,
};

// -------------------------------------------------------------------------------------------------

/// helper: extract from `line`
fn fieldset(line: &str) -> FieldSet {
    line_to_fieldset(line, YEAR_2024, &TZ_UTC)
}

// -------------------------------------------------------------------------------------------------

#[test]
fn test_merge_creates_then_merges() {
    let mut store = new_store();
    let mut ledger = TransactionLedger::new();
    let cursor = Cursor::new("postfix.log");

    let fields1 = fieldset(LINE_TO);
    let record1 = ledger
        .merge(&store, "ABCDEF0", &fields1, LINE_TO)
        .unwrap();
    assert_eq!(record1.email_to.as_deref(), Some("a@x.com"));
    assert_eq!(record1.status, None);
    store
        .commit_line(Some(&record1), &cursor.advanced(1, 62))
        .unwrap();
    ledger.committed(&record1);

    let fields2 = fieldset(LINE_STATUS);
    let record2 = ledger
        .merge(&store, "ABCDEF0", &fields2, LINE_STATUS)
        .unwrap();
    assert_eq!(record2.email_to.as_deref(), Some("a@x.com"));
    assert_eq!(record2.status.as_deref(), Some("sent"));

    let summary = ledger.summary();
    assert_eq!(summary.records_created, 1);
    assert_eq!(summary.records_merged, 1);
    // the first lookup missed, the second hit the cache
    assert_eq!(summary.cache_miss, 1);
    assert_eq!(summary.cache_hit, 1);
    assert_eq!(summary.cache_put, 1);
}

#[test]
fn test_merge_cold_cache_reads_store() {
    // a fresh ledger over a store populated by a prior run still merges
    // into the prior record; this is what makes resumed runs correct
    let mut store = new_store();
    let cursor = Cursor::new("postfix.log");

    let mut ledger1 = TransactionLedger::new();
    let fields1 = fieldset(LINE_TO);
    let record1 = ledger1
        .merge(&store, "ABCDEF0", &fields1, LINE_TO)
        .unwrap();
    store
        .commit_line(Some(&record1), &cursor.advanced(1, 62))
        .unwrap();
    ledger1.committed(&record1);
    drop(ledger1);

    let mut ledger2 = TransactionLedger::new();
    let fields2 = fieldset(LINE_STATUS);
    let record2 = ledger2
        .merge(&store, "ABCDEF0", &fields2, LINE_STATUS)
        .unwrap();
    assert_eq!(record2.email_to.as_deref(), Some("a@x.com"));
    assert_eq!(record2.status.as_deref(), Some("sent"));
    let expect_log_text = format!("{}\n{}", LINE_TO, LINE_STATUS);
    assert_eq!(record2.log_text, expect_log_text);

    let summary = ledger2.summary();
    assert_eq!(summary.records_created, 0);
    assert_eq!(summary.records_merged, 1);
    assert_eq!(summary.cache_hit, 0);
    assert_eq!(summary.cache_miss, 1);
}

#[test]
fn test_merge_uncommitted_is_not_cached() {
    // a merge result never committed must not be visible to the next
    // merge; the cache stays consistent with durable state
    let store = new_store();
    let mut ledger = TransactionLedger::new();

    let fields1 = fieldset(LINE_TO);
    let _record1 = ledger
        .merge(&store, "ABCDEF0", &fields1, LINE_TO)
        .unwrap();
    // no commit_line(), no committed()

    let fields2 = fieldset(LINE_STATUS);
    let record2 = ledger
        .merge(&store, "ABCDEF0", &fields2, LINE_STATUS)
        .unwrap();
    // the store never saw LINE_TO so record2 is a fresh creation
    assert_eq!(record2.email_to, None);
    assert_eq!(record2.log_text, LINE_STATUS);

    let summary = ledger.summary();
    assert_eq!(summary.records_created, 2);
    assert_eq!(summary.records_merged, 0);
    assert_eq!(summary.cache_hit, 0);
    assert_eq!(summary.cache_miss, 2);
    assert_eq!(summary.cache_put, 0);
}

#[test]
fn test_merge_distinct_queue_ids_distinct_records() {
    let mut store = new_store();
    let mut ledger = TransactionLedger::new();
    let cursor = Cursor::new("postfix.log");

    let line_other: &str =
        "Jun 01 12:00:05 mx1 postfix/smtpd[124]: 1234ABC: from=<carol@example.net>";
    let fields1 = fieldset(LINE_TO);
    let record1 = ledger
        .merge(&store, "ABCDEF0", &fields1, LINE_TO)
        .unwrap();
    store
        .commit_line(Some(&record1), &cursor.advanced(1, 62))
        .unwrap();
    ledger.committed(&record1);

    let fields2 = fieldset(line_other);
    let record2 = ledger
        .merge(&store, "1234ABC", &fields2, line_other)
        .unwrap();
    assert_eq!(record2.queue_id, "1234ABC");
    assert_eq!(record2.email_from.as_deref(), Some("carol@example.net"));
    assert_eq!(record2.email_to, None);

    let summary = ledger.summary();
    assert_eq!(summary.records_created, 2);
    assert_eq!(summary.records_merged, 0);
}
