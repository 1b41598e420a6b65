// src/tests/recordstore_tests.rs

//! Tests for `store/recordstore.rs`.

#![allow(non_snake_case)]

use crate::data::cursor::Cursor;
use crate::data::datetime::TimeZone;
use crate::data::mail::MailRecord;
use crate::tests::common::{new_store, TZ_UTC};

// -------------------------------------------------------------------------------------------------

/// helper: a `MailRecord` with every field populated
fn record_full(queue_id: &str) -> MailRecord {
    MailRecord {
        queue_id: String::from(queue_id),
        dt: Some(TZ_UTC.with_ymd_and_hms(2024, 6, 1, 12, 0, 1).unwrap()),
        message_id: Some(String::from("20240601120001.GA2428@example.org")),
        email_to: Some(String::from("alice@example.com")),
        email_from: Some(String::from("bob@example.org")),
        status: Some(String::from("sent")),
        status_detail: Some(String::from("250 OK")),
        log_text: String::from("line one\nline two"),
    }
}

// -------------------------------------------------------------------------------------------------

#[test]
fn test_cursor_advanced() {
    let cursor = Cursor::new("postfix.log");
    assert_eq!(cursor.line_index, 0);
    assert_eq!(cursor.byte_offset, 0);
    let cursor2 = cursor.advanced(1, 62);
    assert_eq!(cursor2.source_name, "postfix.log");
    assert_eq!(cursor2.line_index, 1);
    assert_eq!(cursor2.byte_offset, 62);
    // the prior value is unchanged
    assert_eq!(cursor.byte_offset, 0);
}

#[test]
fn test_get_cursor_unseen_is_None() {
    let store = new_store();
    let cursor_opt = store.get_cursor("never-seen").unwrap();
    assert_eq!(cursor_opt, None);
}

#[test]
fn test_upsert_cursor_roundtrip() {
    let store = new_store();
    let cursor = Cursor::new("postfix.log").advanced(3, 180);
    store.upsert_cursor(&cursor).unwrap();
    let got = store.get_cursor("postfix.log").unwrap();
    assert_eq!(got, Some(cursor.clone()));

    // updating the same source replaces, not duplicates
    let cursor2 = cursor.advanced(4, 266);
    store.upsert_cursor(&cursor2).unwrap();
    let got = store.get_cursor("postfix.log").unwrap();
    assert_eq!(got, Some(cursor2));
}

#[test]
fn test_cursors_keyed_per_source() {
    let store = new_store();
    store.upsert_cursor(&Cursor::new("a.log").advanced(1, 10)).unwrap();
    store.upsert_cursor(&Cursor::new("b.log").advanced(9, 900)).unwrap();
    assert_eq!(store.get_cursor("a.log").unwrap().unwrap().byte_offset, 10);
    assert_eq!(store.get_cursor("b.log").unwrap().unwrap().byte_offset, 900);
}

#[test]
fn test_get_transaction_unseen_is_None() {
    let store = new_store();
    let record_opt = store.get_transaction("ABCDEF0").unwrap();
    assert_eq!(record_opt, None);
}

#[test]
fn test_upsert_transaction_roundtrip() {
    let store = new_store();
    let record = record_full("9C13E3F5A1");
    store.upsert_transaction(&record).unwrap();
    let got = store.get_transaction("9C13E3F5A1").unwrap();
    assert_eq!(got, Some(record));
}

#[test]
fn test_upsert_transaction_optional_fields_None_roundtrip() {
    let store = new_store();
    let record = MailRecord {
        queue_id: String::from("ABCDEF0"),
        dt: None,
        message_id: None,
        email_to: None,
        email_from: None,
        status: None,
        status_detail: None,
        log_text: String::from("only line"),
    };
    store.upsert_transaction(&record).unwrap();
    let got = store.get_transaction("ABCDEF0").unwrap();
    assert_eq!(got, Some(record));
}

#[test]
fn test_upsert_transaction_replaces_not_duplicates() {
    let store = new_store();
    let record = record_full("9C13E3F5A1");
    store.upsert_transaction(&record).unwrap();
    let mut record2 = record.clone();
    record2.status = Some(String::from("bounced"));
    store.upsert_transaction(&record2).unwrap();
    assert_eq!(store.transactions_count().unwrap(), 1);
    let got = store.get_transaction("9C13E3F5A1").unwrap().unwrap();
    assert_eq!(got.status.as_deref(), Some("bounced"));
}

#[test]
fn test_commit_line_cursor_only() {
    let mut store = new_store();
    let cursor = Cursor::new("postfix.log").advanced(1, 62);
    store.commit_line(None, &cursor).unwrap();
    assert_eq!(store.get_cursor("postfix.log").unwrap(), Some(cursor));
    assert_eq!(store.transactions_count().unwrap(), 0);
}

#[test]
fn test_commit_line_record_and_cursor_together() {
    let mut store = new_store();
    let record = record_full("9C13E3F5A1");
    let cursor = Cursor::new("postfix.log").advanced(1, 62);
    store.commit_line(Some(&record), &cursor).unwrap();
    assert_eq!(store.get_cursor("postfix.log").unwrap(), Some(cursor));
    assert_eq!(store.get_transaction("9C13E3F5A1").unwrap(), Some(record));
}
