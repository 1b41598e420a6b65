// src/store/mod.rs

//! Persistence for _p3lib_.
//!
//! ## Overview of the store
//!
//! * A [`RecordStore`] holds the two durable tables: `logfile`
//!   ([`Cursor`]s, unique on source name) and `mail` ([`MailRecord`]s,
//!   unique on queue id).
//! * A [`TransactionLedger`] is the merge engine layered over a
//!   `RecordStore`: it resolves a queue id to its current `MailRecord`
//!   and applies the merge rules for one more contributing line.
//!
//! The [`MailLogProcessor`] commits the ledger's merge result and the
//! advanced `Cursor` for one line as ONE atomic unit of work,
//! [`RecordStore::commit_line`]. Partial application (record updated but
//! cursor not, or vice versa) is never observable after a crash.
//!
//! A `RecordStore` is an explicit handle with an open → use → drop
//! lifecycle, passed into the processor. It is never a process-wide
//! singleton.
//!
//! [`RecordStore`]: crate::store::recordstore::RecordStore
//! [`RecordStore::commit_line`]: crate::store::recordstore::RecordStore#method.commit_line
//! [`TransactionLedger`]: crate::store::ledger::TransactionLedger
//! [`Cursor`]: crate::data::cursor::Cursor
//! [`MailRecord`]: crate::data::mail::MailRecord
//! [`MailLogProcessor`]: crate::readers::maillogprocessor::MailLogProcessor

pub mod ledger;
pub mod recordstore;
