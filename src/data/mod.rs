// src/data/mod.rs

//! The `data` module is specialized data containers for
//! [`LogLine`]s, [`FieldSet`]s, [`MailRecord`]s, and [`Cursor`]s.
//!
//! ## Definitions of data
//!
//! ### LogLine
//!
//! A "line" is a sequence of bytes in a mail log file that:
//!
//! * begin after a prior "line" or the beginning of a file.
//! * end with a newline character `'\n'` or the end of a file.
//!
//! A "line" is represented by a [`LogLine`] and found by a [`LineReader`].
//!
//! ### FieldSet
//!
//! A [`FieldSet`] is the independently-optional structured fields extracted
//! from one `LogLine`: the postfix queue id, a datetime stamp, sender and
//! recipient addresses, a message id, and a delivery status.
//! A `LogLine` whose `FieldSet` has no queue id is not part of any mail
//! transaction.
//!
//! ### MailRecord
//!
//! A [`MailRecord`] is the evolving aggregation of every `FieldSet`
//! extracted from `LogLine`s sharing one postfix queue id; one mail
//! transaction. `MailRecord`s are merged by a [`TransactionLedger`] and
//! persisted by a [`RecordStore`].
//!
//! ### Cursor
//!
//! A [`Cursor`] is the durable (line index, byte offset) pair marking how
//! much of a log source has been consumed. A `Cursor` is what makes
//! repeated runs of the [`MailLogProcessor`] never process a byte twice.
//!
//! Also see [_Overview of readers_].
//!
//! [_Overview of readers_]: crate::readers
//! [`LogLine`]: crate::data::line::LogLine
//! [`FieldSet`]: crate::data::fields::FieldSet
//! [`MailRecord`]: crate::data::mail::MailRecord
//! [`Cursor`]: crate::data::cursor::Cursor
//! [`LineReader`]: crate::readers::linereader::LineReader
//! [`TransactionLedger`]: crate::store::ledger::TransactionLedger
//! [`RecordStore`]: crate::store::recordstore::RecordStore
//! [`MailLogProcessor`]: crate::readers::maillogprocessor::MailLogProcessor

pub mod cursor;
pub mod datetime;
pub mod fields;
pub mod line;
pub mod mail;
