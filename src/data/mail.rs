// src/data/mail.rs

//! Implements a [`MailRecord`], the aggregation of every log line sharing
//! one postfix queue id; one mail transaction.
//!
//! [`MailRecord`]: self::MailRecord

use crate::data::datetime::DateTimeLOpt;
use crate::data::fields::FieldSet;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MailRecord
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One mail transaction, keyed by `queue_id`, accumulated from every
/// contributing log line.
///
/// `log_text` is the newline-joined accumulation of all contributing raw
/// lines; append-only, never reordered. Every other field holds the most
/// recent non-empty value observed across contributing lines; an absent
/// extraction never clears a field (see [`merged_with`]).
///
/// A `MailRecord` is an immutable value. Merging produces a new record.
/// Once created for a queue id a record is never deleted.
///
/// [`merged_with`]: MailRecord#method.merged_with
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MailRecord {
    pub queue_id: String,
    pub dt: DateTimeLOpt,
    pub message_id: Option<String>,
    pub email_to: Option<String>,
    pub email_from: Option<String>,
    pub status: Option<String>,
    pub status_detail: Option<String>,
    pub log_text: String,
}

impl MailRecord {
    /// A new `MailRecord` seeded from the first contributing line.
    pub fn new(
        queue_id: &str,
        fields: &FieldSet,
        raw_line: &str,
    ) -> MailRecord {
        MailRecord {
            queue_id: String::from(queue_id),
            dt: fields.dt,
            message_id: fields.message_id.clone(),
            email_to: fields.email_to.clone(),
            email_from: fields.email_from.clone(),
            status: fields.status.clone(),
            status_detail: fields.status_detail.clone(),
            log_text: String::from(raw_line),
        }
    }

    /// New `MailRecord` combining `self` with fields extracted from one
    /// more contributing line.
    ///
    /// Last-write-wins-per-field with null-safety: a field is overwritten
    /// only when the new extraction is present, else the prior value is
    /// retained. Not whole-record replacement.
    ///
    /// `raw_line` is appended to `log_text`, newline-separated. An empty
    /// prior `log_text` is set directly so no spurious leading newline is
    /// prepended.
    ///
    /// Re-applying an already-applied line yields the same field state
    /// plus one duplicated `log_text` line. Deduplication is not done
    /// here; exactly-once delivery is the [`Cursor`]'s job.
    ///
    /// [`Cursor`]: crate::data::cursor::Cursor
    pub fn merged_with(
        &self,
        fields: &FieldSet,
        raw_line: &str,
    ) -> MailRecord {
        let log_text: String = match self.log_text.is_empty() {
            true => String::from(raw_line),
            false => format!("{}\n{}", self.log_text, raw_line),
        };

        MailRecord {
            queue_id: self.queue_id.clone(),
            dt: fields.dt.or(self.dt),
            message_id: fields.message_id.clone().or_else(|| self.message_id.clone()),
            email_to: fields.email_to.clone().or_else(|| self.email_to.clone()),
            email_from: fields.email_from.clone().or_else(|| self.email_from.clone()),
            status: fields.status.clone().or_else(|| self.status.clone()),
            status_detail: fields.status_detail.clone().or_else(|| self.status_detail.clone()),
            log_text,
        }
    }
}
