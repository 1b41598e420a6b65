// src/readers/maillogprocessor.rs

//! Implements a [`MailLogProcessor`], the driver of the processing stages
//! for one mail log file using a [`LineReader`].
//!
//! A "mail log" file in this context is the line-oriented log written by
//! the postfix mail transfer agent. Multiple log lines belonging to one
//! mail transaction (sharing a postfix queue id) are correlated into a
//! single evolving [`MailRecord`].
//!
//! The two guarantees a `MailLogProcessor` run provides:
//! 1. no byte of the log source is ever processed twice across runs
//!    (the [`Cursor`] advances atomically with each line's effects)
//! 2. interrupting a run loses at most the one uncommitted line, which
//!    the next run re-reads and safely re-merges
//!
//! This is a _p3lib_ structure used by the binary program _p3_.
//!
//! [`LineReader`]: crate::readers::linereader::LineReader
//! [`MailLogProcessor`]: self::MailLogProcessor
//! [`MailRecord`]: crate::data::mail::MailRecord
//! [`Cursor`]: crate::data::cursor::Cursor

use crate::common::{Count, FPath};
use crate::data::cursor::Cursor;
use crate::data::fields::{line_to_fieldset, FieldSet};
use crate::data::line::LogLine;
use crate::data::mail::MailRecord;
use crate::data::datetime::{FixedOffset, Year};
use crate::e_wrn;
use crate::readers::linereader::{LineReader, ResultS3LineFind};
use crate::readers::summary::Summary;
use crate::store::ledger::TransactionLedger;
use crate::store::recordstore::{RecordStore, StoreError};

use std::fmt;

use ::more_asserts::debug_assert_le;
use ::si_trace_print::{defn, defo, defx, defñ};
use ::thiserror::Error;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MailLogProcessor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Enum for the [`MailLogProcessor`] processing stages. Each run advances
/// through these stages in order.
///
/// [`MailLogProcessor`]: self::MailLogProcessor
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ProcessingStage {
    /// Does the file exist and can it be opened for reading?
    /// A missing or unreadable file is fatal, the cursor untouched.
    Stage0Open,
    /// Load the stored [`Cursor`] and position the [`LineReader`] at its
    /// `byte_offset`. A stored offset beyond the current file size means
    /// the source was truncated or rotated externally; the recovery
    /// policy is to warn and restart from offset zero.
    ///
    /// [`Cursor`]: crate::data::cursor::Cursor
    /// [`LineReader`]: crate::readers::linereader::LineReader
    Stage1Seek,
    /// Read lines sequentially: extract a [`FieldSet`] from each, merge
    /// transaction lines through the [`TransactionLedger`], and commit
    /// each line's effects together with the advanced `Cursor` as one
    /// atomic unit of work.
    ///
    /// [`FieldSet`]: crate::data::fields::FieldSet
    /// [`TransactionLedger`]: crate::store::ledger::TransactionLedger
    Stage2StreamLines,
    /// End of file was reached; the run completed (terminal, successful).
    Stage3Eof,
}

/// Errors aborting a [`MailLogProcessor`] run. All failures surface to
/// the invoker; none are swallowed and none are retried within a run.
/// Re-invocation is the natural retry mechanism, safe due to
/// resumability and the idempotent merge.
///
/// A line failing all field extraction is NOT an error; it is not a
/// transaction line and is skipped with only a cursor advance.
///
/// [`MailLogProcessor`]: self::MailLogProcessor
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The log source is missing or unreadable at open.
    /// Fatal; the cursor is untouched.
    #[error("source unavailable {path:?}: {source}")]
    SourceUnavailable {
        path: FPath,
        source: std::io::Error,
    },

    /// The persistence layer failed; no partial commit occurred.
    #[error("store unavailable: {0}")]
    Store(#[from] StoreError),

    /// Unexpected I/O failure reading a line mid-run. The cursor remains
    /// at its last committed position; the next run resumes correctly.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// The `MailLogProcessor` uses a [`LineReader`] to find [`LogLine`s] in a
/// mail log file, a [`TransactionLedger`] to merge them into
/// [`MailRecord`]s, and a [`RecordStore`] to durably commit each line's
/// effects atomically with the advancing [`Cursor`].
///
/// A `MailLogProcessor` has knowledge of:
/// - the different stages of processing a mail log file
/// - the recovery policy for a log file truncated between runs
/// - the year and timezone completing the log's year-less datetime stamps
///
/// Processing is single-threaded and strictly sequential; lines are
/// consumed and committed one at a time in file order.
///
/// [`LogLine`s]: crate::data::line::LogLine
/// [`LineReader`]: crate::readers::linereader::LineReader
/// [`TransactionLedger`]: crate::store::ledger::TransactionLedger
/// [`MailRecord`]: crate::data::mail::MailRecord
/// [`RecordStore`]: crate::store::recordstore::RecordStore
/// [`Cursor`]: crate::data::cursor::Cursor
pub struct MailLogProcessor {
    linereader: LineReader,
    ledger: TransactionLedger,
    /// Current `ProcessingStage`.
    processingstage: ProcessingStage,
    /// Logical source name; the durable cursor key, decoupled from the
    /// file path.
    source_name: String,
    /// Year completing the log's year-less datetime stamps.
    year: Year,
    /// `FixedOffset` timezone for the log's timezone-less datetime stamps.
    tz_offset: FixedOffset,
    /// `Count` of lines with no extractable queue id.
    lines_skipped: Count,
}

impl fmt::Debug for MailLogProcessor {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("MailLogProcessor")
            .field("linereader", &self.linereader)
            .field("processingstage", &self.processingstage)
            .field("source_name", &self.source_name)
            .field("year", &self.year)
            .field("tz_offset", &self.tz_offset)
            .finish()
    }
}

impl MailLogProcessor {
    /// Create a new `MailLogProcessor`; opens the file at `path`
    /// (`Stage0Open`).
    pub fn new(
        path: FPath,
        source_name: String,
        year: Year,
        tz_offset: FixedOffset,
    ) -> Result<MailLogProcessor, ProcessError> {
        defn!("({:?}, {:?}, {:?}, {:?})", path, source_name, year, tz_offset);
        let linereader: LineReader = match LineReader::new(path.clone()) {
            Ok(val) => val,
            Err(err) => {
                defx!("LineReader::new Err {}", err);
                return Err(ProcessError::SourceUnavailable { path, source: err });
            }
        };
        defx!();
        Ok(MailLogProcessor {
            linereader,
            ledger: TransactionLedger::new(),
            processingstage: ProcessingStage::Stage0Open,
            source_name,
            year,
            tz_offset,
            lines_skipped: 0,
        })
    }

    /// See [`LineReader::path`].
    ///
    /// [`LineReader::path`]: crate::readers::linereader::LineReader#method.path
    #[inline(always)]
    pub const fn path(&self) -> &FPath {
        self.linereader.path()
    }

    /// Current `ProcessingStage`.
    #[inline(always)]
    pub const fn processingstage(&self) -> ProcessingStage {
        self.processingstage
    }

    /// Set the current `ProcessingStage`. Stages only advance.
    fn set_stage(
        &mut self,
        stage: ProcessingStage,
    ) {
        defñ!("{:?} → {:?}", self.processingstage, stage);
        debug_assert_le!(
            self.processingstage,
            stage,
            "stage {:?} cannot go back to stage {:?}",
            self.processingstage,
            stage,
        );
        self.processingstage = stage;
    }

    /// Load the stored [`Cursor`] for this source, applying the
    /// truncation recovery policy, and position the [`LineReader`]
    /// (`Stage1Seek`).
    ///
    /// [`Cursor`]: crate::data::cursor::Cursor
    /// [`LineReader`]: crate::readers::linereader::LineReader
    fn seek_to_cursor(
        &mut self,
        store: &RecordStore,
    ) -> Result<Cursor, ProcessError> {
        defn!();
        let mut cursor: Cursor = match store.get_cursor(&self.source_name)? {
            Some(val) => {
                defo!("stored cursor {:?}", val);
                val
            }
            None => {
                defo!("source {:?} not seen before", self.source_name);
                Cursor::new(&self.source_name)
            }
        };
        if cursor.byte_offset > self.linereader.filesz() {
            // the file shrank since the cursor was committed; it was
            // truncated or rotated externally
            e_wrn!(
                "source {:?} byte offset {} is past file size {}; file was truncated? restarting from offset zero",
                self.source_name,
                cursor.byte_offset,
                self.linereader.filesz(),
            );
            cursor = Cursor::new(&self.source_name);
        }
        self.linereader
            .seek(cursor.byte_offset, cursor.line_index)?;
        defx!("{:?}", cursor);
        Ok(cursor)
    }

    /// Process the mail log file from the stored resume position to end
    /// of file, committing each line's effects atomically.
    ///
    /// One call per `MailLogProcessor`; drives stages `Stage1Seek`
    /// through `Stage3Eof`.
    pub fn process(
        &mut self,
        store: &mut RecordStore,
    ) -> Result<Summary, ProcessError> {
        defn!("({:?})", self.source_name);
        self.set_stage(ProcessingStage::Stage1Seek);
        let mut cursor: Cursor = self.seek_to_cursor(store)?;

        self.set_stage(ProcessingStage::Stage2StreamLines);
        loop {
            let logline: LogLine = match self.linereader.find_line() {
                ResultS3LineFind::Found(val) => val,
                ResultS3LineFind::Done => {
                    defo!("EOF");
                    break;
                }
                ResultS3LineFind::Err(err) => {
                    defx!("find_line Err {}", err);
                    return Err(ProcessError::Io(err));
                }
            };
            let text: String = logline.text();
            let fields: FieldSet = line_to_fieldset(&text, self.year, &self.tz_offset);
            let cursor_next: Cursor = cursor.advanced(
                logline.lineindex() + 1,
                logline.fileoffset_end(),
            );
            match fields.queue_id.as_deref() {
                None => {
                    // not a transaction line; advance the cursor, touch
                    // no record
                    self.lines_skipped += 1;
                    defo!("line {} skipped", logline.lineindex());
                    store.commit_line(None, &cursor_next)?;
                }
                Some(queue_id) => {
                    let record: MailRecord =
                        self.ledger
                            .merge(store, queue_id, &fields, &text)?;
                    store.commit_line(Some(&record), &cursor_next)?;
                    self.ledger.committed(&record);
                    defo!("line {} merged into {:?}", logline.lineindex(), queue_id);
                }
            }
            cursor = cursor_next;
        }

        self.set_stage(ProcessingStage::Stage3Eof);
        let summary: Summary = self.summary();
        defx!("{:?}", summary);
        Ok(summary)
    }

    /// Statistics about this run.
    pub fn summary(&self) -> Summary {
        Summary {
            path: self.linereader.path().clone(),
            source_name: self.source_name.clone(),
            summarylinereader: self.linereader.summary(),
            summaryledger: self.ledger.summary(),
            lines_skipped: self.lines_skipped,
        }
    }
}
