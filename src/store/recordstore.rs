// src/store/recordstore.rs

//! Implements a [`RecordStore`], SQLite-backed persistence for
//! [`Cursor`]s and [`MailRecord`]s.
//!
//! [`RecordStore`]: self::RecordStore
//! [`Cursor`]: crate::data::cursor::Cursor
//! [`MailRecord`]: crate::data::mail::MailRecord

#[cfg(test)]
use crate::common::Count;
use crate::common::FPath;
use crate::data::cursor::Cursor;
use crate::data::datetime::DateTimeL;
use crate::data::mail::MailRecord;

use ::rusqlite::{params, Connection, OptionalExtension};
use ::si_trace_print::{defn, defo, defx, defñ};
use ::thiserror::Error;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// StoreError
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Errors from [`RecordStore`] operations.
///
/// [`RecordStore`]: self::RecordStore
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] ::rusqlite::Error),

    /// I/O error during database operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RecordStore
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Schema embedded at compile time.
///
/// Table `logfile` holds one row per log source ([`Cursor`]); table
/// `mail` holds one row per mail transaction ([`MailRecord`]).
///
/// [`Cursor`]: crate::data::cursor::Cursor
/// [`MailRecord`]: crate::data::mail::MailRecord
const SCHEMA_SQL: &str = "\
CREATE TABLE IF NOT EXISTS logfile (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_name TEXT UNIQUE NOT NULL,
    line_index INTEGER NOT NULL,
    byte_offset INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS mail (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    queue_id TEXT UNIQUE NOT NULL,
    dt TEXT,
    message_id TEXT,
    email_to TEXT,
    email_from TEXT,
    status TEXT,
    status_detail TEXT,
    log_text TEXT NOT NULL
);
";

/// SQLite-backed store of [`Cursor`] entries and [`MailRecord`]s.
///
/// An explicit handle with lifecycle open → use → drop; passed into the
/// [`MailLogProcessor`], never a process-wide singleton.
///
/// The store assumes single-writer access; concurrent runs against the
/// same database must be externally serialized.
///
/// [`Cursor`]: crate::data::cursor::Cursor
/// [`MailRecord`]: crate::data::mail::MailRecord
/// [`MailLogProcessor`]: crate::readers::maillogprocessor::MailLogProcessor
pub struct RecordStore {
    conn: Connection,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("conn", &self.conn)
            .finish()
    }
}

impl RecordStore {
    /// Open (creating if necessary) the database at `path`.
    pub fn open(path: &FPath) -> Result<RecordStore, StoreError> {
        defn!("({:?})", path);
        let conn = Connection::open(path)?;
        // WAL keeps the per-line commit cost tolerable on a file database
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::initialize_connection(&conn)?;
        defx!();
        Ok(RecordStore { conn })
    }

    /// Open an in-memory database. For testing.
    pub fn in_memory() -> Result<RecordStore, StoreError> {
        defñ!();
        let conn = Connection::open_in_memory()?;
        Self::initialize_connection(&conn)?;
        Ok(RecordStore { conn })
    }

    fn initialize_connection(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Cursor entries (table `logfile`)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Get the stored [`Cursor`] for `source_name`.
    /// `None` for a previously-unseen source (callers default to
    /// position zero).
    ///
    /// [`Cursor`]: crate::data::cursor::Cursor
    pub fn get_cursor(
        &self,
        source_name: &str,
    ) -> Result<Option<Cursor>, StoreError> {
        defñ!("({:?})", source_name);
        let mut stmt = self.conn.prepare(
            "SELECT line_index, byte_offset FROM logfile WHERE source_name = ?1",
        )?;
        let cursor_opt: Option<Cursor> = stmt
            .query_row(params![source_name], |row| {
                // SQLite stores i64; positions are never negative
                let line_index: i64 = row.get(0)?;
                let byte_offset: i64 = row.get(1)?;
                Ok(Cursor {
                    source_name: String::from(source_name),
                    line_index: line_index as u64,
                    byte_offset: byte_offset as u64,
                })
            })
            .optional()?;
        Ok(cursor_opt)
    }

    /// Durably record `cursor` for its source, inserting or updating.
    pub fn upsert_cursor(
        &self,
        cursor: &Cursor,
    ) -> Result<(), StoreError> {
        defñ!("({:?})", cursor);
        Self::upsert_cursor_conn(&self.conn, cursor)?;
        Ok(())
    }

    fn upsert_cursor_conn(
        conn: &Connection,
        cursor: &Cursor,
    ) -> ::rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO logfile (source_name, line_index, byte_offset)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(source_name) DO UPDATE SET
                 line_index = excluded.line_index,
                 byte_offset = excluded.byte_offset",
            params![
                cursor.source_name,
                cursor.line_index as i64,
                cursor.byte_offset as i64,
            ],
        )?;
        Ok(())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // MailRecords (table `mail`)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Get the stored [`MailRecord`] for `queue_id`, `None` if the
    /// transaction has not been seen.
    ///
    /// [`MailRecord`]: crate::data::mail::MailRecord
    pub fn get_transaction(
        &self,
        queue_id: &str,
    ) -> Result<Option<MailRecord>, StoreError> {
        defñ!("({:?})", queue_id);
        let mut stmt = self.conn.prepare(
            "SELECT dt, message_id, email_to, email_from, status, status_detail, log_text
             FROM mail WHERE queue_id = ?1",
        )?;
        let record_opt: Option<MailRecord> = stmt
            .query_row(params![queue_id], |row| {
                Ok(MailRecord {
                    queue_id: String::from(queue_id),
                    dt: row.get::<_, Option<DateTimeL>>(0)?,
                    message_id: row.get(1)?,
                    email_to: row.get(2)?,
                    email_from: row.get(3)?,
                    status: row.get(4)?,
                    status_detail: row.get(5)?,
                    log_text: row.get(6)?,
                })
            })
            .optional()?;
        Ok(record_opt)
    }

    /// Durably record `record` for its queue id, inserting or updating.
    pub fn upsert_transaction(
        &self,
        record: &MailRecord,
    ) -> Result<(), StoreError> {
        defñ!("({:?})", record.queue_id);
        Self::upsert_transaction_conn(&self.conn, record)?;
        Ok(())
    }

    fn upsert_transaction_conn(
        conn: &Connection,
        record: &MailRecord,
    ) -> ::rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO mail (queue_id, dt, message_id, email_to, email_from, status, status_detail, log_text)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(queue_id) DO UPDATE SET
                 dt = excluded.dt,
                 message_id = excluded.message_id,
                 email_to = excluded.email_to,
                 email_from = excluded.email_from,
                 status = excluded.status,
                 status_detail = excluded.status_detail,
                 log_text = excluded.log_text",
            params![
                record.queue_id,
                record.dt,
                record.message_id,
                record.email_to,
                record.email_from,
                record.status,
                record.status_detail,
                record.log_text,
            ],
        )?;
        Ok(())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // atomic per-line commit
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Commit the effects of one processed line as one atomic unit of
    /// work: the merged [`MailRecord`] (when the line belonged to a
    /// transaction; `None` for a cursor-only advance) and the advanced
    /// [`Cursor`] together.
    ///
    /// The scoped SQL transaction is rolled back on every failure path,
    /// so a record update without its cursor advance (or vice versa) is
    /// never observable after a crash.
    ///
    /// [`MailRecord`]: crate::data::mail::MailRecord
    /// [`Cursor`]: crate::data::cursor::Cursor
    pub fn commit_line(
        &mut self,
        record: Option<&MailRecord>,
        cursor: &Cursor,
    ) -> Result<(), StoreError> {
        defn!("({:?}, {:?})", record.map(|r| &r.queue_id), cursor);
        let tx = self.conn.transaction()?;
        if let Some(record) = record {
            Self::upsert_transaction_conn(&tx, record)?;
        }
        Self::upsert_cursor_conn(&tx, cursor)?;
        tx.commit()?;
        defo!("committed");
        defx!();
        Ok(())
    }

    /// `Count` of stored mail transactions. For testing.
    #[cfg(test)]
    pub fn transactions_count(&self) -> Result<Count, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM mail", [], |row| row.get(0))?;
        Ok(count as Count)
    }
}
