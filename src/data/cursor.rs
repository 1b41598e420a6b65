// src/data/cursor.rs

//! Implements a [`Cursor`], the durable marker of how much of one log
//! source has been consumed.
//!
//! [`Cursor`]: self::Cursor

use crate::common::{FileOffset, LineIndex};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Cursor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The resume position for one log source.
///
/// `byte_offset` always equals the file position immediately after the
/// last line whose effects were durably committed. `line_index` counts
/// logical lines consumed; it is only for diagnostics and ordering,
/// never for seeking.
///
/// The `source_name` is the durable key. It is decoupled from the file
/// path so a log file can be relocated without losing position.
///
/// A `Cursor` is an immutable value; advancing produces a new `Cursor`
/// via [`advanced`]. A `Cursor` is persisted by a [`RecordStore`] and
/// never deleted.
///
/// [`advanced`]: Cursor#method.advanced
/// [`RecordStore`]: crate::store::recordstore::RecordStore
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cursor {
    pub source_name: String,
    pub line_index: LineIndex,
    pub byte_offset: FileOffset,
}

impl Cursor {
    /// A `Cursor` for a previously-unseen source; position zero.
    pub fn new(source_name: &str) -> Cursor {
        Cursor {
            source_name: String::from(source_name),
            line_index: 0,
            byte_offset: 0,
        }
    }

    /// Successor `Cursor` for the same source at the passed position.
    pub fn advanced(
        &self,
        line_index: LineIndex,
        byte_offset: FileOffset,
    ) -> Cursor {
        Cursor {
            source_name: self.source_name.clone(),
            line_index,
            byte_offset,
        }
    }
}
