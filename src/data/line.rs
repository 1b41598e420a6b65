// src/data/line.rs

//! Implements a [`LogLine`], one raw line of a mail log file along with
//! its position within that file.
//!
//! [`LogLine`]: self::LogLine

use crate::common::{Bytes, FileOffset, LineIndex, NLu8};

use ::more_asserts::debug_assert_lt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LogLine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One line of a mail log file: the raw bytes (including any trailing
/// newline) and the file offsets delimiting them.
///
/// `fileoffset_end` is the offset of the first byte _after_ this line,
/// i.e. the value a [`Cursor`] records once this line's effects are
/// durably committed.
///
/// [`Cursor`]: crate::data::cursor::Cursor
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogLine {
    bytes: Bytes,
    fileoffset_begin: FileOffset,
    fileoffset_end: FileOffset,
    lineindex: LineIndex,
}

impl LogLine {
    pub fn new(
        bytes: Bytes,
        fileoffset_begin: FileOffset,
        fileoffset_end: FileOffset,
        lineindex: LineIndex,
    ) -> LogLine {
        debug_assert_lt!(
            fileoffset_begin,
            fileoffset_end,
            "LogLine fileoffset_begin {} not less than fileoffset_end {}",
            fileoffset_begin,
            fileoffset_end,
        );
        LogLine {
            bytes,
            fileoffset_begin,
            fileoffset_end,
            lineindex,
        }
    }

    /// `FileOffset` of the first byte of this line.
    #[inline(always)]
    pub const fn fileoffset_begin(&self) -> FileOffset {
        self.fileoffset_begin
    }

    /// `FileOffset` of the first byte after this line (after the
    /// newline, or end of file).
    #[inline(always)]
    pub const fn fileoffset_end(&self) -> FileOffset {
        self.fileoffset_end
    }

    /// Zero-based index of this line within the file.
    #[inline(always)]
    pub const fn lineindex(&self) -> LineIndex {
        self.lineindex
    }

    /// Length of this line in bytes, including any trailing newline.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `true` if the last byte of this line is a newline.
    ///
    /// The last line of a file may lack one.
    pub fn ends_with_newline(&self) -> bool {
        self.bytes.last() == Some(&NLu8)
    }

    /// The line as whitespace-trimmed text, lossily decoded.
    ///
    /// Mail logs are expected to be ASCII; invalid UTF-8 sequences are
    /// replaced rather than refused.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes)
            .trim()
            .to_string()
    }
}
