// src/readers/linereader.rs

//! Implements a [`LineReader`], the driver of deriving [`LogLine`s] from
//! a mail log file starting at an arbitrary resume offset.
//!
//! [`LogLine`s]: crate::data::line::LogLine
//! [`LineReader`]: self::LineReader

use crate::common::{
    Bytes,
    Count,
    FPath,
    File,
    FileOffset,
    FileSz,
    LineIndex,
    NLu8,
    ResultS3,
};
use crate::data::line::LogLine;

use std::fmt;
use std::io::{BufRead, BufReader, Error, Result, Seek, SeekFrom};

use ::more_asserts::assert_le;
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LineReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`LineReader.find_line()`] searching results.
///
/// [`LineReader.find_line()`]: self::LineReader#method.find_line
pub type ResultS3LineFind = ResultS3<LogLine, Error>;

/// Statistics of a `LineReader`, for a [`Summary`].
///
/// [`Summary`]: crate::readers::summary::Summary
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SummaryLineReader {
    /// `Count` of `LogLine`s processed.
    pub lines_processed: Count,
    /// `Count` of bytes processed.
    pub bytes_processed: Count,
}

/// A specialized reader that finds [`LogLine`s] in a mail log file,
/// reading strictly sequentially from a caller-set resume offset.
///
/// A `LineReader` tracks the [`FileOffset`] of the next unread byte and
/// the [`LineIndex`] of the next unread line; after each found `LogLine`
/// both point one past it. It never re-reads a byte within one run;
/// resumption across runs is the [`Cursor`]'s job.
///
/// _XXX: not a rust "Reader"; does not implement trait [`Read`]._
///
/// [`LogLine`s]: crate::data::line::LogLine
/// [`FileOffset`]: crate::common::FileOffset
/// [`LineIndex`]: crate::common::LineIndex
/// [`Cursor`]: crate::data::cursor::Cursor
/// [`Read`]: std::io::Read
pub struct LineReader {
    reader: BufReader<File>,
    path: FPath,
    /// Size of the file in bytes at open.
    filesz: FileSz,
    /// `FileOffset` of the next byte to read.
    fileoffset: FileOffset,
    /// `LineIndex` of the next line to read.
    lineindex: LineIndex,
    /// `Count` of `LogLine`s processed.
    pub(super) lines_processed: Count,
    /// `Count` of bytes processed.
    pub(super) bytes_processed: Count,
}

impl fmt::Debug for LineReader {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("LineReader")
            .field("path", &self.path)
            .field("filesz", &self.filesz)
            .field("fileoffset", &self.fileoffset)
            .field("lineindex", &self.lineindex)
            .finish()
    }
}

/// Initial capacity of the per-line byte buffer.
/// Mail log lines are rarely longer.
const LINE_BUF_SZ: usize = 256;

/// Implement the LineReader.
impl LineReader {
    /// Create a new `LineReader`.
    ///
    /// The file must exist and be readable (the caller treats failure
    /// here as the source being unavailable).
    pub fn new(path: FPath) -> Result<LineReader> {
        defn!("({:?})", path);
        let file: File = File::open(&path)?;
        let filesz: FileSz = file.metadata()?.len();
        defx!("opened {:?}, filesz {}", path, filesz);
        Ok(LineReader {
            reader: BufReader::new(file),
            path,
            filesz,
            fileoffset: 0,
            lineindex: 0,
            lines_processed: 0,
            bytes_processed: 0,
        })
    }

    /// `FPath` of the file processed.
    #[inline(always)]
    pub const fn path(&self) -> &FPath {
        &self.path
    }

    /// Size of the file in bytes as of opening it.
    #[inline(always)]
    pub const fn filesz(&self) -> FileSz {
        self.filesz
    }

    /// `FileOffset` of the next byte to read.
    #[inline(always)]
    pub const fn fileoffset(&self) -> FileOffset {
        self.fileoffset
    }

    /// `LineIndex` of the next line to read.
    #[inline(always)]
    pub const fn lineindex(&self) -> LineIndex {
        self.lineindex
    }

    /// Position the reader at `fileoffset`, resuming line counting at
    /// `lineindex`.
    ///
    /// Callers must not pass a `fileoffset` beyond the file size; the
    /// recovery policy for a stored offset beyond the file size
    /// (external truncation) is decided by the [`MailLogProcessor`]
    /// before seeking.
    ///
    /// [`MailLogProcessor`]: crate::readers::maillogprocessor::MailLogProcessor
    pub fn seek(
        &mut self,
        fileoffset: FileOffset,
        lineindex: LineIndex,
    ) -> Result<()> {
        defñ!("({}, {})", fileoffset, lineindex);
        assert_le!(
            fileoffset,
            self.filesz,
            "seek fileoffset {} past filesz {}; caller must apply the truncation recovery policy first",
            fileoffset,
            self.filesz,
        );
        self.reader
            .seek(SeekFrom::Start(fileoffset))?;
        self.fileoffset = fileoffset;
        self.lineindex = lineindex;
        Ok(())
    }

    /// Find the next [`LogLine`] at the current position.
    ///
    /// Returns `Found(LogLine)` or `Done` at end of file (terminal,
    /// successful) or `Err` for an underlying read failure.
    ///
    /// [`LogLine`]: crate::data::line::LogLine
    pub fn find_line(&mut self) -> ResultS3LineFind {
        defn!("() @{}", self.fileoffset);
        let mut buffer: Bytes = Bytes::with_capacity(LINE_BUF_SZ);
        match self.reader.read_until(NLu8, &mut buffer) {
            Ok(0) => {
                defx!("Done");
                ResultS3LineFind::Done
            }
            Ok(sz) => {
                let fileoffset_begin: FileOffset = self.fileoffset;
                let lineindex: LineIndex = self.lineindex;
                self.fileoffset += sz as FileOffset;
                self.lineindex += 1;
                self.lines_processed += 1;
                self.bytes_processed += sz as Count;
                defo!("line {} [{}, {})", lineindex, fileoffset_begin, self.fileoffset);
                let logline = LogLine::new(
                    buffer,
                    fileoffset_begin,
                    self.fileoffset,
                    lineindex,
                );
                defx!("Found");
                ResultS3LineFind::Found(logline)
            }
            Err(err) => {
                defx!("Err {}", err);
                ResultS3LineFind::Err(err)
            }
        }
    }

    /// Statistics for a [`Summary`].
    ///
    /// [`Summary`]: crate::readers::summary::Summary
    pub fn summary(&self) -> SummaryLineReader {
        SummaryLineReader {
            lines_processed: self.lines_processed,
            bytes_processed: self.bytes_processed,
        }
    }
}
