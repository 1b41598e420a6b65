// src/readers/summary.rs

//! Implements `Summary` statistics tracking struct.

use crate::common::{Count, FPath};
use crate::readers::linereader::SummaryLineReader;
use crate::store::ledger::SummaryLedger;

use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Summary
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Statistics about one run of a [`MailLogProcessor`], composed from the
/// per-component `Summary*` structs. Printed by the _p3_ binary when
/// passed `--summary`.
///
/// [`MailLogProcessor`]: crate::readers::maillogprocessor::MailLogProcessor
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// `FPath` of the file processed.
    pub path: FPath,
    /// Logical source name; the durable cursor key.
    pub source_name: String,
    /// Statistics of the `LineReader`.
    pub summarylinereader: SummaryLineReader,
    /// Statistics of the `TransactionLedger`.
    pub summaryledger: SummaryLedger,
    /// `Count` of lines with no extractable queue id
    /// (cursor-only advance, no transaction side-effect).
    pub lines_skipped: Count,
}

impl fmt::Display for Summary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        writeln!(f, "Processed {:?} (source name {:?})", self.path, self.source_name)?;
        writeln!(f, "  lines processed   : {}", self.summarylinereader.lines_processed)?;
        writeln!(f, "  bytes processed   : {}", self.summarylinereader.bytes_processed)?;
        writeln!(f, "  lines skipped     : {}", self.lines_skipped)?;
        writeln!(f, "  records created   : {}", self.summaryledger.records_created)?;
        writeln!(f, "  records merged    : {}", self.summaryledger.records_merged)?;
        writeln!(
            f,
            "  ledger cache      : hit {}, miss {}, put {}",
            self.summaryledger.cache_hit,
            self.summaryledger.cache_miss,
            self.summaryledger.cache_put,
        )
    }
}
