// src/tests/common.rs

//! Common log line fixtures and helper constructors for _p3lib_ tests.

#![allow(non_upper_case_globals)]

use crate::common::FPath;
use crate::data::datetime::{FixedOffset, Year};
use crate::readers::linereader::LineReader;
use crate::readers::maillogprocessor::MailLogProcessor;
use crate::store::recordstore::RecordStore;

use ::lazy_static::lazy_static;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// fixture values
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Year supplied to the extractor in tests (the log format lacks one).
pub const YEAR_2024: Year = 2024;

lazy_static! {
    pub static ref TZ_UTC: FixedOffset = FixedOffset::east_opt(0).unwrap();
    pub static ref TZ_PLUS8: FixedOffset = FixedOffset::east_opt(8 * 3600).unwrap();
}

/// postfix smtpd receives the message
pub const LINE_TO: &str = "Jun 01 12:00:01 mx1 postfix/smtpd[123]: ABCDEF0: to=<a@x.com>";
/// delivery result for the same queue id
pub const LINE_STATUS: &str = "Jun 01 12:00:02 mx1 postfix/smtpd[123]: ABCDEF0: status=sent, 250 OK";
/// a line lacking the `postfix/<proc>[<pid>]: <HEX>:` pattern entirely
pub const LINE_NO_QUEUE_ID: &str = "Jun 01 12:00:03 mx1 sshd[999]: Connection closed by 203.0.113.7";

/// [`LINE_TO`] and [`LINE_STATUS`] as a two-line log file.
pub const LOG_ABCDEF0: &str = "\
Jun 01 12:00:01 mx1 postfix/smtpd[123]: ABCDEF0: to=<a@x.com>
Jun 01 12:00:02 mx1 postfix/smtpd[123]: ABCDEF0: status=sent, 250 OK
";

/// The queue id of the transaction within [`LOG_MIXED`].
pub const QID_9C: &str = "9C13E3F5A1";

/// One complete mail transaction interleaved with non-transaction lines,
/// resembling a real postfix log.
pub const LOG_MIXED: &str = "\
Jun 01 11:59:58 mx1 postfix/pickup[2001]: warning: 45ED1A0: message repeated
Jun 01 12:00:00 mx1 postfix/smtpd[2423]: 9C13E3F5A1: client=unknown[203.0.113.5]
Jun 01 12:00:01 mx1 postfix/cleanup[2428]: 9C13E3F5A1: message-id=<20240601120001.GA2428@example.org>
Jun 01 12:00:01 mx1 postfix/qmgr[2101]: 9C13E3F5A1: from=<bob@example.org>, size=5820, nrcpt=1 (queue active)
Jun 01 12:00:02 mx1 sshd[999]: Connection closed by 203.0.113.7
Jun 01 12:00:02 mx1 postfix/smtp[2430]: 9C13E3F5A1: to=<alice@example.com>, relay=mail.example.com[198.51.100.3]:25, delay=1.2, status=sent (250 2.0.0 OK)
Jun 01 12:00:02 mx1 postfix/qmgr[2101]: 9C13E3F5A1: removed
";

/// `Count` of lines within [`LOG_MIXED`] carrying [`QID_9C`].
pub const LOG_MIXED_QID_LINES: u64 = 5;

/// `Count` of lines within [`LOG_MIXED`] carrying no queue id.
///
/// The `pickup` line carries a hexadecimal token but not in the
/// `postfix/<proc>[<pid>]: <HEX>:` position, and the `sshd` line is not
/// postfix at all.
pub const LOG_MIXED_SKIP_LINES: u64 = 2;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// helper constructors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// helper to wrap the match and panic checks
pub fn new_linereader(path: &FPath) -> LineReader {
    match LineReader::new(path.clone()) {
        Ok(val) => val,
        Err(err) => {
            panic!("LineReader::new({:?}) failed {}", path, err);
        }
    }
}

/// helper to wrap the match and panic checks
pub fn new_store() -> RecordStore {
    match RecordStore::in_memory() {
        Ok(val) => val,
        Err(err) => {
            panic!("RecordStore::in_memory() failed {}", err);
        }
    }
}

/// helper to wrap the match and panic checks; [`YEAR_2024`] and UTC
pub fn new_processor(
    path: &FPath,
    source_name: &str,
) -> MailLogProcessor {
    match MailLogProcessor::new(
        path.clone(),
        String::from(source_name),
        YEAR_2024,
        *TZ_UTC,
    ) {
        Ok(val) => val,
        Err(err) => {
            panic!("MailLogProcessor::new({:?}) failed {}", path, err);
        }
    }
}
