// src/data/fields.rs

//! Implements a [`FieldSet`] and the pattern-match extractors deriving one
//! from a raw mail log line.
//!
//! Each extractor is an isolated regular expression match against the
//! line. Each is independent and tolerant of absence; an extractor that
//! finds nothing returns `None`, never an error. The only hard skip
//! condition for a line is a missing queue id (see
//! [`MailLogProcessor`]).
//!
//! [`FieldSet`]: self::FieldSet
//! [`MailLogProcessor`]: crate::readers::maillogprocessor::MailLogProcessor

use crate::data::datetime::{
    maillog_dt_to_datetime,
    DateTimeLOpt,
    FixedOffset,
    Year,
};

use ::lazy_static::lazy_static;
use ::regex::Regex;
use ::si_trace_print::defñ;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// extraction patterns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

lazy_static! {
    /// Matches an agent-process log entry, `postfix/<proc>[<pid>]: `,
    /// followed by a colon-terminated uppercase-hexadecimal queue id.
    ///
    /// e.g. `postfix/smtpd[2423]: 9C13E3F5A1: client=unknown[…]`
    ///
    /// Notably does not match `postfix/smtpd[2423]: NOQUEUE: reject: …`
    /// ("NOQUEUE" has letters outside `[A-F]`).
    static ref REGEX_QUEUE_ID: Regex = Regex::new(r"postfix/[a-z]+\[\d+\]: ([A-F0-9]+):").unwrap();

    /// Matches the recipient bracket syntax `to=<…>`.
    static ref REGEX_EMAIL_TO: Regex = Regex::new(r"to=<([^>]+)>").unwrap();

    /// Matches the sender bracket syntax `from=<…>`.
    ///
    /// A null sender `from=<>` (bounce message) yields no match, same as
    /// an absent `from=`.
    static ref REGEX_EMAIL_FROM: Regex = Regex::new(r"from=<([^>]+)>").unwrap();

    /// Matches the correlation bracket syntax `message-id=<…>`.
    static ref REGEX_MESSAGE_ID: Regex = Regex::new(r"message-id=<([^>]+)>").unwrap();

    /// Matches a delivery status, `status=<word>[, <detail>]`.
    /// The word and any trailing detail text are captured together;
    /// [`extract_status`] splits them.
    ///
    /// [`extract_status`]: self::extract_status
    static ref REGEX_STATUS: Regex = Regex::new(r"status=([a-zA-Z]+,?(?: .*)?)").unwrap();

    /// Matches the fixed-width datetime stamp prefix `Mon DD HH:MM:SS`.
    /// The year is not present in the mail log format; see
    /// [`maillog_dt_to_datetime`].
    ///
    /// [`maillog_dt_to_datetime`]: crate::data::datetime::maillog_dt_to_datetime
    static ref REGEX_DT_PREFIX: Regex = Regex::new(r"^(\w{3} \d{2} \d{2}:\d{2}:\d{2})").unwrap();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// field extractors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Extract the postfix queue id from a log line.
pub fn extract_queue_id(line: &str) -> Option<String> {
    REGEX_QUEUE_ID
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the recipient address from a log line.
pub fn extract_email_to(line: &str) -> Option<String> {
    REGEX_EMAIL_TO
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the sender address from a log line.
pub fn extract_email_from(line: &str) -> Option<String> {
    REGEX_EMAIL_FROM
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the message id from a log line.
pub fn extract_message_id(line: &str) -> Option<String> {
    REGEX_MESSAGE_ID
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the delivery status and optional status detail from a log line.
///
/// The leading word, stripped of any trailing comma, is the status short
/// code; remaining text, if any, is the free-text detail.
///
/// e.g. `status=sent, 250 OK` → `("sent", "250 OK")`<br/>
/// e.g. `status=sent (250 2.0.0 OK)` → `("sent", "(250 2.0.0 OK)")`<br/>
/// e.g. `status=deferred` → `("deferred", None)`
pub fn extract_status(line: &str) -> (Option<String>, Option<String>) {
    let matched: &str = match REGEX_STATUS
        .captures(line)
        .and_then(|caps| caps.get(1))
    {
        Some(m) => m.as_str(),
        None => return (None, None),
    };
    match matched.split_once(' ') {
        Some((word, detail)) => {
            let status = word.trim_end_matches(',').to_string();
            let detail = detail.trim();
            let status_detail = match detail.is_empty() {
                true => None,
                false => Some(detail.to_string()),
            };
            (Some(status), status_detail)
        }
        None => (Some(matched.trim_end_matches(',').to_string()), None),
    }
}

/// Extract the datetime stamp prefix substring from a log line,
/// e.g. `"Jun 01 12:00:01"`. No year, no parsing; see
/// [`maillog_dt_to_datetime`] for conversion to a [`DateTimeL`].
///
/// [`maillog_dt_to_datetime`]: crate::data::datetime::maillog_dt_to_datetime
/// [`DateTimeL`]: crate::data::datetime::DateTimeL
pub fn extract_dt_prefix(line: &str) -> Option<&str> {
    REGEX_DT_PREFIX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FieldSet
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The independently-optional structured fields extracted from one raw
/// mail log line.
///
/// `queue_id` of `None` means the line carries no mail transaction and
/// will be skipped entirely (cursor-only advance, no [`MailRecord`]
/// side-effect).
///
/// [`MailRecord`]: crate::data::mail::MailRecord
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldSet {
    pub queue_id: Option<String>,
    pub dt: DateTimeLOpt,
    pub message_id: Option<String>,
    pub email_to: Option<String>,
    pub email_from: Option<String>,
    pub status: Option<String>,
    pub status_detail: Option<String>,
}

/// Run every field extractor against one raw line (trailing newline
/// already stripped) and collect the results.
///
/// `year` and `tz_offset` complete the year-less, timezone-less datetime
/// stamp; see [`maillog_dt_to_datetime`].
///
/// [`maillog_dt_to_datetime`]: crate::data::datetime::maillog_dt_to_datetime
pub fn line_to_fieldset(
    line: &str,
    year: Year,
    tz_offset: &FixedOffset,
) -> FieldSet {
    defñ!("({:?}, {:?}, {:?})", line, year, tz_offset);
    let dt: DateTimeLOpt = extract_dt_prefix(line)
        .and_then(|dts| maillog_dt_to_datetime(dts, year, tz_offset));
    let (status, status_detail) = extract_status(line);

    FieldSet {
        queue_id: extract_queue_id(line),
        dt,
        message_id: extract_message_id(line),
        email_to: extract_email_to(line),
        email_from: extract_email_from(line),
        status,
        status_detail,
    }
}
