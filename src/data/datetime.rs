// src/data/datetime.rs

//! Functions to parse the datetime stamp prefixing mail log messages,
//! e.g. `"Jun 01 12:00:01"`, into a [`DateTimeL`].
//!
//! The mail log datetime format does not carry a year. The caller must
//! supply an explicit [`Year`] (and an explicit [`FixedOffset`] timezone)
//! so parsing is deterministic and testable; wall-clock time is never
//! consulted here.
//!
//! Known limitation: a log file spanning New Year's Eve will have its
//! pre-rollover messages dated with the wrong year. Distinguishing the
//! rollover requires seeing the backwards datetime jump, and a resumable
//! single-line-at-a-time reader may never see both sides of the jump in
//! one run. Callers wanting other years pass other [`Year`] values.
//!
//! [`DateTimeL`]: self::DateTimeL
//! [`Year`]: self::Year
//! [`FixedOffset`]: self::FixedOffset

#[doc(hidden)]
pub use ::chrono::{
    DateTime,
    Datelike,
    FixedOffset,
    Local,
    LocalResult,
    NaiveDateTime,
    TimeZone,
};
use ::si_trace_print::defñ;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime typing, strings, and formatting
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `DateTimeL` is _DateTime_ with _L_ocal or fixed timezone offset
/// (aka "zoned datetime").
pub type DateTimeL = DateTime<FixedOffset>;

pub type DateTimeLOpt = Option<DateTimeL>;

/// A _Year_ in a date
pub type Year = i32;

/// `strftime` pattern of a mail log datetime stamp after the missing
/// year has been prepended, e.g. `"2024 Jun 01 12:00:01"`.
pub const DT_PATTERN_MAILLOG: &str = "%Y %b %d %H:%M:%S";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a year-less mail log datetime stamp `dts`, e.g.
/// `"Jun 01 12:00:01"`, to a [`DateTimeL`] using the passed `year` and
/// `tz_offset`.
///
/// Returns `None` for an unparseable `dts`; the caller treats that the
/// same as a line without a datetime stamp.
pub fn maillog_dt_to_datetime(
    dts: &str,
    year: Year,
    tz_offset: &FixedOffset,
) -> DateTimeLOpt {
    defñ!("({:?}, {:?}, {:?})", dts, year, tz_offset);
    let dts_year = format!("{} {}", year, dts);
    let ndt: NaiveDateTime = match NaiveDateTime::parse_from_str(dts_year.as_str(), DT_PATTERN_MAILLOG) {
        Ok(val) => val,
        Err(_) => return None,
    };
    match tz_offset.from_local_datetime(&ndt) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => None,
    }
}
