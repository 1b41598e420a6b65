// src/bin/p3.rs

//! Driver program _p3_ drives the [_p3lib_].
//!
//! Processes user-passed command-line arguments, then ingests the passed
//! mail log file using a [`MailLogProcessor`] instance: lines are read
//! from the stored resume position, mail transaction lines are merged
//! into per-transaction records, and each line's effects are committed
//! to the [`RecordStore`] atomically with the advancing cursor.
//!
//! Running _p3_ again later processes only what was appended to the log
//! file since the prior run.
//!
//! If passed CLI option `--summary`, prints a [`Summary`] about the run.
//!
//! The schedule of runs is owned by the user (cron, a systemd timer, an
//! occasional manual run); _p3_ itself is a single pass.
//!
//! [_p3lib_]: p3lib
//! [`MailLogProcessor`]: p3lib::readers::maillogprocessor::MailLogProcessor
//! [`RecordStore`]: p3lib::store::recordstore::RecordStore
//! [`Summary`]: p3lib::readers::summary::Summary

#![allow(non_camel_case_types)]

use std::process::ExitCode;

use ::clap::Parser;
use ::const_format::concatcp;
use ::lazy_static::lazy_static;
use ::p3lib::common::{FPath, Path};
use ::p3lib::data::datetime::{
    Datelike,
    FixedOffset,
    Local,
    Year,
};
use ::p3lib::e_err;
use ::p3lib::readers::maillogprocessor::MailLogProcessor;
use ::p3lib::readers::summary::Summary;
use ::p3lib::store::recordstore::RecordStore;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// command-line parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

lazy_static! {
    /// Timezone offset of the local system, the default for `--tz-offset`.
    static ref LOCAL_NOW_OFFSET: FixedOffset = *Local::now().offset();
}

/// Parse a user-passed timezone offset, e.g. `"+08:00"`, `"-0530"`,
/// `"+02"`, or `"Z"`.
fn cli_process_tz_offset(tzo: &str) -> std::result::Result<FixedOffset, String> {
    let tzo_: &str = match tzo {
        "Z" | "UTC" | "utc" => "+00:00",
        val => val,
    };
    let (sign, digits): (i32, &str) = match tzo_.as_bytes().first() {
        Some(b'+') => (1, &tzo_[1..]),
        Some(b'-') => (-1, &tzo_[1..]),
        Some(_) => (1, tzo_),
        None => return Err(format!("unable to parse a timezone offset from {:?}", tzo)),
    };
    let digits: String = digits.replace(':', "");
    let (hours, minutes): (i32, i32) = match digits.len() {
        // "+HH"
        2 => {
            let hours: i32 = digits
                .parse()
                .map_err(|err| format!("unable to parse timezone offset {:?}: {}", tzo, err))?;
            (hours, 0)
        }
        // "+HHMM", "+HH:MM"
        4 => {
            let hours: i32 = digits[..2]
                .parse()
                .map_err(|err| format!("unable to parse timezone offset {:?}: {}", tzo, err))?;
            let minutes: i32 = digits[2..]
                .parse()
                .map_err(|err| format!("unable to parse timezone offset {:?}: {}", tzo, err))?;
            (hours, minutes)
        }
        _ => return Err(format!("unable to parse a timezone offset from {:?}", tzo)),
    };
    let seconds: i32 = sign * (hours * 3600 + minutes * 60);
    match FixedOffset::east_opt(seconds) {
        Some(val) => Ok(val),
        None => Err(format!("timezone offset out of range {:?}", tzo)),
    }
}

/// clap command-line arguments build-time definitions.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "p3",
    // write expanded information for the `--version` output
    version = concatcp!(
        "(persistent postfix parser)\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
        "Repository: ", env!("CARGO_PKG_REPOSITORY"), "\n",
        "Author: ", env!("CARGO_PKG_AUTHORS"), "\n",
    ),
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path of the mail log file to ingest.
    #[clap(required = true)]
    path: FPath,

    /// Logical source name; the durable key the resume position is
    /// stored under. Decoupled from PATH so the log file can be
    /// relocated without losing position.
    /// If not passed then the file name of PATH is used.
    #[clap(
        short = 'n',
        long,
        verbatim_doc_comment,
    )]
    source_name: Option<String>,

    /// Path of the SQLite database holding resume positions and mail
    /// transaction records. Created if it does not exist.
    #[clap(
        short = 'd',
        long,
        default_value = "p3.db",
        verbatim_doc_comment,
    )]
    database: FPath,

    /// Timezone offset applied to the log's timezone-less datetime
    /// stamps. Example values, "+12", "-0530", "+02:00", or "Z".
    /// To pass a value with leading "-" use "=" notation, e.g. "-t=-0530".
    /// If not passed then the local system timezone offset is used.
    #[clap(
        short = 't',
        long,
        verbatim_doc_comment,
        value_parser = cli_process_tz_offset,
        default_value_t = *LOCAL_NOW_OFFSET,
    )]
    tz_offset: FixedOffset,

    /// Year applied to the log's year-less datetime stamps.
    /// If not passed then the current local year is used.
    /// A log file spanning New Year's Eve will have its pre-rollover
    /// messages dated with the passed year; see the project README.
    #[clap(
        short = 'y',
        long,
        verbatim_doc_comment,
    )]
    year: Option<Year>,

    /// Print a summary of processing statistics.
    #[clap(short = 's', long)]
    summary: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// main
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn main() -> ExitCode {
    let args = CLI_Args::parse();

    let year: Year = match args.year {
        Some(val) => val,
        None => Local::now().year(),
    };
    let source_name: String = match args.source_name {
        Some(val) => val,
        None => match Path::new(&args.path).file_name() {
            Some(val) => val.to_string_lossy().into_owned(),
            None => args.path.clone(),
        },
    };

    let mut store: RecordStore = match RecordStore::open(&args.database) {
        Ok(val) => val,
        Err(err) => {
            e_err!("RecordStore::open({:?}) {}", args.database, err);
            return ExitCode::FAILURE;
        }
    };
    let mut processor: MailLogProcessor = match MailLogProcessor::new(
        args.path.clone(),
        source_name,
        year,
        args.tz_offset,
    ) {
        Ok(val) => val,
        Err(err) => {
            e_err!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let summary: Summary = match processor.process(&mut store) {
        Ok(val) => val,
        Err(err) => {
            e_err!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    if args.summary {
        print!("{}", summary);
    }

    ExitCode::SUCCESS
}
