// src/debug/helpers.rs

//! Miscellaneous helper functions for testing.

use crate::common::FPath;

use std::io::Write; // for `NamedTempFile.write_all`

extern crate lazy_static;
use lazy_static::lazy_static;

extern crate tempfile;
#[doc(hidden)]
pub use tempfile::NamedTempFile;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile instances default to this file name prefix.
///
/// A known prefix eases manual cleanup of temporary files remaining
/// after testing.
/// See <https://github.com/Stebalien/tempfile/issues/183>.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-p3-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    FPath::from(ntf.path().to_str().unwrap())
}

/// Testing helper function to write a `str` to a temporary file.
///
/// BUG: `NamedTempFile` created within `lazy_static` will fail to remove itself
///      <https://github.com/Stebalien/tempfile/issues/183>.
pub fn create_temp_file(data: &str) -> NamedTempFile {
    let mut ntf = match tempfile::Builder::new()
        // use known prefix for easier cleanup
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("NamedTempFile::new() return Err {}", err);
        }
    };
    match ntf.write_all(data.as_bytes()) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }

    ntf
}

/// Testing helper function to append a `str` to a file at `path`.
///
/// Emulates a log file growing between program runs.
pub fn append_to_file(path: &FPath, data: &str) {
    let mut file = match crate::common::FileOpenOptions::new()
        .append(true)
        .open(path)
    {
        Ok(val) => val,
        Err(err) => {
            panic!("FileOpenOptions::open({:?}) return Err {}", path, err);
        }
    };
    match file.write_all(data.as_bytes()) {
        Ok(_) => {}
        Err(err) => {
            panic!("File::write_all() return Err {}", err);
        }
    }
}
