//! Utility functions for error handling
//!
//! Filesystem helpers that translate `std::io` failures into pipeline errors
//! carrying the offending path.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Open a file for reading, reporting a missing file as `Error::NotFound`
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (logged on failure)
///
/// # Returns
/// The open file, `Error::NotFound` if it does not exist, or `Error::Io`
/// for any other failure
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.is_file() {
        log::debug!("Missing file needed for {purpose}: {}", path.display());
        return Err(Error::not_found(path));
    }

    fs::File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::not_found(path),
        _ => Error::io(path, e),
    })
}

/// Whether `path` is a directory holding at least one entry
///
/// # Arguments
/// * `path` - Directory to inspect; a missing path or a plain file counts as empty
///
/// # Returns
/// `true` if the directory has any entry, `Error::Io` if it cannot be listed
pub fn is_non_empty_dir(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    let mut entries = fs::read_dir(path).map_err(|e| Error::io(path, e))?;
    Ok(entries.next().is_some())
}

/// Create every missing directory up to and including `dir`
///
/// # Arguments
/// * `dir` - Directory that must exist afterwards
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// Parent directory of `path`, falling back to the working directory
///
/// # Arguments
/// * `path` - File path, possibly a bare file name
///
/// # Returns
/// The parent directory, or `.` when `path` has none
#[must_use]
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
