//! Log lines for table reads and writes
//!
//! Every file operation logs one line when it starts and one when it ends,
//! so a run can be followed from the default `info` output.

use std::path::Path;
use std::time::Duration;

/// `"<what> <path>"` at info level
///
/// # Arguments
/// * `operation` - Description of what is about to happen, e.g. "Reading CSV file"
/// * `path` - File being read or written
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{operation} {}", path.display());
}

/// `"<verb> <rows> rows at <path> in <elapsed>"` at info level
///
/// # Arguments
/// * `verb` - Past-tense verb, e.g. "read" or "wrote"
/// * `path` - File that was read or written
/// * `rows` - Number of table rows involved
/// * `elapsed` - Time the operation took
pub fn log_operation_complete(verb: &str, path: &Path, rows: usize, elapsed: Duration) {
    let rows_label = if rows == 1 { "row" } else { "rows" };
    log::info!(
        "Successfully {verb} {rows} {rows_label} at {} in {elapsed:.2?}",
        path.display()
    );
}

/// Warning about a location on disk, or a free-standing warning
///
/// # Arguments
/// * `message` - Warning text
/// * `path` - Optional path the warning refers to, appended after a colon
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{message}: {}", path.display()),
        None => log::warn!("{message}"),
    }
}
