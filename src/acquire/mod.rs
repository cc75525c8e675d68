//! Dataset acquisition
//!
//! The loader only needs the raw dataset to be present on disk. How it gets
//! there is behind [`DatasetAcquirer`].

pub mod kaggle;

use std::path::Path;

use crate::error::Result;
use crate::error::util::is_non_empty_dir;

pub use kaggle::{KaggleCredentials, KaggleDownloader, extract_archive};

/// Makes a remote dataset available in a local directory
pub trait DatasetAcquirer {
    /// Fetch `repo` into `destination` unless it already holds data
    ///
    /// Must be a no-op when `destination` exists and is non-empty.
    fn ensure_downloaded(&self, repo: &str, destination: &Path) -> Result<()>;
}

/// Acquirer for files that were placed manually; never touches the network
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAcquirer;

impl DatasetAcquirer for NoopAcquirer {
    fn ensure_downloaded(&self, repo: &str, destination: &Path) -> Result<()> {
        if !is_non_empty_dir(destination)? {
            crate::utils::logging::log_warning(
                &format!("Offline mode, not downloading '{repo}' into empty directory"),
                Some(destination),
            );
        }
        Ok(())
    }
}
