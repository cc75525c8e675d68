//! Kaggle dataset downloader
//!
//! Downloads the zipped dataset through the Kaggle REST API and extracts it
//! into the destination directory.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde::Deserialize;
use zip::ZipArchive;

use crate::acquire::DatasetAcquirer;
use crate::error::util::{ensure_dir, is_non_empty_dir, safe_open_file};
use crate::error::{Error, Result};
use crate::utils::logging::{create_spinner, finish_and_clear, log_warning};

/// Base URL of the Kaggle REST API
pub const DEFAULT_API_BASE: &str = "https://www.kaggle.com/api/v1";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// API credentials as stored in `kaggle.json`
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct KaggleCredentials {
    pub username: String,
    pub key: String,
}

impl fmt::Debug for KaggleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KaggleCredentials")
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl KaggleCredentials {
    /// Credentials from `KAGGLE_USERNAME` and `KAGGLE_KEY`
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let username = std::env::var("KAGGLE_USERNAME").ok()?;
        let key = std::env::var("KAGGLE_KEY").ok()?;
        Some(Self { username, key })
    }

    /// Credentials from a `kaggle.json` file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path, "Kaggle credentials")?;
        serde_json::from_reader(file)
            .map_err(|e| Error::config(path.display().to_string(), e.to_string()))
    }

    /// `$KAGGLE_CONFIG_DIR/kaggle.json` or `~/.kaggle/kaggle.json`
    #[must_use]
    pub fn default_file() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var("KAGGLE_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("kaggle.json"));
        }
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".kaggle").join("kaggle.json"))
    }

    /// Environment variables first, then the credentials file
    pub fn discover() -> Result<Self> {
        if let Some(credentials) = Self::from_env() {
            return Ok(credentials);
        }
        match Self::default_file() {
            Some(path) => Self::from_file(&path),
            None => Err(Error::config(
                "Kaggle credentials",
                "set KAGGLE_USERNAME and KAGGLE_KEY or provide kaggle.json",
            )),
        }
    }
}

/// Downloads datasets from Kaggle
pub struct KaggleDownloader {
    client: Client,
    base_url: String,
    credentials: Option<KaggleCredentials>,
}

impl KaggleDownloader {
    /// Downloader against the public API; credentials are discovered on
    /// first use
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(DOWNLOAD_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config("HTTP client", e.to_string()))?;

        Ok(Self {
            client,
            base_url: DEFAULT_API_BASE.to_string(),
            credentials: None,
        })
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: KaggleCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn download_url(&self, repo: &str) -> String {
        format!(
            "{}/datasets/download/{repo}",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Stream the archive into an anonymous temporary file
    fn download_archive(&self, repo: &str, destination: &Path, credentials: &KaggleCredentials) -> Result<File> {
        let fail = |message: String| Error::acquisition(repo, destination, message);

        let mut response = self
            .client
            .get(self.download_url(repo))
            .basic_auth(&credentials.username, Some(&credentials.key))
            .send()
            .map_err(|e| fail(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!("server answered {status}")));
        }

        let mut archive = tempfile::tempfile().map_err(|e| fail(e.to_string()))?;
        let bytes = response
            .copy_to(&mut archive)
            .map_err(|e| fail(format!("download interrupted: {e}")))?;
        archive.rewind().map_err(|e| fail(e.to_string()))?;

        log::debug!("Downloaded {bytes} bytes for {repo}");
        Ok(archive)
    }
}

fn check_repo(repo: &str) -> std::result::Result<(), String> {
    match repo.split_once('/') {
        Some((owner, slug)) if !owner.is_empty() && !slug.is_empty() && !slug.contains('/') => {
            Ok(())
        }
        _ => Err(format!("'{repo}' is not an 'owner/dataset' identifier")),
    }
}

/// Extract every entry of a zip archive below `destination`
///
/// Entries whose names would escape `destination` abort the extraction.
/// Returns the number of files written.
pub fn extract_archive<R: Read + Seek>(archive: R, repo: &str, destination: &Path) -> Result<usize> {
    let fail = |message: String| Error::acquisition(repo, destination, message);

    let mut archive = ZipArchive::new(archive).map_err(|e| fail(format!("invalid archive: {e}")))?;
    ensure_dir(destination)?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| fail(format!("unreadable archive entry {i}: {e}")))?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(fail(format!("archive entry '{}' escapes the destination", entry.name())));
        };
        let out_path = destination.join(relative);

        if entry.is_dir() {
            ensure_dir(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            ensure_dir(parent)?;
        }
        let mut out = File::create(&out_path).map_err(|e| Error::io(&out_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| Error::io(&out_path, e))?;
        extracted += 1;
    }

    Ok(extracted)
}

impl DatasetAcquirer for KaggleDownloader {
    fn ensure_downloaded(&self, repo: &str, destination: &Path) -> Result<()> {
        if is_non_empty_dir(destination)? {
            log::info!(
                "Dataset already exists at {}. Skipping download.",
                destination.display()
            );
            return Ok(());
        }
        check_repo(repo).map_err(|message| Error::acquisition(repo, destination, message))?;

        let credentials = match &self.credentials {
            Some(credentials) => credentials.clone(),
            None => KaggleCredentials::discover()
                .map_err(|e| Error::acquisition(repo, destination, e.to_string()))?,
        };

        let start = Instant::now();
        let spinner = create_spinner(Some(&format!("Downloading {repo} from Kaggle...")));
        let result = self
            .download_archive(repo, destination, &credentials)
            .and_then(|archive| extract_archive(archive, repo, destination));
        finish_and_clear(&spinner);

        match result {
            Ok(files) => {
                log::info!(
                    "Dataset successfully downloaded and extracted {files} files to {} in {:?}",
                    destination.display(),
                    start.elapsed()
                );
                Ok(())
            }
            Err(e) => {
                if destination.exists() {
                    if let Err(cleanup) = fs::remove_dir_all(destination) {
                        log_warning(
                            &format!("Could not remove partial download ({cleanup})"),
                            Some(destination),
                        );
                    }
                }
                Err(match e {
                    Error::Acquisition { .. } => e,
                    other => Error::acquisition(repo, destination, other.to_string()),
                })
            }
        }
    }
}
