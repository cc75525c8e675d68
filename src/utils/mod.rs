//! Utilities for file IO, logging and tests

pub mod io;
pub mod logging;

pub use io::{OutputFormat, save};
