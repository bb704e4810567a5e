//! Error types for the lyric player.
//!
//! `MissedSync` has no variant here: a tick whose timestamp is not in the
//! table simply resolves to no change.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LyricsError>;

#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("audio asset not found: {}", .0.display())]
    AssetMissing(PathBuf),

    #[error("inconsistent lyric sheet: {0}")]
    ConfigInconsistency(#[from] SheetIssue),

    #[error("failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("failed to parse lyric sheet: {0}")]
    SheetParse(String),

    #[error("failed to serialize lyric sheet: {0}")]
    SheetSerialize(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A load-time violation of the lyric table invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SheetIssue {
    #[error("sheet has no lines")]
    Empty,

    #[error("{table} table has {found} entries, expected {expected}")]
    LengthMismatch {
        table: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("timestamp {key} points at line {index}, but there are only {len} lines")]
    IndexOutOfRange {
        key: String,
        index: usize,
        len: usize,
    },

    #[error("timestamp {0} appears more than once")]
    DuplicateTimestamp(String),

    #[error("timestamp key {0:?} is not in mm:ss form")]
    MalformedTimestamp(String),

    #[error("line {0} occupies zero rows")]
    ZeroRows(usize),

    #[error("line {index} has an invalid animation duration {seconds}")]
    InvalidDuration { index: usize, seconds: f64 },
}

impl From<toml::de::Error> for LyricsError {
    fn from(err: toml::de::Error) -> Self {
        LyricsError::SheetParse(err.to_string())
    }
}

impl From<serde_json::Error> for LyricsError {
    fn from(err: serde_json::Error) -> Self {
        LyricsError::SheetParse(err.to_string())
    }
}

impl From<toml::ser::Error> for LyricsError {
    fn from(err: toml::ser::Error) -> Self {
        LyricsError::SheetSerialize(err.to_string())
    }
}
