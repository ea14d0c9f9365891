// src/error.rs

use std::{io, path::PathBuf};

/// Errors that abort a join run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: malformed line: {reason}", .path.display())]
    MalformedLine {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("row {key:?} has {found} values, expected {expected}")]
    RowWidth {
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot parse config {}: {reason}", .path.display())]
    ConfigParse { path: PathBuf, reason: String },
}

impl Error {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::FileAccess {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
