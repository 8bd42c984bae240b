use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("invalid period id `{0}`")]
    InvalidId(String),
    #[error("period id `{id}` names a week beyond the month's {weeks} weeks")]
    WeekOutOfRange { id: String, weeks: u32 },
    #[error("unknown period mode `{0}`")]
    UnknownMode(String),
}

/// Rejected habit edits. These never reach storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HabitError {
    #[error("habit name cannot be empty")]
    EmptyName,
    #[error("habit \"{0}\" already exists")]
    Duplicate(String),
    #[error("habit \"{0}\" not found")]
    NotFound(String),
    #[error("day {0} is not part of this period")]
    DayOutOfRange(u32),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tracker data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.into(),
            source,
        }
    }
}
