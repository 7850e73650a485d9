//! Error types for loading and rendering dashboard data.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building or rendering the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("activity data unavailable at {path}: {source}")]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: missing required column \"{column}\"")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: row {row}: cannot parse date \"{value}\"")]
    InvalidDate {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("{path}: row {row}: column \"{column}\" is not a number: \"{value}\"")]
    InvalidNumber {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    #[error("{path}: malformed CSV: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot write {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("rendering failed: {0}")]
    Render(String),
}

impl DashboardError {
    /// Whether this error means the input could not be read or understood.
    ///
    /// Every such error is fatal to a pipeline run.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(
            self,
            DashboardError::DataUnavailable { .. }
                | DashboardError::MissingColumn { .. }
                | DashboardError::InvalidDate { .. }
                | DashboardError::InvalidNumber { .. }
                | DashboardError::Csv { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
