use thiserror::Error;

/// Failures surfaced to the user as an error line in the top bar.
///
/// Incomplete selections are not errors; they are reported as warnings by
/// [`crate::selection::Readiness`].
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("failed to load {file}: {source:#}")]
    Load {
        file: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("shape error: {0}")]
    ShapeError(String),

    #[error("type mismatch: column '{column}' must be {expected}")]
    TypeMismatch { column: String, expected: &'static str },

    #[error("invalid values: {0}")]
    InvalidValues(String),

    #[error("no table loaded, select a file first")]
    NoTableLoaded,

    #[error("the table has no numeric values to filter on")]
    NoNumericColumns,
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
