use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a source file into a prepared dataset.
///
/// Raw attributes are never default-filled: a missing column or an
/// unparsable cell is reported here instead.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("row {row}: {message}")]
    Malformed { row: usize, message: String },

    #[error("dataset contains no rows")]
    Empty,

    #[error("parquet: {0}")]
    Parquet(String),
}

impl DataLoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataLoadError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(row: usize, message: impl ToString) -> Self {
        DataLoadError::Malformed {
            row,
            message: message.to_string(),
        }
    }
}

impl From<csv::Error> for DataLoadError {
    fn from(e: csv::Error) -> Self {
        let row = e
            .position()
            .map(|p| p.record() as usize)
            .unwrap_or_default();
        DataLoadError::malformed(row, e)
    }
}

impl From<parquet::errors::ParquetError> for DataLoadError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        DataLoadError::Parquet(e.to_string())
    }
}

impl From<arrow::error::ArrowError> for DataLoadError {
    fn from(e: arrow::error::ArrowError) -> Self {
        DataLoadError::Parquet(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataLoadError>;
