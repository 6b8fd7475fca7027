use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::Field;

// ---------------------------------------------------------------------------
// Load-time errors: fatal, the catalog is never served half-built
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("CSV row {row}: {source}")]
    Csv { row: usize, source: csv::Error },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid parquet file: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("reading parquet batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column for {field} (looked for {aliases:?}, found {available:?})")]
    MissingColumn {
        field: Field,
        aliases: &'static [&'static str],
        available: Vec<String>,
    },

    #[error("malformed source: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Query-time errors: reported to the caller, never touch the catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("invalid '{parameter}' parameter {value:?}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },
}
