// ==========================================
// Ingestion error types
// ==========================================
// thiserror derive. Only a handful of conditions are fatal to a single
// parser or file invocation; everything else is accumulated as warning
// strings and never thrown past the orchestrator boundary.
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    // ===== File-level errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (only .xlsx/.xlsm/.csv)")]
    UnsupportedFormat(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    #[error("workbook has no sheets: {0}")]
    EmptyWorkbook(String),

    // ===== Sheet-level errors =====
    // Fatal to the single parser invocation; the caller converts it into
    // an errors entry and moves on to the next workbook.
    #[error("no header row found in sheet '{sheet}'")]
    HeaderRowNotFound { sheet: String },

    // ===== Pass-through =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for IngestError {
    fn from(err: calamine::Error) -> Self {
        IngestError::ExcelParseError(err.to_string())
    }
}

/// Result alias for the importer and engine layers.
pub type IngestResult<T> = Result<T, IngestError>;
