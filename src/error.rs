//! Error types for the enrollstat analysis pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - CSV decoding and parsing errors
//! - [`SchemaError`] - required columns missing from the upload
//! - [`ExportError`] - spreadsheet report generation errors
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Note the deliberate asymmetry: a missing column is a hard
//! [`SchemaError`], while an unparseable grade cell is not an error at
//! all (it normalizes to 0, see [`crate::schema::normalize_grade`]).

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV decoding and parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode bytes with the detected encoding.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format: {0}")]
    Parse(String),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(e: csv::Error) -> Self {
        CsvError::Parse(e.to_string())
    }
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Required columns are missing from the uploaded table.
///
/// Carries the exact list of missing header names so the caller can show
/// which columns to fix. This error short-circuits the whole pipeline:
/// no partial analysis is produced on a malformed upload.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Missing required columns: {}", missing.join(", "))]
pub struct SchemaError {
    /// Exact names of the absent columns, in configured order.
    pub missing: Vec<String>,
}

impl SchemaError {
    pub fn new(missing: Vec<String>) -> Self {
        Self { missing }
    }
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while building the multi-sheet spreadsheet artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Workbook construction failed.
    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// Failed to write the artifact to disk.
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by
/// [`crate::analysis::pipeline::analyze_bytes`]. It wraps all
/// lower-level errors and adds pipeline-specific variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV decoding or parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Required columns missing.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Report generation error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Invalid analysis configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// No data rows in the upload.
    #[error("No enrollment rows to analyze")]
    EmptyInput,
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for schema validation.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> PipelineError
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // SchemaError -> PipelineError
        let schema_err = SchemaError::new(vec!["학번".into(), "학기".into()]);
        let pipeline_err: PipelineError = schema_err.into();
        assert!(pipeline_err.to_string().contains("학번"));
        assert!(pipeline_err.to_string().contains("학기"));
    }

    #[test]
    fn test_schema_error_lists_every_missing_column() {
        let err = SchemaError::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(err.missing.len(), 3);
        assert_eq!(err.to_string(), "Missing required columns: a, b, c");
    }
}
