//! # Enrollstat - course enrollment roster cleaning and statistics
//!
//! Enrollstat ingests a tabular roster of course enrollments (one row
//! per student-per-course-registration) and produces deduplicated
//! rosters, per-subject summary statistics, and a multi-sheet Excel
//! report.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│   Analysis   │────▶│ XLSX Report │
//! │ (UTF8/CP949)│     │ (auto-enc)  │     │ (sort/dedup/ │     │  (4 sheets) │
//! └─────────────┘     └─────────────┘     │  aggregate)  │     └─────────────┘
//!                                         └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use enrollstat::{analyze_bytes, write_report, ReportConfig};
//!
//! let config = ReportConfig::default();
//! let result = analyze_bytes(&bytes, &config)?;
//! println!("{} distinct completers", result.metrics.unique_students);
//! let xlsx = write_report(&result, &config)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (EnrollmentRecord, SummaryTable, ReportConfig)
//! - [`parser`] - CSV parsing with encoding/delimiter auto-detection
//! - [`schema`] - Required-column validation and grade normalization
//! - [`analysis`] - Sort, dedup, section extraction, aggregation
//! - [`export`] - Multi-sheet xlsx report
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Schema validation & record loading
pub mod schema;

// Analysis pipeline
pub mod analysis;

// Report export
pub mod export;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, ExportError, PipelineError, SchemaError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    ColumnSpec, DedupKey, EnrollmentRecord, HeadlineMetrics, ReportConfig, Section, SortField,
    SummaryRow, SummaryTable,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_file_auto,
    parse_str, ParseResult,
};

// =============================================================================
// Re-exports - Schema
// =============================================================================

pub use schema::{load_records, normalize_grade, required_columns, validate_columns};

// =============================================================================
// Re-exports - Analysis
// =============================================================================

pub use analysis::{
    analyze_bytes, analyze_file, analyze_records, deduplicate, extract_sections,
    headline_metrics, summarize, AnalysisResult, CsvInfo, SubjectOrder,
};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::{
    write_report, write_report_file, REPORT_FILE_NAME, REPORT_MIME_TYPE, SHEET_FRESHMEN,
    SHEET_ROSTER, SHEET_SECTIONS, SHEET_SUMMARY,
};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, schema_error_response, AnalyzeResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
