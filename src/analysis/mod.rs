//! The data-transformation pipeline.
//!
//! This module provides:
//! - `order`: subject total-order resolution (priority list + first-seen)
//! - `sort`: stable composite-key sorting
//! - `sections`: distinct offered-section extraction
//! - `dedup`: canonical roster deduplication
//! - `aggregate`: per-subject summary, totals row, headline metrics
//! - `pipeline`: orchestration from uploaded bytes to [`pipeline::AnalysisResult`]
//!
//! ## Stage order
//!
//! ```text
//! raw rows → validated → normalized → sorted → {roster, sections}
//!          → summary → metrics → export
//! ```
//!
//! Section extraction runs before deduplication on purpose: a section
//! whose enrollees all collapse away is still an offered section.

pub mod aggregate;
pub mod dedup;
pub mod order;
pub mod pipeline;
pub mod sections;
pub mod sort;

// Re-exports for convenience
pub use aggregate::{headline_metrics, summarize};
pub use dedup::deduplicate;
pub use order::SubjectOrder;
pub use pipeline::{analyze_bytes, analyze_file, analyze_records, AnalysisResult, CsvInfo};
pub use sections::extract_sections;
pub use sort::sorted;
