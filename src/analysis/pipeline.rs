//! High-level pipeline API: uploaded bytes in, analysis tables out.
//!
//! Combines every stage in fixed order:
//!
//! ```text
//! bytes → parse → validate columns → normalize → resolve subject order
//!       → sort → {section catalog, canonical roster} → summary → metrics
//! ```
//!
//! One synchronous pass per upload, fresh tables every run, nothing
//! shared between runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use enrollstat::{analyze_bytes, ReportConfig};
//!
//! let result = analyze_bytes(&bytes, &ReportConfig::default())?;
//! println!("{} distinct completers", result.metrics.unique_students);
//! ```

use serde::Serialize;
use std::path::Path;

use super::aggregate::{headline_metrics, summarize};
use super::dedup::deduplicate;
use super::order::SubjectOrder;
use super::sections::extract_sections;
use super::sort::sorted;
use crate::api::logs::{log_info, log_success};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{EnrollmentRecord, HeadlineMetrics, ReportConfig, Section, SummaryTable};
use crate::parser::{parse_bytes_auto, parse_file_auto, ParseResult};
use crate::schema::load_records;

/// Parsing metadata echoed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Canonical roster after deduplication, in sort order.
    pub roster: Vec<EnrollmentRecord>,
    /// First-year subset of the canonical roster.
    pub freshmen: Vec<EnrollmentRecord>,
    /// Distinct offered sections, presentation-sorted.
    pub sections: Vec<Section>,
    /// Per-subject summary with totals row.
    pub summary: SummaryTable,
    /// The five headline numbers.
    pub metrics: HeadlineMetrics,
    /// Input parsing metadata.
    pub csv_info: CsvInfo,
}

/// Analyze an uploaded CSV, auto-detecting encoding and delimiter.
///
/// This is the main entry point and the whole contract with the
/// presentation layer: raw tabular bytes in, result tables (or a
/// validation error) out.
pub fn analyze_bytes(bytes: &[u8], config: &ReportConfig) -> PipelineResult<AnalysisResult> {
    let parsed = parse_bytes_auto(bytes)?;
    analyze_parsed(parsed, config)
}

/// Analyze a CSV file on disk.
pub fn analyze_file(path: &Path, config: &ReportConfig) -> PipelineResult<AnalysisResult> {
    let parsed = parse_file_auto(path)?;
    analyze_parsed(parsed, config)
}

/// Internal: run the pipeline over an already-parsed table.
fn analyze_parsed(parsed: ParseResult, config: &ReportConfig) -> PipelineResult<AnalysisResult> {
    log_info("Reading uploaded table...");
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!(
        "Detected delimiter: '{}'",
        format_delimiter(parsed.delimiter)
    ));
    log_success(format!("Read {} rows", parsed.rows.len()));

    let csv_info = CsvInfo {
        encoding: parsed.encoding.clone(),
        delimiter: parsed.delimiter,
        headers: parsed.headers.clone(),
        row_count: parsed.rows.len(),
    };

    // Column check first; nothing below runs on a malformed upload.
    log_info("Checking required columns...");
    let records = load_records(&parsed, config)?;
    log_success(format!(
        "Columns present: {}",
        crate::schema::required_columns(config).join(", ")
    ));

    if records.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    Ok(analyze_records(records, csv_info, config))
}

/// Run the analysis stages over typed records.
///
/// Exposed separately so callers that already hold records (tests, other
/// front ends) can skip the parsing layer.
pub fn analyze_records(
    records: Vec<EnrollmentRecord>,
    csv_info: CsvInfo,
    config: &ReportConfig,
) -> AnalysisResult {
    let raw_row_count = records.len();

    // Subject order resolves against the raw, pre-sort table: the
    // tie-break for non-priority subjects is first appearance there.
    let order = SubjectOrder::resolve(&config.subject_priority, &records);
    log_info(format!("Subject order: {} subjects", order.subjects().len()));

    let sorted_records = sorted(&records, &config.sort_keys, &order);

    log_info("Extracting offered sections...");
    let sections = extract_sections(&sorted_records, &order);
    log_success(format!("{} distinct sections", sections.len()));

    log_info(format!(
        "Deduplicating roster (key: {})...",
        config.dedup_key.to_code()
    ));
    let roster = deduplicate(&sorted_records, config.dedup_key);
    log_success(format!(
        "{} rows kept of {}",
        roster.len(),
        sorted_records.len()
    ));

    let freshmen: Vec<EnrollmentRecord> =
        roster.iter().filter(|r| r.grade == 1).cloned().collect();

    log_info("Building summary table...");
    let summary = summarize(&sections, &roster, &order, &config.total_label);
    let metrics = headline_metrics(raw_row_count, &roster, &summary);
    log_success(format!(
        "{} subjects, {} sections, {} completers",
        metrics.subject_count, metrics.total_sections, metrics.unique_students
    ));

    AnalysisResult {
        roster,
        freshmen,
        sections,
        summary,
        metrics,
        csv_info,
    }
}

/// Format delimiter for display.
pub(crate) fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, SchemaError};
    use crate::models::DedupKey;

    fn csv(rows: &str) -> String {
        format!("학번,학년(수강시점),교과목명,분반,학기\n{rows}")
    }

    #[test]
    fn test_worked_example() {
        // S1 registered twice in the same section; dedup key = student id
        let input = csv("S1,1,CS101,A,Fall\nS1,1,CS101,A,Fall\nS2,2,CS101,B,Fall");
        let result = analyze_bytes(input.as_bytes(), &ReportConfig::default()).unwrap();

        assert_eq!(result.roster.len(), 2);
        let ids: Vec<&str> = result.roster.iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, ["S1", "S2"]);

        assert_eq!(result.sections.len(), 2);

        assert_eq!(result.summary.rows.len(), 1);
        let row = &result.summary.rows[0];
        assert_eq!(row.subject, "CS101");
        assert_eq!(row.sections, 2);
        assert_eq!(row.total, 2);
        assert_eq!(row.freshmen, 1);

        assert_eq!(result.summary.totals.sections, 2);
        assert_eq!(result.summary.totals.total, 2);
        assert_eq!(result.summary.totals.freshmen, 1);

        assert_eq!(result.metrics.total_rows, 3);
        assert_eq!(result.metrics.unique_students, 2);
        assert_eq!(result.metrics.freshman_students, 1);
    }

    #[test]
    fn test_missing_columns_halt_with_exact_names() {
        let input = "학번,교과목명\nS1,CS101";
        let err = analyze_bytes(input.as_bytes(), &ReportConfig::default()).unwrap_err();
        match err {
            PipelineError::Schema(SchemaError { missing }) => {
                assert_eq!(missing, vec!["학년(수강시점)", "분반", "학기"]);
            }
            other => panic!("expected schema error, got {other}"),
        }
    }

    #[test]
    fn test_header_only_upload_is_empty_input() {
        let input = "학번,학년(수강시점),교과목명,분반,학기\n";
        let err = analyze_bytes(input.as_bytes(), &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }

    #[test]
    fn test_dedup_keeps_row_that_sorts_first() {
        // S1 appears as grade 2 first in the file and grade 1 later; the
        // grade-1 registration sorts first and is the one kept.
        let input = csv("S1,2,CS101,A,Fall\nS1,1학년,CS102,B,Fall");
        let result = analyze_bytes(input.as_bytes(), &ReportConfig::default()).unwrap();

        assert_eq!(result.roster.len(), 1);
        assert_eq!(result.roster[0].grade, 1);
        assert_eq!(result.roster[0].subject, "CS102");
        assert_eq!(result.freshmen.len(), 1);
    }

    #[test]
    fn test_student_subject_mode_end_to_end() {
        let config = ReportConfig {
            dedup_key: DedupKey::StudentAndSubject,
            ..Default::default()
        };
        let input = csv("S1,1,CS101,A,Fall\nS1,1,CS102,A,Fall\nS1,1,CS101,B,Fall");
        let result = analyze_bytes(input.as_bytes(), &config).unwrap();

        // One row per (student, subject) pair
        assert_eq!(result.roster.len(), 2);
        // But the student is still a single distinct completer
        assert_eq!(result.metrics.unique_students, 1);
        assert_eq!(result.metrics.total_rows, 3);
    }

    #[test]
    fn test_csv_info_echoed() {
        let input = csv("S1,1,CS101,A,Fall");
        let result = analyze_bytes(input.as_bytes(), &ReportConfig::default()).unwrap();

        assert_eq!(result.csv_info.delimiter, ',');
        assert_eq!(result.csv_info.row_count, 1);
        assert_eq!(result.csv_info.headers.len(), 5);
    }

    #[test]
    fn test_priority_subjects_lead_the_summary() {
        let input = csv(
            "S1,1,양자컴퓨팅개론,A,1\n\
             S2,1,컴퓨팅사고와인공지능,A,1\n\
             S3,1,기초컴퓨터프로그래밍,A,1",
        );
        let result = analyze_bytes(input.as_bytes(), &ReportConfig::default()).unwrap();

        let subjects: Vec<&str> = result
            .summary
            .rows
            .iter()
            .map(|r| r.subject.as_str())
            .collect();
        assert_eq!(
            subjects,
            ["컴퓨팅사고와인공지능", "기초컴퓨터프로그래밍", "양자컴퓨팅개론"]
        );
    }
}
