//! Schema validation and typed-record loading.
//!
//! Checks that the configured columns are present (exact string match)
//! and converts raw rows into [`EnrollmentRecord`]s.
//!
//! # Validation policy
//!
//! Strict on structure, lenient on content: a missing column halts the
//! whole pipeline with a [`SchemaError`] naming the absent headers, but
//! a grade cell that fails to parse silently normalizes to 0. Grade is a
//! best-effort signal, not an integrity field, and malformed grade text
//! must never abort an analysis run.

use crate::error::{SchemaError, SchemaResult};
use crate::models::{EnrollmentRecord, ReportConfig};
use crate::parser::ParseResult;
use once_cell::sync::Lazy;
use regex::Regex;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// The column names a given configuration requires, in display order.
pub fn required_columns(config: &ReportConfig) -> Vec<&str> {
    let cols = &config.columns;
    let mut required = vec![
        cols.student_id.as_str(),
        cols.grade.as_str(),
        cols.subject.as_str(),
        cols.section.as_str(),
    ];
    if config.require_semester {
        required.push(cols.semester.as_str());
    }
    required
}

/// Verify that every required column is present in `headers`.
///
/// On failure the error lists exactly the missing names; nothing
/// downstream runs on a malformed upload.
pub fn validate_columns(headers: &[String], config: &ReportConfig) -> SchemaResult<()> {
    let missing: Vec<String> = required_columns(config)
        .into_iter()
        .filter(|required| !headers.iter().any(|h| h == required))
        .map(String::from)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::new(missing))
    }
}

/// Normalize free-text grade level to an integer.
///
/// Extracts the first run of decimal digits: `"1학년"` → 1, `"4"` → 4.
/// Absent or unparseable values normalize to 0, never an error.
pub fn normalize_grade(raw: &str) -> u32 {
    DIGITS
        .find(raw)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0)
}

/// Validate the headers and build typed records from the raw table.
///
/// The semester field is filled from the term column when present in the
/// file, even if the configuration does not require it; otherwise it is
/// left empty.
pub fn load_records(parsed: &ParseResult, config: &ReportConfig) -> SchemaResult<Vec<EnrollmentRecord>> {
    validate_columns(&parsed.headers, config)?;

    let index_of = |name: &str| parsed.headers.iter().position(|h| h == name);

    let cols = &config.columns;
    // Presence is guaranteed by validate_columns for required columns.
    let id_idx = index_of(&cols.student_id).expect("validated column");
    let grade_idx = index_of(&cols.grade).expect("validated column");
    let subject_idx = index_of(&cols.subject).expect("validated column");
    let section_idx = index_of(&cols.section).expect("validated column");
    let semester_idx = index_of(&cols.semester);

    let records = parsed
        .rows
        .iter()
        .map(|row| EnrollmentRecord {
            student_id: row[id_idx].clone(),
            grade: normalize_grade(&row[grade_idx]),
            subject: row[subject_idx].clone(),
            section: row[section_idx].clone(),
            semester: semester_idx.map(|i| row[i].clone()).unwrap_or_default(),
        })
        .collect();

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnSpec;

    fn parsed(headers: &[&str], rows: &[&[&str]]) -> ParseResult {
        ParseResult {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            encoding: "utf-8".to_string(),
            delimiter: ',',
        }
    }

    #[test]
    fn test_normalize_grade() {
        assert_eq!(normalize_grade("1학년"), 1);
        assert_eq!(normalize_grade("4"), 4);
        assert_eq!(normalize_grade(""), 0);
        assert_eq!(normalize_grade("휴학"), 0);
        assert_eq!(normalize_grade("  2학년 "), 2);
        assert_eq!(normalize_grade("3-1"), 3);
    }

    #[test]
    fn test_normalize_grade_never_panics_on_noise() {
        for raw in ["!!", "학년", "0x1F", "١٢٣", "grade one", "9999999999999999999"] {
            let _ = normalize_grade(raw);
        }
        // Digit runs too large for u32 fall back to 0
        assert_eq!(normalize_grade("9999999999999999999"), 0);
    }

    #[test]
    fn test_validate_columns_ok() {
        let config = ReportConfig::default();
        let headers: Vec<String> = ["학번", "학년(수강시점)", "교과목명", "분반", "학기"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(validate_columns(&headers, &config).is_ok());
    }

    #[test]
    fn test_validate_columns_names_exactly_the_missing() {
        let config = ReportConfig::default();
        let headers: Vec<String> = ["학번", "교과목명"].iter().map(|s| s.to_string()).collect();
        let err = validate_columns(&headers, &config).unwrap_err();
        assert_eq!(err.missing, vec!["학년(수강시점)", "분반", "학기"]);
    }

    #[test]
    fn test_semester_optional_when_not_required() {
        let config = ReportConfig {
            require_semester: false,
            ..Default::default()
        };
        let table = parsed(
            &["학번", "학년(수강시점)", "교과목명", "분반"],
            &[&["S1", "1학년", "컴퓨터 시뮬레이션", "A"]],
        );
        let records = load_records(&table, &config).unwrap();
        assert_eq!(records[0].semester, "");
        assert_eq!(records[0].grade, 1);
    }

    #[test]
    fn test_load_records_halts_on_missing_column() {
        let config = ReportConfig::default();
        let table = parsed(&["학번"], &[&["S1"]]);
        assert!(load_records(&table, &config).is_err());
    }

    #[test]
    fn test_load_records_builds_typed_rows() {
        let config = ReportConfig::default();
        let table = parsed(
            &["학기", "학번", "학년(수강시점)", "교과목명", "분반"],
            &[
                &["2024-1", "20240001", "1학년", "기초컴퓨터프로그래밍", "01"],
                &["2024-2", "20230042", "2", "컴퓨팅사고와인공지능", "03"],
            ],
        );
        let records = load_records(&table, &config).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].student_id, "20240001");
        assert_eq!(records[0].grade, 1);
        assert_eq!(records[1].semester, "2024-2");
        assert_eq!(records[1].section, "03");
    }

    #[test]
    fn test_renamed_columns_via_config() {
        let config = ReportConfig {
            columns: ColumnSpec {
                student_id: "id".into(),
                grade: "year".into(),
                subject: "course".into(),
                section: "sec".into(),
                semester: "term".into(),
            },
            ..Default::default()
        };
        let table = parsed(
            &["id", "year", "course", "sec", "term"],
            &[&["S1", "3", "CS101", "A", "Fall"]],
        );
        let records = load_records(&table, &config).unwrap();
        assert_eq!(records[0].subject, "CS101");
        assert_eq!(records[0].grade, 3);
    }
}
