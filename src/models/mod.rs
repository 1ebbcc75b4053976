//! Domain models for the enrollment analysis pipeline.
//!
//! This module contains the core data structures used throughout the
//! pipeline:
//!
//! - [`EnrollmentRecord`] - one (student, course offering) observation
//! - [`Section`] - a distinct offered (subject, semester, section) triple
//! - [`SummaryRow`] / [`SummaryTable`] - per-subject statistics
//! - [`HeadlineMetrics`] - the five scalar headline numbers
//! - [`ReportConfig`] / [`ColumnSpec`] - the analysis policy object
//!   (dedup key, sort key order, column names, subject priority list)
//!
//! Every transformation stage produces derived copies; nothing mutates a
//! previous stage's table in place.

use serde::{Deserialize, Serialize};

// =============================================================================
// Enrollment Record
// =============================================================================

/// One enrollment row: a student observed in a course offering.
///
/// The grade level is already normalized to an integer at load time
/// (`"1학년"` → 1, unparseable → 0). `semester` is empty when the report
/// variant carries no term column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrollmentRecord {
    /// Student identifier. Not necessarily unique per file.
    pub student_id: String,
    /// Normalized grade level (0 = unknown).
    pub grade: u32,
    /// Course name.
    pub subject: String,
    /// Section label within the course.
    pub section: String,
    /// Term/semester label (may be empty).
    pub semester: String,
}

// =============================================================================
// Section
// =============================================================================

/// A distinct offered course section: (subject, semester, section).
///
/// Represents "what was actually offered", independent of who enrolled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Section {
    pub subject: String,
    pub semester: String,
    pub section: String,
}

// =============================================================================
// Summary Table
// =============================================================================

/// Per-subject statistics row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryRow {
    /// Course name (or the totals sentinel label for the totals row).
    pub subject: String,
    /// Number of distinct sections offered.
    pub sections: usize,
    /// Enrollees after deduplication.
    pub total: usize,
    /// First-year enrollees after deduplication.
    pub freshmen: usize,
}

/// The per-subject summary with an appended totals row.
///
/// Rows cover every subject present in either the section catalog or the
/// canonical roster (outer-join semantics: the missing side is 0), in
/// subject-order. `totals` holds the column-wise sums with the sentinel
/// label in place of a course name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
    pub totals: SummaryRow,
}

// =============================================================================
// Headline Metrics
// =============================================================================

/// The five scalar headline numbers shown above the tables.
///
/// One fixed definition per metric (the source variants disagree; see
/// DESIGN.md):
///
/// - `total_rows`: raw enrollment rows in the upload (pre-dedup);
/// - `unique_students`: distinct student ids in the canonical roster;
/// - `freshman_students`: distinct first-year student ids in the roster;
/// - `subject_count`: non-total rows in the summary table;
/// - `total_sections`: sum of the summary sections column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadlineMetrics {
    pub total_rows: usize,
    pub unique_students: usize,
    pub freshman_students: usize,
    pub subject_count: usize,
    pub total_sections: usize,
}

// =============================================================================
// Deduplication Key
// =============================================================================

/// Uniqueness key for roster deduplication.
///
/// The single most consequential policy choice in the system:
/// student-id-only answers "how many distinct humans completed at least
/// one course", student-id + subject answers "how many (student, course)
/// completions occurred".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DedupKey {
    /// One row per distinct student id.
    #[default]
    StudentId,
    /// One row per distinct (student id, subject) pair.
    StudentAndSubject,
}

impl DedupKey {
    /// Parse from a CLI/config code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "student" | "student-id" | "student_id" | "id" => Some(Self::StudentId),
            "student-subject" | "student_and_subject" | "id-subject" => {
                Some(Self::StudentAndSubject)
            }
            _ => None,
        }
    }

    pub fn to_code(self) -> &'static str {
        match self {
            Self::StudentId => "student-id",
            Self::StudentAndSubject => "student-subject",
        }
    }
}

// =============================================================================
// Sort Key
// =============================================================================

/// A field of the composite sort key. All fields sort ascending.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Grade,
    Subject,
    Semester,
}

// =============================================================================
// Column Specification
// =============================================================================

/// Exact header names identifying the input columns.
///
/// Column presence is checked by exact string match; there is no schema
/// versioning. Defaults follow the university export this tool was built
/// for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnSpec {
    pub student_id: String,
    pub grade: String,
    pub subject: String,
    pub section: String,
    pub semester: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            student_id: "학번".to_string(),
            grade: "학년(수강시점)".to_string(),
            subject: "교과목명".to_string(),
            section: "분반".to_string(),
            semester: "학기".to_string(),
        }
    }
}

// =============================================================================
// Report Configuration
// =============================================================================

/// The analysis policy object.
///
/// Earlier versions of this tool existed as a handful of slightly
/// diverging scripts. Their differences (dedup key, sort key order,
/// whether a term column is required) are policy, not architecture, so
/// they live here as one explicit configuration struct and the pipeline
/// exists exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// Input column names.
    pub columns: ColumnSpec,
    /// Fixed subject priority prefix for the sort order. Subjects not
    /// listed here sort after, in first-observed order.
    pub subject_priority: Vec<String>,
    /// Roster uniqueness key.
    pub dedup_key: DedupKey,
    /// Composite sort key, highest priority first.
    pub sort_keys: Vec<SortField>,
    /// Whether the semester column must be present.
    pub require_semester: bool,
    /// Sentinel course-name label for the summary totals row.
    pub total_label: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            columns: ColumnSpec::default(),
            subject_priority: [
                "컴퓨팅사고와인공지능",
                "기초컴퓨터프로그래밍",
                "IT환경에서의개인정보보호",
                "멀티미디어의이해와활용",
                "디지털리터러시의 이해와 활용",
                "컴퓨터 시뮬레이션",
                "컴퓨터프로그래밍입문",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            dedup_key: DedupKey::StudentId,
            sort_keys: vec![SortField::Grade, SortField::Subject],
            require_semester: true,
            total_label: "합계".to_string(),
        }
    }
}

impl ReportConfig {
    /// Deserialize a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a config from a JSON file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

// =============================================================================
// Tests
// =============================================================================
