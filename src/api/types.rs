//! REST API types for the presentation layer.
//!
//! The page that renders these is a stateless external caller: it sends
//! one uploaded file, receives immutable result tables and metrics, and
//! never reaches into pipeline internals.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::models::{EnrollmentRecord, HeadlineMetrics, Section, SummaryRow};

/// Response sent after a CSV upload and analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Unique job identifier.
    pub job_id: String,

    /// Always "ok" for a completed analysis; errors use
    /// [`error_response`] instead.
    pub status: String,

    /// The five headline numbers for the metric tiles.
    pub metrics: MetricsDto,

    /// Canonical roster (deduplicated, in sort order).
    pub roster: Vec<RecordDto>,

    /// First-year subset of the roster.
    pub freshmen: Vec<RecordDto>,

    /// Distinct offered sections.
    pub sections: Vec<SectionDto>,

    /// Per-subject summary rows plus the totals row.
    pub summary: Vec<SummaryRowDto>,
    pub totals: SummaryRowDto,

    /// Metadata about the upload.
    pub metadata: ResponseMetadata,
}

/// Headline metric tiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDto {
    pub total_rows: usize,
    pub unique_students: usize,
    pub freshman_students: usize,
    pub subject_count: usize,
    pub total_sections: usize,
}

/// One canonical-roster row with its 1-based display index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDto {
    pub index: usize,
    pub student_id: String,
    pub grade: u32,
    pub subject: String,
    pub section: String,
    pub semester: String,
}

/// One offered section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDto {
    pub subject: String,
    pub semester: String,
    pub section: String,
}

/// One summary row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRowDto {
    pub subject: String,
    pub sections: usize,
    pub total: usize,
    pub freshmen: usize,
}

/// Metadata about the analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub generated_at: String,
    pub csv_info: CsvMetadata,
}

/// CSV file metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvMetadata {
    pub encoding: String,
    pub delimiter: String,
    pub row_count: usize,
    pub columns: Vec<String>,
}

fn record_dto(index: usize, record: &EnrollmentRecord) -> RecordDto {
    RecordDto {
        index,
        student_id: record.student_id.clone(),
        grade: record.grade,
        subject: record.subject.clone(),
        section: record.section.clone(),
        semester: record.semester.clone(),
    }
}

fn summary_row_dto(row: &SummaryRow) -> SummaryRowDto {
    SummaryRowDto {
        subject: row.subject.clone(),
        sections: row.sections,
        total: row.total,
        freshmen: row.freshmen,
    }
}

fn section_dto(section: &Section) -> SectionDto {
    SectionDto {
        subject: section.subject.clone(),
        semester: section.semester.clone(),
        section: section.section.clone(),
    }
}

fn metrics_dto(m: &HeadlineMetrics) -> MetricsDto {
    MetricsDto {
        total_rows: m.total_rows,
        unique_students: m.unique_students,
        freshman_students: m.freshman_students,
        subject_count: m.subject_count,
        total_sections: m.total_sections,
    }
}

impl From<AnalysisResult> for AnalyzeResponse {
    fn from(result: AnalysisResult) -> Self {
        AnalyzeResponse {
            job_id: Uuid::new_v4().to_string(),
            status: "ok".to_string(),
            metrics: metrics_dto(&result.metrics),
            roster: result
                .roster
                .iter()
                .enumerate()
                .map(|(i, r)| record_dto(i + 1, r))
                .collect(),
            freshmen: result
                .freshmen
                .iter()
                .enumerate()
                .map(|(i, r)| record_dto(i + 1, r))
                .collect(),
            sections: result.sections.iter().map(section_dto).collect(),
            summary: result.summary.rows.iter().map(summary_row_dto).collect(),
            totals: summary_row_dto(&result.summary.totals),
            metadata: ResponseMetadata {
                generated_at: Utc::now().to_rfc3339(),
                csv_info: CsvMetadata {
                    encoding: result.csv_info.encoding,
                    delimiter: result.csv_info.delimiter.to_string(),
                    row_count: result.csv_info.row_count,
                    columns: result.csv_info.headers,
                },
            },
        }
    }
}

/// Generic error payload with the column-name hint the original report
/// page showed its users.
pub fn error_response(message: &str) -> Value {
    json!({
        "status": "error",
        "message": message,
        "hint": "데이터 파일의 컬럼명('학번', '학년(수강시점)', '교과목명', '분반', '학기')을 확인해주세요.",
    })
}

/// Error payload for a schema failure, naming the exact missing columns.
pub fn schema_error_response(missing: &[String]) -> Value {
    json!({
        "status": "error",
        "message": format!("Missing required columns: {}", missing.join(", ")),
        "missingColumns": missing,
    })
}
