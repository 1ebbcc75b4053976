//! Per-subject aggregation.
//!
//! Merges two per-subject groupings with outer-join semantics:
//!
//! - section catalog grouped by subject → distinct section count;
//! - canonical roster grouped by subject → enrollee count and
//!   first-year enrollee count.
//!
//! A subject present on only one side keeps its row with the other
//! side's counts filled as 0. A totals row (column-wise sums, sentinel
//! label in the subject column) is appended for display and export.
//!
//! Also derives the five headline metrics; their exact definitions are
//! documented on [`HeadlineMetrics`].

use super::order::SubjectOrder;
use crate::models::{EnrollmentRecord, HeadlineMetrics, Section, SummaryRow, SummaryTable};
use std::collections::{HashMap, HashSet};

/// Build the summary table from the section catalog and the canonical
/// roster.
pub fn summarize(
    sections: &[Section],
    roster: &[EnrollmentRecord],
    order: &SubjectOrder,
    total_label: &str,
) -> SummaryTable {
    let mut section_counts: HashMap<&str, usize> = HashMap::new();
    for section in sections {
        *section_counts.entry(section.subject.as_str()).or_default() += 1;
    }

    let mut enrollee_counts: HashMap<&str, usize> = HashMap::new();
    let mut freshman_counts: HashMap<&str, usize> = HashMap::new();
    for record in roster {
        *enrollee_counts.entry(record.subject.as_str()).or_default() += 1;
        if record.grade == 1 {
            *freshman_counts.entry(record.subject.as_str()).or_default() += 1;
        }
    }

    // Outer merge, ordered by subject rank. Only subjects with data on
    // at least one side get a row; unobserved priority subjects do not.
    let rows: Vec<SummaryRow> = order
        .subjects()
        .iter()
        .filter(|subject| {
            section_counts.contains_key(subject.as_str())
                || enrollee_counts.contains_key(subject.as_str())
        })
        .map(|subject| SummaryRow {
            subject: subject.clone(),
            sections: section_counts.get(subject.as_str()).copied().unwrap_or(0),
            total: enrollee_counts.get(subject.as_str()).copied().unwrap_or(0),
            freshmen: freshman_counts.get(subject.as_str()).copied().unwrap_or(0),
        })
        .collect();

    let totals = SummaryRow {
        subject: total_label.to_string(),
        sections: rows.iter().map(|r| r.sections).sum(),
        total: rows.iter().map(|r| r.total).sum(),
        freshmen: rows.iter().map(|r| r.freshmen).sum(),
    };

    SummaryTable { rows, totals }
}

/// Derive the headline metrics from the raw row count, the canonical
/// roster and the summary table.
pub fn headline_metrics(
    raw_row_count: usize,
    roster: &[EnrollmentRecord],
    summary: &SummaryTable,
) -> HeadlineMetrics {
    let unique_students: HashSet<&str> =
        roster.iter().map(|r| r.student_id.as_str()).collect();
    let freshman_students: HashSet<&str> = roster
        .iter()
        .filter(|r| r.grade == 1)
        .map(|r| r.student_id.as_str())
        .collect();

    HeadlineMetrics {
        total_rows: raw_row_count,
        unique_students: unique_students.len(),
        freshman_students: freshman_students.len(),
        subject_count: summary.rows.len(),
        total_sections: summary.totals.sections,
    }
}
