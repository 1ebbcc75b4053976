//! Roster deduplication.
//!
//! Keeps the first row per uniqueness key value in the current sort
//! order, so the surviving registration for a multi-course student is
//! whichever sorted first, not whichever appeared first in the file.
//!
//! With [`DedupKey::StudentId`] a student taking several qualifying
//! courses is attributed to exactly one of them; that is the intended
//! reading ("how many distinct people completed at least one course"),
//! not a bug.

use crate::models::{DedupKey, EnrollmentRecord};
use std::collections::HashSet;

/// Produce the canonical roster: at most one row per key value, first
/// occurrence kept, input order preserved.
pub fn deduplicate(records: &[EnrollmentRecord], key: DedupKey) -> Vec<EnrollmentRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut roster = Vec::new();

    for record in records {
        let key_value = match key {
            DedupKey::StudentId => (record.student_id.clone(), String::new()),
            DedupKey::StudentAndSubject => {
                (record.student_id.clone(), record.subject.clone())
            }
        };
        if seen.insert(key_value) {
            roster.push(record.clone());
        }
    }

    roster
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, subject: &str) -> EnrollmentRecord {
        EnrollmentRecord {
            student_id: id.to_string(),
            grade: 1,
            subject: subject.to_string(),
            section: "A".to_string(),
            semester: "1".to_string(),
        }
    }

    #[test]
    fn test_student_id_mode_one_row_per_student() {
        let records = vec![
            record("S1", "CS101"),
            record("S1", "MA101"),
            record("S2", "CS101"),
            record("S1", "CS101"),
        ];
        let roster = deduplicate(&records, DedupKey::StudentId);

        assert_eq!(roster.len(), 2);
        // First occurrence wins: S1 stays attributed to CS101
        assert_eq!(roster[0].subject, "CS101");
        assert_eq!(roster[0].student_id, "S1");
        assert_eq!(roster[1].student_id, "S2");
    }

    #[test]
    fn test_student_and_subject_mode() {
        let records = vec![
            record("S1", "CS101"),
            record("S1", "MA101"),
            record("S1", "CS101"),
            record("S2", "CS101"),
        ];
        let roster = deduplicate(&records, DedupKey::StudentAndSubject);

        assert_eq!(roster.len(), 3);
        let pairs: Vec<(&str, &str)> = roster
            .iter()
            .map(|r| (r.student_id.as_str(), r.subject.as_str()))
            .collect();
        assert_eq!(pairs, [("S1", "CS101"), ("S1", "MA101"), ("S2", "CS101")]);
    }

    #[test]
    fn test_order_preserved() {
        let records = vec![record("b", "X"), record("a", "X"), record("c", "X")];
        let roster = deduplicate(&records, DedupKey::StudentId);
        let ids: Vec<&str> = roster.iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(deduplicate(&[], DedupKey::StudentId).is_empty());
    }
}
