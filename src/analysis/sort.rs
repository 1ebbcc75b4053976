//! Stable composite-key row sorting.
//!
//! The key composition (and its priority order) is configuration, not
//! code: the default variant sorts by (grade, subject order), the richer
//! variant by (semester, grade, subject order). Rows equal on every key
//! field keep their original relative order, which matters because the
//! deduplicator keeps the first row per key.

use super::order::SubjectOrder;
use crate::models::{EnrollmentRecord, SortField};
use std::cmp::Ordering;

/// Produce a new table sorted by the configured composite key, all
/// fields ascending. No rows are dropped or altered.
pub fn sorted(
    records: &[EnrollmentRecord],
    keys: &[SortField],
    order: &SubjectOrder,
) -> Vec<EnrollmentRecord> {
    let mut out = records.to_vec();
    // Vec::sort_by is stable
    out.sort_by(|a, b| compare(a, b, keys, order));
    out
}

fn compare(
    a: &EnrollmentRecord,
    b: &EnrollmentRecord,
    keys: &[SortField],
    order: &SubjectOrder,
) -> Ordering {
    for key in keys {
        let ord = match key {
            SortField::Grade => a.grade.cmp(&b.grade),
            SortField::Subject => order.rank(&a.subject).cmp(&order.rank(&b.subject)),
            SortField::Semester => a.semester.cmp(&b.semester),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, grade: u32, subject: &str, semester: &str) -> EnrollmentRecord {
        EnrollmentRecord {
            student_id: id.to_string(),
            grade,
            subject: subject.to_string(),
            section: "A".to_string(),
            semester: semester.to_string(),
        }
    }

    #[test]
    fn test_sort_by_grade_then_subject_order() {
        let records = vec![
            record("S1", 2, "B", "1"),
            record("S2", 1, "B", "1"),
            record("S3", 1, "A", "1"),
        ];
        let order = SubjectOrder::resolve(&["A".to_string(), "B".to_string()], &records);
        let sorted = sorted(
            &records,
            &[SortField::Grade, SortField::Subject],
            &order,
        );

        let ids: Vec<&str> = sorted.iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, ["S3", "S2", "S1"]);
    }

    #[test]
    fn test_subject_sorts_by_resolved_order_not_alphabet() {
        let records = vec![record("S1", 1, "Alpha", "1"), record("S2", 1, "Zeta", "1")];
        // Zeta is prioritized ahead of Alpha
        let order = SubjectOrder::resolve(&["Zeta".to_string()], &records);
        let sorted = sorted(&records, &[SortField::Subject], &order);
        assert_eq!(sorted[0].student_id, "S2");
    }

    #[test]
    fn test_semester_key_variant() {
        let records = vec![
            record("S1", 1, "A", "2024-2"),
            record("S2", 1, "A", "2024-1"),
        ];
        let order = SubjectOrder::resolve(&[], &records);
        let sorted = sorted(
            &records,
            &[SortField::Semester, SortField::Grade, SortField::Subject],
            &order,
        );
        assert_eq!(sorted[0].student_id, "S2");
    }

    #[test]
    fn test_stable_on_equal_keys() {
        let records = vec![
            record("first", 1, "A", "1"),
            record("second", 1, "A", "1"),
            record("third", 1, "A", "1"),
        ];
        let order = SubjectOrder::resolve(&[], &records);
        let sorted = sorted(&records, &[SortField::Grade, SortField::Subject], &order);
        let ids: Vec<&str> = sorted.iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn test_no_rows_dropped() {
        let records = vec![record("a", 3, "X", "1"), record("b", 1, "X", "1")];
        let order = SubjectOrder::resolve(&[], &records);
        assert_eq!(sorted(&records, &[SortField::Grade], &order).len(), 2);
    }
}
