//! Subject order resolution.
//!
//! Course names carry a domain-defined display order, not an
//! alphabetical one: the configured priority list comes first, then any
//! subject observed in the file but absent from the list, in
//! first-encounter order. This total order is the only way subjects are
//! compared anywhere downstream.

use crate::models::EnrollmentRecord;
use std::collections::HashMap;

/// A total ordering over subject names.
#[derive(Debug, Clone)]
pub struct SubjectOrder {
    order: Vec<String>,
    ranks: HashMap<String, usize>,
}

impl SubjectOrder {
    /// Build the ordering from the configured priority list and the
    /// subjects observed in the raw (pre-sort) table.
    ///
    /// Observed subjects not in the priority list are appended in order
    /// of first appearance. Resolving again over the same observations
    /// yields the same ordering.
    pub fn resolve(priority: &[String], records: &[EnrollmentRecord]) -> Self {
        let mut order: Vec<String> = Vec::with_capacity(priority.len());
        let mut ranks: HashMap<String, usize> = HashMap::with_capacity(priority.len());

        for subject in priority {
            if !ranks.contains_key(subject) {
                ranks.insert(subject.clone(), order.len());
                order.push(subject.clone());
            }
        }

        for record in records {
            if !ranks.contains_key(&record.subject) {
                ranks.insert(record.subject.clone(), order.len());
                order.push(record.subject.clone());
            }
        }

        Self { order, ranks }
    }

    /// Sort rank of a subject. Subjects outside the resolved set sort
    /// last.
    pub fn rank(&self, subject: &str) -> usize {
        self.ranks.get(subject).copied().unwrap_or(self.order.len())
    }

    /// All subjects in order (priority prefix first).
    pub fn subjects(&self) -> &[String] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(subject: &str) -> EnrollmentRecord {
        EnrollmentRecord {
            student_id: "S".to_string(),
            grade: 1,
            subject: subject.to_string(),
            section: "A".to_string(),
            semester: "1".to_string(),
        }
    }

    #[test]
    fn test_priority_prefix_then_first_seen() {
        let priority = vec!["B".to_string(), "A".to_string()];
        let records = vec![record("Z"), record("A"), record("Y"), record("Z")];
        let order = SubjectOrder::resolve(&priority, &records);

        assert_eq!(order.subjects(), ["B", "A", "Z", "Y"]);
        assert!(order.rank("B") < order.rank("A"));
        assert!(order.rank("A") < order.rank("Z"));
        assert!(order.rank("Z") < order.rank("Y"));
    }

    #[test]
    fn test_unseen_priority_subjects_still_ranked() {
        let priority = vec!["P1".to_string(), "P2".to_string()];
        let order = SubjectOrder::resolve(&priority, &[record("X")]);
        assert_eq!(order.rank("P2"), 1);
        assert_eq!(order.rank("X"), 2);
    }

    #[test]
    fn test_unknown_subject_sorts_last() {
        let order = SubjectOrder::resolve(&["A".to_string()], &[]);
        assert!(order.rank("missing") > order.rank("A"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let priority = vec!["B".to_string()];
        let records = vec![record("C"), record("A"), record("C")];
        let first = SubjectOrder::resolve(&priority, &records);
        let second = SubjectOrder::resolve(&priority, &records);
        assert_eq!(first.subjects(), second.subjects());
    }
}
