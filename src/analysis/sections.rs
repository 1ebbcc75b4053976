//! Section catalog extraction.
//!
//! Projects the sorted table onto (subject, semester, section) and drops
//! exact-duplicate triples. Extraction happens before enrollment-level
//! deduplication, so a section whose every enrollee later collapses into
//! another row of the canonical roster is still counted as offered.

use super::order::SubjectOrder;
use crate::models::{EnrollmentRecord, Section};
use std::collections::HashSet;

/// Extract the distinct offered sections, presentation-sorted by
/// (subject order, semester, section label).
pub fn extract_sections(records: &[EnrollmentRecord], order: &SubjectOrder) -> Vec<Section> {
    let mut seen: HashSet<Section> = HashSet::new();
    let mut sections: Vec<Section> = Vec::new();

    for record in records {
        let section = Section {
            subject: record.subject.clone(),
            semester: record.semester.clone(),
            section: record.section.clone(),
        };
        if seen.insert(section.clone()) {
            sections.push(section);
        }
    }

    sections.sort_by(|a, b| {
        order
            .rank(&a.subject)
            .cmp(&order.rank(&b.subject))
            .then_with(|| a.semester.cmp(&b.semester))
            .then_with(|| a.section.cmp(&b.section))
    });

    sections
}
