//! Demo library shipped with the app.
//!
//! Four notes and three documents across four subjects, with the manual
//! highlights the demo starts with.

use crate::model::item::{ItemKind, NewItem};
use chrono::NaiveDate;

struct DemoItem {
    kind: ItemKind,
    title: &'static str,
    subject: &'static str,
    last_modified: (i32, u32, u32),
    excerpt: &'static str,
    highlights: &'static [&'static str],
}

const DEMO_ITEMS: &[DemoItem] = &[
    DemoItem {
        kind: ItemKind::Note,
        title: "Lecture 1: DNA Replication",
        subject: "Molecular Biology",
        last_modified: (2024, 7, 20),
        excerpt: "Key enzymes: Helicase, Polymerase, Ligase...",
        highlights: &["DNA replication is semi-conservative."],
    },
    DemoItem {
        kind: ItemKind::Note,
        title: "SN1 vs SN2 Reactions",
        subject: "Organic Chemistry",
        last_modified: (2024, 7, 19),
        excerpt: "Comparison of reaction mechanisms, stereochemistry...",
        highlights: &[],
    },
    DemoItem {
        kind: ItemKind::Note,
        title: "The French Revolution",
        subject: "European History",
        last_modified: (2024, 7, 21),
        excerpt: "Causes, major events, and the rise of Napoleon...",
        highlights: &["The storming of the Bastille was a pivotal moment."],
    },
    DemoItem {
        kind: ItemKind::Note,
        title: "Integration by Parts",
        subject: "Calculus II",
        last_modified: (2024, 7, 18),
        excerpt: "Formula: ∫u dv = uv - ∫v du. Examples and practice problems...",
        highlights: &[],
    },
    DemoItem {
        kind: ItemKind::Document,
        title: "Research Paper: CRISPR-Cas9",
        subject: "Molecular Biology",
        last_modified: (2024, 7, 15),
        excerpt: "A review of gene-editing technologies and their applications.",
        highlights: &[],
    },
    DemoItem {
        kind: ItemKind::Document,
        title: "Syllabus - Spring 2024",
        subject: "Organic Chemistry",
        last_modified: (2024, 1, 10),
        excerpt: "Course outline, grading policy, and schedule.",
        highlights: &["Midterm is on March 15th."],
    },
    DemoItem {
        kind: ItemKind::Document,
        title: "Primary Source: Declaration of the Rights of Man",
        subject: "European History",
        last_modified: (2024, 7, 12),
        excerpt: "Full text for analysis and class discussion.",
        highlights: &[],
    },
];

/// Returns the demo records in catalog order.
///
/// `fallback_date` is only used if a built-in date is invalid.
pub fn demo_items(fallback_date: NaiveDate) -> Vec<NewItem> {
    DEMO_ITEMS
        .iter()
        .map(|demo| {
            let (year, month, day) = demo.last_modified;
            NewItem {
                kind: demo.kind,
                title: demo.title.to_string(),
                subject: demo.subject.to_string(),
                last_modified: NaiveDate::from_ymd_opt(year, month, day)
                    .unwrap_or(fallback_date),
                excerpt: demo.excerpt.to_string(),
                highlights: demo.highlights.iter().map(|value| value.to_string()).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::demo_items;
    use crate::model::item::ItemKind;
    use crate::model::subject::find_subject_by_name;
    use chrono::NaiveDate;

    #[test]
    fn demo_items_use_known_subjects_and_real_dates() {
        let fallback = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let items = demo_items(fallback);
        assert_eq!(items.len(), 7);
        assert_eq!(
            items.iter().filter(|item| item.kind == ItemKind::Note).count(),
            4
        );
        for item in &items {
            assert!(find_subject_by_name(&item.subject).is_some());
            assert_ne!(item.last_modified, fallback);
        }
    }
}
