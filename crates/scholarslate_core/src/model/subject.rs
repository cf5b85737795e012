//! Built-in study subjects.
//!
//! Items reference subjects by display name; the slug is only used for
//! navigation (`subjects/<slug>`).

use serde::Serialize;

/// One study subject (a sidebar folder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub id: &'static str,
    pub name: &'static str,
}

const SUBJECTS: &[Subject] = &[
    Subject {
        id: "molecular-biology",
        name: "Molecular Biology",
    },
    Subject {
        id: "organic-chemistry",
        name: "Organic Chemistry",
    },
    Subject {
        id: "european-history",
        name: "European History",
    },
    Subject {
        id: "calculus-ii",
        name: "Calculus II",
    },
    Subject {
        id: "creative-writing",
        name: "Creative Writing",
    },
    Subject {
        id: "physics",
        name: "Physics",
    },
    Subject {
        id: "law",
        name: "Law",
    },
    Subject {
        id: "languages",
        name: "Languages",
    },
];

pub fn default_subjects() -> &'static [Subject] {
    SUBJECTS
}

pub fn find_subject(id: &str) -> Option<Subject> {
    SUBJECTS.iter().copied().find(|subject| subject.id == id)
}

pub fn find_subject_by_name(name: &str) -> Option<Subject> {
    SUBJECTS.iter().copied().find(|subject| subject.name == name)
}

#[cfg(test)]
mod tests {
    use super::{default_subjects, find_subject, find_subject_by_name};

    #[test]
    fn lookups_agree() {
        for subject in default_subjects() {
            assert_eq!(find_subject(subject.id), Some(*subject));
            assert_eq!(find_subject_by_name(subject.name), Some(*subject));
        }
        assert!(find_subject("astrology").is_none());
    }
}
