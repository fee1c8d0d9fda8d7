//! # Required Prerequisite Index
//!
//! A read-only fact base mapping each mathematics course to its
//! prerequisite-satisfaction rules. Built once and frozen.
//!
//! A course's rule list combines as logical AND; the alternatives within one
//! rule combine as logical OR (any one completed alternative satisfies the
//! rule). The per-rule boolean tag is carried from the catalog source
//! unchanged; nothing here interprets it.

use crate::types::{CourseId, RequiredPrereq};
use std::collections::{BTreeMap, BTreeSet};

/// The course → prerequisite-rules index.
#[derive(Debug, Clone)]
pub struct RequiredPrereqIndex {
    rules: BTreeMap<CourseId, Vec<RequiredPrereq>>,
}

impl RequiredPrereqIndex {
    /// Build the index from the hardcoded rule table.
    #[must_use]
    pub fn build() -> Self {
        let mut rules: BTreeMap<CourseId, Vec<RequiredPrereq>> = BTreeMap::new();
        let mut put = |course: &str, list: Vec<RequiredPrereq>| {
            rules.insert(CourseId::new(course), list);
        };

        put("M 118", vec![RequiredPrereq::new("M 118", true, &["M 117"])]);
        put("M 124", vec![RequiredPrereq::new("M 124", true, &["M 118"])]);
        put("M 125", vec![RequiredPrereq::new("M 125", true, &["M 118"])]);
        put("M 126", vec![RequiredPrereq::new("M 126", true, &["M 125"])]);

        put("M 141", vec![RequiredPrereq::new("M 141", false, &["M 118"])]);

        put(
            "M 155",
            vec![
                RequiredPrereq::new("M 155", false, &["M 124"]),
                RequiredPrereq::new("M 155", false, &["M 125"]),
            ],
        );
        put(
            "M 156",
            vec![
                RequiredPrereq::new("M 156", false, &["M 124"]),
                RequiredPrereq::new("M 156", false, &["M 126"]),
            ],
        );
        put(
            "M 157",
            vec![
                RequiredPrereq::new("M 157", true, &["M 124"]),
                RequiredPrereq::new("M 157", false, &["M 126"]),
            ],
        );
        put(
            "M 160",
            vec![
                RequiredPrereq::new("M 160", false, &["M 124"]),
                RequiredPrereq::new("M 160", false, &["M 126"]),
            ],
        );
        put(
            "M 161",
            vec![
                RequiredPrereq::new("M 161", false, &["M 124"]),
                RequiredPrereq::new("M 161", false, &["M 160"]),
            ],
        );

        put(
            "M 229",
            vec![RequiredPrereq::new("M 229", false, &["M 141", "M 155", "M 160"])],
        );
        put(
            "M 255",
            vec![
                RequiredPrereq::new("M 255", true, &["M 126"]),
                RequiredPrereq::new("M 255", false, &["M 155"]),
            ],
        );
        put("M 261", vec![RequiredPrereq::new("M 261", false, &["M 161"])]);
        put(
            "M 271",
            vec![RequiredPrereq::new("M 271", false, &["M 155", "M 160"])],
        );
        put("M 272", vec![RequiredPrereq::new("M 272", false, &["M 271"])]);

        put(
            "M 340",
            vec![RequiredPrereq::new("M 340", false, &["M 255", "M 261"])],
        );
        put(
            "M 345",
            vec![
                RequiredPrereq::new("M 345", false, &["M 229", "M 369"]),
                RequiredPrereq::new("M 345", false, &["M 255", "M 261"]),
            ],
        );
        put(
            "M 369",
            vec![RequiredPrereq::new("M 369", false, &["M 161", "M 255", "M 271"])],
        );

        Self { rules }
    }

    /// The full course → rules map.
    #[must_use]
    pub fn prereqs(&self) -> &BTreeMap<CourseId, Vec<RequiredPrereq>> {
        &self.rules
    }

    /// The rule list for one course; `None` when the course has no
    /// prerequisite rules on file.
    #[must_use]
    pub fn rules_for(&self, course: &str) -> Option<&[RequiredPrereq]> {
        self.rules
            .get(&CourseId::new(course))
            .map(Vec::as_slice)
    }

    /// Whether a completed-course set satisfies every rule for the given
    /// course. A course with no rules on file is trivially satisfied.
    #[must_use]
    pub fn satisfied_by(&self, course: &str, completed: &BTreeSet<CourseId>) -> bool {
        self.rules_for(course)
            .is_none_or(|rules| rules.iter().all(|r| r.satisfied_by(completed)))
    }
}

// =============================================================================
// TESTS
// =============================================================================
