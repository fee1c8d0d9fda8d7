//! # Major Requirement Catalog
//!
//! The immutable catalog of degree programs and their three-semester
//! mathematics requirements, partitioned into four ascending math-intensity
//! tiers.
//!
//! The catalog is built once from the hardcoded table in [`data`] and frozen
//! for the life of the process. All maps are `BTreeMap` for deterministic
//! ordering.
//!
//! ## Partitioning
//!
//! Each requirement is classified by four mutually exclusive, fixed-order
//! predicates:
//!
//! 1. every option names a generic core-curriculum group → core-only
//! 2. nothing referenced is beyond precalculus → precalc
//! 3. nothing referenced is beyond Calculus I → calc-1
//! 4. otherwise → beyond Calculus I
//!
//! The level of an option naming a course group is the level of the group's
//! default representative course. After classification, a repair pass
//! inserts the parent major into any tier list where one of its
//! concentrations appears without it; lists are finally sorted by program
//! code.

pub mod data;

use crate::types::{
    Course, CourseGroup, CourseId, Major, MajorMathRequirement, MathLevel, MathTier,
};
use std::collections::BTreeMap;

// =============================================================================
// COURSE LEVELS
// =============================================================================

/// Group keys that stand for "any generic core-curriculum mathematics".
pub const GENERIC_CORE_GROUPS: [&str; 3] = ["CORE3", "CORE3SOC", "CORE2"];

/// Core-curriculum courses with no placement implications.
const CORE_COURSES: [&str; 5] = ["M 101", "M 105", "S 100", "S 201", "S 204"];

/// Precalculus-sequence courses (including the community-college
/// equivalence code `M 002`).
const PRECALC_COURSES: [&str; 8] = [
    "M 002", "M 117", "M 118", "M 120", "M 124", "M 125", "M 126", "M 127",
];

/// First-semester calculus courses.
const CALC1_COURSES: [&str; 5] = ["M 141", "M 155", "M 156", "M 157", "M 160"];

/// The math level of a single course code.
///
/// Codes outside the known core/precalculus/calculus-1 tables are beyond
/// Calculus I; every mathematics course past the first calculus semester
/// classifies there, including legacy codes.
#[must_use]
pub fn course_level(code: &str) -> MathLevel {
    if CORE_COURSES.contains(&code) {
        MathLevel::Core
    } else if PRECALC_COURSES.contains(&code) {
        MathLevel::Precalc
    } else if CALC1_COURSES.contains(&code) {
        MathLevel::Calc1
    } else {
        MathLevel::Advanced
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// The immutable majors catalog.
///
/// Holds the major → requirement mapping, course-group and course metadata,
/// the four tier lists, and a program-code → tier index. Built once, never
/// mutated.
#[derive(Debug, Clone)]
pub struct MajorRequirementCatalog {
    /// Major → requirement, ordered by program code.
    majors: BTreeMap<Major, MajorMathRequirement>,
    /// Course-group key → pick-list.
    course_groups: BTreeMap<String, CourseGroup>,
    /// Course code → metadata.
    courses: BTreeMap<CourseId, Course>,
    /// Program code → resolved tier.
    tiers_by_program: BTreeMap<String, MathTier>,
    /// Majors whose requirement is only generic core mathematics.
    core_only: Vec<Major>,
    /// Majors requiring nothing beyond precalculus.
    precalc: Vec<Major>,
    /// Majors requiring a Calculus I course, nothing higher.
    calc1: Vec<Major>,
    /// Majors requiring coursework beyond Calculus I.
    beyond_calc1: Vec<Major>,
}

impl MajorRequirementCatalog {
    /// Build the catalog from the hardcoded data tables.
    #[must_use]
    pub fn build() -> Self {
        Self::from_table(data::majors(), data::course_groups(), data::courses())
    }

    /// Build a catalog from explicit tables. Production code goes through
    /// [`MajorRequirementCatalog::build`]; tests inject small tables here.
    #[must_use]
    pub fn from_table(
        table: Vec<(Major, MajorMathRequirement)>,
        groups: Vec<CourseGroup>,
        courses: Vec<Course>,
    ) -> Self {
        let course_groups: BTreeMap<String, CourseGroup> = groups
            .into_iter()
            .map(|g| (g.group_id.clone(), g))
            .collect();
        let courses: BTreeMap<CourseId, Course> = courses
            .into_iter()
            .map(|c| (c.course_id.clone(), c))
            .collect();
        let majors: BTreeMap<Major, MajorMathRequirement> = table.into_iter().collect();

        let mut catalog = Self {
            majors,
            course_groups,
            courses,
            tiers_by_program: BTreeMap::new(),
            core_only: Vec::new(),
            precalc: Vec::new(),
            calc1: Vec::new(),
            beyond_calc1: Vec::new(),
        };
        catalog.partition();
        catalog
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    /// The full major → requirement mapping, ordered by program code.
    #[must_use]
    pub fn majors(&self) -> &BTreeMap<Major, MajorMathRequirement> {
        &self.majors
    }

    /// Find a major by program code.
    ///
    /// Linear scan of the mapping; an unmatched code is logged and returns
    /// `None`.
    #[must_use]
    pub fn major(&self, program_code: &str) -> Option<&Major> {
        let found = self.majors.keys().find(|m| m.program_code == program_code);
        if found.is_none() {
            tracing::warn!(program_code, "no major matches program code");
        }
        found
    }

    /// Find a major by catalog number, as stored by the majors-of-interest
    /// survey page.
    #[must_use]
    pub fn major_by_number(&self, number: u16) -> Option<&Major> {
        self.majors.keys().find(|m| m.number == number)
    }

    /// The requirement for a program code, if the program exists.
    #[must_use]
    pub fn requirement(&self, program_code: &str) -> Option<&MajorMathRequirement> {
        self.majors
            .iter()
            .find(|(m, _)| m.program_code == program_code)
            .map(|(_, r)| r)
    }

    /// Course-group metadata, keyed by group id.
    #[must_use]
    pub fn course_groups(&self) -> &BTreeMap<String, CourseGroup> {
        &self.course_groups
    }

    /// Course metadata, keyed by course code.
    #[must_use]
    pub fn courses(&self) -> &BTreeMap<CourseId, Course> {
        &self.courses
    }

    /// The resolved tier of a program code, if the program exists.
    #[must_use]
    pub fn tier_for_program(&self, program_code: &str) -> Option<MathTier> {
        self.tiers_by_program.get(program_code).copied()
    }

    // =========================================================================
    // TIER LISTS
    // =========================================================================

    /// Majors that require only 3 credits of generic core mathematics.
    #[must_use]
    pub fn majors_requiring_core_only(&self) -> &[Major] {
        &self.core_only
    }

    /// Majors that require specific courses, but nothing beyond
    /// precalculus.
    #[must_use]
    pub fn majors_requiring_precalc(&self) -> &[Major] {
        &self.precalc
    }

    /// Majors that require a Calculus I course, but nothing higher.
    #[must_use]
    pub fn majors_requiring_calc1(&self) -> &[Major] {
        &self.calc1
    }

    /// Majors that require coursework beyond Calculus I.
    #[must_use]
    pub fn majors_requiring_beyond_calc1(&self) -> &[Major] {
        &self.beyond_calc1
    }

    /// All four tier lists, ascending.
    #[must_use]
    pub fn tier_lists(&self) -> [(MathTier, &[Major]); 4] {
        [
            (MathTier::CoreOnly, self.core_only.as_slice()),
            (MathTier::Precalc, self.precalc.as_slice()),
            (MathTier::Calc1, self.calc1.as_slice()),
            (MathTier::BeyondCalc1, self.beyond_calc1.as_slice()),
        ]
    }

    // =========================================================================
    // CLASSIFICATION
    // =========================================================================

    /// The level an option key contributes: a group's default representative
    /// course level, or the course's own level.
    fn level_of_key(&self, key: &str) -> MathLevel {
        match self.course_groups.get(key) {
            Some(group) => course_level(group.default_course.as_str()),
            None => course_level(key),
        }
    }

    /// Classify one requirement into its tier.
    #[must_use]
    pub fn classify(&self, req: &MajorMathRequirement) -> MathTier {
        if req.is_empty() {
            return MathTier::CoreOnly;
        }
        if req
            .all_options()
            .all(|opt| GENERIC_CORE_GROUPS.contains(&opt.key.as_str()))
        {
            return MathTier::CoreOnly;
        }

        let deepest = req
            .all_options()
            .map(|opt| self.level_of_key(&opt.key))
            .max()
            .unwrap_or_default();

        match deepest {
            MathLevel::Core | MathLevel::Precalc => MathTier::Precalc,
            MathLevel::Calc1 => MathTier::Calc1,
            MathLevel::Advanced => MathTier::BeyondCalc1,
        }
    }

    /// Partition all majors into the four tier lists, repair concentration
    /// parents, and sort each list by program code.
    fn partition(&mut self) {
        let mut core_only = Vec::new();
        let mut precalc = Vec::new();
        let mut calc1 = Vec::new();
        let mut beyond = Vec::new();
        let mut by_program = BTreeMap::new();

        for (major, req) in &self.majors {
            let tier = self.classify(req);
            by_program.insert(major.program_code.clone(), tier);
            match tier {
                MathTier::CoreOnly => core_only.push(major.clone()),
                MathTier::Precalc => precalc.push(major.clone()),
                MathTier::Calc1 => calc1.push(major.clone()),
                MathTier::BeyondCalc1 => beyond.push(major.clone()),
            }
        }

        let all: Vec<Major> = self.majors.keys().cloned().collect();
        for list in [&mut core_only, &mut precalc, &mut calc1, &mut beyond] {
            repair_parents(list, &all);
            list.sort();
        }

        self.tiers_by_program = by_program;
        self.core_only = core_only;
        self.precalc = precalc;
        self.calc1 = calc1;
        self.beyond_calc1 = beyond;
    }
}

/// Ensure the parent major is present wherever one of its concentrations
/// appears: for every concentration in the list, find the entry with the
/// same display name and no concentration, and insert it if absent.
fn repair_parents(list: &mut Vec<Major>, all_majors: &[Major]) {
    let snapshot: Vec<Major> = list.clone();
    for entry in snapshot {
        if entry.concentration_name.is_none() {
            continue;
        }
        let parent = all_majors
            .iter()
            .find(|m| m.concentration_name.is_none() && m.major_name == entry.major_name);
        if let Some(parent) = parent
            && !list.contains(parent)
        {
            list.push(parent.clone());
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
