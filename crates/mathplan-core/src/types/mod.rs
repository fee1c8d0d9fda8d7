//! # Core Type Definitions
//!
//! This module contains all domain types for the Mathplan advising core:
//! - Identifiers (`StudentId`, `CourseId`)
//! - Catalog types (`Major`, `MajorMathRequirement`, `CourseOption`,
//!   `CourseGroup`, `Course`, `RequiredPrereq`)
//! - Backing-store records (`Student`, `Registration`, `TransferCredit`,
//!   `LiveCredit`, `PlacementAttempt`, `SurveyResponse`)
//! - The self-report decoding (`SelfReportedPlan`)
//! - Error types (`MathPlanError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Implement `Ord` where used as `BTreeMap`/`BTreeSet` keys
//! - Carry no interior mutability; catalog values are built once and frozen

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier for a student, as issued by the registrar.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl StudentId {
    /// Create a new student ID from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Test-account IDs begin with "99"; their transfer credit is served
    /// from the local store only, never the live records system.
    #[must_use]
    pub fn is_test_account(&self) -> bool {
        self.0.starts_with("99")
    }
}

/// A course code, e.g. `"M 117"` or the cross-listed `"MATH 117"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseId(pub String);

impl CourseId {
    /// Create a new course ID from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the course code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// MATH LEVELS AND TIERS
// =============================================================================

/// The depth of mathematics a single course represents.
///
/// Ordered ascending; used to find the deepest course a requirement
/// references.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum MathLevel {
    /// A core-curriculum mathematics course with no placement implications.
    #[default]
    Core,
    /// A precalculus-sequence course.
    Precalc,
    /// A first-semester calculus course.
    Calc1,
    /// Anything past first-semester calculus.
    Advanced,
}

/// One of the four ascending math-intensity tiers a major is partitioned
/// into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MathTier {
    /// Only a generic 3-credit core-curriculum mathematics option.
    CoreOnly,
    /// Specific courses, but nothing beyond precalculus.
    Precalc,
    /// Requires a Calculus I course, nothing higher.
    Calc1,
    /// Requires coursework beyond Calculus I.
    BeyondCalc1,
}

impl MathTier {
    /// Short machine-readable name, used in API payloads and CLI output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CoreOnly => "core-only",
            Self::Precalc => "precalc",
            Self::Calc1 => "calc1",
            Self::BeyondCalc1 => "beyond-calc1",
        }
    }
}

// =============================================================================
// MAJOR
// =============================================================================

/// A degree program (major, or major plus concentration) in the catalog.
///
/// Equality and ordering are by program code: two catalog entries with the
/// same display name but distinct program codes are distinct majors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Major {
    /// Catalog number; also the value stored by the majors-of-interest
    /// survey page when a student selects this major.
    pub number: u16,
    /// Program code, e.g. `"AGBU-BS"` or `"AGBU-AECZ-BS"`.
    pub program_code: String,
    /// Whether the program currently admits students.
    pub active: bool,
    /// Display name of the major.
    pub major_name: String,
    /// Display name of the concentration, when this entry is one.
    pub concentration_name: Option<String>,
    /// University catalog URL for the program.
    pub catalog_url: String,
    /// Legacy or placeholder program code kept for students already
    /// declared under it.
    pub placeholder: bool,
}

impl Major {
    /// Whether this entry is a concentration under a parent major.
    #[must_use]
    pub fn is_concentration(&self) -> bool {
        self.concentration_name.is_some()
    }
}

impl PartialEq for Major {
    fn eq(&self, other: &Self) -> bool {
        self.program_code == other.program_code
    }
}

impl Eq for Major {}

impl PartialOrd for Major {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Major {
    fn cmp(&self, other: &Self) -> Ordering {
        self.program_code.cmp(&other.program_code)
    }
}

// =============================================================================
// MAJOR MATH REQUIREMENT
// =============================================================================

/// A single option within a semester slot: a course code or course-group
/// key, optionally marked critical or recommended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOption {
    /// Course code or course-group key this option names.
    pub key: String,
    /// The option is critical for on-time progress in the major.
    pub critical: bool,
    /// The option is recommended over its alternatives.
    pub recommended: bool,
}

impl CourseOption {
    /// Parse one token of the compact semester notation.
    ///
    /// A trailing `!` marks the option critical; a trailing `.` marks it
    /// recommended.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if let Some(key) = token.strip_suffix('!') {
            Self {
                key: key.to_string(),
                critical: true,
                recommended: false,
            }
        } else if let Some(key) = token.strip_suffix('.') {
            Self {
                key: key.to_string(),
                critical: false,
                recommended: true,
            }
        } else {
            Self {
                key: token.to_string(),
                critical: false,
                recommended: false,
            }
        }
    }
}

/// The mathematics requirement of one major across the first three
/// semesters.
///
/// Each semester slot is a list of interchangeable options; an empty list
/// means no mathematics that semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorMathRequirement {
    /// Program code this requirement belongs to.
    pub program_code: String,
    /// Option lists for semesters one through three.
    pub semesters: [Vec<CourseOption>; 3],
}

impl MajorMathRequirement {
    /// Create an empty requirement for a program.
    #[must_use]
    pub fn new(program_code: impl Into<String>) -> Self {
        Self {
            program_code: program_code.into(),
            semesters: [Vec::new(), Vec::new(), Vec::new()],
        }
    }

    /// Set all three semester slots from the compact comma-separated
    /// notation, e.g. `("M 117!,M 118!,M 124", None, Some("M 141"))`.
    #[must_use]
    pub fn with_semesters(
        mut self,
        first: Option<&str>,
        second: Option<&str>,
        third: Option<&str>,
    ) -> Self {
        let parse = |slot: Option<&str>| -> Vec<CourseOption> {
            slot.map(|s| {
                s.split(',')
                    .filter(|t| !t.trim().is_empty())
                    .map(CourseOption::parse)
                    .collect()
            })
            .unwrap_or_default()
        };
        self.semesters = [parse(first), parse(second), parse(third)];
        self
    }

    /// Iterate every option across all three semesters.
    pub fn all_options(&self) -> impl Iterator<Item = &CourseOption> {
        self.semesters.iter().flatten()
    }

    /// Whether no semester requires any mathematics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.semesters.iter().all(Vec::is_empty)
    }
}

// =============================================================================
// COURSE GROUP
// =============================================================================

/// A named pick-list of interchangeable course codes.
///
/// A requirement option naming a group is satisfied by any listed course
/// (subject to the minimum-credit threshold, when present). The default
/// course is the representative shown to students and the course whose
/// level classifies the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseGroup {
    /// Group key, e.g. `"CORE3"`.
    pub group_id: String,
    /// Minimum credits that must be accumulated from the list, if any.
    pub min_credits: Option<u8>,
    /// Default representative course.
    pub default_course: CourseId,
    /// The pick-list, in display order.
    pub courses: Vec<CourseId>,
}

impl CourseGroup {
    /// Create a new course group.
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        min_credits: Option<u8>,
        default_course: &str,
        courses: &[&str],
    ) -> Self {
        Self {
            group_id: group_id.into(),
            min_credits,
            default_course: CourseId::new(default_course),
            courses: courses.iter().map(|c| CourseId::new(*c)).collect(),
        }
    }
}

// =============================================================================
// COURSE
// =============================================================================

/// Catalog metadata for one mathematics course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Canonical course code.
    pub course_id: CourseId,
    /// Display title.
    pub title: String,
    /// Credit count.
    pub credits: u8,
    /// Cross-listed alternate code, when the course carries one.
    pub cross_listed: Option<CourseId>,
}

impl Course {
    /// Create a new course record.
    #[must_use]
    pub fn new(course_id: &str, title: &str, credits: u8, cross_listed: Option<&str>) -> Self {
        Self {
            course_id: CourseId::new(course_id),
            title: title.to_string(),
            credits,
            cross_listed: cross_listed.map(CourseId::new),
        }
    }
}

// =============================================================================
// REQUIRED PREREQUISITE
// =============================================================================

/// One prerequisite rule for a target course.
///
/// The rule is satisfied when any one of the listed alternatives has been
/// completed. A course's full rule list combines as logical AND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredPrereq {
    /// The course this rule gates.
    pub course: CourseId,
    /// Auxiliary marker carried with the rule from the catalog source.
    /// Nothing in this crate branches on it.
    pub tag: bool,
    /// Acceptable alternatives; completing any one satisfies the rule.
    pub alternatives: Vec<CourseId>,
}

impl RequiredPrereq {
    /// Create a new rule.
    #[must_use]
    pub fn new(course: &str, tag: bool, alternatives: &[&str]) -> Self {
        Self {
            course: CourseId::new(course),
            tag,
            alternatives: alternatives.iter().map(|c| CourseId::new(*c)).collect(),
        }
    }

    /// Whether any listed alternative appears in the completed set.
    #[must_use]
    pub fn satisfied_by(&self, completed: &BTreeSet<CourseId>) -> bool {
        self.alternatives.iter().any(|c| completed.contains(c))
    }
}

// =============================================================================
// SELF-REPORT DECODING
// =============================================================================

/// A student's decoded answer to the plan-summary recommendation question.
///
/// The survey stores display text; the prefix is decoded here, once, at the
/// boundary. Everything downstream consumes this closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelfReportedPlan {
    /// "(none)" — the plan recommends no mathematics.
    NoMathRequired,
    /// "N cr. of Core …" — the plan recommends N credits of core
    /// curriculum mathematics only.
    CoreCredits(u8),
    /// Any other (or garbled) answer text.
    Unrecognized,
}

impl SelfReportedPlan {
    /// Decode a stored answer's text prefix.
    #[must_use]
    pub fn from_answer(answer: &str) -> Self {
        if answer.starts_with("(none)") {
            Self::NoMathRequired
        } else if answer.starts_with("1 cr. of Core") {
            Self::CoreCredits(1)
        } else if answer.starts_with("2 cr. of Core") {
            Self::CoreCredits(2)
        } else if answer.starts_with("3 cr. of Core") {
            Self::CoreCredits(3)
        } else {
            Self::Unrecognized
        }
    }

    /// Whether this self-report alone leaves the placement assessment
    /// needed.
    #[must_use]
    pub fn placement_needed(self) -> bool {
        matches!(self, Self::Unrecognized)
    }
}

// =============================================================================
// SURVEY PAGES
// =============================================================================

/// Survey page identifiers used by the math-plan flow.
pub mod pages {
    /// The "majors of interest" page; answers are catalog numbers.
    pub const MAJORS: &str = "majors";
    /// The plan-summary page; question 2 holds the recommendation text.
    pub const PLAN: &str = "plan";
    /// The intentions page; any response marks the plan completed.
    pub const INTENTIONS: &str = "intentions";
}

// =============================================================================
// BACKING-STORE RECORDS
// =============================================================================

/// A student record from the student store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Registrar-issued student ID.
    pub student_id: StudentId,
    /// Display name, when on file.
    pub name: Option<String>,
    /// Declared program code, when the student has declared.
    pub program_code: Option<String>,
    /// Application term short string, e.g. `"FA26"`.
    pub application_term: Option<String>,
}

/// A course registration from the registration store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// The student who registered.
    pub student_id: StudentId,
    /// The course registered for.
    pub course: CourseId,
    /// Whether the course was completed.
    pub completed: bool,
}

/// A transfer-credit row from the local transfer store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCredit {
    /// The student holding the credit.
    pub student_id: StudentId,
    /// The equivalent local course.
    pub course: CourseId,
    /// Date the credit was recorded locally, when known.
    pub recorded: Option<NaiveDate>,
}

/// A transfer-credit row reported by the live records system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveCredit {
    /// The student holding the credit.
    pub student_id: StudentId,
    /// The equivalent local course.
    pub course: CourseId,
}

/// A legitimate placement-exam attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementAttempt {
    /// The student who attempted.
    pub student_id: StudentId,
    /// Exam version identifier.
    pub exam_id: String,
    /// Date of the attempt.
    pub exam_date: NaiveDate,
}

/// One stored survey answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    /// The responding student.
    pub student_id: StudentId,
    /// Survey page the answer belongs to.
    pub page_id: String,
    /// Question number within the page.
    pub question: u32,
    /// Stored answer text.
    pub answer: String,
    /// Date the response set was submitted.
    pub response_date: NaiveDate,
    /// Minute-of-day the response set was submitted.
    pub finish_time: u32,
    /// Login session tag of the submitting session.
    pub session_tag: i64,
}

impl SurveyResponse {
    /// Whether this response was submitted in the same minute as the given
    /// timestamp. Responses from one submission share date and minute.
    #[must_use]
    pub fn same_submission(&self, date: NaiveDate, finish_time: u32) -> bool {
        self.response_date == date && self.finish_time == finish_time
    }
}

/// Minute-of-day for a timestamp, as stored in `SurveyResponse::finish_time`.
#[must_use]
pub fn minute_of_day(when: &DateTime<Utc>) -> u32 {
    use chrono::Timelike;
    when.hour() * 60 + when.minute()
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the advising core.
///
/// - Absent students/majors are `None`/empty returns, never errors
/// - Live-system failures are caught at the gate and converted to the
///   process-wide down flag; they do not propagate past it
#[derive(Debug, Error)]
pub enum MathPlanError {
    /// A backing store failed; surfaced to the caller.
    #[error("data access error: {0}")]
    DataAccess(String),

    /// The live records system signalled transient unavailability.
    #[error("live records system unavailable: {0}")]
    LiveSystemUnavailable(String),

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================
