//! # mathplan-core
//!
//! The deterministic advising core for Mathplan - THE LOGIC.
//!
//! This crate determines, for each student, what mathematics courses their
//! declared (or exploratory) degree program requires across the first three
//! semesters, and resolves whether the student still needs the
//! math-placement assessment given placement attempts, transfer credits,
//! and completed courses on file.
//!
//! ## Components
//!
//! - `catalog` — the immutable majors catalog and its four-tier partition
//! - `prereq` — the per-course prerequisite index
//! - `placement` — the placement-status precedence resolver
//! - `cache` + `plan` — the TTL-expiring per-student plan cache
//! - `service` — the one service object tying the above together
//! - `store` — narrow traits over the external record systems, with
//!   in-memory and redb-backed implementations
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - `BTreeMap` only; all iteration orders are deterministic
//! - Callers pass `now` explicitly; the core never reads the wall clock
//! - One lock per service instance; no method releases it mid-operation

// =============================================================================
// MODULES
// =============================================================================

pub mod cache;
pub mod catalog;
pub mod placement;
pub mod plan;
pub mod prereq;
pub mod service;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Course, CourseGroup, CourseId, CourseOption, LiveCredit, Major, MajorMathRequirement,
    MathLevel, MathPlanError, MathTier, PlacementAttempt, Registration, RequiredPrereq,
    SelfReportedPlan, Student, StudentId, SurveyResponse, TransferCredit, pages,
};

// =============================================================================
// RE-EXPORTS: Components
// =============================================================================

pub use cache::StudentDataCache;
pub use catalog::MajorRequirementCatalog;
pub use placement::{HowSatisfied, MathPlanPlacementStatus, PlacementStatusResolver};
pub use plan::MathPlanStudentData;
pub use prereq::RequiredPrereqIndex;
pub use service::{DEFAULT_TTL_MINUTES, MathPlanService};

// =============================================================================
// RE-EXPORTS: Stores
// =============================================================================

pub use store::{
    BackingStores, LiveCreditStore, LiveSystemGate, MemoryStore, NullLiveCreditStore,
    PlacementAttemptStore, RedbStore, RegistrationStore, StudentStore, SurveyResponseStore,
    TransferCreditStore,
};
