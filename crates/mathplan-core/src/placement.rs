//! # Placement Status Resolver
//!
//! Resolves, per student, whether the math-placement assessment is still
//! needed and by what evidence it was satisfied if not.
//!
//! The precedence is strict and short-circuiting:
//!
//! 1. decode the latest self-report answer into an initial needed flag
//! 2. any legitimate placement attempt → satisfied by the exam, stop
//! 3. any allow-listed transfer credit → satisfied by transfer, stop
//!    (skipped entirely while the live records system is flagged down)
//! 4. any allow-listed completed registration → satisfied by course credit
//! 5. otherwise the step-1 flag stands
//!
//! Once satisfied by any source, placement can never revert to "needed",
//! regardless of what the student self-reported.

use crate::store::{BackingStores, LiveSystemGate};
use crate::types::{CourseId, MathPlanError, SelfReportedPlan, StudentId, pages};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Question number of the recommendation answer on the plan-summary page.
pub const RECOMMENDATION_QUESTION: u32 = 2;

/// Transfer-credit course codes that clear the placement requirement.
/// `M 002` is a community-college course that clears prerequisites for
/// M 117.
pub const TRANSFER_ALLOW_LIST: [&str; 12] = [
    "M 002", "M 117", "M 118", "M 120", "M 124", "M 125", "M 126", "M 127", "M 141", "M 155",
    "M 160", "M 161",
];

/// Completed-registration course codes that clear the placement
/// requirement, including the cross-listed alternates.
pub const COURSE_ALLOW_LIST: [&str; 10] = [
    "M 117", "M 118", "M 124", "M 125", "M 126", "MATH 117", "MATH 118", "MATH 124", "MATH 125",
    "MATH 126",
];

// =============================================================================
// STATUS
// =============================================================================

/// The evidence that satisfied the placement requirement, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HowSatisfied {
    /// Nothing on file satisfies placement.
    None,
    /// A legitimate placement-exam attempt.
    PlacementExam,
    /// A qualifying transfer credit.
    TransferCredit,
    /// A qualifying completed course registration.
    CourseCredit,
}

impl HowSatisfied {
    /// Short machine-readable name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PlacementExam => "placement-exam",
            Self::TransferCredit => "transfer-credit",
            Self::CourseCredit => "course-credit",
        }
    }
}

/// A student's resolved placement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathPlanPlacementStatus {
    /// Whether the student still needs the placement assessment.
    pub placement_needed: bool,
    /// Whether the requirement is satisfied by any evidence source.
    pub placement_complete: bool,
    /// The evidence source that satisfied it.
    pub how_satisfied: HowSatisfied,
}

impl MathPlanPlacementStatus {
    /// A status satisfied by the given evidence source.
    #[must_use]
    pub const fn satisfied(how: HowSatisfied) -> Self {
        Self {
            placement_needed: false,
            placement_complete: true,
            how_satisfied: how,
        }
    }

    /// An unsatisfied status carrying the self-report flag.
    #[must_use]
    pub const fn unsatisfied(placement_needed: bool) -> Self {
        Self {
            placement_needed,
            placement_complete: false,
            how_satisfied: HowSatisfied::None,
        }
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Resolves placement status from the placement, transfer, registration,
/// and survey stores.
#[derive(Debug, Clone)]
pub struct PlacementStatusResolver {
    stores: BackingStores,
    live: Arc<LiveSystemGate>,
}

impl PlacementStatusResolver {
    /// Create a resolver over the given stores and live-system gate.
    #[must_use]
    pub fn new(stores: BackingStores, live: Arc<LiveSystemGate>) -> Self {
        Self { stores, live }
    }

    /// Resolve the placement status for one student.
    pub fn resolve(
        &self,
        student_id: &StudentId,
    ) -> Result<MathPlanPlacementStatus, MathPlanError> {
        // Step 1: latest self-report recommendation answer.
        let responses = self
            .stores
            .surveys
            .query_latest_responses(student_id, pages::PLAN)?;
        let self_report = responses
            .iter()
            .find(|r| r.question == RECOMMENDATION_QUESTION)
            .map(|r| SelfReportedPlan::from_answer(&r.answer));
        let needed = self_report.is_none_or(SelfReportedPlan::placement_needed);

        // Step 2: a legitimate placement attempt settles it.
        let attempts = self.stores.attempts.query_legal_attempts(student_id)?;
        if !attempts.is_empty() {
            return Ok(MathPlanPlacementStatus::satisfied(
                HowSatisfied::PlacementExam,
            ));
        }

        // Step 3: qualifying transfer credit, local merged with live.
        // Skipped entirely while the live system is flagged down.
        if !self.live.is_down() {
            let mut credits: Vec<CourseId> = self
                .stores
                .transfers
                .query_transfer_credits(student_id)?
                .into_iter()
                .map(|t| t.course)
                .collect();
            credits.extend(self.live.query(student_id).into_iter().map(|t| t.course));

            if credits
                .iter()
                .any(|c| TRANSFER_ALLOW_LIST.contains(&c.as_str()))
            {
                return Ok(MathPlanPlacementStatus::satisfied(
                    HowSatisfied::TransferCredit,
                ));
            }
        }

        // Step 4: qualifying completed registration.
        let completed = self
            .stores
            .registrations
            .query_completed_courses(student_id)?;
        if completed
            .iter()
            .any(|r| COURSE_ALLOW_LIST.contains(&r.course.as_str()))
        {
            return Ok(MathPlanPlacementStatus::satisfied(
                HowSatisfied::CourseCredit,
            ));
        }

        // Step 5: the self-report flag stands.
        Ok(MathPlanPlacementStatus::unsatisfied(needed))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SurveyResponseStore};
    use crate::types::{
        LiveCredit, PlacementAttempt, Registration, SurveyResponse, TransferCredit,
    };
    use chrono::NaiveDate;

    fn setup() -> (Arc<MemoryStore>, PlacementStatusResolver) {
        let store = Arc::new(MemoryStore::new());
        let stores = BackingStores::shared(store.clone());
        let live = Arc::new(LiveSystemGate::new(store.clone()));
        let resolver = PlacementStatusResolver::new(stores, live);
        (store, resolver)
    }

    fn student() -> StudentId {
        StudentId::new("823251213")
    }

    fn attempt() -> PlacementAttempt {
        PlacementAttempt {
            student_id: student(),
            exam_id: "MPTTC".to_string(),
            exam_date: NaiveDate::from_ymd_opt(2026, 7, 1).expect("date"),
        }
    }

    fn self_report(answer: &str) -> SurveyResponse {
        SurveyResponse {
            student_id: student(),
            page_id: pages::PLAN.to_string(),
            question: RECOMMENDATION_QUESTION,
            answer: answer.to_string(),
            response_date: NaiveDate::from_ymd_opt(2026, 7, 1).expect("date"),
            finish_time: 540,
            session_tag: 1,
        }
    }

    #[test]
    fn attempt_wins_over_everything() {
        let (store, resolver) = setup();
        store.add_attempt(attempt());
        store.add_transfer_credit(TransferCredit {
            student_id: student(),
            course: CourseId::new("M 118"),
            recorded: None,
        });
        store.add_registration(Registration {
            student_id: student(),
            course: CourseId::new("M 117"),
            completed: true,
        });

        let status = resolver.resolve(&student()).expect("resolve");

        assert!(status.placement_complete);
        assert!(!status.placement_needed);
        assert_eq!(status.how_satisfied, HowSatisfied::PlacementExam);
    }

    #[test]
    fn transfer_credit_wins_without_attempt() {
        let (store, resolver) = setup();
        store.add_transfer_credit(TransferCredit {
            student_id: student(),
            course: CourseId::new("M 002"),
            recorded: None,
        });
        store.add_registration(Registration {
            student_id: student(),
            course: CourseId::new("M 117"),
            completed: true,
        });

        let status = resolver.resolve(&student()).expect("resolve");

        assert_eq!(status.how_satisfied, HowSatisfied::TransferCredit);
        assert!(status.placement_complete);
    }

    #[test]
    fn live_credit_counts_as_transfer() {
        let (store, resolver) = setup();
        store.add_live_credit(LiveCredit {
            student_id: student(),
            course: CourseId::new("M 160"),
        });

        let status = resolver.resolve(&student()).expect("resolve");

        assert_eq!(status.how_satisfied, HowSatisfied::TransferCredit);
    }

    #[test]
    fn completed_course_wins_without_attempt_or_transfer() {
        let (store, resolver) = setup();
        store.add_registration(Registration {
            student_id: student(),
            course: CourseId::new("MATH 124"),
            completed: true,
        });

        let status = resolver.resolve(&student()).expect("resolve");

        assert_eq!(status.how_satisfied, HowSatisfied::CourseCredit);
        assert!(!status.placement_needed);
    }

    #[test]
    fn incomplete_registration_does_not_count() {
        let (store, resolver) = setup();
        store.add_registration(Registration {
            student_id: student(),
            course: CourseId::new("M 117"),
            completed: false,
        });

        let status = resolver.resolve(&student()).expect("resolve");

        assert_eq!(status.how_satisfied, HowSatisfied::None);
        assert!(status.placement_needed);
    }

    #[test]
    fn none_self_report_clears_needed_flag() {
        let (store, resolver) = setup();
        store
            .insert_response(&self_report("(none) No mathematics required"))
            .expect("insert");

        let status = resolver.resolve(&student()).expect("resolve");

        assert!(!status.placement_needed);
        assert!(!status.placement_complete);
        assert_eq!(status.how_satisfied, HowSatisfied::None);
    }

    #[test]
    fn absent_self_report_means_needed() {
        let (_store, resolver) = setup();

        let status = resolver.resolve(&student()).expect("resolve");

        assert!(status.placement_needed);
        assert!(!status.placement_complete);
    }

    #[test]
    fn unqualified_transfer_does_not_satisfy() {
        let (store, resolver) = setup();
        store.add_transfer_credit(TransferCredit {
            student_id: student(),
            course: CourseId::new("S 100"),
            recorded: None,
        });

        let status = resolver.resolve(&student()).expect("resolve");

        assert_eq!(status.how_satisfied, HowSatisfied::None);
    }

    #[test]
    fn outage_skips_transfer_step_but_not_course_step() {
        let (store, resolver) = setup();
        store.add_transfer_credit(TransferCredit {
            student_id: student(),
            course: CourseId::new("M 118"),
            recorded: None,
        });
        store.add_registration(Registration {
            student_id: student(),
            course: CourseId::new("M 117"),
            completed: true,
        });
        store.set_live_available(false);

        // First resolve trips the gate mid-step; afterwards the transfer
        // step is skipped entirely and course credit decides.
        let _ = resolver.resolve(&student()).expect("resolve");
        let status = resolver.resolve(&student()).expect("resolve");

        assert_eq!(status.how_satisfied, HowSatisfied::CourseCredit);
    }
}
