//! # Student Plan Data
//!
//! The derived per-student object the cache holds: the student record, the
//! majors they expressed interest in, the deepest tier those majors reach,
//! their placement status, and a creation timestamp for TTL accounting.
//!
//! A `MathPlanStudentData` is never mutated; any input change produces a new
//! object that replaces the old one in the cache.

use crate::catalog::MajorRequirementCatalog;
use crate::placement::{MathPlanPlacementStatus, PlacementStatusResolver};
use crate::store::{BackingStores, LiveSystemGate};
use crate::types::{
    CourseId, Major, MathPlanError, MathTier, Student, StudentId, TransferCredit, pages,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The derived plan data for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathPlanStudentData {
    /// The student record this data was derived from.
    pub student: Student,
    /// Majors the student selected on the majors-of-interest page.
    pub majors_of_interest: Vec<Major>,
    /// The deepest tier among the declared program and majors of interest.
    pub recommended_tier: MathTier,
    /// Transfer credits on file, live credits reconciled in.
    pub transfer_credits: Vec<TransferCredit>,
    /// Resolved placement status.
    pub placement: MathPlanPlacementStatus,
    /// When this object was built.
    pub created: DateTime<Utc>,
}

impl MathPlanStudentData {
    /// Build a fresh plan object for a student.
    ///
    /// When `write_changes` is set, transfer credits first seen in the live
    /// system are written back to the local transfer store.
    pub(crate) fn build(
        student: Student,
        catalog: &MajorRequirementCatalog,
        resolver: &PlacementStatusResolver,
        stores: &BackingStores,
        live: &LiveSystemGate,
        now: DateTime<Utc>,
        write_changes: bool,
    ) -> Result<Self, MathPlanError> {
        let student_id = student.student_id.clone();

        let transfer_credits =
            student_transfer_credits(stores, live, &student_id, write_changes, now)?;
        let majors_of_interest = majors_of_interest(stores, catalog, &student_id)?;

        let mut recommended_tier = MathTier::CoreOnly;
        let declared_tier = student
            .program_code
            .as_deref()
            .and_then(|code| catalog.tier_for_program(code));
        for tier in declared_tier.into_iter().chain(
            majors_of_interest
                .iter()
                .filter_map(|m| catalog.tier_for_program(&m.program_code)),
        ) {
            recommended_tier = recommended_tier.max(tier);
        }

        let placement = resolver.resolve(&student_id)?;

        Ok(Self {
            student,
            majors_of_interest,
            recommended_tier,
            transfer_credits,
            placement,
            created: now,
        })
    }

    /// Whether this object is older than the given TTL at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created >= ttl
    }
}

/// Decode the majors-of-interest survey page: each answer is a catalog
/// number. Unparseable answers and unknown numbers are logged and skipped.
fn majors_of_interest(
    stores: &BackingStores,
    catalog: &MajorRequirementCatalog,
    student_id: &StudentId,
) -> Result<Vec<Major>, MathPlanError> {
    let responses = stores
        .surveys
        .query_latest_responses(student_id, pages::MAJORS)?;

    let mut majors = Vec::with_capacity(responses.len());
    for response in &responses {
        let Ok(number) = response.answer.trim().parse::<u16>() else {
            tracing::debug!(answer = %response.answer, "unparseable majors-of-interest answer");
            continue;
        };
        match catalog.major_by_number(number) {
            Some(major) => majors.push(major.clone()),
            None => tracing::debug!(number, "majors-of-interest answer matches no major"),
        }
    }
    majors.sort();
    majors.dedup();
    Ok(majors)
}

/// The student's transfer credits: the local store merged with whatever the
/// live system reports, optionally writing newly seen credits back.
///
/// Test accounts (IDs starting with "99") are served from the local store
/// only.
fn student_transfer_credits(
    stores: &BackingStores,
    live: &LiveSystemGate,
    student_id: &StudentId,
    write_changes: bool,
    now: DateTime<Utc>,
) -> Result<Vec<TransferCredit>, MathPlanError> {
    let local = stores.transfers.query_transfer_credits(student_id)?;
    if student_id.is_test_account() {
        return Ok(local);
    }

    let mut merged = local.clone();
    for live_credit in live.query(student_id) {
        if !is_math_transfer(&live_credit.course) {
            continue;
        }
        if local.iter().any(|t| t.course == live_credit.course) {
            continue;
        }
        let credit = TransferCredit {
            student_id: student_id.clone(),
            course: live_credit.course,
            recorded: Some(now.date_naive()),
        };
        if write_changes {
            tracing::info!(
                student_id = student_id.as_str(),
                course = credit.course.as_str(),
                "recording live transfer credit locally"
            );
            stores.transfers.insert_transfer_credit(&credit)?;
        }
        merged.push(credit);
    }
    Ok(merged)
}

/// Whether a live-system course code is a mathematics transfer worth
/// carrying. Wildcard elective rows ("MATH1++ …") are not.
fn is_math_transfer(course: &CourseId) -> bool {
    let code = course.as_str();
    if code.starts_with("MATH1++") {
        return false;
    }
    code.starts_with("M ") || code.starts_with("MATH") || code == "STAT 100" || code == "STAT100"
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SurveyResponseStore, TransferCreditStore};
    use crate::types::{LiveCredit, SurveyResponse};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-08-06T10:15:00Z")
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    fn harness() -> (
        Arc<MemoryStore>,
        MajorRequirementCatalog,
        BackingStores,
        Arc<LiveSystemGate>,
        PlacementStatusResolver,
    ) {
        let store = Arc::new(MemoryStore::new());
        let catalog = MajorRequirementCatalog::build();
        let stores = BackingStores::shared(store.clone());
        let live = Arc::new(LiveSystemGate::new(store.clone()));
        let resolver = PlacementStatusResolver::new(stores.clone(), live.clone());
        (store, catalog, stores, live, resolver)
    }

    fn student(id: &str, program: Option<&str>) -> Student {
        Student {
            student_id: StudentId::new(id),
            name: Some("Riley Chen".to_string()),
            program_code: program.map(str::to_string),
            application_term: Some("FA26".to_string()),
        }
    }

    fn majors_answer(id: &str, question: u32, number: u16) -> SurveyResponse {
        SurveyResponse {
            student_id: StudentId::new(id),
            page_id: pages::MAJORS.to_string(),
            question,
            answer: number.to_string(),
            response_date: NaiveDate::from_ymd_opt(2026, 8, 1).expect("date"),
            finish_time: 540,
            session_tag: 1,
        }
    }

    #[test]
    fn tier_is_deepest_across_declared_and_interest() {
        let (store, catalog, stores, live, resolver) = harness();
        // Declared journalism (core-only), interested in physics (beyond).
        store
            .insert_response(&majors_answer("823251213", 1, 7060))
            .expect("insert");

        let data = MathPlanStudentData::build(
            student("823251213", Some("JOUR-BA")),
            &catalog,
            &resolver,
            &stores,
            &live,
            now(),
            false,
        )
        .expect("build");

        assert_eq!(data.recommended_tier, MathTier::BeyondCalc1);
        assert_eq!(data.majors_of_interest.len(), 1);
        assert_eq!(data.majors_of_interest[0].program_code, "PHYS-BS");
    }

    #[test]
    fn undeclared_without_interests_defaults_to_core_only() {
        let (_store, catalog, stores, live, resolver) = harness();

        let data = MathPlanStudentData::build(
            student("823251213", None),
            &catalog,
            &resolver,
            &stores,
            &live,
            now(),
            false,
        )
        .expect("build");

        assert_eq!(data.recommended_tier, MathTier::CoreOnly);
    }

    #[test]
    fn live_credit_reconciled_when_writing() {
        let (store, catalog, stores, live, resolver) = harness();
        store.add_live_credit(LiveCredit {
            student_id: StudentId::new("823251213"),
            course: CourseId::new("M 118"),
        });
        store.add_live_credit(LiveCredit {
            student_id: StudentId::new("823251213"),
            course: CourseId::new("MATH1++1B"),
        });

        let data = MathPlanStudentData::build(
            student("823251213", None),
            &catalog,
            &resolver,
            &stores,
            &live,
            now(),
            true,
        )
        .expect("build");

        // The wildcard row is dropped; the real credit is merged and now
        // also on file locally.
        assert_eq!(data.transfer_credits.len(), 1);
        let local = store
            .query_transfer_credits(&StudentId::new("823251213"))
            .expect("query");
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].course.as_str(), "M 118");
    }

    #[test]
    fn test_account_skips_live_system() {
        let (store, catalog, stores, live, resolver) = harness();
        store.add_live_credit(LiveCredit {
            student_id: StudentId::new("991234567"),
            course: CourseId::new("M 118"),
        });

        let data = MathPlanStudentData::build(
            student("991234567", None),
            &catalog,
            &resolver,
            &stores,
            &live,
            now(),
            true,
        )
        .expect("build");

        assert!(data.transfer_credits.is_empty());
    }

    #[test]
    fn expiry_is_ttl_inclusive() {
        let (_store, catalog, stores, live, resolver) = harness();
        let data = MathPlanStudentData::build(
            student("823251213", None),
            &catalog,
            &resolver,
            &stores,
            &live,
            now(),
            false,
        )
        .expect("build");

        let ttl = Duration::minutes(5);
        assert!(!data.is_expired(now(), ttl));
        assert!(!data.is_expired(now() + Duration::seconds(299), ttl));
        assert!(data.is_expired(now() + Duration::seconds(300), ttl));
    }
}
