//! # Math Plan Service
//!
//! The one service object callers hold (by `Arc`) to reach the catalog, the
//! prerequisite index, the placement resolver, and the per-student cache.
//!
//! One process-wide mutex, scoped to the service instance, guards the
//! lazily built catalog/prereq tables and every cache read and write; no
//! method releases it mid-operation, so all cache operations are
//! linearizable and concurrent misses for one student are serialized
//! rather than double-built. Survey writes persist first, then rebuild and
//! replace the student's cache entry under the lock (write-through, not
//! lazy invalidation).

use crate::cache::StudentDataCache;
use crate::catalog::MajorRequirementCatalog;
use crate::placement::{MathPlanPlacementStatus, PlacementStatusResolver};
use crate::plan::MathPlanStudentData;
use crate::prereq::RequiredPrereqIndex;
use crate::store::{BackingStores, LiveCreditStore, LiveSystemGate};
use crate::types::{
    Major, MathPlanError, Student, StudentId, SurveyResponse, minute_of_day, pages,
};
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Default cache TTL in minutes.
pub const DEFAULT_TTL_MINUTES: i64 = 5;

/// The advising service.
pub struct MathPlanService {
    stores: BackingStores,
    live: Arc<LiveSystemGate>,
    resolver: PlacementStatusResolver,
    inner: Mutex<ServiceState>,
}

/// State guarded by the service lock.
struct ServiceState {
    /// Lazily built majors catalog; frozen once built.
    catalog: Option<Arc<MajorRequirementCatalog>>,
    /// Lazily built prerequisite index; frozen once built.
    prereqs: Option<Arc<RequiredPrereqIndex>>,
    /// The per-student plan cache.
    cache: StudentDataCache,
}

impl MathPlanService {
    /// Create a service with the default TTL.
    #[must_use]
    pub fn new(stores: BackingStores, live_store: Arc<dyn LiveCreditStore>) -> Self {
        Self::with_ttl(stores, live_store, Duration::minutes(DEFAULT_TTL_MINUTES))
    }

    /// Create a service with an explicit cache TTL. The TTL is uniform for
    /// the life of the service; the cache's eviction order depends on it.
    #[must_use]
    pub fn with_ttl(
        stores: BackingStores,
        live_store: Arc<dyn LiveCreditStore>,
        ttl: Duration,
    ) -> Self {
        let live = Arc::new(LiveSystemGate::new(live_store));
        let resolver = PlacementStatusResolver::new(stores.clone(), live.clone());
        Self {
            stores,
            live,
            resolver,
            inner: Mutex::new(ServiceState {
                catalog: None,
                prereqs: None,
                cache: StudentDataCache::new(ttl),
            }),
        }
    }

    /// Acquire the service lock. Panics are denied workspace-wide, so a
    /// poisoned lock can only come from a dependency; recover the guard.
    fn lock(&self) -> MutexGuard<'_, ServiceState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // CATALOG
    // =========================================================================

    /// The majors catalog, built on first use and cached for the process
    /// lifetime.
    #[must_use]
    pub fn catalog(&self) -> Arc<MajorRequirementCatalog> {
        let mut state = self.lock();
        state
            .catalog
            .get_or_insert_with(|| Arc::new(MajorRequirementCatalog::build()))
            .clone()
    }

    /// Find a major by program code; `None` (logged) when unmatched.
    #[must_use]
    pub fn major(&self, program_code: &str) -> Option<Major> {
        self.catalog().major(program_code).cloned()
    }

    /// Majors that require only 3 credits of generic core mathematics.
    #[must_use]
    pub fn majors_requiring_core_only(&self) -> Vec<Major> {
        self.catalog().majors_requiring_core_only().to_vec()
    }

    /// Majors that require nothing beyond precalculus.
    #[must_use]
    pub fn majors_requiring_precalc(&self) -> Vec<Major> {
        self.catalog().majors_requiring_precalc().to_vec()
    }

    /// Majors that require a Calculus I course, nothing higher.
    #[must_use]
    pub fn majors_requiring_calc1(&self) -> Vec<Major> {
        self.catalog().majors_requiring_calc1().to_vec()
    }

    /// Majors that require coursework beyond Calculus I.
    #[must_use]
    pub fn majors_requiring_beyond_calc1(&self) -> Vec<Major> {
        self.catalog().majors_requiring_beyond_calc1().to_vec()
    }

    /// The prerequisite index, built on first use and cached for the
    /// process lifetime.
    #[must_use]
    pub fn required_prereqs(&self) -> Arc<RequiredPrereqIndex> {
        let mut state = self.lock();
        state
            .prereqs
            .get_or_insert_with(|| Arc::new(RequiredPrereqIndex::build()))
            .clone()
    }

    // =========================================================================
    // PLACEMENT
    // =========================================================================

    /// Resolve the placement status for a student directly from the
    /// backing stores.
    pub fn math_placement_status(
        &self,
        student_id: &StudentId,
    ) -> Result<MathPlanPlacementStatus, MathPlanError> {
        let _guard = self.lock();
        self.resolver.resolve(student_id)
    }

    /// Whether the student has completed the math plan, i.e. responded to
    /// the intentions page.
    pub fn math_plan_status(&self, student_id: &StudentId) -> Result<bool, MathPlanError> {
        let responses = self
            .stores
            .surveys
            .query_latest_responses(student_id, pages::INTENTIONS)?;
        Ok(!responses.is_empty())
    }

    // =========================================================================
    // STUDENT DATA
    // =========================================================================

    /// Fetch the current plan data for a student, building and caching on
    /// miss. Returns `None` (logged) when no student record exists.
    pub fn student_data(
        &self,
        student_id: &StudentId,
        now: DateTime<Utc>,
        session_tag: i64,
        write_changes: bool,
    ) -> Result<Option<Arc<MathPlanStudentData>>, MathPlanError> {
        let mut state = self.lock();

        if let Some(hit) = state.cache.get(student_id, now) {
            return Ok(Some(hit));
        }

        let Some(student) = self.stores.students.query_student(student_id)? else {
            tracing::warn!(student_id = student_id.as_str(), "no student record on file");
            return Ok(None);
        };

        tracing::debug!(
            student_id = student_id.as_str(),
            session_tag,
            "cache miss; building plan data"
        );
        let data = self.rebuild_locked(&mut state, student, now, write_changes)?;
        Ok(Some(data))
    }

    /// Build a fresh plan object and replace the student's cache entry.
    /// Callers must hold the service lock.
    fn rebuild_locked(
        &self,
        state: &mut ServiceState,
        student: Student,
        now: DateTime<Utc>,
        write_changes: bool,
    ) -> Result<Arc<MathPlanStudentData>, MathPlanError> {
        let catalog = state
            .catalog
            .get_or_insert_with(|| Arc::new(MajorRequirementCatalog::build()))
            .clone();
        let data = Arc::new(MathPlanStudentData::build(
            student,
            &catalog,
            &self.resolver,
            &self.stores,
            &self.live,
            now,
            write_changes,
        )?);
        state.cache.insert(data.clone());
        Ok(data)
    }

    // =========================================================================
    // SURVEY WRITES (write-through)
    // =========================================================================

    /// Persist a set of survey answers, then rebuild and replace the
    /// student's cache entry.
    ///
    /// Responses submitted in the same minute replace each other: a `None`
    /// answer deletes the matching same-minute response, a `Some` answer
    /// inserts. Question and answer lists pair up to the shorter length.
    pub fn store_math_plan_responses(
        &self,
        student: &Student,
        page_id: &str,
        questions: &[u32],
        answers: &[Option<String>],
        now: DateTime<Utc>,
        session_tag: i64,
    ) -> Result<(), MathPlanError> {
        let response_date = now.date_naive();
        let finish_time = minute_of_day(&now);

        let same_minute: Vec<SurveyResponse> = self
            .stores
            .surveys
            .query_latest_responses(&student.student_id, page_id)?
            .into_iter()
            .filter(|r| r.same_submission(response_date, finish_time))
            .collect();

        let count = questions.len().min(answers.len());
        for (question, answer) in questions.iter().zip(answers.iter()).take(count) {
            let existing = same_minute.iter().find(|r| r.question == *question);
            match answer {
                None => {
                    // Old record had an answer, the new one does not.
                    if let Some(existing) = existing {
                        self.stores.surveys.delete_response(existing)?;
                    }
                }
                Some(answer) => {
                    self.stores.surveys.insert_response(&SurveyResponse {
                        student_id: student.student_id.clone(),
                        page_id: page_id.to_string(),
                        question: *question,
                        answer: answer.clone(),
                        response_date,
                        finish_time,
                        session_tag,
                    })?;
                }
            }
        }

        // Responses have changed - rebuild student data
        let mut state = self.lock();
        self.rebuild_locked(&mut state, student.clone(), now, false)?;
        Ok(())
    }

    /// Delete every response for a student and page; on success rebuild
    /// and replace the student's cache entry. Returns whether anything was
    /// deleted.
    pub fn delete_math_plan_responses(
        &self,
        student: &Student,
        page_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, MathPlanError> {
        let deleted = self
            .stores
            .surveys
            .delete_responses_for_page(&student.student_id, page_id)?;

        if deleted {
            let mut state = self.lock();
            self.rebuild_locked(&mut state, student.clone(), now, false)?;
        }
        Ok(deleted)
    }

    // =========================================================================
    // LIVE SYSTEM
    // =========================================================================

    /// Whether the live records system is currently flagged down.
    #[must_use]
    pub fn live_system_down(&self) -> bool {
        self.live.is_down()
    }

    /// Clear the live-system down flag. There is no automatic retry; this
    /// is the external reset.
    pub fn reset_live_system(&self) {
        self.live.reset();
    }

    /// Number of students currently cached.
    #[must_use]
    pub fn cached_students(&self) -> usize {
        self.lock().cache.len()
    }
}

impl std::fmt::Debug for MathPlanService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MathPlanService")
            .field("live_down", &self.live.is_down())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::HowSatisfied;
    use crate::store::{MemoryStore, StudentStore};
    use crate::types::SelfReportedPlan;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Student store wrapper that counts backing queries.
    struct CountingStudentStore {
        inner: Arc<MemoryStore>,
        queries: AtomicUsize,
    }

    impl StudentStore for CountingStudentStore {
        fn query_student(&self, student_id: &StudentId) -> Result<Option<Student>, MathPlanError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.query_student(student_id)
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-08-06T09:30:00Z")
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    fn student(id: &str) -> Student {
        Student {
            student_id: StudentId::new(id),
            name: Some("Riley Chen".to_string()),
            program_code: Some("CPSC-BS".to_string()),
            application_term: Some("FA26".to_string()),
        }
    }

    fn service_with_counter() -> (Arc<MemoryStore>, Arc<CountingStudentStore>, MathPlanService) {
        let mem = Arc::new(MemoryStore::new());
        mem.put_student(student("823251213"));

        let counting = Arc::new(CountingStudentStore {
            inner: mem.clone(),
            queries: AtomicUsize::new(0),
        });
        let mut stores = BackingStores::shared(mem.clone());
        stores.students = counting.clone();

        let service = MathPlanService::new(stores, mem.clone());
        (mem, counting, service)
    }

    #[test]
    fn second_read_within_ttl_hits_cache() {
        let (_mem, counting, service) = service_with_counter();
        let id = StudentId::new("823251213");

        let first = service
            .student_data(&id, now(), 1, false)
            .expect("read")
            .expect("present");
        let second = service
            .student_data(&id, now() + Duration::minutes(1), 1, false)
            .expect("read")
            .expect("present");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(counting.queries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn expired_entry_is_rebuilt() {
        let (_mem, counting, service) = service_with_counter();
        let id = StudentId::new("823251213");

        let first = service
            .student_data(&id, now(), 1, false)
            .expect("read")
            .expect("present");
        let second = service
            .student_data(&id, now() + Duration::minutes(6), 1, false)
            .expect("read")
            .expect("present");

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(counting.queries.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unknown_student_is_none() {
        let (_mem, _counting, service) = service_with_counter();

        let result = service
            .student_data(&StudentId::new("000000000"), now(), 1, false)
            .expect("read");

        assert!(result.is_none());
        assert_eq!(service.cached_students(), 0);
    }

    #[test]
    fn write_is_reflected_by_the_next_read() {
        let (_mem, _counting, service) = service_with_counter();
        let student = student("823251213");
        let id = student.student_id.clone();

        let before = service
            .student_data(&id, now(), 1, false)
            .expect("read")
            .expect("present");
        assert!(before.placement.placement_needed);

        service
            .store_math_plan_responses(
                &student,
                pages::PLAN,
                &[crate::placement::RECOMMENDATION_QUESTION],
                &[Some("(none) No mathematics required".to_string())],
                now() + Duration::minutes(1),
                1,
            )
            .expect("store");

        let after = service
            .student_data(&id, now() + Duration::minutes(2), 1, false)
            .expect("read")
            .expect("present");

        assert!(!Arc::ptr_eq(&before, &after));
        assert!(!after.placement.placement_needed);
        assert_eq!(after.placement.how_satisfied, HowSatisfied::None);
    }

    #[test]
    fn none_answer_deletes_same_minute_response() {
        let (mem, _counting, service) = service_with_counter();
        let student = student("823251213");

        service
            .store_math_plan_responses(
                &student,
                pages::PLAN,
                &[1, 2],
                &[Some("7030".to_string()), Some("(none)".to_string())],
                now(),
                1,
            )
            .expect("store");
        assert_eq!(mem.response_count(), 2);

        // Same minute, question 2 retracted.
        service
            .store_math_plan_responses(&student, pages::PLAN, &[2], &[None], now(), 1)
            .expect("store");
        assert_eq!(mem.response_count(), 1);
    }

    #[test]
    fn delete_responses_rebuilds_cache_entry() {
        let (_mem, _counting, service) = service_with_counter();
        let student = student("823251213");
        let id = student.student_id.clone();

        service
            .store_math_plan_responses(
                &student,
                pages::PLAN,
                &[crate::placement::RECOMMENDATION_QUESTION],
                &[Some("(none)".to_string())],
                now(),
                1,
            )
            .expect("store");

        let deleted = service
            .delete_math_plan_responses(&student, pages::PLAN, now() + Duration::minutes(1))
            .expect("delete");
        assert!(deleted);

        let after = service
            .student_data(&id, now() + Duration::minutes(2), 1, false)
            .expect("read")
            .expect("present");
        assert!(after.placement.placement_needed);

        // Nothing left to delete.
        assert!(
            !service
                .delete_math_plan_responses(&student, pages::PLAN, now() + Duration::minutes(3))
                .expect("delete")
        );
    }

    #[test]
    fn plan_status_tracks_intentions_page() {
        let (_mem, _counting, service) = service_with_counter();
        let student = student("823251213");
        let id = student.student_id.clone();

        assert!(!service.math_plan_status(&id).expect("status"));

        service
            .store_math_plan_responses(
                &student,
                pages::INTENTIONS,
                &[1],
                &[Some("Y".to_string())],
                now(),
                1,
            )
            .expect("store");

        assert!(service.math_plan_status(&id).expect("status"));
    }

    #[test]
    fn self_report_decoding_used_by_resolver() {
        // The decoded enum drives the needed flag end to end.
        assert_eq!(
            SelfReportedPlan::from_answer("2 cr. of Core Mathematics"),
            SelfReportedPlan::CoreCredits(2)
        );

        let (_mem, _counting, service) = service_with_counter();
        let student = student("823251213");
        service
            .store_math_plan_responses(
                &student,
                pages::PLAN,
                &[crate::placement::RECOMMENDATION_QUESTION],
                &[Some("2 cr. of Core Mathematics".to_string())],
                now(),
                1,
            )
            .expect("store");

        let status = service
            .math_placement_status(&student.student_id)
            .expect("resolve");
        assert!(!status.placement_needed);
        assert!(!status.placement_complete);
    }
}
