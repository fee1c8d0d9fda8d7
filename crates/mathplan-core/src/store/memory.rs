//! # In-Memory Backing Store
//!
//! One store object implementing every backing-store trait over plain
//! `BTreeMap`s. Used by tests and the demo data set; state is volatile.

use super::{
    LiveCreditStore, PlacementAttemptStore, RegistrationStore, StudentStore, SurveyResponseStore,
    TransferCreditStore,
};
use crate::types::{
    LiveCredit, MathPlanError, PlacementAttempt, Registration, Student, StudentId, SurveyResponse,
    TransferCredit,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// In-memory implementation of all backing-store traits.
///
/// Interior mutability behind one mutex so the store can be shared as
/// `Arc<MemoryStore>` and seeded from tests while queries run.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    students: BTreeMap<StudentId, Student>,
    registrations: BTreeMap<StudentId, Vec<Registration>>,
    transfer_credits: BTreeMap<StudentId, Vec<TransferCredit>>,
    live_credits: BTreeMap<StudentId, Vec<LiveCredit>>,
    attempts: BTreeMap<StudentId, Vec<PlacementAttempt>>,
    responses: Vec<SurveyResponse>,
    live_available: bool,
}

impl MemoryStore {
    /// Create an empty store with the live system available.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                live_available: true,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // SEEDING
    // =========================================================================

    /// Insert or replace a student record.
    pub fn put_student(&self, student: Student) {
        self.lock()
            .students
            .insert(student.student_id.clone(), student);
    }

    /// Append a course registration.
    pub fn add_registration(&self, registration: Registration) {
        self.lock()
            .registrations
            .entry(registration.student_id.clone())
            .or_default()
            .push(registration);
    }

    /// Append a local transfer credit.
    pub fn add_transfer_credit(&self, credit: TransferCredit) {
        self.lock()
            .transfer_credits
            .entry(credit.student_id.clone())
            .or_default()
            .push(credit);
    }

    /// Append a live-system transfer credit.
    pub fn add_live_credit(&self, credit: LiveCredit) {
        self.lock()
            .live_credits
            .entry(credit.student_id.clone())
            .or_default()
            .push(credit);
    }

    /// Append a legitimate placement attempt.
    pub fn add_attempt(&self, attempt: PlacementAttempt) {
        self.lock()
            .attempts
            .entry(attempt.student_id.clone())
            .or_default()
            .push(attempt);
    }

    /// Toggle simulated live-system availability.
    pub fn set_live_available(&self, available: bool) {
        self.lock().live_available = available;
    }

    /// Number of stored survey responses, all pages.
    #[must_use]
    pub fn response_count(&self) -> usize {
        self.lock().responses.len()
    }
}

// =============================================================================
// TRAIT IMPLEMENTATIONS
// =============================================================================

impl StudentStore for MemoryStore {
    fn query_student(&self, student_id: &StudentId) -> Result<Option<Student>, MathPlanError> {
        Ok(self.lock().students.get(student_id).cloned())
    }
}

impl RegistrationStore for MemoryStore {
    fn query_completed_courses(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<Registration>, MathPlanError> {
        Ok(self
            .lock()
            .registrations
            .get(student_id)
            .map(|regs| regs.iter().filter(|r| r.completed).cloned().collect())
            .unwrap_or_default())
    }
}

impl TransferCreditStore for MemoryStore {
    fn query_transfer_credits(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<TransferCredit>, MathPlanError> {
        Ok(self
            .lock()
            .transfer_credits
            .get(student_id)
            .cloned()
            .unwrap_or_default())
    }

    fn insert_transfer_credit(&self, credit: &TransferCredit) -> Result<(), MathPlanError> {
        self.add_transfer_credit(credit.clone());
        Ok(())
    }
}

impl LiveCreditStore for MemoryStore {
    fn query_live_transfer_credits(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<LiveCredit>, MathPlanError> {
        let inner = self.lock();
        if !inner.live_available {
            return Err(MathPlanError::LiveSystemUnavailable(
                "simulated outage".to_string(),
            ));
        }
        Ok(inner
            .live_credits
            .get(student_id)
            .cloned()
            .unwrap_or_default())
    }
}

impl PlacementAttemptStore for MemoryStore {
    fn query_legal_attempts(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<PlacementAttempt>, MathPlanError> {
        Ok(self
            .lock()
            .attempts
            .get(student_id)
            .cloned()
            .unwrap_or_default())
    }
}

impl SurveyResponseStore for MemoryStore {
    fn query_latest_responses(
        &self,
        student_id: &StudentId,
        page_id: &str,
    ) -> Result<Vec<SurveyResponse>, MathPlanError> {
        let inner = self.lock();
        Ok(latest_per_question(
            inner
                .responses
                .iter()
                .filter(|r| &r.student_id == student_id && r.page_id == page_id),
        ))
    }

    fn insert_response(&self, response: &SurveyResponse) -> Result<(), MathPlanError> {
        self.lock().responses.push(response.clone());
        Ok(())
    }

    fn delete_response(&self, response: &SurveyResponse) -> Result<(), MathPlanError> {
        self.lock().responses.retain(|r| {
            !(r.student_id == response.student_id
                && r.page_id == response.page_id
                && r.question == response.question
                && r.same_submission(response.response_date, response.finish_time))
        });
        Ok(())
    }

    fn delete_responses_for_page(
        &self,
        student_id: &StudentId,
        page_id: &str,
    ) -> Result<bool, MathPlanError> {
        let mut inner = self.lock();
        let before = inner.responses.len();
        inner
            .responses
            .retain(|r| !(&r.student_id == student_id && r.page_id == page_id));
        Ok(inner.responses.len() < before)
    }
}

/// Reduce a response history to the latest response per question number,
/// ordered by question.
pub(crate) fn latest_per_question<'a>(
    responses: impl Iterator<Item = &'a SurveyResponse>,
) -> Vec<SurveyResponse> {
    let mut latest: BTreeMap<u32, &SurveyResponse> = BTreeMap::new();
    for response in responses {
        match latest.get(&response.question) {
            Some(existing)
                if (existing.response_date, existing.finish_time)
                    >= (response.response_date, response.finish_time) => {}
            _ => {
                latest.insert(response.question, response);
            }
        }
    }
    latest.into_values().cloned().collect()
}

// =============================================================================
// TESTS
// =============================================================================
