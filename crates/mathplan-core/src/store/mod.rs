//! # Backing Stores
//!
//! The narrow interfaces to the external record systems this core consumes:
//! students, registrations, transfer credits, placement attempts, survey
//! responses, and the live (possibly unavailable) records system.
//!
//! Two implementations ship with the crate:
//! - [`MemoryStore`] — in-memory, for tests and demos
//! - [`RedbStore`] — disk-backed via redb, for standalone deployments
//!
//! The live records system is only ever reached through [`LiveSystemGate`],
//! which converts a failure into a process-wide "down" flag instead of
//! propagating it.

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::types::{
    LiveCredit, MathPlanError, PlacementAttempt, Registration, Student, StudentId, SurveyResponse,
    TransferCredit,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// =============================================================================
// STORE TRAITS
// =============================================================================

/// Read access to student records.
pub trait StudentStore: Send + Sync {
    /// Fetch one student; `None` when no record exists.
    fn query_student(&self, student_id: &StudentId) -> Result<Option<Student>, MathPlanError>;
}

/// Read access to course registrations.
pub trait RegistrationStore: Send + Sync {
    /// All completed course registrations for a student.
    fn query_completed_courses(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<Registration>, MathPlanError>;
}

/// Access to the local transfer-credit records.
pub trait TransferCreditStore: Send + Sync {
    /// All locally recorded transfer credits for a student.
    fn query_transfer_credits(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<TransferCredit>, MathPlanError>;

    /// Record a transfer credit locally. Used to reconcile credits first
    /// seen in the live system.
    fn insert_transfer_credit(&self, credit: &TransferCredit) -> Result<(), MathPlanError>;
}

/// Read access to the live records system, which may signal transient
/// unavailability. Reached only through [`LiveSystemGate`].
pub trait LiveCreditStore: Send + Sync {
    /// Transfer credits known to the live system for a student.
    fn query_live_transfer_credits(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<LiveCredit>, MathPlanError>;
}

/// Read access to legitimate placement-exam attempts.
pub trait PlacementAttemptStore: Send + Sync {
    /// All legitimate attempts on file for a student.
    fn query_legal_attempts(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<PlacementAttempt>, MathPlanError>;
}

/// Access to stored survey responses.
pub trait SurveyResponseStore: Send + Sync {
    /// The latest response per question for a student and page.
    fn query_latest_responses(
        &self,
        student_id: &StudentId,
        page_id: &str,
    ) -> Result<Vec<SurveyResponse>, MathPlanError>;

    /// Store one response.
    fn insert_response(&self, response: &SurveyResponse) -> Result<(), MathPlanError>;

    /// Delete one previously stored response, matched by student, page,
    /// question, and submission timestamp.
    fn delete_response(&self, response: &SurveyResponse) -> Result<(), MathPlanError>;

    /// Delete every response for a student and page. Returns whether any
    /// row was deleted.
    fn delete_responses_for_page(
        &self,
        student_id: &StudentId,
        page_id: &str,
    ) -> Result<bool, MathPlanError>;
}

// =============================================================================
// STORE BUNDLE
// =============================================================================

/// Shared handles to the local backing stores.
///
/// The live records system is deliberately not part of the bundle; it is
/// reached through [`LiveSystemGate`] only.
#[derive(Clone)]
pub struct BackingStores {
    /// Student records.
    pub students: Arc<dyn StudentStore>,
    /// Course registrations.
    pub registrations: Arc<dyn RegistrationStore>,
    /// Local transfer credits.
    pub transfers: Arc<dyn TransferCreditStore>,
    /// Legitimate placement attempts.
    pub attempts: Arc<dyn PlacementAttemptStore>,
    /// Survey responses.
    pub surveys: Arc<dyn SurveyResponseStore>,
}

impl BackingStores {
    /// Bundle a single store object that implements every local trait.
    #[must_use]
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: StudentStore
            + RegistrationStore
            + TransferCreditStore
            + PlacementAttemptStore
            + SurveyResponseStore
            + 'static,
    {
        Self {
            students: store.clone(),
            registrations: store.clone(),
            transfers: store.clone(),
            attempts: store.clone(),
            surveys: store,
        }
    }
}

impl std::fmt::Debug for BackingStores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackingStores").finish_non_exhaustive()
    }
}

// =============================================================================
// LIVE SYSTEM GATE
// =============================================================================

/// Gate in front of the live records system.
///
/// The first failure is logged and flips a process-wide down flag; while the
/// flag is set, queries return empty without touching the live system. The
/// flag stays set until [`LiveSystemGate::reset`] is called externally — no
/// automatic retry.
pub struct LiveSystemGate {
    store: Arc<dyn LiveCreditStore>,
    down: AtomicBool,
}

impl LiveSystemGate {
    /// Create a gate over a live store handle.
    #[must_use]
    pub fn new(store: Arc<dyn LiveCreditStore>) -> Self {
        Self {
            store,
            down: AtomicBool::new(false),
        }
    }

    /// Query live transfer credits; empty while the system is down.
    pub fn query(&self, student_id: &StudentId) -> Vec<LiveCredit> {
        if self.is_down() {
            return Vec::new();
        }
        match self.store.query_live_transfer_credits(student_id) {
            Ok(credits) => credits,
            Err(e) => {
                tracing::warn!(error = %e, "live records system unavailable; marking down");
                self.down.store(true, Ordering::Release);
                Vec::new()
            }
        }
    }

    /// Whether the down flag is currently set.
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.down.load(Ordering::Acquire)
    }

    /// Clear the down flag so the next query reaches the live system again.
    pub fn reset(&self) {
        self.down.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for LiveSystemGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSystemGate")
            .field("down", &self.is_down())
            .finish_non_exhaustive()
    }
}

/// Stand-in live store for deployments without live-system connectivity.
/// Always available, never reports credits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLiveCreditStore;

impl LiveCreditStore for NullLiveCreditStore {
    fn query_live_transfer_credits(
        &self,
        _student_id: &StudentId,
    ) -> Result<Vec<LiveCredit>, MathPlanError> {
        Ok(Vec::new())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingLive;

    impl LiveCreditStore for FailingLive {
        fn query_live_transfer_credits(
            &self,
            _student_id: &StudentId,
        ) -> Result<Vec<LiveCredit>, MathPlanError> {
            Err(MathPlanError::LiveSystemUnavailable("timeout".to_string()))
        }
    }

    #[test]
    fn gate_latches_down_on_failure() {
        let gate = LiveSystemGate::new(Arc::new(FailingLive));
        let id = StudentId::new("823251213");

        assert!(!gate.is_down());
        assert!(gate.query(&id).is_empty());
        assert!(gate.is_down());

        // Still down; no further live calls are attempted.
        assert!(gate.query(&id).is_empty());
        assert!(gate.is_down());
    }

    #[test]
    fn gate_reset_clears_flag() {
        let gate = LiveSystemGate::new(Arc::new(FailingLive));
        let id = StudentId::new("823251213");

        let _ = gate.query(&id);
        assert!(gate.is_down());

        gate.reset();
        assert!(!gate.is_down());
    }

    #[test]
    fn null_live_store_is_always_available() {
        let gate = LiveSystemGate::new(Arc::new(NullLiveCreditStore));
        let id = StudentId::new("823251213");

        assert!(gate.query(&id).is_empty());
        assert!(!gate.is_down());
    }
}
