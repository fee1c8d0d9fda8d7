//! # redb-backed Backing Store
//!
//! A disk-backed implementation of the backing-store traits using the redb
//! embedded database, providing:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//! - Zero configuration
//!
//! Values are postcard-encoded record lists keyed by student ID. This store
//! backs standalone deployments; institutional deployments point the traits
//! at the registrar's systems instead.

use super::memory::latest_per_question;
use super::{
    PlacementAttemptStore, RegistrationStore, StudentStore, SurveyResponseStore,
    TransferCreditStore,
};
use crate::types::{
    MathPlanError, PlacementAttempt, Registration, Student, StudentId, SurveyResponse,
    TransferCredit,
};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;

/// Table for students: student ID -> serialized Student
const STUDENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("students");

/// Table for registrations: student ID -> serialized Vec<Registration>
const REGISTRATIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("registrations");

/// Table for transfer credits: student ID -> serialized Vec<TransferCredit>
const TRANSFER_CREDITS: TableDefinition<&str, &[u8]> = TableDefinition::new("transfer_credits");

/// Table for placement attempts: student ID -> serialized Vec<PlacementAttempt>
const ATTEMPTS: TableDefinition<&str, &[u8]> = TableDefinition::new("attempts");

/// Table for survey responses: student ID -> serialized Vec<SurveyResponse>
const RESPONSES: TableDefinition<&str, &[u8]> = TableDefinition::new("responses");

fn io_err(e: impl std::fmt::Display) -> MathPlanError {
    MathPlanError::Io(e.to_string())
}

fn ser_err(e: impl std::fmt::Display) -> MathPlanError {
    MathPlanError::Serialization(e.to_string())
}

/// A disk-backed store using redb.
pub struct RedbStore {
    /// The redb database handle.
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a store database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MathPlanError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(STUDENTS).map_err(io_err)?;
            let _ = write_txn.open_table(REGISTRATIONS).map_err(io_err)?;
            let _ = write_txn.open_table(TRANSFER_CREDITS).map_err(io_err)?;
            let _ = write_txn.open_table(ATTEMPTS).map_err(io_err)?;
            let _ = write_txn.open_table(RESPONSES).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        Ok(Self { db })
    }

    // =========================================================================
    // GENERIC LIST ACCESS
    // =========================================================================

    fn read_list<T: serde::de::DeserializeOwned>(
        &self,
        table: TableDefinition<&'static str, &'static [u8]>,
        key: &str,
    ) -> Result<Vec<T>, MathPlanError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(table).map_err(io_err)?;
        match table.get(key).map_err(io_err)? {
            None => Ok(Vec::new()),
            Some(bytes) => postcard::from_bytes(bytes.value()).map_err(ser_err),
        }
    }

    fn write_list<T: serde::Serialize>(
        &self,
        table: TableDefinition<&'static str, &'static [u8]>,
        key: &str,
        list: &[T],
    ) -> Result<(), MathPlanError> {
        let bytes = postcard::to_allocvec(list).map_err(ser_err)?;
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(table).map_err(io_err)?;
            table.insert(key, bytes.as_slice()).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)
    }

    // =========================================================================
    // SEEDING
    // =========================================================================

    /// Insert or replace a student record.
    pub fn put_student(&self, student: &Student) -> Result<(), MathPlanError> {
        let bytes = postcard::to_allocvec(student).map_err(ser_err)?;
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(STUDENTS).map_err(io_err)?;
            table
                .insert(student.student_id.as_str(), bytes.as_slice())
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)
    }

    /// Append a course registration.
    pub fn add_registration(&self, registration: &Registration) -> Result<(), MathPlanError> {
        let key = registration.student_id.as_str().to_string();
        let mut list: Vec<Registration> = self.read_list(REGISTRATIONS, &key)?;
        list.push(registration.clone());
        self.write_list(REGISTRATIONS, &key, &list)
    }

    /// Append a legitimate placement attempt.
    pub fn add_attempt(&self, attempt: &PlacementAttempt) -> Result<(), MathPlanError> {
        let key = attempt.student_id.as_str().to_string();
        let mut list: Vec<PlacementAttempt> = self.read_list(ATTEMPTS, &key)?;
        list.push(attempt.clone());
        self.write_list(ATTEMPTS, &key, &list)
    }

    /// Compact the database (optional optimization).
    pub fn compact(&mut self) -> Result<(), MathPlanError> {
        self.db.compact().map_err(io_err)?;
        Ok(())
    }
}

// =============================================================================
// TRAIT IMPLEMENTATIONS
// =============================================================================

impl StudentStore for RedbStore {
    fn query_student(&self, student_id: &StudentId) -> Result<Option<Student>, MathPlanError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(STUDENTS).map_err(io_err)?;
        match table.get(student_id.as_str()).map_err(io_err)? {
            None => Ok(None),
            Some(bytes) => postcard::from_bytes(bytes.value())
                .map(Some)
                .map_err(ser_err),
        }
    }
}

impl RegistrationStore for RedbStore {
    fn query_completed_courses(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<Registration>, MathPlanError> {
        let list: Vec<Registration> = self.read_list(REGISTRATIONS, student_id.as_str())?;
        Ok(list.into_iter().filter(|r| r.completed).collect())
    }
}

impl TransferCreditStore for RedbStore {
    fn query_transfer_credits(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<TransferCredit>, MathPlanError> {
        self.read_list(TRANSFER_CREDITS, student_id.as_str())
    }

    fn insert_transfer_credit(&self, credit: &TransferCredit) -> Result<(), MathPlanError> {
        let key = credit.student_id.as_str().to_string();
        let mut list: Vec<TransferCredit> = self.read_list(TRANSFER_CREDITS, &key)?;
        list.push(credit.clone());
        self.write_list(TRANSFER_CREDITS, &key, &list)
    }
}

impl PlacementAttemptStore for RedbStore {
    fn query_legal_attempts(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<PlacementAttempt>, MathPlanError> {
        self.read_list(ATTEMPTS, student_id.as_str())
    }
}

impl SurveyResponseStore for RedbStore {
    fn query_latest_responses(
        &self,
        student_id: &StudentId,
        page_id: &str,
    ) -> Result<Vec<SurveyResponse>, MathPlanError> {
        let list: Vec<SurveyResponse> = self.read_list(RESPONSES, student_id.as_str())?;
        Ok(latest_per_question(
            list.iter().filter(|r| r.page_id == page_id),
        ))
    }

    fn insert_response(&self, response: &SurveyResponse) -> Result<(), MathPlanError> {
        let key = response.student_id.as_str().to_string();
        let mut list: Vec<SurveyResponse> = self.read_list(RESPONSES, &key)?;
        list.push(response.clone());
        self.write_list(RESPONSES, &key, &list)
    }

    fn delete_response(&self, response: &SurveyResponse) -> Result<(), MathPlanError> {
        let key = response.student_id.as_str().to_string();
        let mut list: Vec<SurveyResponse> = self.read_list(RESPONSES, &key)?;
        list.retain(|r| {
            !(r.page_id == response.page_id
                && r.question == response.question
                && r.same_submission(response.response_date, response.finish_time))
        });
        self.write_list(RESPONSES, &key, &list)
    }

    fn delete_responses_for_page(
        &self,
        student_id: &StudentId,
        page_id: &str,
    ) -> Result<bool, MathPlanError> {
        let key = student_id.as_str().to_string();
        let mut list: Vec<SurveyResponse> = self.read_list(RESPONSES, &key)?;
        let before = list.len();
        list.retain(|r| r.page_id != page_id);
        let deleted = list.len() < before;
        if deleted {
            self.write_list(RESPONSES, &key, &list)?;
        }
        Ok(deleted)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CourseId;
    use chrono::NaiveDate;

    fn open_temp() -> (RedbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RedbStore::open(dir.path().join("mathplan.db")).expect("open");
        (store, dir)
    }

    #[test]
    fn student_roundtrip() {
        let (store, _dir) = open_temp();
        let student = Student {
            student_id: StudentId::new("823251213"),
            name: Some("Riley Chen".to_string()),
            program_code: Some("CPSC-BS".to_string()),
            application_term: Some("FA26".to_string()),
        };

        store.put_student(&student).expect("put");
        let loaded = store
            .query_student(&student.student_id)
            .expect("query")
            .expect("present");

        assert_eq!(loaded, student);
        assert!(
            store
                .query_student(&StudentId::new("000000000"))
                .expect("query")
                .is_none()
        );
    }

    #[test]
    fn completed_courses_filtered_on_read() {
        let (store, _dir) = open_temp();
        let id = StudentId::new("823251213");
        store
            .add_registration(&Registration {
                student_id: id.clone(),
                course: CourseId::new("M 117"),
                completed: true,
            })
            .expect("add");
        store
            .add_registration(&Registration {
                student_id: id.clone(),
                course: CourseId::new("M 118"),
                completed: false,
            })
            .expect("add");

        let completed = store.query_completed_courses(&id).expect("query");
        assert_eq!(completed.len(), 1);
    }

    #[test]
    fn responses_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mathplan.db");
        let id = StudentId::new("823251213");
        let response = SurveyResponse {
            student_id: id.clone(),
            page_id: "plan".to_string(),
            question: 2,
            answer: "(none)".to_string(),
            response_date: NaiveDate::from_ymd_opt(2026, 8, 6).expect("date"),
            finish_time: 615,
            session_tag: 42,
        };

        {
            let store = RedbStore::open(&path).expect("open");
            store.insert_response(&response).expect("insert");
        }

        let store = RedbStore::open(&path).expect("reopen");
        let latest = store.query_latest_responses(&id, "plan").expect("query");
        assert_eq!(latest, vec![response]);
    }

    #[test]
    fn delete_page_removes_only_that_page() {
        let (store, _dir) = open_temp();
        let id = StudentId::new("823251213");
        let mut response = SurveyResponse {
            student_id: id.clone(),
            page_id: "plan".to_string(),
            question: 1,
            answer: "x".to_string(),
            response_date: NaiveDate::from_ymd_opt(2026, 8, 6).expect("date"),
            finish_time: 615,
            session_tag: 42,
        };
        store.insert_response(&response).expect("insert");
        response.page_id = "majors".to_string();
        store.insert_response(&response).expect("insert");

        assert!(store.delete_responses_for_page(&id, "plan").expect("delete"));
        assert!(
            store
                .query_latest_responses(&id, "plan")
                .expect("query")
                .is_empty()
        );
        assert_eq!(
            store
                .query_latest_responses(&id, "majors")
                .expect("query")
                .len(),
            1
        );
    }
}
