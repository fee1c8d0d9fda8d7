//! # Placement Flow Tests
//!
//! End-to-end tests of the service surface: placement precedence, the
//! live-system down flag, and the cached plan lifecycle.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use mathplan_core::{
    BackingStores, CourseId, HowSatisfied, LiveCredit, MathPlanService, MemoryStore,
    PlacementAttempt, Registration, Student, StudentId, SurveyResponseStore, TransferCredit,
    pages, placement::RECOMMENDATION_QUESTION,
};
use std::sync::Arc;

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-08-06T11:00:00Z")
        .expect("timestamp")
        .with_timezone(&Utc)
}

fn student(id: &str, program: Option<&str>) -> Student {
    Student {
        student_id: StudentId::new(id),
        name: Some("Riley Chen".to_string()),
        program_code: program.map(str::to_string),
        application_term: Some("FA26".to_string()),
    }
}

fn service_over(store: &Arc<MemoryStore>) -> MathPlanService {
    MathPlanService::new(BackingStores::shared(store.clone()), store.clone())
}

// =============================================================================
// PLACEMENT PRECEDENCE
// =============================================================================

mod precedence {
    use super::*;

    #[test]
    fn attempt_outranks_all_other_evidence() {
        let store = Arc::new(MemoryStore::new());
        let id = StudentId::new("823251213");
        store.add_attempt(PlacementAttempt {
            student_id: id.clone(),
            exam_id: "MPTTC".to_string(),
            exam_date: NaiveDate::from_ymd_opt(2026, 6, 15).expect("date"),
        });
        store.add_transfer_credit(TransferCredit {
            student_id: id.clone(),
            course: CourseId::new("M 124"),
            recorded: None,
        });
        store.add_registration(Registration {
            student_id: id.clone(),
            course: CourseId::new("MATH 126"),
            completed: true,
        });

        let service = service_over(&store);
        let status = service.math_placement_status(&id).expect("resolve");

        assert!(status.placement_complete);
        assert!(!status.placement_needed);
        assert_eq!(status.how_satisfied, HowSatisfied::PlacementExam);
    }

    #[test]
    fn transfer_credit_outranks_course_credit() {
        let store = Arc::new(MemoryStore::new());
        let id = StudentId::new("823251213");
        store.add_transfer_credit(TransferCredit {
            student_id: id.clone(),
            course: CourseId::new("M 127"),
            recorded: None,
        });
        store.add_registration(Registration {
            student_id: id.clone(),
            course: CourseId::new("M 117"),
            completed: true,
        });

        let service = service_over(&store);
        let status = service.math_placement_status(&id).expect("resolve");

        assert_eq!(status.how_satisfied, HowSatisfied::TransferCredit);
    }

    #[test]
    fn course_credit_is_last_evidence_checked() {
        let store = Arc::new(MemoryStore::new());
        let id = StudentId::new("823251213");
        store.add_registration(Registration {
            student_id: id.clone(),
            course: CourseId::new("M 125"),
            completed: true,
        });

        let service = service_over(&store);
        let status = service.math_placement_status(&id).expect("resolve");

        assert_eq!(status.how_satisfied, HowSatisfied::CourseCredit);
        assert!(status.placement_complete);
    }

    #[test]
    fn self_report_alone_never_completes_placement() {
        let store = Arc::new(MemoryStore::new());
        let id = StudentId::new("823251213");
        store
            .insert_response(&mathplan_core::SurveyResponse {
                student_id: id.clone(),
                page_id: pages::PLAN.to_string(),
                question: RECOMMENDATION_QUESTION,
                answer: "(none) No mathematics required".to_string(),
                response_date: NaiveDate::from_ymd_opt(2026, 8, 1).expect("date"),
                finish_time: 615,
                session_tag: 3,
            })
            .expect("insert");

        let service = service_over(&store);
        let status = service.math_placement_status(&id).expect("resolve");

        assert!(!status.placement_needed);
        assert!(!status.placement_complete);
        assert_eq!(status.how_satisfied, HowSatisfied::None);
    }
}

// =============================================================================
// LIVE-SYSTEM OUTAGE
// =============================================================================

mod outage {
    use super::*;

    #[test]
    fn failure_latches_the_down_flag_until_reset() {
        let store = Arc::new(MemoryStore::new());
        let id = StudentId::new("823251213");
        store.add_live_credit(LiveCredit {
            student_id: id.clone(),
            course: CourseId::new("M 118"),
        });
        store.set_live_available(false);

        let service = service_over(&store);
        assert!(!service.live_system_down());

        // The failed live query flips the flag; no retry happens.
        let _ = service.math_placement_status(&id).expect("resolve");
        assert!(service.live_system_down());

        // While down, the live credit is invisible.
        let status = service.math_placement_status(&id).expect("resolve");
        assert_eq!(status.how_satisfied, HowSatisfied::None);

        // External reset restores live lookups.
        store.set_live_available(true);
        service.reset_live_system();
        let status = service.math_placement_status(&id).expect("resolve");
        assert_eq!(status.how_satisfied, HowSatisfied::TransferCredit);
        assert!(!service.live_system_down());
    }
}

// =============================================================================
// CACHED PLAN LIFECYCLE
// =============================================================================

mod cached_plans {
    use super::*;

    #[test]
    fn consecutive_reads_share_one_object() {
        let store = Arc::new(MemoryStore::new());
        store.put_student(student("823251213", Some("MATH-BS")));

        let service = service_over(&store);
        let id = StudentId::new("823251213");

        let first = service
            .student_data(&id, now(), 9, false)
            .expect("read")
            .expect("present");
        let second = service
            .student_data(&id, now() + Duration::minutes(2), 9, false)
            .expect("read")
            .expect("present");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.cached_students(), 1);
    }

    #[test]
    fn write_through_replaces_the_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let student = student("823251213", None);
        store.put_student(student.clone());

        let service = service_over(&store);
        let id = student.student_id.clone();

        let before = service
            .student_data(&id, now(), 9, false)
            .expect("read")
            .expect("present");
        assert!(before.majors_of_interest.is_empty());

        // Express interest in Computer Science (catalog number 7030).
        service
            .store_math_plan_responses(
                &student,
                pages::MAJORS,
                &[1],
                &[Some("7030".to_string())],
                now() + Duration::minutes(1),
                9,
            )
            .expect("store");

        let after = service
            .student_data(&id, now() + Duration::minutes(1), 9, false)
            .expect("read")
            .expect("present");

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.majors_of_interest.len(), 1);
        assert_eq!(after.majors_of_interest[0].program_code, "CPSC-BS");
        assert_eq!(after.recommended_tier, mathplan_core::MathTier::BeyondCalc1);
    }

    #[test]
    fn expired_entries_are_evicted_in_insertion_order() {
        let store = Arc::new(MemoryStore::new());
        for i in 0..4u32 {
            store.put_student(student(&format!("82325121{i}"), None));
        }

        let service = service_over(&store);
        for i in 0..4u32 {
            let id = StudentId::new(format!("82325121{i}"));
            let at = now() + Duration::minutes(i64::from(i));
            service.student_data(&id, at, 9, false).expect("read");
        }
        assert_eq!(service.cached_students(), 4);

        // Read at +6:30: entries built at +0 and +1 have aged out
        // (5-minute TTL); the later two survive.
        let id = StudentId::new("823251213");
        service
            .student_data(&id, now() + Duration::seconds(390), 9, false)
            .expect("read");

        assert_eq!(service.cached_students(), 2);
    }
}
