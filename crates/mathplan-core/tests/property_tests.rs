//! # Property-Based Tests
//!
//! Verification tests using proptest.
//!
//! These tests pin the catalog partition invariants and the cache's
//! insertion-order expiration behavior.

use chrono::{DateTime, Duration, Utc};
use mathplan_core::{
    MajorRequirementCatalog, MathPlanPlacementStatus, MathPlanStudentData, MathTier, Student,
    StudentDataCache, StudentId,
};
use proptest::prelude::*;
use std::sync::Arc;

fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-08-06T08:00:00Z")
        .expect("timestamp")
        .with_timezone(&Utc)
}

fn plan_data(id: &str, created: DateTime<Utc>) -> Arc<MathPlanStudentData> {
    Arc::new(MathPlanStudentData {
        student: Student {
            student_id: StudentId::new(id),
            name: None,
            program_code: None,
            application_term: None,
        },
        majors_of_interest: Vec::new(),
        recommended_tier: MathTier::CoreOnly,
        transfer_credits: Vec::new(),
        placement: MathPlanPlacementStatus::unsatisfied(true),
        created,
    })
}

// =============================================================================
// PARTITION INVARIANTS
// =============================================================================

/// Every major appears in exactly one of the four tier lists.
#[test]
fn tier_lists_strictly_partition_all_majors() {
    let catalog = MajorRequirementCatalog::build();
    let total: usize = catalog.tier_lists().iter().map(|(_, l)| l.len()).sum();
    assert_eq!(total, catalog.majors().len());

    for major in catalog.majors().keys() {
        let appearances = catalog
            .tier_lists()
            .iter()
            .filter(|(_, list)| list.contains(major))
            .count();
        assert_eq!(
            appearances, 1,
            "{} appears in {} tier lists",
            major.program_code, appearances
        );
    }
}

/// Every concentration's parent major appears in the same tier list.
#[test]
fn concentration_parents_share_the_tier_list() {
    let catalog = MajorRequirementCatalog::build();

    for (tier, list) in catalog.tier_lists() {
        for entry in list {
            if entry.concentration_name.is_none() {
                continue;
            }
            let parent_present = list
                .iter()
                .any(|m| m.concentration_name.is_none() && m.major_name == entry.major_name);
            assert!(
                parent_present,
                "{} has no parent in the {:?} list",
                entry.program_code, tier
            );
        }
    }
}

/// Placeholder (legacy) codes classify into exactly one tier like any
/// other major.
#[test]
fn placeholder_majors_classify() {
    let catalog = MajorRequirementCatalog::build();
    let placeholders: Vec<_> = catalog
        .majors()
        .keys()
        .filter(|m| m.placeholder)
        .collect();
    assert!(!placeholders.is_empty());

    for major in placeholders {
        let appearances = catalog
            .tier_lists()
            .iter()
            .filter(|(_, list)| list.contains(major))
            .count();
        assert_eq!(appearances, 1);
    }
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Classification is a pure function of the requirement: the resolved
    /// tier index always matches re-classifying the stored requirement.
    #[test]
    fn tier_index_matches_classification(seed in 0usize..64) {
        let catalog = MajorRequirementCatalog::build();
        let majors: Vec<_> = catalog.majors().iter().collect();
        let (major, req) = &majors[seed % majors.len()];

        prop_assert_eq!(
            catalog.tier_for_program(&major.program_code),
            Some(catalog.classify(req))
        );
    }

    /// Inserting N entries one second apart and expiring the first K via a
    /// simulated clock advance evicts exactly K and retains N-K.
    #[test]
    fn expiring_k_of_n_retains_the_rest(n in 1usize..40, k_seed in 0usize..40) {
        let k = k_seed % (n + 1);
        let ttl = Duration::seconds(1000);
        let mut cache = StudentDataCache::new(ttl);

        for i in 0..n {
            let id = format!("99{i:07}");
            cache.insert(plan_data(&id, base_time() + Duration::seconds(i as i64)));
        }

        // Advance so that entries 0..k are at or past the TTL.
        let now = base_time() + ttl + Duration::seconds(k as i64 - 1);
        cache.sweep(now);

        prop_assert_eq!(cache.len(), n - k);
        for i in 0..n {
            let id = StudentId::new(format!("99{i:07}"));
            prop_assert_eq!(cache.get(&id, now).is_some(), i >= k);
        }
    }

    /// A cached read never returns an object older than the TTL.
    #[test]
    fn reads_never_return_stale_data(age_seconds in 0i64..700) {
        let ttl = Duration::minutes(5);
        let mut cache = StudentDataCache::new(ttl);
        cache.insert(plan_data("823251213", base_time()));

        let now = base_time() + Duration::seconds(age_seconds);
        if let Some(data) = cache.get(&StudentId::new("823251213"), now) {
            prop_assert!(!data.is_expired(now, ttl));
        } else {
            prop_assert!(age_seconds >= 300);
        }
    }
}
