//! # Plan Benchmarks
//!
//! Performance benchmarks for mathplan-core catalog and cache operations.
//!
//! Run with: `cargo bench -p mathplan-core`

use chrono::{DateTime, Duration, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mathplan_core::{
    MajorRequirementCatalog, MathPlanPlacementStatus, MathPlanStudentData, MathTier, Student,
    StudentDataCache, StudentId,
};
use std::hint::black_box;
use std::sync::Arc;

fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-08-06T08:00:00Z")
        .expect("timestamp")
        .with_timezone(&Utc)
}

fn plan_data(i: usize, created: DateTime<Utc>) -> Arc<MathPlanStudentData> {
    Arc::new(MathPlanStudentData {
        student: Student {
            student_id: StudentId::new(format!("82{i:07}")),
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
// BENCHMARKS
// =============================================================================

fn bench_catalog_build(c: &mut Criterion) {
    c.bench_function("catalog_build", |b| {
        b.iter(|| black_box(MajorRequirementCatalog::build()));
    });
}

fn bench_major_lookup(c: &mut Criterion) {
    let catalog = MajorRequirementCatalog::build();

    c.bench_function("major_lookup", |b| {
        b.iter(|| black_box(catalog.major("MATH-BS")));
    });
}

fn bench_cache_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_churn");

    for size in [100, 1000, 5000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut cache = StudentDataCache::new(Duration::minutes(5));
                for i in 0..size {
                    cache.insert(plan_data(i, base_time() + Duration::seconds(i as i64)));
                }
                // Sweep with half the entries stale.
                cache.sweep(base_time() + Duration::minutes(5) + Duration::seconds(size as i64 / 2));
                black_box(cache.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_catalog_build, bench_major_lookup, bench_cache_churn);

criterion_main!(benches);
