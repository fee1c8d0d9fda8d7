//! # Student Data Cache
//!
//! A bounded, TTL-expiring map of derived plan objects, one per recently
//! active student.
//!
//! Entries live in a monotonic-sequence-keyed `BTreeMap`, so iteration
//! order is insertion order. Every entry shares one TTL, so insertion order
//! equals expiration order: the sweep walks from the front and stops at the
//! first non-expired entry, O(expired) amortized. This breaks if TTLs ever
//! become per-entry; an explicit time-ordered structure would be needed
//! then.

use crate::plan::MathPlanStudentData;
use crate::types::StudentId;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One cached entry.
#[derive(Debug, Clone)]
struct CacheEntry {
    student_id: StudentId,
    data: Arc<MathPlanStudentData>,
}

/// The per-student plan cache.
///
/// Not internally synchronized; the owning service serializes access under
/// its lock.
#[derive(Debug)]
pub struct StudentDataCache {
    /// The shared TTL for every entry.
    ttl: Duration,
    /// Insertion sequence -> entry; iteration order is insertion order.
    entries: BTreeMap<u64, CacheEntry>,
    /// Student ID -> insertion sequence.
    index: BTreeMap<StudentId, u64>,
    /// Next insertion sequence.
    next_seq: u64,
}

impl StudentDataCache {
    /// Create an empty cache with the given TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: BTreeMap::new(),
            index: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// The cache TTL.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch the cached data for a student, sweeping expired entries
    /// first. A hit is always younger than the TTL.
    pub fn get(&mut self, student_id: &StudentId, now: DateTime<Utc>) -> Option<Arc<MathPlanStudentData>> {
        self.sweep(now);
        self.index
            .get(student_id)
            .and_then(|seq| self.entries.get(seq))
            .map(|entry| entry.data.clone())
    }

    /// Insert or replace the entry for a student. Replacement re-enqueues
    /// the student at the back, keeping insertion order aligned with the
    /// fresh creation timestamp.
    pub fn insert(&mut self, data: Arc<MathPlanStudentData>) {
        let student_id = data.student.student_id.clone();
        if let Some(old_seq) = self.index.remove(&student_id) {
            self.entries.remove(&old_seq);
        }

        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        self.entries.insert(seq, CacheEntry { student_id: student_id.clone(), data });
        self.index.insert(student_id, seq);
    }

    /// Remove expired entries from the front of iteration order, stopping
    /// at the first non-expired entry.
    pub fn sweep(&mut self, now: DateTime<Utc>) {
        while let Some((&seq, entry)) = self.entries.first_key_value() {
            if !entry.data.is_expired(now, self.ttl) {
                break;
            }
            let student_id = entry.student_id.clone();
            self.entries.remove(&seq);
            self.index.remove(&student_id);
        }
    }

    /// Number of live entries (including any not yet swept).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
