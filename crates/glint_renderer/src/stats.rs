//! Render diagnostics.
//!
//! `RenderStats` is shared by reference between all worker threads of a
//! render. Counters are relaxed atomics: they are only read after the
//! parallel region has finished.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

/// Counters collected while rendering one frame.
#[derive(Debug, Default)]
pub struct RenderStats {
    intersection_tests: AtomicU64,
    hits: AtomicU64,
    casts: AtomicU64,
    transmission_traces: AtomicU64,
    missing_exits: AtomicU64,
    deepest_nesting: AtomicU32,
    missing_exit_reported: AtomicBool,
}

/// Plain copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Ray/triangle tests performed by all queries
    pub intersection_tests: u64,
    /// Casts that hit a surface
    pub hits: u64,
    /// Calls of the recursive caster
    pub casts: u64,
    /// Transmission walks started by the caster
    pub transmission_traces: u64,
    /// Walks inside a medium that found no exit
    pub missing_exits: u64,
    /// Deepest nesting of caster calls (primary cast = 1)
    pub deepest_nesting: u32,
}

impl RenderStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn add_intersection_tests(&self, count: u64) {
        self.intersection_tests.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_cast(&self, nesting: u32) {
        self.casts.fetch_add(1, Ordering::Relaxed);
        self.deepest_nesting.fetch_max(nesting, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_transmission_trace(&self) {
        self.transmission_traces.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a missing exit. Returns true only for the first one, so the
    /// caller can report it once.
    pub(crate) fn record_missing_exit(&self) -> bool {
        self.missing_exits.fetch_add(1, Ordering::Relaxed);
        !self.missing_exit_reported.swap(true, Ordering::Relaxed)
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            intersection_tests: self.intersection_tests.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            casts: self.casts.load(Ordering::Relaxed),
            transmission_traces: self.transmission_traces.load(Ordering::Relaxed),
            missing_exits: self.missing_exits.load(Ordering::Relaxed),
            deepest_nesting: self.deepest_nesting.load(Ordering::Relaxed),
        }
    }
}
