//! Case cache statistics collection and reporting.
//!
//! This module tracks how a [`CaseCache`](crate::CaseCache) is used. It provides:
//! 1. **Registry:** Number of registered tables.
//! 2. **Lookups:** Total lookups, those served from memoized tables and those
//!    that blocked on a generator another thread was running.
//! 3. **Generation:** Tables generated, generator failures, cases produced and
//!    time spent generating.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Report sections understood by [`StatsSnapshot::render_sections`].
pub const STATS_SECTIONS: [&str; 2] = ["summary", "generation"];

/// How a cache lookup obtained its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LookupOutcome {
    /// Already generated.
    Hit,
    /// Generated concurrently by another caller.
    Waited,
    /// Generated by this caller.
    Generated,
}

/// Live counters, updated concurrently by cache lookups.
#[derive(Debug, Default)]
pub struct CacheStats {
    registrations: AtomicU64,
    lookups: AtomicU64,
    hits: AtomicU64,
    waits: AtomicU64,
    generations: AtomicU64,
    failures: AtomicU64,
    cases_generated: AtomicU64,
    generation_micros: AtomicU64,
}

impl CacheStats {
    pub(crate) fn record_registration(&self) {
        let _ = self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_lookup(&self, outcome: LookupOutcome) {
        let _ = self.lookups.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            LookupOutcome::Hit => &self.hits,
            LookupOutcome::Waited => &self.waits,
            LookupOutcome::Generated => return,
        };
        let _ = counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_generation(&self, cases: usize, elapsed: Duration) {
        let _ = self.generations.fetch_add(1, Ordering::Relaxed);
        let _ = self
            .cases_generated
            .fetch_add(cases as u64, Ordering::Relaxed);
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        let _ = self.generation_micros.fetch_add(micros, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        let _ = self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            registrations: self.registrations.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            waits: self.waits.load(Ordering::Relaxed),
            generations: self.generations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            cases_generated: self.cases_generated.load(Ordering::Relaxed),
            generation_micros: self.generation_micros.load(Ordering::Relaxed),
        }
    }
}

/// Counter values at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Registered tables.
    pub registrations: u64,
    /// Calls to `get` on registered keys.
    pub lookups: u64,
    /// Lookups that found the table already generated.
    pub hits: u64,
    /// Lookups that found the table missing and blocked until another
    /// caller's generator finished. Not counted as hits.
    pub waits: u64,
    /// Generator runs that produced a table.
    pub generations: u64,
    /// Generator runs that failed.
    pub failures: u64,
    /// Cases across all generated tables.
    pub cases_generated: u64,
    /// Wall time spent in generators, in microseconds.
    pub generation_micros: u64,
}

impl StatsSnapshot {
    /// Fraction of lookups that found the table already generated.
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }

    /// Renders the requested report sections; all of them when `sections` is empty.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = String::new();

        if want("summary") {
            let _ = writeln!(out, "==========================================================");
            let _ = writeln!(out, "CASE CACHE STATISTICS");
            let _ = writeln!(out, "==========================================================");
            let _ = writeln!(out, "tables.registered        {}", self.registrations);
            let _ = writeln!(out, "lookups                  {}", self.lookups);
            let _ = writeln!(
                out,
                "lookups.hits             {} ({:.2}%)",
                self.hits,
                self.hit_rate() * 100.0
            );
            let _ = writeln!(out, "lookups.waited           {}", self.waits);
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("generation") {
            let seconds = self.generation_micros as f64 / 1_000_000.0;
            let per_table = if self.generations == 0 {
                0
            } else {
                self.cases_generated / self.generations
            };
            let _ = writeln!(out, "GENERATION");
            let _ = writeln!(out, "  tables.generated       {}", self.generations);
            let _ = writeln!(out, "  tables.failed          {}", self.failures);
            let _ = writeln!(out, "  cases.total            {}", self.cases_generated);
            let _ = writeln!(out, "  cases.per_table        {per_table}");
            let _ = writeln!(out, "  host_seconds           {seconds:.4} s");
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        out
    }

    /// Prints the requested report sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }
}
