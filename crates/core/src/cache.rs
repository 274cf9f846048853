//! Lazily evaluated, memoized case tables.
//!
//! A [`CaseCache`] is the process-wide table registry. It is built once at
//! startup, filled through [`CaseCache::register`], then shared by reference
//! with every consumer:
//! 1. **Registration:** associates a key with a generator; nothing runs yet.
//! 2. **First lookup:** runs the generator exactly once. Concurrent callers of
//!    the same key block on a [`OnceLock`] until the single run completes.
//! 3. **Later lookups:** return the memoized table. Entries are never evicted.
//!
//! A failing generator is memoized too, and every lookup of its key reports
//! the same [`Error::Generation`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::case::CaseTable;
use crate::common::{Error, Result};
use crate::stats::{CacheStats, LookupOutcome};

/// Producer of a case table.
pub type Generator = Box<dyn Fn() -> Result<CaseTable> + Send + Sync>;

/// Outcome of a generator run; failures keep their message.
type Slot = std::result::Result<Arc<CaseTable>, String>;

struct Entry {
    generator: Generator,
    table: OnceLock<Slot>,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("evaluated", &self.table.get().is_some())
            .finish_non_exhaustive()
    }
}

/// Registry of case tables keyed by name.
#[derive(Debug, Default)]
pub struct CaseCache {
    entries: BTreeMap<String, Entry>,
    stats: CacheStats,
}

impl CaseCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `key` with a table generator. The generator is not run.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateKey`] when `key` is already registered.
    pub fn register<F>(&mut self, key: impl Into<String>, generator: F) -> Result<()>
    where
        F: Fn() -> Result<CaseTable> + Send + Sync + 'static,
    {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(Error::DuplicateKey(key));
        }
        trace!(key = %key, "registered case table");
        let _ = self.entries.insert(
            key,
            Entry {
                generator: Box::new(generator),
                table: OnceLock::new(),
            },
        );
        self.stats.record_registration();
        Ok(())
    }

    /// Returns the table for `key`, generating it on first access.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpcases_core::case::CaseTable;
    /// use fpcases_core::interval::EvaluationMode;
    /// use fpcases_core::{CaseCache, ErrorKind, Precision};
    ///
    /// let mut cache = CaseCache::new();
    /// cache
    ///     .register("empty_f32_const", || {
    ///         Ok(CaseTable::new(Precision::F32, EvaluationMode::Const, Vec::new()))
    ///     })
    ///     .unwrap();
    /// let first = cache.get("empty_f32_const").unwrap();
    /// let second = cache.get("empty_f32_const").unwrap();
    /// assert!(std::sync::Arc::ptr_eq(&first, &second));
    /// assert_eq!(cache.get("undefined_key").unwrap_err().kind(), ErrorKind::NotFound);
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unregistered key and [`Error::Generation`]
    /// when the generator failed.
    pub fn get(&self, key: &str) -> Result<Arc<CaseTable>> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| Error::NotFound(key.to_owned()))?;

        let ready = entry.table.get().is_some();
        let mut generated = false;
        let slot = entry.table.get_or_init(|| {
            generated = true;
            let started = Instant::now();
            match (entry.generator)() {
                Ok(table) => {
                    let elapsed = started.elapsed();
                    debug!(key, cases = table.len(), ?elapsed, "generated case table");
                    self.stats.record_generation(table.len(), elapsed);
                    Ok(Arc::new(table))
                }
                Err(err) => {
                    warn!(key, error = %err, "case table generation failed");
                    self.stats.record_failure();
                    Err(err.to_string())
                }
            }
        });
        let outcome = if generated {
            LookupOutcome::Generated
        } else if ready {
            LookupOutcome::Hit
        } else {
            LookupOutcome::Waited
        };
        self.stats.record_lookup(outcome);
        if !generated {
            trace!(key, ?outcome, "case table served from cache");
        }

        match slot {
            Ok(table) => Ok(Arc::clone(table)),
            Err(reason) => Err(Error::Generation {
                key: key.to_owned(),
                reason: reason.clone(),
            }),
        }
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether the generator for `key` has already run.
    pub fn is_evaluated(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.table.get().is_some())
    }

    /// Registered keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Usage counters.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
