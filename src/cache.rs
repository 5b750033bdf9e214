// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/numeric-regex)

//! Memoised pattern compilation.
//!
//! Compiled patterns are immutable, so a cache hands out shared
//! [`Arc<CompiledPattern<T>>`] handles keyed by the pattern text. Lookups take
//! a read lock. A miss compiles outside any lock and then inserts under the
//! write lock, keeping whichever entry landed first, so concurrent misses on
//! the same text still yield a single shared pattern.
//!
//! Patterns that fail to compile are not cached.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use hashbrown::HashMap;

use crate::common::numeric::Numeric;
use crate::pattern::block::CompiledPattern;
use crate::pattern::error::CompileError;
use crate::pattern::parser::compile;

/// One process-wide cache per element type, created on first use.
static GLOBAL_CACHES: OnceLock<Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>> =
    OnceLock::new();

/// Thread-safe map from pattern text to compiled pattern.
pub struct PatternCache<T> {
    patterns: RwLock<HashMap<String, Arc<CompiledPattern<T>>>>,
}

impl<T: Numeric> PatternCache<T> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the process-wide cache for element type `T`.
    ///
    /// Used by [`crate::NumericRegex::new`].
    #[must_use]
    pub fn global() -> Arc<Self> {
        let caches = GLOBAL_CACHES.get_or_init(|| Mutex::new(HashMap::new()));
        let mut caches = caches.lock().unwrap_or_else(PoisonError::into_inner);
        caches
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Arc::new(Self::new())))
            .downcast_ref::<Arc<Self>>()
            .map_or_else(|| Arc::new(Self::new()), Arc::clone)
    }

    /// Returns the cached pattern for `pattern`, compiling it on a miss.
    ///
    /// # Errors
    ///
    /// Returns the [`CompileError`] if the pattern does not compile.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Arc<CompiledPattern<T>>, CompileError> {
        if let Some(hit) = self.get(pattern) {
            log_trace!("pattern cache hit for {:?}", pattern);
            return Ok(hit);
        }

        log_debug!("pattern cache miss for {:?}", pattern);
        let compiled = Arc::new(compile::<T>(pattern)?);
        let mut patterns = self
            .patterns
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // Another thread may have inserted while we compiled.
        let entry = patterns.entry(pattern.to_owned()).or_insert(compiled);
        Ok(Arc::clone(entry))
    }

    /// Returns the cached pattern without compiling.
    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<Arc<CompiledPattern<T>>> {
        self.patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pattern)
            .map(Arc::clone)
    }

    /// Removes every cached pattern. Handles already given out stay valid.
    pub fn clear(&self) {
        self.patterns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Numeric> Default for PatternCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Numeric> fmt::Debug for PatternCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternCache")
            .field("len", &self.len())
            .finish()
    }
}
