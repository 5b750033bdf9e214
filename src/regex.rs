// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/numeric-regex)

//! `NumericRegex`: a compiled pattern bundled with its function registry.
//!
//! Thin convenience layer over [`crate::pattern`]: compiles through the
//! process-wide [`PatternCache`], owns a [`FunctionRegistry`] that callers
//! may extend, and forwards every search to [`crate::pattern::executor`].
//!
//! # Example
//!
//! ```
//! use numeric_regex::NumericRegex;
//!
//! let re = NumericRegex::<f64>::new("[0%:10%]+").unwrap();
//! let m = re.find(&[100.0, 105.0, 110.0, 150.0]).unwrap().unwrap();
//! assert_eq!(m.values, vec![100.0, 105.0, 110.0]);
//! ```

use std::sync::Arc;

use crate::cache::PatternCache;
use crate::common::numeric::Numeric;
use crate::functions::FunctionRegistry;
use crate::pattern::block::CompiledPattern;
use crate::pattern::error::{CompileError, FunctionResolutionError, RegistrationError};
use crate::pattern::executor::{self, Match, Matcher, Matches};
use crate::Error;

/// A numeric regular expression ready to search arrays of `T`.
#[derive(Debug, Clone)]
pub struct NumericRegex<T> {
    source: String,
    pattern: Arc<CompiledPattern<T>>,
    registry: FunctionRegistry<T>,
}

impl<T: Numeric> NumericRegex<T> {
    /// Compiles `pattern` (through the process-wide cache) with the built-in
    /// function library.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] if the pattern is malformed.
    pub fn new(pattern: &str) -> Result<Self, CompileError> {
        Self::with_registry(pattern, FunctionRegistry::with_builtins())
    }

    /// Compiles `pattern` (through the process-wide cache) with a caller
    /// supplied registry.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] if the pattern is malformed.
    pub fn with_registry(
        pattern: &str,
        registry: FunctionRegistry<T>,
    ) -> Result<Self, CompileError> {
        let compiled = PatternCache::<T>::global().get_or_compile(pattern)?;
        Ok(Self::from_compiled(pattern, compiled, registry))
    }

    /// Wraps an already compiled pattern, bypassing the cache.
    #[must_use]
    pub fn from_compiled(
        source: impl Into<String>,
        pattern: Arc<CompiledPattern<T>>,
        registry: FunctionRegistry<T>,
    ) -> Self {
        Self {
            source: source.into(),
            pattern,
            registry,
        }
    }

    /// Pattern text this regex was built from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The compiled pattern.
    #[must_use]
    pub fn compiled(&self) -> &CompiledPattern<T> {
        &self.pattern
    }

    /// The function registry used for execution.
    #[must_use]
    pub const fn registry(&self) -> &FunctionRegistry<T> {
        &self.registry
    }

    /// Adds a function to this regex's registry.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError`] if the name is already registered or
    /// is not a valid function name.
    pub fn add_function<F>(
        &mut self,
        name: impl Into<String>,
        arity: usize,
        callback: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&[T], T, T, &[T]) -> bool + Send + Sync + 'static,
    {
        self.registry.register(name, arity, callback)
    }

    /// Returns true if the registry holds a function with this name.
    #[must_use]
    pub fn contains_function(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// First match in `data`.
    ///
    /// # Errors
    ///
    /// Returns a [`FunctionResolutionError`] if the pattern references a
    /// function the registry cannot satisfy.
    pub fn find(&self, data: &[T]) -> Result<Option<Match<T>>, FunctionResolutionError> {
        self.find_at(data, 0)
    }

    /// First match starting at or after `start`.
    ///
    /// # Errors
    ///
    /// See [`NumericRegex::find`].
    pub fn find_at(
        &self,
        data: &[T],
        start: usize,
    ) -> Result<Option<Match<T>>, FunctionResolutionError> {
        executor::find_first(&self.pattern, data, start, &self.registry)
    }

    /// Every non-overlapping match, in order.
    ///
    /// # Errors
    ///
    /// See [`NumericRegex::find`].
    pub fn find_all(&self, data: &[T]) -> Result<Vec<Match<T>>, FunctionResolutionError> {
        executor::find_all(&self.pattern, data, &self.registry)
    }

    /// Lazy iterator over non-overlapping matches.
    ///
    /// # Errors
    ///
    /// See [`NumericRegex::find`].
    pub fn find_iter<'a>(
        &'a self,
        data: &'a [T],
    ) -> Result<Matches<'a, T>, FunctionResolutionError> {
        Ok(Matcher::new(&self.pattern, data, &self.registry)?.matches())
    }

    /// Copy of `data` with every non-overlapping match replaced.
    ///
    /// # Errors
    ///
    /// See [`NumericRegex::find`].
    pub fn replace(
        &self,
        data: &[T],
        replacement: &[T],
    ) -> Result<Vec<T>, FunctionResolutionError> {
        executor::replace(&self.pattern, data, replacement, &self.registry)
    }

    /// Returns true if the pattern matches the whole of `data`.
    ///
    /// # Errors
    ///
    /// See [`NumericRegex::find`].
    pub fn is_match(&self, data: &[T]) -> Result<bool, FunctionResolutionError> {
        executor::is_full_match(&self.pattern, data, &self.registry)
    }

    /// One-shot [`NumericRegex::is_match`] with the built-in functions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compile`] or [`Error::Resolution`].
    pub fn is_match_pattern(pattern: &str, data: &[T]) -> Result<bool, Error> {
        Ok(Self::new(pattern)?.is_match(data)?)
    }
}

/// Parses textual numbers into `T` using the pattern literal syntax
/// (`.` or `,` as decimal separator).
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] for the first item that does not parse.
///
/// # Examples
///
/// ```
/// use numeric_regex::parse_values;
///
/// let values: Vec<f64> = parse_values(&["1", "2,5", "-3.25"]).unwrap();
/// assert_eq!(values, vec![1.0, 2.5, -3.25]);
/// ```
pub fn parse_values<T: Numeric, S: AsRef<str>>(items: &[S]) -> Result<Vec<T>, Error> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let text = item.as_ref().trim();
            T::parse_literal(&text.replace(',', ".")).ok_or_else(|| Error::InvalidValue {
                index,
                text: text.to_string(),
            })
        })
        .collect()
}
