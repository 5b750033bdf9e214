// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/numeric-regex)

//! Named predicates callable from interval blocks.
//!
//! An interval such as `[0:100;mavgasc 3]` filters each candidate element
//! through a registered function. Functions are looked up by name at
//! execution time, so a compiled pattern can be run against different
//! registries.
//!
//! # Callback contract
//!
//! ```text
//! fn(params: &[T], current: T, previous: T, window: &[T]) -> bool
//! ```
//!
//! - `params`: literal arguments written after the name in the pattern.
//! - `current`: the element being tested.
//! - `previous`: the previous interval element of this match, or the array
//!   predecessor, or `current` itself at index 0.
//! - `window`: every element accepted by interval blocks since the match
//!   started or since the last limiter finished, ending with `current`.
//!
//! # Built-in functions
//!
//! | Name | Arity | Accepts when |
//! |------|-------|--------------|
//! | `asc` | 0 | `current > previous` |
//! | `desc` | 0 | `current < previous` |
//! | `avgasc` | 0 | `current >= mean(window)` |
//! | `avgdesc` | 0 | `current <= mean(window)` |
//! | `mavgasc n` | 1 | `current >= mean(last n of window)` |
//! | `mavgdesc n` | 1 | `current <= mean(last n of window)` |
//! | `cmavgasc n t` | 2 | `current >= mean(last n of window) - t` |
//! | `cmavgdesc n t` | 2 | `current <= mean(last n of window) + t` |
//! | `cavg d` | 1 | `current + d > previous` |
//! | `cdesc d` | 1 | `current - d < previous` |
//! | `min p` | 1 | drawdown of `current` from the window peak is at least `p`% |
//! | `max p` | 1 | rise of `current` from the window trough is at least `p`% |
//!
//! Mind the direction, which is the reverse of some older libraries with the
//! same names: `avgasc` accepts `current >= mean`, never `mean >= current`,
//! and `max p` is a lower bound on the rise from the trough, not an upper
//! bound. `avgdesc` and `min p` mirror them.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::common::numeric::Numeric;
use crate::pattern::block::CompiledPattern;
use crate::pattern::error::{FunctionResolutionError, RegistrationError};

/// Callback signature shared by every registered function.
pub type Callback<T> = dyn Fn(&[T], T, T, &[T]) -> bool + Send + Sync;

/// A named predicate with a fixed parameter count.
#[derive(Clone)]
pub struct NumericFunction<T> {
    name: String,
    arity: usize,
    callback: Arc<Callback<T>>,
}

impl<T> NumericFunction<T> {
    /// Function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of literal parameters the function expects.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Invokes the predicate.
    #[inline]
    pub fn call(&self, params: &[T], current: T, previous: T, window: &[T]) -> bool {
        (self.callback)(params, current, previous, window)
    }
}

impl<T> fmt::Debug for NumericFunction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Mapping from function name to predicate.
///
/// Read-only during matching; cloning is cheap because callbacks are shared.
#[derive(Clone)]
pub struct FunctionRegistry<T> {
    functions: HashMap<String, NumericFunction<T>>,
}

impl<T: Numeric> FunctionRegistry<T> {
    /// Creates a registry with no functions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Creates a registry holding the built-in function library.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.insert("asc", 0, asc::<T>);
        registry.insert("desc", 0, desc::<T>);
        registry.insert("avgasc", 0, avgasc::<T>);
        registry.insert("avgdesc", 0, avgdesc::<T>);
        registry.insert("mavgasc", 1, mavgasc::<T>);
        registry.insert("mavgdesc", 1, mavgdesc::<T>);
        registry.insert("cmavgasc", 2, cmavgasc::<T>);
        registry.insert("cmavgdesc", 2, cmavgdesc::<T>);
        registry.insert("cavg", 1, cavg::<T>);
        registry.insert("cdesc", 1, cdesc::<T>);
        registry.insert("min", 1, drawdown_from_peak::<T>);
        registry.insert("max", 1, rise_from_trough::<T>);
        registry
    }

    /// Adds a function.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Duplicate`] if the name is taken and
    /// [`RegistrationError::InvalidName`] if the name could not be written
    /// in a pattern.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        arity: usize,
        callback: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&[T], T, T, &[T]) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(RegistrationError::InvalidName { name });
        }
        if self.functions.contains_key(&name) {
            return Err(RegistrationError::Duplicate { name });
        }
        self.insert(name, arity, callback);
        Ok(())
    }

    fn insert<F>(&mut self, name: impl Into<String>, arity: usize, callback: F)
    where
        F: Fn(&[T], T, T, &[T]) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        self.functions.insert(
            name.clone(),
            NumericFunction {
                name,
                arity,
                callback: Arc::new(callback),
            },
        );
    }

    /// Returns true if a function with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Looks up a function by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NumericFunction<T>> {
        self.functions.get(name)
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if no functions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Checks that every function the pattern references is registered with
    /// the arity written in the pattern.
    ///
    /// # Errors
    ///
    /// Returns the first unresolvable reference, in pattern order.
    pub fn resolve(&self, pattern: &CompiledPattern<T>) -> Result<(), FunctionResolutionError> {
        for reference in &pattern.functions {
            let Some(function) = self.get(&reference.name) else {
                return Err(FunctionResolutionError::Unknown {
                    name: reference.name.clone(),
                });
            };
            if function.arity != reference.arity {
                return Err(FunctionResolutionError::ArityMismatch {
                    name: reference.name.clone(),
                    expected: function.arity,
                    found: reference.arity,
                });
            }
        }
        Ok(())
    }
}

impl<T: Numeric> Default for FunctionRegistry<T> {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl<T> fmt::Debug for FunctionRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    bytes.next().is_some_and(|b| b.is_ascii_alphabetic())
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn mean<T: Numeric>(values: &[T]) -> f64 {
    values.iter().map(|v| v.to_f64()).sum::<f64>() / values.len() as f64
}

/// Parameter `i` widened to `f64`; NaN if absent, which fails every check.
fn param<T: Numeric>(params: &[T], i: usize) -> f64 {
    params.get(i).map_or(f64::NAN, |p| p.to_f64())
}

/// The trailing `n` values of the window (all of it if shorter).
fn trailing<T: Numeric>(window: &[T], n: f64) -> &[T] {
    let n = n.max(1.0) as usize;
    &window[window.len().saturating_sub(n)..]
}

fn asc<T: Numeric>(_params: &[T], current: T, previous: T, _window: &[T]) -> bool {
    current > previous
}

fn desc<T: Numeric>(_params: &[T], current: T, previous: T, _window: &[T]) -> bool {
    current < previous
}

fn avgasc<T: Numeric>(_params: &[T], current: T, _previous: T, window: &[T]) -> bool {
    current.to_f64() >= mean(window)
}

fn avgdesc<T: Numeric>(_params: &[T], current: T, _previous: T, window: &[T]) -> bool {
    current.to_f64() <= mean(window)
}

fn mavgasc<T: Numeric>(params: &[T], current: T, _previous: T, window: &[T]) -> bool {
    current.to_f64() >= mean(trailing(window, param(params, 0)))
}

fn mavgdesc<T: Numeric>(params: &[T], current: T, _previous: T, window: &[T]) -> bool {
    current.to_f64() <= mean(trailing(window, param(params, 0)))
}

fn cmavgasc<T: Numeric>(params: &[T], current: T, _previous: T, window: &[T]) -> bool {
    current.to_f64() >= mean(trailing(window, param(params, 0))) - param(params, 1)
}

fn cmavgdesc<T: Numeric>(params: &[T], current: T, _previous: T, window: &[T]) -> bool {
    current.to_f64() <= mean(trailing(window, param(params, 0))) + param(params, 1)
}

fn cavg<T: Numeric>(params: &[T], current: T, previous: T, _window: &[T]) -> bool {
    params
        .first()
        .is_some_and(|d| current.to_f64() + d.to_f64() > previous.to_f64())
}

fn cdesc<T: Numeric>(params: &[T], current: T, previous: T, _window: &[T]) -> bool {
    params
        .first()
        .is_some_and(|d| current.to_f64() - d.to_f64() < previous.to_f64())
}

fn drawdown_from_peak<T: Numeric>(params: &[T], current: T, _previous: T, window: &[T]) -> bool {
    let peak = window
        .iter()
        .map(|v| v.to_f64())
        .fold(current.to_f64(), f64::max);
    (peak - current.to_f64()) / peak >= param(params, 0) / 100.0
}

fn rise_from_trough<T: Numeric>(params: &[T], current: T, _previous: T, window: &[T]) -> bool {
    let trough = window
        .iter()
        .map(|v| v.to_f64())
        .fold(current.to_f64(), f64::min);
    (current.to_f64() - trough) / trough >= param(params, 0) / 100.0
}
