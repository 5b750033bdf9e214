// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/numeric-regex)

//! Greedy execution engine for compiled numeric patterns.
//!
//! Executes a [`CompiledPattern`] against a slice of numbers by trying each
//! candidate start position in turn and running the block list from there.
//!
//! # Algorithm
//!
//! Blocks run sequentially and short-circuit on the first failure. Limiters
//! are greedy and never backtrack: once a limiter has taken as many
//! repetitions as it can, a later failing block fails the whole attempt at
//! that start position instead of retrying with fewer repetitions. Each
//! attempt is therefore linear in the number of elements it consumes.
//!
//! A repetition that fails partway through is rolled back (cursor, interval
//! window and capture groups) before the limiter stops, so partial
//! repetitions never leak into the match.

use crate::common::numeric::Numeric;
use crate::functions::FunctionRegistry;
use crate::pattern::block::{Block, Bound, Checker, CompiledPattern, Interval, Limiter};
use crate::pattern::error::FunctionResolutionError;

/// Elements consumed by one repetition of a parenthesised limiter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptureGroup<T> {
    /// Captured elements, in array order.
    pub captures: Vec<T>,
}

/// A successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Match<T> {
    /// Index of the first matched element.
    pub index: usize,
    /// Number of matched elements. May be zero.
    pub length: usize,
    /// Copy of the matched elements.
    pub values: Vec<T>,
    /// Capture groups in completion order.
    pub groups: Vec<CaptureGroup<T>>,
}

impl<T> Match<T> {
    /// Index one past the last matched element.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.index + self.length
    }

    /// Matched index range.
    #[must_use]
    pub const fn range(&self) -> std::ops::Range<usize> {
        self.index..self.index + self.length
    }
}

/// Stateful search over one array.
///
/// Holds the search position between calls to [`Matcher::find_next`]. The
/// compiled pattern and the registry are only read, so several matchers may
/// share them across threads.
#[derive(Debug)]
pub struct Matcher<'a, T> {
    pattern: &'a CompiledPattern<T>,
    data: &'a [T],
    registry: &'a FunctionRegistry<T>,
    position: usize,
}

impl<'a, T: Numeric> Matcher<'a, T> {
    /// Creates a matcher positioned at index 0.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionResolutionError`] if the pattern references a
    /// function the registry does not provide with the written arity. No
    /// match is attempted in that case.
    pub fn new(
        pattern: &'a CompiledPattern<T>,
        data: &'a [T],
        registry: &'a FunctionRegistry<T>,
    ) -> Result<Self, FunctionResolutionError> {
        if let Err(err) = registry.resolve(pattern) {
            log_debug!("function resolution failed: {}", err);
            return Err(err);
        }
        Ok(Self {
            pattern,
            data,
            registry,
            position: 0,
        })
    }

    /// Next candidate start position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Moves the next candidate start position.
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Finds the next match starting at or after the current position.
    ///
    /// On success the position moves to the match index plus one, so
    /// repeated calls may return overlapping matches; [`Matches`] skips
    /// past each match instead.
    pub fn find_next(&mut self) -> Option<Match<T>> {
        let len = self.data.len();
        if self.pattern.start_anchor && self.position > 0 {
            self.position = len;
            return None;
        }

        while self.position < len {
            let start = self.position;
            let mut exec = Execution::new(self.data, self.registry, start);
            let matched = exec.run(&self.pattern.blocks)
                && (!self.pattern.end_anchor || exec.cursor >= len);
            if matched {
                self.position = start + 1;
                log_trace!("match at {} with length {}", start, exec.cursor - start);
                return Some(exec.into_match());
            }
            if self.pattern.start_anchor {
                self.position = len;
                return None;
            }
            self.position = start + 1;
        }
        None
    }

    /// Iterator over non-overlapping matches from the current position.
    pub const fn matches(self) -> Matches<'a, T> {
        Matches { matcher: self }
    }
}

/// Iterator over non-overlapping matches.
///
/// Each search resumes at the end of the previous match, or one past its
/// index for empty matches.
#[derive(Debug)]
pub struct Matches<'a, T> {
    matcher: Matcher<'a, T>,
}

impl<T: Numeric> Iterator for Matches<'_, T> {
    type Item = Match<T>;

    fn next(&mut self) -> Option<Match<T>> {
        let m = self.matcher.find_next()?;
        self.matcher.set_position(m.index + m.length.max(1));
        Some(m)
    }
}

/// Finds the first match starting at or after `start`.
///
/// # Errors
///
/// Returns [`FunctionResolutionError`] if a referenced function cannot be
/// resolved.
///
/// # Examples
///
/// ```
/// use numeric_regex::functions::FunctionRegistry;
/// use numeric_regex::pattern::executor::find_first;
/// use numeric_regex::pattern::parser::compile;
///
/// let pattern = compile::<f64>("5{2:4}").unwrap();
/// let registry = FunctionRegistry::with_builtins();
/// let m = find_first(&pattern, &[1.0, 5.0, 5.0, 5.0], 0, &registry)
///     .unwrap()
///     .unwrap();
/// assert_eq!((m.index, m.length), (1, 3));
/// ```
pub fn find_first<T: Numeric>(
    pattern: &CompiledPattern<T>,
    data: &[T],
    start: usize,
    registry: &FunctionRegistry<T>,
) -> Result<Option<Match<T>>, FunctionResolutionError> {
    let mut matcher = Matcher::new(pattern, data, registry)?;
    matcher.set_position(start);
    Ok(matcher.find_next())
}

/// Finds every non-overlapping match, in order.
///
/// # Errors
///
/// Returns [`FunctionResolutionError`] if a referenced function cannot be
/// resolved.
pub fn find_all<T: Numeric>(
    pattern: &CompiledPattern<T>,
    data: &[T],
    registry: &FunctionRegistry<T>,
) -> Result<Vec<Match<T>>, FunctionResolutionError> {
    Ok(Matcher::new(pattern, data, registry)?.matches().collect())
}

/// Returns true if a match starts at index 0 and spans the whole array.
///
/// # Errors
///
/// Returns [`FunctionResolutionError`] if a referenced function cannot be
/// resolved.
pub fn is_full_match<T: Numeric>(
    pattern: &CompiledPattern<T>,
    data: &[T],
    registry: &FunctionRegistry<T>,
) -> Result<bool, FunctionResolutionError> {
    Ok(find_first(pattern, data, 0, registry)?
        .is_some_and(|m| m.index == 0 && m.length == data.len()))
}

/// Replaces every non-overlapping match with `replacement`.
///
/// Empty matches insert `replacement` without removing anything.
///
/// # Errors
///
/// Returns [`FunctionResolutionError`] if a referenced function cannot be
/// resolved.
pub fn replace<T: Numeric>(
    pattern: &CompiledPattern<T>,
    data: &[T],
    replacement: &[T],
    registry: &FunctionRegistry<T>,
) -> Result<Vec<T>, FunctionResolutionError> {
    let mut out = Vec::with_capacity(data.len());
    let mut copied = 0;
    for m in Matcher::new(pattern, data, registry)?.matches() {
        out.extend_from_slice(&data[copied..m.index]);
        out.extend_from_slice(replacement);
        copied = m.end();
    }
    out.extend_from_slice(&data[copied..]);
    Ok(out)
}

/// State of one attempt at one start position.
struct Execution<'a, T> {
    data: &'a [T],
    registry: &'a FunctionRegistry<T>,
    start: usize,
    cursor: usize,
    /// Number of limiters currently executing; checkers consume inside one.
    limiter_depth: usize,
    /// Elements accepted by intervals since the start or the last limiter.
    window: Vec<T>,
    groups: Vec<CaptureGroup<T>>,
}

impl<'a, T: Numeric> Execution<'a, T> {
    const fn new(data: &'a [T], registry: &'a FunctionRegistry<T>, start: usize) -> Self {
        Self {
            data,
            registry,
            start,
            cursor: start,
            limiter_depth: 0,
            window: Vec::new(),
            groups: Vec::new(),
        }
    }

    fn into_match(self) -> Match<T> {
        Match {
            index: self.start,
            length: self.cursor - self.start,
            values: self.data[self.start..self.cursor].to_vec(),
            groups: self.groups,
        }
    }

    fn run(&mut self, blocks: &[Block<T>]) -> bool {
        blocks.iter().all(|block| self.step(block))
    }

    fn step(&mut self, block: &Block<T>) -> bool {
        match block {
            Block::Literal(value) => self.literal(*value),
            Block::Interval(interval) => self.interval(interval),
            Block::Limiter(limiter) => self.limiter(limiter),
            Block::Checker(checker) => self.checker(checker),
            Block::Group(_) => true,
        }
    }

    fn literal(&mut self, value: T) -> bool {
        match self.data.get(self.cursor) {
            Some(&current) if current == value => {
                self.cursor += 1;
                true
            }
            _ => false,
        }
    }

    fn interval(&mut self, interval: &Interval<T>) -> bool {
        let Some(&current) = self.data.get(self.cursor) else {
            return false;
        };
        let previous = match self.window.last() {
            Some(&last) => last,
            None if self.cursor > 0 => self.data[self.cursor - 1],
            None => current,
        };

        let lower_ok = match interval.lower {
            Bound::Value(lower) => current >= lower,
            Bound::Percent(lower) => current.percent_change(previous) >= lower,
        };
        let upper_ok = match interval.upper {
            Bound::Value(upper) => current <= upper,
            Bound::Percent(upper) => current.percent_change(previous) <= upper,
        };
        if !(lower_ok && upper_ok) {
            return false;
        }

        self.window.push(current);
        if let Some(call) = &interval.function {
            let accepted = self
                .registry
                .get(&call.name)
                .is_some_and(|f| f.call(&call.params, current, previous, &self.window));
            if !accepted {
                return false;
            }
        }

        self.cursor += 1;
        true
    }

    fn limiter(&mut self, limiter: &Limiter<T>) -> bool {
        // Reference for the cumulative percentage window: the element before
        // the first repetition, or the first element at index 0.
        let base = self.data.get(self.cursor.saturating_sub(1)).copied();
        let capturing = limiter.is_capturing();
        let mut count = 0;

        self.limiter_depth += 1;
        while limiter.max.is_none_or(|max| count < max) {
            let rep_start = self.cursor;
            let window_len = self.window.len();
            let groups_len = self.groups.len();

            let mut ok = self.run(&limiter.blocks);
            if ok && self.cursor > rep_start {
                if let (Some(range), Some(base)) = (limiter.percent, base) {
                    let last = self.data[self.cursor - 1];
                    ok = range.contains(last.percent_change(base));
                }
            }
            if !ok {
                self.cursor = rep_start;
                self.window.truncate(window_len);
                self.groups.truncate(groups_len);
                break;
            }

            count += 1;
            if self.cursor == rep_start {
                // Zero-width repetition; every further pass would match the
                // same empty span, so it satisfies the minimum on its own.
                count = count.max(limiter.min);
                break;
            }
            if capturing {
                self.groups.push(CaptureGroup {
                    captures: self.data[rep_start..self.cursor].to_vec(),
                });
            }
        }
        self.limiter_depth -= 1;
        self.window.clear();

        count >= limiter.min && (limiter.percent.is_none() || count >= 1)
    }

    fn checker(&mut self, checker: &Checker<T>) -> bool {
        let inside_limiter = self.limiter_depth > 0;
        let anchor = if self.cursor == 0 || inside_limiter {
            self.cursor
        } else {
            self.cursor - 1
        };
        let Some(&value) = self.data.get(anchor) else {
            return false;
        };

        let ok = match checker.threshold {
            Bound::Value(threshold) => checker.op.evaluate(value, threshold),
            Bound::Percent(threshold) => {
                if self.cursor == 0 {
                    return false;
                }
                let change = value.percent_change(self.data[self.start]);
                checker.op.evaluate(change, threshold)
            }
        };
        if !ok {
            return false;
        }

        if inside_limiter {
            self.cursor += 1;
        }
        true
    }
}
