// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/numeric-regex)

//! Compiled block representation of a numeric pattern.
//!
//! A [`CompiledPattern`] owns a flat list of [`Block`]s. Quantifiers own the
//! blocks they repeat, so nesting is expressed by ownership rather than by
//! indices into a shared list.

use crate::common::numeric::Numeric;

/// One side of an interval, or a checker threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound<T> {
    /// Absolute value compared against the element itself.
    Value(T),
    /// Relative change as a ratio (`10%` is stored as `0.10`).
    Percent(f64),
}

/// Comparison operator of a [`Checker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}

impl CompareOp {
    /// Evaluates `value <op> threshold`.
    ///
    /// Incomparable values (NaN) never satisfy any operator.
    #[must_use]
    #[inline]
    pub fn evaluate<V: PartialOrd>(self, value: V, threshold: V) -> bool {
        match self {
            Self::Eq => value == threshold,
            Self::Gt => value > threshold,
            Self::Gte => value >= threshold,
            Self::Lt => value < threshold,
            Self::Lte => value <= threshold,
        }
    }
}

/// Function attached to an interval: `[lo:hi;name p1 p2]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall<T> {
    /// Registered function name.
    pub name: String,
    /// Literal parameters written after the name.
    pub params: Vec<T>,
}

/// `[lower:upper]` with an optional function filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval<T> {
    /// Lower bound (inclusive).
    pub lower: Bound<T>,
    /// Upper bound (inclusive).
    pub upper: Bound<T>,
    /// Optional predicate invoked with the running interval window.
    pub function: Option<FunctionCall<T>>,
}

/// Cumulative change bound on a repeated run, as ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentRange {
    /// Lowest allowed change (inclusive).
    pub lower: f64,
    /// Highest allowed change (inclusive).
    pub upper: f64,
}

impl PercentRange {
    /// Returns true if `change` lies inside the range. NaN never does.
    #[must_use]
    #[inline]
    pub fn contains(&self, change: f64) -> bool {
        self.lower <= change && change <= self.upper
    }
}

/// Repetition of the blocks it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Limiter<T> {
    /// Repeated blocks. Never empty.
    pub blocks: Vec<Block<T>>,
    /// Minimum repetitions required.
    pub min: usize,
    /// Maximum repetitions; `None` is unbounded.
    pub max: Option<usize>,
    /// Optional cumulative change bound for the whole run.
    pub percent: Option<PercentRange>,
}

impl<T> Limiter<T> {
    /// Returns true if the repeated blocks form a parenthesised group, in
    /// which case every repetition produces a capture group.
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        matches!(self.blocks.first(), Some(Block::Group(GroupMarker::Open)))
    }
}

/// Single-element comparison: `>5`, `<=-2%`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checker<T> {
    /// Comparison operator.
    pub op: CompareOp,
    /// Absolute threshold, or a change ratio from the match's first element.
    pub threshold: Bound<T>,
}

/// Parenthesis placeholder kept so quantifiers can see group boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMarker {
    /// `(`
    Open,
    /// `)`
    Close,
}

/// A node of the compiled pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Block<T> {
    /// Matches one element equal to the value.
    Literal(T),
    /// Matches one element inside the bounds.
    Interval(Interval<T>),
    /// Repeats the owned blocks.
    Limiter(Limiter<T>),
    /// Compares an anchor element against a threshold.
    Checker(Checker<T>),
    /// Group boundary; matches nothing.
    Group(GroupMarker),
}

/// A function the pattern needs from the registry at execution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRef {
    /// Function name.
    pub name: String,
    /// Number of literal arguments written in the pattern.
    pub arity: usize,
}

/// A compiled pattern ready for execution.
///
/// Immutable once built and safe to share between threads.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct CompiledPattern<T> {
    /// Top-level blocks, executed in order.
    pub blocks: Vec<Block<T>>,
    /// `^`: matches must start at index 0.
    pub start_anchor: bool,
    /// `$`: matches must end at the last element.
    pub end_anchor: bool,
    /// Functions referenced by intervals, in pattern order.
    pub functions: Vec<FunctionRef>,
}

impl<T: Numeric> CompiledPattern<T> {
    /// Total number of blocks, counting those nested in limiters.
    #[must_use]
    pub fn block_count(&self) -> usize {
        fn count<T>(blocks: &[Block<T>]) -> usize {
            blocks
                .iter()
                .map(|b| match b {
                    Block::Limiter(l) => 1 + count(&l.blocks),
                    _ => 1,
                })
                .sum()
        }
        count(&self.blocks)
    }
}
