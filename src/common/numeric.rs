// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/numeric-regex)

//! Element type abstraction for numeric patterns.
//!
//! Every pattern, registry and matcher in this crate is generic over a single
//! element type `T: Numeric`. The trait bundles the arithmetic and ordering
//! the engine needs, so unsupported element types are rejected by the type
//! checker rather than at match time.
//!
//! # Percentages
//!
//! Percentages are carried as `f64` ratios (`10%` is `0.10`) independently of
//! `T`. Integer element types therefore compare against exact percentage
//! bounds instead of truncated ones.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

/// Numeric element type that patterns can be matched against.
pub trait Numeric:
    Copy
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Converts a pattern literal into `Self`.
    ///
    /// The lexer has already normalised the decimal separator to `.`.
    /// Returns `None` when the literal is not representable (for example
    /// `1.5` for an integer type, or an out-of-range value).
    fn parse_literal(text: &str) -> Option<Self>;

    /// Widens `self` to `f64` for percentage arithmetic.
    fn to_f64(self) -> f64;

    /// Relative change of `self` from `base`, as a ratio.
    ///
    /// `110.percent_change(100) == 0.10`. A zero base yields NaN, which
    /// fails every percentage comparison.
    #[inline]
    fn percent_change(self, base: Self) -> f64 {
        let base = base.to_f64();
        if base == 0.0 {
            return f64::NAN;
        }
        (self.to_f64() - base) / base
    }
}

macro_rules! impl_numeric_float {
    ($($t:ty),*) => {$(
        impl Numeric for $t {
            fn parse_literal(text: &str) -> Option<Self> {
                text.parse::<$t>().ok().filter(|v| v.is_finite())
            }

            #[inline]
            fn to_f64(self) -> f64 {
                f64::from(self)
            }
        }
    )*};
}

macro_rules! impl_numeric_int {
    ($($t:ty),*) => {$(
        impl Numeric for $t {
            fn parse_literal(text: &str) -> Option<Self> {
                text.parse::<$t>().ok()
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    )*};
}

impl_numeric_float!(f32, f64);
impl_numeric_int!(i32, i64);
