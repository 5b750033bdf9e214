// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/numeric-regex)

//! # `numeric-regex`: regular expressions over sequences of numbers
//!
//! Describes trends in numeric series (steps, plateaus, percentage moves,
//! drawdowns) with a compact pattern language and finds them in slices of
//! `f32`, `f64`, `i32` or `i64`.
//!
//! ## Layers
//!
//! | Module | Role |
//! |--------|------|
//! | [`pattern::lexer`] | Tokenises pattern text |
//! | [`pattern::parser`] | Builds the [`CompiledPattern`] block tree |
//! | [`pattern::executor`] | Greedy, non-backtracking matcher |
//! | [`functions`] | Named predicates usable inside intervals |
//! | [`cache`] | Shared memoisation of compiled patterns |
//! | [`regex`] | [`NumericRegex`] convenience facade |
//!
//! ## Example
//!
//! ```
//! use numeric_regex::NumericRegex;
//!
//! // A rise of 5% to 15% from the first element, via steps of at most 10%.
//! let re = NumericRegex::<f64>::new("[0%:10%]{2:10} >=5% <=15%").unwrap();
//! let m = re.find(&[100.0, 104.0, 109.0, 80.0]).unwrap().unwrap();
//! assert_eq!(m.values, vec![100.0, 104.0, 109.0]);
//! ```
//!
//! ## Features
//!
//! - `logging`: emits `log` records for compilation, cache traffic and
//!   matches.
//! - `serde`: derives `Serialize`/`Deserialize` for [`Match`] and
//!   [`CaptureGroup`].

use std::fmt;

/// Debug-level log record; no-op without the `logging` feature.
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

/// Trace-level log record; no-op without the `logging` feature.
#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

pub mod cache;
pub mod common;
pub mod functions;
pub mod pattern;
pub mod regex;

pub use cache::PatternCache;
pub use common::numeric::Numeric;
pub use functions::{FunctionRegistry, NumericFunction};
pub use pattern::block::CompiledPattern;
pub use pattern::error::{
    CompileError, CompileErrorKind, FunctionResolutionError, RegistrationError,
};
pub use pattern::executor::{CaptureGroup, Match};
pub use pattern::parser::compile;
pub use regex::{parse_values, NumericRegex};

/// Any error this crate can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The pattern text did not compile.
    Compile(CompileError),
    /// A referenced function is missing or has the wrong arity.
    Resolution(FunctionResolutionError),
    /// A function could not be registered.
    Registration(RegistrationError),
    /// A textual input value is not a number.
    InvalidValue {
        /// Position of the value in the input.
        index: usize,
        /// The rejected text.
        text: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile(err) => fmt::Display::fmt(err, f),
            Self::Resolution(err) => fmt::Display::fmt(err, f),
            Self::Registration(err) => fmt::Display::fmt(err, f),
            Self::InvalidValue { index, text } => {
                write!(f, "value '{text}' at index {index} is not a number")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Compile(err) => Some(err),
            Self::Resolution(err) => Some(err),
            Self::Registration(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        Self::Compile(err)
    }
}

impl From<FunctionResolutionError> for Error {
    fn from(err: FunctionResolutionError) -> Self {
        Self::Resolution(err)
    }
}

impl From<RegistrationError> for Error {
    fn from(err: RegistrationError) -> Self {
        Self::Registration(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_wraps_and_displays_source() {
        let err: Error = compile::<f64>("(1 2").unwrap_err().into();
        assert!(matches!(err, Error::Compile(_)));
        assert!(err.to_string().starts_with("syntax error at position 4"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_question_mark_across_layers() {
        fn run() -> Result<usize, Error> {
            let mut registry = FunctionRegistry::<f64>::empty();
            registry.register("any", 0, |_, _, _, _| true)?;
            let re = NumericRegex::with_registry("[0:9;any]+", registry)?;
            Ok(re.find_all(&[1.0, 2.0, 20.0, 3.0])?.len())
        }
        assert_eq!(run().unwrap(), 2);
    }

    #[test]
    fn test_invalid_value_has_no_source() {
        let err = Error::InvalidValue {
            index: 0,
            text: "x".to_string(),
        };
        assert!(err.source().is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_match_serde_roundtrip() {
        let re = NumericRegex::<i64>::new("(1 2)+").unwrap();
        let m = re.find(&[1, 2, 1, 2]).unwrap().unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(
            json,
            r#"{"index":0,"length":4,"values":[1,2,1,2],"groups":[{"captures":[1,2]},{"captures":[1,2]}]}"#
        );
        let back: Match<i64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
