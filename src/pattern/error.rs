// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/numeric-regex)

//! Error types for pattern compilation and execution.

use std::fmt;

/// Which compilation phase rejected the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// Unrecognised character or malformed number.
    Lexical,
    /// Unexpected token, unbalanced group or missing punctuation.
    Syntax,
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => f.write_str("lexical"),
            Self::Syntax => f.write_str("syntax"),
        }
    }
}

/// Error returned when a pattern string cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CompileError {
    /// Phase that produced the error.
    pub kind: CompileErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Byte offset in the pattern string where the error occurred.
    pub offset: usize,
}

impl CompileError {
    pub(crate) fn lexical(message: impl Into<String>, offset: usize) -> Self {
        Self {
            kind: CompileErrorKind::Lexical,
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn syntax(message: impl Into<String>, offset: usize) -> Self {
        Self {
            kind: CompileErrorKind::Syntax,
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error at position {}: {}",
            self.kind, self.offset, self.message
        )
    }
}

impl std::error::Error for CompileError {}

/// A compiled pattern references a function the registry cannot satisfy.
///
/// Raised before the first match attempt. The compiled pattern stays valid:
/// a different registry may resolve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionResolutionError {
    /// No function with this name is registered.
    Unknown {
        /// Function name as written in the pattern.
        name: String,
    },
    /// The function exists but declares a different parameter count.
    ArityMismatch {
        /// Function name as written in the pattern.
        name: String,
        /// Arity declared by the registered function.
        expected: usize,
        /// Number of arguments written in the pattern.
        found: usize,
    },
}

impl fmt::Display for FunctionResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { name } => write!(f, "function '{name}' not found"),
            Self::ArityMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "function '{name}' takes {expected} argument(s), pattern passes {found}"
            ),
        }
    }
}

impl std::error::Error for FunctionResolutionError {}

/// A function could not be added to a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A function with this name is already registered.
    Duplicate {
        /// Rejected name.
        name: String,
    },
    /// The name cannot be written in a pattern (`[A-Za-z][A-Za-z0-9_]*`).
    InvalidName {
        /// Rejected name.
        name: String,
    },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { name } => write!(f, "function '{name}' already exists"),
            Self::InvalidName { name } => write!(f, "'{name}' is not a valid function name"),
        }
    }
}

impl std::error::Error for RegistrationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_display() {
        let err = CompileError::syntax("unclosed group", 4);
        assert_eq!(
            err.to_string(),
            "syntax error at position 4: unclosed group"
        );
        let err = CompileError::lexical("unexpected character '#'", 0);
        assert_eq!(
            err.to_string(),
            "lexical error at position 0: unexpected character '#'"
        );
    }

    #[test]
    fn test_resolution_error_display() {
        let err = FunctionResolutionError::Unknown {
            name: "bogus".to_string(),
        };
        assert_eq!(err.to_string(), "function 'bogus' not found");

        let err = FunctionResolutionError::ArityMismatch {
            name: "mavgasc".to_string(),
            expected: 1,
            found: 0,
        };
        assert_eq!(
            err.to_string(),
            "function 'mavgasc' takes 1 argument(s), pattern passes 0"
        );
    }

    #[test]
    fn test_registration_error_display() {
        let err = RegistrationError::Duplicate {
            name: "asc".to_string(),
        };
        assert_eq!(err.to_string(), "function 'asc' already exists");
        let err = RegistrationError::InvalidName {
            name: "2x".to_string(),
        };
        assert_eq!(err.to_string(), "'2x' is not a valid function name");
    }

    #[test]
    fn test_errors_are_std_errors() {
        let err = CompileError::syntax("x", 0);
        let _: &dyn std::error::Error = &err;
        let err = FunctionResolutionError::Unknown {
            name: "x".to_string(),
        };
        let _: &dyn std::error::Error = &err;
    }
}
