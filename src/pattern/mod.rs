// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/numeric-regex)

//! Pattern compilation and matching over numeric arrays.
//!
//! Implements a regular-expression-like language whose atoms match numbers
//! instead of characters.
//!
//! # Pattern Syntax
//!
//! ```text
//! 5               Match one element equal to 5 (also 2.5, 2,5, -3)
//! [lo:hi]         Match one element with lo <= x <= hi
//! [lo%:hi%]       Match one element whose change from the previous is in range
//! [lo:hi;f a b]   As above, additionally filtered by function f(a, b)
//! X*  X+  X?      Repeat the preceding atom or group greedily
//! X{n}  X{n:m}    Repeat exactly n, or n to m times
//! X{p%}           Repeat while the run stays between no change and p%
//! X{p%:q%;n:m}    Repeat within a cumulative change range and count range
//! (...)           Group; a quantified group captures every repetition
//! >x  >=x  <x  <=x  =x
//!                 Check the last consumed element without consuming it
//! >p%             Check the change since the first element of the match
//! ^  $            Anchor at the first / last element
//! ```
//!
//! Whitespace between tokens is ignored.
//!
//! Compilation ([`parser::compile`]) never consults the function registry;
//! functions are resolved by [`executor`] before the first match attempt.

pub mod block;
pub mod error;
pub mod executor;
pub mod lexer;
pub mod parser;
