// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/numeric-regex)

//! Common types shared by the compiler, the engine and the function library.

pub mod numeric;
