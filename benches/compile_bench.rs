// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/numeric-regex)

//! Benchmarks for pattern compilation.
//!
//! Separates raw lexing + parsing cost from the cached lookup path that
//! `NumericRegex::new` takes after the first compile.
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use numeric_regex::pattern::parser::compile;
use numeric_regex::PatternCache;

const PATTERNS: &[(&str, &str)] = &[
    ("literal", "1 2 3"),
    ("interval", "[0%:10%]+"),
    ("function", "[0:1000;cmavgasc 5 2]{3:20}"),
    ("nested", "^((1 [0:5])+ [-5%:0%]{2})* >=10% $"),
    ("percent_window", "[0:1000]{-2%:15%;4:40} <3%"),
];

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for &(name, pattern) in PATTERNS {
        group.bench_with_input(BenchmarkId::from_parameter(name), pattern, |b, pattern| {
            b.iter(|| compile::<f64>(black_box(pattern)).unwrap());
        });
    }

    group.finish();
}

fn bench_cached_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_cached");

    for &(name, pattern) in PATTERNS {
        let cache = PatternCache::<f64>::new();
        cache.get_or_compile(pattern).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), pattern, |b, pattern| {
            b.iter(|| cache.get_or_compile(black_box(pattern)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_cached_compile);
criterion_main!(benches);
